//! On-disk database initialization: directory creation, WAL mode, schema,
//! and migrations.

use synapse::db;
use synapse::db::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use tempfile::TempDir;

#[test]
fn open_database_creates_parents_schema_and_migrations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("graph.db");

    let conn = db::open_database(&path).unwrap();
    assert!(path.exists());
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);

    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");

    let fk: i64 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn reopening_an_existing_database_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.db");

    {
        let conn = db::open_database(&path).unwrap();
        conn.execute(
            "INSERT INTO experiences (content, created_at) VALUES ('kept across opens', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
    }

    let conn = db::open_database(&path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM experiences", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}
