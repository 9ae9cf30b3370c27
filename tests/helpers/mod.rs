#![allow(dead_code)]

use rusqlite::{params, Connection};
use synapse::config::GraphConfig;
use synapse::db;
use synapse::graph::connections::{create_or_update, CreateOrUpdateResult};
use synapse::graph::types::ConnectionType;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&conn).unwrap();
    conn
}

/// Default graph config for tests.
pub fn graph_config() -> GraphConfig {
    GraphConfig::default()
}

/// Insert a context row directly. Returns the context ID.
pub fn seed_context(conn: &Connection, title: &str) -> i64 {
    conn.execute(
        "INSERT INTO contexts (title, created_at) VALUES (?1, ?2)",
        params![title, chrono::Utc::now().to_rfc3339()],
    )
    .unwrap();
    conn.last_insert_rowid()
}

/// Insert an experience row directly (the node store is external to the
/// engine). Returns the experience ID.
pub fn seed_experience(conn: &Connection, content: &str) -> i64 {
    conn.execute(
        "INSERT INTO experiences (content, created_at) VALUES (?1, ?2)",
        params![content, chrono::Utc::now().to_rfc3339()],
    )
    .unwrap();
    conn.last_insert_rowid()
}

/// Insert an experience with an explicit context and timestamp.
pub fn seed_experience_at(
    conn: &Connection,
    context_id: i64,
    content: &str,
    created_at: &str,
) -> i64 {
    conn.execute(
        "INSERT INTO experiences (content, context_id, created_at) VALUES (?1, ?2, ?3)",
        params![content, context_id, created_at],
    )
    .unwrap();
    conn.last_insert_rowid()
}

/// Create a connection through the engine with common defaults.
pub fn link(
    conn: &mut Connection,
    source: i64,
    target: i64,
    connection_type: ConnectionType,
    strength: i64,
    bidirectional: bool,
) -> CreateOrUpdateResult {
    create_or_update(
        conn,
        &graph_config(),
        source,
        target,
        connection_type,
        strength,
        bidirectional,
        true,
        None,
        None,
    )
    .unwrap()
}
