//! SQL DDL for all Synapse tables.
//!
//! Defines the `experiences` and `contexts` node tables, the `connections`
//! edge table, the `connection_log` audit table, and `schema_meta`. All DDL
//! uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// All schema DDL statements for Synapse's tables.
const SCHEMA_SQL: &str = r#"
-- Context groups referenced by experiences
CREATE TABLE IF NOT EXISTS contexts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

-- Experience records (nodes). Owned by the backing store — the engine only
-- reads id, created_at, and context_id; it never inserts or deletes rows.
CREATE TABLE IF NOT EXISTS experiences (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL DEFAULT '',
    context_id INTEGER REFERENCES contexts(id),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_experiences_context ON experiences(context_id);

-- The associative connection graph (edges)
CREATE TABLE IF NOT EXISTS connections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL REFERENCES experiences(id) ON DELETE CASCADE,
    target_id INTEGER NOT NULL REFERENCES experiences(id) ON DELETE CASCADE,
    connection_type TEXT NOT NULL CHECK(connection_type IN (
        'temporal','causal','semantic','contextual','thematic','emotional',
        'analogy','contrast','elaboration','reference','association','other')),
    strength INTEGER NOT NULL DEFAULT 5 CHECK(strength BETWEEN 1 AND 10),
    direction TEXT NOT NULL DEFAULT 'unidirectional'
        CHECK(direction IN ('unidirectional','bidirectional')),
    conscious_status INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    last_activated TEXT NOT NULL,
    activation_count INTEGER NOT NULL DEFAULT 1,
    description TEXT,
    attributes TEXT,
    UNIQUE(source_id, target_id, connection_type)
);

CREATE INDEX IF NOT EXISTS idx_connections_source ON connections(source_id);
CREATE INDEX IF NOT EXISTS idx_connections_target ON connections(target_id);
CREATE INDEX IF NOT EXISTS idx_connections_type ON connections(connection_type);
CREATE INDEX IF NOT EXISTS idx_connections_strength ON connections(strength);

-- Audit log
CREATE TABLE IF NOT EXISTS connection_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operation TEXT NOT NULL CHECK(operation IN ('create','update','activate','reinforce')),
    connection_id INTEGER NOT NULL,
    details TEXT,
    created_at TEXT NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
