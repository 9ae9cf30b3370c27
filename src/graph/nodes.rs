//! Read-only lookups against the experience store.
//!
//! Experiences and contexts are owned by the backing store; the engine only
//! checks existence and reads timestamps for co-occurrence pairing.

use rusqlite::{params, Connection as Db};

/// Does an experience with this id exist?
pub(crate) fn experience_exists(conn: &Db, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM experiences WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
}

/// Does a context with this id exist?
pub(crate) fn context_exists(conn: &Db, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM contexts WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
}

/// All experiences in a context as (id, created_at), ordered by id.
pub(crate) fn context_members(conn: &Db, context_id: i64) -> rusqlite::Result<Vec<(i64, String)>> {
    let mut stmt = conn.prepare(
        "SELECT id, created_at FROM experiences WHERE context_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map(params![context_id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
