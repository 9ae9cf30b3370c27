//! Connection management — the only write path for individual edges.
//!
//! [`create_or_update`] is the single entry point for forming links: at most
//! one connection exists per (source, target, type) tuple, and a second
//! creation request merges into the existing row instead of duplicating it.
//! Activation, strengthening, and weakening all run through the same
//! immediate-transaction retry loop so concurrent updates to one edge
//! serialize rather than losing writes.
//!
//! The analytics modules (traversal, clusters, centrality, suggestions) read
//! edges exclusively through the `pub(crate)` helpers at the bottom of this
//! file.

use rusqlite::{params, Connection as Db, OptionalExtension};
use serde::Serialize;

use crate::config::GraphConfig;
use crate::graph::error::{GraphError, Result};
use crate::graph::types::{
    Connection, ConnectionType, Direction, MAX_STRENGTH, MIN_STRENGTH,
};
use crate::graph::{nodes, with_write_tx};

/// Column list shared by every connection SELECT.
const CONNECTION_COLUMNS: &str = "id, source_id, target_id, connection_type, strength, \
     direction, conscious_status, created_at, last_activated, activation_count, \
     description, attributes";

/// Result returned from a create_or_update operation.
#[derive(Debug, Serialize)]
pub struct CreateOrUpdateResult {
    /// The stored connection, post-merge.
    pub connection: Connection,
    /// `true` if an existing (source, target, type) edge was updated.
    pub merged: bool,
}

/// Predicates for a neighbors lookup.
#[derive(Debug, Clone)]
pub struct NeighborFilter {
    /// Restrict to these connection types. `None` means all types.
    pub types: Option<Vec<ConnectionType>>,
    pub min_strength: i64,
    pub only_conscious: bool,
    pub limit: usize,
}

impl Default for NeighborFilter {
    fn default() -> Self {
        Self {
            types: None,
            min_strength: MIN_STRENGTH,
            only_conscious: false,
            limit: 20,
        }
    }
}

/// A neighboring experience together with the connection that reaches it.
#[derive(Debug, Serialize)]
pub struct Neighbor {
    pub experience_id: i64,
    pub connection: Connection,
}

/// Create a connection, or merge into the existing edge for the same
/// (source, target, type) tuple.
///
/// On merge: strength, direction, and conscious status are overwritten,
/// the description only if one is given, attributes are shallow-merged,
/// `last_activated` is refreshed, and `activation_count` is incremented.
#[allow(clippy::too_many_arguments)]
pub fn create_or_update(
    conn: &mut Db,
    config: &GraphConfig,
    source_id: i64,
    target_id: i64,
    connection_type: ConnectionType,
    strength: i64,
    bidirectional: bool,
    conscious: bool,
    description: Option<&str>,
    attributes: Option<&serde_json::Value>,
) -> Result<CreateOrUpdateResult> {
    validate_strength(strength)?;
    let direction = if bidirectional {
        Direction::Bidirectional
    } else {
        Direction::Unidirectional
    };

    with_write_tx(conn, config.write_retry_budget, |tx| {
        if !nodes::experience_exists(tx, source_id)? {
            return Err(GraphError::NotFound(format!(
                "experience {source_id} not found"
            )));
        }
        if !nodes::experience_exists(tx, target_id)? {
            return Err(GraphError::NotFound(format!(
                "experience {target_id} not found"
            )));
        }

        let now = chrono::Utc::now().to_rfc3339();

        if let Some(existing) = find_edge(tx, source_id, target_id, connection_type)? {
            let merged_attributes =
                merge_attributes(existing.attributes.as_ref(), attributes);
            let attributes_json = merged_attributes.as_ref().map(|v| v.to_string());

            tx.execute(
                "UPDATE connections SET strength = ?1, direction = ?2, conscious_status = ?3, \
                 description = COALESCE(?4, description), attributes = ?5, \
                 last_activated = ?6, activation_count = activation_count + 1 \
                 WHERE id = ?7",
                params![
                    strength,
                    direction.as_str(),
                    conscious,
                    description,
                    attributes_json,
                    now,
                    existing.id,
                ],
            )?;
            write_audit_log(
                tx,
                "update",
                existing.id,
                Some(&serde_json::json!({"reason": "merge"})),
            )?;

            let connection = fetch_connection(tx, existing.id)?;
            tracing::debug!(id = connection.id, "merged into existing connection");
            return Ok(CreateOrUpdateResult {
                connection,
                merged: true,
            });
        }

        let attributes_json = attributes.map(|v| v.to_string());

        tx.execute(
            "INSERT INTO connections (source_id, target_id, connection_type, strength, \
             direction, conscious_status, created_at, last_activated, activation_count, \
             description, attributes) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, 1, ?8, ?9)",
            params![
                source_id,
                target_id,
                connection_type.as_str(),
                strength,
                direction.as_str(),
                conscious,
                now,
                description,
                attributes_json,
            ],
        )?;
        let id = tx.last_insert_rowid();
        write_audit_log(tx, "create", id, None)?;

        let connection = fetch_connection(tx, id)?;
        tracing::debug!(id, source_id, target_id, %connection_type, "connection created");
        Ok(CreateOrUpdateResult {
            connection,
            merged: false,
        })
    })
}

/// Fetch a connection by id.
pub fn get(conn: &Db, id: i64) -> Result<Connection> {
    let found = conn
        .query_row(
            &format!("SELECT {CONNECTION_COLUMNS} FROM connections WHERE id = ?1"),
            params![id],
            connection_from_row,
        )
        .optional()?;

    found.ok_or_else(|| GraphError::NotFound(format!("connection {id} not found")))
}

/// Experiences reachable from `experience_id` in one hop.
///
/// Covers edges where the experience is the source (any direction) and edges
/// where it is the target of a bidirectional connection. Ordered by strength
/// then activation count, both descending, and truncated to `filter.limit`.
pub fn neighbors(conn: &Db, experience_id: i64, filter: &NeighborFilter) -> Result<Vec<Neighbor>> {
    let mut sql = format!(
        "SELECT {CONNECTION_COLUMNS} FROM connections \
         WHERE (source_id = ?1 OR (target_id = ?1 AND direction = 'bidirectional')) \
           AND strength >= ?2"
    );
    if filter.only_conscious {
        sql.push_str(" AND conscious_status = 1");
    }
    // Trailing id keeps ties reproducible.
    sql.push_str(" ORDER BY strength DESC, activation_count DESC, id");

    let mut stmt = conn.prepare(&sql)?;
    let edges: Vec<Connection> = stmt
        .query_map(params![experience_id, filter.min_strength], connection_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Type filtering happens after the ordered scan so the limit still counts
    // only matching rows.
    let result = edges
        .into_iter()
        .filter(|c| match &filter.types {
            Some(types) => types.contains(&c.connection_type),
            None => true,
        })
        .take(filter.limit)
        .map(|connection| Neighbor {
            experience_id: if connection.source_id == experience_id {
                connection.target_id
            } else {
                connection.source_id
            },
            connection,
        })
        .collect();

    Ok(result)
}

/// Mark a connection as activated: refresh recency, bump the usage counter.
/// Strength is untouched.
pub fn activate(conn: &mut Db, config: &GraphConfig, id: i64) -> Result<Connection> {
    with_write_tx(conn, config.write_retry_budget, |tx| {
        let now = chrono::Utc::now().to_rfc3339();
        let rows = tx.execute(
            "UPDATE connections SET last_activated = ?1, activation_count = activation_count + 1 \
             WHERE id = ?2",
            params![now, id],
        )?;
        if rows == 0 {
            return Err(GraphError::NotFound(format!("connection {id} not found")));
        }
        write_audit_log(tx, "activate", id, None)?;
        fetch_connection(tx, id)
    })
}

/// Saturating strength increase, clamped to [1, 10].
pub fn strengthen(conn: &mut Db, config: &GraphConfig, id: i64, amount: i64) -> Result<Connection> {
    validate_amount(amount)?;
    shift_strength(conn, config, id, amount)
}

/// Saturating strength decrease, clamped to [1, 10].
pub fn weaken(conn: &mut Db, config: &GraphConfig, id: i64, amount: i64) -> Result<Connection> {
    validate_amount(amount)?;
    shift_strength(conn, config, id, -amount)
}

/// Set strength directly. The value must already be in [1, 10].
pub fn update_strength(
    conn: &mut Db,
    config: &GraphConfig,
    id: i64,
    value: i64,
) -> Result<Connection> {
    validate_strength(value)?;
    with_write_tx(conn, config.write_retry_budget, |tx| {
        set_strength(tx, id, value)
    })
}

fn shift_strength(conn: &mut Db, config: &GraphConfig, id: i64, delta: i64) -> Result<Connection> {
    with_write_tx(conn, config.write_retry_budget, |tx| {
        let current: Option<i64> = tx
            .query_row(
                "SELECT strength FROM connections WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let current = current
            .ok_or_else(|| GraphError::NotFound(format!("connection {id} not found")))?;

        let new_strength = (current + delta).clamp(MIN_STRENGTH, MAX_STRENGTH);
        set_strength(tx, id, new_strength)
    })
}

/// Write a new strength value inside an open transaction, refreshing the
/// activation fields and audit trail.
fn set_strength(tx: &Db, id: i64, value: i64) -> Result<Connection> {
    let now = chrono::Utc::now().to_rfc3339();
    let rows = tx.execute(
        "UPDATE connections SET strength = ?1, last_activated = ?2, \
         activation_count = activation_count + 1 WHERE id = ?3",
        params![value, now, id],
    )?;
    if rows == 0 {
        return Err(GraphError::NotFound(format!("connection {id} not found")));
    }
    write_audit_log(
        tx,
        "update",
        id,
        Some(&serde_json::json!({"strength": value})),
    )?;
    fetch_connection(tx, id)
}

fn validate_strength(strength: i64) -> Result<()> {
    if !(MIN_STRENGTH..=MAX_STRENGTH).contains(&strength) {
        return Err(GraphError::InvalidArgument(format!(
            "strength must be between {MIN_STRENGTH} and {MAX_STRENGTH}, got {strength}"
        )));
    }
    Ok(())
}

fn validate_amount(amount: i64) -> Result<()> {
    if amount < 1 {
        return Err(GraphError::InvalidArgument(format!(
            "amount must be at least 1, got {amount}"
        )));
    }
    Ok(())
}

/// Shallow merge of attribute bags: new keys added, existing keys
/// overwritten, untouched keys retained.
fn merge_attributes(
    existing: Option<&serde_json::Value>,
    incoming: Option<&serde_json::Value>,
) -> Option<serde_json::Value> {
    match (existing, incoming) {
        (Some(serde_json::Value::Object(old)), Some(serde_json::Value::Object(new))) => {
            let mut merged = old.clone();
            for (key, value) in new {
                merged.insert(key.clone(), value.clone());
            }
            Some(serde_json::Value::Object(merged))
        }
        (_, Some(new)) => Some(new.clone()),
        (Some(old), None) => Some(old.clone()),
        (None, None) => None,
    }
}

/// Write an entry to the connection_log audit table.
pub(crate) fn write_audit_log(
    conn: &Db,
    operation: &str,
    connection_id: i64,
    details: Option<&serde_json::Value>,
) -> rusqlite::Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    let details_json = details.map(|d| d.to_string());
    conn.execute(
        "INSERT INTO connection_log (operation, connection_id, details, created_at) \
         VALUES (?1, ?2, ?3, ?4)",
        params![operation, connection_id, details_json, now],
    )?;
    Ok(())
}

// ── Read helpers for the analytics modules ───────────────────────────────────

/// Map a row with [`CONNECTION_COLUMNS`] into a [`Connection`].
///
/// Out-of-range strength or an unrecognized enum value here means the row
/// bypassed the engine's clamp path entirely, so this fails loudly instead of
/// coercing.
pub(crate) fn connection_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Connection> {
    let id: i64 = row.get(0)?;
    let strength: i64 = row.get(4)?;
    let type_str: String = row.get(3)?;
    let direction_str: String = row.get(5)?;
    let attributes_raw: Option<String> = row.get(11)?;

    assert!(
        (MIN_STRENGTH..=MAX_STRENGTH).contains(&strength),
        "connection {id} has strength {strength} outside [{MIN_STRENGTH}, {MAX_STRENGTH}]"
    );
    let connection_type: ConnectionType = type_str
        .parse()
        .unwrap_or_else(|e: String| panic!("connection {id}: {e}"));
    let direction: Direction = direction_str
        .parse()
        .unwrap_or_else(|e: String| panic!("connection {id}: {e}"));
    let attributes = attributes_raw.map(|raw| {
        serde_json::from_str(&raw)
            .unwrap_or_else(|e| panic!("connection {id} has corrupt attributes: {e}"))
    });

    Ok(Connection {
        id,
        source_id: row.get(1)?,
        target_id: row.get(2)?,
        connection_type,
        strength,
        direction,
        conscious_status: row.get(6)?,
        created_at: row.get(7)?,
        last_activated: row.get(8)?,
        activation_count: row.get(9)?,
        description: row.get(10)?,
        attributes,
    })
}

/// Fetch a connection inside an open transaction, where absence is a bug.
fn fetch_connection(tx: &Db, id: i64) -> Result<Connection> {
    let connection = tx.query_row(
        &format!("SELECT {CONNECTION_COLUMNS} FROM connections WHERE id = ?1"),
        params![id],
        connection_from_row,
    )?;
    Ok(connection)
}

/// Look up the unique edge for a (source, target, type) tuple.
pub(crate) fn find_edge(
    conn: &Db,
    source_id: i64,
    target_id: i64,
    connection_type: ConnectionType,
) -> Result<Option<Connection>> {
    let found = conn
        .query_row(
            &format!(
                "SELECT {CONNECTION_COLUMNS} FROM connections \
                 WHERE source_id = ?1 AND target_id = ?2 AND connection_type = ?3"
            ),
            params![source_id, target_id, connection_type.as_str()],
            connection_from_row,
        )
        .optional()?;
    Ok(found)
}

/// Edges traversable out of an experience: outgoing edges of any direction
/// plus incoming bidirectional edges, at or above `min_strength`, ordered by
/// id so traversal output is reproducible.
pub(crate) fn traversable_edges(
    conn: &Db,
    experience_id: i64,
    min_strength: i64,
) -> Result<Vec<Connection>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONNECTION_COLUMNS} FROM connections \
         WHERE (source_id = ?1 OR (target_id = ?1 AND direction = 'bidirectional')) \
           AND strength >= ?2 \
         ORDER BY id"
    ))?;
    let edges = stmt
        .query_map(params![experience_id, min_strength], connection_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(edges)
}

/// Every edge touching an experience from either side, regardless of
/// direction. This is the "all connections of X" view used by the suggestion
/// engine.
pub(crate) fn touching_edges(conn: &Db, experience_id: i64) -> Result<Vec<Connection>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONNECTION_COLUMNS} FROM connections \
         WHERE source_id = ?1 OR target_id = ?1 \
         ORDER BY id"
    ))?;
    let edges = stmt
        .query_map(params![experience_id], connection_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(edges)
}

/// Endpoint pairs of every edge in the graph, for degree counting and
/// induced-subgraph construction.
pub(crate) fn edge_endpoints(conn: &Db) -> Result<Vec<(i64, i64)>> {
    let mut stmt = conn.prepare("SELECT source_id, target_id FROM connections ORDER BY id")?;
    let pairs = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;
    use crate::db;

    fn test_db() -> Db {
        db::open_memory_database().unwrap()
    }

    fn config() -> GraphConfig {
        GraphConfig::default()
    }

    /// Insert an experience row directly (the node store is external).
    fn seed_experience(conn: &Db, content: &str) -> i64 {
        conn.execute(
            "INSERT INTO experiences (content, created_at) VALUES (?1, ?2)",
            params![content, chrono::Utc::now().to_rfc3339()],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    fn create(
        conn: &mut Db,
        source: i64,
        target: i64,
        ct: ConnectionType,
        strength: i64,
    ) -> CreateOrUpdateResult {
        create_or_update(
            conn,
            &config(),
            source,
            target,
            ct,
            strength,
            false,
            true,
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn create_and_get() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "saw a heron at the lake");
        let b = seed_experience(&conn, "lakes attract wading birds");

        let result = create(&mut conn, a, b, ConnectionType::Semantic, 7);
        assert!(!result.merged);
        assert_eq!(result.connection.strength, 7);
        assert_eq!(result.connection.activation_count, 1);
        assert_eq!(result.connection.direction, Direction::Unidirectional);

        let fetched = get(&conn, result.connection.id).unwrap();
        assert_eq!(fetched.source_id, a);
        assert_eq!(fetched.target_id, b);
        assert_eq!(fetched.connection_type, ConnectionType::Semantic);
    }

    #[test]
    fn create_twice_merges_into_one_row() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "a");
        let b = seed_experience(&conn, "b");

        let first = create(&mut conn, a, b, ConnectionType::Causal, 5);
        let second = create_or_update(
            &mut conn,
            &config(),
            a,
            b,
            ConnectionType::Causal,
            8,
            true,
            true,
            Some("direct cause"),
            None,
        )
        .unwrap();

        assert!(second.merged);
        assert_eq!(second.connection.id, first.connection.id);
        assert_eq!(second.connection.strength, 8);
        assert_eq!(second.connection.direction, Direction::Bidirectional);
        assert_eq!(second.connection.activation_count, 2);
        assert_eq!(second.connection.description.as_deref(), Some("direct cause"));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM connections", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn merge_keeps_description_when_none_given() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "a");
        let b = seed_experience(&conn, "b");

        create_or_update(
            &mut conn,
            &config(),
            a,
            b,
            ConnectionType::Thematic,
            5,
            false,
            true,
            Some("original note"),
            None,
        )
        .unwrap();
        let merged = create(&mut conn, a, b, ConnectionType::Thematic, 6);
        assert_eq!(merged.connection.description.as_deref(), Some("original note"));
    }

    #[test]
    fn same_pair_different_type_is_a_second_edge() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "a");
        let b = seed_experience(&conn, "b");

        create(&mut conn, a, b, ConnectionType::Causal, 5);
        let result = create(&mut conn, a, b, ConnectionType::Emotional, 5);
        assert!(!result.merged);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM connections", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn create_rejects_out_of_range_strength() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "a");
        let b = seed_experience(&conn, "b");

        for bad in [0, -3, 11, 100] {
            let result = create_or_update(
                &mut conn,
                &config(),
                a,
                b,
                ConnectionType::Semantic,
                bad,
                false,
                true,
                None,
                None,
            );
            assert!(matches!(result, Err(GraphError::InvalidArgument(_))));
        }
    }

    #[test]
    fn create_rejects_missing_nodes() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "a");

        let result = create_or_update(
            &mut conn,
            &config(),
            a,
            9999,
            ConnectionType::Semantic,
            5,
            false,
            true,
            None,
            None,
        );
        assert!(matches!(result, Err(GraphError::NotFound(_))));

        let result = create_or_update(
            &mut conn,
            &config(),
            9999,
            a,
            ConnectionType::Semantic,
            5,
            false,
            true,
            None,
            None,
        );
        assert!(matches!(result, Err(GraphError::NotFound(_))));
    }

    #[test]
    fn get_missing_is_not_found() {
        let conn = test_db();
        assert!(matches!(get(&conn, 42), Err(GraphError::NotFound(_))));
    }

    #[test]
    fn activate_bumps_count_but_not_strength() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "a");
        let b = seed_experience(&conn, "b");
        let id = create(&mut conn, a, b, ConnectionType::Reference, 4).connection.id;

        let activated = activate(&mut conn, &config(), id).unwrap();
        assert_eq!(activated.activation_count, 2);
        assert_eq!(activated.strength, 4);
    }

    #[test]
    fn strengthen_and_weaken_saturate() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "a");
        let b = seed_experience(&conn, "b");
        let id = create(&mut conn, a, b, ConnectionType::Semantic, 9).connection.id;

        let up = strengthen(&mut conn, &config(), id, 50).unwrap();
        assert_eq!(up.strength, 10);

        let down = weaken(&mut conn, &config(), id, 50).unwrap();
        assert_eq!(down.strength, 1);

        let up_one = strengthen(&mut conn, &config(), id, 1).unwrap();
        assert_eq!(up_one.strength, 2);
    }

    #[test]
    fn strengthen_rejects_non_positive_amount() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "a");
        let b = seed_experience(&conn, "b");
        let id = create(&mut conn, a, b, ConnectionType::Semantic, 5).connection.id;

        assert!(matches!(
            strengthen(&mut conn, &config(), id, 0),
            Err(GraphError::InvalidArgument(_))
        ));
        assert!(matches!(
            weaken(&mut conn, &config(), id, -2),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn update_strength_sets_and_validates() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "a");
        let b = seed_experience(&conn, "b");
        let id = create(&mut conn, a, b, ConnectionType::Semantic, 5).connection.id;

        let updated = update_strength(&mut conn, &config(), id, 9).unwrap();
        assert_eq!(updated.strength, 9);

        assert!(matches!(
            update_strength(&mut conn, &config(), id, 0),
            Err(GraphError::InvalidArgument(_))
        ));
        assert!(matches!(
            update_strength(&mut conn, &config(), id, 11),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn neighbors_respects_direction_and_ordering() {
        let mut conn = test_db();
        let center = seed_experience(&conn, "center");
        let out = seed_experience(&conn, "out");
        let both = seed_experience(&conn, "both");
        let inward = seed_experience(&conn, "inward");

        // center -> out (uni), both -> center (bi), inward -> center (uni)
        create(&mut conn, center, out, ConnectionType::Semantic, 4);
        create_or_update(
            &mut conn,
            &config(),
            both,
            center,
            ConnectionType::Contextual,
            9,
            true,
            true,
            None,
            None,
        )
        .unwrap();
        create(&mut conn, inward, center, ConnectionType::Causal, 8);

        let found = neighbors(&conn, center, &NeighborFilter::default()).unwrap();
        // The unidirectional inward edge must not appear.
        let ids: Vec<i64> = found.iter().map(|n| n.experience_id).collect();
        assert_eq!(ids, vec![both, out]); // strength 9 before strength 4
    }

    #[test]
    fn neighbors_filters_types_strength_and_conscious() {
        let mut conn = test_db();
        let center = seed_experience(&conn, "center");
        let weak = seed_experience(&conn, "weak");
        let strong = seed_experience(&conn, "strong");
        let hidden = seed_experience(&conn, "hidden");

        create(&mut conn, center, weak, ConnectionType::Semantic, 2);
        create(&mut conn, center, strong, ConnectionType::Causal, 8);
        create_or_update(
            &mut conn,
            &config(),
            center,
            hidden,
            ConnectionType::Temporal,
            8,
            false,
            false, // background-only
            None,
            None,
        )
        .unwrap();

        let filter = NeighborFilter {
            min_strength: 5,
            ..Default::default()
        };
        let ids: Vec<i64> = neighbors(&conn, center, &filter)
            .unwrap()
            .iter()
            .map(|n| n.experience_id)
            .collect();
        assert_eq!(ids, vec![strong, hidden]);

        let filter = NeighborFilter {
            only_conscious: true,
            min_strength: 5,
            ..Default::default()
        };
        let ids: Vec<i64> = neighbors(&conn, center, &filter)
            .unwrap()
            .iter()
            .map(|n| n.experience_id)
            .collect();
        assert_eq!(ids, vec![strong]);

        let filter = NeighborFilter {
            types: Some(vec![ConnectionType::Semantic]),
            ..Default::default()
        };
        let ids: Vec<i64> = neighbors(&conn, center, &filter)
            .unwrap()
            .iter()
            .map(|n| n.experience_id)
            .collect();
        assert_eq!(ids, vec![weak]);
    }

    #[test]
    fn neighbors_truncates_to_limit() {
        let mut conn = test_db();
        let center = seed_experience(&conn, "center");
        for i in 0..5 {
            let other = seed_experience(&conn, &format!("other {i}"));
            create(&mut conn, center, other, ConnectionType::Association, 5);
        }

        let filter = NeighborFilter {
            limit: 3,
            ..Default::default()
        };
        assert_eq!(neighbors(&conn, center, &filter).unwrap().len(), 3);
    }

    #[test]
    fn attributes_shallow_merge() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "a");
        let b = seed_experience(&conn, "b");

        create_or_update(
            &mut conn,
            &config(),
            a,
            b,
            ConnectionType::Semantic,
            5,
            false,
            true,
            None,
            Some(&serde_json::json!({"origin": "manual", "weight": 1})),
        )
        .unwrap();

        let merged = create_or_update(
            &mut conn,
            &config(),
            a,
            b,
            ConnectionType::Semantic,
            5,
            false,
            true,
            None,
            Some(&serde_json::json!({"weight": 2, "note": "revisited"})),
        )
        .unwrap();

        let attrs = merged.connection.attributes.unwrap();
        assert_eq!(attrs["origin"], "manual"); // retained
        assert_eq!(attrs["weight"], 2); // overwritten
        assert_eq!(attrs["note"], "revisited"); // added
    }

    #[test]
    fn audit_log_written_on_create_and_activate() {
        let mut conn = test_db();
        let a = seed_experience(&conn, "a");
        let b = seed_experience(&conn, "b");
        let id = create(&mut conn, a, b, ConnectionType::Semantic, 5).connection.id;
        activate(&mut conn, &config(), id).unwrap();

        let ops: Vec<String> = conn
            .prepare("SELECT operation FROM connection_log WHERE connection_id = ?1 ORDER BY id")
            .unwrap()
            .query_map(params![id], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(ops, vec!["create".to_string(), "activate".to_string()]);
    }
}
