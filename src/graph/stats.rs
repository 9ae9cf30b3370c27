//! Whole-network statistics over the connection graph.

use rusqlite::Connection as Db;
use serde::Serialize;
use std::collections::HashMap;

use crate::graph::error::Result;
use crate::graph::types::ConnectionType;

/// Response from network_stats.
#[derive(Debug, Serialize)]
pub struct NetworkStatsResponse {
    pub total_connections: u64,
    /// Experiences that appear in at least one connection.
    pub connected_experiences: u64,
    pub total_experiences: u64,
    pub avg_strength: f64,
    /// Connections per connected experience.
    pub avg_degree: f64,
    /// Share of all experiences that participate in the graph.
    pub network_coverage: f64,
    pub by_type: HashMap<String, u64>,
}

/// Count connections per type. Every type is present, zero-filled.
pub fn type_distribution(conn: &Db) -> Result<HashMap<String, u64>> {
    let mut map = HashMap::new();
    for ct in ConnectionType::ALL {
        map.insert(ct.as_str().to_string(), 0);
    }

    let mut stmt =
        conn.prepare("SELECT connection_type, COUNT(*) FROM connections GROUP BY connection_type")?;
    let rows: Vec<(String, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    for (connection_type, count) in rows {
        map.insert(connection_type, count as u64);
    }
    Ok(map)
}

/// Compute summary statistics for the whole graph.
pub fn network_stats(conn: &Db) -> Result<NetworkStatsResponse> {
    // Snapshot so the counts agree with each other.
    let tx = conn.unchecked_transaction()?;

    let total_connections: u64 =
        tx.query_row("SELECT COUNT(*) FROM connections", [], |row| {
            row.get::<_, i64>(0)
        })? as u64;
    let connected_experiences: u64 = tx.query_row(
        "SELECT COUNT(*) FROM (SELECT source_id AS id FROM connections \
         UNION SELECT target_id FROM connections)",
        [],
        |row| row.get::<_, i64>(0),
    )? as u64;
    let total_experiences: u64 =
        tx.query_row("SELECT COUNT(*) FROM experiences", [], |row| {
            row.get::<_, i64>(0)
        })? as u64;
    let avg_strength: Option<f64> =
        tx.query_row("SELECT AVG(strength) FROM connections", [], |row| row.get(0))?;
    let by_type = type_distribution(&tx)?;
    drop(tx);

    let avg_degree = if connected_experiences > 0 {
        total_connections as f64 / connected_experiences as f64
    } else {
        0.0
    };
    let network_coverage = if total_experiences > 0 {
        connected_experiences as f64 / total_experiences as f64
    } else {
        0.0
    };

    Ok(NetworkStatsResponse {
        total_connections,
        connected_experiences,
        total_experiences,
        avg_strength: avg_strength.unwrap_or(0.0),
        avg_degree,
        network_coverage,
        by_type,
    })
}
