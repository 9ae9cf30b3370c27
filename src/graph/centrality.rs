//! Degree- and strength-weighted importance of a single experience.

use rusqlite::{params, Connection as Db};
use serde::Serialize;

use crate::graph::error::{GraphError, Result};
use crate::graph::nodes;

/// Centrality metrics for one experience.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralityReport {
    /// Edges pointing at the experience.
    pub in_degree: u64,
    /// Edges leaving the experience.
    pub out_degree: u64,
    /// in_degree + out_degree.
    pub degree_centrality: u64,
    /// Mean strength over incoming edges, 0 if there are none.
    pub avg_incoming_strength: f64,
    /// Mean strength over outgoing edges, 0 if there are none.
    pub avg_outgoing_strength: f64,
    /// avg_incoming_strength × in_degree + avg_outgoing_strength × out_degree.
    pub weighted_centrality: f64,
}

/// Compute centrality for an experience from the current edge set.
pub fn centrality(conn: &Db, experience_id: i64) -> Result<CentralityReport> {
    // Snapshot so the four aggregates agree with each other.
    let tx = conn.unchecked_transaction()?;

    if !nodes::experience_exists(&tx, experience_id)? {
        return Err(GraphError::NotFound(format!(
            "experience {experience_id} not found"
        )));
    }

    let (in_degree, avg_incoming_strength): (u64, Option<f64>) = tx.query_row(
        "SELECT COUNT(*), AVG(strength) FROM connections WHERE target_id = ?1",
        params![experience_id],
        |row| Ok((row.get::<_, i64>(0)? as u64, row.get(1)?)),
    )?;
    let (out_degree, avg_outgoing_strength): (u64, Option<f64>) = tx.query_row(
        "SELECT COUNT(*), AVG(strength) FROM connections WHERE source_id = ?1",
        params![experience_id],
        |row| Ok((row.get::<_, i64>(0)? as u64, row.get(1)?)),
    )?;

    let avg_incoming_strength = avg_incoming_strength.unwrap_or(0.0);
    let avg_outgoing_strength = avg_outgoing_strength.unwrap_or(0.0);

    Ok(CentralityReport {
        in_degree,
        out_degree,
        degree_centrality: in_degree + out_degree,
        avg_incoming_strength,
        avg_outgoing_strength,
        weighted_centrality: avg_incoming_strength * in_degree as f64
            + avg_outgoing_strength * out_degree as f64,
    })
}
