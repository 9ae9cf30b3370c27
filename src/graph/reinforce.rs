//! Temporal reinforcement of experiences that co-occur within a context.
//!
//! Experiences observed close together in time inside the same context get a
//! temporal, background (non-conscious) link; repeated co-occurrence
//! strengthens it with diminishing returns as it approaches saturation.

use chrono::DateTime;
use rusqlite::{params, Connection as Db};
use serde::Serialize;

use crate::config::GraphConfig;
use crate::graph::connections::{find_edge, write_audit_log};
use crate::graph::error::{GraphError, Result};
use crate::graph::types::{ConnectionType, MAX_STRENGTH};
use crate::graph::{nodes, with_write_tx};

/// Strength given to a freshly created co-occurrence link.
const INITIAL_COOCCURRENCE_STRENGTH: i64 = 3;

/// Result returned from a reinforcement pass.
#[derive(Debug, Serialize)]
pub struct ReinforceResult {
    /// Unordered pairs whose timestamps fell inside the window.
    pub pairs_in_window: usize,
    /// Existing temporal edges whose strength increased.
    pub strengthened: usize,
    /// Temporal edges created by this pass.
    pub created: usize,
}

/// Strengthen or create temporal links between every unordered pair (i < j
/// by id) of experiences in `context_id` whose timestamps differ by less
/// than `window_seconds`.
///
/// An existing edge is reinforced to
/// `min(10, strength + max(min_increase, (10 − strength) / 2))` — the closer
/// it is to saturation, the smaller the step — and only if that actually
/// increases it. A missing edge is created bidirectional, non-conscious, at
/// strength 3.
///
/// Each pair commits in its own short transaction, so a fault partway
/// through leaves the processed prefix durable and only the remainder needs
/// retrying. Re-running on identical input reinforces rather than
/// duplicates.
pub fn strengthen_by_cooccurrence(
    conn: &mut Db,
    config: &GraphConfig,
    context_id: i64,
    window_seconds: i64,
    min_increase: i64,
) -> Result<ReinforceResult> {
    if window_seconds <= 0 {
        return Err(GraphError::InvalidArgument(format!(
            "window_seconds must be positive, got {window_seconds}"
        )));
    }
    if min_increase < 0 {
        return Err(GraphError::InvalidArgument(format!(
            "min_increase must not be negative, got {min_increase}"
        )));
    }
    if !nodes::context_exists(conn, context_id)? {
        return Err(GraphError::NotFound(format!(
            "context {context_id} not found"
        )));
    }

    let members = nodes::context_members(conn, context_id)?;
    let timestamps = members
        .iter()
        .map(|(id, created_at)| {
            let ts = DateTime::parse_from_rfc3339(created_at).map_err(|e| {
                GraphError::InvalidArgument(format!(
                    "experience {id} has unparseable timestamp {created_at:?}: {e}"
                ))
            })?;
            Ok((*id, ts.timestamp()))
        })
        .collect::<Result<Vec<(i64, i64)>>>()?;

    let mut result = ReinforceResult {
        pairs_in_window: 0,
        strengthened: 0,
        created: 0,
    };

    // Members come back ordered by id, so (i, j) with i < j enumerates each
    // unordered pair exactly once.
    for (idx, &(first_id, first_ts)) in timestamps.iter().enumerate() {
        for &(second_id, second_ts) in &timestamps[idx + 1..] {
            if (first_ts - second_ts).abs() >= window_seconds {
                continue;
            }
            result.pairs_in_window += 1;

            // One short transaction per pair.
            let outcome = with_write_tx(conn, config.write_retry_budget, |tx| {
                reinforce_pair(tx, first_id, second_id, min_increase)
            })?;
            match outcome {
                PairOutcome::Strengthened => result.strengthened += 1,
                PairOutcome::Created => result.created += 1,
                PairOutcome::Saturated => {}
            }
        }
    }

    tracing::info!(
        context_id,
        pairs = result.pairs_in_window,
        strengthened = result.strengthened,
        created = result.created,
        "co-occurrence reinforcement complete"
    );
    Ok(result)
}

enum PairOutcome {
    Strengthened,
    Created,
    Saturated,
}

fn reinforce_pair(
    tx: &Db,
    source_id: i64,
    target_id: i64,
    min_increase: i64,
) -> Result<PairOutcome> {
    if let Some(existing) = find_edge(tx, source_id, target_id, ConnectionType::Temporal)? {
        let increase = min_increase.max((MAX_STRENGTH - existing.strength) / 2);
        let new_strength = (existing.strength + increase).min(MAX_STRENGTH);
        if new_strength <= existing.strength {
            return Ok(PairOutcome::Saturated);
        }

        let now = chrono::Utc::now().to_rfc3339();
        tx.execute(
            "UPDATE connections SET strength = ?1, last_activated = ?2, \
             activation_count = activation_count + 1 WHERE id = ?3",
            params![new_strength, now, existing.id],
        )?;
        write_audit_log(
            tx,
            "reinforce",
            existing.id,
            Some(&serde_json::json!({"from": existing.strength, "to": new_strength})),
        )?;
        return Ok(PairOutcome::Strengthened);
    }

    let now = chrono::Utc::now().to_rfc3339();
    tx.execute(
        "INSERT INTO connections (source_id, target_id, connection_type, strength, \
         direction, conscious_status, created_at, last_activated, activation_count) \
         VALUES (?1, ?2, 'temporal', ?3, 'bidirectional', 0, ?4, ?4, 1)",
        params![source_id, target_id, INITIAL_COOCCURRENCE_STRENGTH, now],
    )?;
    let id = tx.last_insert_rowid();
    write_audit_log(
        tx,
        "create",
        id,
        Some(&serde_json::json!({"reason": "cooccurrence"})),
    )?;
    Ok(PairOutcome::Created)
}
