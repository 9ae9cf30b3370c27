//! Heuristic suggestion of new connections from shared neighbors.
//!
//! Candidates sit at exactly two hops: experiences reachable through a
//! direct neighbor that are not already connected to the start. The more
//! distinct two-hop paths lead to a candidate, the stronger the structural
//! signal. When the external similarity provider can score a pair, that
//! score gates and refines the ranking.

use rusqlite::Connection as Db;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::graph::connections;
use crate::graph::error::{GraphError, Result};
use crate::graph::nodes;
use crate::graph::types::ConnectionType;
use crate::similarity::SimilarityProvider;

/// A proposed new connection.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSuggestion {
    /// The experience to connect to.
    pub experience_id: i64,
    /// Most frequent type among the two-hop paths reaching the candidate.
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    /// Similarity when the provider had one, otherwise the mean strength of
    /// the connecting second-hop edges.
    pub score: f64,
    /// Number of distinct two-hop paths from the start to the candidate.
    pub shared_paths: usize,
}

/// Suggest up to `max_suggestions` new connections for an experience.
///
/// Ranking is primarily by the number of distinct two-hop paths, descending;
/// similarity (when available) is the secondary key and candidates scoring
/// below `min_similarity` are dropped.
pub fn suggest_connections(
    conn: &Db,
    experience_id: i64,
    min_similarity: f64,
    max_suggestions: usize,
    provider: Option<&dyn SimilarityProvider>,
) -> Result<Vec<ConnectionSuggestion>> {
    // Snapshot for the duration of the two-hop walk.
    let tx = conn.unchecked_transaction()?;

    if !nodes::experience_exists(&tx, experience_id)? {
        return Err(GraphError::NotFound(format!(
            "experience {experience_id} not found"
        )));
    }

    // Direct neighborhood, regardless of direction — an existing link in
    // either role disqualifies a candidate.
    let mut direct: BTreeSet<i64> = BTreeSet::new();
    for edge in connections::touching_edges(&tx, experience_id)? {
        direct.insert(other_endpoint(&edge, experience_id));
    }

    // Walk the second hop and accumulate per-candidate evidence.
    let mut candidates: BTreeMap<i64, CandidateEvidence> = BTreeMap::new();
    for &neighbor in &direct {
        for edge in connections::touching_edges(&tx, neighbor)? {
            let candidate = other_endpoint(&edge, neighbor);
            if candidate == experience_id || direct.contains(&candidate) {
                continue;
            }
            let evidence = candidates.entry(candidate).or_default();
            evidence.paths += 1;
            evidence.strength_sum += edge.strength;
            *evidence.type_counts.entry(edge.connection_type).or_insert(0) += 1;
        }
    }
    drop(tx);

    let mut suggestions = Vec::new();
    for (candidate, evidence) in candidates {
        let similarity = match provider {
            Some(p) => p
                .score(experience_id, candidate)
                .map_err(GraphError::Similarity)?,
            None => None,
        };
        let score = match similarity {
            Some(sim) if sim < min_similarity => continue,
            Some(sim) => sim,
            None => evidence.strength_sum as f64 / evidence.paths as f64,
        };
        suggestions.push(ConnectionSuggestion {
            experience_id: candidate,
            connection_type: evidence.dominant_type(),
            score,
            shared_paths: evidence.paths,
        });
    }

    suggestions.sort_by(|a, b| {
        b.shared_paths
            .cmp(&a.shared_paths)
            .then(b.score.total_cmp(&a.score))
            .then(a.experience_id.cmp(&b.experience_id))
    });
    suggestions.truncate(max_suggestions);

    tracing::debug!(
        experience_id,
        suggestions = suggestions.len(),
        "connection suggestion complete"
    );
    Ok(suggestions)
}

#[derive(Default)]
struct CandidateEvidence {
    paths: usize,
    strength_sum: i64,
    type_counts: BTreeMap<ConnectionType, usize>,
}

impl CandidateEvidence {
    /// Most frequent connecting type; ties resolve to the earliest type in
    /// canonical order.
    fn dominant_type(&self) -> ConnectionType {
        let mut best = ConnectionType::Other;
        let mut best_count = 0;
        for (&connection_type, &count) in &self.type_counts {
            if count > best_count {
                best = connection_type;
                best_count = count;
            }
        }
        best
    }
}

fn other_endpoint(edge: &crate::graph::types::Connection, from: i64) -> i64 {
    if edge.source_id == from {
        edge.target_id
    } else {
        edge.source_id
    }
}
