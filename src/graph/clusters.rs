//! Connected-component detection among highly connected experiences.
//!
//! Hubs are selected by their degree across the FULL graph, but components
//! are computed on the induced subgraph (hub-to-hub edges only). The two
//! measures differ: a node can clear the degree threshold through
//! connections to non-hubs and still have no hub neighbors at all — such a
//! hub comes back as its own singleton cluster.

use rusqlite::Connection as Db;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::config::GraphConfig;
use crate::graph::connections;
use crate::graph::error::{GraphError, Result};

/// Find clusters of experiences whose full-graph degree (incoming plus
/// outgoing) is at least `min_connections`.
///
/// Induced edges are treated as undirected regardless of their stored
/// direction. Output is deterministic: ids ascend within each cluster and
/// clusters are ordered by their smallest member.
pub fn find_clusters(
    conn: &Db,
    config: &GraphConfig,
    min_connections: usize,
) -> Result<Vec<Vec<i64>>> {
    // Snapshot for the duration of the scan.
    let tx = conn.unchecked_transaction()?;
    let endpoints = connections::edge_endpoints(&tx)?;
    drop(tx);

    // Degree over the full edge table.
    let mut degree: HashMap<i64, usize> = HashMap::new();
    for &(source, target) in &endpoints {
        *degree.entry(source).or_insert(0) += 1;
        *degree.entry(target).or_insert(0) += 1;
    }

    let hubs: BTreeSet<i64> = degree
        .iter()
        .filter(|(_, &d)| d >= min_connections)
        .map(|(&id, _)| id)
        .collect();

    if hubs.len() > config.max_hubs {
        return Err(GraphError::ResourceExhausted(format!(
            "cluster analysis selected {} hubs, cap is {}",
            hubs.len(),
            config.max_hubs
        )));
    }

    // Induced subgraph: only edges with both endpoints in the hub set,
    // adjacency symmetric.
    let mut adjacency: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
    for &hub in &hubs {
        adjacency.insert(hub, BTreeSet::new());
    }
    for &(source, target) in &endpoints {
        if hubs.contains(&source) && hubs.contains(&target) {
            adjacency.get_mut(&source).unwrap().insert(target);
            adjacency.get_mut(&target).unwrap().insert(source);
        }
    }

    // Iterative DFS over the induced subgraph.
    let mut visited: HashSet<i64> = HashSet::new();
    let mut clusters: Vec<Vec<i64>> = Vec::new();

    for &hub in &hubs {
        if visited.contains(&hub) {
            continue;
        }
        let mut cluster = Vec::new();
        let mut stack = vec![hub];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            cluster.push(current);
            for &neighbor in &adjacency[&current] {
                if !visited.contains(&neighbor) {
                    stack.push(neighbor);
                }
            }
        }
        cluster.sort_unstable();
        clusters.push(cluster);
    }

    // Hubs iterate in ascending order, so clusters already come out ordered
    // by smallest member.
    tracing::debug!(
        hubs = hubs.len(),
        clusters = clusters.len(),
        "cluster analysis complete"
    );
    Ok(clusters)
}
