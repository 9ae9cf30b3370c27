//! Depth-bounded enumeration of simple paths between two experiences.
//!
//! Cycle avoidance uses a per-path visited set carried on the recursion
//! stack — pushed on descent, popped on backtrack — so a node excluded on one
//! branch may legally reappear on a sibling branch. A global visited set
//! would silently prune legitimate diamond-shaped paths.

use rusqlite::Connection as Db;
use serde::Serialize;
use std::collections::HashSet;

use crate::config::GraphConfig;
use crate::graph::connections;
use crate::graph::error::{GraphError, Result};
use crate::graph::nodes;
use crate::graph::types::Connection;

/// One hop along a path: the experience reached and the connection used.
#[derive(Debug, Clone, Serialize)]
pub struct PathStep {
    pub experience_id: i64,
    pub connection: Connection,
}

/// A path from start to end, as the sequence of hops after the start node.
pub type Path = Vec<PathStep>;

/// Enumerate every simple path from `start_id` to `end_id` using at most
/// `max_depth` edges, following only edges with strength ≥ `min_strength`.
///
/// At each node the candidate hops are outgoing edges (any direction) and
/// incoming bidirectional edges, visited in edge-id order so output is
/// reproducible. The whole search runs against one read snapshot.
///
/// The search is worst-case exponential, so it is bounded by the configured
/// caps on returned paths and node expansions; exceeding either surfaces
/// [`GraphError::ResourceExhausted`] instead of a silently truncated result.
pub fn find_paths(
    conn: &Db,
    config: &GraphConfig,
    start_id: i64,
    end_id: i64,
    max_depth: usize,
    min_strength: i64,
) -> Result<Vec<Path>> {
    // Snapshot for the duration of the search.
    let tx = conn.unchecked_transaction()?;

    if !nodes::experience_exists(&tx, start_id)? {
        return Err(GraphError::InvalidArgument(format!(
            "start experience {start_id} not found"
        )));
    }
    if !nodes::experience_exists(&tx, end_id)? {
        return Err(GraphError::InvalidArgument(format!(
            "end experience {end_id} not found"
        )));
    }

    let mut search = Search {
        tx: &tx,
        end_id,
        max_depth,
        min_strength,
        max_paths: config.max_paths,
        max_visited: config.max_visited_nodes,
        expansions: 0,
        on_path: HashSet::new(),
        current: Vec::new(),
        paths: Vec::new(),
    };
    search.descend(start_id, 0)?;

    tracing::debug!(
        start_id,
        end_id,
        paths = search.paths.len(),
        expansions = search.expansions,
        "path search complete"
    );
    Ok(search.paths)
}

struct Search<'a> {
    tx: &'a rusqlite::Transaction<'a>,
    end_id: i64,
    max_depth: usize,
    min_strength: i64,
    max_paths: usize,
    max_visited: usize,
    expansions: usize,
    /// Nodes on the path currently being built.
    on_path: HashSet<i64>,
    current: Vec<PathStep>,
    paths: Vec<Path>,
}

impl Search<'_> {
    fn descend(&mut self, current_id: i64, depth: usize) -> Result<()> {
        if current_id == self.end_id && depth > 0 {
            if self.paths.len() >= self.max_paths {
                return Err(GraphError::ResourceExhausted(format!(
                    "path search found more than {} paths",
                    self.max_paths
                )));
            }
            self.paths.push(self.current.clone());
            return Ok(());
        }
        if depth == self.max_depth {
            return Ok(());
        }

        self.expansions += 1;
        if self.expansions > self.max_visited {
            return Err(GraphError::ResourceExhausted(format!(
                "path search visited more than {} nodes",
                self.max_visited
            )));
        }

        self.on_path.insert(current_id);
        let edges = connections::traversable_edges(self.tx, current_id, self.min_strength)?;
        for edge in edges {
            let next = if edge.source_id == current_id {
                edge.target_id
            } else {
                edge.source_id
            };
            if self.on_path.contains(&next) {
                continue;
            }
            self.current.push(PathStep {
                experience_id: next,
                connection: edge,
            });
            self.descend(next, depth + 1)?;
            self.current.pop();
        }
        self.on_path.remove(&current_id);
        Ok(())
    }
}
