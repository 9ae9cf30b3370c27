//! Associative memory graph engine — typed, weighted links between experience records.
//!
//! Synapse manages the connection graph that turns a flat store of experience
//! records into an associative memory: every link has a type (temporal, causal,
//! semantic, ...), an integer strength from 1 to 10, a direction, and an
//! activation history. On top of that graph it provides path search, cluster
//! detection, centrality scoring, temporal co-occurrence reinforcement, and
//! heuristic link suggestion.
//!
//! Experience records themselves are owned by the backing store — the engine
//! never creates or deletes them, it only links them.
//!
//! # Architecture
//!
//! - **Storage**: SQLite (WAL mode) holding the `experiences` and `connections`
//!   tables; all mutations run in short immediate transactions with a bounded
//!   busy-retry loop
//! - **Analytics**: traversal, clustering, centrality, and suggestion read the
//!   edge set through a single snapshot transaction per call
//! - **Similarity**: consumed from an external [`similarity::SimilarityProvider`]
//!   when one is available; the engine computes no embeddings itself
//!
//! # Modules
//!
//! - [`cli`] — Terminal commands for inspecting and maintaining a graph
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, and migrations
//! - [`graph`] — Core engine: connections, traversal, clusters, centrality,
//!   reinforcement, suggestions, and network statistics
//! - [`similarity`] — The external similarity-score boundary

pub mod cli;
pub mod config;
pub mod db;
pub mod graph;
pub mod similarity;
