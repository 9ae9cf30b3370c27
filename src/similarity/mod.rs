//! The external similarity-score boundary.
//!
//! Embedding and similarity live outside this engine. When a provider is
//! available, the suggestion engine uses its scores to filter and rank
//! candidates; when not, suggestions fall back to pure graph structure.

use anyhow::Result;

/// Source of content-similarity scores between two experiences.
///
/// Implementations are expected to return scores in `[0.0, 1.0]`, and `None`
/// when either experience has no embedding. All methods are synchronous.
pub trait SimilarityProvider: Send + Sync {
    /// Similarity between the contents of two experiences, or `None` when no
    /// score is available for the pair.
    fn score(&self, first_id: i64, second_id: i64) -> Result<Option<f64>>;
}

/// A provider that never has a score. Useful where suggestion ranking should
/// rely on graph structure alone.
#[derive(Debug, Default)]
pub struct NoSimilarity;

impl SimilarityProvider for NoSimilarity {
    fn score(&self, _first_id: i64, _second_id: i64) -> Result<Option<f64>> {
        Ok(None)
    }
}
