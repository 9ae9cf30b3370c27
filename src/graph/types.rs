//! Core connection type definitions.
//!
//! Defines [`ConnectionType`] (the closed twelve-value link taxonomy),
//! [`Direction`], and [`Connection`] (a full edge record). Both enumerations
//! are validated at the boundary — unknown strings never enter the graph.

use serde::{Deserialize, Serialize};

/// Inclusive strength bounds for every connection.
pub const MIN_STRENGTH: i64 = 1;
pub const MAX_STRENGTH: i64 = 10;

/// Strength assigned when the caller does not specify one.
pub const DEFAULT_STRENGTH: i64 = 5;

/// The kind of association a connection expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    /// Close in time — usually formed by co-occurrence rather than deliberately.
    Temporal,
    Causal,
    Semantic,
    Contextual,
    Thematic,
    Emotional,
    Analogy,
    Contrast,
    Elaboration,
    Reference,
    Association,
    Other,
}

impl ConnectionType {
    /// All types, in canonical order. Used for zero-filled distributions.
    pub const ALL: [ConnectionType; 12] = [
        Self::Temporal,
        Self::Causal,
        Self::Semantic,
        Self::Contextual,
        Self::Thematic,
        Self::Emotional,
        Self::Analogy,
        Self::Contrast,
        Self::Elaboration,
        Self::Reference,
        Self::Association,
        Self::Other,
    ];

    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temporal => "temporal",
            Self::Causal => "causal",
            Self::Semantic => "semantic",
            Self::Contextual => "contextual",
            Self::Thematic => "thematic",
            Self::Emotional => "emotional",
            Self::Analogy => "analogy",
            Self::Contrast => "contrast",
            Self::Elaboration => "elaboration",
            Self::Reference => "reference",
            Self::Association => "association",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConnectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temporal" => Ok(Self::Temporal),
            "causal" => Ok(Self::Causal),
            "semantic" => Ok(Self::Semantic),
            "contextual" => Ok(Self::Contextual),
            "thematic" => Ok(Self::Thematic),
            "emotional" => Ok(Self::Emotional),
            "analogy" => Ok(Self::Analogy),
            "contrast" => Ok(Self::Contrast),
            "elaboration" => Ok(Self::Elaboration),
            "reference" => Ok(Self::Reference),
            "association" => Ok(Self::Association),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown connection type: {s}")),
        }
    }
}

/// Whether a connection is traversable from both endpoints.
///
/// Unidirectional edges are followed source→target during path search but
/// still count toward a node's full connection set from either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Unidirectional,
    Bidirectional,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unidirectional => "unidirectional",
            Self::Bidirectional => "bidirectional",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unidirectional" => Ok(Self::Unidirectional),
            "bidirectional" => Ok(Self::Bidirectional),
            _ => Err(format!("unknown direction: {s}")),
        }
    }
}

/// A connection record, matching the `connections` table schema.
///
/// At most one connection exists per (source, target, type) tuple; a second
/// creation request merges into the existing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Store-assigned id.
    pub id: i64,
    /// Source experience id.
    pub source_id: i64,
    /// Target experience id.
    pub target_id: i64,
    /// Link taxonomy entry.
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    /// Link intensity in `[1, 10]`; saturates under reinforcement and weakening.
    pub strength: i64,
    pub direction: Direction,
    /// Whether the link participates in aware recall, as opposed to
    /// background-only association.
    pub conscious_status: bool,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 timestamp of the most recent activation.
    pub last_activated: String,
    /// How many times this link has been referenced. Starts at 1, only grows.
    pub activation_count: i64,
    pub description: Option<String>,
    /// Opaque key–value bag, shallow-merged on update.
    pub attributes: Option<serde_json::Value>,
}
