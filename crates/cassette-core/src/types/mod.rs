//! # Core Type Definitions
//!
//! This module contains the small shared types of the cassette graph engine:
//! - Graph identifiers (`VertexId`, `EdgeId`, `StageId`)
//! - Vertex role and node type tags (`VertexRole`, `NodeType`)
//! - Error types (`CassetteError`)
//!
//! ## Determinism Guarantees
//!
//! Identifiers are dense indices into the owning graph's arrays. They
//! implement `Ord` so they can key `BTreeMap`/`BTreeSet` with a stable order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// GRAPH IDENTIFIERS
// =============================================================================

/// Index of a vertex inside its owning [`Graph`](crate::Graph).
///
/// Ids are only handed out by [`GraphBuilder`](crate::GraphBuilder) and the
/// graph itself, so they cannot be forged outside the crate:
///
/// ```compile_fail
/// let forged = cassette_core::VertexId(5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Index of an edge inside its owning [`Graph`](crate::Graph).
///
/// ```compile_fail
/// let forged = cassette_core::EdgeId(0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Name of a pipeline stage, used to key per-stage data slots.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StageId(pub String);

impl StageId {
    /// Create a stage identifier from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the stage identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// VERTEX ROLE
// =============================================================================

/// Structural role of a vertex. Traversals start from `Source` or `Sink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VertexRole {
    Source,
    Sink,
    Inner,
}

// =============================================================================
// NODE TYPE
// =============================================================================

/// Logical type of a netlist node, as assigned by logic synthesis.
///
/// Inputs and outputs come in two flavours: primary ports of the whole
/// circuit and plain ports of a sub-circuit. Everything else is a logic
/// gate named by its function (`NOR`, `NOT`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeType {
    PrimaryInput,
    Input,
    PrimaryOutput,
    Output,
    Logic(String),
}

impl NodeType {
    pub const PRIMARY_INPUT: &'static str = "PRIMARY_INPUT";
    pub const INPUT: &'static str = "INPUT";
    pub const PRIMARY_OUTPUT: &'static str = "PRIMARY_OUTPUT";
    pub const OUTPUT: &'static str = "OUTPUT";

    /// Parse a node type tag. Unknown tags are logic gate types.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            Self::PRIMARY_INPUT => Self::PrimaryInput,
            Self::INPUT => Self::Input,
            Self::PRIMARY_OUTPUT => Self::PrimaryOutput,
            Self::OUTPUT => Self::Output,
            other => Self::Logic(other.to_string()),
        }
    }

    /// Get the tag as it appears in netlist documents.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PrimaryInput => Self::PRIMARY_INPUT,
            Self::Input => Self::INPUT,
            Self::PrimaryOutput => Self::PRIMARY_OUTPUT,
            Self::Output => Self::OUTPUT,
            Self::Logic(name) => name,
        }
    }

    #[must_use]
    pub fn is_primary_input(&self) -> bool {
        matches!(self, Self::PrimaryInput)
    }

    #[must_use]
    pub fn is_primary_output(&self) -> bool {
        matches!(self, Self::PrimaryOutput)
    }

    /// Primary or sub-circuit input.
    #[must_use]
    pub fn is_all_input(&self) -> bool {
        matches!(self, Self::PrimaryInput | Self::Input)
    }

    /// Primary or sub-circuit output.
    #[must_use]
    pub fn is_all_output(&self) -> bool {
        matches!(self, Self::PrimaryOutput | Self::Output)
    }

    /// The role a vertex of this type takes when the document gives none.
    #[must_use]
    pub fn default_role(&self) -> VertexRole {
        if self.is_all_input() {
            VertexRole::Source
        } else if self.is_all_output() {
            VertexRole::Sink
        } else {
            VertexRole::Inner
        }
    }
}

impl Default for NodeType {
    fn default() -> Self {
        Self::Logic(String::new())
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur anywhere in the cassette pipeline.
///
/// - No silent failures
/// - Use `Result<T, CassetteError>` for fallible operations
/// - Every variant is terminal for the current pipeline run
#[derive(Debug, Error)]
pub enum CassetteError {
    /// A structural graph invariant was violated while building the graph.
    #[error("Malformed graph: {0}")]
    MalformedGraph(String),

    /// A vertex names a gate that the library does not define.
    #[error("Unknown gate '{name}' for vertex '{vertex}'")]
    UnknownGate { vertex: String, name: String },

    /// A device references a part that the library does not define.
    #[error("Unknown part '{name}' for vertex '{vertex}'")]
    UnknownPart { vertex: String, name: String },

    /// A primary input names a sensor that the library does not define.
    #[error("Unknown input sensor '{name}' for vertex '{vertex}'")]
    UnknownSensor { vertex: String, name: String },

    /// A primary output names a reporter that the library does not define.
    #[error("Unknown output reporter '{name}' for vertex '{vertex}'")]
    UnknownReporter { vertex: String, name: String },

    /// No stage data constructor is registered under this algorithm name.
    #[error("No stage data registered for algorithm '{0}'")]
    StageDataNotFound(String),

    /// The solver failed or returned results that cannot be placed.
    #[error("Assembly failure: {0}")]
    AssemblyFailure(String),

    /// A netlist, library or configuration document is invalid.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<serde_json::Error> for CassetteError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
