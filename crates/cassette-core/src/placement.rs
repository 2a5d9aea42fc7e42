//! # Placement Result Model
//!
//! The output of the assembly planner, attached back onto graph vertices.
//!
//! A [`Placement`] is one realisation of a vertex's device inside one
//! top-level assembly: the part names in physical order, the strand
//! direction, and the position of the device within the assembly.

use crate::NodeType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// PLACEMENT
// =============================================================================

/// One oriented, ordered placement of a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Part names in final physical order.
    pub parts: Vec<String>,
    /// `true` when the device sits on the forward strand.
    pub direction: bool,
    /// Position of the device within its top-level assembly.
    pub index: usize,
}

impl Placement {
    /// Create a forward placement.
    #[must_use]
    pub fn new(parts: Vec<String>, index: usize) -> Self {
        Self {
            parts,
            direction: true,
            index,
        }
    }

    /// Flip the placement onto the other strand.
    ///
    /// Part order is reversed and the direction flag inverted.
    pub fn reverse(&mut self) {
        self.parts.reverse();
        self.direction = !self.direction;
    }

    /// Check that this placement uses exactly the parts of `device`,
    /// counting repeats, in any order.
    #[must_use]
    pub fn matches_device<S: AsRef<str>>(&self, device: &[S]) -> bool {
        if self.parts.len() != device.len() {
            return false;
        }
        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for part in &self.parts {
            *counts.entry(part.as_str()).or_default() += 1;
        }
        for part in device {
            *counts.entry(part.as_ref()).or_default() -= 1;
        }
        counts.values().all(|&c| c == 0)
    }
}

// =============================================================================
// NODE RESULTS
// =============================================================================

/// The result-data slot of a vertex.
///
/// Carries what logic synthesis and technology mapping decided about the
/// node, plus the placements recorded by the assembly planner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeResults {
    pub node_type: NodeType,
    pub gate_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    placements: Vec<Placement>,
}

impl NodeResults {
    #[must_use]
    pub fn new(node_type: NodeType, gate_type: impl Into<String>) -> Self {
        Self {
            node_type,
            gate_type: gate_type.into(),
            placements: Vec::new(),
        }
    }

    /// Append a placement.
    pub fn add_placement(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    /// Placements in the order they were recorded.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Drop every recorded placement.
    pub fn clear_placements(&mut self) {
        self.placements.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
