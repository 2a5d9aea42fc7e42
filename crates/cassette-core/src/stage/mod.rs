//! # Stage Module
//!
//! Per-stage data attached to graph elements.
//!
//! Every pipeline stage owns one slot on each vertex and edge, keyed by its
//! [`StageId`](crate::StageId). The slot holds a boxed [`StageData`] value
//! built by the [`StageDataRegistry`] from the algorithm name configured for
//! that stage. Running a stage replaces the slot; the graph itself never
//! changes shape.

mod data;
mod registry;

pub use data::{DeviceData, PassiveData};
pub use registry::{StageDataConstructor, StageDataRegistry};

use crate::CassetteError;
use std::any::Any;
use std::fmt;

// =============================================================================
// STAGE NAMES
// =============================================================================

pub const CLUSTERING: &str = "clustering";
pub const PARTITIONING: &str = "partitioning";
pub const LOGIC_OPTIMIZATION: &str = "logicOptimization";
pub const TECHNOLOGY_MAPPING: &str = "technologyMapping";
pub const PLACING: &str = "placing";
pub const EXPORT: &str = "export";

// =============================================================================
// STAGE DATA CAPABILITY
// =============================================================================

/// Data a stage algorithm keeps on a vertex or edge.
///
/// Implementations are narrow: they can be reset, dumped to JSON for the
/// netlist document, and restored from that JSON.
pub trait StageData: fmt::Debug {
    /// Name of the algorithm that owns this data.
    fn algorithm(&self) -> &str;

    /// Return the data to its freshly constructed state.
    fn reset(&mut self);

    /// JSON form written under the stage key of the netlist document.
    fn to_json(&self) -> serde_json::Value;

    /// Rehydrate from the JSON written by [`StageData::to_json`].
    fn restore(&mut self, _value: &serde_json::Value) -> Result<(), CassetteError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;
}
