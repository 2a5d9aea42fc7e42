//! # cassette-core
//!
//! The netlist graph engine and device assembly planner for cassette.
//!
//! A technology-mapped genetic circuit is held as a [`Graph`] of gates,
//! primary inputs and primary outputs joined by hyperedges. Each pipeline
//! stage keeps its own data on every vertex and edge. The placing stage is
//! implemented here: the [`AssemblyPlanner`] derives each vertex's device
//! from a [`Library`], writes an assembly script for an external solver,
//! and attaches the solver's arrangements back onto the graph as
//! [`Placement`]s.
//!
//! ## Architectural Constraints
//!
//! - Deterministic: all enumeration follows insertion order or `BTreeMap` order
//! - Single-threaded and synchronous; the solver call blocks
//! - No file I/O in graph, netlist or planner code paths, except the library
//!   loader and the command-line solver backend
//! - No async, no network dependencies

// =============================================================================
// MODULES
// =============================================================================

pub mod assembly;
pub mod graph;
pub mod library;
pub mod netlist;
pub mod placement;
pub mod stage;
pub mod stats;
pub mod traversal;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{CassetteError, EdgeId, NodeType, StageId, VertexId, VertexRole};

// =============================================================================
// RE-EXPORTS: Graph Engine
// =============================================================================

pub use graph::{Edge, Graph, GraphBuilder, Vertex};
pub use netlist::{NetlistDocument, graph_from_json, graph_to_json};
pub use placement::{NodeResults, Placement};
pub use stage::{StageData, StageDataRegistry};
pub use stats::NetlistStats;
pub use traversal::{Bfs, Direction, Discovery};

// =============================================================================
// RE-EXPORTS: Assembly Planner
// =============================================================================

pub use assembly::{
    AssemblyPlanner, AssemblyScript, CommandSolver, PlacementReport, ReplaySolver, Solver,
    SolverError, SolverResponse,
};
pub use library::Library;
