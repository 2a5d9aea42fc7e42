//! # Device Assembly Planner
//!
//! Places every device of a technology-mapped netlist, in four phases:
//!
//! ```text
//! AssemblyPlanner --collect--> Collected --synthesize--> Synthesized
//!     --solve--> Solved --reconcile--> PlacementReport
//! ```
//!
//! 1. **Collect**: walk the graph sink-first and derive each vertex's device
//!    from the library into a [`DeviceMap`].
//! 2. **Synthesize**: render the devices and the library's rule fragments as
//!    an assembly script.
//! 3. **Solve**: hand the script to a [`Solver`]. A solver failure ends the
//!    run.
//! 4. **Reconcile**: check every returned component against its device and
//!    attach the resulting [`Placement`](crate::Placement)s to the graph.
//!
//! Each phase consumes the previous one, so phases cannot be skipped or
//! repeated. Planner state lives only for one run; the placements it records
//! stay on the graph.

mod device;
mod reconcile;
mod script;
mod solver;

pub use device::{DeviceMap, device_for};
pub use reconcile::PlacementReport;
pub use script::{AssemblyScript, GATE_PREFIX, RESULT_COLLECTION, synthesize};
pub use solver::{
    Assembly, CommandSolver, Component, Orientation, ReplaySolver, Solver, SolverError,
    SolverResponse,
};

use crate::library::Library;
use crate::stage::{DeviceData, PLACING, StageDataRegistry};
use crate::{Bfs, CassetteError, Graph, StageId};
use tracing::{debug, info};

// =============================================================================
// PLANNER
// =============================================================================

/// Entry point of a planner run.
#[derive(Debug)]
pub struct AssemblyPlanner<'l> {
    library: &'l Library,
    registry: StageDataRegistry,
    collection: String,
}

impl<'l> AssemblyPlanner<'l> {
    #[must_use]
    pub fn new(library: &'l Library) -> Self {
        Self {
            library,
            registry: StageDataRegistry::builtin(),
            collection: RESULT_COLLECTION.to_string(),
        }
    }

    /// Use a custom stage data registry.
    #[must_use]
    pub fn with_registry(mut self, registry: StageDataRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Name of the collection the script fills and the solver returns.
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Collect the device of every reachable vertex, sink-first.
    ///
    /// Also replaces each vertex's `placing` stage slot: fresh data for
    /// every vertex, then the device part names on collected ones.
    pub fn collect(self, graph: &mut Graph) -> Result<Collected<'l>, CassetteError> {
        info!(netlist = graph.name(), "collecting devices");

        let mut devices = DeviceMap::new();
        for vertex in Bfs::sink_rooted(graph) {
            let device = device_for(graph, self.library, vertex)?;
            if device.is_empty() {
                debug!(vertex = graph.vertex(vertex).name(), "no device for port vertex");
                continue;
            }
            debug!(
                vertex = graph.vertex(vertex).name(),
                parts = device.len(),
                "device collected"
            );
            devices.insert(vertex, device);
        }

        let stage = StageId::new(PLACING);
        self.registry
            .reset_vertex_data(graph, &stage, DeviceData::ALGORITHM)?;
        for (vertex, parts) in devices.iter() {
            let mut data = self.registry.resolve(DeviceData::ALGORITHM)?;
            let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
            data.restore(&serde_json::json!({ "device": names }))?;
            graph.attach_vertex_data(vertex, stage.clone(), data);
        }

        info!(devices = devices.len(), "devices collected");
        Ok(Collected {
            library: self.library,
            collection: self.collection,
            devices,
        })
    }

    /// Run all four phases.
    pub fn run<S: Solver + ?Sized>(
        self,
        graph: &mut Graph,
        solver: &S,
    ) -> Result<PlacementReport, CassetteError> {
        self.collect(graph)?
            .synthesize(graph)?
            .solve(solver)?
            .reconcile(graph)
    }
}

// =============================================================================
// PHASES
// =============================================================================

/// Devices collected, script not yet written.
#[derive(Debug)]
pub struct Collected<'l> {
    library: &'l Library,
    collection: String,
    devices: DeviceMap,
}

impl Collected<'_> {
    #[must_use]
    pub fn devices(&self) -> &DeviceMap {
        &self.devices
    }

    pub fn synthesize(self, graph: &Graph) -> Result<Synthesized, CassetteError> {
        info!("building assembly script");
        let script = synthesize(graph, self.library, &self.devices, &self.collection)?;
        Ok(Synthesized {
            devices: self.devices,
            script,
        })
    }
}

/// Script written, solver not yet run.
#[derive(Debug)]
pub struct Synthesized {
    devices: DeviceMap,
    script: AssemblyScript,
}

impl Synthesized {
    #[must_use]
    pub fn devices(&self) -> &DeviceMap {
        &self.devices
    }

    #[must_use]
    pub fn script(&self) -> &AssemblyScript {
        &self.script
    }

    /// Send the script to `solver`. Any solver failure is fatal.
    pub fn solve<S: Solver + ?Sized>(self, solver: &S) -> Result<Solved, CassetteError> {
        info!("running solver");
        let mut response = solver
            .solve(self.script.text())
            .map_err(|e| CassetteError::AssemblyFailure(e.to_string()))?;
        let collection = response.take_collection(self.script.collection());
        Ok(Solved {
            devices: self.devices,
            script: self.script,
            collection,
        })
    }
}

/// Solver answered, placements not yet attached.
#[derive(Debug)]
pub struct Solved {
    devices: DeviceMap,
    script: AssemblyScript,
    collection: Option<Vec<Assembly>>,
}

impl Solved {
    #[must_use]
    pub fn script(&self) -> &AssemblyScript {
        &self.script
    }

    /// Assemblies returned under the script's collection, if any.
    #[must_use]
    pub fn assemblies(&self) -> Option<&[Assembly]> {
        self.collection.as_deref()
    }

    pub fn reconcile(self, graph: &mut Graph) -> Result<PlacementReport, CassetteError> {
        info!("processing solver output");
        let report = reconcile::reconcile(graph, &self.devices, &self.script, self.collection)?;
        info!(
            assemblies = report.assemblies,
            placements = report.placements,
            "placements recorded"
        );
        Ok(report)
    }
}

// =============================================================================
// TESTS
// =============================================================================
