//! # Stage Data Registry
//!
//! Maps a configured algorithm name to a constructor for its stage data.
//!
//! The set of names is closed and known at startup: the registry is an
//! explicit `BTreeMap` built once, never a dynamic lookup by type name.

use super::{DeviceData, PassiveData, StageData};
use crate::{CassetteError, Graph, StageId};
use std::collections::BTreeMap;

/// Builds a fresh stage data object.
pub type StageDataConstructor = Box<dyn Fn() -> Box<dyn StageData>>;

/// Name-keyed stage data factory.
#[derive(Default)]
pub struct StageDataRegistry {
    constructors: BTreeMap<String, StageDataConstructor>,
}

impl std::fmt::Debug for StageDataRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageDataRegistry")
            .field("algorithms", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StageDataRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every algorithm the pipeline ships with.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(DeviceData::ALGORITHM, || Box::new(DeviceData::new()));
        for name in [
            "CL_RC",
            "GPCC_SCIP_BASE",
            "maxFanout",
            "base",
            "SimulatedAnnealing",
        ] {
            registry.register(name, move || Box::new(PassiveData::new(name)));
        }
        registry
    }

    /// Register (or replace) the constructor for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn StageData> + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
    }

    /// Check whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered algorithm names in sorted order.
    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Construct a fresh data object for `name`.
    pub fn resolve(&self, name: &str) -> Result<Box<dyn StageData>, CassetteError> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| CassetteError::StageDataNotFound(name.to_string()))
    }

    /// Replace the `stage` slot of every vertex with fresh `algorithm` data.
    pub fn reset_vertex_data(
        &self,
        graph: &mut Graph,
        stage: &StageId,
        algorithm: &str,
    ) -> Result<(), CassetteError> {
        // Resolve once up front so a miss leaves the graph untouched.
        self.resolve(algorithm)?;
        for id in graph.vertex_ids() {
            graph.attach_vertex_data(id, stage.clone(), self.resolve(algorithm)?);
        }
        Ok(())
    }

    /// Replace the `stage` slot of every edge with fresh `algorithm` data.
    pub fn reset_edge_data(
        &self,
        graph: &mut Graph,
        stage: &StageId,
        algorithm: &str,
    ) -> Result<(), CassetteError> {
        self.resolve(algorithm)?;
        for id in graph.edge_ids() {
            graph.attach_edge_data(id, stage.clone(), self.resolve(algorithm)?);
        }
        Ok(())
    }
}
