//! Turns solver assemblies back into per-vertex placements.

use super::device::DeviceMap;
use super::script::AssemblyScript;
use super::solver::{Assembly, Orientation};
use crate::{CassetteError, Graph, Placement, VertexId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of a reconcile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlacementReport {
    /// Top-level assemblies read from the collection.
    pub assemblies: usize,
    /// Placements recorded across all vertices.
    pub placements: usize,
    /// Placements per vertex name.
    pub per_vertex: BTreeMap<String, usize>,
}

/// Validate every component, then replace the placements of the collected
/// vertices. Nothing is written unless the whole collection checks out.
pub(crate) fn reconcile(
    graph: &mut Graph,
    devices: &DeviceMap,
    script: &AssemblyScript,
    collection: Option<Vec<Assembly>>,
) -> Result<PlacementReport, CassetteError> {
    let assemblies = collection.ok_or_else(|| {
        CassetteError::AssemblyFailure(format!(
            "solver returned no '{}' collection",
            script.collection()
        ))
    })?;
    if assemblies.is_empty() {
        return Err(CassetteError::AssemblyFailure(format!(
            "solver found no assembly in '{}'",
            script.collection()
        )));
    }

    let mut pending: Vec<(VertexId, Placement)> = Vec::new();
    for assembly in &assemblies {
        for (index, component) in assembly.components.iter().enumerate() {
            let vertex = script.gate_vertex(&component.name).ok_or_else(|| {
                CassetteError::AssemblyFailure(format!(
                    "assembly '{}' names unknown device '{}'",
                    assembly.name, component.name
                ))
            })?;

            let mut placement = Placement::new(component.parts.clone(), index);
            if component.orientation == Orientation::Reverse {
                placement.reverse();
            }

            let device = devices.get(vertex).unwrap_or_default();
            let names: Vec<&str> = device.iter().map(|p| p.name.as_str()).collect();
            if !placement.matches_device(&names) {
                return Err(CassetteError::AssemblyFailure(format!(
                    "device '{}' of vertex '{}' placed as [{}], expected parts [{}]",
                    component.name,
                    graph.vertex(vertex).name(),
                    placement.parts.join(", "),
                    names.join(", ")
                )));
            }
            pending.push((vertex, placement));
        }
    }

    for vertex in devices.vertices() {
        graph.results_mut(vertex).clear_placements();
    }

    let mut report = PlacementReport {
        assemblies: assemblies.len(),
        ..PlacementReport::default()
    };
    for (vertex, placement) in pending {
        *report
            .per_vertex
            .entry(graph.vertex(vertex).name().to_string())
            .or_default() += 1;
        report.placements += 1;
        graph.record_placement(vertex, placement);
    }
    Ok(report)
}
