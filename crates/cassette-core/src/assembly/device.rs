//! # Device Collection
//!
//! Derives the device (ordered part list) of every vertex from the library.
//!
//! | Vertex | Device |
//! |--------|--------|
//! | primary input | parts of the input sensor named by the gate type |
//! | primary output | fan-in promoters, then the output reporter's parts |
//! | logic gate | fan-in promoters, then cassette parts per RF variable |
//! | other port | none |
//!
//! A fan-in promoter comes from the source vertex of each incoming edge:
//! an input source contributes the part named by its own gate type, a gate
//! source contributes its gate's output promoter.

use crate::library::{Library, Part};
use crate::{CassetteError, Graph, VertexId};
use std::collections::BTreeMap;

// =============================================================================
// DEVICE MAP
// =============================================================================

/// Vertex → device, in insertion order.
///
/// Insertion order is the sink-rooted visitation order and drives the order
/// of every block of the assembly script.
#[derive(Debug, Clone, Default)]
pub struct DeviceMap {
    entries: Vec<(VertexId, Vec<Part>)>,
    index: BTreeMap<VertexId, usize>,
}

impl DeviceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the device of `vertex`. A vertex keeps its first entry;
    /// returns `false` if it already had one.
    pub fn insert(&mut self, vertex: VertexId, parts: Vec<Part>) -> bool {
        if self.index.contains_key(&vertex) {
            return false;
        }
        self.index.insert(vertex, self.entries.len());
        self.entries.push((vertex, parts));
        true
    }

    #[must_use]
    pub fn get(&self, vertex: VertexId) -> Option<&[Part]> {
        self.index
            .get(&vertex)
            .map(|&i| self.entries[i].1.as_slice())
    }

    #[must_use]
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.index.contains_key(&vertex)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &[Part])> {
        self.entries.iter().map(|(v, parts)| (*v, parts.as_slice()))
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.entries.iter().map(|(v, _)| *v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// DEVICE RESOLUTION
// =============================================================================

/// Compute the device of one vertex.
///
/// Returns an empty device for ports that are neither primary nor gates.
pub fn device_for(
    graph: &Graph,
    library: &Library,
    vertex: VertexId,
) -> Result<Vec<Part>, CassetteError> {
    let resolver = Resolver {
        graph,
        library,
        vertex,
    };
    let node_type = graph.vertex(vertex).node_type();

    let mut device = Vec::new();
    if node_type.is_primary_input() {
        device.extend(resolver.sensor_parts()?);
    } else if node_type.is_primary_output() {
        device.extend(resolver.input_promoters()?);
        device.extend(resolver.reporter_parts()?);
    } else if !node_type.is_all_input() && !node_type.is_all_output() {
        device.extend(resolver.input_promoters()?);
        device.extend(resolver.cassette_parts()?);
    }
    Ok(device)
}

struct Resolver<'a> {
    graph: &'a Graph,
    library: &'a Library,
    vertex: VertexId,
}

impl Resolver<'_> {
    fn vertex_name(&self) -> String {
        self.graph.vertex(self.vertex).name().to_string()
    }

    fn gate_type(&self) -> &str {
        self.graph.vertex(self.vertex).gate_type()
    }

    fn part(&self, name: &str) -> Result<Part, CassetteError> {
        self.library
            .part(name)
            .cloned()
            .ok_or_else(|| CassetteError::UnknownPart {
                vertex: self.vertex_name(),
                name: name.to_string(),
            })
    }

    fn parts(&self, names: &[String]) -> Result<Vec<Part>, CassetteError> {
        names.iter().map(|name| self.part(name)).collect()
    }

    fn input_promoters(&self) -> Result<Vec<Part>, CassetteError> {
        let mut promoters = Vec::new();
        for src in self.graph.fan_in_sources(self.vertex) {
            let source = self.graph.vertex(src);
            let promoter = if source.node_type().is_all_input() {
                source.gate_type()
            } else {
                let gate = self.library.gate(source.gate_type()).ok_or_else(|| {
                    CassetteError::UnknownGate {
                        vertex: source.name().to_string(),
                        name: source.gate_type().to_string(),
                    }
                })?;
                gate.promoter.as_str()
            };
            promoters.push(self.part(promoter)?);
        }
        Ok(promoters)
    }

    fn sensor_parts(&self) -> Result<Vec<Part>, CassetteError> {
        let sensor = self.library.input_sensor(self.gate_type()).ok_or_else(|| {
            CassetteError::UnknownSensor {
                vertex: self.vertex_name(),
                name: self.gate_type().to_string(),
            }
        })?;
        self.parts(&sensor.parts)
    }

    fn reporter_parts(&self) -> Result<Vec<Part>, CassetteError> {
        let reporter = self
            .library
            .output_reporter(self.gate_type())
            .ok_or_else(|| CassetteError::UnknownReporter {
                vertex: self.vertex_name(),
                name: self.gate_type().to_string(),
            })?;
        self.parts(&reporter.parts)
    }

    fn cassette_parts(&self) -> Result<Vec<Part>, CassetteError> {
        let gate = self
            .library
            .gate(self.gate_type())
            .ok_or_else(|| CassetteError::UnknownGate {
                vertex: self.vertex_name(),
                name: self.gate_type().to_string(),
            })?;
        let mut parts = Vec::new();
        for variable in gate.response_function.variable_names() {
            let names = gate
                .cassette_parts(variable)
                .ok_or_else(|| CassetteError::UnknownPart {
                    vertex: self.vertex_name(),
                    name: format!("{}.cassette[{}]", gate.name, variable),
                })?;
            parts.extend(self.parts(names)?);
        }
        Ok(parts)
    }
}

// =============================================================================
// TESTS
// =============================================================================
