//! # Graph Engine
//!
//! The netlist graph shared by every pipeline stage.
//!
//! The graph is an arena: it owns dense `Vec`s of vertices and edges, and
//! every cross reference is a [`VertexId`] or [`EdgeId`] index. Edges are
//! hyperedges with one source and one or more destinations.
//!
//! Insertion order is meaningful. It is the only way to enumerate "all
//! vertices" deterministically, and traversals break ties by it.
//!
//! Topology is fixed once [`GraphBuilder::build`] succeeds. Afterwards only
//! per-stage data slots and the per-vertex result slot change.

use crate::placement::{NodeResults, Placement};
use crate::stage::StageData;
use crate::{CassetteError, EdgeId, NodeType, StageId, VertexId, VertexRole};
use std::collections::BTreeMap;

type StageSlots = BTreeMap<StageId, Box<dyn StageData>>;

// =============================================================================
// VERTEX
// =============================================================================

/// A gate, primary input or primary output of the netlist.
#[derive(Debug)]
pub struct Vertex {
    name: String,
    role: VertexRole,
    out_edges: Vec<EdgeId>,
    in_edges: Vec<EdgeId>,
    stage_data: StageSlots,
    results: NodeResults,
}

impl Vertex {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn role(&self) -> VertexRole {
        self.role
    }

    /// Outgoing edges in insertion order.
    #[must_use]
    pub fn out_edges(&self) -> &[EdgeId] {
        &self.out_edges
    }

    /// Incoming edges in insertion order.
    #[must_use]
    pub fn in_edges(&self) -> &[EdgeId] {
        &self.in_edges
    }

    /// Data held for `stage`, if any.
    #[must_use]
    pub fn stage_data(&self, stage: &StageId) -> Option<&dyn StageData> {
        self.stage_data.get(stage).map(Box::as_ref)
    }

    /// Every stage slot, ordered by stage name.
    pub fn stage_slots(&self) -> impl Iterator<Item = (&StageId, &dyn StageData)> {
        self.stage_data.iter().map(|(k, v)| (k, v.as_ref()))
    }

    #[must_use]
    pub fn results(&self) -> &NodeResults {
        &self.results
    }

    #[must_use]
    pub fn node_type(&self) -> &NodeType {
        &self.results.node_type
    }

    #[must_use]
    pub fn gate_type(&self) -> &str {
        &self.results.gate_type
    }
}

// =============================================================================
// EDGE
// =============================================================================

/// A wire from one source vertex to one or more destinations.
#[derive(Debug)]
pub struct Edge {
    name: String,
    src: VertexId,
    dst: Vec<VertexId>,
    stage_data: StageSlots,
}

impl Edge {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn src(&self) -> VertexId {
        self.src
    }

    /// Destinations in insertion order. Never empty.
    #[must_use]
    pub fn dst(&self) -> &[VertexId] {
        &self.dst
    }

    /// More than one destination.
    #[must_use]
    pub fn is_hyperedge(&self) -> bool {
        self.dst.len() > 1
    }

    #[must_use]
    pub fn stage_data(&self, stage: &StageId) -> Option<&dyn StageData> {
        self.stage_data.get(stage).map(Box::as_ref)
    }

    pub fn stage_slots(&self) -> impl Iterator<Item = (&StageId, &dyn StageData)> {
        self.stage_data.iter().map(|(k, v)| (k, v.as_ref()))
    }
}

// =============================================================================
// GRAPH
// =============================================================================

/// The netlist graph.
#[derive(Debug)]
pub struct Graph {
    name: String,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    by_name: BTreeMap<String, VertexId>,
}

impl Graph {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get a vertex by id.
    ///
    /// Ids handed out by this graph are always in range.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    /// Get an edge by id.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// Get a vertex by id, or `None` if out of range.
    #[must_use]
    pub fn get_vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    /// Look up a vertex by name.
    #[must_use]
    pub fn find_vertex(&self, name: &str) -> Option<VertexId> {
        self.by_name.get(name).copied()
    }

    /// All vertex ids in insertion order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + use<> {
        (0..self.vertices.len()).map(VertexId)
    }

    /// All edge ids in insertion order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + use<> {
        (0..self.edges.len()).map(EdgeId)
    }

    /// All vertices with their ids, in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices.iter().enumerate().map(|(i, v)| (VertexId(i), v))
    }

    /// All edges with their ids, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    #[must_use]
    pub fn out_degree(&self, id: VertexId) -> usize {
        self.vertex(id).out_edges.len()
    }

    #[must_use]
    pub fn in_degree(&self, id: VertexId) -> usize {
        self.vertex(id).in_edges.len()
    }

    /// Number of destinations of an edge.
    #[must_use]
    pub fn fan_out(&self, id: EdgeId) -> usize {
        self.edge(id).dst.len()
    }

    /// Source vertex of every incoming edge of `id`, in incoming-edge order.
    pub fn fan_in_sources(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex(id).in_edges.iter().map(|e| self.edge(*e).src)
    }

    /// Replace the `stage` slot of a vertex. Total: always succeeds.
    pub fn attach_vertex_data(&mut self, id: VertexId, stage: StageId, data: Box<dyn StageData>) {
        self.vertices[id.0].stage_data.insert(stage, data);
    }

    /// Replace the `stage` slot of an edge. Total: always succeeds.
    pub fn attach_edge_data(&mut self, id: EdgeId, stage: StageId, data: Box<dyn StageData>) {
        self.edges[id.0].stage_data.insert(stage, data);
    }

    /// Typed view of a vertex's stage data.
    #[must_use]
    pub fn vertex_data_as<T: StageData + 'static>(
        &self,
        id: VertexId,
        stage: &StageId,
    ) -> Option<&T> {
        self.vertex(id)
            .stage_data(stage)
            .and_then(|data| data.as_any().downcast_ref::<T>())
    }

    /// Typed view of an edge's stage data.
    #[must_use]
    pub fn edge_data_as<T: StageData + 'static>(&self, id: EdgeId, stage: &StageId) -> Option<&T> {
        self.edge(id)
            .stage_data(stage)
            .and_then(|data| data.as_any().downcast_ref::<T>())
    }

    /// Mutable access to a vertex's result slot.
    pub fn results_mut(&mut self, id: VertexId) -> &mut NodeResults {
        &mut self.vertices[id.0].results
    }

    /// Append a placement to a vertex's result slot.
    pub fn record_placement(&mut self, id: VertexId, placement: Placement) {
        self.vertices[id.0].results.add_placement(placement);
    }

    /// Vertices with the given role, in insertion order.
    pub fn vertices_with_role(&self, role: VertexRole) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices()
            .filter(move |(_, v)| v.role == role)
            .map(|(id, _)| id)
    }
}

// =============================================================================
// GRAPH BUILDER
// =============================================================================

#[derive(Debug)]
struct VertexSpec {
    name: String,
    role: VertexRole,
    results: NodeResults,
}

#[derive(Debug)]
struct EdgeSpec {
    name: String,
    src: VertexId,
    dst: Vec<VertexId>,
}

/// Collects vertices and edges, then validates them into a [`Graph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    name: String,
    vertices: Vec<VertexSpec>,
    edges: Vec<EdgeSpec>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a vertex. Its id is its insertion index.
    pub fn add_vertex(
        &mut self,
        name: impl Into<String>,
        role: VertexRole,
        node_type: NodeType,
        gate_type: impl Into<String>,
    ) -> VertexId {
        self.vertices.push(VertexSpec {
            name: name.into(),
            role,
            results: NodeResults::new(node_type, gate_type),
        });
        VertexId(self.vertices.len() - 1)
    }

    /// Append an edge. Ids are checked by [`GraphBuilder::build`].
    pub fn add_edge(&mut self, name: impl Into<String>, src: VertexId, dst: Vec<VertexId>) -> EdgeId {
        self.edges.push(EdgeSpec {
            name: name.into(),
            src,
            dst,
        });
        EdgeId(self.edges.len() - 1)
    }

    /// Id of the first vertex added under `name`.
    #[must_use]
    pub fn vertex_id(&self, name: &str) -> Option<VertexId> {
        self.vertices
            .iter()
            .position(|v| v.name == name)
            .map(VertexId)
    }

    /// Validate and freeze the graph.
    ///
    /// Fails with `MalformedGraph` if a vertex name repeats, an edge has no
    /// destination, or an edge references a vertex outside this graph.
    pub fn build(self) -> Result<Graph, CassetteError> {
        let mut by_name = BTreeMap::new();
        let mut vertices = Vec::with_capacity(self.vertices.len());
        for (i, spec) in self.vertices.into_iter().enumerate() {
            if by_name.insert(spec.name.clone(), VertexId(i)).is_some() {
                return Err(CassetteError::MalformedGraph(format!(
                    "duplicate vertex name '{}'",
                    spec.name
                )));
            }
            vertices.push(Vertex {
                name: spec.name,
                role: spec.role,
                out_edges: Vec::new(),
                in_edges: Vec::new(),
                stage_data: BTreeMap::new(),
                results: spec.results,
            });
        }

        let count = vertices.len();
        let mut edges = Vec::with_capacity(self.edges.len());
        for (i, spec) in self.edges.into_iter().enumerate() {
            let id = EdgeId(i);
            if spec.dst.is_empty() {
                return Err(CassetteError::MalformedGraph(format!(
                    "edge '{}' has no destination",
                    spec.name
                )));
            }
            if let Some(bad) = std::iter::once(&spec.src)
                .chain(spec.dst.iter())
                .find(|v| v.0 >= count)
            {
                return Err(CassetteError::MalformedGraph(format!(
                    "edge '{}' references vertex {} outside a graph of {} vertices",
                    spec.name, bad.0, count
                )));
            }
            vertices[spec.src.0].out_edges.push(id);
            for dst in &spec.dst {
                vertices[dst.0].in_edges.push(id);
            }
            edges.push(Edge {
                name: spec.name,
                src: spec.src,
                dst: spec.dst,
                stage_data: BTreeMap::new(),
            });
        }

        Ok(Graph {
            name: self.name,
            vertices,
            edges,
            by_name,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
