//! # Netlist Format
//!
//! JSON form of a netlist graph.
//!
//! ```json
//! {
//!   "name": "and_gate",
//!   "nodes": [
//!     { "name": "a", "nodeType": "PRIMARY_INPUT", "gateType": "pTac" },
//!     { "name": "y", "nodeType": "PRIMARY_OUTPUT", "gateType": "YFP_reporter",
//!       "stageData": { "placing": { "algorithm": "Eugene", "device": ["pTac", "YFP"] } },
//!       "placements": [ { "parts": ["pTac", "YFP"], "direction": true, "index": 0 } ] }
//!   ],
//!   "edges": [ { "name": "w0", "src": "a", "dst": ["y"] } ]
//! }
//! ```
//!
//! Array order is insertion order. A node without `role` takes the default
//! role of its node type. `dst` may be a single name instead of a list.
//! Stage data is rebuilt through a [`StageDataRegistry`] keyed by each
//! slot's `algorithm` field.
//!
//! These are pure transformations; file I/O lives in the app layer.

use crate::stage::StageDataRegistry;
use crate::{CassetteError, Graph, GraphBuilder, NodeType, Placement, StageId, VertexRole};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// DOCUMENT MODEL
// =============================================================================

/// A node entry of the netlist document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetlistNode {
    pub name: String,
    pub node_type: NodeType,
    #[serde(default)]
    pub gate_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<VertexRole>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub stage_data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placements: Vec<Placement>,
}

/// An edge entry of the netlist document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetlistEdge {
    pub name: String,
    pub src: String,
    #[serde(deserialize_with = "one_or_many")]
    pub dst: Vec<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub stage_data: Map<String, Value>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

/// The whole netlist document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetlistDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NetlistNode>,
    #[serde(default)]
    pub edges: Vec<NetlistEdge>,
}

impl NetlistDocument {
    /// Snapshot a graph, including stage data and placements.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .vertices()
            .map(|(_, v)| NetlistNode {
                name: v.name().to_string(),
                node_type: v.node_type().clone(),
                gate_type: v.gate_type().to_string(),
                role: Some(v.role()),
                stage_data: v
                    .stage_slots()
                    .map(|(stage, data)| (stage.to_string(), data.to_json()))
                    .collect(),
                placements: v.results().placements().to_vec(),
            })
            .collect();

        let edges = graph
            .edges()
            .map(|(_, e)| NetlistEdge {
                name: e.name().to_string(),
                src: graph.vertex(e.src()).name().to_string(),
                dst: e
                    .dst()
                    .iter()
                    .map(|d| graph.vertex(*d).name().to_string())
                    .collect(),
                stage_data: e
                    .stage_slots()
                    .map(|(stage, data)| (stage.to_string(), data.to_json()))
                    .collect(),
            })
            .collect();

        Self {
            name: graph.name().to_string(),
            nodes,
            edges,
        }
    }

    /// Build the graph this document describes.
    pub fn to_graph(&self, registry: &StageDataRegistry) -> Result<Graph, CassetteError> {
        let mut builder = GraphBuilder::new(self.name.clone());
        for node in &self.nodes {
            let role = node.role.unwrap_or_else(|| node.node_type.default_role());
            builder.add_vertex(
                node.name.clone(),
                role,
                node.node_type.clone(),
                node.gate_type.clone(),
            );
        }

        let lookup = |edge: &str, name: &str| {
            builder.vertex_id(name).ok_or_else(|| {
                CassetteError::MalformedGraph(format!(
                    "edge '{}' references unknown node '{}'",
                    edge, name
                ))
            })
        };
        let mut wires = Vec::with_capacity(self.edges.len());
        for edge in &self.edges {
            let src = lookup(&edge.name, &edge.src)?;
            let dst = edge
                .dst
                .iter()
                .map(|name| lookup(&edge.name, name))
                .collect::<Result<Vec<_>, _>>()?;
            wires.push((edge.name.clone(), src, dst));
        }
        for (name, src, dst) in wires {
            builder.add_edge(name, src, dst);
        }

        let mut graph = builder.build()?;

        for (id, node) in graph.vertex_ids().zip(&self.nodes) {
            for (stage, value) in &node.stage_data {
                let data = restore_slot(registry, &node.name, stage, value)?;
                graph.attach_vertex_data(id, StageId::new(stage.clone()), data);
            }
            for placement in &node.placements {
                graph.record_placement(id, placement.clone());
            }
        }
        for (id, edge) in graph.edge_ids().zip(&self.edges) {
            for (stage, value) in &edge.stage_data {
                let data = restore_slot(registry, &edge.name, stage, value)?;
                graph.attach_edge_data(id, StageId::new(stage.clone()), data);
            }
        }

        Ok(graph)
    }
}

fn restore_slot(
    registry: &StageDataRegistry,
    owner: &str,
    stage: &str,
    value: &Value,
) -> Result<Box<dyn crate::StageData>, CassetteError> {
    let algorithm = value
        .get("algorithm")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            CassetteError::InvalidDocument(format!(
                "stage '{}' of '{}' has no algorithm",
                stage, owner
            ))
        })?;
    let mut data = registry.resolve(algorithm)?;
    data.restore(value)?;
    Ok(data)
}

// =============================================================================
// JSON FUNCTIONS
// =============================================================================

/// Parse a netlist document and build its graph.
pub fn graph_from_json(json: &str, registry: &StageDataRegistry) -> Result<Graph, CassetteError> {
    let doc: NetlistDocument = serde_json::from_str(json)
        .map_err(|e| CassetteError::InvalidDocument(format!("netlist: {}", e)))?;
    doc.to_graph(registry)
}

/// Render a graph as a pretty-printed netlist document.
pub fn graph_to_json(graph: &Graph) -> Result<String, CassetteError> {
    Ok(serde_json::to_string_pretty(&NetlistDocument::from_graph(graph))?)
}

// =============================================================================
// TESTS
// =============================================================================
