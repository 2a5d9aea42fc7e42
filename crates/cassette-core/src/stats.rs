//! # Netlist Statistics
//!
//! Port and gate counts of a netlist graph.

use crate::{Graph, NodeType};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Gate types reported first, in this order. Others follow sorted by name.
pub const KNOWN_GATE_TYPES: &[&str] = &["NOT", "NOR", "OR", "AND", "NAND", "XOR", "XNOR", "BUF"];

const RULE: &str = "--------------------------------------------";

/// Counts computed from a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetlistStats {
    pub name: String,
    pub total_inputs: usize,
    pub primary_inputs: usize,
    pub inputs: usize,
    pub total_outputs: usize,
    pub primary_outputs: usize,
    pub outputs: usize,
    /// Vertices that are neither inputs nor outputs.
    pub gates: usize,
    /// Non-zero gate type counts, known types first.
    pub gate_types: Vec<(String, usize)>,
}

impl NetlistStats {
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let mut stats = Self {
            name: graph.name().to_string(),
            ..Self::default()
        };
        let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();

        for (_, vertex) in graph.vertices() {
            match vertex.node_type() {
                NodeType::PrimaryInput => stats.primary_inputs += 1,
                NodeType::Input => stats.inputs += 1,
                NodeType::PrimaryOutput => stats.primary_outputs += 1,
                NodeType::Output => stats.outputs += 1,
                NodeType::Logic(kind) => {
                    stats.gates += 1;
                    *by_type.entry(kind.as_str()).or_default() += 1;
                }
            }
        }
        stats.total_inputs = stats.primary_inputs + stats.inputs;
        stats.total_outputs = stats.primary_outputs + stats.outputs;

        for known in KNOWN_GATE_TYPES {
            if let Some(count) = by_type.remove(known) {
                stats.gate_types.push(((*known).to_string(), count));
            }
        }
        stats
            .gate_types
            .extend(by_type.into_iter().map(|(k, n)| (k.to_string(), n)));
        stats
    }

    /// Count for one gate type, zero when absent.
    #[must_use]
    pub fn gate_type_count(&self, kind: &str) -> usize {
        self.gate_types
            .iter()
            .find(|(k, _)| k == kind)
            .map_or(0, |(_, n)| *n)
    }
}

impl fmt::Display for NetlistStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Netlist name: {}", self.name)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Total number of inputs: {}", self.total_inputs)?;
        writeln!(f, "Number of primary inputs: {}", self.primary_inputs)?;
        writeln!(f, "Number of inputs: {}", self.inputs)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Total number of outputs: {}", self.total_outputs)?;
        writeln!(f, "Number of primary outputs: {}", self.primary_outputs)?;
        writeln!(f, "Number of outputs: {}", self.outputs)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Number of gates: {}", self.gates)?;
        for (kind, count) in &self.gate_types {
            writeln!(f, "Number of {kind} gates: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GraphBuilder, VertexRole};

    fn mixed() -> Graph {
        let mut builder = GraphBuilder::new("mixed");
        builder.add_vertex("a", VertexRole::Source, NodeType::PrimaryInput, "");
        builder.add_vertex("b", VertexRole::Source, NodeType::Input, "");
        builder.add_vertex("g1", VertexRole::Inner, NodeType::parse("NOR"), "");
        builder.add_vertex("g2", VertexRole::Inner, NodeType::parse("NOT"), "");
        builder.add_vertex("g3", VertexRole::Inner, NodeType::parse("NOR"), "");
        builder.add_vertex("g4", VertexRole::Inner, NodeType::parse("MUX"), "");
        builder.add_vertex("g5", VertexRole::Inner, NodeType::parse("AOI"), "");
        builder.add_vertex("y", VertexRole::Sink, NodeType::PrimaryOutput, "");
        builder.build().expect("build")
    }

    #[test]
    fn counts_ports_and_gates() {
        let stats = NetlistStats::from_graph(&mixed());
        assert_eq!(stats.total_inputs, 2);
        assert_eq!(stats.primary_inputs, 1);
        assert_eq!(stats.inputs, 1);
        assert_eq!(stats.total_outputs, 1);
        assert_eq!(stats.outputs, 0);
        assert_eq!(stats.gates, 5);
        assert_eq!(stats.gate_type_count("NOR"), 2);
        assert_eq!(stats.gate_type_count("XOR"), 0);
    }

    #[test]
    fn known_types_come_first_then_sorted() {
        let stats = NetlistStats::from_graph(&mixed());
        let order: Vec<_> = stats.gate_types.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, vec!["NOT", "NOR", "AOI", "MUX"]);
    }

    #[test]
    fn display_skips_absent_types() {
        let text = NetlistStats::from_graph(&mixed()).to_string();
        assert!(text.contains("Netlist name: mixed"));
        assert!(text.contains("Number of NOR gates: 2"));
        assert!(!text.contains("XOR"));
    }
}
