//! # Assembly Script Synthesis
//!
//! Renders a [`DeviceMap`] as a script in the Eugene rule language.
//!
//! Block order (each block is followed by a blank line):
//!
//! 1. `PartType` declarations
//! 2. part declarations with sequences
//! 3. one `Device <base>_device(...)` per vertex
//! 4. one `Rule <base>_rules` per vertex
//! 5. `<base>_devices = product(<base>_device);`
//! 6. gate aliases `Device gate_<base>();` and the `circuit` device
//! 7. the `allRules` circuit rule
//! 8. nested `for` loops collecting every `permute(circuit)` result
//!
//! The base name of a device is the gate type for primary ports and the
//! library gate's regulator for logic gates. It must be unique per run,
//! since the solver reports components by `gate_<base>` name only.

use super::device::DeviceMap;
use crate::library::rules::{self, ALL_FORWARD, AND, CONTAINS, EXACTLY};
use crate::library::{Library, Part};
use crate::{CassetteError, Graph, VertexId};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use tracing::{debug, warn};

/// Name prefix of the gate-level device aliases.
pub const GATE_PREFIX: &str = "gate_";

/// Default name of the collection the script fills.
pub const RESULT_COLLECTION: &str = "allResults";

const CIRCUIT: &str = "circuit";

// =============================================================================
// ASSEMBLY SCRIPT
// =============================================================================

/// A synthesized script plus the names needed to read the solver's answer.
#[derive(Debug, Clone)]
pub struct AssemblyScript {
    text: String,
    collection: String,
    gates: BTreeMap<String, VertexId>,
}

impl AssemblyScript {
    /// Script text handed to the solver.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Name of the result collection the script fills.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Vertex that owns the gate-level device `gate_<base>`.
    #[must_use]
    pub fn gate_vertex(&self, gate_name: &str) -> Option<VertexId> {
        gate_name
            .strip_prefix(GATE_PREFIX)
            .and_then(|base| self.gates.get(base))
            .copied()
    }

    /// Gate-level device names in sorted order.
    pub fn gate_names(&self) -> impl Iterator<Item = String> + '_ {
        self.gates.keys().map(|base| format!("{GATE_PREFIX}{base}"))
    }
}

// =============================================================================
// SYNTHESIS
// =============================================================================

/// Render the script for `devices`, filling the collection `collection`.
pub fn synthesize(
    graph: &Graph,
    library: &Library,
    devices: &DeviceMap,
    collection: &str,
) -> Result<AssemblyScript, CassetteError> {
    if devices.is_empty() {
        return Err(CassetteError::AssemblyFailure(
            "no devices collected; the netlist has no reachable sink".to_string(),
        ));
    }

    let mut entries: Vec<(String, &[Part])> = Vec::with_capacity(devices.len());
    let mut gates = BTreeMap::new();
    for (vertex, parts) in devices.iter() {
        let base = base_name(graph, library, vertex)?;
        if let Some(previous) = gates.insert(base.clone(), vertex) {
            return Err(CassetteError::AssemblyFailure(format!(
                "vertices '{}' and '{}' both map to device '{}'",
                graph.vertex(previous).name(),
                graph.vertex(vertex).name(),
                base
            )));
        }
        entries.push((base, parts));
    }

    let mut blocks = Vec::new();
    blocks.push(part_types(&entries));
    blocks.push(part_definitions(&entries));
    blocks.push(
        entries
            .iter()
            .map(|(base, parts)| device_definition(base, parts))
            .collect::<Vec<_>>()
            .join("\n"),
    );
    blocks.push(
        entries
            .iter()
            .map(|(base, parts)| device_rules(base, parts, &library.rules().part_rules))
            .collect::<Vec<_>>()
            .join("\n\n"),
    );
    blocks.push(
        entries
            .iter()
            .map(|(base, _)| format!("{base}_devices = product({base}_device);"))
            .collect::<Vec<_>>()
            .join("\n"),
    );
    let mut aliases: Vec<String> = entries
        .iter()
        .map(|(base, _)| format!("Device {GATE_PREFIX}{base}();"))
        .collect();
    aliases.push(format!("Device {CIRCUIT}();"));
    blocks.push(aliases.join("\n"));
    blocks.push(circuit_rules(&entries, &library.rules().gate_rules));
    blocks.push(result_loops(&entries, collection));

    let mut text = String::new();
    for block in blocks {
        text.push_str(&block);
        text.push_str("\n\n");
    }
    debug!(devices = entries.len(), bytes = text.len(), "assembly script rendered");

    Ok(AssemblyScript {
        text,
        collection: collection.to_string(),
        gates,
    })
}

/// Device base name for a vertex.
fn base_name(graph: &Graph, library: &Library, vertex: VertexId) -> Result<String, CassetteError> {
    let v = graph.vertex(vertex);
    let node_type = v.node_type();
    if node_type.is_all_input() || node_type.is_all_output() {
        return Ok(v.gate_type().to_string());
    }
    library
        .gate(v.gate_type())
        .map(|gate| gate.regulator.clone())
        .ok_or_else(|| CassetteError::UnknownGate {
            vertex: v.name().to_string(),
            name: v.gate_type().to_string(),
        })
}

fn distinct_lines(entries: &[(String, &[Part])], line: impl Fn(&Part) -> String) -> String {
    let mut seen = BTreeSet::new();
    let mut lines = Vec::new();
    for part in entries.iter().flat_map(|(_, parts)| parts.iter()) {
        let text = line(part);
        if seen.insert(text.clone()) {
            lines.push(text);
        }
    }
    lines.join("\n")
}

fn part_types(entries: &[(String, &[Part])]) -> String {
    distinct_lines(entries, |part| format!("PartType {};", part.part_type))
}

fn part_definitions(entries: &[(String, &[Part])]) -> String {
    distinct_lines(entries, |part| {
        format!(
            "{} {}(.SEQUENCE(\"{}\"));",
            part.part_type, part.name, part.dna_sequence
        )
    })
}

fn device_definition(base: &str, parts: &[Part]) -> String {
    let items: Vec<String> = parts
        .iter()
        .map(|part| {
            if part.is_promoter() {
                format!("\t{}", part.part_type)
            } else {
                format!("\t{}", part.name)
            }
        })
        .collect();
    format!("Device {base}_device(\n{}\n);", items.join(",\n"))
}

fn device_rules(base: &str, parts: &[Part], part_rules: &[String]) -> String {
    let names: BTreeSet<&str> = parts.iter().map(|p| p.name.as_str()).collect();

    let mut conjuncts: Vec<String> = parts
        .iter()
        .filter(|p| p.is_promoter())
        .map(|p| format!("{CONTAINS} {}", p.name))
        .collect();

    let mut starts_with: Option<&str> = None;
    for rule in part_rules {
        if !rules::referenced_names(rule).is_subset(&names) {
            continue;
        }
        if rules::is_starts_with(rule) {
            if let Some(kept) = starts_with {
                warn!(device = base, kept, dropped = %rule, "dropping extra STARTSWITH rule");
                continue;
            }
            starts_with = Some(rule.as_str());
        }
        if !conjuncts.iter().any(|c| c == rule) {
            conjuncts.push(rule.clone());
        }
    }

    let mut text = format!("Rule {base}_rules ( ON {base}_device:\n");
    for conjunct in conjuncts {
        // Writing to a String never fails.
        let _ = writeln!(text, "\t{conjunct} {AND}");
    }
    let _ = write!(text, "\t{ALL_FORWARD}\n);");
    text
}

fn circuit_rules(entries: &[(String, &[Part])], gate_rules: &[String]) -> String {
    let gate_names: BTreeSet<String> = entries
        .iter()
        .map(|(base, _)| format!("{GATE_PREFIX}{base}"))
        .collect();
    let gate_refs: BTreeSet<&str> = gate_names.iter().map(String::as_str).collect();

    let mut conjuncts: Vec<String> = entries
        .iter()
        .map(|(base, _)| format!("{GATE_PREFIX}{base} {EXACTLY} 1"))
        .collect();
    for rule in gate_rules {
        if rules::referenced_names(rule).is_subset(&gate_refs) && !conjuncts.contains(rule) {
            conjuncts.push(rule.clone());
        }
    }

    format!(
        "Rule allRules( ON {CIRCUIT}:\n\t{}\n);",
        conjuncts.join(&format!(" {AND}\n\t"))
    )
}

fn result_loops(entries: &[(String, &[Part])], collection: &str) -> String {
    let mut text = format!("Array {collection};\n\n");
    for (i, (base, _)) in entries.iter().enumerate() {
        let n = i + 1;
        let _ = writeln!(
            text,
            "for(num i{n} = 0; i{n} < sizeof({base}_devices); i{n} = i{n} + 1) {{"
        );
    }
    text.push('\n');
    for (i, (base, _)) in entries.iter().enumerate() {
        let _ = writeln!(text, "{GATE_PREFIX}{base} = {base}_devices[i{}];", i + 1);
    }
    let members: Vec<String> = entries
        .iter()
        .map(|(base, _)| format!("\t{GATE_PREFIX}{base}"))
        .collect();
    let _ = write!(
        text,
        "\nDevice {CIRCUIT}(\n{}\n);\n\nresult = permute({CIRCUIT});\n\n{collection} = {collection} + result;\n\n",
        members.join(",\n")
    );
    text.push_str(&"}\n".repeat(entries.len()));
    text.trim_end().to_string()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::device::device_for;
    use crate::library::{
        Gate, InputSensor, LibraryDocument, OutputReporter, ResponseFunction, ResponseVariable,
        Rules,
    };
    use crate::{GraphBuilder, NodeType, VertexRole};

    fn library(part_rules: &[&str], gate_rules: &[&str]) -> Library {
        library_with("promoter", part_rules, gate_rules)
    }

    fn library_with(promoter_type: &str, part_rules: &[&str], gate_rules: &[&str]) -> Library {
        Library::from_document(LibraryDocument {
            parts: vec![
                Part::new("pTac", promoter_type, "AACG"),
                Part::new("pAmtR", promoter_type, "GATT"),
                Part::new("A1", "rbs", "AGGA"),
                Part::new("AmtR", "cds", "ATGC"),
                Part::new("L3S2P55", "terminator", "CCCG"),
                Part::new("YFP", "cds", "ATGT"),
            ],
            gates: vec![Gate {
                name: "A1_AmtR".to_string(),
                regulator: "AmtR".to_string(),
                gate_type: "NOT".to_string(),
                promoter: "pAmtR".to_string(),
                cassette: [(
                    "x".to_string(),
                    vec!["A1".to_string(), "AmtR".to_string(), "L3S2P55".to_string()],
                )]
                .into_iter()
                .collect(),
                response_function: ResponseFunction {
                    equation: "x".to_string(),
                    variables: vec![ResponseVariable {
                        name: "x".to_string(),
                        off_threshold: None,
                        on_threshold: None,
                    }],
                    parameters: BTreeMap::new(),
                },
            }],
            input_sensors: vec![InputSensor {
                name: "pTac".to_string(),
                parts: vec!["pTac".to_string()],
            }],
            output_reporters: vec![OutputReporter {
                name: "YFP_reporter".to_string(),
                parts: vec!["YFP".to_string()],
            }],
            rules: Rules {
                part_rules: part_rules.iter().map(|r| (*r).to_string()).collect(),
                gate_rules: gate_rules.iter().map(|r| (*r).to_string()).collect(),
            },
        })
        .expect("library")
    }

    /// in -> not -> out, devices collected sink-first.
    fn inverter(library: &Library) -> (Graph, DeviceMap) {
        let mut builder = GraphBuilder::new("inverter");
        let input = builder.add_vertex("in", VertexRole::Source, NodeType::PrimaryInput, "pTac");
        let not = builder.add_vertex("not", VertexRole::Inner, NodeType::parse("NOT"), "A1_AmtR");
        let out = builder.add_vertex("out", VertexRole::Sink, NodeType::PrimaryOutput, "YFP_reporter");
        builder.add_edge("w0", input, vec![not]);
        builder.add_edge("w1", not, vec![out]);
        let graph = builder.build().expect("build");

        let mut devices = DeviceMap::new();
        for v in [out, not, input] {
            devices.insert(v, device_for(&graph, library, v).expect("device"));
        }
        (graph, devices)
    }

    fn render(part_rules: &[&str], gate_rules: &[&str]) -> AssemblyScript {
        let library = library(part_rules, gate_rules);
        let (graph, devices) = inverter(&library);
        synthesize(&graph, &library, &devices, RESULT_COLLECTION).expect("synthesize")
    }

    #[test]
    fn declarations_are_distinct_in_first_seen_order() {
        let script = render(&[], &[]);
        let text = script.text();
        assert!(text.starts_with("PartType promoter;\nPartType cds;\nPartType rbs;\nPartType terminator;\n\n"));
        assert_eq!(text.matches("promoter pAmtR(.SEQUENCE(\"GATT\"));").count(), 1);
        assert!(text.contains("cds YFP(.SEQUENCE(\"ATGT\"));"));
    }

    #[test]
    fn device_definitions_leave_promoters_open() {
        let text = render(&[], &[]).text().to_string();
        assert!(text.contains("Device YFP_reporter_device(\n\tpromoter,\n\tYFP\n);"));
        assert!(text.contains("Device AmtR_device(\n\tpromoter,\n\tA1,\n\tAmtR,\n\tL3S2P55\n);"));
        assert!(text.contains("Device pTac_device(\n\tpromoter\n);"));
    }

    #[test]
    fn promoter_slot_uses_declared_part_type() {
        let library = library_with("Promoter", &[], &[]);
        let (graph, devices) = inverter(&library);
        let text = synthesize(&graph, &library, &devices, RESULT_COLLECTION)
            .expect("synthesize")
            .text()
            .to_string();

        assert!(text.contains("PartType Promoter;"));
        assert!(!text.contains("PartType promoter;"));
        assert!(text.contains("Device pTac_device(\n\tPromoter\n);"));
        assert!(text.contains("Device AmtR_device(\n\tPromoter,\n\tA1,"));
        assert!(!text.contains("\tpromoter"));
    }

    #[test]
    fn empty_device_map_is_assembly_failure() {
        let library = library(&[], &[]);
        let (graph, _) = inverter(&library);
        let result = synthesize(&graph, &library, &DeviceMap::new(), RESULT_COLLECTION);
        assert!(matches!(result, Err(CassetteError::AssemblyFailure(_))));
    }

    #[test]
    fn device_rules_pin_promoters_and_keep_matching_fragments() {
        let text = render(&["STARTSWITH pAmtR", "A1 BEFORE AmtR", "YFP BEFORE GFP"], &[])
            .text()
            .to_string();
        assert!(text.contains(
            "Rule AmtR_rules ( ON AmtR_device:\n\tCONTAINS pTac AND\n\tA1 BEFORE AmtR AND\n\tALL_FORWARD\n);"
        ));
        assert!(text.contains(
            "Rule YFP_reporter_rules ( ON YFP_reporter_device:\n\tCONTAINS pAmtR AND\n\tSTARTSWITH pAmtR AND\n\tALL_FORWARD\n);"
        ));
        assert!(!text.contains("GFP"));
    }

    #[test]
    fn only_first_starts_with_fragment_is_kept() {
        let text = render(&["STARTSWITH pAmtR", "STARTSWITH YFP"], &[])
            .text()
            .to_string();
        assert!(text.contains("\tSTARTSWITH pAmtR AND\n"));
        assert!(!text.contains("STARTSWITH YFP"));
    }

    #[test]
    fn gate_aliases_products_and_circuit_rule() {
        let script = render(&[], &["gate_AmtR BEFORE gate_YFP_reporter", "gate_Foo BEFORE gate_AmtR"]);
        let text = script.text();
        assert!(text.contains("AmtR_devices = product(AmtR_device);"));
        assert!(text.contains("Device gate_YFP_reporter();\nDevice gate_AmtR();\nDevice gate_pTac();\nDevice circuit();"));
        assert!(text.contains(
            "Rule allRules( ON circuit:\n\tgate_YFP_reporter EXACTLY 1 AND\n\tgate_AmtR EXACTLY 1 AND\n\tgate_pTac EXACTLY 1 AND\n\tgate_AmtR BEFORE gate_YFP_reporter\n);"
        ));
        assert!(!text.contains("gate_Foo"));
    }

    #[test]
    fn result_loops_nest_once_per_device() {
        let script = render(&[], &[]);
        let text = script.text();
        assert!(text.contains("Array allResults;"));
        assert!(text.contains("for(num i1 = 0; i1 < sizeof(YFP_reporter_devices); i1 = i1 + 1) {"));
        assert!(text.contains("for(num i3 = 0; i3 < sizeof(pTac_devices); i3 = i3 + 1) {"));
        assert!(text.contains("gate_AmtR = AmtR_devices[i2];"));
        assert!(text.contains("result = permute(circuit);"));
        assert!(text.contains("allResults = allResults + result;"));
        assert!(text.trim_end().ends_with("}\n}\n}"));
    }

    #[test]
    fn gate_vertex_resolves_prefixed_names() {
        let library = library(&[], &[]);
        let (graph, devices) = inverter(&library);
        let script = synthesize(&graph, &library, &devices, "custom").expect("synthesize");
        assert_eq!(script.collection(), "custom");
        assert!(script.text().contains("Array custom;"));
        assert_eq!(script.gate_vertex("gate_AmtR"), graph.find_vertex("not"));
        assert_eq!(script.gate_vertex("AmtR"), None);
        assert_eq!(script.gate_names().count(), 3);
    }

    #[test]
    fn colliding_base_names_fail() {
        let library = library(&[], &[]);
        let mut builder = GraphBuilder::new("twins");
        let a = builder.add_vertex("a", VertexRole::Source, NodeType::PrimaryInput, "pTac");
        let b = builder.add_vertex("b", VertexRole::Source, NodeType::PrimaryInput, "pTac");
        let graph = builder.build().expect("build");
        let mut devices = DeviceMap::new();
        devices.insert(a, vec![Part::new("pTac", "promoter", "AACG")]);
        devices.insert(b, vec![Part::new("pTac", "promoter", "AACG")]);

        let result = synthesize(&graph, &library, &devices, RESULT_COLLECTION);
        assert!(matches!(result, Err(CassetteError::AssemblyFailure(_))));
    }
}
