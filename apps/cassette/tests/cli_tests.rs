//! Integration tests for the cassette CLI commands.
//!
//! Every test works inside its own temporary directory and answers the
//! solver with a recorded response, so no external program is needed.

use cassette::cli::{
    Cli, Commands, NETLIST_SUFFIX, SCRIPT_SUFFIX, cmd_order, cmd_script, cmd_stats, load_library,
    load_netlist, place,
};
use cassette::config::CassetteConfig;
use cassette_core::CassetteError;
use clap::Parser;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// FIXTURES
// =============================================================================

const NETLIST: &str = r#"{
    "name": "inverter",
    "nodes": [
        { "name": "a", "nodeType": "PRIMARY_INPUT", "gateType": "pTac" },
        { "name": "$1", "nodeType": "NOT", "gateType": "A1_AmtR" },
        { "name": "y", "nodeType": "PRIMARY_OUTPUT", "gateType": "YFP_reporter" }
    ],
    "edges": [
        { "name": "w0", "src": "a", "dst": "$1" },
        { "name": "w1", "src": "$1", "dst": ["y"] }
    ]
}"#;

const LIBRARY: &str = r#"{
    "parts": [
        { "name": "pTac", "type": "promoter", "dnasequence": "AACGATCG" },
        { "name": "pAmtR", "type": "promoter", "dnasequence": "GATTCGTT" },
        { "name": "A1", "type": "rbs", "dnasequence": "GAGTCTAT" },
        { "name": "AmtR", "type": "cds", "dnasequence": "ATGGCAGG" },
        { "name": "L3S2P55", "type": "terminator", "dnasequence": "CTCGGTAC" },
        { "name": "YFP", "type": "cds", "dnasequence": "ATGGTGAG" }
    ],
    "gates": [{
        "name": "A1_AmtR", "regulator": "AmtR", "gate_type": "NOT", "promoter": "pAmtR",
        "cassette": { "x": ["A1", "AmtR", "L3S2P55"] },
        "response_function": { "equation": "x", "variables": [{ "name": "x" }] }
    }],
    "input_sensors": [{ "name": "pTac", "parts": ["pTac"] }],
    "output_reporters": [{ "name": "YFP_reporter", "parts": ["YFP"] }]
}"#;

const RESPONSE: &str = r#"{"collections": {"allResults": [{
    "name": "circuit_0",
    "components": [
        { "name": "gate_pTac", "orientation": "forward", "parts": ["pTac"] },
        { "name": "gate_AmtR", "orientation": "reverse", "parts": ["L3S2P55", "AmtR", "A1", "pTac"] },
        { "name": "gate_YFP_reporter", "orientation": "forward", "parts": ["pAmtR", "YFP"] }
    ]
}]}}"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, text) in [
            ("inverter.json", NETLIST),
            ("library.json", LIBRARY),
            ("response.json", RESPONSE),
        ] {
            std::fs::write(dir.path().join(name), text).expect("write fixture");
        }
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> CassetteConfig {
        let mut config = CassetteConfig::default();
        config.output.directory = self.path("out");
        config
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("read");
    serde_json::from_str(&text).expect("json")
}

// =============================================================================
// PLACE
// =============================================================================

#[test]
fn place_writes_script_and_placed_netlist() {
    let ws = Workspace::new();
    let outcome = place(
        &ws.config(),
        &ws.path("inverter.json"),
        &ws.path("library.json"),
        Some(&ws.path("response.json")),
    )
    .expect("place");

    assert!(outcome.script.ends_with(format!("inverter{SCRIPT_SUFFIX}")));
    assert!(outcome.netlist.ends_with(format!("inverter{NETLIST_SUFFIX}")));
    assert_eq!(outcome.report.placements, 3);

    let script = std::fs::read_to_string(&outcome.script).expect("script");
    assert!(script.contains("Device AmtR_device("));

    let placed = read_json(&outcome.netlist);
    let gate = &placed["nodes"][1];
    assert_eq!(gate["name"], "$1");
    assert_eq!(gate["placements"][0]["direction"], false);
    assert_eq!(gate["placements"][0]["parts"][0], "pTac");
    assert_eq!(gate["stageData"]["placing"]["algorithm"], "Eugene");
}

#[test]
fn placed_netlist_reloads() {
    let ws = Workspace::new();
    let outcome = place(
        &ws.config(),
        &ws.path("inverter.json"),
        &ws.path("library.json"),
        Some(&ws.path("response.json")),
    )
    .expect("place");

    let graph = load_netlist(&outcome.netlist).expect("reload");
    let y = graph.find_vertex("y").expect("y");
    assert_eq!(graph.vertex(y).results().placements().len(), 1);
}

#[test]
fn solver_error_keeps_script_but_writes_no_netlist() {
    let ws = Workspace::new();
    std::fs::write(ws.path("failed.json"), r#"{"error": "no valid arrangement"}"#)
        .expect("write");

    let result = place(
        &ws.config(),
        &ws.path("inverter.json"),
        &ws.path("library.json"),
        Some(&ws.path("failed.json")),
    );

    assert!(matches!(result, Err(CassetteError::AssemblyFailure(_))));
    assert!(!ws.path("out").join(format!("inverter{NETLIST_SUFFIX}")).exists());
}

#[test]
fn missing_collection_is_assembly_failure() {
    let ws = Workspace::new();
    std::fs::write(ws.path("other.json"), r#"{"collections": {"somethingElse": []}}"#)
        .expect("write");

    let result = place(
        &ws.config(),
        &ws.path("inverter.json"),
        &ws.path("library.json"),
        Some(&ws.path("other.json")),
    );

    assert!(matches!(result, Err(CassetteError::AssemblyFailure(_))));
    assert!(ws.path("out").join(format!("inverter{SCRIPT_SUFFIX}")).exists());
}

#[test]
fn missing_netlist_is_io_error() {
    let ws = Workspace::new();
    let result = place(
        &ws.config(),
        &ws.path("nope.json"),
        &ws.path("library.json"),
        Some(&ws.path("response.json")),
    );
    assert!(matches!(result, Err(CassetteError::IoError(_))));
}

// =============================================================================
// SCRIPT, ORDER, STATS
// =============================================================================

#[test]
fn script_command_writes_only_the_script() {
    let ws = Workspace::new();
    cmd_script(
        &ws.config(),
        &ws.path("inverter.json"),
        &ws.path("library.json"),
        true,
    )
    .expect("script");

    let out = ws.path("out");
    assert!(out.join(format!("inverter{SCRIPT_SUFFIX}")).is_file());
    assert!(!out.join(format!("inverter{NETLIST_SUFFIX}")).exists());
}

#[test]
fn order_and_stats_run_on_a_netlist() {
    let ws = Workspace::new();
    cmd_order(&ws.path("inverter.json"), true, true).expect("order");
    cmd_order(&ws.path("inverter.json"), false, false).expect("order");
    cmd_stats(&ws.path("inverter.json"), true).expect("stats");
}

#[test]
fn invalid_netlist_is_reported() {
    let ws = Workspace::new();
    std::fs::write(ws.path("broken.json"), "{ \"nodes\": [ { \"name\": 1 } ] }").expect("write");
    assert!(matches!(
        cmd_stats(&ws.path("broken.json"), false),
        Err(CassetteError::InvalidDocument(_))
    ));
}

#[test]
fn library_loads_from_disk() {
    let ws = Workspace::new();
    let library = load_library(&ws.path("library.json")).expect("library");
    assert_eq!(library.part_count(), 6);
    assert_eq!(library.gate_count(), 1);
}

#[test]
fn library_errors_are_reported() {
    let ws = Workspace::new();
    assert!(matches!(
        load_library(&ws.path("missing.json")),
        Err(CassetteError::IoError(_))
    ));

    std::fs::write(ws.path("bad_library.json"), r#"{"parts": [{"name": "p"}]}"#).expect("write");
    assert!(matches!(
        load_library(&ws.path("bad_library.json")),
        Err(CassetteError::InvalidDocument(_))
    ));
}

// =============================================================================
// ARGUMENT PARSING
// =============================================================================

#[test]
fn place_arguments_parse() {
    let cli = Cli::try_parse_from([
        "cassette",
        "--json-mode",
        "place",
        "-n",
        "net.json",
        "-l",
        "lib.json",
        "--replay",
        "resp.json",
    ])
    .expect("parse");

    assert!(cli.json_mode);
    match cli.command {
        Commands::Place {
            netlist, replay, ..
        } => {
            assert_eq!(netlist, PathBuf::from("net.json"));
            assert_eq!(replay, Some(PathBuf::from("resp.json")));
        }
        other => unreachable!("unexpected command {other:?}"),
    }
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["cassette"]).is_err());
}
