//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::CassetteConfig;
use cassette_core::{
    AssemblyPlanner, Bfs, CassetteError, CommandSolver, Graph, Library, NetlistStats,
    PlacementReport, ReplaySolver, Solver, StageDataRegistry, graph_from_json, graph_to_json,
};
use std::path::{Path, PathBuf};
use tracing::info;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a netlist, library or solver response file (100 MB).
const MAX_INPUT_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Suffix of the assembly script written next to the output netlist.
pub const SCRIPT_SUFFIX: &str = "_assembly.eug";

/// Suffix of the placed netlist.
pub const NETLIST_SUFFIX: &str = "_outputNetlist.json";

// =============================================================================
// FILE HELPERS
// =============================================================================

/// Resolve an input path and check it is a regular file of bounded size.
fn validate_file_path(path: &Path) -> Result<PathBuf, CassetteError> {
    let canonical = path.canonicalize().map_err(|e| {
        CassetteError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(CassetteError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| CassetteError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_INPUT_FILE_SIZE {
        return Err(CassetteError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_INPUT_FILE_SIZE
        )));
    }

    Ok(canonical)
}

fn read_input(path: &Path) -> Result<String, CassetteError> {
    let path = validate_file_path(path)?;
    std::fs::read_to_string(&path)
        .map_err(|e| CassetteError::IoError(format!("Cannot read '{}': {}", path.display(), e)))
}

/// Create the output directory if needed and return its canonical form.
fn prepare_output_dir(dir: &Path) -> Result<PathBuf, CassetteError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        CassetteError::IoError(format!(
            "Cannot create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;
    dir.canonicalize().map_err(|e| {
        CassetteError::IoError(format!(
            "Invalid output directory '{}': {}",
            dir.display(),
            e
        ))
    })
}

fn write_output(path: &Path, contents: &str) -> Result<(), CassetteError> {
    std::fs::write(path, contents)
        .map_err(|e| CassetteError::IoError(format!("Cannot write '{}': {}", path.display(), e)))?;
    info!(path = %path.display(), bytes = contents.len(), "wrote output file");
    Ok(())
}

/// File stem of the netlist, used to name outputs.
fn netlist_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "netlist".to_string())
}

/// Load a netlist document into a graph.
pub fn load_netlist(path: &Path) -> Result<Graph, CassetteError> {
    let text = read_input(path)?;
    let graph = graph_from_json(&text, &StageDataRegistry::builtin())?;
    info!(
        netlist = graph.name(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "netlist loaded"
    );
    Ok(graph)
}

/// Load a target library document.
pub fn load_library(path: &Path) -> Result<Library, CassetteError> {
    let library = Library::load(&validate_file_path(path)?)?;
    info!(
        parts = library.part_count(),
        gates = library.gate_count(),
        "library loaded"
    );
    Ok(library)
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// PLACE COMMAND
// =============================================================================

/// Files written by a successful placement.
#[derive(Debug, Clone)]
pub struct PlaceOutcome {
    pub script: PathBuf,
    pub netlist: PathBuf,
    pub report: PlacementReport,
}

/// Run the full planner and write the script and the placed netlist.
///
/// The script is written before the solver runs, so it is available for
/// inspection even when the solver fails.
pub fn place(
    config: &CassetteConfig,
    netlist_path: &Path,
    library_path: &Path,
    replay: Option<&Path>,
) -> Result<PlaceOutcome, CassetteError> {
    let mut graph = load_netlist(netlist_path)?;
    let library = load_library(library_path)?;
    let out_dir = prepare_output_dir(&config.output.directory)?;
    let stem = netlist_stem(netlist_path);

    let solver: Box<dyn Solver> = match replay {
        Some(path) => {
            let text = read_input(path)?;
            Box::new(
                ReplaySolver::from_json_str(&text)
                    .map_err(|e| CassetteError::AssemblyFailure(e.to_string()))?,
            )
        }
        None => Box::new(
            CommandSolver::new(&config.solver.command).with_args(config.solver.args.clone()),
        ),
    };

    let synthesized = AssemblyPlanner::new(&library)
        .with_collection(config.solver.collection.clone())
        .collect(&mut graph)?
        .synthesize(&graph)?;
    let script = out_dir.join(format!("{stem}{SCRIPT_SUFFIX}"));
    write_output(&script, synthesized.script().text())?;

    let report = synthesized.solve(solver.as_ref())?.reconcile(&mut graph)?;

    let netlist = out_dir.join(format!("{stem}{NETLIST_SUFFIX}"));
    write_output(&netlist, &graph_to_json(&graph)?)?;

    Ok(PlaceOutcome {
        script,
        netlist,
        report,
    })
}

/// Place devices and report what was written.
pub fn cmd_place(
    config: &CassetteConfig,
    netlist_path: &Path,
    library_path: &Path,
    replay: Option<&Path>,
    json_mode: bool,
    verbose: bool,
) -> Result<(), CassetteError> {
    let outcome = place(config, netlist_path, library_path, replay)?;

    if json_mode {
        print_json(&serde_json::json!({
            "script": outcome.script.to_string_lossy(),
            "netlist": outcome.netlist.to_string_lossy(),
            "assemblies": outcome.report.assemblies,
            "placements": outcome.report.placements,
            "per_vertex": outcome.report.per_vertex,
        }));
        return Ok(());
    }

    println!("Placement Complete");
    println!("==================");
    println!("Script:      {}", outcome.script.display());
    println!("Netlist:     {}", outcome.netlist.display());
    println!("Assemblies:  {}", outcome.report.assemblies);
    println!("Placements:  {}", outcome.report.placements);
    if verbose {
        println!();
        for (vertex, count) in &outcome.report.per_vertex {
            println!("  {:<20} {}", vertex, count);
        }
    }

    Ok(())
}

// =============================================================================
// SCRIPT COMMAND
// =============================================================================

/// Collect devices and write the assembly script without solving.
pub fn cmd_script(
    config: &CassetteConfig,
    netlist_path: &Path,
    library_path: &Path,
    json_mode: bool,
) -> Result<(), CassetteError> {
    let mut graph = load_netlist(netlist_path)?;
    let library = load_library(library_path)?;
    let out_dir = prepare_output_dir(&config.output.directory)?;

    let synthesized = AssemblyPlanner::new(&library)
        .with_collection(config.solver.collection.clone())
        .collect(&mut graph)?
        .synthesize(&graph)?;
    let script = out_dir.join(format!("{}{SCRIPT_SUFFIX}", netlist_stem(netlist_path)));
    write_output(&script, synthesized.script().text())?;

    if json_mode {
        print_json(&serde_json::json!({
            "script": script.to_string_lossy(),
            "devices": synthesized.devices().len(),
        }));
    } else {
        println!("Script:   {}", script.display());
        println!("Devices:  {}", synthesized.devices().len());
    }

    Ok(())
}

// =============================================================================
// ORDER COMMAND
// =============================================================================

/// Print the breadth-first visiting order of a netlist.
pub fn cmd_order(netlist_path: &Path, sink_rooted: bool, json_mode: bool) -> Result<(), CassetteError> {
    let graph = load_netlist(netlist_path)?;
    let bfs = if sink_rooted {
        Bfs::sink_rooted(&graph)
    } else {
        Bfs::forward(&graph)
    };
    let order: Vec<&str> = bfs.map(|v| graph.vertex(v).name()).collect();

    if json_mode {
        print_json(&serde_json::json!({
            "direction": if sink_rooted { "sink_rooted" } else { "forward" },
            "order": order,
        }));
        return Ok(());
    }

    for name in order {
        println!("{}", name);
    }
    Ok(())
}

// =============================================================================
// STATS COMMAND
// =============================================================================

/// Show netlist statistics.
pub fn cmd_stats(netlist_path: &Path, json_mode: bool) -> Result<(), CassetteError> {
    let graph = load_netlist(netlist_path)?;
    let stats = NetlistStats::from_graph(&graph);

    if json_mode {
        print_json(&serde_json::to_value(&stats)?);
    } else {
        print!("{}", stats);
    }
    Ok(())
}
