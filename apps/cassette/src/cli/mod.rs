//! # Cassette CLI Module
//!
//! This module implements the CLI interface for cassette.
//!
//! ## Available Commands
//!
//! - `place` - Place every device of a netlist with the external solver
//! - `script` - Write the assembly script without running the solver
//! - `order` - Print a traversal order of the netlist
//! - `stats` - Print netlist statistics

mod commands;

use crate::config::CassetteConfig;
use cassette_core::CassetteError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Cassette - genetic circuit device placement
///
/// Reads a technology-mapped netlist and a target library, and arranges the
/// devices of every gate into assemblies with an external rule solver.
#[derive(Parser, Debug)]
#[command(name = "cassette")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file (defaults to ./cassette.toml if present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Place devices and write the placed netlist
    Place {
        /// Netlist document (JSON)
        #[arg(short, long)]
        netlist: PathBuf,

        /// Target library document (JSON)
        #[arg(short, long)]
        library: PathBuf,

        /// Output directory (overrides the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Answer with a recorded solver response instead of running the solver
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Solver program (overrides the configured one)
        #[arg(long)]
        solver: Option<String>,
    },

    /// Write the assembly script only
    Script {
        /// Netlist document (JSON)
        #[arg(short, long)]
        netlist: PathBuf,

        /// Target library document (JSON)
        #[arg(short, long)]
        library: PathBuf,

        /// Output directory (overrides the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the breadth-first visiting order
    Order {
        /// Netlist document (JSON)
        #[arg(short, long)]
        netlist: PathBuf,

        /// Start from the outputs and walk edges backwards
        #[arg(short, long)]
        sink_rooted: bool,
    },

    /// Show netlist statistics
    Stats {
        /// Netlist document (JSON)
        #[arg(short, long)]
        netlist: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), CassetteError> {
    let mut config = CassetteConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Place {
            netlist,
            library,
            output,
            replay,
            solver,
        } => {
            if let Some(dir) = output {
                config.output.directory = dir;
            }
            if let Some(program) = solver {
                config.solver.command = program;
            }
            cmd_place(
                &config,
                &netlist,
                &library,
                replay.as_deref(),
                json_mode,
                cli.verbose,
            )
        }
        Commands::Script {
            netlist,
            library,
            output,
        } => {
            if let Some(dir) = output {
                config.output.directory = dir;
            }
            cmd_script(&config, &netlist, &library, json_mode)
        }
        Commands::Order {
            netlist,
            sink_rooted,
        } => cmd_order(&netlist, sink_rooted, json_mode),
        Commands::Stats { netlist } => cmd_stats(&netlist, json_mode),
    }
}
