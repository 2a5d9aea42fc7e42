//! # Cassette - Genetic Circuit Device Placement
//!
//! The main binary for the cassette placement pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 apps/cassette (THE BINARY)               │
//! │                                                          │
//! │  ┌─────────────┐   ┌─────────────┐   ┌───────────────┐   │
//! │  │    CLI      │   │   Config    │   │    Solver     │   │
//! │  │   (clap)    │   │   (toml)    │   │   (process)   │   │
//! │  └──────┬──────┘   └──────┬──────┘   └───────┬───────┘   │
//! │         └─────────────────┼──────────────────┘           │
//! │                           ▼                              │
//! │                   ┌───────────────┐                      │
//! │                   │ cassette-core │                      │
//! │                   │  (THE LOGIC)  │                      │
//! │                   └───────────────┘                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! cassette place -n and_gate.json -l Eco1C1G1T1.json -o out/
//! cassette place -n and_gate.json -l Eco1C1G1T1.json --replay response.json
//! cassette script -n and_gate.json -l Eco1C1G1T1.json
//! cassette order -n and_gate.json --sink-rooted
//! cassette stats -n and_gate.json --json-mode
//! ```

use cassette::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // CASSETTE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("CASSETTE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cassette=info,cassette_core=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner to stderr, keeping stdout for command output.
fn print_banner() {
    eprintln!(
        "\n  cassette v{}\n  netlist device placement\n",
        env!("CARGO_PKG_VERSION")
    );
}
