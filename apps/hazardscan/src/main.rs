//! # hazardscan - Exhaustive Hazard Baseline
//!
//! The main binary for the hazardscan classification engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                apps/hazardscan (THE BINARY)              │
//! │                                                          │
//! │  ┌─────────────┐   ┌─────────────┐   ┌───────────────┐   │
//! │  │    CLI      │   │  Settings   │   │   Artifacts   │   │
//! │  │   (clap)    │   │   (toml)    │   │ (serde_json)  │   │
//! │  └──────┬──────┘   └──────┬──────┘   └───────┬───────┘   │
//! │         └─────────────────┼──────────────────┘           │
//! │                           ▼                              │
//! │                 ┌──────────────────┐                     │
//! │                 │  hazardscan-core │                     │
//! │                 │   (THE LOGIC)    │                     │
//! │                 └──────────────────┘                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Full two-stage baseline for exp2, four enumeration threads
//! hazardscan run --exp exp2 --workers 4
//!
//! # Stage-2 summary line plus the stage-2 input dump
//! hazardscan run --exp exp1 --stage 2
//!
//! # Inspect a single vector
//! hazardscan classify --exp exp1 0111000
//!
//! # Compare recorded runtimes across engines
//! hazardscan compare --results-dir results
//! ```

use clap::Parser;
use hazardscan::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing: HAZARDSCAN_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("HAZARDSCAN_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "hazardscan=debug"
    } else {
        "hazardscan=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

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

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the hazardscan startup banner.
fn print_banner() {
    println!(
        r#"
  hazardscan v{}
  Exhaustive two-stage hazard baseline
"#,
        env!("CARGO_PKG_VERSION")
    );
}
