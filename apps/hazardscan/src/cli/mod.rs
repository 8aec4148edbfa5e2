//! # hazardscan CLI Module
//!
//! This module implements the CLI interface for hazardscan.
//!
//! ## Available Commands
//!
//! - `run` - Enumerate both stages, print the report, write artifacts (default)
//! - `signals` - Show signal orders and unsafe signatures
//! - `classify` - Trace one input vector through both stages
//! - `compare` - Compare recorded runtimes across engines

mod commands;

use crate::settings::Settings;
use clap::{Parser, Subcommand, ValueEnum};
use hazardscan_core::{Experiment, HazardError, StageId};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// hazardscan - exhaustive hazard baseline
///
/// Enumerates every input of a two-stage signal pipeline and reports the
/// exact set of inputs that reach an unsafe output signature.
#[derive(Parser, Debug)]
#[command(name = "hazardscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory receiving JSON artifacts
    #[arg(short = 'o', long, global = true)]
    pub results_dir: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which part of a baseline run is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StageView {
    /// Full report
    #[value(name = "1")]
    One,
    /// One-line stage-2 summary plus the stage-2 input dump
    #[value(name = "2")]
    Two,
    /// Full report
    #[default]
    All,
}

impl StageView {
    /// The single stage selected, if any.
    #[must_use]
    pub const fn stage(self) -> Option<StageId> {
        match self {
            Self::One => Some(StageId::One),
            Self::Two => Some(StageId::Two),
            Self::All => None,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the exhaustive baseline and write artifacts
    Run {
        /// Experiment (exp1, exp2); defaults to the configured experiment
        #[arg(short, long)]
        exp: Option<String>,

        /// Stage view (1, 2, all)
        #[arg(short, long, value_enum, default_value_t = StageView::All)]
        stage: StageView,

        /// Enumeration threads
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Show signal orders and unsafe signatures
    Signals {
        /// Experiment (exp1, exp2)
        #[arg(short, long)]
        exp: Option<String>,
    },

    /// Trace one stage-1-width input through both stages
    Classify {
        /// Experiment (exp1, exp2)
        #[arg(short, long)]
        exp: Option<String>,

        /// Input bits, most significant signal first
        bits: String,
    },

    /// Compare recorded runtimes across engines
    Compare,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve an optional experiment name against the configured default.
pub fn resolve_experiment(
    name: Option<&str>,
    settings: &Settings,
) -> Result<Experiment, HazardError> {
    name.map_or(Ok(settings.default_experiment), |n| n.parse())
}

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), HazardError> {
    let settings = Settings::resolve(cli.config.as_deref(), cli.results_dir)?;
    let json_mode = cli.json_mode;
    tracing::debug!(?settings, "settings resolved");

    match cli.command {
        Some(Commands::Run {
            exp,
            stage,
            workers,
        }) => {
            let experiment = resolve_experiment(exp.as_deref(), &settings)?;
            cmd_run(&settings, json_mode, experiment, stage, workers)
        }
        Some(Commands::Signals { exp }) => {
            let experiment = resolve_experiment(exp.as_deref(), &settings)?;
            cmd_signals(json_mode, experiment)
        }
        Some(Commands::Classify { exp, bits }) => {
            let experiment = resolve_experiment(exp.as_deref(), &settings)?;
            cmd_classify(json_mode, experiment, &bits)
        }
        Some(Commands::Compare) => cmd_compare(&settings, json_mode),
        None => {
            // No subcommand - run the configured experiment
            cmd_run(
                &settings,
                json_mode,
                settings.default_experiment,
                StageView::All,
                None,
            )
        }
    }
}
