//! # hazardscan
//!
//! Command-line front end of the exhaustive hazard baseline.
//!
//! - `cli` → clap commands and their implementations
//! - `settings` → TOML settings with environment and flag overrides
//! - `artifacts` → JSON artifacts and the cross-engine metrics reader
//! - `render` → integer-formatted console tables

pub mod artifacts;
pub mod cli;
pub mod render;
pub mod settings;
