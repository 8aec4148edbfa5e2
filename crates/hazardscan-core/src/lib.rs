//! # hazardscan-core
//!
//! The deterministic classification engine for hazardscan - THE LOGIC.
//!
//! This crate models a two-stage combinational signal pipeline and classifies
//! every possible input against per-stage unsafe output signatures by
//! exhaustive enumeration. The resulting unsafe-input sets are exact and serve
//! as the ground-truth baseline for non-exhaustive verification strategies.
//!
//! ## Layers
//!
//! - `types`, `order`, `state` → signals, bit-vectors and their named decoding
//! - `config` → the static experiment table (signal orders, unsafe signatures)
//! - `transform` → the stage-1 and stage-2 transforms
//! - `enumerate` → exhaustive classification and summaries
//! - `system` → timing and the baseline report
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is pure: every transform is a function of its input and the static table
//! - Is closed: the experiment table is compiled in and never mutated
//! - Has NO async, NO I/O, NO logging (the application owns those)

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod enumerate;
pub mod order;
pub mod primitives;
pub mod state;
pub mod system;
pub mod transform;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{BitVector, Experiment, HazardError, Signal, StageId};

pub use order::SignalOrder;
pub use state::SignalState;

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use config::{
    ExperimentConfig, StageConfig, experiment_config, get_signal_order, get_unsafe_set, lookup,
    stage_config,
};
pub use enumerate::{
    Enumerator, InputDomain, PipelineTrace, UnsafeSetSummary, UnsafeSummary, find_unsafe_at_stage1,
    find_unsafe_at_stage2, stage2_only, summarize,
};
pub use transform::{HazardPipeline, Pipeline, stage1_transform, stage2_transform};

// =============================================================================
// RE-EXPORTS: System
// =============================================================================

pub use system::{BaselineReport, BaselineRun, Timing, recall_permille, run_baseline, timed};
