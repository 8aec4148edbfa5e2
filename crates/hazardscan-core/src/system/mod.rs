//! # System Module
//!
//! Timing and baseline reporting for enumeration runs.
//!
//! Everything here is integer arithmetic over nanosecond counts: per-input
//! durations are kept in picoseconds and throughput in whole inputs per
//! second. Rendering and persistence belong to the application.

mod report;
mod timing;

pub use report::*;
pub use timing::*;
