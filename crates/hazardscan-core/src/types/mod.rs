//! # Core Type Definitions
//!
//! This module contains the vocabulary shared by every layer of the pipeline:
//! - Signal identifiers (`Signal`)
//! - Experiment and stage identifiers (`Experiment`, `StageId`)
//! - Fixed-width bit-vectors (`BitVector`)
//! - Error types (`HazardError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`

mod bitvec;

pub use bitvec::BitVector;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// SIGNALS
// =============================================================================

/// One named boolean wire of the pipeline.
///
/// The meaning of a signal is stable across stages. Which signals a stage
/// actually carries is decided by its [`SignalOrder`](crate::SignalOrder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// Synchronous reset.
    #[serde(rename = "rst")]
    Reset,
    /// Global enable.
    #[serde(rename = "en")]
    Enable,
    /// Bus A driver active.
    #[serde(rename = "busA_drive")]
    BusADrive,
    /// Bus B driver active.
    #[serde(rename = "busB_drive")]
    BusBDrive,
    /// Write enable on port A.
    #[serde(rename = "weA")]
    WriteEnableA,
    /// Write enable on port B.
    #[serde(rename = "weB")]
    WriteEnableB,
    /// Both write ports address the same location.
    #[serde(rename = "addr_eq")]
    AddrEq,
    /// Handshake request.
    #[serde(rename = "req")]
    Request,
    /// Handshake acknowledge.
    #[serde(rename = "ack")]
    Ack,
    /// Mode select, low bit.
    #[serde(rename = "mode0")]
    Mode0,
    /// Mode select, high bit.
    #[serde(rename = "mode1")]
    Mode1,
    /// Parity error flag.
    #[serde(rename = "parity_err")]
    ParityErr,
    /// Timeout flag.
    #[serde(rename = "timeout")]
    Timeout,
    /// Unit busy.
    #[serde(rename = "busy")]
    Busy,
    /// Derived hazard flag (stage 2 only).
    #[serde(rename = "hazard")]
    Hazard,
    /// Derived stall flag (stage 2 only).
    #[serde(rename = "stall")]
    Stall,
}

impl Signal {
    /// Every known signal, in schema order.
    pub const ALL: [Signal; 16] = [
        Signal::Reset,
        Signal::Enable,
        Signal::BusADrive,
        Signal::BusBDrive,
        Signal::WriteEnableA,
        Signal::WriteEnableB,
        Signal::AddrEq,
        Signal::Request,
        Signal::Ack,
        Signal::Mode0,
        Signal::Mode1,
        Signal::ParityErr,
        Signal::Timeout,
        Signal::Busy,
        Signal::Hazard,
        Signal::Stall,
    ];

    /// The four core activity signals gated by `en` in stage 1.
    pub const GATED: [Signal; 4] = [
        Signal::BusADrive,
        Signal::BusBDrive,
        Signal::WriteEnableA,
        Signal::WriteEnableB,
    ];

    /// Position of this signal in the fixed record schema.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire name as used in signatures and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Signal::Reset => "rst",
            Signal::Enable => "en",
            Signal::BusADrive => "busA_drive",
            Signal::BusBDrive => "busB_drive",
            Signal::WriteEnableA => "weA",
            Signal::WriteEnableB => "weB",
            Signal::AddrEq => "addr_eq",
            Signal::Request => "req",
            Signal::Ack => "ack",
            Signal::Mode0 => "mode0",
            Signal::Mode1 => "mode1",
            Signal::ParityErr => "parity_err",
            Signal::Timeout => "timeout",
            Signal::Busy => "busy",
            Signal::Hazard => "hazard",
            Signal::Stall => "stall",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Signal {
    type Err = HazardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signal::ALL
            .iter()
            .copied()
            .find(|signal| signal.name() == s)
            .ok_or_else(|| HazardError::UnknownSignal(s.to_string()))
    }
}

// =============================================================================
// EXPERIMENTS & STAGES
// =============================================================================

/// Experiment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Experiment {
    /// 7-bit experiment, both stages share one order.
    Exp1,
    /// 14-bit stage 1, 16-bit stage 2.
    Exp2,
}

impl Experiment {
    /// All configured experiments.
    pub const ALL: [Experiment; 2] = [Experiment::Exp1, Experiment::Exp2];

    /// Canonical experiment name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Experiment::Exp1 => "exp1",
            Experiment::Exp2 => "exp2",
        }
    }
}

impl std::fmt::Display for Experiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Experiment {
    type Err = HazardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Experiment::ALL
            .iter()
            .copied()
            .find(|exp| exp.name() == s)
            .ok_or_else(|| HazardError::UnknownExperiment(s.to_string()))
    }
}

/// Observation point in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StageId {
    /// Output of the first stage.
    #[serde(rename = "1")]
    One,
    /// Output of the second stage.
    #[serde(rename = "2")]
    Two,
}

impl StageId {
    /// Both stages, pipeline order.
    pub const ALL: [StageId; 2] = [StageId::One, StageId::Two];

    /// Stage label ("1" or "2").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StageId::One => "1",
            StageId::Two => "2",
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stage {}", self.as_str())
    }
}

impl FromStr for StageId {
    type Err = HazardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(StageId::One),
            "2" => Ok(StageId::Two),
            other => Err(HazardError::UnknownStage(other.to_string())),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the hazardscan system.
///
/// - No silent failures
/// - Use `Result<T, HazardError>` for fallible operations
/// - Every error is terminal for the call that raised it; there are no
///   partial enumeration results
#[derive(Debug, Error)]
pub enum HazardError {
    /// The experiment name is not in the configuration table.
    #[error("Unknown experiment: {0}")]
    UnknownExperiment(String),

    /// The stage identifier is not "1" or "2".
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    /// The signal name is not part of the schema.
    #[error("Unknown signal: {0}")]
    UnknownSignal(String),

    /// A bit-vector does not match the width of the order it is read through.
    #[error("Width mismatch: expected {expected} bits, got {actual}")]
    WidthMismatch {
        /// Width of the signal order.
        expected: usize,
        /// Width of the offending bit-vector.
        actual: usize,
    },

    /// A bit-vector string or value is malformed.
    #[error("Invalid bit-vector: {0}")]
    InvalidBitVector(String),

    /// The input domain is too wide for exhaustive enumeration.
    #[error("Enumeration domain too large: {width} bits exceeds limit of {limit}")]
    DomainTooLarge {
        /// Requested width.
        width: usize,
        /// Maximum enumerable width.
        limit: usize,
    },

    /// An enumeration worker did not complete.
    #[error("Enumeration failed: {0}")]
    EnumerationFailed(String),

    /// Settings could not be loaded or are inconsistent.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
