//! # Stage Transform Engine
//!
//! The two combinational stages of the pipeline. Both are pure functions of
//! their input and the static experiment table, defined over named signals
//! rather than bit positions.
//!
//! ## Stage 1
//!
//! - `rst` high: every signal except `rst` and `en` is cleared.
//! - otherwise: the four gated signals become `en AND input`, everything else
//!   passes through.
//!
//! ## Stage 2
//!
//! Rules apply in this order, later rules overriding earlier ones:
//!
//! 1. `contention = busA_drive AND busB_drive`
//! 2. `bothWrite = weA AND weB`
//! 3. `contention OR bothWrite` clears `en`
//! 4. `bothWrite` sets `addr_eq`
//! 5. `rst` clears the bus drives, write enables and `addr_eq`
//!
//! Signals added by the stage-2 order (`hazard`, `stall`) are never driven, so
//! for stage-1-width inputs they encode as 0.

use crate::config::{ExperimentConfig, experiment_config};
use crate::{BitVector, Experiment, HazardError, Signal, SignalState, StageId};

/// Signals cleared by the stage-2 reset rule.
const RESET_CLEARED: [Signal; 5] = [
    Signal::BusADrive,
    Signal::BusBDrive,
    Signal::WriteEnableA,
    Signal::WriteEnableB,
    Signal::AddrEq,
];

// =============================================================================
// PIPELINE TRAIT
// =============================================================================

/// A two-stage pipeline the enumeration engine can drive.
///
/// Implementations must be pure: the same input always yields the same output
/// and distinct inputs never influence each other. Enumeration relies on this
/// to split the input domain across threads.
pub trait Pipeline {
    /// Experiment whose configuration classifies the outputs.
    fn experiment(&self) -> Experiment;

    /// Apply the first stage to a stage-1-width input.
    fn stage1(&self, input: &BitVector) -> Result<BitVector, HazardError>;

    /// Apply the second stage to a stage-1 output.
    fn stage2(&self, stage1_output: &BitVector) -> Result<BitVector, HazardError>;
}

/// The configured hazard pipeline of one experiment.
#[derive(Debug, Clone, Copy)]
pub struct HazardPipeline {
    config: &'static ExperimentConfig,
}

impl HazardPipeline {
    /// Pipeline for `experiment`.
    pub fn new(experiment: Experiment) -> Result<Self, HazardError> {
        Ok(Self {
            config: experiment_config(experiment)?,
        })
    }

    /// Static configuration backing this pipeline.
    #[must_use]
    pub const fn config(&self) -> &'static ExperimentConfig {
        self.config
    }

    /// Decode `stage1_output` for stage 2: through the stage-2 order if the
    /// widths agree, otherwise through the stage-1 order.
    pub fn decode_for_stage2(&self, stage1_output: &BitVector) -> Result<SignalState, HazardError> {
        let order2 = self.config.stage(StageId::Two).order();
        if stage1_output.width() == order2.width() {
            order2.decode(stage1_output)
        } else {
            self.config.stage(StageId::One).order().decode(stage1_output)
        }
    }
}

impl Pipeline for HazardPipeline {
    fn experiment(&self) -> Experiment {
        self.config.experiment()
    }

    fn stage1(&self, input: &BitVector) -> Result<BitVector, HazardError> {
        let order = self.config.stage(StageId::One).order();
        let decoded = order.decode(input)?;
        order.encode(&apply_stage1(&decoded))
    }

    fn stage2(&self, stage1_output: &BitVector) -> Result<BitVector, HazardError> {
        let order2 = self.config.stage(StageId::Two).order();
        let mut working = self.decode_for_stage2(stage1_output)?;
        working.extend_with(order2.signals());
        order2.encode(&apply_stage2(working))
    }
}

// =============================================================================
// STAGE RULES
// =============================================================================

/// Stage-1 rules over a decoded record. The result carries the same signals.
#[must_use]
pub fn apply_stage1(input: &SignalState) -> SignalState {
    let reset = input.level(Signal::Reset);
    let enable = input.level(Signal::Enable);

    let mut out = SignalState::empty();
    for (signal, level) in input.iter() {
        let next = match signal {
            Signal::Reset => reset,
            Signal::Enable => enable,
            _ if reset => false,
            _ if Signal::GATED.contains(&signal) => enable && level,
            _ => level,
        };
        out.set(signal, next);
    }
    out
}

/// Stage-2 rules over a working record, in their fixed precedence order.
#[must_use]
pub fn apply_stage2(mut working: SignalState) -> SignalState {
    let contention = working.level(Signal::BusADrive) && working.level(Signal::BusBDrive);
    let both_write = working.level(Signal::WriteEnableA) && working.level(Signal::WriteEnableB);

    if contention || both_write {
        working.set(Signal::Enable, false);
    }
    if both_write {
        working.set_if_present(Signal::AddrEq, true);
    }
    // Reset wins over the both-write addr_eq forcing above.
    if working.level(Signal::Reset) {
        for signal in RESET_CLEARED {
            working.set_if_present(signal, false);
        }
    }
    working
}

// =============================================================================
// FREE-FUNCTION ENTRY POINTS
// =============================================================================

/// Apply stage 1 of `experiment` to `input`.
pub fn stage1_transform(
    experiment: Experiment,
    input: &BitVector,
) -> Result<BitVector, HazardError> {
    HazardPipeline::new(experiment)?.stage1(input)
}

/// Apply stage 2 of `experiment` to a stage-1 output.
pub fn stage2_transform(
    experiment: Experiment,
    stage1_output: &BitVector,
) -> Result<BitVector, HazardError> {
    HazardPipeline::new(experiment)?.stage2(stage1_output)
}

// =============================================================================
// TESTS
// =============================================================================
