//! # Signal Configuration
//!
//! The process-wide experiment table: for every experiment, the signal order
//! and the unsafe signature set of each stage.
//!
//! The table is built once on first access and never mutated. Lookups hand out
//! `&'static` references, so it can be shared across threads without locks.
//!
//! | Experiment | Stage 1 width | Stage 2 width |
//! |------------|---------------|---------------|
//! | exp1       | 7             | 7             |
//! | exp2       | 14            | 16            |

use crate::primitives::MAX_BIT_WIDTH;
use crate::{BitVector, Experiment, HazardError, Signal, SignalOrder, StageId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use crate::Signal::{
    Ack, AddrEq, BusADrive, BusBDrive, Busy, Enable, Hazard, Mode0, Mode1, ParityErr, Request,
    Reset, Stall, Timeout, WriteEnableA, WriteEnableB,
};

// =============================================================================
// STATIC DEFINITIONS
// =============================================================================

const ORDER_7: &[Signal] = &[
    Reset,
    Enable,
    BusADrive,
    BusBDrive,
    WriteEnableA,
    WriteEnableB,
    AddrEq,
];

const ORDER_14: &[Signal] = &[
    Reset,
    Enable,
    BusADrive,
    BusBDrive,
    WriteEnableA,
    WriteEnableB,
    AddrEq,
    Request,
    Ack,
    Mode0,
    Mode1,
    ParityErr,
    Timeout,
    Busy,
];

/// Stage-2 order of exp2: the stage-1 order plus two derived signals.
const ORDER_16: &[Signal] = &[
    Reset,
    Enable,
    BusADrive,
    BusBDrive,
    WriteEnableA,
    WriteEnableB,
    AddrEq,
    Request,
    Ack,
    Mode0,
    Mode1,
    ParityErr,
    Timeout,
    Busy,
    Hazard,
    Stall,
];

/// exp1 signatures: `1100000`, `0011000`, `0000111`.
const EXP1_UNSAFE: &[&[Signal]] = &[
    &[Reset, Enable],
    &[BusADrive, BusBDrive],
    &[WriteEnableA, WriteEnableB, AddrEq],
];

const EXP2_UNSAFE_STAGE1: &[&[Signal]] = &[
    // reset while enabled
    &[Reset, Enable],
    // bus contention
    &[BusADrive, BusBDrive],
    // double write, same address
    &[WriteEnableA, WriteEnableB, AddrEq],
    // ack without req
    &[Ack],
    // illegal mode 11
    &[Mode0, Mode1],
];

const EXP2_UNSAFE_STAGE2: &[&[Signal]] = &[
    &[Reset, Enable],
    &[BusADrive, BusBDrive],
    &[WriteEnableA, WriteEnableB, AddrEq],
    &[ParityErr],
    &[Timeout],
];

// =============================================================================
// STAGE CONFIGURATION
// =============================================================================

/// Order and unsafe signatures of one stage of one experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageConfig {
    experiment: Experiment,
    stage: StageId,
    order: SignalOrder,
    unsafe_signatures: BTreeSet<BitVector>,
}

impl StageConfig {
    /// Build a stage from an order and explicit signatures.
    ///
    /// Every signature must have exactly the order's width.
    pub fn new(
        experiment: Experiment,
        stage: StageId,
        order: SignalOrder,
        signatures: impl IntoIterator<Item = BitVector>,
    ) -> Result<Self, HazardError> {
        if order.width() == 0 || order.width() > MAX_BIT_WIDTH {
            return Err(HazardError::ConfigError(format!(
                "{} {} has unsupported width {}",
                experiment,
                stage,
                order.width()
            )));
        }
        let mut unsafe_signatures = BTreeSet::new();
        for signature in signatures {
            order.check_width(&signature)?;
            unsafe_signatures.insert(signature);
        }
        Ok(Self {
            experiment,
            stage,
            order,
            unsafe_signatures,
        })
    }

    /// Build a stage whose signatures are given as sets of high signals.
    pub fn from_named(
        experiment: Experiment,
        stage: StageId,
        order: SignalOrder,
        high_sets: &[&[Signal]],
    ) -> Result<Self, HazardError> {
        let signatures = high_sets
            .iter()
            .map(|high| order.signature(high))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(experiment, stage, order, signatures)
    }

    /// Owning experiment.
    #[must_use]
    pub const fn experiment(&self) -> Experiment {
        self.experiment
    }

    /// Stage identifier.
    #[must_use]
    pub const fn stage(&self) -> StageId {
        self.stage
    }

    /// Signal order of this stage.
    #[must_use]
    pub const fn order(&self) -> SignalOrder {
        self.order
    }

    /// Bit width of this stage.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.order.width()
    }

    /// Configured unsafe signatures, ascending.
    #[must_use]
    pub const fn unsafe_set(&self) -> &BTreeSet<BitVector> {
        &self.unsafe_signatures
    }

    /// Whether `output` is exactly one of the unsafe signatures.
    #[must_use]
    pub fn is_unsafe(&self, output: &BitVector) -> bool {
        self.unsafe_signatures.contains(output)
    }
}

// =============================================================================
// EXPERIMENT CONFIGURATION
// =============================================================================

/// Both stages of one experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentConfig {
    experiment: Experiment,
    stage1: StageConfig,
    stage2: StageConfig,
}

impl ExperimentConfig {
    /// Experiment identifier.
    #[must_use]
    pub const fn experiment(&self) -> Experiment {
        self.experiment
    }

    /// Configuration of `stage`.
    #[must_use]
    pub const fn stage(&self, stage: StageId) -> &StageConfig {
        match stage {
            StageId::One => &self.stage1,
            StageId::Two => &self.stage2,
        }
    }

    /// Width of the enumerated input domain (the stage-1 width).
    #[must_use]
    pub const fn input_width(&self) -> usize {
        self.stage1.width()
    }
}

fn build_experiment(
    experiment: Experiment,
    stage1: (&'static [Signal], &[&[Signal]]),
    stage2: (&'static [Signal], &[&[Signal]]),
) -> Result<ExperimentConfig, HazardError> {
    Ok(ExperimentConfig {
        experiment,
        stage1: StageConfig::from_named(
            experiment,
            StageId::One,
            SignalOrder::new(stage1.0),
            stage1.1,
        )?,
        stage2: StageConfig::from_named(
            experiment,
            StageId::Two,
            SignalOrder::new(stage2.0),
            stage2.1,
        )?,
    })
}

fn build_table() -> Result<BTreeMap<Experiment, ExperimentConfig>, HazardError> {
    let mut table = BTreeMap::new();
    table.insert(
        Experiment::Exp1,
        build_experiment(
            Experiment::Exp1,
            (ORDER_7, EXP1_UNSAFE),
            (ORDER_7, EXP1_UNSAFE),
        )?,
    );
    table.insert(
        Experiment::Exp2,
        build_experiment(
            Experiment::Exp2,
            (ORDER_14, EXP2_UNSAFE_STAGE1),
            (ORDER_16, EXP2_UNSAFE_STAGE2),
        )?,
    );
    Ok(table)
}

static EXPERIMENTS: LazyLock<Result<BTreeMap<Experiment, ExperimentConfig>, String>> =
    LazyLock::new(|| build_table().map_err(|e| e.to_string()));

// =============================================================================
// LOOKUP
// =============================================================================

/// Configuration of `experiment`.
pub fn experiment_config(experiment: Experiment) -> Result<&'static ExperimentConfig, HazardError> {
    let table = EXPERIMENTS
        .as_ref()
        .map_err(|e| HazardError::ConfigError(e.clone()))?;
    table
        .get(&experiment)
        .ok_or_else(|| HazardError::UnknownExperiment(experiment.to_string()))
}

/// Configuration of one stage of `experiment`.
pub fn stage_config(
    experiment: Experiment,
    stage: StageId,
) -> Result<&'static StageConfig, HazardError> {
    Ok(experiment_config(experiment)?.stage(stage))
}

/// Signal order of one stage.
pub fn get_signal_order(
    experiment: Experiment,
    stage: StageId,
) -> Result<SignalOrder, HazardError> {
    Ok(stage_config(experiment, stage)?.order())
}

/// Unsafe signature set of one stage.
pub fn get_unsafe_set(
    experiment: Experiment,
    stage: StageId,
) -> Result<&'static BTreeSet<BitVector>, HazardError> {
    Ok(stage_config(experiment, stage)?.unsafe_set())
}

/// Look up a stage by textual identifiers, as supplied by external callers.
///
/// Fails with `UnknownExperiment` or `UnknownStage`; `"all"` is not a stage.
pub fn lookup(experiment: &str, stage: &str) -> Result<&'static StageConfig, HazardError> {
    let experiment: Experiment = experiment.parse()?;
    let stage: StageId = stage.parse()?;
    stage_config(experiment, stage)
}

// =============================================================================
// TESTS
// =============================================================================
