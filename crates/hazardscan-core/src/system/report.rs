//! # Baseline Report
//!
//! Times both stage enumerations of one experiment and packages the exact
//! unsafe sets, their difference and the timings into a plain-data report.
//!
//! Recall is measured against ground truth in permille. The exhaustive
//! baseline is its own ground truth, so its recall is always
//! `FULL_RECALL_PERMILLE`.

use super::timing::{Timing, timed};
use crate::enumerate::{Enumerator, UnsafeSetSummary, UnsafeSummary};
use crate::primitives::FULL_RECALL_PERMILLE;
use crate::transform::Pipeline;
use crate::{BitVector, Experiment, HazardError, StageId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;

/// Fraction of `ground_truth` found in `detected`, in permille (rounded
/// down). An empty ground truth is fully recalled.
///
/// Scores a non-exhaustive engine against the exact sets of a baseline run.
#[must_use]
pub fn recall_permille(detected: &BTreeSet<BitVector>, ground_truth: &BTreeSet<BitVector>) -> u32 {
    if ground_truth.is_empty() {
        return FULL_RECALL_PERMILLE;
    }
    let hits = ground_truth.intersection(detected).count() as u64;
    ((hits * FULL_RECALL_PERMILLE as u64) / ground_truth.len() as u64) as u32
}

/// Timed, two-stage classification report of one experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineReport {
    /// Experiment identifier.
    pub experiment: Experiment,
    /// Input width.
    pub width: usize,
    /// Number of enumerated inputs.
    pub domain_size: u64,
    /// Configured stage-1 unsafe signatures.
    pub unsafe_signatures: Vec<BitVector>,
    /// Inputs unsafe at stage 1.
    pub stage1: UnsafeSetSummary,
    /// Inputs unsafe at stage 2.
    pub stage2: UnsafeSetSummary,
    /// Inputs unsafe at stage 2 only.
    pub stage2_only: UnsafeSetSummary,
    /// Stage-1 enumeration timing.
    pub timing_stage1: Timing,
    /// Stage-2 enumeration timing.
    pub timing_stage2: Timing,
    /// Stage-1 recall against ground truth, permille.
    pub recall_stage1_permille: u32,
    /// Stage-2 recall against ground truth, permille.
    pub recall_stage2_permille: u32,
}

impl BaselineReport {
    /// Timing of `stage`.
    #[must_use]
    pub const fn timing(&self, stage: StageId) -> &Timing {
        match stage {
            StageId::One => &self.timing_stage1,
            StageId::Two => &self.timing_stage2,
        }
    }
}

/// Everything one baseline run produced.
///
/// The full unsafe sets are kept alongside the bounded report so callers can
/// dump more examples than the report carries.
#[derive(Debug, Clone)]
pub struct BaselineRun {
    /// Timed report.
    pub report: BaselineReport,
    /// Untimed summary of the same sets.
    pub summary: UnsafeSummary,
    /// Every input unsafe at stage 1.
    pub stage1_inputs: BTreeSet<BitVector>,
    /// Every input unsafe at stage 2.
    pub stage2_inputs: BTreeSet<BitVector>,
}

/// Enumerate both stages of the enumerator's experiment, timing each.
///
/// `workers == 1` walks the domain sequentially; more workers split it into
/// partitions. The sets are identical either way.
pub fn run_baseline<P: Pipeline + Sync>(
    enumerator: &Enumerator<P>,
    workers: NonZeroUsize,
) -> Result<BaselineRun, HazardError> {
    let domain = enumerator.domain()?;
    let enumerate = |stage: StageId| {
        if workers.get() == 1 {
            enumerator.find_unsafe(stage)
        } else {
            enumerator.find_unsafe_partitioned(stage, workers)
        }
    };

    let (stage1_inputs, timing_stage1) = timed(domain.size(), || enumerate(StageId::One));
    let stage1_inputs = stage1_inputs?;
    let (stage2_inputs, timing_stage2) = timed(domain.size(), || enumerate(StageId::Two));
    let stage2_inputs = stage2_inputs?;

    let config = crate::config::experiment_config(enumerator.pipeline().experiment())?;
    let summary = UnsafeSummary::from_sets(config, &stage1_inputs, &stage2_inputs)?;

    let report = BaselineReport {
        experiment: summary.experiment,
        width: summary.width,
        domain_size: summary.domain_size,
        unsafe_signatures: summary.unsafe_signatures_stage1.clone(),
        stage1: summary.stage1.clone(),
        stage2: summary.stage2.clone(),
        stage2_only: summary.stage2_only.clone(),
        timing_stage1,
        timing_stage2,
        recall_stage1_permille: FULL_RECALL_PERMILLE,
        recall_stage2_permille: FULL_RECALL_PERMILLE,
    };

    Ok(BaselineRun {
        report,
        summary,
        stage1_inputs,
        stage2_inputs,
    })
}
