//! # Enumeration Engine
//!
//! Exhaustive classification of every stage-1 input of an experiment.
//!
//! The engine walks `[0, 2^width)` in ascending order, runs each input through
//! the pipeline, and keeps the inputs whose output is one of the stage's unsafe
//! signatures. The result is ground truth: no pruning, no sampling.
//!
//! Results are collected in `BTreeSet`s, so iteration order is always
//! ascending regardless of how the domain was partitioned.

use crate::config::{ExperimentConfig, experiment_config};
use crate::primitives::{EXAMPLE_LIMIT, MAX_ENUMERATION_WIDTH};
use crate::transform::{HazardPipeline, Pipeline};
use crate::{BitVector, Experiment, HazardError, StageId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::ops::Range;

// =============================================================================
// INPUT DOMAIN
// =============================================================================

/// The full set of inputs of a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputDomain {
    width: usize,
}

impl InputDomain {
    /// Domain of all `width`-bit vectors.
    ///
    /// Fails with `DomainTooLarge` above `MAX_ENUMERATION_WIDTH`.
    pub fn new(width: usize) -> Result<Self, HazardError> {
        if width == 0 || width > MAX_ENUMERATION_WIDTH {
            return Err(HazardError::DomainTooLarge {
                width,
                limit: MAX_ENUMERATION_WIDTH,
            });
        }
        Ok(Self { width })
    }

    /// Bit width of every input.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of inputs, `2^width`.
    #[must_use]
    pub const fn size(&self) -> u64 {
        1u64 << self.width
    }

    /// Split the domain into at most `parts` contiguous, ascending ranges.
    #[must_use]
    pub fn partition(&self, parts: NonZeroUsize) -> Vec<Range<u32>> {
        let size = self.size();
        let chunk = size.div_ceil(parts.get() as u64).max(1);
        let mut ranges = Vec::new();
        let mut start = 0u64;
        while start < size {
            let end = (start + chunk).min(size);
            ranges.push(start as u32..end as u32);
            start = end;
        }
        ranges
    }
}

// =============================================================================
// ENUMERATOR
// =============================================================================

/// Exhaustive classifier over one pipeline.
#[derive(Debug, Clone)]
pub struct Enumerator<P> {
    pipeline: P,
}

impl Enumerator<HazardPipeline> {
    /// Enumerator over the configured pipeline of `experiment`.
    pub fn for_experiment(experiment: Experiment) -> Result<Self, HazardError> {
        Ok(Self::new(HazardPipeline::new(experiment)?))
    }
}

impl<P: Pipeline> Enumerator<P> {
    /// Wrap a pipeline.
    pub const fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// The driven pipeline.
    pub const fn pipeline(&self) -> &P {
        &self.pipeline
    }

    fn config(&self) -> Result<&'static ExperimentConfig, HazardError> {
        experiment_config(self.pipeline.experiment())
    }

    /// Input domain: every vector of the stage-1 width.
    pub fn domain(&self) -> Result<InputDomain, HazardError> {
        InputDomain::new(self.config()?.input_width())
    }

    /// Whether `input` drives the pipeline into an unsafe signature at `stage`.
    pub fn is_unsafe(&self, input: &BitVector, stage: StageId) -> Result<bool, HazardError> {
        let config = self.config()?;
        let output1 = self.pipeline.stage1(input)?;
        match stage {
            StageId::One => Ok(config.stage(StageId::One).is_unsafe(&output1)),
            StageId::Two => {
                let output2 = self.pipeline.stage2(&output1)?;
                Ok(config.stage(StageId::Two).is_unsafe(&output2))
            }
        }
    }

    /// Run one input through both stages and classify each output.
    pub fn trace(&self, input: &BitVector) -> Result<PipelineTrace, HazardError> {
        let config = self.config()?;
        config.stage(StageId::One).order().check_width(input)?;
        let stage1_output = self.pipeline.stage1(input)?;
        let stage2_output = self.pipeline.stage2(&stage1_output)?;
        Ok(PipelineTrace {
            experiment: config.experiment(),
            input: *input,
            stage1_output,
            stage2_output,
            unsafe_at_stage1: config.stage(StageId::One).is_unsafe(&stage1_output),
            unsafe_at_stage2: config.stage(StageId::Two).is_unsafe(&stage2_output),
        })
    }

    /// Unsafe inputs at `stage` among the integers in `range`.
    pub fn classify_range(
        &self,
        stage: StageId,
        range: Range<u32>,
    ) -> Result<BTreeSet<BitVector>, HazardError> {
        let domain = self.domain()?;
        let mut unsafe_inputs = BTreeSet::new();
        for value in range {
            let input = BitVector::new(domain.width(), value)?;
            if self.is_unsafe(&input, stage)? {
                unsafe_inputs.insert(input);
            }
        }
        Ok(unsafe_inputs)
    }

    /// Every input whose output at `stage` is unsafe, walking the whole domain
    /// sequentially.
    pub fn find_unsafe(&self, stage: StageId) -> Result<BTreeSet<BitVector>, HazardError> {
        let domain = self.domain()?;
        self.classify_range(stage, 0..domain.size() as u32)
    }

    /// Inputs whose stage-1 output is an unsafe stage-1 signature.
    pub fn find_unsafe_at_stage1(&self) -> Result<BTreeSet<BitVector>, HazardError> {
        self.find_unsafe(StageId::One)
    }

    /// Inputs whose stage-2 output is an unsafe stage-2 signature.
    pub fn find_unsafe_at_stage2(&self) -> Result<BTreeSet<BitVector>, HazardError> {
        self.find_unsafe(StageId::Two)
    }

    /// Both unsafe sets, their difference and bounded example listings.
    pub fn summarize(&self) -> Result<UnsafeSummary, HazardError> {
        let stage1 = self.find_unsafe_at_stage1()?;
        let stage2 = self.find_unsafe_at_stage2()?;
        UnsafeSummary::from_sets(self.config()?, &stage1, &stage2)
    }
}

impl<P: Pipeline + Sync> Enumerator<P> {
    /// Same result as [`Enumerator::find_unsafe`], with the domain split into
    /// contiguous partitions classified on scoped threads.
    pub fn find_unsafe_partitioned(
        &self,
        stage: StageId,
        workers: NonZeroUsize,
    ) -> Result<BTreeSet<BitVector>, HazardError> {
        let ranges = self.domain()?.partition(workers);

        std::thread::scope(|scope| {
            let handles: Vec<_> = ranges
                .into_iter()
                .map(|range| scope.spawn(move || self.classify_range(stage, range)))
                .collect();

            let mut merged = BTreeSet::new();
            for handle in handles {
                let part = handle.join().map_err(|_| {
                    HazardError::EnumerationFailed("enumeration worker panicked".to_string())
                })??;
                merged.extend(part);
            }
            Ok(merged)
        })
    }
}

// =============================================================================
// FREE-FUNCTION ENTRY POINTS
// =============================================================================

/// Inputs of `experiment` that are unsafe at stage 1.
pub fn find_unsafe_at_stage1(experiment: Experiment) -> Result<BTreeSet<BitVector>, HazardError> {
    Enumerator::for_experiment(experiment)?.find_unsafe_at_stage1()
}

/// Inputs of `experiment` that are unsafe at stage 2.
pub fn find_unsafe_at_stage2(experiment: Experiment) -> Result<BTreeSet<BitVector>, HazardError> {
    Enumerator::for_experiment(experiment)?.find_unsafe_at_stage2()
}

/// Summary of both stages of `experiment`.
pub fn summarize(experiment: Experiment) -> Result<UnsafeSummary, HazardError> {
    Enumerator::for_experiment(experiment)?.summarize()
}

/// Inputs unsafe at stage 2 but safe at stage 1.
#[must_use]
pub fn stage2_only(
    stage1: &BTreeSet<BitVector>,
    stage2: &BTreeSet<BitVector>,
) -> BTreeSet<BitVector> {
    stage2.difference(stage1).copied().collect()
}

// =============================================================================
// SUMMARIES
// =============================================================================

/// Size of an unsafe set plus its first few members, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsafeSetSummary {
    /// Number of inputs in the set.
    pub count: usize,
    /// First `EXAMPLE_LIMIT` inputs.
    pub examples: Vec<BitVector>,
}

impl UnsafeSetSummary {
    /// Summarize `set`, keeping `EXAMPLE_LIMIT` examples.
    #[must_use]
    pub fn from_set(set: &BTreeSet<BitVector>) -> Self {
        Self::with_limit(set, EXAMPLE_LIMIT)
    }

    /// Summarize `set`, keeping at most `limit` examples.
    #[must_use]
    pub fn with_limit(set: &BTreeSet<BitVector>, limit: usize) -> Self {
        Self {
            count: set.len(),
            examples: set.iter().take(limit).copied().collect(),
        }
    }
}

/// One input followed through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTrace {
    /// Experiment identifier.
    pub experiment: Experiment,
    /// Stage-1 input.
    pub input: BitVector,
    /// Stage-1 output.
    pub stage1_output: BitVector,
    /// Stage-2 output.
    pub stage2_output: BitVector,
    /// Stage-1 output is an unsafe signature.
    pub unsafe_at_stage1: bool,
    /// Stage-2 output is an unsafe signature.
    pub unsafe_at_stage2: bool,
}

/// Derived report of one experiment's exhaustive classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsafeSummary {
    /// Experiment identifier.
    pub experiment: Experiment,
    /// Stage-1 width (input width).
    pub width: usize,
    /// Number of enumerated inputs.
    pub domain_size: u64,
    /// Configured stage-1 unsafe signatures.
    pub unsafe_signatures_stage1: Vec<BitVector>,
    /// Configured stage-2 unsafe signatures.
    pub unsafe_signatures_stage2: Vec<BitVector>,
    /// Inputs unsafe at stage 1.
    pub stage1: UnsafeSetSummary,
    /// Inputs unsafe at stage 2.
    pub stage2: UnsafeSetSummary,
    /// Inputs unsafe at stage 2 but safe at stage 1.
    pub stage2_only: UnsafeSetSummary,
}

impl UnsafeSummary {
    /// Build a summary from two independently computed unsafe sets.
    pub fn from_sets(
        config: &ExperimentConfig,
        stage1: &BTreeSet<BitVector>,
        stage2: &BTreeSet<BitVector>,
    ) -> Result<Self, HazardError> {
        let domain = InputDomain::new(config.input_width())?;
        Ok(Self {
            experiment: config.experiment(),
            width: domain.width(),
            domain_size: domain.size(),
            unsafe_signatures_stage1: config
                .stage(StageId::One)
                .unsafe_set()
                .iter()
                .copied()
                .collect(),
            unsafe_signatures_stage2: config
                .stage(StageId::Two)
                .unsafe_set()
                .iter()
                .copied()
                .collect(),
            stage1: UnsafeSetSummary::from_set(stage1),
            stage2: UnsafeSetSummary::from_set(stage2),
            stage2_only: UnsafeSetSummary::from_set(&stage2_only(stage1, stage2)),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
