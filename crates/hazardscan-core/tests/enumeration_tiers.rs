//! # Enumeration Tier Tests (T0-T3)
//!
//! Ground-truth checks of the enumeration engine. If ANY tier fails, the
//! baseline numbers are INVALID.
//!
//! ## Tiers
//! - T0: Domain coverage
//! - T1: Stage-1 ground truth
//! - T2: Stage-2 ground truth and set difference
//! - T3: Determinism and failure semantics

use hazardscan_core::{
    BitVector, Enumerator, Experiment, HazardError, HazardPipeline, Pipeline, StageId,
    find_unsafe_at_stage1, find_unsafe_at_stage2, get_unsafe_set, stage_config, stage1_transform,
    stage2_only, summarize,
};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::Mutex;

fn strings(set: &BTreeSet<BitVector>) -> Vec<String> {
    set.iter().map(|b| b.to_string()).collect()
}

/// Pipeline wrapper recording every stage-1 input it is asked to transform.
struct CountingPipeline {
    inner: HazardPipeline,
    seen: Mutex<Vec<BitVector>>,
}

impl CountingPipeline {
    fn new(experiment: Experiment) -> Self {
        Self {
            inner: HazardPipeline::new(experiment).expect("pipeline"),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn take(&self) -> Vec<BitVector> {
        std::mem::take(&mut *self.seen.lock().expect("lock"))
    }
}

impl Pipeline for CountingPipeline {
    fn experiment(&self) -> Experiment {
        self.inner.experiment()
    }

    fn stage1(&self, input: &BitVector) -> Result<BitVector, HazardError> {
        self.seen.lock().expect("lock").push(*input);
        self.inner.stage1(input)
    }

    fn stage2(&self, stage1_output: &BitVector) -> Result<BitVector, HazardError> {
        self.inner.stage2(stage1_output)
    }
}

// =============================================================================
// TIER T0: DOMAIN COVERAGE
// =============================================================================

mod t0_domain_coverage {
    use super::*;

    /// T0.1: Each enumeration evaluates exactly 2^w distinct inputs.
    #[test]
    fn evaluates_every_input_once() {
        for experiment in Experiment::ALL {
            let enumerator = Enumerator::new(CountingPipeline::new(experiment));
            let expected = 1usize << stage_config(experiment, StageId::One).expect("cfg").width();

            for stage in StageId::ALL {
                enumerator.find_unsafe(stage).expect("enumerate");
                let seen = enumerator.pipeline().take();
                assert_eq!(seen.len(), expected);
                let distinct: BTreeSet<_> = seen.iter().collect();
                assert_eq!(distinct.len(), expected);
            }
        }
    }

    /// T0.2: Inputs are visited in ascending order.
    #[test]
    fn visits_inputs_ascending() {
        let enumerator = Enumerator::new(CountingPipeline::new(Experiment::Exp1));
        enumerator.find_unsafe_at_stage1().expect("enumerate");
        let seen = enumerator.pipeline().take();
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen.first().map(|b| b.to_string()), Some("0000000".to_string()));
        assert_eq!(seen.last().map(|b| b.to_string()), Some("1111111".to_string()));
    }

    /// T0.3: Partitioned enumeration covers the same domain.
    #[test]
    fn partitioned_evaluates_every_input_once() {
        let enumerator = Enumerator::new(CountingPipeline::new(Experiment::Exp2));
        enumerator
            .find_unsafe_partitioned(StageId::Two, NonZeroUsize::new(3).expect("3"))
            .expect("enumerate");
        let seen: BTreeSet<_> = enumerator.pipeline().take().into_iter().collect();
        assert_eq!(seen.len(), 1 << 14);
    }
}

// =============================================================================
// TIER T1: STAGE-1 GROUND TRUTH
// =============================================================================

mod t1_stage1 {
    use super::*;

    /// T1.1: exp1 stage-1 unsafe inputs are exactly those mapping onto a
    /// configured signature. Only `1100000` is reachable: the bus and write
    /// signatures need their gated bits high with `en` low, which stage 1
    /// never produces.
    #[test]
    fn exp1_exact_set() {
        let set = find_unsafe_at_stage1(Experiment::Exp1).expect("stage1");
        let expected: BTreeSet<BitVector> = (0u32..32)
            .map(|low| BitVector::new(7, 0b1100000 | low).expect("bits"))
            .collect();
        assert_eq!(set, expected);

        let unsafe_set = get_unsafe_set(Experiment::Exp1, StageId::One).expect("u");
        for input in &set {
            let output = stage1_transform(Experiment::Exp1, input).expect("stage1");
            assert!(unsafe_set.contains(&output));
        }
    }

    /// T1.2: Every configured exp1 signature that is a stage-1 fixed point is
    /// recovered.
    #[test]
    fn exp1_reachable_signatures_recovered() {
        let set = find_unsafe_at_stage1(Experiment::Exp1).expect("stage1");
        for signature in get_unsafe_set(Experiment::Exp1, StageId::One).expect("u") {
            let fixed = stage1_transform(Experiment::Exp1, signature).expect("stage1") == *signature;
            assert_eq!(set.contains(signature), fixed, "{}", signature);
        }
    }

    /// T1.3: exp2 stage 1: 4096 reset-while-enabled, 16 ack-only, 16 mode-11.
    #[test]
    fn exp2_counts() {
        let set = find_unsafe_at_stage1(Experiment::Exp2).expect("stage1");
        assert_eq!(set.len(), 4096 + 16 + 16);
        let reset_enabled = set
            .iter()
            .filter(|b| b.to_string().starts_with("11"))
            .count();
        assert_eq!(reset_enabled, 4096);
    }
}

// =============================================================================
// TIER T2: STAGE-2 GROUND TRUTH
// =============================================================================

mod t2_stage2 {
    use super::*;

    /// T2.1: exp1 stage 2 adds the contention and double-write inputs.
    #[test]
    fn exp1_stage2_only() {
        let s1 = find_unsafe_at_stage1(Experiment::Exp1).expect("stage1");
        let s2 = find_unsafe_at_stage2(Experiment::Exp1).expect("stage2");
        assert_eq!(s2.len(), 35);
        assert_eq!(
            strings(&stage2_only(&s1, &s2)),
            vec!["0100110", "0100111", "0111000"]
        );
        assert!(stage2_only(&s2, &s1).is_empty());
    }

    /// T2.2: exp2 stage 2 drops the ack/mode hazards and picks up parity,
    /// timeout, contention and double-write inputs.
    #[test]
    fn exp2_stage2_counts() {
        let s1 = find_unsafe_at_stage1(Experiment::Exp2).expect("stage1");
        let s2 = find_unsafe_at_stage2(Experiment::Exp2).expect("stage2");
        assert_eq!(s2.len(), 4096 + 32 + 3);

        let only2 = stage2_only(&s1, &s2);
        assert_eq!(only2.len(), 35);
        assert_eq!(
            only2.iter().next().map(|b| b.to_string()),
            Some("00000000000010".to_string())
        );
        assert_eq!(stage2_only(&s2, &s1).len(), 32);
    }

    /// T2.3: Summary carries both configured signature sets and bounded lists.
    #[test]
    fn exp2_summary() {
        let summary = summarize(Experiment::Exp2).expect("summary");
        assert_eq!(summary.width, 14);
        assert_eq!(summary.domain_size, 16_384);
        assert_eq!(summary.unsafe_signatures_stage1.len(), 5);
        assert_eq!(summary.unsafe_signatures_stage2.len(), 5);
        assert!(summary.unsafe_signatures_stage2.iter().all(|b| b.width() == 16));
        assert_eq!(summary.stage2_only.count, 35);
        assert_eq!(summary.stage1.examples.len(), 10);
    }
}

// =============================================================================
// TIER T3: DETERMINISM & FAILURES
// =============================================================================

mod t3_determinism {
    use super::*;

    /// T3.1: Repeated enumerations produce equal sets.
    #[test]
    fn repeated_runs_equal() {
        for experiment in Experiment::ALL {
            let a = find_unsafe_at_stage2(experiment).expect("a");
            let b = find_unsafe_at_stage2(experiment).expect("b");
            assert_eq!(a, b);
        }
    }

    /// T3.2: Partitioned and sequential runs agree for any worker count.
    #[test]
    fn partition_independent() {
        let enumerator = Enumerator::for_experiment(Experiment::Exp2).expect("enumerator");
        let sequential = enumerator.find_unsafe(StageId::Two).expect("sequential");
        for workers in [1, 2, 7, 64] {
            let partitioned = enumerator
                .find_unsafe_partitioned(StageId::Two, NonZeroUsize::new(workers).expect("n"))
                .expect("partitioned");
            assert_eq!(strings(&partitioned), strings(&sequential));
        }
    }

    /// T3.3: Width mismatches are rejected, not padded or truncated.
    #[test]
    fn width_mismatch_rejected() {
        let short: BitVector = "110000".parse().expect("bits");
        assert!(matches!(
            stage1_transform(Experiment::Exp1, &short),
            Err(HazardError::WidthMismatch { expected: 7, actual: 6 })
        ));
    }
}
