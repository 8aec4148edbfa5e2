//! # Enumeration Timing
//!
//! Wall-clock measurement of a full enumeration call and the derived rates:
//!
//! | Quantity        | Formula                       | Unit           |
//! |-----------------|-------------------------------|----------------|
//! | total           | measured                      | ns             |
//! | per input       | `total / domain_size`         | ps             |
//! | throughput      | `domain_size / total`         | inputs / s     |
//!
//! Throughput is `None` (unbounded) when the measured duration is zero.

use crate::primitives::{NANOS_PER_SECOND, PICOS_PER_NANO};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Timing of one enumeration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Total wall-clock duration in nanoseconds.
    pub total_ns: u64,
    /// Mean duration per input in picoseconds.
    pub per_input_ps: u64,
    /// Inputs per second; `None` when the duration rounded to zero.
    pub inputs_per_sec: Option<u64>,
}

impl Timing {
    /// Derive per-input duration and throughput from a nanosecond total.
    #[must_use]
    pub fn from_nanos(total_ns: u64, domain_size: u64) -> Self {
        let per_input_ps = if domain_size == 0 {
            0
        } else {
            saturate((total_ns as u128 * PICOS_PER_NANO) / domain_size as u128)
        };
        let inputs_per_sec = if total_ns == 0 {
            None
        } else {
            Some(saturate(
                (domain_size as u128 * NANOS_PER_SECOND) / total_ns as u128,
            ))
        };
        Self {
            total_ns,
            per_input_ps,
            inputs_per_sec,
        }
    }

    /// Same as [`Timing::from_nanos`] for a measured `Duration`.
    #[must_use]
    pub fn from_duration(duration: Duration, domain_size: u64) -> Self {
        Self::from_nanos(saturate(duration.as_nanos()), domain_size)
    }

    /// Whether throughput is unbounded (zero measured duration).
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.inputs_per_sec.is_none()
    }
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Run `f` once and measure it against a domain of `domain_size` inputs.
pub fn timed<T>(domain_size: u64, f: impl FnOnce() -> T) -> (T, Timing) {
    let start = Instant::now();
    let out = f();
    let timing = Timing::from_duration(start.elapsed(), domain_size);
    (out, timing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_rates() {
        let timing = Timing::from_nanos(1_280_000, 128);
        assert_eq!(timing.per_input_ps, 10_000_000);
        assert_eq!(timing.inputs_per_sec, Some(100_000));
    }

    #[test]
    fn sub_nanosecond_per_input() {
        let timing = Timing::from_nanos(500, 1024);
        assert_eq!(timing.per_input_ps, 488);
    }

    #[test]
    fn zero_duration_is_unbounded() {
        let timing = Timing::from_nanos(0, 16_384);
        assert!(timing.is_unbounded());
        assert_eq!(timing.per_input_ps, 0);
    }

    #[test]
    fn timed_returns_closure_output() {
        let (value, timing) = timed(4, || 2 + 2);
        assert_eq!(value, 4);
        assert_eq!(
            timing.inputs_per_sec.is_none(),
            timing.total_ns == 0
        );
    }
}
