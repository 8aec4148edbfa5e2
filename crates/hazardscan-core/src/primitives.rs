//! # Innate Primitives
//!
//! Hardcoded runtime constants for the hazardscan CORE.
//!
//! These values are compiled into the binary and are immutable at runtime.

/// Widest bit-vector the positional encoding can hold.
pub const MAX_BIT_WIDTH: usize = 32;

/// Widest input domain the enumeration engine will walk.
///
/// - Enumeration is O(2^width) transform evaluations.
/// - Requests above this width are rejected with `DomainTooLarge` instead of
///   running for hours.
pub const MAX_ENUMERATION_WIDTH: usize = 24;

/// Number of example inputs kept per unsafe set in summaries and reports.
pub const EXAMPLE_LIMIT: usize = 10;

/// Recall of an exact classifier, in permille.
pub const FULL_RECALL_PERMILLE: u32 = 1000;

/// Nanoseconds per second, for throughput computation.
pub const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Picoseconds per nanosecond, for sub-nanosecond per-input durations.
pub const PICOS_PER_NANO: u128 = 1_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumeration_ceiling_fits_encoding() {
        assert!(MAX_ENUMERATION_WIDTH <= MAX_BIT_WIDTH);
    }

    #[test]
    fn example_limit_is_ten() {
        assert_eq!(EXAMPLE_LIMIT, 10);
    }
}
