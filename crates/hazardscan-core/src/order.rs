//! # Signal Orders
//!
//! A [`SignalOrder`] is the sole mapping between bit positions and signal
//! meaning for one stage of one experiment. It converts between the raw
//! [`BitVector`] encoding and the named [`SignalState`] record.

use crate::{BitVector, HazardError, Signal, SignalState};

/// Immutable, ordered list of the signals carried by one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalOrder {
    signals: &'static [Signal],
}

impl SignalOrder {
    /// Wrap a static signal list.
    #[must_use]
    pub const fn new(signals: &'static [Signal]) -> Self {
        Self { signals }
    }

    /// Bit width of vectors encoded with this order.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.signals.len()
    }

    /// Signals in positional order.
    #[must_use]
    pub const fn signals(&self) -> &'static [Signal] {
        self.signals
    }

    /// Wire names in positional order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.signals.iter().map(|s| s.name()).collect()
    }

    /// Position of `signal`, if this order carries it.
    #[must_use]
    pub fn position(&self, signal: Signal) -> Option<usize> {
        self.signals.iter().position(|&s| s == signal)
    }

    /// Whether this order carries `signal`.
    #[must_use]
    pub fn contains(&self, signal: Signal) -> bool {
        self.signals.contains(&signal)
    }

    /// Fail with `WidthMismatch` unless `bits` has this order's width.
    pub fn check_width(&self, bits: &BitVector) -> Result<(), HazardError> {
        if bits.width() != self.width() {
            return Err(HazardError::WidthMismatch {
                expected: self.width(),
                actual: bits.width(),
            });
        }
        Ok(())
    }

    /// Decode `bits` into a record carrying exactly this order's signals.
    pub fn decode(&self, bits: &BitVector) -> Result<SignalState, HazardError> {
        self.check_width(bits)?;
        let mut state = SignalState::empty();
        for (position, &signal) in self.signals.iter().enumerate() {
            state.set(signal, bits.bit(position));
        }
        Ok(state)
    }

    /// Project `state` onto this order. Signals the record lacks encode as 0;
    /// signals the order lacks are dropped.
    pub fn encode(&self, state: &SignalState) -> Result<BitVector, HazardError> {
        let mut bits = BitVector::zeros(self.width())?;
        for (position, &signal) in self.signals.iter().enumerate() {
            bits = bits.with_bit(position, state.level(signal));
        }
        Ok(bits)
    }

    /// Vector with exactly the signals in `high` set to 1. Signals this order
    /// does not carry are ignored.
    pub fn signature(&self, high: &[Signal]) -> Result<BitVector, HazardError> {
        let mut bits = BitVector::zeros(self.width())?;
        for &signal in high {
            if let Some(position) = self.position(signal) {
                bits = bits.with_bit(position, true);
            }
        }
        Ok(bits)
    }
}
