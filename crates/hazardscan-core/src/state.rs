//! # Decoded Signal State
//!
//! A fixed-schema record holding one level per [`Signal`], plus a presence
//! mask saying which signals the record actually carries.
//!
//! Absent signals read as 0 through [`SignalState::level`]; callers that need
//! to tell "absent" from "low" use [`SignalState::get`].

use crate::Signal;

/// Name-indexed view of one bit-vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalState {
    present: u16,
    levels: u16,
}

impl SignalState {
    /// A record carrying no signals.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            present: 0,
            levels: 0,
        }
    }

    const fn mask(signal: Signal) -> u16 {
        1u16 << signal.index()
    }

    /// Level of `signal`, or `None` if the record does not carry it.
    #[must_use]
    pub const fn get(&self, signal: Signal) -> Option<bool> {
        if self.present & Self::mask(signal) == 0 {
            None
        } else {
            Some(self.levels & Self::mask(signal) != 0)
        }
    }

    /// Level of `signal`; absent signals read as 0.
    #[must_use]
    pub const fn level(&self, signal: Signal) -> bool {
        self.levels & self.present & Self::mask(signal) != 0
    }

    /// Whether the record carries `signal`.
    #[must_use]
    pub const fn contains(&self, signal: Signal) -> bool {
        self.present & Self::mask(signal) != 0
    }

    /// Set `signal`, adding it to the record if absent.
    pub fn set(&mut self, signal: Signal, level: bool) {
        let mask = Self::mask(signal);
        self.present |= mask;
        if level {
            self.levels |= mask;
        } else {
            self.levels &= !mask;
        }
    }

    /// Set `signal` only if the record already carries it.
    pub fn set_if_present(&mut self, signal: Signal, level: bool) {
        if self.contains(signal) {
            self.set(signal, level);
        }
    }

    /// Add every signal in `signals` that is not yet carried, at level 0.
    pub fn extend_with(&mut self, signals: &[Signal]) {
        for &signal in signals {
            if !self.contains(signal) {
                self.set(signal, false);
            }
        }
    }

    /// Carried signals and their levels, in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (Signal, bool)> + '_ {
        Signal::ALL
            .iter()
            .copied()
            .filter_map(|signal| self.get(signal).map(|level| (signal, level)))
    }

    /// Carried signals that are high, in schema order.
    pub fn high_signals(&self) -> Vec<Signal> {
        self.iter()
            .filter(|&(_, level)| level)
            .map(|(signal, _)| signal)
            .collect()
    }
}
