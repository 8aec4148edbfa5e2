//! Fixed-width bit-vectors.
//!
//! A `BitVector` is the positional encoding of one stage's signals. Position 0
//! is the first signal of the order and the most significant bit of the
//! integer value, so ascending integer order equals ascending lexicographic
//! order of the rendered strings.

use super::HazardError;
use crate::primitives::MAX_BIT_WIDTH;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A fixed-length sequence of bits, rendered as a zero-padded binary string.
///
/// Ordering compares width first, then value. Within one width this is the
/// same as comparing the rendered strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitVector {
    width: u8,
    bits: u32,
}

impl BitVector {
    /// Create a bit-vector of `width` bits holding `bits`.
    ///
    /// Fails if the width is outside `1..=MAX_BIT_WIDTH` or the value does not
    /// fit in `width` bits.
    pub fn new(width: usize, bits: u32) -> Result<Self, HazardError> {
        if width == 0 || width > MAX_BIT_WIDTH {
            return Err(HazardError::InvalidBitVector(format!(
                "width {} outside 1..={}",
                width, MAX_BIT_WIDTH
            )));
        }
        if width < MAX_BIT_WIDTH && bits >> width != 0 {
            return Err(HazardError::InvalidBitVector(format!(
                "value {:#b} does not fit in {} bits",
                bits, width
            )));
        }
        Ok(Self {
            width: width as u8,
            bits,
        })
    }

    /// All-zero vector of the given width.
    pub fn zeros(width: usize) -> Result<Self, HazardError> {
        Self::new(width, 0)
    }

    /// Number of bits.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    /// Integer value; position 0 is the most significant bit.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Bit at `position` (0 = first signal). Positions past the end read as 0.
    #[must_use]
    pub const fn bit(&self, position: usize) -> bool {
        if position >= self.width as usize {
            return false;
        }
        let shift = self.width as usize - 1 - position;
        (self.bits >> shift) & 1 == 1
    }

    /// Copy of this vector with `position` set to `value`.
    /// Positions past the end leave the vector unchanged.
    #[must_use]
    pub const fn with_bit(self, position: usize, value: bool) -> Self {
        if position >= self.width as usize {
            return self;
        }
        let mask = 1u32 << (self.width as usize - 1 - position);
        let bits = if value {
            self.bits | mask
        } else {
            self.bits & !mask
        };
        Self {
            width: self.width,
            bits,
        }
    }
}

impl std::fmt::Display for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0width$b}", self.bits, width = self.width as usize)
    }
}

impl FromStr for BitVector {
    type Err = HazardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(HazardError::InvalidBitVector("empty string".to_string()));
        }
        if s.len() > MAX_BIT_WIDTH {
            return Err(HazardError::InvalidBitVector(format!(
                "{} bits exceeds maximum width {}",
                s.len(),
                MAX_BIT_WIDTH
            )));
        }
        let mut bits = 0u32;
        for c in s.chars() {
            let bit = match c {
                '0' => 0,
                '1' => 1,
                other => {
                    return Err(HazardError::InvalidBitVector(format!(
                        "unexpected character {:?} in {:?}",
                        other, s
                    )));
                }
            };
            bits = (bits << 1) | bit;
        }
        Self::new(s.len(), bits)
    }
}

impl TryFrom<String> for BitVector {
    type Error = HazardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BitVector> for String {
    fn from(value: BitVector) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_zero_padded() {
        let v = BitVector::new(7, 0b0000101).expect("new");
        assert_eq!(v.to_string(), "0000101");
    }

    #[test]
    fn parse_and_render_agree() {
        let v: BitVector = "1100000".parse().expect("parse");
        assert_eq!(v.width(), 7);
        assert_eq!(v.bits(), 0b1100000);
        assert_eq!(v.to_string(), "1100000");
    }

    #[test]
    fn position_zero_is_most_significant() {
        let v: BitVector = "1000".parse().expect("parse");
        assert!(v.bit(0));
        assert!(!v.bit(3));
        assert!(!v.bit(9));
    }

    #[test]
    fn with_bit_sets_and_clears() {
        let v = BitVector::zeros(4).expect("zeros").with_bit(2, true);
        assert_eq!(v.to_string(), "0010");
        assert_eq!(v.with_bit(2, false).to_string(), "0000");
        assert_eq!(v.with_bit(7, true), v);
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(matches!(
            "10x1".parse::<BitVector>(),
            Err(HazardError::InvalidBitVector(_))
        ));
        assert!("".parse::<BitVector>().is_err());
    }

    #[test]
    fn rejects_value_wider_than_width() {
        assert!(BitVector::new(3, 0b1000).is_err());
        assert!(BitVector::new(0, 0).is_err());
        assert!(BitVector::new(33, 0).is_err());
        assert!(BitVector::new(32, u32::MAX).is_ok());
    }

    #[test]
    fn ordering_matches_string_order_within_width() {
        let a: BitVector = "0100111".parse().expect("a");
        let b: BitVector = "0111000".parse().expect("b");
        let c: BitVector = "1100000".parse().expect("c");
        assert!(a < b && b < c);
        assert!(a.to_string() < b.to_string() && b.to_string() < c.to_string());
    }
}
