//! Two-state logic values with truth-table-based operators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// A single binary signal value.
///
/// Every signal in a circuit carries one of these. There is no unknown or
/// high-impedance state: undriven signals start at `Zero`.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Bit {
    /// Logic low (0).
    #[default]
    Zero = 0,
    /// Logic high (1).
    One = 1,
}

/// Error returned when converting an integer other than 0 or 1 into a [`Bit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid bit value {0} (expected 0 or 1)")]
pub struct InvalidBit(pub u8);

impl Bit {
    /// Converts a character to a [`Bit`]. Accepts only `'0'` and `'1'`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Bit::Zero),
            '1' => Some(Bit::One),
            _ => None,
        }
    }

    /// Returns the value as `0` or `1`.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` if the value is `One`.
    pub fn is_one(self) -> bool {
        self == Bit::One
    }
}

impl From<bool> for Bit {
    fn from(b: bool) -> Self {
        if b {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl From<Bit> for bool {
    fn from(b: Bit) -> Self {
        b.is_one()
    }
}

impl From<Bit> for u8 {
    fn from(b: Bit) -> Self {
        b.as_u8()
    }
}

impl TryFrom<u8> for Bit {
    type Error = InvalidBit;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            other => Err(InvalidBit(other)),
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl BitAnd for Bit {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Bit::from(self.is_one() && rhs.is_one())
    }
}

impl BitOr for Bit {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Bit::from(self.is_one() || rhs.is_one())
    }
}

impl BitXor for Bit {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Bit::from(self != rhs)
    }
}

impl Not for Bit {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Bit::Zero => Bit::One,
            Bit::One => Bit::Zero,
        }
    }
}
