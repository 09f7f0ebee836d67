//! Simulation time.
//!
//! [`SimTime`] is a plain count of stimulus time units. Gate delays are
//! expressed in the same unit, so scheduling is integer addition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in simulated time, in the time unit of the stimulus script.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SimTime(u64);

impl SimTime {
    /// Time zero.
    pub const ZERO: SimTime = SimTime(0);

    /// Creates a time point from a raw tick count.
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Returns the raw tick count.
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the time `delay` ticks later, or `None` on overflow.
    pub fn checked_add(self, delay: u64) -> Option<Self> {
        self.0.checked_add(delay).map(Self)
    }
}

impl From<u64> for SimTime {
    fn from(ticks: u64) -> Self {
        Self(ticks)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_default() {
        assert_eq!(SimTime::default(), SimTime::ZERO);
        assert_eq!(SimTime::ZERO.ticks(), 0);
    }

    #[test]
    fn ordering() {
        assert!(SimTime::new(1) < SimTime::new(2));
    }

    #[test]
    fn checked_add() {
        assert_eq!(SimTime::new(3).checked_add(4), Some(SimTime::new(7)));
        assert_eq!(SimTime::new(u64::MAX).checked_add(1), None);
        assert_eq!(SimTime::new(5).checked_add(0), Some(SimTime::new(5)));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(SimTime::new(42).to_string(), "42");
    }

    #[test]
    fn serde_transparent() {
        let json = serde_json::to_string(&SimTime::new(9)).unwrap();
        assert_eq!(json, "9");
        let back: SimTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SimTime::new(9));
    }
}
