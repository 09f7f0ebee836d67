//! External stimulus: an ordered list of timed signal assignments.

use gatesim_common::Bit;
use serde::{Deserialize, Serialize};

use crate::time::SimTime;

/// One timed assignment `signal = value` at `time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StimulusEntry {
    /// When the assignment takes effect.
    pub time: SimTime,
    /// The signal to drive.
    pub signal: String,
    /// The value to apply.
    pub value: Bit,
}

/// A stimulus script in source order.
///
/// Entries need not be sorted by time; the engine queues them all up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stimulus {
    entries: Vec<StimulusEntry>,
}

impl Stimulus {
    /// Creates an empty stimulus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one assignment.
    pub fn push(&mut self, time: impl Into<SimTime>, signal: impl Into<String>, value: Bit) {
        self.entries.push(StimulusEntry {
            time: time.into(),
            signal: signal.into(),
            value,
        });
    }

    /// Returns the entries in source order.
    pub fn entries(&self) -> &[StimulusEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the latest time any entry is applied, if any.
    pub fn last_time(&self) -> Option<SimTime> {
        self.entries.iter().map(|e| e.time).max()
    }
}

impl FromIterator<StimulusEntry> for Stimulus {
    fn from_iter<T: IntoIterator<Item = StimulusEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
