//! The authoritative output of a run: every observed value change in order.
//!
//! A [`Trace`] is append-only. Its text form is one `time, signal, value`
//! line per change with no header and no trailing newline.

use std::fmt;
use std::io::{self, Write};

use gatesim_common::{Bit, ContentHash};
use serde::{Deserialize, Serialize};

use crate::time::SimTime;

/// One observed value change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// When the change happened.
    pub time: SimTime,
    /// The signal that changed.
    pub signal: String,
    /// Its new value.
    pub value: Bit,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.time, self.signal, self.value)
    }
}

/// Ordered list of value changes recorded during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one change.
    pub fn record(&mut self, time: SimTime, signal: impl Into<String>, value: Bit) {
        self.entries.push(TraceEntry {
            time,
            signal: signal.into(),
            value,
        });
    }

    /// Returns the entries in record order.
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Consumes the trace and returns its entries.
    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }

    /// Returns the number of recorded changes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the changes recorded for one signal.
    pub fn changes_of<'a>(&'a self, signal: &'a str) -> impl Iterator<Item = &'a TraceEntry> + 'a {
        self.entries.iter().filter(move |e| e.signal == signal)
    }

    /// Writes the text form to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writer.write_all(b"\n")?;
            }
            write!(writer, "{entry}")?;
        }
        writer.flush()
    }

    /// Returns an XXH3 hash of the text form.
    pub fn digest(&self) -> ContentHash {
        ContentHash::from_bytes(self.to_string().as_bytes())
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
