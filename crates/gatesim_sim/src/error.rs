//! Simulation error types.
//!
//! All errors that can occur while setting up or running a simulation are
//! variants of [`SimError`]. Every runtime error is terminal: the run stops
//! and no partial trace is returned.

use std::fmt;
use std::io;

use crate::time::SimTime;

/// The budget whose exhaustion stopped a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Total number of processed events.
    Events(u64),
    /// Latest time at which events may still be processed.
    Time(SimTime),
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Budget::Events(n) => write!(f, "event budget of {n}"),
            Budget::Time(t) => write!(f, "time limit of {t}"),
        }
    }
}

/// Errors that can occur during simulation setup or execution.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A stimulus entry names a signal the circuit does not declare
    /// (strict resolution only).
    #[error("stimulus at time {time} references undeclared signal '{signal}'")]
    UnknownSignal {
        /// The undeclared signal name.
        signal: String,
        /// The stimulus time of the offending entry.
        time: SimTime,
    },

    /// The circuit did not settle within the configured budget.
    #[error("circuit did not settle: {budget} exhausted at time {time} after {processed} events")]
    NonTerminatingCircuit {
        /// Simulation time when the budget ran out.
        time: SimTime,
        /// Events processed before stopping.
        processed: u64,
        /// The exhausted budget.
        budget: Budget,
    },

    /// Too many events at a single time step, indicating a zero-delay loop.
    #[error("event limit exceeded at time {time} (max {limit} events per time step)")]
    StepEventLimit {
        /// The time step where the limit was hit.
        time: SimTime,
        /// The per-step event limit.
        limit: u64,
    },

    /// Scheduling a gate evaluation overflowed the time range.
    #[error("time overflow scheduling delay {delay} at time {time}")]
    TimeOverflow {
        /// The time of the triggering change.
        time: SimTime,
        /// The gate delay that overflowed.
        delay: u64,
    },

    /// An I/O error occurred while writing trace output.
    #[error("trace I/O error: {0}")]
    Io(#[from] io::Error),
}
