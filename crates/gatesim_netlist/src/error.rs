//! Netlist construction errors.
//!
//! All errors raised while building or analysing a [`Circuit`](crate::Circuit)
//! are variants of [`NetlistError`]. Construction errors reject the circuit
//! before any simulation begins.

use crate::gate::{Arity, GateKind};
use crate::circuit::SignalRole;

/// Errors that can occur while building or analysing a circuit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetlistError {
    /// A gate's input count is inconsistent with its kind.
    #[error("malformed {kind} gate driving '{output}': expected {expected} input(s), found {found}")]
    MalformedGate {
        /// The gate kind.
        kind: GateKind,
        /// The output signal name of the offending gate.
        output: String,
        /// The arity required by the kind.
        expected: Arity,
        /// The number of inputs actually supplied.
        found: usize,
    },

    /// A gate references a signal that was never declared.
    #[error("gate driving '{gate_output}' references undeclared signal '{signal}'")]
    UnknownSignal {
        /// The undeclared signal name.
        signal: String,
        /// The output signal of the gate that referenced it.
        gate_output: String,
    },

    /// A signal name was declared twice with different roles.
    #[error("signal '{name}' declared as {first} and again as {second}")]
    DuplicateSignal {
        /// The signal name.
        name: String,
        /// The role of the first declaration.
        first: SignalRole,
        /// The role of the conflicting declaration.
        second: SignalRole,
    },

    /// The circuit contains a combinational feedback loop.
    #[error("combinational loop through signal '{signal}'")]
    CombinationalLoop {
        /// A signal on the loop.
        signal: String,
    },
}
