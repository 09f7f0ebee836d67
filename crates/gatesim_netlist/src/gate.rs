//! Primitive combinational gates.
//!
//! A [`Gate`] pairs a [`GateKind`] with a propagation delay, one output signal,
//! and an ordered list of input signals. Evaluation is a pure function of the
//! current signal-value table.

use std::fmt;

use gatesim_common::Bit;
use serde::{Deserialize, Serialize};

use crate::ids::SignalId;

/// The closed set of primitive gate functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    /// 1 iff every input is 1.
    And,
    /// 1 iff at least one input is 1.
    Or,
    /// Exclusive-or of exactly two inputs.
    Xor,
    /// Negation of AND.
    Nand,
    /// Negation of OR.
    Nor,
    /// Equality of exactly two inputs.
    Xnor,
    /// Passes its single input through unchanged.
    Buf,
    /// Negation of its single input.
    Not,
}

/// The number of inputs a gate kind accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` inputs.
    Exactly(usize),
    /// At least `n` inputs.
    AtLeast(usize),
}

impl Arity {
    /// Returns `true` if `count` inputs satisfy this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

impl GateKind {
    /// All gate kinds, in keyword-table order.
    pub const ALL: [GateKind; 8] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Xor,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xnor,
        GateKind::Buf,
        GateKind::Not,
    ];

    /// Looks up a gate kind by its lower-case netlist keyword (`and`, `nor`, ...).
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.keyword() == word)
    }

    /// Returns the lower-case netlist keyword for this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            GateKind::And => "and",
            GateKind::Or => "or",
            GateKind::Xor => "xor",
            GateKind::Nand => "nand",
            GateKind::Nor => "nor",
            GateKind::Xnor => "xnor",
            GateKind::Buf => "buf",
            GateKind::Not => "not",
        }
    }

    /// Returns the input arity this kind requires.
    pub fn arity(self) -> Arity {
        match self {
            GateKind::Xor | GateKind::Xnor => Arity::Exactly(2),
            GateKind::Buf | GateKind::Not => Arity::Exactly(1),
            GateKind::And | GateKind::Or | GateKind::Nand | GateKind::Nor => Arity::AtLeast(1),
        }
    }

    /// Applies this gate function to input values given in pin order.
    ///
    /// The caller guarantees the arity; [`CircuitBuilder`](crate::CircuitBuilder)
    /// rejects gates that violate it.
    pub fn apply(self, inputs: &[Bit]) -> Bit {
        let all = || inputs.iter().all(|b| b.is_one());
        let any = || inputs.iter().any(|b| b.is_one());
        match self {
            GateKind::And => Bit::from(all()),
            GateKind::Or => Bit::from(any()),
            GateKind::Nand => Bit::from(!all()),
            GateKind::Nor => Bit::from(!any()),
            GateKind::Xor => inputs[0] ^ inputs[1],
            GateKind::Xnor => !(inputs[0] ^ inputs[1]),
            GateKind::Buf => inputs[0],
            GateKind::Not => !inputs[0],
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyword().to_ascii_uppercase())
    }
}

/// One primitive logic element.
///
/// Gates are created once by the circuit builder and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    /// The gate function.
    pub kind: GateKind,
    /// Propagation delay in stimulus time units.
    pub delay: u64,
    /// The signal this gate drives.
    pub output: SignalId,
    /// Input signals in pin order. Never empty.
    pub inputs: Vec<SignalId>,
    /// Optional instance name from the netlist.
    pub instance: Option<String>,
}

impl Gate {
    /// Evaluates the gate output from a signal-value table indexed by [`SignalId`].
    ///
    /// Signals outside the table read as zero.
    pub fn evaluate(&self, values: &[Bit]) -> Bit {
        let pins: Vec<Bit> = self
            .inputs
            .iter()
            .map(|id| values.get(id.index()).copied().unwrap_or_default())
            .collect();
        self.kind.apply(&pins)
    }

    /// Returns `true` if `signal` is one of this gate's inputs.
    pub fn reads(&self, signal: SignalId) -> bool {
        self.inputs.contains(&signal)
    }
}
