//! Static netlist model for the gatesim simulator.
//!
//! A [`Circuit`] is an immutable collection of named signals and primitive
//! [`Gate`]s built once through a [`CircuitBuilder`]. Signals are interned
//! into dense [`SignalId`]s and gates are stored in an [`Arena`](arena::Arena)
//! keyed by [`GateId`]. The circuit precomputes a fan-out index so the
//! simulation engine can find the gates reading a signal without scanning the
//! whole gate list.
//!
//! # Modules
//!
//! - `arena`: Dense ID-indexed storage
//! - `ids`: Opaque signal and gate IDs
//! - `gate`: Gate kinds, arity rules, and evaluation
//! - `circuit`: The circuit, its builder, and the signal resolution policy
//! - `levelize`: Topological ordering and static (delay-free) evaluation
//! - `error`: Netlist construction errors

#![warn(missing_docs)]

pub mod arena;
pub mod circuit;
pub mod error;
pub mod gate;
pub mod ids;
pub mod levelize;

pub use circuit::{Circuit, CircuitBuilder, SignalResolution, SignalRole};
pub use error::NetlistError;
pub use gate::{Arity, Gate, GateKind};
pub use ids::{GateId, SignalId};
pub use levelize::{evaluate_static, levelize};
