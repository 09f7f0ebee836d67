//! Shared foundational types used across the gatesim workspace.
//!
//! This crate provides the binary [`Bit`] signal value with its gate operators
//! and the [`ContentHash`] used to fingerprint simulation traces.

#![warn(missing_docs)]

pub mod bit;
pub mod hash;

pub use bit::{Bit, InvalidBit};
pub use hash::ContentHash;
