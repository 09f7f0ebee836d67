//! Error types for netlist and stimulus parsing.

use gatesim_netlist::NetlistError;
use thiserror::Error;

/// Errors produced while parsing a netlist or stimulus script.
///
/// Every variant carries a 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text does not match the grammar.
    #[error("{line}:{col}: {message}")]
    Syntax {
        /// 1-based line number.
        line: u32,
        /// 1-based column number.
        col: u32,
        /// Description of the problem.
        message: String,
    },

    /// The statement is well formed but the circuit rejects it.
    #[error("{line}:{col}: {source}")]
    Netlist {
        /// 1-based line number.
        line: u32,
        /// 1-based column number.
        col: u32,
        /// The underlying construction error.
        source: NetlistError,
    },
}

impl ParseError {
    /// Returns the `(line, column)` the error points at.
    pub fn position(&self) -> (u32, u32) {
        match self {
            ParseError::Syntax { line, col, .. } | ParseError::Netlist { line, col, .. } => {
                (*line, *col)
            }
        }
    }
}

/// Converts a byte offset into a 1-based `(line, column)` pair.
pub(crate) fn line_col(source: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |p| p + 1);
    (line as u32, (offset - line_start + 1) as u32)
}
