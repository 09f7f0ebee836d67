//! Parsers for the gate-level netlist subset and stimulus scripts.
//!
//! The netlist format is a small structural Verilog subset: one `module`
//! with `input`, `output` and `wire` declarations and primitive gate
//! instances (`and or xor nand nor xnor buf not`) with an optional `#delay`
//! and instance name. Stimulus scripts are lists of `#<time> <signal>=<0|1>;`
//! assignments. Both share one lexer and fail on the first error with a
//! 1-based line and column.

#![warn(missing_docs)]

/// Error types for parsing.
pub mod error;
/// Lexical analyzer shared by both formats.
pub mod lexer;
/// Parser infrastructure and netlist rules.
pub mod parser;
mod stimulus;
/// Token types.
pub mod token;

pub use error::ParseError;
pub use parser::Parser;

use gatesim_netlist::{Circuit, SignalResolution};
use gatesim_sim::Stimulus;

/// Parses netlist text into a [`Circuit`].
pub fn parse_netlist(source: &str, resolution: SignalResolution) -> Result<Circuit, ParseError> {
    let tokens = lexer::lex(source)?;
    Parser::new(tokens, source).parse_module(resolution)
}

/// Parses a stimulus script.
pub fn parse_stimulus(source: &str) -> Result<Stimulus, ParseError> {
    let tokens = lexer::lex(source)?;
    Parser::new(tokens, source).parse_stimulus_script()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatesim_common::Bit;
    use gatesim_sim::{simulate, SimConfig};

    const FULL_ADDER: &str = "\
// 1-bit full adder
module full_adder(a, b, cin, sum, cout);
  input a, b, cin;
  output sum, cout;
  wire s1, c1, c2;

  xor #2 x1 (s1, a, b);
  xor #2 x2 (sum, s1, cin);
  and #1 a1 (c1, a, b);
  and #1 a2 (c2, s1, cin);
  or  #1 o1 (cout, c1, c2);
endmodule
";

    #[test]
    fn integration_full_adder() {
        let circuit = parse_netlist(FULL_ADDER, SignalResolution::Strict).unwrap();
        assert_eq!(circuit.name(), "full_adder");
        assert_eq!(circuit.inputs().len(), 3);
        assert_eq!(circuit.outputs().len(), 2);
        assert_eq!(circuit.wires().len(), 3);
        assert_eq!(circuit.gate_count(), 5);

        let stimulus = parse_stimulus("#0 a=1;\n#0 cin=1;\n").unwrap();
        let result = simulate(&circuit, &stimulus, &SimConfig::default()).unwrap();
        assert_eq!(result.value("sum"), Some(Bit::Zero));
        assert_eq!(result.value("cout"), Some(Bit::One));
    }

    #[test]
    fn display_round_trip_listing() {
        let circuit = parse_netlist(FULL_ADDER, SignalResolution::Lenient).unwrap();
        let listing = circuit.to_string();
        assert!(listing.starts_with("Circuit name: full_adder\nInputs: a b cin\n"));
        assert!(listing.contains("  Type: XOR, Delay: 2, Output: sum, Inputs: s1 cin"));
    }

    #[test]
    fn lexer_errors_surface() {
        let err = parse_stimulus("#0 a=1; @").unwrap_err();
        assert_eq!(err.position(), (1, 9));
    }
}
