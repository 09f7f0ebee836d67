//! Conformance test helpers for the gatesim simulator.
//!
//! Provides shared pipeline functions that take netlist and stimulus text
//! through the parser and the engine, plus a seeded generator of random
//! acyclic netlists for property tests.

#![warn(missing_docs)]

use gatesim_common::Bit;
use gatesim_netlist::{evaluate_static, Circuit, NetlistError, SignalResolution};
use gatesim_parser::{parse_netlist, parse_stimulus, ParseError};
use gatesim_sim::{simulate, SimConfig, SimError, SimResult, Stimulus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Errors from any stage of the text-to-trace pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The netlist or stimulus text was rejected.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    /// The run failed.
    #[error("simulation error: {0}")]
    Sim(#[from] SimError),
    /// Static evaluation failed.
    #[error("netlist error: {0}")]
    Netlist(#[from] NetlistError),
}

/// Parses netlist and stimulus text and runs them with `config`.
pub fn run_with(
    netlist: &str,
    stimulus: &str,
    config: &SimConfig,
) -> Result<SimResult, PipelineError> {
    let circuit = parse_netlist(netlist, config.resolution)?;
    let stimulus = parse_stimulus(stimulus)?;
    Ok(simulate(&circuit, &stimulus, config)?)
}

/// Runs with the default configuration, panicking on any error.
pub fn run(netlist: &str, stimulus: &str) -> SimResult {
    match run_with(netlist, stimulus, &SimConfig::default()) {
        Ok(result) => result,
        Err(e) => panic!("pipeline failed: {e}"),
    }
}

/// Runs with the default configuration and returns the trace text.
pub fn trace_text(netlist: &str, stimulus: &str) -> String {
    run(netlist, stimulus).trace.to_string()
}

/// Parses a netlist leniently, panicking on error.
pub fn parse_circuit(netlist: &str) -> Circuit {
    match parse_netlist(netlist, SignalResolution::Lenient) {
        Ok(c) => c,
        Err(e) => panic!("netlist failed to parse: {e}"),
    }
}

/// Evaluates `circuit` statically against the final value each input takes
/// in `stimulus`, returning `(name, value)` pairs in signal order.
pub fn static_fixed_point(
    circuit: &Circuit,
    stimulus: &Stimulus,
) -> Result<Vec<(String, Bit)>, PipelineError> {
    let mut finals: Vec<(gatesim_netlist::SignalId, Bit)> = Vec::new();
    let mut ordered: Vec<_> = stimulus.entries().iter().enumerate().collect();
    ordered.sort_by_key(|(i, e)| (e.time, *i));
    for (_, entry) in ordered {
        if let Some(id) = circuit.find_signal(&entry.signal) {
            finals.retain(|(s, _)| *s != id);
            finals.push((id, entry.value));
        }
    }
    let values = evaluate_static(circuit, &finals)?;
    Ok(circuit
        .signals()
        .map(|(id, name, _)| (name.to_string(), values[id.index()]))
        .collect())
}

/// Shape of a generated netlist.
#[derive(Debug, Clone, Copy)]
pub struct RandomCircuitSpec {
    /// Number of primary inputs.
    pub inputs: usize,
    /// Number of gates; each drives a fresh signal.
    pub gates: usize,
    /// Inclusive delay range.
    pub min_delay: u64,
    /// Inclusive upper bound of the delay range.
    pub max_delay: u64,
    /// Restrict to gate kinds whose output is 0 when every input is 0.
    pub zero_preserving: bool,
}

impl Default for RandomCircuitSpec {
    fn default() -> Self {
        Self {
            inputs: 4,
            gates: 12,
            min_delay: 1,
            max_delay: 4,
            zero_preserving: true,
        }
    }
}

/// Generates netlist text for a random acyclic circuit.
///
/// Gate `k` drives `n{k}` and reads only primary inputs and earlier gate
/// outputs, so the result has no feedback and no multiply-driven signals.
/// The last gate output is declared as the circuit output.
pub fn random_acyclic_netlist(seed: u64, spec: RandomCircuitSpec) -> String {
    const ZERO_PRESERVING: [&str; 4] = ["and", "or", "xor", "buf"];
    const ALL: [&str; 8] = ["and", "or", "xor", "nand", "nor", "xnor", "buf", "not"];

    let mut rng = StdRng::seed_from_u64(seed);
    let kinds: &[&str] = if spec.zero_preserving {
        &ZERO_PRESERVING
    } else {
        &ALL
    };
    let inputs: Vec<String> = (0..spec.inputs).map(|i| format!("i{i}")).collect();
    let mut sources = inputs.clone();
    let mut body = String::new();

    for k in 0..spec.gates {
        let kind = kinds[rng.gen_range(0..kinds.len())];
        let arity = match kind {
            "buf" | "not" => 1,
            "xor" | "xnor" => 2,
            _ => rng.gen_range(1..=3),
        };
        let pins: Vec<&str> = (0..arity)
            .map(|_| sources[rng.gen_range(0..sources.len())].as_str())
            .collect();
        let delay = rng.gen_range(spec.min_delay..=spec.max_delay);
        body.push_str(&format!(
            "  {kind} #{delay} g{k} (n{k}, {});\n",
            pins.join(", ")
        ));
        sources.push(format!("n{k}"));
    }

    let wires: Vec<String> = (0..spec.gates.saturating_sub(1))
        .map(|k| format!("n{k}"))
        .collect();
    let mut text = format!("module rand{seed};\n  input {};\n", inputs.join(", "));
    if spec.gates > 0 {
        text.push_str(&format!("  output n{};\n", spec.gates - 1));
    }
    if !wires.is_empty() {
        text.push_str(&format!("  wire {};\n", wires.join(", ")));
    }
    text.push_str(&body);
    text.push_str("endmodule\n");
    text
}

/// Generates a stimulus script toggling random primary inputs.
pub fn random_stimulus(seed: u64, inputs: usize, entries: usize, max_time: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5EED);
    let mut text = String::new();
    for _ in 0..entries {
        let time = rng.gen_range(0..=max_time);
        let input = rng.gen_range(0..inputs);
        let value = u8::from(rng.gen_bool(0.5));
        text.push_str(&format!("#{time} i{input}={value};\n"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_netlist_parses() {
        for seed in 0..20 {
            let text = random_acyclic_netlist(seed, RandomCircuitSpec::default());
            let circuit = parse_netlist(&text, SignalResolution::Strict)
                .unwrap_or_else(|e| panic!("seed {seed}: {e}\n{text}"));
            assert_eq!(circuit.gate_count(), 12);
            assert!(gatesim_netlist::levelize(&circuit).is_ok());
        }
    }

    #[test]
    fn generated_stimulus_parses() {
        let text = random_stimulus(3, 4, 30, 50);
        assert_eq!(parse_stimulus(&text).unwrap().len(), 30);
    }

    #[test]
    fn generation_is_seeded() {
        let spec = RandomCircuitSpec::default();
        assert_eq!(random_acyclic_netlist(9, spec), random_acyclic_netlist(9, spec));
        assert_ne!(random_acyclic_netlist(9, spec), random_acyclic_netlist(10, spec));
    }

    #[test]
    fn static_fixed_point_uses_last_value() {
        let circuit = parse_circuit("module m; input a; output y; buf #1 (y, a); endmodule");
        let stimulus = parse_stimulus("#5 a=0;\n#0 a=1;\n#9 a=1;\n").unwrap();
        let fixed = static_fixed_point(&circuit, &stimulus).unwrap();
        assert_eq!(fixed, vec![("a".to_string(), Bit::One), ("y".to_string(), Bit::One)]);
    }
}
