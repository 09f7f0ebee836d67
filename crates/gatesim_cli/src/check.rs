//! `gatesim check`: validate a netlist without simulating it.
//!
//! Parsing already enforces gate arity and, with `--strict`, declared signal
//! names. This command adds the structural checks: multiply-driven signals
//! (reported, not fatal) and combinational loops (fatal).

use gatesim_netlist::{levelize, Circuit, SignalResolution};

use crate::pipeline::{load_config, read_netlist};
use crate::{CheckArgs, GlobalArgs};

/// Findings from checking one circuit.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Names of signals with more than one driving gate.
    pub multiply_driven: Vec<String>,
    /// Name of a signal on a combinational loop, if any.
    pub loop_through: Option<String>,
}

impl CheckReport {
    /// Returns `true` if the circuit has no fatal findings.
    pub fn passed(&self) -> bool {
        self.loop_through.is_none()
    }
}

/// Runs the `gatesim check` command. Returns 1 if a loop was found.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let resolution = if args.strict {
        SignalResolution::Strict
    } else {
        config.simulation.resolution
    };
    let circuit = read_netlist(&args.netlist, resolution)?;
    let report = check_circuit(&circuit);

    if !global.quiet {
        for name in &report.multiply_driven {
            eprintln!("warning: signal '{name}' has multiple drivers");
        }
    }
    if let Some(signal) = &report.loop_through {
        eprintln!("error: combinational loop through signal '{signal}'");
        return Ok(1);
    }
    if !global.quiet {
        eprintln!(
            "   Checked {} ({} signals, {} gates)",
            circuit.name(),
            circuit.signal_count(),
            circuit.gate_count()
        );
    }
    Ok(0)
}

/// Runs the structural checks on a built circuit.
pub fn check_circuit(circuit: &Circuit) -> CheckReport {
    let multiply_driven = circuit
        .multiply_driven()
        .into_iter()
        .map(|id| circuit.signal_name(id).to_string())
        .collect();
    let loop_through = match levelize(circuit) {
        Ok(_) => None,
        Err(gatesim_netlist::NetlistError::CombinationalLoop { signal }) => Some(signal),
        Err(other) => Some(other.to_string()),
    };
    CheckReport {
        multiply_driven,
        loop_through,
    }
}
