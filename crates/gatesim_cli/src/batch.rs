//! `gatesim batch`: simulate many netlists in parallel.
//!
//! Each netlist `x.v` is paired with `x.stim` in the same directory. Runs
//! share nothing, so they are spread over the rayon thread pool; results are
//! reported in the order the netlists were given.

use std::path::{Path, PathBuf};

use gatesim_config::OutputFormat;
use gatesim_netlist::SignalResolution;
use gatesim_sim::{SimConfig, SimTime};
use rayon::prelude::*;

use crate::pipeline::{load_config, output_path, read_netlist, read_stimulus, run_to_file, stimulus_path};
use crate::{BatchArgs, GlobalArgs};

/// The outcome of one batch entry.
#[derive(Debug)]
pub struct BatchResult {
    /// The netlist that was simulated.
    pub netlist: PathBuf,
    /// Summary on success, message on failure.
    pub outcome: Result<RunSummary, String>,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Circuit name from the netlist.
    pub circuit: String,
    /// Time of the last processed step.
    pub final_time: SimTime,
    /// Number of traced changes.
    pub changes: u64,
    /// Where the trace was written.
    pub output: PathBuf,
}

/// Runs the `gatesim batch` command. Returns 1 if any run failed.
pub fn run(args: &BatchArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let mut sim_config = config.simulation.clone();
    if args.strict {
        sim_config.resolution = SignalResolution::Strict;
    }
    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.output.format);

    if !global.quiet {
        eprintln!("   Simulating {} netlists", args.netlists.len());
    }

    let results = run_all(&args.netlists, &sim_config, format, &config.output.extension);

    let mut failed = 0;
    for result in &results {
        match &result.outcome {
            Ok(summary) => {
                if !global.quiet {
                    eprintln!(
                        "   PASS  {} (settled at {}, {} changes)",
                        summary.circuit, summary.final_time, summary.changes
                    );
                }
            }
            Err(message) => {
                failed += 1;
                eprintln!("   FAIL  {}: {message}", result.netlist.display());
            }
        }
    }

    if !global.quiet {
        eprintln!(
            "   {} passed, {} failed",
            results.len() - failed,
            failed
        );
    }
    Ok(if failed == 0 { 0 } else { 1 })
}

/// Simulates every netlist in parallel, preserving input order.
pub fn run_all(
    netlists: &[PathBuf],
    config: &SimConfig,
    format: OutputFormat,
    extension: &str,
) -> Vec<BatchResult> {
    netlists
        .par_iter()
        .map(|netlist| BatchResult {
            netlist: netlist.clone(),
            outcome: run_one(netlist, config, format, extension).map_err(|e| e.to_string()),
        })
        .collect()
}

fn run_one(
    netlist: &Path,
    config: &SimConfig,
    format: OutputFormat,
    extension: &str,
) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let circuit = read_netlist(netlist, config.resolution)?;
    let stimulus = read_stimulus(&stimulus_path(netlist))?;
    let output = output_path(netlist, extension);
    let result = run_to_file(&circuit, &stimulus, config, format, &output)?;
    Ok(RunSummary {
        circuit: circuit.name().to_string(),
        final_time: result.final_time,
        changes: result.stats.changes,
        output,
    })
}
