//! `gatesim sim`: run one netlist against one stimulus script.
//!
//! Loads the configuration, applies command-line overrides, parses both
//! inputs, runs the engine, and writes the trace next to the netlist unless
//! `-o` says otherwise.

use gatesim_config::{GatesimConfig, OutputFormat};
use gatesim_netlist::SignalResolution;
use gatesim_sim::SimConfig;

use crate::pipeline::{format_name, load_config, output_path, read_netlist, read_stimulus, run_to_file};
use crate::{GlobalArgs, SimArgs};

/// Runs the `gatesim sim` command. Returns exit code 0 on success.
pub fn run(args: &SimArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let sim_config = effective_sim_config(&config, args);
    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.output.format);

    let circuit = read_netlist(&args.netlist, sim_config.resolution)?;
    let stimulus = read_stimulus(&args.stimulus)?;

    if !global.quiet {
        eprintln!(
            "   Simulating {} ({} gates, {} stimulus entries)",
            circuit.name(),
            circuit.gate_count(),
            stimulus.len()
        );
    }

    let out = args
        .output
        .clone()
        .unwrap_or_else(|| output_path(&args.netlist, &config.output.extension));
    let result = run_to_file(&circuit, &stimulus, &sim_config, format, &out)?;

    if args.digest {
        println!("{}", result.trace.digest());
    }

    if !global.quiet {
        eprintln!(
            "    Finished at time {}: {} changes, {} events",
            result.final_time, result.stats.changes, result.stats.events_processed
        );
        eprintln!("       Wrote {} ({})", out.display(), format_name(format));
    }

    Ok(0)
}

/// Merges file configuration with command-line overrides.
fn effective_sim_config(config: &GatesimConfig, args: &SimArgs) -> SimConfig {
    let mut sim = config.simulation.clone();
    if args.strict {
        sim.resolution = SignalResolution::Strict;
    }
    if args.max_events.is_some() {
        sim.max_events = args.max_events;
    }
    if args.max_events_per_step.is_some() {
        sim.max_events_per_step = args.max_events_per_step;
    }
    if args.time_limit.is_some() {
        sim.time_limit = args.time_limit;
    }
    sim
}
