//! Shared pipeline helpers for CLI commands.
//!
//! Contains the steps every command repeats: configuration lookup, reading
//! and parsing input files with path context, deriving the output path, and
//! running a simulation into the selected trace format.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gatesim_config::{GatesimConfig, OutputFormat};
use gatesim_netlist::{Circuit, SignalResolution};
use gatesim_sim::{
    simulate, simulate_with_recorder, SimConfig, SimResult, Stimulus, TextRecorder, VcdRecorder,
};
use tracing::debug;

use crate::GlobalArgs;

/// Loads the configuration named by `--config` (a file, or a directory that
/// may hold `gatesim.toml`), falling back to the current directory.
pub fn load_config(global: &GlobalArgs) -> Result<GatesimConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => {
            let p = PathBuf::from(path);
            if p.is_dir() {
                gatesim_config::load_config_or_default(&p)?
            } else {
                gatesim_config::load_config_from_path(&p)?
            }
        }
        None => gatesim_config::load_config_or_default(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// Reads and parses a netlist file.
pub fn read_netlist(
    path: &Path,
    resolution: SignalResolution,
) -> Result<Circuit, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read netlist {}: {e}", path.display()))?;
    let circuit = gatesim_parser::parse_netlist(&source, resolution)
        .map_err(|e| format!("{}:{e}", path.display()))?;
    debug!(path = %path.display(), gates = circuit.gate_count(), "netlist loaded");
    Ok(circuit)
}

/// Reads and parses a stimulus script.
pub fn read_stimulus(path: &Path) -> Result<Stimulus, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read stimulus {}: {e}", path.display()))?;
    let stimulus =
        gatesim_parser::parse_stimulus(&source).map_err(|e| format!("{}:{e}", path.display()))?;
    Ok(stimulus)
}

/// Derives the trace path by replacing the netlist's extension.
pub fn output_path(netlist: &Path, extension: &str) -> PathBuf {
    netlist.with_extension(extension)
}

/// Returns the sibling stimulus path of a netlist (`x.v` → `x.stim`).
pub fn stimulus_path(netlist: &Path) -> PathBuf {
    netlist.with_extension("stim")
}

/// Runs one simulation and writes its trace to `out` in `format`.
///
/// The trace is staged in a temporary file next to `out` and only moved into
/// place when the run succeeds, so a failed run leaves any existing `out`
/// untouched and never leaves a partial trace behind.
pub fn run_to_file(
    circuit: &Circuit,
    stimulus: &Stimulus,
    config: &SimConfig,
    format: OutputFormat,
    out: &Path,
) -> Result<SimResult, Box<dyn std::error::Error>> {
    let dir = match out.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staging = tempfile::Builder::new()
        .prefix(".gatesim-")
        .tempfile_in(dir)
        .map_err(|e| format!("cannot create output in {}: {e}", dir.display()))?;

    let result = {
        let writer = BufWriter::new(staging.as_file_mut());
        match format {
            OutputFormat::Text => simulate_with_recorder(
                circuit,
                stimulus,
                config,
                Box::new(TextRecorder::new(writer)),
            )?,
            OutputFormat::Vcd => simulate_with_recorder(
                circuit,
                stimulus,
                config,
                Box::new(VcdRecorder::new(writer)),
            )?,
            OutputFormat::Json => {
                let result = simulate(circuit, stimulus, config)?;
                let mut writer = writer;
                serde_json::to_writer_pretty(&mut writer, &result.trace)?;
                writer.flush()?;
                result
            }
        }
    };

    staging
        .persist(out)
        .map_err(|e| format!("cannot write output {}: {}", out.display(), e.error))?;
    debug!(path = %out.display(), "trace written");
    Ok(result)
}

/// Returns a lowercase name for a format, used in progress messages.
pub fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "text",
        OutputFormat::Vcd => "vcd",
        OutputFormat::Json => "json",
    }
}
