//! Configuration types deserialized from `gatesim.toml`.

use gatesim_sim::SimConfig;
use serde::Deserialize;

/// The top-level configuration parsed from `gatesim.toml`.
///
/// Every section is optional; a missing file is equivalent to an empty one.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct GatesimConfig {
    /// The `[simulation]` section: engine budgets and signal resolution.
    #[serde(default)]
    pub simulation: SimConfig,
    /// Trace output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// The `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Extension of the derived output file, without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Format of the written trace.
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_extension() -> String {
    "sim".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            format: OutputFormat::default(),
        }
    }
}

/// Trace output format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `time, signal, value` lines.
    #[default]
    Text,
    /// Value Change Dump (IEEE 1364).
    Vcd,
    /// JSON array of trace entries.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_config_from_str;
    use gatesim_netlist::SignalResolution;

    #[test]
    fn defaults() {
        let config = GatesimConfig::default();
        assert_eq!(config.simulation.max_events, None);
        assert_eq!(config.simulation.max_events_per_step, None);
        assert_eq!(config.simulation.resolution, SignalResolution::Lenient);
        assert_eq!(config.output.extension, "sim");
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn output_format_all_variants() {
        for (input, expected) in [
            ("text", OutputFormat::Text),
            ("vcd", OutputFormat::Vcd),
            ("json", OutputFormat::Json),
        ] {
            let toml = format!("[output]\nformat = \"{input}\"\n");
            let config = load_config_from_str(&toml).unwrap();
            assert_eq!(config.output.format, expected);
        }
    }

    #[test]
    fn unknown_output_format_rejected() {
        assert!(load_config_from_str("[output]\nformat = \"fst\"\n").is_err());
    }

    #[test]
    fn simulation_section_is_engine_config() {
        let toml = "[simulation]\nmax_events_per_step = 5\nresolution = \"strict\"\n";
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.simulation,
            SimConfig {
                max_events_per_step: Some(5),
                resolution: SignalResolution::Strict,
                ..SimConfig::default()
            }
        );
    }
}
