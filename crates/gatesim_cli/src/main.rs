//! gatesim CLI: the command-line interface for the gatesim gate-level simulator.
//!
//! Provides `gatesim sim` for running one netlist against a stimulus script,
//! `gatesim show` for listing a circuit, `gatesim check` for construction-time
//! validation, and `gatesim batch` for simulating many netlists in parallel.

#![warn(missing_docs)]

mod batch;
mod check;
mod pipeline;
mod show;
mod sim;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use gatesim_config::OutputFormat;
use tracing_subscriber::EnvFilter;

/// gatesim: an event-driven, timing-aware gate-level simulator.
#[derive(Parser, Debug)]
#[command(name = "gatesim", version, about = "Event-driven gate-level simulator")]
pub struct Cli {
    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log kernel progress at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `gatesim.toml` file or a directory containing one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// gatesim subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate a netlist against a stimulus script.
    Sim(SimArgs),
    /// Print a human-readable circuit listing.
    Show(ShowArgs),
    /// Validate a netlist without simulating it.
    Check(CheckArgs),
    /// Simulate several netlists, each with its sibling `.stim` file.
    Batch(BatchArgs),
}

/// Arguments for the `gatesim sim` subcommand.
#[derive(Parser, Debug)]
pub struct SimArgs {
    /// Netlist file.
    pub netlist: PathBuf,

    /// Stimulus script.
    pub stimulus: PathBuf,

    /// Output path (default: the netlist path with the configured extension).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Trace output format.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Reject undeclared signal names instead of declaring them implicitly.
    #[arg(long)]
    pub strict: bool,

    /// Total event budget.
    #[arg(long)]
    pub max_events: Option<u64>,

    /// Event limit for a single time step (zero-delay oscillation guard).
    #[arg(long)]
    pub max_events_per_step: Option<u64>,

    /// Latest simulation time a run may reach.
    #[arg(long)]
    pub time_limit: Option<u64>,

    /// Print the trace digest to stdout.
    #[arg(long)]
    pub digest: bool,
}

/// Arguments for the `gatesim show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Netlist file.
    pub netlist: PathBuf,
}

/// Arguments for the `gatesim check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Netlist file.
    pub netlist: PathBuf,

    /// Reject undeclared signal names instead of declaring them implicitly.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `gatesim batch` subcommand.
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Netlist files.
    #[arg(required = true)]
    pub netlists: Vec<PathBuf>,

    /// Trace output format for every run.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Reject undeclared signal names instead of declaring them implicitly.
    #[arg(long)]
    pub strict: bool,
}

/// Trace output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// `time, signal, value` lines.
    Text,
    /// VCD waveform of 1-bit wires, viewable in GTKWave.
    Vcd,
    /// JSON array of trace entries.
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Vcd => OutputFormat::Vcd,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Flags shared by every subcommand.
pub struct GlobalArgs {
    /// `-q` was given.
    pub quiet: bool,
    /// `-v` was given.
    pub verbose: bool,
    /// `--config` value, file or directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Sim(ref args) => sim::run(args, &global),
        Command::Show(ref args) => show::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Batch(ref args) => batch::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(global)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_log_level(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_sim_default() {
        let cli = Cli::parse_from(["gatesim", "sim", "adder.v", "adder.stim"]);
        match cli.command {
            Command::Sim(ref args) => {
                assert_eq!(args.netlist, PathBuf::from("adder.v"));
                assert_eq!(args.stimulus, PathBuf::from("adder.stim"));
                assert!(args.output.is_none());
                assert!(args.format.is_none());
                assert!(!args.strict);
                assert!(args.max_events.is_none());
                assert!(args.max_events_per_step.is_none());
                assert!(args.time_limit.is_none());
                assert!(!args.digest);
            }
            _ => panic!("expected Sim command"),
        }
    }

    #[test]
    fn parse_sim_with_args() {
        let cli = Cli::parse_from([
            "gatesim",
            "sim",
            "adder.v",
            "adder.stim",
            "-o",
            "out.vcd",
            "--format",
            "vcd",
            "--strict",
            "--max-events",
            "500",
            "--max-events-per-step",
            "64",
            "--time-limit",
            "40",
            "--digest",
        ]);
        match cli.command {
            Command::Sim(ref args) => {
                assert_eq!(args.output.as_deref(), Some(std::path::Path::new("out.vcd")));
                assert_eq!(args.format, Some(FormatArg::Vcd));
                assert!(args.strict);
                assert_eq!(args.max_events, Some(500));
                assert_eq!(args.max_events_per_step, Some(64));
                assert_eq!(args.time_limit, Some(40));
                assert!(args.digest);
            }
            _ => panic!("expected Sim command"),
        }
    }

    #[test]
    fn parse_show() {
        let cli = Cli::parse_from(["gatesim", "show", "c.v"]);
        assert!(matches!(cli.command, Command::Show(ref a) if a.netlist == PathBuf::from("c.v")));
    }

    #[test]
    fn parse_check_strict() {
        let cli = Cli::parse_from(["gatesim", "check", "--strict", "c.v"]);
        match cli.command {
            Command::Check(ref args) => assert!(args.strict),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_batch() {
        let cli = Cli::parse_from(["gatesim", "batch", "a.v", "b.v", "--format", "json"]);
        match cli.command {
            Command::Batch(ref args) => {
                assert_eq!(args.netlists.len(), 2);
                assert_eq!(args.format, Some(FormatArg::Json));
            }
            _ => panic!("expected Batch command"),
        }
    }

    #[test]
    fn batch_requires_a_netlist() {
        assert!(Cli::try_parse_from(["gatesim", "batch"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["gatesim", "--quiet", "--config", "x.toml", "show", "c.v"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("x.toml"));
    }

    #[test]
    fn log_levels() {
        let mut global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: None,
        };
        assert_eq!(default_log_level(&global), "warn");
        global.verbose = true;
        assert_eq!(default_log_level(&global), "debug");
        global.quiet = true;
        assert_eq!(default_log_level(&global), "error");
    }

    #[test]
    fn format_arg_conversion() {
        assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
        assert_eq!(OutputFormat::from(FormatArg::Text), OutputFormat::Text);
    }
}
