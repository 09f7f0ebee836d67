//! Event-driven, timing-aware simulator for combinational gate netlists.
//!
//! This crate runs a [`Circuit`] from `gatesim_netlist` against a timed
//! [`Stimulus`] and produces a [`Trace`] of every signal change. Signals are
//! single bits starting at 0; each gate has an integer propagation delay.
//!
//! # Architecture
//!
//! The kernel keeps a priority queue of events ordered by time and insertion
//! sequence. A time step processes every event at the earliest pending time,
//! including zero-delay evaluations created while the step runs. A value
//! change schedules an evaluation of each gate reading the changed signal,
//! unless an evaluation for the same driven signal and time was already
//! scheduled by a change to the same value.
//!
//! # Usage
//!
//! ```ignore
//! use gatesim_sim::{simulate, SimConfig};
//!
//! let result = simulate(&circuit, &stimulus, &SimConfig::default())?;
//! println!("{}", result.trace);
//! ```
//!
//! # Modules
//!
//! - `error`: Simulation error types
//! - `event`: Queued events and their ordering
//! - `kernel`: Event queue, value table, and dedup ledger
//! - `recorder`: Streaming trace sinks (text and VCD)
//! - `stimulus`: Timed input assignments
//! - `time`: Integer simulation time
//! - `trace`: Recorded signal changes

#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod kernel;
pub mod recorder;
pub mod stimulus;
pub mod time;
pub mod trace;

use gatesim_netlist::{Circuit, SignalResolution};
use serde::{Deserialize, Serialize};

pub use error::{Budget, SimError};
pub use event::{Event, QueuedEvent};
pub use kernel::{SimKernel, SimResult, SimStats, StepResult};
pub use recorder::{TextRecorder, TraceRecorder, VcdRecorder};
pub use stimulus::{Stimulus, StimulusEntry};
pub use time::SimTime;
pub use trace::{Trace, TraceEntry};

/// Configuration for a simulation run.
///
/// Every budget is off by default, so a well-formed circuit always runs until
/// its queue drains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Total number of events the run may process.
    pub max_events: Option<u64>,
    /// Number of events a single time step may process. Catches zero-delay
    /// oscillation that never advances time.
    pub max_events_per_step: Option<u64>,
    /// Latest time a step may run at. Pending events past it are an error.
    pub time_limit: Option<u64>,
    /// How stimulus entries naming undeclared signals are handled.
    pub resolution: SignalResolution,
}

/// High-level entry point: runs a circuit against a stimulus until it settles.
pub fn simulate(
    circuit: &Circuit,
    stimulus: &Stimulus,
    config: &SimConfig,
) -> Result<SimResult, SimError> {
    SimKernel::new(circuit, stimulus, config)?.run_to_completion()
}

/// Like [`simulate`], but also streams every change to `recorder`.
pub fn simulate_with_recorder<'c>(
    circuit: &'c Circuit,
    stimulus: &Stimulus,
    config: &SimConfig,
    recorder: Box<dyn TraceRecorder + 'c>,
) -> Result<SimResult, SimError> {
    let mut kernel = SimKernel::new(circuit, stimulus, config)?;
    kernel.set_recorder(recorder)?;
    kernel.run_to_completion()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatesim_common::Bit;
    use gatesim_netlist::GateKind;

    fn half_adder() -> Circuit {
        let mut b = Circuit::builder("half_adder");
        b.input("a").unwrap();
        b.input("b").unwrap();
        b.output("s").unwrap();
        b.output("c").unwrap();
        b.add_gate(GateKind::Xor, 2, "s", &["a", "b"], None).unwrap();
        b.add_gate(GateKind::And, 1, "c", &["a", "b"], None).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn sim_config_default() {
        let config = SimConfig::default();
        assert!(config.max_events.is_none());
        assert!(config.time_limit.is_none());
        assert!(config.max_events_per_step.is_none());
        assert_eq!(config.resolution, SignalResolution::Lenient);
    }

    #[test]
    fn sim_config_deserializes_partial() {
        let config: SimConfig = serde_json::from_str(r#"{"time_limit": 100}"#).unwrap();
        assert_eq!(config.time_limit, Some(100));
        assert_eq!(config.max_events_per_step, None);
    }

    #[test]
    fn half_adder_glitch_free() {
        let c = half_adder();
        let mut s = Stimulus::new();
        s.push(0, "a", Bit::One);
        s.push(0, "b", Bit::One);
        let r = simulate(&c, &s, &SimConfig::default()).unwrap();
        // s is evaluated at time 2 with both inputs high and stays 0.
        assert_eq!(r.trace.to_string(), "0, a, 1\n0, b, 1\n1, c, 1");
        assert_eq!(r.value("s"), Some(Bit::Zero));
    }

    #[test]
    fn half_adder_staggered_inputs() {
        let c = half_adder();
        let mut s = Stimulus::new();
        s.push(0, "a", Bit::One);
        s.push(1, "b", Bit::One);
        let r = simulate(&c, &s, &SimConfig::default()).unwrap();
        // Gates read the values current when they evaluate, so the XOR
        // evaluations at 2 and 3 both see a = b = 1.
        assert_eq!(r.trace.to_string(), "0, a, 1\n1, b, 1\n1, c, 1");
        assert_eq!(r.final_time, SimTime::new(3));
        assert_eq!(r.value("s"), Some(Bit::Zero));
    }

    #[test]
    fn simulate_with_vcd_recorder() {
        let c = half_adder();
        let mut s = Stimulus::new();
        s.push(0, "a", Bit::One);
        let mut buf = Vec::new();
        simulate_with_recorder(
            &c,
            &s,
            &SimConfig::default(),
            Box::new(VcdRecorder::new(&mut buf)),
        )
        .unwrap();
        let vcd = String::from_utf8(buf).unwrap();
        assert!(vcd.contains("$scope module half_adder $end"));
        assert!(vcd.contains("$var wire 1 ! a $end"));
        assert!(vcd.contains("#2\n1#"));
    }
}
