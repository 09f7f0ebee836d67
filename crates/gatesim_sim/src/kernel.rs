//! Simulation kernel: event queue, value table, and dedup ledger.
//!
//! [`SimKernel`] drives a [`Circuit`] from an all-zero state through a
//! [`Stimulus`] until the event queue drains. Each time step pops every event
//! at the earliest pending time in `(time, sequence)` order. Zero-delay
//! evaluations created during a step land at the same time with a larger
//! sequence number and are picked up by the same step, because the queue is
//! re-checked after every pop.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use gatesim_common::Bit;
use gatesim_netlist::{Circuit, GateId, SignalId, SignalResolution};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Budget, SimError};
use crate::event::{Event, QueuedEvent};
use crate::recorder::TraceRecorder;
use crate::stimulus::Stimulus;
use crate::time::SimTime;
use crate::trace::Trace;
use crate::SimConfig;

/// Counters collected over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Events popped from the queue and processed.
    pub events_processed: u64,
    /// Processed events whose value matched the current one.
    pub no_op_events: u64,
    /// Gate evaluations pushed onto the queue.
    pub evaluations_scheduled: u64,
    /// Gate evaluations skipped by the dedup ledger.
    pub evaluations_suppressed: u64,
    /// Distinct time steps processed.
    pub time_steps: u64,
    /// Value changes recorded in the trace.
    pub changes: u64,
}

/// The result of a completed simulation run.
#[derive(Debug, Clone)]
pub struct SimResult {
    /// Every observed change in order.
    pub trace: Trace,
    /// Time of the last processed time step.
    pub final_time: SimTime,
    /// Final value of every signal, in signal ID order.
    pub final_values: Vec<(String, Bit)>,
    /// Run counters.
    pub stats: SimStats,
}

impl SimResult {
    /// Returns the final value of a signal by name.
    pub fn value(&self, name: &str) -> Option<Bit> {
        self.final_values
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }
}

/// The outcome of a single time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Events remain in the queue.
    Continued,
    /// The queue is empty; the circuit has settled.
    Done,
}

/// The simulation engine for one run.
pub struct SimKernel<'c> {
    circuit: &'c Circuit,
    /// Current value of every signal, indexed by `SignalId`. Run-local
    /// implicit signals follow the circuit's own signals.
    values: Vec<Bit>,
    /// Names of stimulus-only signals the circuit does not declare.
    implicit: Vec<String>,
    /// Min-heap on `(time, sequence)`.
    queue: BinaryHeap<Reverse<QueuedEvent>>,
    next_seq: u64,
    /// `(driven signal, scheduled time)` → triggering value that last
    /// scheduled an evaluation there.
    ledger: HashMap<(SignalId, SimTime), Bit>,
    trace: Trace,
    recorder: Option<Box<dyn TraceRecorder + 'c>>,
    current_time: SimTime,
    config: SimConfig,
    stats: SimStats,
}

impl<'c> SimKernel<'c> {
    /// Creates a kernel with every signal at 0 and one queued input change
    /// per stimulus entry, in stimulus order.
    ///
    /// Under strict resolution a stimulus entry naming an undeclared signal
    /// fails here, before any event is processed.
    pub fn new(
        circuit: &'c Circuit,
        stimulus: &Stimulus,
        config: &SimConfig,
    ) -> Result<Self, SimError> {
        let mut kernel = Self {
            circuit,
            values: vec![Bit::Zero; circuit.signal_count()],
            implicit: Vec::new(),
            queue: BinaryHeap::with_capacity(stimulus.len()),
            next_seq: 0,
            ledger: HashMap::new(),
            trace: Trace::new(),
            recorder: None,
            current_time: SimTime::ZERO,
            config: config.clone(),
            stats: SimStats::default(),
        };

        for entry in stimulus.entries() {
            let signal = kernel.resolve_stimulus(&entry.signal, entry.time)?;
            kernel.push(Event::InputChange {
                time: entry.time,
                signal,
                value: entry.value,
            });
        }
        kernel.values.resize(kernel.signal_count(), Bit::Zero);

        Ok(kernel)
    }

    /// Attaches a streaming recorder and registers every signal with it.
    pub fn set_recorder(
        &mut self,
        mut recorder: Box<dyn TraceRecorder + 'c>,
    ) -> Result<(), SimError> {
        recorder.begin_scope(self.circuit.name())?;
        for index in 0..self.signal_count() {
            let id = SignalId::from_raw(index as u32);
            recorder.register_signal(id, self.signal_name(id))?;
        }
        recorder.end_scope()?;
        self.recorder = Some(recorder);
        Ok(())
    }

    /// Returns the time of the most recent time step.
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    /// Returns the number of events still queued.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Returns the run counters so far.
    pub fn stats(&self) -> SimStats {
        self.stats
    }

    /// Returns the changes recorded so far.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Returns the number of signals, including run-local implicit ones.
    pub fn signal_count(&self) -> usize {
        self.circuit.signal_count() + self.implicit.len()
    }

    /// Returns the name of a signal.
    pub fn signal_name(&self, id: SignalId) -> &str {
        let declared = self.circuit.signal_count();
        if id.index() < declared {
            self.circuit.signal_name(id)
        } else {
            &self.implicit[id.index() - declared]
        }
    }

    /// Returns the current value of a signal by name.
    pub fn value_of(&self, name: &str) -> Option<Bit> {
        self.find_signal(name).map(|id| self.values[id.index()])
    }

    /// Runs time steps until the queue is empty.
    pub fn run_to_completion(&mut self) -> Result<SimResult, SimError> {
        info!(
            circuit = self.circuit.name(),
            gates = self.circuit.gate_count(),
            stimulus = self.queue.len(),
            "simulation started"
        );

        while self.step()? == StepResult::Continued {}

        if let Some(rec) = &mut self.recorder {
            rec.finalize()?;
        }

        info!(
            circuit = self.circuit.name(),
            final_time = %self.current_time,
            changes = self.stats.changes,
            events = self.stats.events_processed,
            "simulation settled"
        );

        let final_values = (0..self.signal_count())
            .map(|i| {
                let id = SignalId::from_raw(i as u32);
                (self.signal_name(id).to_string(), self.values[i])
            })
            .collect();

        Ok(SimResult {
            trace: std::mem::take(&mut self.trace),
            final_time: self.current_time,
            final_values,
            stats: self.stats,
        })
    }

    /// Processes every event at the earliest pending time.
    pub fn step(&mut self) -> Result<StepResult, SimError> {
        let time = match self.queue.peek() {
            Some(Reverse(head)) => head.time(),
            None => return Ok(StepResult::Done),
        };

        if let Some(limit) = self.config.time_limit {
            let limit = SimTime::new(limit);
            if time > limit {
                warn!(time = %time, limit = %limit, "time limit reached with events pending");
                return Err(SimError::NonTerminatingCircuit {
                    time,
                    processed: self.stats.events_processed,
                    budget: Budget::Time(limit),
                });
            }
        }

        self.current_time = time;
        self.stats.time_steps += 1;

        let mut in_step = 0u64;
        while let Some(Reverse(head)) = self.queue.peek() {
            if head.time() != time {
                break;
            }
            let Some(Reverse(queued)) = self.queue.pop() else {
                break;
            };

            in_step += 1;
            if let Some(limit) = self.config.max_events_per_step {
                if in_step > limit {
                    warn!(time = %time, limit, "per-step event limit reached");
                    return Err(SimError::StepEventLimit { time, limit });
                }
            }
            if let Some(max) = self.config.max_events {
                if self.stats.events_processed >= max {
                    warn!(time = %time, budget = max, "event budget exhausted");
                    return Err(SimError::NonTerminatingCircuit {
                        time,
                        processed: self.stats.events_processed,
                        budget: Budget::Events(max),
                    });
                }
            }

            self.stats.events_processed += 1;
            self.process(queued.event)?;
        }

        debug!(time = %time, events = in_step, pending = self.queue.len(), "time step done");
        Ok(StepResult::Continued)
    }

    fn process(&mut self, event: Event) -> Result<(), SimError> {
        match event {
            Event::InputChange {
                time,
                signal,
                value,
            } => self.apply_change(time, signal, value),
            Event::GateEvaluation { time, gate } => {
                let circuit = self.circuit;
                let gate = circuit.gate(gate);
                let value = gate.evaluate(&self.values);
                self.apply_change(time, gate.output, value)
            }
        }
    }

    /// Applies a new value, recording and fanning out only if it differs.
    fn apply_change(&mut self, time: SimTime, signal: SignalId, value: Bit) -> Result<(), SimError> {
        if self.values[signal.index()] == value {
            self.stats.no_op_events += 1;
            return Ok(());
        }
        self.values[signal.index()] = value;
        self.record(time, signal, value)?;
        self.schedule_fanout(time, signal, value)
    }

    fn record(&mut self, time: SimTime, signal: SignalId, value: Bit) -> Result<(), SimError> {
        self.stats.changes += 1;
        let circuit = self.circuit;
        let declared = circuit.signal_count();
        let name = if signal.index() < declared {
            circuit.signal_name(signal)
        } else {
            self.implicit[signal.index() - declared].as_str()
        };
        if let Some(rec) = &mut self.recorder {
            rec.record_change(time, signal, name, value)?;
        }
        self.trace.record(time, name, value);
        Ok(())
    }

    /// Schedules an evaluation of every gate reading `signal`.
    ///
    /// The ledger is keyed on the driven output and scheduled time and holds
    /// the triggering value, not the gate's eventual output. A second
    /// trigger with the same value for the same key is skipped.
    fn schedule_fanout(&mut self, time: SimTime, signal: SignalId, trigger: Bit) -> Result<(), SimError> {
        let circuit = self.circuit;
        for &gate_id in circuit.fanout(signal) {
            let gate = circuit.gate(gate_id);
            let at = time
                .checked_add(gate.delay)
                .ok_or(SimError::TimeOverflow {
                    time,
                    delay: gate.delay,
                })?;
            let key = (gate.output, at);
            if self.ledger.get(&key) == Some(&trigger) {
                self.stats.evaluations_suppressed += 1;
                continue;
            }
            self.ledger.insert(key, trigger);
            self.schedule_evaluation(at, gate_id);
        }
        Ok(())
    }

    fn schedule_evaluation(&mut self, time: SimTime, gate: GateId) {
        self.stats.evaluations_scheduled += 1;
        self.push(Event::GateEvaluation { time, gate });
    }

    fn push(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(QueuedEvent { seq, event }));
    }

    fn find_signal(&self, name: &str) -> Option<SignalId> {
        self.circuit.find_signal(name).or_else(|| {
            self.implicit
                .iter()
                .position(|n| n == name)
                .map(|i| SignalId::from_raw((self.circuit.signal_count() + i) as u32))
        })
    }

    fn resolve_stimulus(&mut self, name: &str, time: SimTime) -> Result<SignalId, SimError> {
        if let Some(id) = self.find_signal(name) {
            return Ok(id);
        }
        match self.config.resolution {
            SignalResolution::Strict => Err(SimError::UnknownSignal {
                signal: name.to_string(),
                time,
            }),
            SignalResolution::Lenient => {
                warn!(
                    circuit = self.circuit.name(),
                    signal = name,
                    "stimulus drives undeclared signal; it has no fan-out"
                );
                self.implicit.push(name.to_string());
                Ok(SignalId::from_raw((self.signal_count() - 1) as u32))
            }
        }
    }
}
