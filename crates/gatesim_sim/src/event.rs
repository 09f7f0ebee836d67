//! Scheduled events and their queue ordering.
//!
//! Events are ordered by `(time, sequence)`. The sequence number is assigned
//! from a per-run counter when an event is created and only breaks ties, so
//! same-time events leave the queue in creation order.

use std::cmp::Ordering;

use gatesim_common::Bit;
use gatesim_netlist::{GateId, SignalId};

use crate::time::SimTime;

/// Something that happens at a point in simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// An externally supplied stimulus.
    InputChange {
        /// Delivery time.
        time: SimTime,
        /// The signal being driven.
        signal: SignalId,
        /// The value being applied.
        value: Bit,
    },
    /// A request to re-evaluate one gate's output.
    GateEvaluation {
        /// Delivery time.
        time: SimTime,
        /// The gate to evaluate.
        gate: GateId,
    },
}

impl Event {
    /// Returns the delivery time.
    pub fn time(&self) -> SimTime {
        match self {
            Event::InputChange { time, .. } | Event::GateEvaluation { time, .. } => *time,
        }
    }
}

/// An [`Event`] tagged with its insertion sequence number.
#[derive(Debug, Clone, Copy)]
pub struct QueuedEvent {
    /// Monotonic insertion counter, unique within a run.
    pub seq: u64,
    /// The scheduled event.
    pub event: Event,
}

impl QueuedEvent {
    /// Returns the delivery time of the wrapped event.
    pub fn time(&self) -> SimTime {
        self.event.time()
    }

    fn key(&self) -> (SimTime, u64) {
        (self.time(), self.seq)
    }
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for QueuedEvent {}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time()
            .cmp(&other.time())
            .then(self.seq.cmp(&other.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    fn eval(time: u64, seq: u64, gate: u32) -> QueuedEvent {
        QueuedEvent {
            seq,
            event: Event::GateEvaluation {
                time: SimTime::new(time),
                gate: GateId::from_raw(gate),
            },
        }
    }

    fn input(time: u64, seq: u64) -> QueuedEvent {
        QueuedEvent {
            seq,
            event: Event::InputChange {
                time: SimTime::new(time),
                signal: SignalId::from_raw(0),
                value: Bit::One,
            },
        }
    }

    #[test]
    fn time_takes_precedence() {
        assert!(eval(1, 9, 0) < eval(2, 0, 0));
    }

    #[test]
    fn sequence_breaks_ties() {
        assert!(eval(5, 1, 7) < eval(5, 2, 0));
    }

    #[test]
    fn variant_does_not_affect_order() {
        // An input change created after a gate evaluation at the same time
        // stays behind it.
        assert!(eval(3, 0, 0) < input(3, 1));
        assert!(input(3, 0) < eval(3, 1, 0));
    }

    #[test]
    fn heap_pops_fifo_within_time() {
        let mut heap = BinaryHeap::new();
        heap.push(Reverse(eval(2, 3, 0)));
        heap.push(Reverse(input(1, 2)));
        heap.push(Reverse(eval(1, 0, 1)));
        heap.push(Reverse(eval(1, 1, 2)));
        let order: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|Reverse(e)| e.seq)).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn event_time_accessor() {
        assert_eq!(input(4, 0).time(), SimTime::new(4));
        assert_eq!(eval(6, 0, 0).event.time(), SimTime::new(6));
    }
}
