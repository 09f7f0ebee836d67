//! Topological ordering of gates and static (delay-free) evaluation.
//!
//! [`levelize`] orders gates so every gate follows the drivers of its inputs,
//! or reports a [`NetlistError::CombinationalLoop`]. [`evaluate_static`] uses
//! that order to compute the fixed point a combinational circuit settles to
//! for a given set of input values, ignoring delays.

use gatesim_common::Bit;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::circuit::Circuit;
use crate::error::NetlistError;
use crate::ids::{GateId, SignalId};

/// Returns the gates of `circuit` in dependency order.
///
/// An edge runs from each gate to every gate that reads its output.
pub fn levelize(circuit: &Circuit) -> Result<Vec<GateId>, NetlistError> {
    let mut graph: DiGraph<GateId, ()> = DiGraph::with_capacity(circuit.gate_count(), 0);
    let nodes: Vec<NodeIndex> = circuit
        .gates()
        .iter()
        .map(|(id, _)| graph.add_node(id))
        .collect();

    for (id, gate) in circuit.gates().iter() {
        for &reader in circuit.fanout(gate.output) {
            graph.add_edge(nodes[id.index()], nodes[reader.index()], ());
        }
    }

    toposort(&graph, None)
        .map(|order| order.into_iter().map(|n| graph[n]).collect())
        .map_err(|cycle| {
            let gate = circuit.gate(graph[cycle.node_id()]);
            NetlistError::CombinationalLoop {
                signal: circuit.signal_name(gate.output).to_string(),
            }
        })
}

/// Evaluates `circuit` once in dependency order from an all-zero state with
/// the given signal assignments applied first.
///
/// Returns the resulting value table indexed by [`SignalId`].
pub fn evaluate_static(
    circuit: &Circuit,
    assignments: &[(SignalId, Bit)],
) -> Result<Vec<Bit>, NetlistError> {
    let order = levelize(circuit)?;
    let mut values = vec![Bit::Zero; circuit.signal_count()];
    for &(signal, value) in assignments {
        values[signal.index()] = value;
    }
    for id in order {
        let gate = circuit.gate(id);
        values[gate.output.index()] = gate.evaluate(&values);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;

    fn chain() -> Circuit {
        // Declared out of dependency order on purpose.
        let mut b = Circuit::builder("chain");
        b.input("a").unwrap();
        b.wire("w1").unwrap();
        b.wire("w2").unwrap();
        b.output("y").unwrap();
        b.add_gate(GateKind::Not, 1, "y", &["w2"], None).unwrap();
        b.add_gate(GateKind::Not, 1, "w2", &["w1"], None).unwrap();
        b.add_gate(GateKind::Not, 1, "w1", &["a"], None).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn orders_by_dependency() {
        let c = chain();
        let order = levelize(&c).unwrap();
        assert_eq!(
            order,
            vec![GateId::from_raw(2), GateId::from_raw(1), GateId::from_raw(0)]
        );
    }

    #[test]
    fn static_evaluation_of_chain() {
        let c = chain();
        let a = c.find_signal("a").unwrap();
        let y = c.find_signal("y").unwrap();
        let values = evaluate_static(&c, &[(a, Bit::One)]).unwrap();
        assert_eq!(values[y.index()], Bit::Zero);
        let values = evaluate_static(&c, &[]).unwrap();
        assert_eq!(values[y.index()], Bit::One);
    }

    #[test]
    fn detects_loop() {
        let mut b = Circuit::builder("ring");
        b.wire("p").unwrap();
        b.wire("q").unwrap();
        b.add_gate(GateKind::Not, 1, "q", &["p"], None).unwrap();
        b.add_gate(GateKind::Buf, 1, "p", &["q"], None).unwrap();
        let c = b.build().unwrap();
        let err = levelize(&c).unwrap_err();
        assert!(matches!(err, NetlistError::CombinationalLoop { .. }));
    }

    #[test]
    fn self_loop_detected() {
        let mut b = Circuit::builder("self");
        b.input("a").unwrap();
        b.wire("q").unwrap();
        b.add_gate(GateKind::Or, 0, "q", &["a", "q"], None).unwrap();
        let c = b.build().unwrap();
        assert!(levelize(&c).is_err());
    }

    #[test]
    fn empty_circuit_levelizes() {
        let c = Circuit::builder("empty").build().unwrap();
        assert!(levelize(&c).unwrap().is_empty());
    }
}
