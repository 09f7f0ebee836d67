//! The static netlist and its builder.
//!
//! [`CircuitBuilder`] collects declarations and gate instances in any order,
//! checks arity eagerly, and resolves signal names when [`build`](CircuitBuilder::build)
//! is called. The resulting [`Circuit`] is read-only and carries a fan-out
//! index (signal → gates reading it, in declaration order) and a driver index
//! (signal → gates driving it).

use std::fmt;

use lasso::Rodeo;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::arena::Arena;
use crate::error::NetlistError;
use crate::gate::{Gate, GateKind};
use crate::ids::{GateId, SignalId};

/// The declared role of a signal.
///
/// Roles only classify signals for listing and interface purposes; every
/// role has identical value semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalRole {
    /// Primary input.
    Input,
    /// Primary output.
    Output,
    /// Internal wire.
    Wire,
    /// Referenced by a gate but never declared (lenient resolution only).
    Implicit,
}

impl fmt::Display for SignalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignalRole::Input => "input",
            SignalRole::Output => "output",
            SignalRole::Wire => "wire",
            SignalRole::Implicit => "implicit",
        })
    }
}

/// How references to undeclared signals are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalResolution {
    /// Undeclared references are errors.
    Strict,
    /// Undeclared references become implicit signals starting at 0.
    #[default]
    Lenient,
}

/// A gate instance whose signal names have not been resolved yet.
#[derive(Debug)]
struct PendingGate {
    kind: GateKind,
    delay: u64,
    output: String,
    inputs: Vec<String>,
    instance: Option<String>,
}

/// Incremental constructor for a [`Circuit`].
#[derive(Debug)]
pub struct CircuitBuilder {
    name: String,
    ports: Vec<String>,
    resolution: SignalResolution,
    names: Rodeo<SignalId>,
    roles: Vec<SignalRole>,
    gates: Vec<PendingGate>,
}

impl CircuitBuilder {
    /// Creates an empty builder for a circuit with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ports: Vec::new(),
            resolution: SignalResolution::default(),
            names: Rodeo::new(),
            roles: Vec::new(),
            gates: Vec::new(),
        }
    }

    /// Sets the policy for gate pins that name undeclared signals.
    pub fn with_resolution(mut self, resolution: SignalResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Records a name from the module header port list.
    pub fn port(&mut self, name: &str) {
        if !self.ports.iter().any(|p| p == name) {
            self.ports.push(name.to_string());
        }
    }

    /// Declares a signal with the given role and returns its ID.
    ///
    /// Repeating a declaration with the same role is a no-op. A `wire`
    /// declaration of an existing input or output keeps the port role.
    /// Any other role conflict is a [`NetlistError::DuplicateSignal`].
    pub fn declare(&mut self, name: &str, role: SignalRole) -> Result<SignalId, NetlistError> {
        if let Some(id) = self.names.get(name) {
            let first = self.roles[id.index()];
            let compatible = first == role
                || (role == SignalRole::Wire
                    && matches!(first, SignalRole::Input | SignalRole::Output));
            if compatible {
                return Ok(id);
            }
            return Err(NetlistError::DuplicateSignal {
                name: name.to_string(),
                first,
                second: role,
            });
        }
        let id = self.names.get_or_intern(name);
        self.roles.push(role);
        Ok(id)
    }

    /// Declares a primary input.
    pub fn input(&mut self, name: &str) -> Result<SignalId, NetlistError> {
        self.declare(name, SignalRole::Input)
    }

    /// Declares a primary output.
    pub fn output(&mut self, name: &str) -> Result<SignalId, NetlistError> {
        self.declare(name, SignalRole::Output)
    }

    /// Declares an internal wire.
    pub fn wire(&mut self, name: &str) -> Result<SignalId, NetlistError> {
        self.declare(name, SignalRole::Wire)
    }

    /// Adds a gate instance. Arity is checked immediately; names are resolved
    /// by [`build`](Self::build), so gates may precede their declarations.
    pub fn add_gate(
        &mut self,
        kind: GateKind,
        delay: u64,
        output: &str,
        inputs: &[&str],
        instance: Option<&str>,
    ) -> Result<GateId, NetlistError> {
        let expected = kind.arity();
        if !expected.accepts(inputs.len()) {
            return Err(NetlistError::MalformedGate {
                kind,
                output: output.to_string(),
                expected,
                found: inputs.len(),
            });
        }
        let id = GateId::from_raw(self.gates.len() as u32);
        self.gates.push(PendingGate {
            kind,
            delay,
            output: output.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            instance: instance.map(str::to_string),
        });
        Ok(id)
    }

    /// Resolves every gate pin and freezes the circuit.
    pub fn build(mut self) -> Result<Circuit, NetlistError> {
        let pending = std::mem::take(&mut self.gates);
        let mut gates: Arena<GateId, Gate> = Arena::new();
        for p in pending {
            let output = self.resolve(&p.output, &p.output)?;
            let inputs = p
                .inputs
                .iter()
                .map(|name| self.resolve(name, &p.output))
                .collect::<Result<Vec<_>, _>>()?;
            gates.alloc(Gate {
                kind: p.kind,
                delay: p.delay,
                output,
                inputs,
                instance: p.instance,
            });
        }

        let signal_count = self.roles.len();
        let mut fanout: Vec<Vec<GateId>> = vec![Vec::new(); signal_count];
        let mut drivers: Vec<Vec<GateId>> = vec![Vec::new(); signal_count];
        for (gate_id, gate) in gates.iter() {
            drivers[gate.output.index()].push(gate_id);
            for input in &gate.inputs {
                let readers = &mut fanout[input.index()];
                // A gate reading the same signal on two pins is listed once.
                if readers.last() != Some(&gate_id) {
                    readers.push(gate_id);
                }
            }
        }

        let circuit = Circuit {
            name: self.name,
            ports: self.ports,
            resolution: self.resolution,
            names: self.names,
            roles: self.roles,
            gates,
            fanout,
            drivers,
        };

        for signal in circuit.multiply_driven() {
            warn!(
                circuit = %circuit.name,
                signal = circuit.signal_name(signal),
                drivers = circuit.drivers(signal).len(),
                "signal has multiple drivers; last evaluation wins"
            );
        }
        debug!(
            circuit = %circuit.name,
            signals = circuit.signal_count(),
            gates = circuit.gate_count(),
            "circuit built"
        );
        Ok(circuit)
    }

    fn resolve(&mut self, name: &str, gate_output: &str) -> Result<SignalId, NetlistError> {
        if let Some(id) = self.names.get(name) {
            return Ok(id);
        }
        match self.resolution {
            SignalResolution::Strict => Err(NetlistError::UnknownSignal {
                signal: name.to_string(),
                gate_output: gate_output.to_string(),
            }),
            SignalResolution::Lenient => {
                warn!(
                    circuit = %self.name,
                    signal = name,
                    "undeclared signal treated as implicit wire"
                );
                self.declare(name, SignalRole::Implicit)
            }
        }
    }
}

/// An immutable gate-level netlist.
#[derive(Debug)]
pub struct Circuit {
    name: String,
    ports: Vec<String>,
    resolution: SignalResolution,
    names: Rodeo<SignalId>,
    roles: Vec<SignalRole>,
    gates: Arena<GateId, Gate>,
    fanout: Vec<Vec<GateId>>,
    drivers: Vec<Vec<GateId>>,
}

impl Circuit {
    /// Starts building a circuit with the given name.
    pub fn builder(name: impl Into<String>) -> CircuitBuilder {
        CircuitBuilder::new(name)
    }

    /// Returns the circuit (module) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the module header port list in source order.
    pub fn ports(&self) -> &[String] {
        &self.ports
    }

    /// Returns the resolution policy the circuit was built with.
    pub fn resolution(&self) -> SignalResolution {
        self.resolution
    }

    /// Returns the number of signals, including implicit ones.
    pub fn signal_count(&self) -> usize {
        self.roles.len()
    }

    /// Returns the name of a signal.
    pub fn signal_name(&self, id: SignalId) -> &str {
        self.names.resolve(&id)
    }

    /// Finds a signal by name.
    pub fn find_signal(&self, name: &str) -> Option<SignalId> {
        self.names.get(name)
    }

    /// Returns the role of a signal.
    pub fn role(&self, id: SignalId) -> SignalRole {
        self.roles[id.index()]
    }

    /// Iterates over all signals in declaration order.
    pub fn signals(&self) -> impl Iterator<Item = (SignalId, &str, SignalRole)> + '_ {
        self.roles.iter().enumerate().map(|(i, &role)| {
            let id = SignalId::from_raw(i as u32);
            (id, self.signal_name(id), role)
        })
    }

    /// Returns the signals with the given role in declaration order.
    pub fn signals_with_role(&self, role: SignalRole) -> Vec<SignalId> {
        self.signals()
            .filter(|&(_, _, r)| r == role)
            .map(|(id, _, _)| id)
            .collect()
    }

    /// Returns the primary inputs in declaration order.
    pub fn inputs(&self) -> Vec<SignalId> {
        self.signals_with_role(SignalRole::Input)
    }

    /// Returns the primary outputs in declaration order.
    pub fn outputs(&self) -> Vec<SignalId> {
        self.signals_with_role(SignalRole::Output)
    }

    /// Returns the internal wires in declaration order.
    pub fn wires(&self) -> Vec<SignalId> {
        self.signals_with_role(SignalRole::Wire)
    }

    /// Returns the gate arena.
    pub fn gates(&self) -> &Arena<GateId, Gate> {
        &self.gates
    }

    /// Returns one gate.
    pub fn gate(&self, id: GateId) -> &Gate {
        self.gates.get(id)
    }

    /// Returns the number of gates.
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Returns the gates reading `signal`, in gate declaration order.
    pub fn fanout(&self, signal: SignalId) -> &[GateId] {
        self.fanout
            .get(signal.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the gates driving `signal`, in gate declaration order.
    pub fn drivers(&self, signal: SignalId) -> &[GateId] {
        self.drivers
            .get(signal.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns every signal driven by more than one gate.
    pub fn multiply_driven(&self) -> Vec<SignalId> {
        self.drivers
            .iter()
            .enumerate()
            .filter(|(_, d)| d.len() > 1)
            .map(|(i, _)| SignalId::from_raw(i as u32))
            .collect()
    }

    fn join_names(&self, ids: &[SignalId]) -> String {
        ids.iter()
            .map(|&id| self.signal_name(id))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Human-readable circuit listing.
impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit name: {}", self.name)?;
        writeln!(f, "Inputs: {}", self.join_names(&self.inputs()))?;
        writeln!(f, "Outputs: {}", self.join_names(&self.outputs()))?;
        writeln!(f, "Wires: {}", self.join_names(&self.wires()))?;
        let implicit = self.signals_with_role(SignalRole::Implicit);
        if !implicit.is_empty() {
            writeln!(f, "Implicit: {}", self.join_names(&implicit))?;
        }
        write!(f, "Gates:")?;
        for gate in self.gates.values() {
            write!(
                f,
                "\n  Type: {}, Delay: {}, Output: {}, Inputs: {}",
                gate.kind,
                gate.delay,
                self.signal_name(gate.output),
                self.join_names(&gate.inputs)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn half_adder() -> Circuit {
        let mut b = Circuit::builder("half_adder");
        b.input("a").unwrap();
        b.input("b").unwrap();
        b.output("s").unwrap();
        b.output("c").unwrap();
        b.add_gate(GateKind::Xor, 2, "s", &["a", "b"], Some("x1"))
            .unwrap();
        b.add_gate(GateKind::And, 1, "c", &["a", "b"], None).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn signals_are_dense_in_declaration_order() {
        let c = half_adder();
        let names: Vec<&str> = c.signals().map(|(_, n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "s", "c"]);
        assert_eq!(c.find_signal("s"), Some(SignalId::from_raw(2)));
        assert_eq!(c.signal_count(), 4);
    }

    #[test]
    fn role_lists() {
        let c = half_adder();
        assert_eq!(c.inputs().len(), 2);
        assert_eq!(c.outputs().len(), 2);
        assert!(c.wires().is_empty());
        assert_eq!(c.role(SignalId::from_raw(0)), SignalRole::Input);
    }

    #[test]
    fn fanout_in_gate_declaration_order() {
        let c = half_adder();
        let a = c.find_signal("a").unwrap();
        assert_eq!(c.fanout(a), &[GateId::from_raw(0), GateId::from_raw(1)]);
        let s = c.find_signal("s").unwrap();
        assert!(c.fanout(s).is_empty());
    }

    #[test]
    fn fanout_lists_gate_once_for_repeated_pin() {
        let mut b = Circuit::builder("dup");
        b.input("a").unwrap();
        b.output("y").unwrap();
        b.add_gate(GateKind::And, 1, "y", &["a", "a"], None).unwrap();
        let c = b.build().unwrap();
        assert_eq!(c.fanout(c.find_signal("a").unwrap()).len(), 1);
    }

    #[test]
    fn malformed_xor_rejected() {
        let mut b = Circuit::builder("bad");
        let err = b
            .add_gate(GateKind::Xor, 1, "y", &["a", "b", "c"], None)
            .unwrap_err();
        assert!(matches!(err, NetlistError::MalformedGate { found: 3, .. }));
    }

    #[test]
    fn malformed_not_rejected() {
        let mut b = Circuit::builder("bad");
        let err = b
            .add_gate(GateKind::Not, 1, "y", &["a", "b"], None)
            .unwrap_err();
        assert!(matches!(err, NetlistError::MalformedGate { .. }));
    }

    #[test]
    fn empty_and_rejected() {
        let mut b = Circuit::builder("bad");
        assert!(b.add_gate(GateKind::And, 0, "y", &[], None).is_err());
    }

    #[test]
    fn strict_rejects_undeclared_signal() {
        let mut b = Circuit::builder("strict").with_resolution(SignalResolution::Strict);
        b.input("a").unwrap();
        b.output("y").unwrap();
        b.add_gate(GateKind::And, 1, "y", &["a", "ghost"], None)
            .unwrap();
        let err = b.build().unwrap_err();
        assert_eq!(
            err,
            NetlistError::UnknownSignal {
                signal: "ghost".into(),
                gate_output: "y".into(),
            }
        );
    }

    #[traced_test]
    #[test]
    fn lenient_declares_implicit_signal() {
        let mut b = Circuit::builder("lenient");
        b.input("a").unwrap();
        b.add_gate(GateKind::Buf, 1, "y", &["a"], None).unwrap();
        let c = b.build().unwrap();
        let y = c.find_signal("y").unwrap();
        assert_eq!(c.role(y), SignalRole::Implicit);
        assert!(logs_contain("undeclared signal treated as implicit wire"));
    }

    #[test]
    fn gates_may_precede_declarations() {
        let mut b = Circuit::builder("late").with_resolution(SignalResolution::Strict);
        b.add_gate(GateKind::Not, 1, "y", &["a"], None).unwrap();
        b.input("a").unwrap();
        b.output("y").unwrap();
        assert!(b.build().is_ok());
    }

    #[test]
    fn repeated_declaration_is_noop() {
        let mut b = Circuit::builder("rep");
        let first = b.input("a").unwrap();
        let second = b.input("a").unwrap();
        assert_eq!(first, second);
        let c = b.build().unwrap();
        assert_eq!(c.signal_count(), 1);
    }

    #[test]
    fn wire_redeclaration_of_port_keeps_role() {
        let mut b = Circuit::builder("ports");
        b.output("y").unwrap();
        b.wire("y").unwrap();
        let c = b.build().unwrap();
        assert_eq!(c.role(c.find_signal("y").unwrap()), SignalRole::Output);
    }

    #[test]
    fn conflicting_roles_rejected() {
        let mut b = Circuit::builder("conflict");
        b.input("a").unwrap();
        let err = b.output("a").unwrap_err();
        assert!(matches!(err, NetlistError::DuplicateSignal { .. }));
    }

    #[traced_test]
    #[test]
    fn multiple_drivers_reported() {
        let mut b = Circuit::builder("multi");
        b.input("a").unwrap();
        b.input("b").unwrap();
        b.output("y").unwrap();
        b.add_gate(GateKind::Buf, 1, "y", &["a"], None).unwrap();
        b.add_gate(GateKind::Buf, 1, "y", &["b"], None).unwrap();
        let c = b.build().unwrap();
        let y = c.find_signal("y").unwrap();
        assert_eq!(c.multiply_driven(), vec![y]);
        assert_eq!(c.drivers(y).len(), 2);
        assert!(logs_contain("signal has multiple drivers"));
    }

    #[test]
    fn ports_recorded_once() {
        let mut b = Circuit::builder("p");
        b.port("a");
        b.port("a");
        b.port("y");
        let c = b.build().unwrap();
        assert_eq!(c.ports(), &["a".to_string(), "y".to_string()]);
    }

    #[test]
    fn listing_format() {
        let c = half_adder();
        let text = c.to_string();
        assert_eq!(
            text,
            "Circuit name: half_adder\n\
             Inputs: a b\n\
             Outputs: s c\n\
             Wires: \n\
             Gates:\n  \
             Type: XOR, Delay: 2, Output: s, Inputs: a b\n  \
             Type: AND, Delay: 1, Output: c, Inputs: a b"
        );
    }

    #[test]
    fn resolution_deserializes_lowercase() {
        let r: SignalResolution = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(r, SignalResolution::Strict);
        assert_eq!(SignalResolution::default(), SignalResolution::Lenient);
    }
}
