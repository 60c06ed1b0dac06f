//! Circuit representation and evaluation.

use std::collections::{BTreeMap, VecDeque};

use fixedbitset::FixedBitSet;
use tracing::{debug, trace};

use crate::coords::{GateRef, Port, WireRef};
use crate::error::{ConnectivityError, Error, Result};
use crate::gate::{Gate, GateType, evaluate};
use crate::wire::Wire;

/// Gates and wires whose value changed during one propagation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Propagation {
    /// Gates whose output differs from the previous pass, in evaluation order.
    pub changed_gates: Vec<GateRef>,

    /// Gate output wires whose value differs from before the pass.
    pub changed_wires: Vec<WireRef>,
}

impl Propagation {
    /// Returns true if nothing changed.
    pub fn is_quiet(&self) -> bool {
        self.changed_gates.is_empty() && self.changed_wires.is_empty()
    }
}

/// Number of gates of each type in a circuit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GateCounts([usize; 6]);

impl GateCounts {
    fn slot(ty: GateType) -> usize {
        match ty {
            GateType::NAND => 0,
            GateType::AND => 1,
            GateType::OR => 2,
            GateType::XOR => 3,
            GateType::NOT => 4,
            GateType::BUFFER => 5,
        }
    }

    /// Gets the count for one type.
    pub fn get(&self, ty: GateType) -> usize {
        self.0[Self::slot(ty)]
    }

    /// Total number of gates counted.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Iterates over types with a non-zero count.
    pub fn iter(&self) -> impl Iterator<Item = (GateType, usize)> + '_ {
        GateType::ALL
            .into_iter()
            .map(|ty| (ty, self.get(ty)))
            .filter(|(_, n)| *n > 0)
    }
}

/// A directed acyclic graph of gates and wires.
///
/// The circuit owns every gate and wire; the handles it returns index into
/// its storage and are never invalidated.  Construction goes:
///
/// 1. create gates and wires with [`Circuit::add_gate`] / [`Circuit::add_wire`]
/// 2. link them with [`Circuit::connect`]
/// 3. register primary ports with [`Circuit::mark_input`] / [`Circuit::mark_output`]
/// 4. call [`Circuit::finalize`]
///
/// after which [`Circuit::set_input`] and [`Circuit::propagate`] may be
/// called any number of times.  Any structural change to the gates clears
/// the finalized flag again.
#[derive(Clone, Debug, Default)]
pub struct Circuit {
    gates: Vec<Gate>,
    wires: Vec<Wire>,

    /// Primary inputs.  Position is bit significance and never changes.
    input_wires: Vec<WireRef>,

    /// Primary outputs.  Position is bit significance and never changes.
    output_wires: Vec<WireRef>,

    /// Gate evaluation order computed by the last successful finalize.
    topo_order: Vec<GateRef>,

    finalized: bool,
}

impl Circuit {
    /// Creates an empty, unfinalized circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a gate with no inputs and no output.
    pub fn add_gate(&mut self, ty: GateType) -> GateRef {
        let id = GateRef::from(self.gates.len());
        self.gates.push(Gate::new(id, ty));
        self.finalized = false;
        id
    }

    /// Allocates an undriven wire with no consumers.
    pub fn add_wire(&mut self) -> WireRef {
        let id = WireRef::from(self.wires.len());
        self.wires.push(Wire::new(id));
        id
    }

    /// Looks up a gate by handle.
    pub fn get_gate(&self, g: GateRef) -> Option<&Gate> {
        self.gates.get(g.index())
    }

    /// Looks up a wire by handle.
    pub fn get_wire(&self, w: WireRef) -> Option<&Wire> {
        self.wires.get(w.index())
    }

    fn check_gate(&self, g: GateRef) -> Result<()> {
        if g.index() < self.gates.len() {
            Ok(())
        } else {
            Err(ConnectivityError::UnknownGate(g).into())
        }
    }

    fn check_wire(&self, w: WireRef) -> Result<()> {
        if w.index() < self.wires.len() {
            Ok(())
        } else {
            Err(ConnectivityError::UnknownWire(w).into())
        }
    }

    /// Connects a wire to its driving gate and/or a consuming gate.
    ///
    /// With `source`, binds the wire and gate as driver and output.  Repeating
    /// an existing binding is a no-op, but a wire can't get a second driver
    /// and a gate can't drive a second wire.
    ///
    /// With `destination`, appends one input slot on the gate reading the
    /// wire.  Calling this twice with the same pair gives the gate two slots
    /// on the same wire.
    pub fn connect(
        &mut self,
        wire: WireRef,
        source: Option<GateRef>,
        destination: Option<GateRef>,
    ) -> Result<()> {
        self.check_wire(wire)?;
        if let Some(src) = source {
            self.check_gate(src)?;
            if let Some(driver) = self.wires[wire.index()].driver() {
                if driver != src {
                    return Err(ConnectivityError::WireAlreadyDriven { wire, driver }.into());
                }
            }
            if let Some(output) = self.gates[src.index()].output() {
                if output != wire {
                    return Err(ConnectivityError::GateAlreadyDrives { gate: src, output }.into());
                }
            }
        }
        if let Some(dst) = destination {
            self.check_gate(dst)?;
        }

        // Everything checked, now apply both sides of each link.
        if let Some(src) = source {
            self.wires[wire.index()].set_driver(src);
            self.gates[src.index()].set_output(wire);
        }
        if let Some(dst) = destination {
            self.gates[dst.index()].push_input(wire);
            self.wires[wire.index()].push_consumer(dst);
        }

        self.finalized = false;
        Ok(())
    }

    /// Appends a wire to the primary input list.
    pub fn mark_input(&mut self, wire: WireRef) -> Result<()> {
        self.check_wire(wire)?;
        self.input_wires.push(wire);
        Ok(())
    }

    /// Appends a wire to the primary output list.
    pub fn mark_output(&mut self, wire: WireRef) -> Result<()> {
        self.check_wire(wire)?;
        self.output_wires.push(wire);
        Ok(())
    }

    /// Unbinds every input slot of a gate, removing one consumer occurrence
    /// from the bound wire per slot.  Returns the old inputs in slot order.
    pub fn detach_inputs(&mut self, gate: GateRef) -> Result<Vec<WireRef>> {
        self.check_gate(gate)?;
        let inputs = self.gates[gate.index()].take_inputs();
        for w in &inputs {
            let removed = self.wires[w.index()].remove_consumer(gate);
            debug_assert!(removed, "circuit: {gate} was not a consumer of {w}");
        }
        self.finalized = false;
        Ok(inputs)
    }

    /// Changes the function a gate computes, keeping its links.
    pub fn set_gate_type(&mut self, gate: GateRef, ty: GateType) -> Result<()> {
        self.check_gate(gate)?;
        self.gates[gate.index()].set_type(ty);
        self.finalized = false;
        Ok(())
    }

    /// Checks that every gate/wire link is mirrored on the other side, with
    /// matching occurrence counts.
    pub fn validate(&self) -> Result<()> {
        for gate in &self.gates {
            let g = gate.id();

            if let Some(out) = gate.output() {
                if self.wires[out.index()].driver() != Some(g) {
                    return Err(ConnectivityError::OutputNotMirrored { gate: g, wire: out }.into());
                }
            }

            let mut slots: BTreeMap<WireRef, usize> = BTreeMap::new();
            for w in gate.inputs() {
                *slots.entry(*w).or_default() += 1;
            }
            for (wire, expected) in slots {
                let found = self.wires[wire.index()].consumer_count(g);
                if found != expected {
                    return Err(ConnectivityError::InputNotMirrored {
                        gate: g,
                        wire,
                        expected,
                        found,
                    }
                    .into());
                }
            }
        }

        for wire in &self.wires {
            let w = wire.id();

            if let Some(driver) = wire.driver() {
                if self.gates[driver.index()].output() != Some(w) {
                    return Err(
                        ConnectivityError::DriverNotMirrored { wire: w, gate: driver }.into(),
                    );
                }
            }

            let mut uses: BTreeMap<GateRef, usize> = BTreeMap::new();
            for g in wire.consumers() {
                *uses.entry(*g).or_default() += 1;
            }
            for (gate, expected) in uses {
                let found = self.gates[gate.index()]
                    .inputs()
                    .iter()
                    .filter(|i| **i == w)
                    .count();
                if found != expected {
                    return Err(ConnectivityError::ConsumerNotMirrored {
                        wire: w,
                        gate,
                        expected,
                        found,
                    }
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validates the graph and computes the gate evaluation order with Kahn's
    /// algorithm.
    ///
    /// On error the previous order and finalized flag are left untouched.
    pub fn finalize(&mut self) -> Result<()> {
        self.validate()?;
        for gate in &self.gates {
            gate.ty().check_arity(gate.inputs().len())?;
        }

        let n = self.gates.len();

        // In-degree counts input slots fed by some gate, so a gate reading
        // the same driven wire twice waits for two decrements.
        let mut in_degree: Vec<usize> = self
            .gates
            .iter()
            .map(|g| {
                g.inputs()
                    .iter()
                    .filter(|w| !self.wires[w.index()].is_primary())
                    .count()
            })
            .collect();

        let mut ready: VecDeque<GateRef> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(i, _)| GateRef::from(i))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(g) = ready.pop_front() {
            order.push(g);

            let Some(out) = self.gates[g.index()].output() else {
                continue;
            };
            for c in self.wires[out.index()].consumers() {
                let d = &mut in_degree[c.index()];
                *d -= 1;
                if *d == 0 {
                    ready.push_back(*c);
                }
            }
        }

        if order.len() < n {
            let mut placed = FixedBitSet::with_capacity(n);
            for g in &order {
                placed.insert(g.index());
            }
            let stuck = GateRef::from(placed.zeroes().next().unwrap_or_default());
            return Err(Error::CycleDetected {
                ordered: order.len(),
                total: n,
                stuck,
            });
        }

        debug!(
            gates = n,
            wires = self.wires.len(),
            order = order.len(),
            "finalized circuit"
        );
        self.topo_order = order;
        self.finalized = true;
        Ok(())
    }

    /// Sets the raw value of a primary input wire.
    pub fn set_input(&mut self, index: usize, value: bool) -> Result<()> {
        let w = *self.input_wires.get(index).ok_or(Error::IndexOutOfRange {
            port: Port::Input,
            index,
            len: self.input_wires.len(),
        })?;
        self.wires[w.index()].set_value(value);
        Ok(())
    }

    /// Evaluates every gate in topological order, writing each result to the
    /// gate's output wire.
    ///
    /// A wire bound to several slots of a gate contributes its value once per
    /// slot.
    pub fn propagate(&mut self) -> Result<Propagation> {
        if !self.finalized {
            return Err(Error::NotFinalized);
        }

        let Self {
            gates,
            wires,
            topo_order,
            ..
        } = self;

        let mut report = Propagation::default();
        let mut values = Vec::new();
        for &g in topo_order.iter() {
            let gate = &mut gates[g.index()];

            values.clear();
            values.extend(gate.inputs().iter().map(|w| wires[w.index()].value()));

            // Arity was checked at finalize.
            let state = evaluate(gate.ty(), &values)?;
            if gate.store_state(state) {
                report.changed_gates.push(g);
            }

            if let Some(out) = gate.output() {
                let wire = &mut wires[out.index()];
                wire.set_value(state);
                if wire.value_changed() {
                    report.changed_wires.push(out);
                }
            }
        }

        trace!(
            changed_gates = report.changed_gates.len(),
            changed_wires = report.changed_wires.len(),
            "propagated"
        );
        Ok(report)
    }

    /// Reads the current value of a primary output wire.
    pub fn get_output(&self, index: usize) -> Result<bool> {
        let w = self.output_wires.get(index).ok_or(Error::IndexOutOfRange {
            port: Port::Output,
            index,
            len: self.output_wires.len(),
        })?;
        Ok(self.wires[w.index()].value())
    }

    /// Sets every primary input, propagates, and returns every primary
    /// output, all in port order.
    pub fn evaluate_inputs(&mut self, inputs: &[bool]) -> Result<Vec<bool>> {
        if inputs.len() != self.input_wires.len() {
            return Err(Error::InvalidArgument(format!(
                "expected {} input values, got {}",
                self.input_wires.len(),
                inputs.len()
            )));
        }
        if !self.finalized {
            return Err(Error::NotFinalized);
        }

        for (i, v) in inputs.iter().enumerate() {
            self.set_input(i, *v)?;
        }
        self.propagate()?;

        Ok(self
            .output_wires
            .iter()
            .map(|w| self.wires[w.index()].value())
            .collect())
    }

    /// All gates, indexed by [`GateRef`].
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// All wires, indexed by [`WireRef`].
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Primary inputs in port order.
    pub fn input_wires(&self) -> &[WireRef] {
        &self.input_wires
    }

    /// Primary outputs in port order.
    pub fn output_wires(&self) -> &[WireRef] {
        &self.output_wires
    }

    /// Evaluation order from the last successful finalize.
    pub fn topological_order(&self) -> &[GateRef] {
        &self.topo_order
    }

    /// Number of gates.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Number of wires.
    pub fn num_wires(&self) -> usize {
        self.wires.len()
    }

    /// Number of primary inputs.
    pub fn num_inputs(&self) -> usize {
        self.input_wires.len()
    }

    /// Number of primary outputs.
    pub fn num_outputs(&self) -> usize {
        self.output_wires.len()
    }

    /// True if the cached order matches the current structure.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Counts the gates of each type.
    pub fn gate_counts(&self) -> GateCounts {
        let mut counts = GateCounts::default();
        for g in &self.gates {
            counts.0[GateCounts::slot(g.ty())] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// in -> NOT -> out
    fn not_circuit() -> (Circuit, GateRef, WireRef) {
        let mut c = Circuit::new();
        let input = c.add_wire();
        c.mark_input(input).unwrap();
        let g = c.add_gate(GateType::NOT);
        let output = c.add_wire();
        c.mark_output(output).unwrap();
        c.connect(input, None, Some(g)).unwrap();
        c.connect(output, Some(g), None).unwrap();
        c.finalize().unwrap();
        (c, g, output)
    }

    #[test]
    fn test_not_circuit() {
        let (mut c, _, _) = not_circuit();
        assert_eq!(c.evaluate_inputs(&[false]).unwrap(), vec![true]);
        assert_eq!(c.evaluate_inputs(&[true]).unwrap(), vec![false]);
    }

    #[test]
    fn test_double_not_is_buffer() {
        let mut c = Circuit::new();
        let input = c.add_wire();
        c.mark_input(input).unwrap();
        let not1 = c.add_gate(GateType::NOT);
        let not2 = c.add_gate(GateType::NOT);
        let mid = c.add_wire();
        let output = c.add_wire();
        c.mark_output(output).unwrap();
        c.connect(input, None, Some(not1)).unwrap();
        c.connect(mid, Some(not1), Some(not2)).unwrap();
        c.connect(output, Some(not2), None).unwrap();
        c.finalize().unwrap();

        assert_eq!(c.topological_order(), &[not1, not2]);
        for v in [true, false] {
            c.set_input(0, v).unwrap();
            c.propagate().unwrap();
            assert_eq!(c.get_output(0), Ok(v));
        }
    }

    #[test]
    fn test_change_report() {
        let (mut c, g, output) = not_circuit();

        c.set_input(0, false).unwrap();
        let first = c.propagate().unwrap();
        assert_eq!(first.changed_gates, vec![g]);
        assert_eq!(first.changed_wires, vec![output]);

        let second = c.propagate().unwrap();
        assert!(second.is_quiet());

        c.set_input(0, true).unwrap();
        let third = c.propagate().unwrap();
        assert_eq!(third.changed_wires, vec![output]);
        assert!(!c.get_wire(output).unwrap().value());
        assert!(c.get_wire(output).unwrap().previous_value());
    }

    #[test]
    fn test_propagate_before_finalize() {
        let mut c = Circuit::new();
        assert_eq!(c.propagate(), Err(Error::NotFinalized));
    }

    #[test]
    fn test_structural_change_clears_finalized() {
        let (mut c, _, _) = not_circuit();
        assert!(c.is_finalized());
        c.add_gate(GateType::BUFFER);
        assert!(!c.is_finalized());
        assert_eq!(c.propagate(), Err(Error::NotFinalized));
    }

    #[test]
    fn test_port_bounds() {
        let mut c = Circuit::new();
        let w = c.add_wire();
        c.mark_input(w).unwrap();
        c.mark_output(w).unwrap();

        assert_eq!(
            c.set_input(1, true),
            Err(Error::IndexOutOfRange {
                port: Port::Input,
                index: 1,
                len: 1
            })
        );
        assert_eq!(
            c.get_output(1),
            Err(Error::IndexOutOfRange {
                port: Port::Output,
                index: 1,
                len: 1
            })
        );
    }

    #[test]
    fn test_connect_rejects_second_driver() {
        let mut c = Circuit::new();
        let g1 = c.add_gate(GateType::NOT);
        let g2 = c.add_gate(GateType::NOT);
        let w = c.add_wire();
        c.connect(w, Some(g1), None).unwrap();

        // Re-binding the same pair is fine.
        c.connect(w, Some(g1), None).unwrap();

        assert_eq!(
            c.connect(w, Some(g2), None),
            Err(ConnectivityError::WireAlreadyDriven { wire: w, driver: g1 }.into())
        );
        assert_eq!(c.get_gate(g2).unwrap().output(), None);
    }

    #[test]
    fn test_connect_rejects_second_output() {
        let mut c = Circuit::new();
        let g = c.add_gate(GateType::NOT);
        let w1 = c.add_wire();
        let w2 = c.add_wire();
        let h = c.add_gate(GateType::NOT);
        c.connect(w1, Some(g), None).unwrap();

        // The destination half must not be applied either.
        assert_eq!(
            c.connect(w2, Some(g), Some(h)),
            Err(ConnectivityError::GateAlreadyDrives { gate: g, output: w1 }.into())
        );
        assert!(c.get_wire(w2).unwrap().driver().is_none());
        assert!(c.get_gate(h).unwrap().inputs().is_empty());
    }

    #[test]
    fn test_connect_unknown_handles() {
        let mut c = Circuit::new();
        let w = c.add_wire();
        let ghost_gate = GateRef::from(5u32);
        let ghost_wire = WireRef::from(9u32);
        assert_eq!(
            c.connect(w, Some(ghost_gate), None),
            Err(ConnectivityError::UnknownGate(ghost_gate).into())
        );
        assert_eq!(
            c.mark_output(ghost_wire),
            Err(ConnectivityError::UnknownWire(ghost_wire).into())
        );
    }

    #[test]
    fn test_same_wire_on_two_slots() {
        let mut c = Circuit::new();
        let a = c.add_wire();
        c.mark_input(a).unwrap();
        let g = c.add_gate(GateType::NAND);
        let out = c.add_wire();
        c.mark_output(out).unwrap();
        c.connect(a, None, Some(g)).unwrap();
        c.connect(a, None, Some(g)).unwrap();
        c.connect(out, Some(g), None).unwrap();
        c.finalize().unwrap();

        assert_eq!(c.get_wire(a).unwrap().consumers(), &[g, g]);
        assert_eq!(c.evaluate_inputs(&[true]).unwrap(), vec![false]);
        assert_eq!(c.evaluate_inputs(&[false]).unwrap(), vec![true]);
    }

    #[test]
    fn test_detach_inputs() {
        let mut c = Circuit::new();
        let a = c.add_wire();
        let b = c.add_wire();
        let g = c.add_gate(GateType::AND);
        c.connect(a, None, Some(g)).unwrap();
        c.connect(a, None, Some(g)).unwrap();
        c.connect(b, None, Some(g)).unwrap();

        assert_eq!(c.detach_inputs(g).unwrap(), vec![a, a, b]);
        assert!(c.get_gate(g).unwrap().inputs().is_empty());
        assert!(c.get_wire(a).unwrap().consumers().is_empty());
        assert!(c.get_wire(b).unwrap().consumers().is_empty());
        c.validate().unwrap();
    }

    #[test]
    fn test_finalize_rejects_cycle() {
        // a -> AND(a, fb) -> x -> NOT -> fb, feeding back into the AND
        let mut c = Circuit::new();
        let a = c.add_wire();
        c.mark_input(a).unwrap();
        let and = c.add_gate(GateType::AND);
        let not = c.add_gate(GateType::NOT);
        let x = c.add_wire();
        let fb = c.add_wire();
        c.connect(a, None, Some(and)).unwrap();
        c.connect(x, Some(and), Some(not)).unwrap();
        c.connect(fb, Some(not), Some(and)).unwrap();
        c.mark_output(x).unwrap();

        let err = c.finalize().unwrap_err();
        assert!(matches!(
            err,
            Error::CycleDetected {
                ordered: 0,
                total: 2,
                ..
            }
        ));
        assert!(!c.is_finalized());
    }

    #[test]
    fn test_cycle_behind_acyclic_prefix() {
        let mut c = Circuit::new();
        let a = c.add_wire();
        let head = c.add_gate(GateType::BUFFER);
        let loop1 = c.add_gate(GateType::OR);
        let loop2 = c.add_gate(GateType::BUFFER);
        let h = c.add_wire();
        let l1 = c.add_wire();
        let l2 = c.add_wire();
        c.connect(a, None, Some(head)).unwrap();
        c.connect(h, Some(head), Some(loop1)).unwrap();
        c.connect(l1, Some(loop1), Some(loop2)).unwrap();
        c.connect(l2, Some(loop2), Some(loop1)).unwrap();

        assert_eq!(
            c.finalize(),
            Err(Error::CycleDetected {
                ordered: 1,
                total: 3,
                stuck: loop1
            })
        );
    }

    #[test]
    fn test_finalize_checks_arity() {
        let mut c = Circuit::new();
        let a = c.add_wire();
        let g = c.add_gate(GateType::XOR);
        c.connect(a, None, Some(g)).unwrap();
        assert_eq!(
            c.finalize(),
            Err(Error::InvalidArity {
                ty: GateType::XOR,
                got: 1
            })
        );
    }

    #[test]
    fn test_fan_out_and_diamond() {
        // a -> NOT -> n; AND(n, n') where n' = NOT(a) on a second gate.
        let mut c = Circuit::new();
        let a = c.add_wire();
        c.mark_input(a).unwrap();
        let not1 = c.add_gate(GateType::NOT);
        let not2 = c.add_gate(GateType::NOT);
        let and = c.add_gate(GateType::AND);
        let n1 = c.add_wire();
        let n2 = c.add_wire();
        let out = c.add_wire();
        c.connect(a, None, Some(not1)).unwrap();
        c.connect(a, None, Some(not2)).unwrap();
        c.connect(n1, Some(not1), Some(and)).unwrap();
        c.connect(n2, Some(not2), Some(and)).unwrap();
        c.connect(out, Some(and), None).unwrap();
        c.mark_output(out).unwrap();
        c.mark_output(n1).unwrap();
        c.finalize().unwrap();

        let order = c.topological_order();
        let pos = |g| order.iter().position(|x| *x == g).unwrap();
        assert!(pos(not1) < pos(and));
        assert!(pos(not2) < pos(and));

        assert_eq!(c.evaluate_inputs(&[false]).unwrap(), vec![true, true]);
        assert_eq!(c.evaluate_inputs(&[true]).unwrap(), vec![false, false]);
    }

    #[test]
    fn test_gate_counts() {
        let (c, _, _) = not_circuit();
        let counts = c.gate_counts();
        assert_eq!(counts.get(GateType::NOT), 1);
        assert_eq!(counts.get(GateType::NAND), 0);
        assert_eq!(counts.total(), 1);
        assert_eq!(counts.iter().collect::<Vec<_>>(), vec![(GateType::NOT, 1)]);
    }

    /// in -> NOT -> out, left unfinalized so the links can be tampered with.
    fn tampered(tamper: impl FnOnce(&mut Circuit)) -> (Circuit, Result<()>) {
        let mut c = Circuit::new();
        let input = c.add_wire();
        c.mark_input(input).unwrap();
        let g = c.add_gate(GateType::NOT);
        let output = c.add_wire();
        c.connect(input, None, Some(g)).unwrap();
        c.connect(output, Some(g), None).unwrap();
        c.validate().unwrap();

        tamper(&mut c);
        let res = c.finalize();
        (c, res)
    }

    #[test]
    fn test_finalize_rejects_extra_consumer() {
        let (c, res) = tampered(|c| c.wires[0].push_consumer(GateRef::from(0u32)));
        assert_eq!(
            res,
            Err(ConnectivityError::InputNotMirrored {
                gate: GateRef::from(0u32),
                wire: WireRef::from(0u32),
                expected: 1,
                found: 2,
            }
            .into())
        );
        assert!(!c.is_finalized());
        assert!(c.topological_order().is_empty());
    }

    #[test]
    fn test_finalize_rejects_extra_input_slot() {
        let (c, res) = tampered(|c| c.gates[0].push_input(WireRef::from(0u32)));
        assert_eq!(
            res,
            Err(ConnectivityError::InputNotMirrored {
                gate: GateRef::from(0u32),
                wire: WireRef::from(0u32),
                expected: 2,
                found: 1,
            }
            .into())
        );
        assert!(!c.is_finalized());
    }

    #[test]
    fn test_finalize_rejects_consumer_that_never_reads() {
        let (c, res) = tampered(|c| {
            let stray = c.add_gate(GateType::NOT);
            c.wires[0].push_consumer(stray);
        });
        assert_eq!(
            res,
            Err(ConnectivityError::ConsumerNotMirrored {
                wire: WireRef::from(0u32),
                gate: GateRef::from(1u32),
                expected: 1,
                found: 0,
            }
            .into())
        );
        assert!(!c.is_finalized());
    }

    #[test]
    fn test_finalize_rejects_driver_without_output() {
        let (c, res) = tampered(|c| {
            let stray = c.add_gate(GateType::NOT);
            let w = c.add_wire();
            c.wires[w.index()].set_driver(stray);
        });
        assert_eq!(
            res,
            Err(ConnectivityError::DriverNotMirrored {
                wire: WireRef::from(2u32),
                gate: GateRef::from(1u32),
            }
            .into())
        );
        assert!(!c.is_finalized());
    }

    #[test]
    fn test_finalize_rejects_output_without_driver() {
        let (c, res) = tampered(|c| {
            let stray = c.add_gate(GateType::NOT);
            let w = c.add_wire();
            c.gates[stray.index()].set_output(w);
        });
        assert_eq!(
            res,
            Err(ConnectivityError::OutputNotMirrored {
                gate: GateRef::from(1u32),
                wire: WireRef::from(2u32),
            }
            .into())
        );
        assert!(!c.is_finalized());
    }

    #[test]
    fn test_failed_validation_keeps_previous_order() {
        let (mut c, g, _) = not_circuit();
        c.wires[0].push_consumer(g);
        assert!(matches!(
            c.finalize(),
            Err(Error::Connectivity(ConnectivityError::InputNotMirrored { .. }))
        ));
        assert!(c.is_finalized());
        assert_eq!(c.topological_order(), &[g]);
    }
}
