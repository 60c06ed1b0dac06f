//! Rewriting circuits down to NAND gates.
//!
//! Each non-NAND gate is replaced by a NAND-only subgraph that computes the
//! same function.  The original gate is reused as the final NAND of its
//! expansion, so it keeps its handle and its output wire; helper gates and
//! wires are newly allocated in front of it.
//!
//! | original    | expansion                                               |
//! |-------------|---------------------------------------------------------|
//! | `NOT(a)`    | `NAND(a, a)`                                            |
//! | `BUFFER(a)` | `w = NAND(a, a)`, `NAND(w, w)`                          |
//! | `AND(a..)`  | `w = NAND(a..)`, `NAND(w, w)`                           |
//! | `OR(a..)`   | `wi = NAND(ai, ai)` for each input, `NAND(w..)`         |
//! | `XOR(a, b)` | `w = NAND(a, b)`, `NAND(NAND(a, w), NAND(b, w))`        |
//!
//! XOR over more than two inputs chains the two-input expansion left to
//! right.

use tracing::debug;

use crate::builder::add_gate_over;
use crate::circuit::Circuit;
use crate::coords::{GateRef, WireRef};
use crate::error::{ConnectivityError, Result};
use crate::gate::GateType;

/// Rewrites every gate of the circuit to NAND in place and re-finalizes it.
///
/// Existing gate and wire handles keep referring to the same external
/// signals, and propagation produces the same primary outputs for every
/// input assignment.  If any step fails the circuit is left exactly as it
/// was.
pub fn decompose_to_nand(circuit: &mut Circuit) -> Result<()> {
    let mut next = circuit.clone();

    // Gates added during the pass are already NAND and must not be visited.
    let pending: Vec<GateRef> = next
        .gates()
        .iter()
        .filter(|g| g.ty() != GateType::NAND)
        .map(|g| g.id())
        .collect();

    let before = next.num_gates();
    for g in &pending {
        rewrite_gate(&mut next, *g)?;
    }
    next.finalize()?;

    debug!(
        rewritten = pending.len(),
        gates_before = before,
        gates_after = next.num_gates(),
        "decomposed circuit to NAND"
    );

    *circuit = next;
    Ok(())
}

/// Returns the two wires whose NAND is `a XOR b`.
fn xor_halves(c: &mut Circuit, a: WireRef, b: WireRef) -> Result<[WireRef; 2]> {
    let w = add_gate_over(c, GateType::NAND, &[a, b])?;
    let wa = add_gate_over(c, GateType::NAND, &[a, w])?;
    let wb = add_gate_over(c, GateType::NAND, &[b, w])?;
    Ok([wa, wb])
}

fn rewrite_gate(c: &mut Circuit, g: GateRef) -> Result<()> {
    let gate = c.get_gate(g).ok_or(ConnectivityError::UnknownGate(g))?;
    let ty = gate.ty();
    ty.check_arity(gate.inputs().len())?;

    let inputs = c.detach_inputs(g)?;

    // Inputs of the final NAND, which is the original gate.
    let last: Vec<WireRef> = match ty {
        GateType::NOT => vec![inputs[0], inputs[0]],

        GateType::BUFFER => {
            let w = add_gate_over(c, GateType::NAND, &[inputs[0], inputs[0]])?;
            vec![w, w]
        }

        GateType::AND => {
            let w = add_gate_over(c, GateType::NAND, &inputs)?;
            vec![w, w]
        }

        GateType::OR => inputs
            .iter()
            .map(|x| add_gate_over(c, GateType::NAND, &[*x, *x]))
            .collect::<Result<_>>()?,

        GateType::XOR => {
            let (front, last_input) = inputs.split_at(inputs.len() - 1);
            let mut acc = front[0];
            for x in &front[1..] {
                let halves = xor_halves(c, acc, *x)?;
                acc = add_gate_over(c, GateType::NAND, &halves)?;
            }
            xor_halves(c, acc, last_input[0])?.to_vec()
        }

        GateType::NAND => inputs,
    };

    c.set_gate_type(g, GateType::NAND)?;
    for w in last {
        c.connect(w, None, Some(g))?;
    }

    Ok(())
}
