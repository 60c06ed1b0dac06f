//! Standard arithmetic circuits composed from the [`Circuit`] primitives.
//!
//! Every builder returns a finalized circuit.

use crate::circuit::Circuit;
use crate::coords::WireRef;
use crate::error::{Error, Result};
use crate::gate::GateType;

/// Adds a gate of type `ty` reading `inputs` in order and returns its fresh
/// output wire.
pub fn add_gate_over(c: &mut Circuit, ty: GateType, inputs: &[WireRef]) -> Result<WireRef> {
    let g = c.add_gate(ty);
    for w in inputs {
        c.connect(*w, None, Some(g))?;
    }
    let out = c.add_wire();
    c.connect(out, Some(g), None)?;
    Ok(out)
}

fn add_inputs(c: &mut Circuit, n: usize) -> Result<Vec<WireRef>> {
    (0..n)
        .map(|_| {
            let w = c.add_wire();
            c.mark_input(w)?;
            Ok(w)
        })
        .collect()
}

/// Half adder stage, returns `(sum, carry)`.
fn half_adder_stage(c: &mut Circuit, a: WireRef, b: WireRef) -> Result<(WireRef, WireRef)> {
    let sum = add_gate_over(c, GateType::XOR, &[a, b])?;
    let carry = add_gate_over(c, GateType::AND, &[a, b])?;
    Ok((sum, carry))
}

/// Full adder stage, returns `(sum, carry_out)`.
///
/// ```text
/// x1   = a XOR b
/// c1   = a AND b
/// sum  = x1 XOR cin
/// c2   = x1 AND cin
/// cout = c1 OR c2
/// ```
fn full_adder_stage(
    c: &mut Circuit,
    a: WireRef,
    b: WireRef,
    cin: WireRef,
) -> Result<(WireRef, WireRef)> {
    let (x1, c1) = half_adder_stage(c, a, b)?;
    let (sum, c2) = half_adder_stage(c, x1, cin)?;
    let cout = add_gate_over(c, GateType::OR, &[c1, c2])?;
    Ok((sum, cout))
}

/// Builds a half adder.
///
/// Inputs are `A`, `B`; outputs are `Sum`, `Carry`.
pub fn build_half_adder() -> Result<Circuit> {
    let mut c = Circuit::new();
    let ins = add_inputs(&mut c, 2)?;

    let (sum, carry) = half_adder_stage(&mut c, ins[0], ins[1])?;
    c.mark_output(sum)?;
    c.mark_output(carry)?;

    c.finalize()?;
    Ok(c)
}

/// Builds a full adder.
///
/// Inputs are `A`, `B`, `Cin`; outputs are `Sum`, `Cout`.
pub fn build_full_adder() -> Result<Circuit> {
    let mut c = Circuit::new();
    let ins = add_inputs(&mut c, 3)?;

    let (sum, cout) = full_adder_stage(&mut c, ins[0], ins[1], ins[2])?;
    c.mark_output(sum)?;
    c.mark_output(cout)?;

    c.finalize()?;
    Ok(c)
}

/// Builds an n-bit ripple-carry adder.
///
/// # Ports
///
/// **Inputs**: `A[0..n]` then `B[0..n]`, LSB first, `2n` in total.
///
/// **Outputs**: `Sum[0..n]` LSB first, then the final carry-out at index `n`.
///
/// Bit 0 is a half adder; every later bit is a full adder taking the
/// previous bit's carry, so the carry chain sets the circuit depth.
pub fn build_ripple_carry_adder(bits: usize) -> Result<Circuit> {
    if bits < 1 {
        return Err(Error::InvalidArgument(
            "ripple-carry adder needs at least 1 bit".to_owned(),
        ));
    }

    let mut c = Circuit::new();
    let a = add_inputs(&mut c, bits)?;
    let b = add_inputs(&mut c, bits)?;

    let mut sums = Vec::with_capacity(bits);
    let (sum0, mut carry) = half_adder_stage(&mut c, a[0], b[0])?;
    sums.push(sum0);

    for i in 1..bits {
        let (sum, cout) = full_adder_stage(&mut c, a[i], b[i], carry)?;
        sums.push(sum);
        carry = cout;
    }

    for s in sums {
        c.mark_output(s)?;
    }
    c.mark_output(carry)?;

    c.finalize()?;
    Ok(c)
}
