//! Gate concepts

use std::fmt;
use std::str::FromStr;

use crate::coords::{GateRef, WireRef};
use crate::error::{Error, Result};

/// Boolean function computed by a gate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GateType {
    /// Not-and; the universal gate.
    NAND,
    /// True if every input is true.
    AND,
    /// True if any input is true.
    OR,
    /// True if an odd number of inputs are true.
    XOR,
    /// Inverts its single input.
    NOT,
    /// Copies its single input.
    BUFFER,
}

impl GateType {
    /// Every gate type, in declaration order.
    pub const ALL: [GateType; 6] = [
        GateType::NAND,
        GateType::AND,
        GateType::OR,
        GateType::XOR,
        GateType::NOT,
        GateType::BUFFER,
    ];

    /// Returns the upper-case name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            GateType::NAND => "NAND",
            GateType::AND => "AND",
            GateType::OR => "OR",
            GateType::XOR => "XOR",
            GateType::NOT => "NOT",
            GateType::BUFFER => "BUFFER",
        }
    }

    /// Returns true for the single-input types.
    pub const fn is_unary(self) -> bool {
        matches!(self, GateType::NOT | GateType::BUFFER)
    }

    /// Checks whether a gate of this type accepts `n` inputs.
    pub const fn accepts_arity(self, n: usize) -> bool {
        if self.is_unary() { n == 1 } else { n >= 2 }
    }

    /// Errors with [`Error::InvalidArity`] if the type does not accept `n`
    /// inputs.
    pub fn check_arity(self, n: usize) -> Result<()> {
        if self.accepts_arity(n) {
            Ok(())
        } else {
            Err(Error::InvalidArity { ty: self, got: n })
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GateType::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownGateType(s.to_owned()))
    }
}

/// Evaluates a gate function over its inputs, in slot order.
///
/// AND, NAND, OR and XOR are N-ary (at least two inputs); XOR is the parity
/// of all inputs.  NOT and BUFFER take exactly one input.
pub fn evaluate(ty: GateType, inputs: &[bool]) -> Result<bool> {
    ty.check_arity(inputs.len())?;

    let out = match ty {
        GateType::NOT => !inputs[0],
        GateType::BUFFER => inputs[0],
        GateType::AND => inputs.iter().all(|v| *v),
        GateType::NAND => !inputs.iter().all(|v| *v),
        GateType::OR => inputs.iter().any(|v| *v),
        GateType::XOR => inputs.iter().fold(false, |acc, v| acc ^ v),
    };

    Ok(out)
}

/// A gate record owned by a [`Circuit`](crate::Circuit).
///
/// The same wire may occupy several input slots.
#[derive(Clone, Debug)]
pub struct Gate {
    id: GateRef,
    ty: GateType,
    inputs: Vec<WireRef>,
    output: Option<WireRef>,
    state: bool,
    dirty: bool,
}

impl Gate {
    pub(crate) fn new(id: GateRef, ty: GateType) -> Self {
        Self {
            id,
            ty,
            inputs: Vec::new(),
            output: None,
            state: false,
            dirty: true,
        }
    }

    /// Handle of this gate in its circuit.
    pub fn id(&self) -> GateRef {
        self.id
    }

    /// Boolean function the gate computes.
    pub fn ty(&self) -> GateType {
        self.ty
    }

    /// Input wires in slot order.
    pub fn inputs(&self) -> &[WireRef] {
        &self.inputs
    }

    /// Wire this gate drives, if connected.
    pub fn output(&self) -> Option<WireRef> {
        self.output
    }

    /// Output computed by the last propagation.
    pub fn state(&self) -> bool {
        self.state
    }

    /// Set until the gate has been evaluated at least once since it was
    /// created or rewired.  Informational only.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn set_type(&mut self, ty: GateType) {
        self.ty = ty;
        self.dirty = true;
    }

    pub(crate) fn set_output(&mut self, wire: WireRef) {
        self.output = Some(wire);
    }

    pub(crate) fn push_input(&mut self, wire: WireRef) {
        self.inputs.push(wire);
        self.dirty = true;
    }

    pub(crate) fn take_inputs(&mut self) -> Vec<WireRef> {
        self.dirty = true;
        std::mem::take(&mut self.inputs)
    }

    /// Stores a freshly evaluated output, returning whether it changed.
    pub(crate) fn store_state(&mut self, state: bool) -> bool {
        let changed = self.state != state;
        self.state = state;
        self.dirty = false;
        changed
    }
}
