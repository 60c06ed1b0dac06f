//! Wire concepts

use crate::coords::{GateRef, WireRef};

/// A signal carrier owned by a [`Circuit`](crate::Circuit).
///
/// A wire without a driver is a primary input whose value is set from
/// outside.  Consumers form a multiset: a gate that reads the wire on two
/// input slots appears twice.
#[derive(Clone, Debug)]
pub struct Wire {
    id: WireRef,
    value: bool,
    previous: bool,
    driver: Option<GateRef>,
    consumers: Vec<GateRef>,
}

impl Wire {
    pub(crate) fn new(id: WireRef) -> Self {
        Self {
            id,
            value: false,
            previous: false,
            driver: None,
            consumers: Vec::new(),
        }
    }

    /// Handle of this wire in its circuit.
    pub fn id(&self) -> WireRef {
        self.id
    }

    /// Current value.
    pub fn value(&self) -> bool {
        self.value
    }

    /// Value before the last write.
    pub fn previous_value(&self) -> bool {
        self.previous
    }

    /// True if the last write changed the value.
    pub fn value_changed(&self) -> bool {
        self.value != self.previous
    }

    /// Gate driving this wire, `None` for a primary input.
    pub fn driver(&self) -> Option<GateRef> {
        self.driver
    }

    /// Gates reading this wire, one entry per input slot.
    pub fn consumers(&self) -> &[GateRef] {
        &self.consumers
    }

    /// Returns true if no gate drives this wire.
    pub fn is_primary(&self) -> bool {
        self.driver.is_none()
    }

    pub(crate) fn set_value(&mut self, value: bool) {
        self.previous = self.value;
        self.value = value;
    }

    pub(crate) fn set_driver(&mut self, gate: GateRef) {
        self.driver = Some(gate);
    }

    pub(crate) fn push_consumer(&mut self, gate: GateRef) {
        self.consumers.push(gate);
    }

    /// Removes a single occurrence of `gate`, returning whether one was found.
    pub(crate) fn remove_consumer(&mut self, gate: GateRef) -> bool {
        match self.consumers.iter().position(|g| *g == gate) {
            Some(pos) => {
                self.consumers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Number of times `gate` appears among the consumers.
    pub(crate) fn consumer_count(&self, gate: GateRef) -> usize {
        self.consumers.iter().filter(|g| **g == gate).count()
    }
}
