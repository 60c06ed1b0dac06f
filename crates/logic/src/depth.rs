//! Topological depth of gates.
//!
//! A gate reading only primary inputs sits at depth 0; every other gate sits
//! one past the deepest gate driving one of its inputs.  Gates at the same
//! depth don't depend on each other, so a level can be shown or evaluated
//! together.

use crate::circuit::Circuit;
use crate::coords::GateRef;
use crate::error::{Error, Result};

/// Per-gate depths and the gates grouped by depth.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Levels {
    /// Depth of each gate, indexed by [`GateRef`].
    depths: Vec<usize>,

    /// Gates at each depth, in topological order within the level.
    levels: Vec<Vec<GateRef>>,
}

impl Levels {
    /// Computes depths over a finalized circuit's topological order.
    pub fn compute(circuit: &Circuit) -> Result<Self> {
        if !circuit.is_finalized() {
            return Err(Error::NotFinalized);
        }

        let gates = circuit.gates();
        let wires = circuit.wires();
        let mut depths = vec![0; gates.len()];
        let mut levels: Vec<Vec<GateRef>> = Vec::new();

        // Drivers always come earlier in the order, so their depth is final.
        for &g in circuit.topological_order() {
            let depth = gates[g.index()]
                .inputs()
                .iter()
                .filter_map(|w| wires[w.index()].driver())
                .map(|d| depths[d.index()] + 1)
                .max()
                .unwrap_or(0);

            depths[g.index()] = depth;
            if levels.len() <= depth {
                levels.resize_with(depth + 1, Vec::new);
            }
            levels[depth].push(g);
        }

        Ok(Self { depths, levels })
    }

    /// Depth of a gate, if it belongs to the circuit.
    pub fn depth(&self, g: GateRef) -> Option<usize> {
        self.depths.get(g.index()).copied()
    }

    /// Depth of the deepest gate, `None` for a circuit without gates.
    pub fn max_depth(&self) -> Option<usize> {
        self.levels.len().checked_sub(1)
    }

    /// Gates grouped by depth.
    pub fn levels(&self) -> &[Vec<GateRef>] {
        &self.levels
    }

    /// Number of distinct depths.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }
}
