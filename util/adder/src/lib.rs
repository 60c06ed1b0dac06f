//! N-bit ripple-carry adder harness.
//!
//! Wraps the adder circuit from [`nandgraph_logic::builder`] with operand
//! encoding, so callers deal in integers rather than port indexes.
//!
//! **Inputs**: `A[0..n]` then `B[0..n]`, LSB first.
//!
//! **Outputs**: `Sum[0..n]` LSB first, then the carry-out, which reads back
//! as bit `n` of the result.
//!
//! # Example
//!
//! ```
//! use adder::AdderCircuit;
//!
//! let mut adder = AdderCircuit::generate(8).unwrap();
//! assert_eq!(adder.add(200, 100).unwrap(), 300);
//!
//! adder.decompose().unwrap();
//! assert_eq!(adder.add(200, 100).unwrap(), 300);
//! ```

use nandgraph_logic::{
    Circuit, Error, GateCounts, Result, builder::build_ripple_carry_adder, decompose_to_nand,
    depth::Levels,
};

// These are used by the binary and its tests, not the library.
use anyhow as _;
use clap as _;
use indicatif as _;
use tracing as _;
use tracing_subscriber as _;
#[cfg(test)]
use assert_cmd as _;
#[cfg(test)]
use predicates as _;
#[cfg(test)]
use rand as _;
#[cfg(test)]
use rand_chacha as _;

/// Widest adder whose result still fits a `u64` with the carry.
pub const MAX_BITS: usize = 63;

/// Widest adder [`verify_exhaustive`] accepts.
pub const MAX_VERIFY_BITS: usize = 10;

/// A ripple-carry adder circuit with its width.
#[derive(Clone, Debug)]
pub struct AdderCircuit {
    circuit: Circuit,
    n_bits: usize,
}

impl AdderCircuit {
    /// Builds an `n_bits` wide adder.
    pub fn generate(n_bits: usize) -> Result<Self> {
        if n_bits > MAX_BITS {
            return Err(Error::InvalidArgument(format!(
                "n_bits too large ({n_bits}, max {MAX_BITS})"
            )));
        }

        let circuit = build_ripple_carry_adder(n_bits)?;
        Ok(Self { circuit, n_bits })
    }

    /// Rewrites the adder to NAND gates only.
    pub fn decompose(&mut self) -> Result<()> {
        decompose_to_nand(&mut self.circuit)
    }

    /// Operand width in bits.
    pub fn n_bits(&self) -> usize {
        self.n_bits
    }

    /// The underlying circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Largest value each operand can take.
    pub fn max_operand(&self) -> u64 {
        (1u64 << self.n_bits) - 1
    }

    /// Drives both operands through the circuit and returns `a + b`, read
    /// back from the sum bits and carry.
    pub fn add(&mut self, a: u64, b: u64) -> Result<u64> {
        let max = self.max_operand();
        if a > max || b > max {
            return Err(Error::InvalidArgument(format!(
                "operands {a} and {b} must fit in {} bits",
                self.n_bits
            )));
        }

        let n = self.n_bits;
        let inputs: Vec<bool> = (0..n)
            .map(|i| (a >> i) & 1 == 1)
            .chain((0..n).map(|i| (b >> i) & 1 == 1))
            .collect();

        let outputs = self.circuit.evaluate_inputs(&inputs)?;
        Ok(outputs
            .iter()
            .enumerate()
            .fold(0, |acc, (i, bit)| acc | (u64::from(*bit) << i)))
    }

    /// Collects gate, wire and depth statistics.
    pub fn stats(&self) -> Result<AdderStats> {
        let levels = Levels::compute(&self.circuit)?;
        Ok(AdderStats {
            n_bits: self.n_bits,
            inputs: self.circuit.num_inputs(),
            outputs: self.circuit.num_outputs(),
            wires: self.circuit.num_wires(),
            gates: self.circuit.gate_counts(),
            max_depth: levels.max_depth().unwrap_or(0),
        })
    }
}

/// Summary numbers for an adder circuit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdderStats {
    /// Operand width in bits.
    pub n_bits: usize,
    /// Number of primary inputs, `2 * n_bits`.
    pub inputs: usize,
    /// Number of primary outputs, `n_bits + 1`.
    pub outputs: usize,
    /// Number of wires.
    pub wires: usize,
    /// Gate histogram by type.
    pub gates: GateCounts,
    /// Depth of the deepest gate, the end of the carry chain.
    pub max_depth: usize,
}

/// An operand pair for which the circuits disagreed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// First operand.
    pub a: u64,
    /// Second operand.
    pub b: u64,
    /// Result of the original gate mix.
    pub original: u64,
    /// Result of the NAND-only rewrite.
    pub nand: u64,
}

/// Checks every operand pair of an `n_bits` adder against binary addition,
/// both before and after NAND decomposition.
///
/// `on_progress` is called once per checked value of `a`.  Returns the
/// first disagreement found, if any.
pub fn verify_exhaustive(
    n_bits: usize,
    mut on_progress: impl FnMut(u64),
) -> Result<Option<Mismatch>> {
    if n_bits > MAX_VERIFY_BITS {
        return Err(Error::InvalidArgument(format!(
            "exhaustive check limited to {MAX_VERIFY_BITS} bits, got {n_bits}"
        )));
    }

    let mut original = AdderCircuit::generate(n_bits)?;
    let mut nand = original.clone();
    nand.decompose()?;

    let max = original.max_operand();
    for a in 0..=max {
        for b in 0..=max {
            let want = a + b;
            let got_original = original.add(a, b)?;
            let got_nand = nand.add(a, b)?;
            if got_original != want || got_nand != want {
                return Ok(Some(Mismatch {
                    a,
                    b,
                    original: got_original,
                    nand: got_nand,
                }));
            }
        }
        on_progress(a);
    }

    Ok(None)
}
