//! Combinational logic graph engine.
//!
//! A [`Circuit`] is an arena of [`Gate`]s and [`Wire`]s forming a DAG.  It
//! is evaluated in topological order, can be composed into adders with the
//! [`builder`] functions, and can be rewritten to a NAND-only circuit with
//! [`decompose_to_nand`] without changing its behaviour.
//!
//! ```
//! use nandgraph_logic::{builder::build_ripple_carry_adder, decompose_to_nand};
//!
//! let mut adder = build_ripple_carry_adder(2).unwrap();
//! decompose_to_nand(&mut adder).unwrap();
//!
//! // 3 + 1: A = [1, 1], B = [1, 0]
//! let out = adder.evaluate_inputs(&[true, true, true, false]).unwrap();
//! assert_eq!(out, vec![false, false, true]);
//! ```

// Used by the benches and integration tests.
#[cfg(test)]
use criterion as _;
#[cfg(test)]
use rand as _;
#[cfg(test)]
use rand_chacha as _;

pub mod builder;
mod circuit;
mod coords;
pub mod depth;
mod error;
mod gate;
mod nand;
mod wire;

pub use circuit::{Circuit, GateCounts, Propagation};
pub use coords::{GateRef, Port, RawIdx, WireRef};
pub use error::{ConnectivityError, Error, Result};
pub use gate::{Gate, GateType, evaluate};
pub use nand::decompose_to_nand;
pub use wire::Wire;
