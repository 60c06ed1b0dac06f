//! Error types for circuit construction and evaluation.

use thiserror::Error;

use crate::coords::{GateRef, Port, WireRef};
use crate::gate::GateType;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the logic engine.
///
/// A call that returns an error leaves the circuit as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A gate was evaluated with the wrong number of inputs for its type.
    #[error("{ty} gate cannot take {got} input(s)")]
    InvalidArity {
        /// Type of the offending gate.
        ty: GateType,
        /// Number of inputs it was given.
        got: usize,
    },

    /// A gate type name did not match any known type.
    #[error("unknown gate type {0:?}")]
    UnknownGateType(String),

    /// A caller-supplied argument was outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A primary input or output index was past the end of its list.
    #[error("{port} index {index} out of range (have {len})")]
    IndexOutOfRange {
        /// Which port list was indexed.
        port: Port,
        /// The requested index.
        index: usize,
        /// The length of the list.
        len: usize,
    },

    /// A gate/wire link was rejected or found inconsistent.
    #[error("connectivity: {0}")]
    Connectivity(#[from] ConnectivityError),

    /// Topological sort could not order every gate.
    #[error("circuit contains a cycle ({ordered} of {total} gates ordered, {stuck} is on or behind it)")]
    CycleDetected {
        /// Number of gates that made it into the order.
        ordered: usize,
        /// Total number of gates.
        total: usize,
        /// First gate that could not be ordered.
        stuck: GateRef,
    },

    /// [`Circuit::propagate`](crate::Circuit::propagate) was called on a
    /// circuit that has not been (re-)finalized.
    #[error("circuit must be finalized before propagation")]
    NotFinalized,
}

/// Specific link faults behind [`Error::Connectivity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectivityError {
    /// The handle does not belong to this circuit.
    #[error("no gate {0} in this circuit")]
    UnknownGate(GateRef),

    /// The handle does not belong to this circuit.
    #[error("no wire {0} in this circuit")]
    UnknownWire(WireRef),

    /// The wire is already driven by another gate.
    #[error("wire {wire} is already driven by {driver}")]
    WireAlreadyDriven {
        /// The wire being connected.
        wire: WireRef,
        /// Its existing driver.
        driver: GateRef,
    },

    /// The gate already drives another wire.
    #[error("gate {gate} already drives {output}")]
    GateAlreadyDrives {
        /// The gate being connected.
        gate: GateRef,
        /// Its existing output wire.
        output: WireRef,
    },

    /// A gate lists a wire among its inputs more often than the wire lists
    /// the gate among its consumers.
    #[error("gate {gate} reads {wire} {expected} time(s) but the wire records {found}")]
    InputNotMirrored {
        /// The reading gate.
        gate: GateRef,
        /// The wire it reads.
        wire: WireRef,
        /// Occurrences in the gate's input slots.
        expected: usize,
        /// Occurrences in the wire's consumers.
        found: usize,
    },

    /// A wire lists a consumer more often than that gate reads the wire.
    #[error("wire {wire} lists {gate} {expected} time(s) but the gate reads it {found}")]
    ConsumerNotMirrored {
        /// The wire.
        wire: WireRef,
        /// The consumer gate.
        gate: GateRef,
        /// Occurrences in the wire's consumers.
        expected: usize,
        /// Occurrences in the gate's input slots.
        found: usize,
    },

    /// A gate's output wire does not name the gate as its driver.
    #[error("gate {gate} outputs to {wire} but the wire is not driven by it")]
    OutputNotMirrored {
        /// The gate.
        gate: GateRef,
        /// Its recorded output wire.
        wire: WireRef,
    },

    /// A wire's driver does not name the wire as its output.
    #[error("wire {wire} is driven by {gate} but the gate does not output to it")]
    DriverNotMirrored {
        /// The wire.
        wire: WireRef,
        /// Its recorded driver.
        gate: GateRef,
    },
}
