//! Gate and wire handles.
//!
//! Handles are stable indexes into a [`Circuit`](crate::Circuit)'s own
//! storage.  Gates and wires are never removed from a circuit, so a handle
//! stays valid for as long as the circuit that issued it.

use std::fmt;

/// Inner typedef that's used for raw arena indexes.
pub type RawIdx = u32;

/// Handle to a gate within a circuit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GateRef(RawIdx);

/// Handle to a wire within a circuit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WireRef(RawIdx);

macro_rules! impl_handle {
    ($ty:ident, $prefix:literal) => {
        impl $ty {
            /// Returns the handle as an index into the owning circuit's storage.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<RawIdx> for $ty {
            fn from(value: RawIdx) -> Self {
                Self(value)
            }
        }

        impl From<$ty> for RawIdx {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl From<usize> for $ty {
            fn from(value: usize) -> Self {
                Self(value as RawIdx)
            }
        }

        impl From<$ty> for usize {
            fn from(value: $ty) -> Self {
                value.0 as usize
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

impl_handle!(GateRef, "g");
impl_handle!(WireRef, "w");

/// Which primary port list an index refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Port {
    /// The ordered primary input list.
    Input,
    /// The ordered primary output list.
    Output,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Input => f.write_str("input"),
            Port::Output => f.write_str("output"),
        }
    }
}
