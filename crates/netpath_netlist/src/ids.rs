//! Opaque ID newtypes for graph vertices and registered data types.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, `Ord` and
//! `Serialize`/`Deserialize`. IDs are handed out by the owning store and
//! stay stable for its lifetime, so callers may cache them. The `Ord`
//! implementation exists so ID sets can be sorted and binary-searched.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the index as a `usize`, for indexing into the owning
            /// store.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a vertex in the netlist graph.
    VertexId
);

define_id!(
    /// Opaque, copyable ID for a data type in the [`DTypeDb`](crate::DTypeDb).
    DTypeId
);
