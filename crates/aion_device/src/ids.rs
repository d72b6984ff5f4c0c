//! Opaque ID newtypes for device entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, `Ord`, and
//! `Serialize`/`Deserialize`. [`TileWire`] pairs a tile with a wire and is
//! the coordinate the router searches over.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub const fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub const fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Dense id of a wire segment class, unique within a device family.
    ///
    /// Id 0 is a valid wire.
    WireId
);

define_id!(
    /// Row-major index of a tile in the device grid.
    TileId
);

define_id!(
    /// Index of a primitive site in the device.
    SiteId
);

// SAFETY: `WireId` wraps a `u32`, which always fits in `usize` on the 32- and
// 64-bit targets we build for; `try_from_usize` rejects anything wider.
unsafe impl lasso::Key for WireId {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(WireId)
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A concrete wire instance: one wire class inside one tile.
///
/// Equality and hashing cover both fields; this is the vertex identity of the
/// routing graph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct TileWire {
    /// The tile holding the wire.
    pub tile: TileId,
    /// The wire class.
    pub wire: WireId,
}

impl TileWire {
    /// Creates a tile/wire coordinate.
    pub const fn new(tile: TileId, wire: WireId) -> Self {
        Self { tile, wire }
    }
}

impl fmt::Display for TileWire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tile, self.wire)
    }
}
