//! Relative wire-to-wire connections.

use crate::ids::WireId;
use serde::{Deserialize, Serialize};

const FLAG_PIP: u8 = 1;
const FLAG_ROUTE_THROUGH: u8 = 2;

/// One edge of the routing graph, relative to the tile it leaves from.
///
/// The target tile is stored as a row/column offset so that every tile of
/// the same kind carries an identical adjacency table, which the interning
/// pool then collapses into a single shared copy.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct WireConnection {
    row_offset: i16,
    col_offset: i16,
    wire: WireId,
    flags: u8,
}

impl WireConnection {
    /// Creates a connection with every field explicit.
    pub const fn new(
        row_offset: i16,
        col_offset: i16,
        wire: WireId,
        is_pip: bool,
        is_route_through: bool,
    ) -> Self {
        let mut flags = 0;
        if is_pip {
            flags |= FLAG_PIP;
        }
        if is_route_through {
            flags |= FLAG_ROUTE_THROUGH;
        }
        Self {
            row_offset,
            col_offset,
            wire,
            flags,
        }
    }

    /// A fixed (non-programmable) wire continuing into another tile.
    pub const fn wire(row_offset: i16, col_offset: i16, wire: WireId) -> Self {
        Self::new(row_offset, col_offset, wire, false, false)
    }

    /// A programmable crossbar link inside the same tile.
    pub const fn pip(wire: WireId) -> Self {
        Self::new(0, 0, wire, true, false)
    }

    /// A same-tile link through a site's internal logic.
    pub const fn route_through(wire: WireId) -> Self {
        Self::new(0, 0, wire, true, true)
    }

    /// Row offset of the target tile.
    pub const fn row_offset(&self) -> i16 {
        self.row_offset
    }

    /// Column offset of the target tile.
    pub const fn col_offset(&self) -> i16 {
        self.col_offset
    }

    /// The wire reached in the target tile.
    pub const fn target_wire(&self) -> WireId {
        self.wire
    }

    /// `true` for configurable links.
    pub const fn is_pip(&self) -> bool {
        self.flags & FLAG_PIP != 0
    }

    /// `true` for links through a site's internal logic.
    pub const fn is_route_through(&self) -> bool {
        self.flags & FLAG_ROUTE_THROUGH != 0
    }

    /// `true` when the target tile is the source tile.
    pub const fn is_same_tile(&self) -> bool {
        self.row_offset == 0 && self.col_offset == 0
    }
}
