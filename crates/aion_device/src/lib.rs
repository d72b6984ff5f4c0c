//! Device connectivity model for the Aion routing back end.
//!
//! A device is a grid of tiles. Each tile owns an `Arc` to a [`WireTable`]
//! mapping every wire of the tile to the [`WireConnection`]s leaving it;
//! connection targets are stored as row/column offsets, so all tiles of a
//! kind share one interned table. Wire names are enumerated once per family
//! by a [`WireEnumerator`].
//!
//! The router only sees the device through the [`DeviceModel`] trait.
//!
//! # Usage
//!
//! ```
//! use aion_device::{DeviceBuilder, DeviceModel, TileKind, WireConnection, WireEnumerator};
//!
//! let mut wires = WireEnumerator::new("demo");
//! let a = wires.get_or_intern("A");
//! let b = wires.get_or_intern("B");
//! let mut builder = DeviceBuilder::new("demo-1", 1, 2, wires);
//! let t = builder.add_tile(0, 0, "INT_X0Y0", TileKind::Interconnect).unwrap();
//! builder.add_connection(t, a, WireConnection::pip(b)).unwrap();
//! let device = builder.build().unwrap();
//! assert_eq!(device.wire_connections(t, a).len(), 1);
//! ```

#![warn(missing_docs)]

pub mod connection;
pub mod description;
pub mod device;
pub mod error;
pub mod ids;
pub mod tile;
pub mod wire_enum;
pub mod wire_table;

pub use connection::WireConnection;
pub use description::{load_device, DeviceDescription};
pub use device::{Device, DeviceBuilder, DeviceStats};
pub use error::DeviceError;
pub use ids::{SiteId, TileId, TileWire, WireId};
pub use tile::{PinDirection, Site, SitePin, SitePins, Tile, TileKind, TileSinks, TileSources};
pub use wire_enum::{WireDirection, WireEnumerator};
pub use wire_table::WireTable;

/// Read-only view of a device used by the router.
///
/// All lookups are total: positions outside the grid, unknown tiles, and
/// wires without connections yield `None` or an empty slice.
pub trait DeviceModel: std::fmt::Debug {
    /// Returns the part name (e.g., "xc4vlx15").
    fn part_name(&self) -> &str;

    /// Returns the grid size as `(rows, cols)`.
    fn dimensions(&self) -> (u32, u32);

    /// Returns the tile at a grid position, or `None` outside the grid.
    fn tile_at(&self, row: i64, col: i64) -> Option<TileId>;

    /// Looks up a tile by id.
    fn tile(&self, id: TileId) -> Option<&Tile>;

    /// Returns the connections leaving `wire` in `tile`.
    fn wire_connections(&self, tile: TileId, wire: WireId) -> &[WireConnection];

    /// Resolves a site pin to the tile wire it is attached to.
    fn resolve_site_pin(&self, site: &str, pin: &str) -> Option<TileWire>;

    /// Returns the direction class of a wire.
    fn wire_direction(&self, wire: WireId) -> WireDirection;

    /// Returns the name of a wire, for diagnostics.
    fn wire_name(&self, wire: WireId) -> Option<&str>;

    /// Returns `(row, col)` of a tile.
    fn tile_position(&self, id: TileId) -> Option<(u32, u32)> {
        self.tile(id).map(|t| (t.row, t.col))
    }

    /// Returns the tile wire a connection from `tile` leads to.
    ///
    /// `None` when the offset leaves the grid.
    fn connection_target(&self, tile: TileId, connection: &WireConnection) -> Option<TileWire> {
        let (row, col) = self.tile_position(tile)?;
        let target = self.tile_at(
            i64::from(row) + i64::from(connection.row_offset()),
            i64::from(col) + i64::from(connection.col_offset()),
        )?;
        Some(TileWire::new(target, connection.target_wire()))
    }

    /// Returns `true` if a connection passes through a site's logic.
    fn is_route_through(&self, connection: &WireConnection) -> bool {
        connection.is_route_through()
    }

    /// Manhattan distance between two tiles in grid units.
    fn manhattan(&self, a: TileId, b: TileId) -> u32 {
        match (self.tile_position(a), self.tile_position(b)) {
            (Some((ar, ac)), Some((br, bc))) => ar.abs_diff(br) + ac.abs_diff(bc),
            _ => 0,
        }
    }
}
