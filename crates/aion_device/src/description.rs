//! JSON device descriptions.
//!
//! A description lists the wire names of the family, the tile kinds (each
//! with its relative connections and site templates) and the placement of
//! every tile in the grid:
//!
//! ```json
//! {
//!   "part": "demo-1", "rows": 1, "cols": 2,
//!   "wires": [{"name": "A"}, {"name": "GCLK0", "direction": "clock"}],
//!   "tile_kinds": {
//!     "INT": {
//!       "kind": "interconnect",
//!       "connections": [{"from": "A", "to": "A", "col_offset": 1}],
//!       "sites": [{"kind": "SLICEL", "pins": {"AQ": {"wire": "A", "direction": "output"}}}]
//!     }
//!   },
//!   "tiles": [{"name": "INT_X0Y0", "row": 0, "col": 0, "kind": "INT", "site_names": ["SLICE_X0Y0"]}]
//! }
//! ```
//!
//! Grid positions not listed become empty tiles.

use crate::connection::WireConnection;
use crate::device::{Device, DeviceBuilder};
use crate::error::DeviceError;
use crate::ids::WireId;
use crate::tile::{PinDirection, SitePin, SitePins, TileKind};
use crate::wire_enum::{WireDirection, WireEnumerator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level device description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDescription {
    /// Part name.
    pub part: String,
    /// Device family; defaults to the part name.
    #[serde(default)]
    pub family: Option<String>,
    /// Grid rows.
    pub rows: u32,
    /// Grid columns.
    pub cols: u32,
    /// Every wire name of the family, in enumeration order.
    pub wires: Vec<WireDescription>,
    /// Tile kinds by name.
    #[serde(default)]
    pub tile_kinds: BTreeMap<String, TileKindDescription>,
    /// Tile placements.
    #[serde(default)]
    pub tiles: Vec<TilePlacement>,
}

/// A declared wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDescription {
    /// Wire name.
    pub name: String,
    /// Explicit direction; classified from the name when absent.
    #[serde(default)]
    pub direction: Option<WireDirection>,
}

/// Template shared by all tiles of one kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileKindDescription {
    /// Functional kind.
    pub kind: TileKind,
    /// Connections leaving wires of this tile kind.
    #[serde(default)]
    pub connections: Vec<ConnectionDescription>,
    /// Site templates, instantiated in order for each placed tile.
    #[serde(default)]
    pub sites: Vec<SiteTemplate>,
}

/// A connection by wire name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDescription {
    /// Source wire in this tile.
    pub from: String,
    /// Target wire in the target tile.
    pub to: String,
    /// Target row offset.
    #[serde(default)]
    pub row_offset: i16,
    /// Target column offset.
    #[serde(default)]
    pub col_offset: i16,
    /// Configurable link.
    #[serde(default)]
    pub pip: bool,
    /// Passes through site logic.
    #[serde(default)]
    pub route_through: bool,
}

/// A site template of a tile kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteTemplate {
    /// Site kind, e.g. `SLICEL`.
    pub kind: String,
    /// Pins by name.
    #[serde(default)]
    pub pins: BTreeMap<String, PinDescription>,
}

/// A site pin by wire name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinDescription {
    /// Tile wire the pin attaches to.
    pub wire: String,
    /// Pin direction.
    pub direction: PinDirection,
}

/// One placed tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilePlacement {
    /// Tile name.
    pub name: String,
    /// Grid row.
    pub row: u32,
    /// Grid column.
    pub col: u32,
    /// Name of the tile kind.
    pub kind: String,
    /// Names for the kind's site templates, in template order.
    #[serde(default)]
    pub site_names: Vec<String>,
}

/// Parses a JSON device description and builds the device.
pub fn load_device(json: &str) -> Result<Device, DeviceError> {
    let description: DeviceDescription =
        serde_json::from_str(json).map_err(|e| DeviceError::Parse(e.to_string()))?;
    description.build()
}

struct ResolvedKind {
    kind: TileKind,
    connections: BTreeMap<WireId, Vec<WireConnection>>,
    sites: Vec<(String, SitePins)>,
}

impl DeviceDescription {
    /// Builds a [`Device`] from this description.
    pub fn build(&self) -> Result<Device, DeviceError> {
        let family = self.family.as_deref().unwrap_or(&self.part);
        let mut wires = WireEnumerator::new(family);
        for wire in &self.wires {
            wires.define(&wire.name, wire.direction);
        }

        let lookup = |name: &str| -> Result<WireId, DeviceError> {
            wires
                .wire(name)
                .ok_or_else(|| DeviceError::UnknownWire(name.to_string()))
        };

        let mut kinds = BTreeMap::new();
        for (name, desc) in &self.tile_kinds {
            let mut connections: BTreeMap<WireId, Vec<WireConnection>> = BTreeMap::new();
            for c in &desc.connections {
                connections.entry(lookup(&c.from)?).or_default().push(WireConnection::new(
                    c.row_offset,
                    c.col_offset,
                    lookup(&c.to)?,
                    c.pip,
                    c.route_through,
                ));
            }
            let mut sites = Vec::with_capacity(desc.sites.len());
            for template in &desc.sites {
                let mut pins = SitePins::new();
                for (pin, p) in &template.pins {
                    pins.insert(
                        pin.clone(),
                        SitePin {
                            wire: lookup(&p.wire)?,
                            direction: p.direction,
                        },
                    );
                }
                sites.push((template.kind.clone(), pins));
            }
            kinds.insert(
                name.as_str(),
                ResolvedKind {
                    kind: desc.kind,
                    connections,
                    sites,
                },
            );
        }

        let mut builder = DeviceBuilder::new(self.part.clone(), self.rows, self.cols, wires);
        for placement in &self.tiles {
            let kind = kinds
                .get(placement.kind.as_str())
                .ok_or_else(|| DeviceError::UnknownTileKind(placement.kind.clone()))?;
            if placement.site_names.len() != kind.sites.len() {
                return Err(DeviceError::SiteCountMismatch {
                    tile: placement.name.clone(),
                    given: placement.site_names.len(),
                    expected: kind.sites.len(),
                });
            }
            let tile =
                builder.add_tile(placement.row, placement.col, placement.name.clone(), kind.kind)?;
            for (wire, connections) in &kind.connections {
                builder.set_connections(tile, *wire, connections.clone())?;
            }
            for (site_name, (site_kind, pins)) in placement.site_names.iter().zip(&kind.sites) {
                builder.add_site(tile, site_name.clone(), site_kind.clone(), pins.clone())?;
            }
        }
        builder.build()
    }
}
