//! Tiles, sites and the per-tile descriptors shared through interning.
//!
//! A [`Tile`] holds `Arc`s to its wire table and its source/sink descriptors.
//! Tiles of the same kind end up pointing at the same interned instances, so
//! the memory cost of a device grows with the number of distinct tile kinds
//! rather than with the number of tiles.

use crate::ids::{SiteId, TileId, WireId};
use crate::wire_table::WireTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The functional kind of a tile in the device grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    /// A switch box carrying general routing.
    Interconnect,
    /// A tile containing configurable logic blocks.
    Logic,
    /// A tile containing block RAM resources.
    Bram,
    /// A tile containing DSP blocks.
    Dsp,
    /// A tile providing I/O pad connections.
    Io,
    /// A tile containing clock buffers or clock distribution.
    Clock,
    /// A tile with no programmable resources.
    Empty,
}

/// One cell of the device grid.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Row-major index of this tile.
    pub id: TileId,
    /// Row in the device grid.
    pub row: u32,
    /// Column in the device grid.
    pub col: u32,
    /// Tile name, e.g. `INT_X3Y7`.
    pub name: String,
    /// Functional kind.
    pub kind: TileKind,
    /// Connections leaving each wire of this tile.
    pub wires: Arc<WireTable>,
    /// Wires driven by site output pins in this tile.
    pub sources: Arc<TileSources>,
    /// Wires feeding site input pins in this tile.
    pub sinks: Arc<TileSinks>,
    /// Sites placed in this tile.
    pub sites: Vec<SiteId>,
}

/// Direction of a site pin relative to the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    /// Signal enters the site.
    Input,
    /// Signal leaves the site.
    Output,
}

/// A site pin bound to a wire of the enclosing tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SitePin {
    /// The tile wire the pin attaches to.
    pub wire: WireId,
    /// Pin direction.
    pub direction: PinDirection,
}

/// Pin name to wire map of a site, shared between sites of the same kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SitePins(BTreeMap<String, SitePin>);

impl SitePins {
    /// Creates an empty pin map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a pin.
    pub fn insert(&mut self, name: impl Into<String>, pin: SitePin) {
        self.0.insert(name.into(), pin);
    }

    /// Looks up a pin by name.
    pub fn get(&self, name: &str) -> Option<&SitePin> {
        self.0.get(name)
    }

    /// Iterates pins in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SitePin)> {
        self.0.iter().map(|(name, pin)| (name.as_str(), pin))
    }

    /// Number of pins.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the site has no pins.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn wires_with(&self, direction: PinDirection) -> Vec<WireId> {
        self.0
            .values()
            .filter(|pin| pin.direction == direction)
            .map(|pin| pin.wire)
            .collect()
    }
}

impl FromIterator<(String, SitePin)> for SitePins {
    fn from_iter<I: IntoIterator<Item = (String, SitePin)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A primitive placement location within a tile.
#[derive(Debug, Clone)]
pub struct Site {
    /// Index of this site in the device.
    pub id: SiteId,
    /// Site name, e.g. `SLICE_X4Y12`.
    pub name: String,
    /// Site kind, e.g. `SLICEL` or `BUFGCTRL`.
    pub kind: String,
    /// The tile containing this site.
    pub tile: TileId,
    /// Pin map, interned.
    pub pins: Arc<SitePins>,
}

macro_rules! wire_set {
    ($(#[$meta:meta])* $name:ident, $direction:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name(Vec<WireId>);

        impl $name {
            /// Collects the matching pin wires of every site in a tile.
            pub fn from_sites<'a>(pins: impl IntoIterator<Item = &'a SitePins>) -> Self {
                let mut wires: Vec<WireId> = pins
                    .into_iter()
                    .flat_map(|p| p.wires_with($direction))
                    .collect();
                wires.sort_unstable();
                wires.dedup();
                Self(wires)
            }

            /// Returns `true` if `wire` is in the set.
            pub fn contains(&self, wire: WireId) -> bool {
                self.0.binary_search(&wire).is_ok()
            }

            /// The wires, sorted.
            pub fn wires(&self) -> &[WireId] {
                &self.0
            }

            /// Number of wires.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Returns `true` if the set is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }
    };
}

wire_set!(
    /// Wires of a tile driven by site outputs.
    TileSources,
    PinDirection::Output
);

wire_set!(
    /// Wires of a tile that feed site inputs.
    TileSinks,
    PinDirection::Input
);
