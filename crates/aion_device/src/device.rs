//! The built device model and its builder.

use crate::connection::WireConnection;
use crate::error::DeviceError;
use crate::ids::{SiteId, TileId, TileWire, WireId};
use crate::tile::{Site, SitePins, Tile, TileKind, TileSinks, TileSources};
use crate::wire_enum::{WireDirection, WireEnumerator};
use crate::wire_table::WireTable;
use crate::DeviceModel;
use aion_common::InternPool;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Sharing statistics gathered while building a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Number of tiles in the grid.
    pub tiles: usize,
    /// Number of distinct wire tables after interning.
    pub unique_tables: usize,
    /// Number of distinct connection arrays after interning.
    pub unique_connection_arrays: usize,
    /// Number of distinct tile source descriptors.
    pub unique_sources: usize,
    /// Number of distinct tile sink descriptors.
    pub unique_sinks: usize,
    /// Number of distinct site pin maps.
    pub unique_site_pins: usize,
    /// Connections summed over every tile, before sharing.
    pub total_connections: usize,
}

impl fmt::Display for DeviceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tiles, {} unique wire tables, {} unique connection arrays, \
             {} connections",
            self.tiles, self.unique_tables, self.unique_connection_arrays, self.total_connections
        )
    }
}

/// A fully built, immutable device.
///
/// Tiles are stored row-major, so a tile's id is `row * cols + col`. All
/// per-tile data is `Arc`-shared and the device is `Send + Sync`.
#[derive(Debug)]
pub struct Device {
    part: String,
    rows: u32,
    cols: u32,
    wires: Arc<WireEnumerator>,
    tiles: Vec<Tile>,
    sites: Vec<Site>,
    site_by_name: HashMap<String, SiteId>,
    tile_by_name: HashMap<String, TileId>,
    stats: DeviceStats,
}

impl Device {
    /// Returns the wire enumerator of the device family.
    pub fn wires(&self) -> &Arc<WireEnumerator> {
        &self.wires
    }

    /// Returns all tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Returns all sites in id order.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Looks up a site by id.
    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(id.as_raw() as usize)
    }

    /// Looks up a site by name.
    pub fn site_by_name(&self, name: &str) -> Option<&Site> {
        self.site_by_name.get(name).and_then(|&id| self.site(id))
    }

    /// Looks up a tile by name.
    pub fn tile_by_name(&self, name: &str) -> Option<&Tile> {
        self.tile_by_name.get(name).and_then(|&id| self.tile(id))
    }

    /// Returns the sharing statistics computed at build time.
    pub fn stats(&self) -> DeviceStats {
        self.stats
    }
}

impl DeviceModel for Device {
    fn part_name(&self) -> &str {
        &self.part
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    fn tile_at(&self, row: i64, col: i64) -> Option<TileId> {
        if row < 0 || col < 0 || row >= i64::from(self.rows) || col >= i64::from(self.cols) {
            return None;
        }
        Some(TileId::from_raw((row * i64::from(self.cols) + col) as u32))
    }

    fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.as_raw() as usize)
    }

    fn wire_connections(&self, tile: TileId, wire: WireId) -> &[WireConnection] {
        self.tile(tile)
            .and_then(|t| t.wires.get(wire))
            .unwrap_or(&[])
    }

    fn resolve_site_pin(&self, site: &str, pin: &str) -> Option<TileWire> {
        let site = self.site_by_name(site)?;
        let pin = site.pins.get(pin)?;
        Some(TileWire::new(site.tile, pin.wire))
    }

    fn wire_direction(&self, wire: WireId) -> WireDirection {
        self.wires.direction(wire)
    }

    fn wire_name(&self, wire: WireId) -> Option<&str> {
        self.wires.name_of(wire)
    }
}

#[derive(Debug)]
struct StagedTile {
    name: String,
    kind: TileKind,
    connections: BTreeMap<WireId, Vec<WireConnection>>,
    sites: Vec<SiteId>,
}

#[derive(Debug)]
struct StagedSite {
    name: String,
    kind: String,
    tile: TileId,
    pins: SitePins,
}

/// Incrementally assembles a [`Device`].
///
/// Tiles and sites are staged in plain collections; [`build`](Self::build)
/// fills empty grid positions, builds one [`WireTable`] per tile and interns
/// every table, connection array, descriptor and pin map so that identical
/// data is stored once.
#[derive(Debug)]
pub struct DeviceBuilder {
    part: String,
    rows: u32,
    cols: u32,
    wires: WireEnumerator,
    tiles: Vec<Option<StagedTile>>,
    sites: Vec<StagedSite>,
    site_by_name: HashMap<String, SiteId>,
}

impl DeviceBuilder {
    /// Starts a device of `rows` x `cols` tiles.
    pub fn new(part: impl Into<String>, rows: u32, cols: u32, wires: WireEnumerator) -> Self {
        let cells = rows as usize * cols as usize;
        let mut tiles = Vec::with_capacity(cells);
        tiles.resize_with(cells, || None);
        Self {
            part: part.into(),
            rows,
            cols,
            wires,
            tiles,
            sites: Vec::new(),
            site_by_name: HashMap::new(),
        }
    }

    /// Gives mutable access to the wire enumerator for defining wires.
    pub fn wires_mut(&mut self) -> &mut WireEnumerator {
        &mut self.wires
    }

    /// Places a tile at `(row, col)`.
    pub fn add_tile(
        &mut self,
        row: u32,
        col: u32,
        name: impl Into<String>,
        kind: TileKind,
    ) -> Result<TileId, DeviceError> {
        if row >= self.rows || col >= self.cols {
            return Err(DeviceError::TileOutOfGrid {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let index = row as usize * self.cols as usize + col as usize;
        if self.tiles[index].is_some() {
            return Err(DeviceError::DuplicateTile { row, col });
        }
        self.tiles[index] = Some(StagedTile {
            name: name.into(),
            kind,
            connections: BTreeMap::new(),
            sites: Vec::new(),
        });
        Ok(TileId::from_raw(index as u32))
    }

    fn staged_mut(&mut self, tile: TileId) -> Result<&mut StagedTile, DeviceError> {
        self.tiles
            .get_mut(tile.as_raw() as usize)
            .and_then(Option::as_mut)
            .ok_or(DeviceError::UnknownTile(tile))
    }

    /// Appends a connection leaving `from` in `tile`.
    pub fn add_connection(
        &mut self,
        tile: TileId,
        from: WireId,
        connection: WireConnection,
    ) -> Result<(), DeviceError> {
        self.staged_mut(tile)?
            .connections
            .entry(from)
            .or_default()
            .push(connection);
        Ok(())
    }

    /// Replaces every connection leaving `from` in `tile`.
    pub fn set_connections(
        &mut self,
        tile: TileId,
        from: WireId,
        connections: Vec<WireConnection>,
    ) -> Result<(), DeviceError> {
        self.staged_mut(tile)?.connections.insert(from, connections);
        Ok(())
    }

    /// Adds a site to `tile`.
    pub fn add_site(
        &mut self,
        tile: TileId,
        name: impl Into<String>,
        kind: impl Into<String>,
        pins: SitePins,
    ) -> Result<SiteId, DeviceError> {
        let name = name.into();
        if self.site_by_name.contains_key(&name) {
            return Err(DeviceError::DuplicateSite(name));
        }
        let id = SiteId::from_raw(self.sites.len() as u32);
        self.staged_mut(tile)?.sites.push(id);
        self.site_by_name.insert(name.clone(), id);
        self.sites.push(StagedSite {
            name,
            kind: kind.into(),
            tile,
            pins,
        });
        Ok(id)
    }

    /// Interns all staged data and produces the device.
    pub fn build(self) -> Result<Device, DeviceError> {
        let mut tables: InternPool<WireTable> = InternPool::new();
        let mut arrays: InternPool<[WireConnection]> = InternPool::new();
        let mut sources: InternPool<TileSources> = InternPool::new();
        let mut sinks: InternPool<TileSinks> = InternPool::new();
        let mut site_pins: InternPool<SitePins> = InternPool::new();

        let sites: Vec<Site> = self
            .sites
            .into_iter()
            .enumerate()
            .map(|(index, staged)| Site {
                id: SiteId::from_raw(index as u32),
                name: staged.name,
                kind: staged.kind,
                tile: staged.tile,
                pins: site_pins.intern(staged.pins),
            })
            .collect();

        let mut tiles = Vec::with_capacity(self.tiles.len());
        let mut tile_by_name = HashMap::with_capacity(self.tiles.len());
        let mut total_connections = 0;
        for (index, staged) in self.tiles.into_iter().enumerate() {
            let row = index as u32 / self.cols;
            let col = index as u32 % self.cols;
            let staged = staged.unwrap_or_else(|| StagedTile {
                name: format!("NULL_X{col}Y{row}"),
                kind: TileKind::Empty,
                connections: BTreeMap::new(),
                sites: Vec::new(),
            });

            let mut table = WireTable::with_capacity(staged.connections.len() * 2)?;
            for (wire, connections) in staged.connections {
                total_connections += connections.len();
                table.put(wire, connections);
            }
            table.intern_connections(&mut arrays);

            let pins = staged
                .sites
                .iter()
                .map(|&s| &*sites[s.as_raw() as usize].pins);
            let tile_sources = sources.intern(TileSources::from_sites(pins.clone()));
            let tile_sinks = sinks.intern(TileSinks::from_sites(pins));

            let id = TileId::from_raw(index as u32);
            tile_by_name.insert(staged.name.clone(), id);
            tiles.push(Tile {
                id,
                row,
                col,
                name: staged.name,
                kind: staged.kind,
                wires: tables.intern(table),
                sources: tile_sources,
                sinks: tile_sinks,
                sites: staged.sites,
            });
        }

        let stats = DeviceStats {
            tiles: tiles.len(),
            unique_tables: tables.len(),
            unique_connection_arrays: arrays.len(),
            unique_sources: sources.len(),
            unique_sinks: sinks.len(),
            unique_site_pins: site_pins.len(),
            total_connections,
        };
        log::info!("built device {}: {}", self.part, stats);

        Ok(Device {
            part: self.part,
            rows: self.rows,
            cols: self.cols,
            wires: Arc::new(self.wires),
            tiles,
            sites,
            site_by_name: self.site_by_name,
            tile_by_name,
            stats,
        })
    }
}
