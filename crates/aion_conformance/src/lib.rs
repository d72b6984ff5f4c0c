//! Conformance test helpers for the Aion routing back end.
//!
//! Provides small device fixtures (a single-tile crossbar, a one-row strip
//! with arbitrary links, and a regular mesh), design-building shortcuts, and
//! a routing entry point that returns structured results for assertion in
//! integration tests.

#![warn(missing_docs)]

use aion_config::RouterConfig;
use aion_device::description::{
    ConnectionDescription, DeviceDescription, PinDescription, SiteTemplate, TileKindDescription,
    TilePlacement, WireDescription,
};
use aion_device::{
    Device, DeviceBuilder, DeviceModel, PinDirection, SitePin, SitePins, TileKind, WireConnection,
    WireEnumerator,
};
use aion_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use aion_route::{Design, Instance, InstanceId, Pip, RouteReport};
use std::collections::BTreeMap;

/// Result of routing a design.
pub struct RouteResult {
    /// The design with PIPs appended.
    pub design: Design,
    /// The router's run summary.
    pub report: RouteReport,
    /// All diagnostics emitted during routing.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl RouteResult {
    /// Returns the PIPs of a net by name.
    pub fn pips(&self, net: &str) -> &[Pip] {
        self.design.find_net(net).map_or(&[], |n| &n.pips)
    }

    /// Returns `true` if any diagnostic carries the given code text.
    pub fn has_code(&self, code: &str) -> bool {
        self.diagnostics.iter().any(|d| d.code.to_string() == code)
    }
}

/// Creates a router configuration from the body of a `[router]` table.
pub fn make_config(router_table: &str) -> RouterConfig {
    let toml_str = format!("[router]\n{router_table}\n");
    aion_config::load_config_from_str(&toml_str).unwrap().router
}

/// Routes a design with the default configuration.
pub fn route(design: Design, device: &Device) -> RouteResult {
    route_with_config(design, device, &RouterConfig::default())
}

/// Routes a design with an explicit configuration.
pub fn route_with_config(mut design: Design, device: &Device, config: &RouterConfig) -> RouteResult {
    let sink = DiagnosticSink::new();
    let report = aion_route::route_design(&mut design, device, config, &sink)
        .expect("routing should not return internal error");

    let diagnostics = sink.diagnostics();
    let has_errors = sink.has_errors();
    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    RouteResult {
        design,
        report,
        diagnostics,
        has_errors,
        error_count,
        warning_count,
    }
}

/// Formats a PIP as `TILE:START->END` using device names.
pub fn pip_name(device: &Device, pip: &Pip) -> String {
    let tile = device.tile(pip.tile).map_or("?", |t| t.name.as_str());
    let start = device.wire_name(pip.start).unwrap_or("?");
    let end = device.wire_name(pip.end).unwrap_or("?");
    format!("{tile}:{start}->{end}")
}

/// Adds a placed instance to a design.
pub fn place(design: &mut Design, name: &str, kind: &str, site: &str) -> InstanceId {
    design.add_instance(Instance::new(name, kind).placed_at(site))
}

/// A site of a single-tile fixture: name, kind, and `(pin, wire, direction)`.
pub type SiteSpec<'a> = (&'a str, &'a str, &'a [(&'a str, &'a str, PinDirection)]);

/// Builds a 1x`cols` device whose tile (0, 0) holds the given same-tile PIPs
/// and sites. Wires are enumerated in the order given by `wires`, so the
/// first name gets id 0. The remaining tiles are empty.
pub fn crossbar_device(
    cols: u32,
    wires: &[&str],
    pips: &[(&str, &str)],
    sites: &[SiteSpec<'_>],
) -> Device {
    let mut enumerator = WireEnumerator::new("fixture");
    for name in wires {
        enumerator.get_or_intern(name);
    }
    let wire = |name: &str| enumerator.wire(name).unwrap();

    let mut connections: BTreeMap<_, Vec<_>> = BTreeMap::new();
    for (from, to) in pips {
        connections
            .entry(wire(*from))
            .or_default()
            .push(WireConnection::pip(wire(*to)));
    }
    let mut site_pins = Vec::new();
    for (name, kind, pins) in sites {
        let mut map = SitePins::new();
        for (pin, w, direction) in pins.iter() {
            map.insert(
                *pin,
                SitePin {
                    wire: wire(*w),
                    direction: *direction,
                },
            );
        }
        site_pins.push((*name, *kind, map));
    }

    let mut builder = DeviceBuilder::new("fixture", 1, cols, enumerator);
    let tile = builder
        .add_tile(0, 0, "XBAR_X0Y0", TileKind::Interconnect)
        .unwrap();
    for (from, list) in connections {
        builder.set_connections(tile, from, list).unwrap();
    }
    for (name, kind, pins) in site_pins {
        builder.add_site(tile, name, kind, pins).unwrap();
    }
    builder.build().unwrap()
}

/// A connection of a [`row_device`], anchored at a column.
#[derive(Clone, Copy, Debug)]
pub enum Link<'a> {
    /// A same-tile PIP `from -> to` in column `col`.
    Pip(u32, &'a str, &'a str),
    /// A fixed wire from column `col` into column `col + offset`.
    Wire(u32, &'a str, i16, &'a str),
    /// A route-through from column `col` into column `col + offset`.
    RouteThrough(u32, &'a str, i16, &'a str),
}

/// Builds a 1x`cols` device with one tile `T{col}` per column.
///
/// Wires are enumerated in the order of `wires`. Each site is given with the
/// column of the tile that holds it.
pub fn row_device(
    cols: u32,
    wires: &[&str],
    links: &[Link<'_>],
    sites: &[(u32, SiteSpec<'_>)],
) -> Device {
    let mut enumerator = WireEnumerator::new("row");
    for name in wires {
        enumerator.get_or_intern(name);
    }
    let wire = |name: &str| enumerator.wire(name).unwrap();

    let mut staged: Vec<(u32, _, WireConnection)> = Vec::new();
    for link in links {
        let (col, from, connection) = match *link {
            Link::Pip(col, from, to) => (col, from, WireConnection::pip(wire(to))),
            Link::Wire(col, from, offset, to) => {
                (col, from, WireConnection::wire(0, offset, wire(to)))
            }
            Link::RouteThrough(col, from, offset, to) => {
                (col, from, WireConnection::new(0, offset, wire(to), true, true))
            }
        };
        staged.push((col, wire(from), connection));
    }
    let mut staged_sites = Vec::new();
    for (col, (name, kind, pins)) in sites {
        let mut map = SitePins::new();
        for (pin, w, direction) in pins.iter() {
            map.insert(
                *pin,
                SitePin {
                    wire: wire(*w),
                    direction: *direction,
                },
            );
        }
        staged_sites.push((*col, *name, *kind, map));
    }

    let mut builder = DeviceBuilder::new("row", 1, cols, enumerator);
    let tiles: Vec<_> = (0..cols)
        .map(|col| {
            builder
                .add_tile(0, col, format!("T{col}"), TileKind::Interconnect)
                .unwrap()
        })
        .collect();
    for (col, from, connection) in staged {
        builder
            .add_connection(tiles[col as usize], from, connection)
            .unwrap();
    }
    for (col, name, kind, pins) in staged_sites {
        builder.add_site(tiles[col as usize], name, kind, pins).unwrap();
    }
    builder.build().unwrap()
}

const COMPASS: [(&str, i16, i16); 4] = [("N", 1, 0), ("S", -1, 0), ("E", 0, 1), ("W", 0, -1)];

/// Builds a `rows` x `cols` mesh through a [`DeviceDescription`].
///
/// Every tile is of kind `INT` and holds one site `SLICE_X{col}Y{row}` with
/// output `Q` (wire `OUT`), inputs `A`/`B` (wires `IN0`/`IN1`), clock input
/// `CLK` (wire `CLKIN`) and an input `X` on wire `ISO`, which nothing drives.
///
/// Routing: `OUT` reaches every `{N,S,E,W}1BEG` through a PIP; each `BEG`
/// runs one tile in its direction to the matching `END`; every `END` can
/// turn into any `BEG` or drop into `IN0`, `IN1` and `CLKIN`. A clock spine
/// `GCLK0` is driven from `OUT`, runs east one tile per hop and feeds
/// `CLKIN`. The graph is full of cycles.
pub fn mesh_description(rows: u32, cols: u32) -> DeviceDescription {
    let mut wires: Vec<String> = vec!["OUT".into(), "IN0".into(), "IN1".into(), "CLKIN".into()];
    for (d, _, _) in COMPASS {
        wires.push(format!("{d}1BEG"));
        wires.push(format!("{d}1END"));
    }
    wires.push("GCLK0".into());
    wires.push("ISO".into());

    let conn = |from: &str, to: &str, row_offset: i16, col_offset: i16, pip: bool| {
        ConnectionDescription {
            from: from.into(),
            to: to.into(),
            row_offset,
            col_offset,
            pip,
            route_through: false,
        }
    };
    let mut connections = Vec::new();
    for (d, _, _) in COMPASS {
        connections.push(conn("OUT", &format!("{d}1BEG"), 0, 0, true));
    }
    connections.push(conn("OUT", "GCLK0", 0, 0, true));
    for (d, dr, dc) in COMPASS {
        connections.push(conn(&format!("{d}1BEG"), &format!("{d}1END"), dr, dc, false));
    }
    for (d, _, _) in COMPASS {
        let end = format!("{d}1END");
        for (t, _, _) in COMPASS {
            connections.push(conn(&end, &format!("{t}1BEG"), 0, 0, true));
        }
        for input in ["IN0", "IN1", "CLKIN"] {
            connections.push(conn(&end, input, 0, 0, true));
        }
    }
    connections.push(conn("GCLK0", "GCLK0", 0, 1, false));
    connections.push(conn("GCLK0", "CLKIN", 0, 0, true));

    let pin = |wire: &str, direction| PinDescription {
        wire: wire.into(),
        direction,
    };
    let mut pins = BTreeMap::new();
    pins.insert("Q".to_string(), pin("OUT", PinDirection::Output));
    pins.insert("A".to_string(), pin("IN0", PinDirection::Input));
    pins.insert("B".to_string(), pin("IN1", PinDirection::Input));
    pins.insert("CLK".to_string(), pin("CLKIN", PinDirection::Input));
    pins.insert("X".to_string(), pin("ISO", PinDirection::Input));

    let mut tile_kinds = BTreeMap::new();
    tile_kinds.insert(
        "INT".to_string(),
        TileKindDescription {
            kind: TileKind::Interconnect,
            connections,
            sites: vec![SiteTemplate {
                kind: "SLICEL".into(),
                pins,
            }],
        },
    );

    let mut tiles = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            tiles.push(TilePlacement {
                name: format!("INT_X{col}Y{row}"),
                row,
                col,
                kind: "INT".into(),
                site_names: vec![format!("SLICE_X{col}Y{row}")],
            });
        }
    }

    DeviceDescription {
        part: format!("mesh{rows}x{cols}"),
        family: Some("mesh".into()),
        rows,
        cols,
        wires: wires
            .into_iter()
            .map(|name| WireDescription {
                name,
                direction: None,
            })
            .collect(),
        tile_kinds,
        tiles,
    }
}

/// Builds the mesh described by [`mesh_description`].
pub fn mesh_device(rows: u32, cols: u32) -> Device {
    mesh_description(rows, cols).build().unwrap()
}

/// Name of the mesh site at `(row, col)`.
pub fn mesh_site(row: u32, col: u32) -> String {
    format!("SLICE_X{col}Y{row}")
}
