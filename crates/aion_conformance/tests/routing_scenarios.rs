//! End-to-end routing scenarios over small fixture devices.

use aion_conformance::*;
use aion_device::{DeviceModel, PinDirection, TileId, TileWire, WireId};
use aion_route::{Design, FailureReason, Net, NetStatus, NetType, Pip};
use std::collections::{HashMap, HashSet};

use PinDirection::{Input, Output};

fn pip(start: u32, end: u32) -> Pip {
    Pip {
        tile: TileId::from_raw(0),
        start: WireId::from_raw(start),
        end: WireId::from_raw(end),
    }
}

/// Two tiles; tile (0,0) has the single PIP `W1 -> W2`. `SITE_A.O` drives
/// `W1`, `SITE_B.I` listens on `W2`.
fn pip_pair() -> aion_device::Device {
    crossbar_device(
        2,
        &["W0", "W1", "W2"],
        &[("W1", "W2")],
        &[
            ("SITE_A", "SLICEL", &[("O", "W1", Output)]),
            ("SITE_B", "SLICEL", &[("I", "W2", Input)]),
        ],
    )
}

fn pair_design(types: &[NetType]) -> Design {
    let mut design = Design::new("pair", "fixture");
    let a = place(&mut design, "a", "SLICEL", "SITE_A");
    let b = place(&mut design, "b", "SLICEL", "SITE_B");
    for (i, &net_type) in types.iter().enumerate() {
        design.add_net(
            Net::new(format!("n{i}"), net_type)
                .with_source(a, "O")
                .with_sink(b, "I"),
        );
    }
    design
}

#[test]
fn single_pip_net_routes() {
    let device = pip_pair();
    let result = route(pair_design(&[NetType::Wire]), &device);
    assert!(!result.has_errors);
    assert!(result.report.is_fully_routed());
    assert_eq!(result.pips("n0"), &[pip(1, 2)]);
    assert_eq!(pip_name(&device, &result.pips("n0")[0]), "XBAR_X0Y0:W1->W2");
}

#[test]
fn second_net_cannot_reuse_the_sole_pip() {
    let device = pip_pair();
    for reserve in ["true", "false"] {
        let config = make_config(&format!("reserve_pins = {reserve}"));
        let result = route_with_config(pair_design(&[NetType::Wire, NetType::Wire]), &device, &config);

        assert_eq!(result.pips("n0"), &[pip(1, 2)]);
        assert!(result.pips("n1").is_empty());
        assert_eq!(result.report.unrouted.len(), 1);
        assert_eq!(result.report.unrouted[0].net, "n1");
        assert_eq!(result.report.unrouted[0].reason, FailureReason::NoCandidateSources);
        assert_eq!(result.design.pip_count(), 1);
        assert!(result.has_code("R005"));
        assert!(result.has_code("R010"));
        assert_eq!(result.error_count, 1);
        assert_eq!(result.warning_count, 1);
    }
}

#[test]
fn sink_on_committed_stub_needs_no_search() {
    // O -> X -> {I0, I1}; a third sink sits directly on X.
    let device = crossbar_device(
        1,
        &["O", "X", "I0", "I1"],
        &[("O", "X"), ("X", "I0"), ("X", "I1")],
        &[(
            "S",
            "SLICEL",
            &[
                ("Q", "O", Output),
                ("A", "I0", Input),
                ("M", "X", Input),
                ("B", "I1", Input),
            ],
        )],
    );
    let mut design = Design::new("fanout", "fixture");
    let s = place(&mut design, "s", "SLICEL", "S");
    design.add_net(
        Net::new("n", NetType::Wire)
            .with_source(s, "Q")
            .with_sink(s, "A")
            .with_sink(s, "M")
            .with_sink(s, "B"),
    );
    let result = route(design, &device);

    assert!(result.report.is_fully_routed());
    assert_eq!(result.pips("n"), &[pip(0, 1), pip(1, 2), pip(1, 3)]);
    // Two pops each for A and B, none for M.
    assert_eq!(result.report.nodes_expanded, 4);
    let net = &result.report.nets[0];
    assert_eq!((net.sinks_routed, net.sinks_total), (3, 3));
}

#[test]
fn ground_nets_share_a_pip() {
    let device = pip_pair();
    let result = route(pair_design(&[NetType::Gnd, NetType::Gnd]), &device);
    assert!(!result.has_errors);
    assert!(result.report.is_fully_routed());
    assert_eq!(result.pips("n0"), &[pip(1, 2)]);
    assert_eq!(result.pips("n1"), &[pip(1, 2)]);
}

#[test]
fn power_and_ground_never_share() {
    let device = pip_pair();
    for types in [[NetType::Vcc, NetType::Gnd], [NetType::Gnd, NetType::Vcc]] {
        let result = route(pair_design(&types), &device);
        // Whichever net reserved the pins first keeps them.
        assert_eq!(result.pips("n0"), &[pip(1, 2)]);
        assert!(result.pips("n1").is_empty());
        assert_eq!(result.report.unrouted.len(), 1);
        assert_eq!(result.report.unrouted[0].net, "n1");
        assert_eq!(result.report.unrouted[0].reason, FailureReason::NoCandidateSources);
    }
}

#[test]
fn static_groups_route_before_signals() {
    let device = pip_pair();
    let result = route(pair_design(&[NetType::Wire, NetType::Vcc]), &device);
    let order: Vec<&str> = result.report.nets.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(order, vec!["n1", "n0"]);
    // The power net goes first but the pins are reserved for the signal net.
    assert_eq!(result.pips("n0"), &[pip(1, 2)]);
    assert!(result.pips("n1").is_empty());
}

fn mesh_design(device: &aion_device::Device, nets: &[((u32, u32), (u32, u32), &str)]) -> Design {
    let mut design = Design::new("mesh", device.part_name());
    let mut placed = HashMap::new();
    for ((sr, sc), (dr, dc), _) in nets {
        for (r, c) in [(*sr, *sc), (*dr, *dc)] {
            placed
                .entry((r, c))
                .or_insert_with(|| place(&mut design, &format!("u{c}_{r}"), "SLICEL", &mesh_site(r, c)));
        }
    }
    for (i, ((sr, sc), (dr, dc), pin)) in nets.iter().enumerate() {
        design.add_net(
            Net::new(format!("net{i}"), NetType::Wire)
                .with_source(placed[&(*sr, *sc)], "Q")
                .with_sink(placed[&(*dr, *dc)], *pin),
        );
    }
    design
}

const CROSSING: [((u32, u32), (u32, u32), &str); 4] = [
    ((0, 0), (2, 2), "A"),
    ((2, 2), (0, 0), "A"),
    ((0, 2), (2, 0), "B"),
    ((2, 0), (0, 2), "B"),
];

#[test]
fn signal_nets_never_share_wires() {
    let device = mesh_device(3, 3);
    let result = route(mesh_design(&device, &CROSSING), &device);
    assert!(result.report.is_fully_routed(), "{}", result.report);

    let mut owner: HashMap<TileWire, &str> = HashMap::new();
    for net in &result.design.nets {
        assert!(!net.pips.is_empty());
        for p in &net.pips {
            for wire in [TileWire::new(p.tile, p.start), TileWire::new(p.tile, p.end)] {
                let previous = owner.insert(wire, net.name.as_str());
                assert!(
                    previous.is_none() || previous == Some(net.name.as_str()),
                    "{wire} used by {previous:?} and {}",
                    net.name
                );
            }
        }
    }
}

#[test]
fn routing_is_deterministic() {
    let device = mesh_device(3, 3);
    let first = route(mesh_design(&device, &CROSSING), &device);
    let second = route(mesh_design(&device, &CROSSING), &device);
    for (a, b) in first.design.nets.iter().zip(&second.design.nets) {
        assert_eq!(a.pips, b.pips);
    }
    assert_eq!(
        serde_json::to_string(&first.design).unwrap(),
        serde_json::to_string(&second.design).unwrap()
    );
    assert_eq!(first.report.nodes_expanded, second.report.nodes_expanded);
}

#[test]
fn node_cap_stops_search_on_cyclic_mesh() {
    let device = mesh_device(3, 3);
    let config = make_config("max_expanded_nodes = 3");
    let result = route_with_config(mesh_design(&device, &[((0, 0), (2, 2), "A")]), &device, &config);
    assert_eq!(result.report.unrouted.len(), 1);
    assert_eq!(result.report.unrouted[0].reason, FailureReason::NodeCapExceeded);
    assert!(result.has_code("R003"));
    assert!(result.design.nets[0].pips.is_empty());
}

#[test]
fn undriven_sink_exhausts_the_graph() {
    let device = mesh_device(4, 4);
    let result = route(mesh_design(&device, &[((0, 0), (3, 3), "X")]), &device);
    assert_eq!(result.report.unrouted[0].reason, FailureReason::NoPath);
    assert!(result.has_code("R004"));
    assert!(result.report.nodes_expanded < aion_config::RouterConfig::DEFAULT_MAX_EXPANDED_NODES);
}

#[test]
fn clock_sink_prefers_clock_spine() {
    let device = mesh_device(1, 3);
    let result = route(mesh_design(&device, &[((0, 0), (0, 2), "CLK")]), &device);
    assert!(result.report.is_fully_routed());
    let names: Vec<String> = result.design.nets[0]
        .pips
        .iter()
        .map(|p| pip_name(&device, p))
        .collect();
    assert_eq!(names, vec!["INT_X0Y0:OUT->GCLK0", "INT_X2Y0:GCLK0->CLKIN"]);
}

/// `S` reaches `T` through `M1` or `M2`; `M1` also feeds `P`.
fn two_path_device() -> aion_device::Device {
    crossbar_device(
        1,
        &["S", "M1", "M2", "T", "P"],
        &[("S", "M1"), ("M1", "T"), ("S", "M2"), ("M2", "T"), ("M1", "P")],
        &[("SITE", "SLICEL", &[("O", "S", Output), ("I", "T", Input)])],
    )
}

#[test]
fn prerouted_net_blocks_its_wires() {
    let device = two_path_device();
    let mut design = Design::new("pre", "fixture");
    let s = place(&mut design, "s", "SLICEL", "SITE");
    design.add_net(Net::new("n", NetType::Wire).with_source(s, "O").with_sink(s, "I"));
    let free = route(design.clone(), &device);
    assert_eq!(free.pips("n"), &[pip(0, 1), pip(1, 3)]);

    let mut fixed = Net::new("fixed", NetType::Wire);
    fixed.pips.push(pip(1, 4));
    design.add_net(fixed);
    let result = route(design, &device);
    assert_eq!(result.pips("n"), &[pip(0, 2), pip(2, 3)]);
    assert_eq!(result.pips("fixed"), &[pip(1, 4)]);
    let fixed_id = result.design.find_net("fixed").map(|n| n.id).unwrap();
    assert_eq!(
        result.report.net(fixed_id).map(|r| r.status),
        Some(NetStatus::PreRouted)
    );
}

/// `O -> P -> T` is short, `O -> Q -> Q2 -> T` is the detour. Net `b`
/// drives `P` from `BS` and sinks on it.
fn reservation_device() -> aion_device::Device {
    crossbar_device(
        1,
        &["O", "P", "Q", "Q2", "T", "BS"],
        &[
            ("O", "P"),
            ("P", "T"),
            ("O", "Q"),
            ("Q", "Q2"),
            ("Q2", "T"),
            ("BS", "P"),
        ],
        &[
            ("SA", "SLICEL", &[("OUT", "O", Output), ("IN", "T", Input)]),
            ("SB", "SLICEL", &[("OUT", "BS", Output), ("IN", "P", Input)]),
        ],
    )
}

fn reservation_design() -> Design {
    let mut design = Design::new("res", "fixture");
    let a = place(&mut design, "a", "SLICEL", "SA");
    let b = place(&mut design, "b", "SLICEL", "SB");
    design.add_net(Net::new("na", NetType::Wire).with_source(a, "OUT").with_sink(a, "IN"));
    design.add_net(Net::new("nb", NetType::Wire).with_source(b, "OUT").with_sink(b, "IN"));
    design
}

#[test]
fn reserved_pin_wires_force_a_detour() {
    let device = reservation_device();
    let result = route(reservation_design(), &device);
    assert!(result.report.is_fully_routed());
    assert_eq!(result.pips("na"), &[pip(0, 2), pip(2, 3), pip(3, 4)]);
    assert_eq!(result.pips("nb"), &[pip(5, 1)]);
}

#[test]
fn without_reservation_first_net_takes_the_pin() {
    let device = reservation_device();
    let config = make_config("reserve_pins = false");
    let result = route_with_config(reservation_design(), &device, &config);
    assert_eq!(result.pips("na"), &[pip(0, 1), pip(1, 4)]);
    assert!(result.pips("nb").is_empty());
    assert_eq!(result.report.unrouted[0].net, "nb");
    assert_eq!(result.report.unrouted[0].reason, FailureReason::NoPath);
}

#[test]
fn unrouted_summary_lists_every_sink() {
    let device = pip_pair();
    let result = route(pair_design(&[NetType::Wire, NetType::Wire]), &device);
    let text = result.report.to_string();
    assert!(text.starts_with("routed 1 of 2 nets"));
    assert!(text.contains("net `n1` pin b.I"));

    let seen: HashSet<&str> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert!(seen.contains("1 sinks on 1 nets left unrouted"));
}

fn pip_names(result: &RouteResult, device: &aion_device::Device, net: &str) -> Vec<String> {
    result.pips(net).iter().map(|p| pip_name(device, p)).collect()
}

/// One tile: `O -pip-> X -rt-> Y -pip-> I`. A second driver `P` can only
/// reach its sink `J` through `Y`.
fn same_tile_through() -> aion_device::Device {
    row_device(
        1,
        &["O", "X", "Y", "I", "P", "J"],
        &[
            Link::Pip(0, "O", "X"),
            Link::RouteThrough(0, "X", 0, "Y"),
            Link::Pip(0, "Y", "I"),
            Link::Pip(0, "P", "Y"),
            Link::Pip(0, "Y", "J"),
        ],
        &[(
            0,
            (
                "S0",
                "SLICEL",
                &[
                    ("Q", "O", Output),
                    ("D", "I", Input),
                    ("R", "P", Output),
                    ("E", "J", Input),
                ],
            ),
        )],
    )
}

#[test]
fn same_tile_route_through_is_a_pip_and_claims_its_ends() {
    let device = same_tile_through();
    let mut design = Design::new("thru", "row");
    let a = place(&mut design, "a", "SLICEL", "S0");
    design.add_net(Net::new("thru", NetType::Wire).with_source(a, "Q").with_sink(a, "D"));
    design.add_net(Net::new("other", NetType::Wire).with_source(a, "R").with_sink(a, "E"));
    let result = route(design, &device);

    assert_eq!(
        pip_names(&result, &device, "thru"),
        vec!["T0:O->X", "T0:X->Y", "T0:Y->I"]
    );
    assert_eq!(result.report.route_throughs, 1);
    assert_eq!(result.report.pips, 3);
    assert!(result.pips("other").is_empty());
    assert_eq!(result.report.unrouted.len(), 1);
    assert_eq!(result.report.unrouted[0].net, "other");
    assert_eq!(result.report.unrouted[0].reason, FailureReason::NoPath);
    assert!(result.has_code("R004"));
}

/// Two tiles: `T0:O -pip-> X -rt(+1 col)-> T1:Y -wire-> Z -pip-> I`. In `T1`
/// a second driver `P` feeds `Y`, which is also a site input.
fn cross_tile_through() -> aion_device::Device {
    row_device(
        2,
        &["O", "X", "Y", "Z", "I", "P"],
        &[
            Link::Pip(0, "O", "X"),
            Link::RouteThrough(0, "X", 1, "Y"),
            Link::Wire(1, "Y", 0, "Z"),
            Link::Pip(1, "Z", "I"),
            Link::Pip(1, "P", "Y"),
        ],
        &[
            (0, ("S0", "SLICEL", &[("Q", "O", Output)])),
            (
                1,
                (
                    "S1",
                    "SLICEL",
                    &[("D", "I", Input), ("R", "P", Output), ("E", "Y", Input)],
                ),
            ),
        ],
    )
}

#[test]
fn cross_tile_route_through_is_no_pip_but_blocks_its_ends() {
    let device = cross_tile_through();
    let mut design = Design::new("span", "row");
    let a = place(&mut design, "a", "SLICEL", "S0");
    let b = place(&mut design, "b", "SLICEL", "S1");
    design.add_net(Net::new("span", NetType::Wire).with_source(a, "Q").with_sink(b, "D"));
    design.add_net(Net::new("other", NetType::Wire).with_source(b, "R").with_sink(b, "E"));
    // Without reservation, `Y` can only be taken away from `other` by the
    // route-through claim.
    let config = make_config("reserve_pins = false");
    let result = route_with_config(design, &device, &config);

    assert_eq!(pip_names(&result, &device, "span"), vec!["T0:O->X", "T1:Z->I"]);
    assert_eq!(result.report.route_throughs, 1);
    let y = device.wires().wire("Y").unwrap();
    assert!(result
        .pips("span")
        .iter()
        .all(|p| p.start != y && p.end != y));

    assert!(result.pips("other").is_empty());
    assert_eq!(result.report.unrouted.len(), 1);
    assert_eq!(result.report.unrouted[0].pin, "b.E");
    assert_eq!(result.report.unrouted[0].reason, FailureReason::NoPath);
}

/// A 1x3 strip where every tile can leave `OUT` eastward on `E1` or on the
/// clock spine `GCLK0`; both feed `IN`. `S0` holds the driver, `S2` the sink.
fn buffer_strip() -> aion_device::Device {
    let mut links = Vec::new();
    for col in 0..3 {
        links.push(Link::Pip(col, "OUT", "E1"));
        links.push(Link::Pip(col, "OUT", "GCLK0"));
        if col < 2 {
            links.push(Link::Wire(col, "E1", 1, "E1"));
            links.push(Link::Wire(col, "GCLK0", 1, "GCLK0"));
        }
        links.push(Link::Pip(col, "E1", "IN"));
        links.push(Link::Pip(col, "GCLK0", "IN"));
    }
    row_device(
        3,
        &["OUT", "E1", "GCLK0", "IN"],
        &links,
        &[
            (0, ("S0", "BUFGCTRL", &[("O", "OUT", Output)])),
            (2, ("S2", "SLICEL", &[("D", "IN", Input)])),
        ],
    )
}

fn buffer_design(driver_kind: &str) -> Design {
    let mut design = Design::new("buf", "row");
    let drv = place(&mut design, "drv", driver_kind, "S0");
    let ff = place(&mut design, "ff", "SLICEL", "S2");
    design.add_net(Net::new("q", NetType::Wire).with_source(drv, "O").with_sink(ff, "D"));
    design
}

#[test]
fn clock_buffer_driver_takes_the_spine() {
    let device = buffer_strip();

    let buffered = route(buffer_design("BUFGCTRL"), &device);
    assert!(buffered.report.is_fully_routed());
    assert_eq!(
        pip_names(&buffered, &device, "q"),
        vec!["T0:OUT->GCLK0", "T2:GCLK0->IN"]
    );

    let plain = route(buffer_design("SLICEL"), &device);
    assert_eq!(pip_names(&plain, &device, "q"), vec!["T0:OUT->E1", "T2:E1->IN"]);

    let config = make_config("clock_buffer_prefixes = []");
    let unbiased = route_with_config(buffer_design("BUFGCTRL"), &device, &config);
    assert_eq!(pip_names(&unbiased, &device, "q"), vec!["T0:OUT->E1", "T2:E1->IN"]);
}
