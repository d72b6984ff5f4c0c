//! Lowest-cost-first maze search for a single sink.
//!
//! The frontier is a binary heap ordered by `(cost, insertion sequence)`, so
//! equal-cost nodes pop in the order they were pushed. A node's cost is
//! `weight * (manhattan(node, sink) + hop level) + history`, minus the clock
//! bias when a clock-like connection steps onto clock fabric.

use super::history::HistoryMap;
use super::node::{EdgeKind, NodeArena, SearchNode};
use super::state::{Owner, UsageState};
use crate::design::Pip;
use aion_config::RouterConfig;
use aion_device::{DeviceModel, TileWire, WireDirection};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// A frontier entry in the search priority queue.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    cost: i32,
    seq: u64,
    node: u32,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap on (cost, seq).
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// What one search is asked to connect.
#[derive(Debug)]
pub(crate) struct SearchRequest<'r> {
    pub seeds: &'r [TileWire],
    pub sink: TileWire,
    pub owner: Owner,
    pub clock_like: bool,
}

/// A found path, ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FoundPath {
    /// PIPs in source-to-sink order.
    pub pips: Vec<Pip>,
    /// Every wire on the path, seed first.
    pub wires: Vec<TileWire>,
    /// Both ends of every route-through edge on the path.
    pub route_throughs: Vec<(TileWire, TileWire)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    Found(FoundPath),
    NodeCapExceeded,
    Exhausted,
}

/// Reusable search buffers bound to one device and configuration.
pub(crate) struct MazeSearch<'a> {
    device: &'a dyn DeviceModel,
    config: &'a RouterConfig,
    arena: NodeArena,
    frontier: BinaryHeap<FrontierEntry>,
    visited: HashSet<TileWire>,
    seq: u64,
    /// Nodes popped by the most recent search.
    pub expanded: usize,
}

impl<'a> MazeSearch<'a> {
    pub fn new(device: &'a dyn DeviceModel, config: &'a RouterConfig) -> Self {
        Self {
            device,
            config,
            arena: NodeArena::default(),
            frontier: BinaryHeap::new(),
            visited: HashSet::new(),
            seq: 0,
            expanded: 0,
        }
    }

    fn reset(&mut self) {
        self.arena.clear();
        self.frontier.clear();
        self.visited.clear();
        self.seq = 0;
        self.expanded = 0;
    }

    fn push(&mut self, node: SearchNode) -> u32 {
        let index = self.arena.push(node);
        self.frontier.push(FrontierEntry {
            cost: node.cost,
            seq: self.seq,
            node: index,
        });
        self.seq += 1;
        index
    }

    /// Runs one search against the current usage and history.
    pub fn run(
        &mut self,
        request: &SearchRequest<'_>,
        usage: &UsageState,
        history: &HistoryMap,
    ) -> SearchOutcome {
        self.reset();
        for &seed in request.seeds {
            if self.visited.insert(seed) {
                self.push(SearchNode {
                    at: seed,
                    parent: None,
                    level: 0,
                    cost: 0,
                    via: EdgeKind::Seed,
                    same_tile: false,
                });
            }
        }

        while let Some(entry) = self.frontier.pop() {
            self.expanded += 1;
            if self.expanded > self.config.max_expanded_nodes {
                log::debug!(
                    "search for {} aborted after {} nodes",
                    request.sink,
                    self.config.max_expanded_nodes
                );
                return SearchOutcome::NodeCapExceeded;
            }
            let current = *self.arena.get(entry.node);
            let device = self.device;
            for connection in device.wire_connections(current.at.tile, current.at.wire) {
                let Some(target) = device.connection_target(current.at.tile, connection) else {
                    continue;
                };
                if usage.is_blocked(target, request.owner) {
                    continue;
                }
                let via = if device.is_route_through(connection) {
                    EdgeKind::RouteThrough
                } else if connection.is_pip() {
                    EdgeKind::Pip
                } else {
                    EdgeKind::Wire
                };
                let level = current.level + 1;
                let mut node = SearchNode {
                    at: target,
                    parent: Some(entry.node),
                    level,
                    cost: 0,
                    via,
                    same_tile: target.tile == current.at.tile,
                };
                if target == request.sink {
                    let index = self.arena.push(node);
                    log::trace!(
                        "reached {} after {} expansions ({} nodes)",
                        request.sink,
                        self.expanded,
                        self.arena.len()
                    );
                    return SearchOutcome::Found(self.reconstruct(index));
                }
                if !self.visited.insert(target) {
                    continue;
                }
                node.cost = self.cost(&node, request, history);
                self.push(node);
            }
        }
        SearchOutcome::Exhausted
    }

    fn cost(&self, node: &SearchNode, request: &SearchRequest<'_>, history: &HistoryMap) -> i32 {
        let distance = self.device.manhattan(node.at.tile, request.sink.tile) as i32;
        let mut cost = self
            .config
            .distance_weight
            .saturating_mul(distance.saturating_add(node.level as i32))
            .saturating_add(history.penalty(node.at));
        if request.clock_like
            && node.via != EdgeKind::RouteThrough
            && self.device.wire_direction(node.at.wire) == WireDirection::Clock
        {
            cost = cost.saturating_sub(self.config.clock_bias);
        }
        cost
    }

    /// Walks back from the sink node and collects PIPs and path wires.
    fn reconstruct(&self, sink_node: u32) -> FoundPath {
        let chain = self.arena.chain(sink_node);
        let mut path = FoundPath {
            pips: Vec::new(),
            wires: chain.iter().map(|n| n.at).collect(),
            route_throughs: Vec::new(),
        };
        for pair in chain.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if to.via == EdgeKind::RouteThrough {
                path.route_throughs.push((from.at, to.at));
            }
            // Only same-tile links are PIPs; an inter-tile route-through
            // stays out of the PIP list.
            if to.same_tile && matches!(to.via, EdgeKind::Pip | EdgeKind::RouteThrough) {
                path.pips.push(Pip {
                    tile: to.at.tile,
                    start: from.at.wire,
                    end: to.at.wire,
                });
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::NetType;
    use crate::ids::NetId;
    use aion_device::{
        Device, DeviceBuilder, TileId, TileKind, WireConnection, WireEnumerator, WireId,
    };

    /// A 1x3 row: in each tile `A -pip-> B`, `B -wire-> A` of the next tile.
    fn row() -> Device {
        let mut wires = WireEnumerator::new("t");
        let a = wires.get_or_intern("A");
        let b = wires.get_or_intern("B");
        let mut builder = DeviceBuilder::new("row", 1, 3, wires);
        for col in 0..3 {
            let t = builder
                .add_tile(0, col, format!("T{col}"), TileKind::Interconnect)
                .unwrap();
            builder.add_connection(t, a, WireConnection::pip(b)).unwrap();
            builder
                .add_connection(t, b, WireConnection::wire(0, 1, a))
                .unwrap();
        }
        builder.build().unwrap()
    }

    fn tw(t: u32, w: u32) -> TileWire {
        TileWire::new(TileId::from_raw(t), WireId::from_raw(w))
    }

    fn owner() -> Owner {
        Owner::new(NetId::from_raw(0), NetType::Wire)
    }

    #[test]
    fn frontier_orders_by_cost_then_seq() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry { cost: 5, seq: 0, node: 0 });
        heap.push(FrontierEntry { cost: 3, seq: 1, node: 1 });
        heap.push(FrontierEntry { cost: 3, seq: 2, node: 2 });
        heap.push(FrontierEntry { cost: -997, seq: 3, node: 3 });
        let order: Vec<u32> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![3, 1, 2, 0]);
    }

    #[test]
    fn finds_path_across_tiles() {
        let device = row();
        let config = RouterConfig::default();
        let mut search = MazeSearch::new(&device, &config);
        let seeds = [tw(0, 0)];
        let request = SearchRequest {
            seeds: &seeds,
            sink: tw(2, 1),
            owner: owner(),
            clock_like: false,
        };
        let outcome = search.run(&request, &UsageState::default(), &HistoryMap::new(1));
        let SearchOutcome::Found(path) = outcome else {
            panic!("expected a path, got {outcome:?}");
        };
        let pip_tiles: Vec<u32> = path.pips.iter().map(|p| p.tile.as_raw()).collect();
        assert_eq!(pip_tiles, vec![0, 1, 2]);
        assert_eq!(path.wires.first(), Some(&tw(0, 0)));
        assert_eq!(path.wires.last(), Some(&tw(2, 1)));
        assert!(path.route_throughs.is_empty());
    }

    #[test]
    fn blocked_sink_is_not_reached() {
        let device = row();
        let config = RouterConfig::default();
        let mut search = MazeSearch::new(&device, &config);
        let mut usage = UsageState::default();
        usage.mark_used(tw(0, 1), Owner::new(NetId::from_raw(7), NetType::Wire));
        let seeds = [tw(0, 0)];
        let request = SearchRequest {
            seeds: &seeds,
            sink: tw(0, 1),
            owner: owner(),
            clock_like: false,
        };
        let outcome = search.run(&request, &usage, &HistoryMap::new(1));
        assert_eq!(outcome, SearchOutcome::Exhausted);
    }

    #[test]
    fn node_cap_aborts() {
        let device = row();
        let config = RouterConfig {
            max_expanded_nodes: 2,
            ..RouterConfig::default()
        };
        let mut search = MazeSearch::new(&device, &config);
        let seeds = [tw(0, 0)];
        let request = SearchRequest {
            seeds: &seeds,
            sink: tw(2, 1),
            owner: owner(),
            clock_like: false,
        };
        let outcome = search.run(&request, &UsageState::default(), &HistoryMap::new(1));
        assert_eq!(outcome, SearchOutcome::NodeCapExceeded);
        assert_eq!(search.expanded, 3);
    }

    #[test]
    fn unreachable_sink_exhausts() {
        let device = row();
        let config = RouterConfig::default();
        let mut search = MazeSearch::new(&device, &config);
        let seeds = [tw(2, 1)];
        let request = SearchRequest {
            seeds: &seeds,
            sink: tw(0, 0),
            owner: owner(),
            clock_like: false,
        };
        let outcome = search.run(&request, &UsageState::default(), &HistoryMap::new(1));
        assert_eq!(outcome, SearchOutcome::Exhausted);
    }

    /// One tile: `S -pip-> A -pip-> T`, plus `S -> GCLK0 -pip-> T` where the
    /// second hop out of `S` is either a route-through or a plain PIP.
    fn clock_fork(through_site: bool) -> Device {
        let mut wires = WireEnumerator::new("t");
        let s = wires.get_or_intern("S");
        let a = wires.get_or_intern("A");
        let gclk = wires.get_or_intern("GCLK0");
        let t = wires.get_or_intern("T");
        let mut builder = DeviceBuilder::new("fork", 1, 1, wires);
        let tile = builder.add_tile(0, 0, "F", TileKind::Interconnect).unwrap();
        builder.add_connection(tile, s, WireConnection::pip(a)).unwrap();
        let to_clock = if through_site {
            WireConnection::route_through(gclk)
        } else {
            WireConnection::pip(gclk)
        };
        builder.add_connection(tile, s, to_clock).unwrap();
        builder.add_connection(tile, a, WireConnection::pip(t)).unwrap();
        builder.add_connection(tile, gclk, WireConnection::pip(t)).unwrap();
        builder.build().unwrap()
    }

    fn clock_request_path(device: &Device) -> FoundPath {
        let config = RouterConfig::default();
        let mut search = MazeSearch::new(device, &config);
        let seeds = [tw(0, 0)];
        let request = SearchRequest {
            seeds: &seeds,
            sink: tw(0, 3),
            owner: owner(),
            clock_like: true,
        };
        match search.run(&request, &UsageState::default(), &HistoryMap::new(1)) {
            SearchOutcome::Found(path) => path,
            other => panic!("expected a path, got {other:?}"),
        }
    }

    #[test]
    fn clock_bias_pulls_toward_clock_pip() {
        let path = clock_request_path(&clock_fork(false));
        assert_eq!(path.wires, vec![tw(0, 0), tw(0, 2), tw(0, 3)]);
        assert!(path.route_throughs.is_empty());
    }

    #[test]
    fn clock_bias_skips_route_through_edges() {
        let path = clock_request_path(&clock_fork(true));
        assert_eq!(path.wires, vec![tw(0, 0), tw(0, 1), tw(0, 3)]);
        assert!(path.route_throughs.is_empty());
    }

    #[test]
    fn each_wire_enters_the_arena_once() {
        // Diamond S -> {A, B} -> C with no way on to the sink D.
        let mut wires = WireEnumerator::new("t");
        let [s, a, b, c] = ["S", "A", "B", "C"].map(|n| wires.get_or_intern(n));
        wires.get_or_intern("D");
        let mut builder = DeviceBuilder::new("diamond", 1, 1, wires);
        let tile = builder.add_tile(0, 0, "G", TileKind::Interconnect).unwrap();
        for (from, to) in [(s, a), (s, b), (a, c), (b, c)] {
            builder.add_connection(tile, from, WireConnection::pip(to)).unwrap();
        }
        let device = builder.build().unwrap();

        let config = RouterConfig::default();
        let mut search = MazeSearch::new(&device, &config);
        let seeds = [tw(0, 0)];
        let request = SearchRequest {
            seeds: &seeds,
            sink: tw(0, 4),
            owner: owner(),
            clock_like: false,
        };
        let outcome = search.run(&request, &UsageState::default(), &HistoryMap::new(1));
        assert_eq!(outcome, SearchOutcome::Exhausted);
        assert_eq!(search.arena.len(), 4);
        assert_eq!(search.expanded, 4);
    }
}
