//! The per-net, per-sink routing driver.
//!
//! Nets are visited in static-group order. For each sink the driver builds a
//! candidate source set (the net source until the net owns PIPs, then every
//! endpoint of its committed PIPs), runs one maze search, and commits the
//! result. Failures are reported and the driver moves on.

use super::history::HistoryMap;
use super::search::{FoundPath, MazeSearch, SearchOutcome, SearchRequest};
use super::state::{Owner, UsageState};
use super::statics::{routing_order, StaticSourceHandler};
use crate::design::{Design, Net, Pin, Pip};
use crate::ids::NetId;
use crate::report::{
    FailureReason, NetReport, NetStatus, RouteReport, UnroutedSink, UNROUTED_SUMMARY,
};
use aion_config::RouterConfig;
use aion_device::{DeviceModel, TileWire, WireDirection};
use aion_diagnostics::{Diagnostic, DiagnosticSink, Location};
use std::collections::HashSet;

/// One routing session over a design.
pub(crate) struct MazeRouter<'a> {
    device: &'a dyn DeviceModel,
    config: &'a RouterConfig,
    sink: &'a DiagnosticSink,
    usage: UsageState,
    history: HistoryMap,
    statics: StaticSourceHandler,
    search: MazeSearch<'a>,
    report: RouteReport,
}

/// A net pin with its resolved device wire.
struct ResolvedPin<'d> {
    pin: &'d Pin,
    label: String,
    wire: Option<TileWire>,
}

impl<'a> MazeRouter<'a> {
    pub fn new(
        device: &'a dyn DeviceModel,
        config: &'a RouterConfig,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            device,
            config,
            sink,
            usage: UsageState::default(),
            history: HistoryMap::new(config.history_increment),
            statics: StaticSourceHandler::default(),
            search: MazeSearch::new(device, config),
            report: RouteReport::default(),
        }
    }

    /// Routes every net and returns the run summary.
    pub fn run(mut self, design: &mut Design) -> RouteReport {
        self.claim_prerouted(design);
        if self.config.reserve_pins {
            self.reserve_pins(design);
        }

        for id in routing_order(&design.nets) {
            let net_type = design.net(id).net_type;
            self.statics.enter(net_type, &mut self.usage);
            let pips = self.route_net(design, id);
            design.net_mut(id).pips.extend(pips);
        }
        self.statics.flush(&mut self.usage);
        log::debug!(
            "{} wires in use, {} wires with history",
            self.usage.used_count(),
            self.history.len()
        );

        log::info!(
            "routing finished: {} PIPs, {} unrouted sinks",
            self.report.pips,
            self.report.unrouted.len()
        );
        if !self.report.is_fully_routed() {
            let failed_nets: HashSet<&str> =
                self.report.unrouted.iter().map(|u| u.net.as_str()).collect();
            self.sink.emit(
                Diagnostic::warning(
                    UNROUTED_SUMMARY,
                    format!(
                        "{} sinks on {} nets left unrouted",
                        self.report.unrouted.len(),
                        failed_nets.len()
                    ),
                    Location::Unknown,
                )
                .with_note(format!("{} PIPs committed", self.report.pips)),
            );
        }
        self.report
    }

    /// Marks the PIP endpoints of nets that arrive routed.
    fn claim_prerouted(&mut self, design: &Design) {
        for net in design.nets.iter().filter(|n| n.is_prerouted()) {
            let owner = Owner::new(net.id, net.net_type);
            for pip in &net.pips {
                for wire in [TileWire::new(pip.tile, pip.start), TileWire::new(pip.tile, pip.end)] {
                    if let Some(other) = self.usage.used_by(wire) {
                        if other != net.id {
                            log::warn!("pre-routed nets {other} and {} both use {wire}", net.id);
                        }
                    }
                    self.usage.mark_used(wire, owner);
                }
            }
            log::debug!("net {} pre-routed with {} PIPs", net.name, net.pips.len());
        }
    }

    /// Reserves every resolvable pin wire for its net, first come first served.
    fn reserve_pins(&mut self, design: &Design) {
        for net in &design.nets {
            let owner = Owner::new(net.id, net.net_type);
            for pin in &net.pins {
                if let Some(wire) = resolve(self.device, design, pin) {
                    if !self.usage.reserve(wire, owner) {
                        log::debug!("pin wire {wire} of net {} already reserved", net.name);
                    }
                }
            }
        }
    }

    fn route_net(&mut self, design: &Design, id: NetId) -> Vec<Pip> {
        let net = design.net(id);
        let owner = Owner::new(net.id, net.net_type);
        let mut entry = NetReport {
            net: id,
            name: net.name.clone(),
            status: NetStatus::Routed,
            sinks_routed: 0,
            sinks_total: net.sinks().count(),
            pips: 0,
        };

        if net.is_prerouted() || net.pins.is_empty() {
            entry.status = if net.is_prerouted() {
                NetStatus::PreRouted
            } else {
                NetStatus::Empty
            };
            self.report.nets.push(entry);
            return Vec::new();
        }

        let sinks: Vec<ResolvedPin<'_>> = net
            .sinks()
            .map(|pin| ResolvedPin {
                pin,
                label: pin_label(design, pin),
                wire: resolve(self.device, design, pin),
            })
            .collect();

        let source = net.source().and_then(|pin| resolve(self.device, design, pin));
        let Some(source) = source else {
            let label = net
                .source()
                .map(|pin| pin_label(design, pin))
                .unwrap_or_else(|| "<none>".to_string());
            self.sink.emit(Diagnostic::error(
                FailureReason::UnresolvedSource.code(),
                format!("source pin {label} of net `{}` has no device wire", net.name),
                Location::net(&net.name),
            ));
            for s in &sinks {
                self.fail(net, s, FailureReason::UnresolvedSource, false);
            }
            entry.status = finish_status(0, entry.sinks_total);
            self.report.nets.push(entry);
            return Vec::new();
        };

        let clock_source = net
            .source()
            .and_then(|pin| design.instances.get(pin.instance.as_raw() as usize))
            .map(|instance| instance.kind.as_str())
            .is_some_and(|kind| {
                self.config
                    .clock_buffer_prefixes
                    .iter()
                    .any(|prefix| kind.starts_with(prefix.as_str()))
            });

        let mut committed: Vec<Pip> = Vec::new();
        for s in &sinks {
            let Some(target) = s.wire else {
                self.fail(net, s, FailureReason::UnresolvedSink, true);
                continue;
            };
            let clock_like = clock_source
                || self.device.wire_direction(target.wire) == WireDirection::Clock
                || self.is_clock_pin(&s.pin.name);

            let seeds = self.candidates(source, &committed, owner);
            if seeds.is_empty() {
                self.fail(net, s, FailureReason::NoCandidateSources, true);
                continue;
            }
            if seeds.contains(&target) {
                log::trace!("sink {} of net {} already on the tree", s.label, net.name);
                entry.sinks_routed += 1;
                continue;
            }

            let request = SearchRequest {
                seeds: &seeds,
                sink: target,
                owner,
                clock_like,
            };
            let outcome = self.search.run(&request, &self.usage, &self.history);
            self.report.nodes_expanded += self.search.expanded;
            match outcome {
                SearchOutcome::Found(path) => {
                    log::trace!(
                        "net {} sink {}: {} PIPs",
                        net.name,
                        s.label,
                        path.pips.len()
                    );
                    self.commit(&path, owner);
                    committed.extend_from_slice(&path.pips);
                    entry.sinks_routed += 1;
                }
                SearchOutcome::NodeCapExceeded => {
                    self.fail(net, s, FailureReason::NodeCapExceeded, true)
                }
                SearchOutcome::Exhausted => self.fail(net, s, FailureReason::NoPath, true),
            }
        }

        entry.pips = committed.len();
        entry.status = finish_status(entry.sinks_routed, entry.sinks_total);
        self.report.pips += committed.len();
        self.report.nets.push(entry);
        committed
    }

    /// Seeds for the next sink of a net.
    fn candidates(&self, source: TileWire, committed: &[Pip], owner: Owner) -> Vec<TileWire> {
        let mut seen = HashSet::new();
        let raw: Vec<TileWire> = if committed.is_empty() {
            vec![source]
        } else {
            committed
                .iter()
                .flat_map(|p| [TileWire::new(p.tile, p.start), TileWire::new(p.tile, p.end)])
                .filter(|w| seen.insert(*w))
                .collect()
        };
        raw.into_iter()
            .filter(|w| !self.usage.is_blocked(*w, owner))
            .collect()
    }

    fn is_clock_pin(&self, pin: &str) -> bool {
        let pin = pin.to_ascii_uppercase();
        self.config
            .clock_pin_names
            .iter()
            .any(|name| pin.contains(&name.to_ascii_uppercase()))
    }

    fn commit(&mut self, path: &FoundPath, owner: Owner) {
        let mut claimed: Vec<TileWire> = Vec::with_capacity(path.pips.len() * 2);
        for pip in &path.pips {
            claimed.push(TileWire::new(pip.tile, pip.start));
            claimed.push(TileWire::new(pip.tile, pip.end));
        }
        for &(from, to) in &path.route_throughs {
            claimed.push(from);
            claimed.push(to);
        }
        for wire in claimed {
            if owner.net_type.is_static() {
                self.statics.record(wire, owner);
            } else {
                self.usage.mark_used(wire, owner);
            }
        }
        for &wire in &path.wires {
            self.history.bump(wire);
        }
        self.report.route_throughs += path.route_throughs.len();
    }

    fn fail(&mut self, net: &Net, pin: &ResolvedPin<'_>, reason: FailureReason, emit: bool) {
        if emit {
            let message = match reason {
                FailureReason::UnresolvedSink => {
                    format!("sink pin {} has no device wire", pin.label)
                }
                _ => format!("could not route sink {}: {reason}", pin.label),
            };
            let instance = pin.label.split('.').next().unwrap_or_default();
            self.sink.emit(Diagnostic::error(
                reason.code(),
                message,
                Location::pin(&net.name, instance, &pin.pin.name),
            ));
        }
        log::debug!("net {} sink {} unrouted: {reason}", net.name, pin.label);
        self.report.unrouted.push(UnroutedSink {
            net: net.name.clone(),
            pin: pin.label.clone(),
            reason,
        });
    }
}

fn finish_status(routed: usize, total: usize) -> NetStatus {
    if routed == total {
        NetStatus::Routed
    } else if routed == 0 {
        NetStatus::Unrouted
    } else {
        NetStatus::Partial
    }
}

fn pin_label(design: &Design, pin: &Pin) -> String {
    let instance = design
        .instances
        .get(pin.instance.as_raw() as usize)
        .map_or("?", |i| i.name.as_str());
    format!("{instance}.{}", pin.name)
}

/// Maps a pin to its device wire through the instance's site.
fn resolve(device: &dyn DeviceModel, design: &Design, pin: &Pin) -> Option<TileWire> {
    let instance = design.instances.get(pin.instance.as_raw() as usize)?;
    let site = instance.site.as_deref()?;
    device.resolve_site_pin(site, &pin.name)
}
