//! Summary of one routing run.

use crate::ids::NetId;
use aion_diagnostics::{Category, DiagnosticCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source pin could not be mapped to a device wire.
pub const UNRESOLVED_SOURCE: DiagnosticCode = DiagnosticCode::new(Category::Route, 1);
/// Sink pin could not be mapped to a device wire.
pub const UNRESOLVED_SINK: DiagnosticCode = DiagnosticCode::new(Category::Route, 2);
/// A sink search popped more nodes than allowed.
pub const NODE_CAP_EXCEEDED: DiagnosticCode = DiagnosticCode::new(Category::Route, 3);
/// A sink search ran out of frontier.
pub const NO_PATH: DiagnosticCode = DiagnosticCode::new(Category::Route, 4);
/// Every candidate source of a sink is held by another net.
pub const NO_CANDIDATE_SOURCES: DiagnosticCode = DiagnosticCode::new(Category::Route, 5);
/// End-of-run summary when anything stayed unrouted.
pub const UNROUTED_SUMMARY: DiagnosticCode = DiagnosticCode::new(Category::Route, 10);

/// Why a sink was left unrouted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// The net's source pin did not resolve.
    UnresolvedSource,
    /// The sink pin did not resolve.
    UnresolvedSink,
    /// The search hit the node expansion cap.
    NodeCapExceeded,
    /// The search frontier ran empty.
    NoPath,
    /// No usable candidate source remained.
    NoCandidateSources,
}

impl FailureReason {
    /// The diagnostic code reported for this failure.
    pub fn code(self) -> DiagnosticCode {
        match self {
            FailureReason::UnresolvedSource => UNRESOLVED_SOURCE,
            FailureReason::UnresolvedSink => UNRESOLVED_SINK,
            FailureReason::NodeCapExceeded => NODE_CAP_EXCEEDED,
            FailureReason::NoPath => NO_PATH,
            FailureReason::NoCandidateSources => NO_CANDIDATE_SOURCES,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureReason::UnresolvedSource => "source pin not found in device",
            FailureReason::UnresolvedSink => "sink pin not found in device",
            FailureReason::NodeCapExceeded => "search node limit exceeded",
            FailureReason::NoPath => "no path",
            FailureReason::NoCandidateSources => "no candidate sources",
        };
        f.write_str(text)
    }
}

/// Final state of one net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetStatus {
    /// Every sink connected.
    Routed,
    /// Some sinks connected.
    Partial,
    /// No sink connected.
    Unrouted,
    /// Arrived with PIPs and was left alone.
    PreRouted,
    /// Has no pins.
    Empty,
}

/// Outcome of one net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetReport {
    /// The net.
    pub net: NetId,
    /// Net name.
    pub name: String,
    /// Final state.
    pub status: NetStatus,
    /// Sinks connected in this run.
    pub sinks_routed: usize,
    /// Sinks on the net.
    pub sinks_total: usize,
    /// PIPs committed in this run.
    pub pips: usize,
}

/// A sink left unrouted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnroutedSink {
    /// Net name.
    pub net: String,
    /// `instance.pin` of the sink.
    pub pin: String,
    /// Why routing failed.
    pub reason: FailureReason,
}

/// Everything a routing run produced besides the PIPs themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteReport {
    /// Per-net outcomes, in routing order.
    pub nets: Vec<NetReport>,
    /// Unrouted sinks, in the order they failed.
    pub unrouted: Vec<UnroutedSink>,
    /// PIPs committed in this run.
    pub pips: usize,
    /// Route-through edges used.
    pub route_throughs: usize,
    /// Nodes popped across all searches.
    pub nodes_expanded: usize,
}

impl RouteReport {
    /// Returns `true` if no sink was left unrouted.
    pub fn is_fully_routed(&self) -> bool {
        self.unrouted.is_empty()
    }

    /// Returns the outcome of a net, if it was visited.
    pub fn net(&self, net: NetId) -> Option<&NetReport> {
        self.nets.iter().find(|r| r.net == net)
    }

    /// Counts nets with a given status.
    pub fn count(&self, status: NetStatus) -> usize {
        self.nets.iter().filter(|r| r.status == status).count()
    }
}

impl fmt::Display for RouteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "routed {} of {} nets ({} partial, {} pre-routed), {} PIPs, {} route-throughs, {} nodes expanded",
            self.count(NetStatus::Routed),
            self.nets.len(),
            self.count(NetStatus::Partial),
            self.count(NetStatus::PreRouted),
            self.pips,
            self.route_throughs,
            self.nodes_expanded,
        )?;
        for sink in &self.unrouted {
            writeln!(f, "  unrouted: net `{}` pin {}: {}", sink.net, sink.pin, sink.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let reasons = [
            FailureReason::UnresolvedSource,
            FailureReason::UnresolvedSink,
            FailureReason::NodeCapExceeded,
            FailureReason::NoPath,
            FailureReason::NoCandidateSources,
        ];
        let codes: Vec<String> = reasons.iter().map(|r| r.code().to_string()).collect();
        assert_eq!(codes, vec!["R001", "R002", "R003", "R004", "R005"]);
    }

    #[test]
    fn display_lists_unrouted() {
        let report = RouteReport {
            nets: vec![NetReport {
                net: NetId::from_raw(0),
                name: "n0".into(),
                status: NetStatus::Partial,
                sinks_routed: 1,
                sinks_total: 2,
                pips: 3,
            }],
            unrouted: vec![UnroutedSink {
                net: "n0".into(),
                pin: "b.A1".into(),
                reason: FailureReason::NoPath,
            }],
            pips: 3,
            route_throughs: 0,
            nodes_expanded: 12,
        };
        let text = report.to_string();
        assert!(text.starts_with("routed 0 of 1 nets (1 partial, 0 pre-routed), 3 PIPs"));
        assert!(text.contains("unrouted: net `n0` pin b.A1: no path"));
        assert!(!report.is_fully_routed());
    }

    #[test]
    fn lookup_by_net() {
        let mut report = RouteReport::default();
        assert!(report.is_fully_routed());
        report.nets.push(NetReport {
            net: NetId::from_raw(4),
            name: "x".into(),
            status: NetStatus::Empty,
            sinks_routed: 0,
            sinks_total: 0,
            pips: 0,
        });
        assert_eq!(report.net(NetId::from_raw(4)).map(|r| r.status), Some(NetStatus::Empty));
        assert!(report.net(NetId::from_raw(5)).is_none());
    }
}
