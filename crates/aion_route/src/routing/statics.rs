//! Ordering and deferred commits for power and ground nets.
//!
//! Nets are routed as `Gnd…, Vcc…, Wire…`, stable within each group. While a
//! static group is being routed its commits are held in a pending list that
//! the blocking check never sees, so nets of the group can share PIPs. When
//! the net list moves on to the next type the pending list is folded into
//! the usage table, and from then on those wires block everyone else.

use super::state::{Owner, UsageState};
use crate::design::{Net, NetType};
use crate::ids::NetId;
use aion_device::TileWire;

fn group_rank(net_type: NetType) -> u8 {
    match net_type {
        NetType::Gnd => 0,
        NetType::Vcc => 1,
        NetType::Wire => 2,
    }
}

/// Returns net ids in routing order.
pub(crate) fn routing_order(nets: &[Net]) -> Vec<NetId> {
    let mut order: Vec<&Net> = nets.iter().collect();
    order.sort_by_key(|net| group_rank(net.net_type));
    order.into_iter().map(|net| net.id).collect()
}

/// Tracks the current net type and the pending static commits.
#[derive(Debug, Default)]
pub(crate) struct StaticSourceHandler {
    current: Option<NetType>,
    pending: Vec<(TileWire, Owner)>,
}

impl StaticSourceHandler {
    /// Called before routing each net; folds pending commits on a type change.
    pub fn enter(&mut self, net_type: NetType, state: &mut UsageState) {
        if self.current != Some(net_type) {
            self.flush(state);
            self.current = Some(net_type);
        }
    }

    /// Holds a static net's wire until the group ends.
    pub fn record(&mut self, wire: TileWire, owner: Owner) {
        self.pending.push((wire, owner));
    }

    /// Folds every pending commit into the usage table.
    pub fn flush(&mut self, state: &mut UsageState) {
        if self.pending_len() > 0 {
            log::debug!("folding {} static wires into usage", self.pending_len());
        }
        for (wire, owner) in self.pending.drain(..) {
            state.mark_used(wire, owner);
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
