//! Design-wide wire usage for one routing session.

use crate::design::NetType;
use crate::ids::NetId;
use aion_device::TileWire;
use std::collections::HashMap;

/// The net holding a wire, with its type for static sharing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Owner {
    pub net: NetId,
    pub net_type: NetType,
}

impl Owner {
    pub fn new(net: NetId, net_type: NetType) -> Self {
        Self { net, net_type }
    }

    /// Returns `true` if `other` may use a wire held by this owner.
    ///
    /// A net may always reuse its own wires; power and ground nets may share
    /// with nets of the same static type.
    pub fn admits(&self, other: Owner) -> bool {
        self.net == other.net || (self.net_type.is_static() && self.net_type == other.net_type)
    }
}

/// Committed wire usage and pin reservations.
///
/// Written only when a search has fully succeeded, or before routing starts
/// for pre-routed nets and pin reservations.
#[derive(Debug, Default)]
pub(crate) struct UsageState {
    used: HashMap<TileWire, Owner>,
    reserved: HashMap<TileWire, Owner>,
}

impl UsageState {
    /// Marks a wire as used. The first owner keeps a wire.
    pub fn mark_used(&mut self, wire: TileWire, owner: Owner) {
        self.used.entry(wire).or_insert(owner);
    }

    /// Reserves a pin wire. Returns `false` if another net got there first.
    pub fn reserve(&mut self, wire: TileWire, owner: Owner) -> bool {
        let held = *self.reserved.entry(wire).or_insert(owner);
        held == owner
    }

    /// Returns `true` if `owner` may not use `wire`.
    pub fn is_blocked(&self, wire: TileWire, owner: Owner) -> bool {
        let denies = |held: Option<&Owner>| held.is_some_and(|h| !h.admits(owner));
        denies(self.used.get(&wire)) || denies(self.reserved.get(&wire))
    }

    /// Returns the net a wire is used by.
    pub fn used_by(&self, wire: TileWire) -> Option<NetId> {
        self.used.get(&wire).map(|o| o.net)
    }

    /// Number of used wires.
    pub fn used_count(&self) -> usize {
        self.used.len()
    }
}
