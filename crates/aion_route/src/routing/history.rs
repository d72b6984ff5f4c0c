//! History penalties for routing resources.
//!
//! Every wire on a committed path becomes a little more expensive for later
//! searches, nudging subsequent nets away from heavily used regions. The map
//! lives for one routing session.

use aion_device::TileWire;
use std::collections::HashMap;

/// Accumulated per-wire cost bias.
#[derive(Debug, Clone)]
pub(crate) struct HistoryMap {
    penalty: HashMap<TileWire, i32>,
    increment: i32,
}

impl HistoryMap {
    /// Creates an empty map that adds `increment` per use.
    pub fn new(increment: i32) -> Self {
        Self {
            penalty: HashMap::new(),
            increment,
        }
    }

    /// Returns the penalty of a wire (0 if never used).
    pub fn penalty(&self, wire: TileWire) -> i32 {
        self.penalty.get(&wire).copied().unwrap_or(0)
    }

    /// Records one more use of a wire.
    pub fn bump(&mut self, wire: TileWire) {
        let entry = self.penalty.entry(wire).or_insert(0);
        *entry = entry.saturating_add(self.increment);
    }

    /// Number of wires with a recorded penalty.
    pub fn len(&self) -> usize {
        self.penalty.len()
    }
}
