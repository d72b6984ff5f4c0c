//! Per-tile adjacency table keyed by wire id.
//!
//! The table is open addressing over a power-of-two slot array. A lookup
//! starts at `wire & mask` and steps by 3 slots until it finds the key or an
//! empty slot; since 3 is odd the step sequence visits every slot. Removal
//! rebuilds the table, so there are never tombstones and an empty slot always
//! ends a lookup.

use crate::connection::WireConnection;
use crate::error::DeviceError;
use crate::ids::WireId;
use aion_common::InternPool;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

const SLOT_STEP: usize = 3;
const LOAD_FACTOR: f64 = 0.85;
const MIN_CAPACITY: usize = 4;

/// Largest slot count a table may be created with.
pub const MAX_CAPACITY: usize = 1 << 26;

#[derive(Clone)]
struct Entry {
    wire: WireId,
    connections: Arc<[WireConnection]>,
}

/// Open-addressing map from a wire to the connections leaving it.
///
/// A key present in the table always maps to a non-empty list; storing an
/// empty list removes the key. Wire id 0 is an ordinary key.
#[derive(Clone)]
pub struct WireTable {
    slots: Box<[Option<Entry>]>,
    len: usize,
}

impl WireTable {
    /// Creates an empty table with the minimum capacity.
    pub fn new() -> Self {
        Self::empty_slots(MIN_CAPACITY)
    }

    /// Creates an empty table with at least `capacity` slots.
    ///
    /// The slot count is rounded up to a power of two. Requests above
    /// [`MAX_CAPACITY`] fail.
    pub fn with_capacity(capacity: usize) -> Result<Self, DeviceError> {
        if capacity > MAX_CAPACITY {
            return Err(DeviceError::InvalidCapacity {
                requested: capacity,
                max: MAX_CAPACITY,
            });
        }
        Ok(Self::empty_slots(capacity.max(MIN_CAPACITY).next_power_of_two()))
    }

    fn empty_slots(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Number of keys in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Finds the slot holding `wire`, or the empty slot where it would go.
    fn slot_of(&self, wire: WireId) -> usize {
        let mask = self.mask();
        let mut index = wire.as_raw() as usize & mask;
        loop {
            match &self.slots[index] {
                Some(entry) if entry.wire != wire => index = (index + SLOT_STEP) & mask,
                _ => return index,
            }
        }
    }

    /// Returns the connections leaving `wire`.
    pub fn get(&self, wire: WireId) -> Option<&[WireConnection]> {
        self.slots[self.slot_of(wire)]
            .as_ref()
            .map(|entry| &*entry.connections)
    }

    /// Returns `true` if `wire` has connections.
    pub fn contains(&self, wire: WireId) -> bool {
        self.get(wire).is_some()
    }

    /// Inserts or replaces the connections of `wire`.
    ///
    /// An empty list removes the key.
    pub fn put(&mut self, wire: WireId, connections: impl Into<Arc<[WireConnection]>>) {
        let connections = connections.into();
        if connections.is_empty() {
            self.remove(wire);
            return;
        }
        let index = self.slot_of(wire);
        if let Some(entry) = &mut self.slots[index] {
            entry.connections = connections;
            return;
        }
        if (self.len + 1) as f64 > self.capacity() as f64 * LOAD_FACTOR {
            self.rehash(self.capacity() * 2);
            let index = self.slot_of(wire);
            self.slots[index] = Some(Entry { wire, connections });
        } else {
            self.slots[index] = Some(Entry { wire, connections });
        }
        self.len += 1;
    }

    /// Removes `wire`, returning its connections.
    pub fn remove(&mut self, wire: WireId) -> Option<Arc<[WireConnection]>> {
        let index = self.slot_of(wire);
        let removed = self.slots[index].take()?;
        self.rehash(self.capacity());
        self.len -= 1;
        Some(removed.connections)
    }

    /// Moves every live entry into a fresh slot array of `capacity` slots.
    fn rehash(&mut self, capacity: usize) {
        let old = std::mem::replace(&mut self.slots, vec![None; capacity].into_boxed_slice());
        for entry in old.into_vec().into_iter().flatten() {
            let index = self.slot_of(entry.wire);
            self.slots[index] = Some(entry);
        }
    }

    /// Iterates `(wire, connections)` in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (WireId, &[WireConnection])> {
        self.slots
            .iter()
            .flatten()
            .map(|entry| (entry.wire, &*entry.connections))
    }

    /// Returns every entry ordered by wire id.
    pub fn sorted_entries(&self) -> Vec<(WireId, &[WireConnection])> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|(wire, _)| *wire);
        entries
    }

    /// Replaces every connection list with its canonical copy from `pool`.
    pub fn intern_connections(&mut self, pool: &mut InternPool<[WireConnection]>) {
        for entry in self.slots.iter_mut().flatten() {
            entry.connections = pool.intern(Arc::clone(&entry.connections));
        }
    }
}

impl Default for WireTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for WireTable {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter()
                .all(|(wire, connections)| other.get(wire) == Some(connections))
    }
}

impl Eq for WireTable {}

impl Hash for WireTable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for (wire, connections) in self.sorted_entries() {
            wire.hash(state);
            connections.hash(state);
        }
    }
}

impl std::fmt::Debug for WireTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.sorted_entries()).finish()
    }
}
