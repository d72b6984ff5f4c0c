//! Wire name enumeration and direction classification.

use crate::ids::WireId;
use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// Coarse direction class of a wire, used by the router's clock bias.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireDirection {
    /// Travels toward higher rows.
    North,
    /// Travels toward lower rows.
    South,
    /// Travels toward higher columns.
    East,
    /// Travels toward lower columns.
    West,
    /// Dedicated clock distribution fabric.
    Clock,
    /// Local to a tile (site pins, crossbar internals).
    Internal,
}

impl WireDirection {
    /// Guesses a direction from a wire name.
    ///
    /// Names mentioning `CLK` are clock wires. Names that start with a run of
    /// compass letters followed by a digit (`N2BEG0`, `WW4END1`, `NE2BEG3`) take
    /// the direction of their first letter. Everything else is internal.
    pub fn classify(name: &str) -> Self {
        let upper = name.to_ascii_uppercase();
        if upper.contains("CLK") {
            return WireDirection::Clock;
        }
        let compass_len = upper
            .bytes()
            .take_while(|b| matches!(b, b'N' | b'S' | b'E' | b'W'))
            .count();
        let followed_by_digit = upper
            .as_bytes()
            .get(compass_len)
            .is_some_and(|b| b.is_ascii_digit());
        if compass_len == 0 || !followed_by_digit {
            return WireDirection::Internal;
        }
        match upper.as_bytes()[0] {
            b'N' => WireDirection::North,
            b'S' => WireDirection::South,
            b'E' => WireDirection::East,
            _ => WireDirection::West,
        }
    }
}

/// Bidirectional mapping between wire names and dense [`WireId`]s.
///
/// One enumerator exists per device family and is shared (via `Arc`) by every
/// device of that family. Names are interned with [`lasso::ThreadedRodeo`];
/// the direction of each wire is stored alongside, indexed by id.
pub struct WireEnumerator {
    family: String,
    rodeo: ThreadedRodeo<WireId>,
    directions: Vec<WireDirection>,
}

impl WireEnumerator {
    /// Creates an empty enumerator for a device family.
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            rodeo: ThreadedRodeo::new(),
            directions: Vec::new(),
        }
    }

    /// Returns the device family this enumerator belongs to.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Interns a wire name, classifying its direction from the name if new.
    pub fn get_or_intern(&mut self, name: &str) -> WireId {
        self.define(name, None)
    }

    /// Interns a wire name with an explicit direction.
    ///
    /// An explicit direction overrides whatever was recorded before; `None`
    /// keeps an existing direction or classifies a new wire by name.
    pub fn define(&mut self, name: &str, direction: Option<WireDirection>) -> WireId {
        let id = self.rodeo.get_or_intern(name);
        let index = id.as_raw() as usize;
        if index >= self.directions.len() {
            self.directions.resize(index + 1, WireDirection::Internal);
            self.directions[index] = direction.unwrap_or_else(|| WireDirection::classify(name));
        } else if let Some(direction) = direction {
            self.directions[index] = direction;
        }
        id
    }

    /// Looks up the id of an already interned wire name.
    pub fn wire(&self, name: &str) -> Option<WireId> {
        self.rodeo.get(name)
    }

    /// Resolves a wire id back to its name.
    pub fn name_of(&self, wire: WireId) -> Option<&str> {
        self.rodeo.try_resolve(&wire)
    }

    /// Returns the direction class of a wire (`Internal` for unknown ids).
    pub fn direction(&self, wire: WireId) -> WireDirection {
        self.directions
            .get(wire.as_raw() as usize)
            .copied()
            .unwrap_or(WireDirection::Internal)
    }

    /// Returns the number of distinct wire names.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if no wire has been interned.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl std::fmt::Debug for WireEnumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireEnumerator")
            .field("family", &self.family)
            .field("wires", &self.rodeo.len())
            .finish()
    }
}
