//! Locations of diagnostics in the design.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The design object a diagnostic refers to.
///
/// Routing problems have no source text to point at, so diagnostics name the
/// net or pin involved instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// No particular object (run-level messages).
    Unknown,
    /// A whole net.
    Net {
        /// The net name.
        net: String,
    },
    /// One pin of a net.
    Pin {
        /// The net name.
        net: String,
        /// The instance owning the pin.
        instance: String,
        /// The pin name on the instance.
        pin: String,
    },
}

impl Location {
    /// Returns `true` for [`Location::Unknown`].
    pub fn is_unknown(&self) -> bool {
        matches!(self, Location::Unknown)
    }

    /// Shorthand for a net location.
    pub fn net(net: impl Into<String>) -> Self {
        Location::Net { net: net.into() }
    }

    /// Shorthand for a pin location.
    pub fn pin(net: impl Into<String>, instance: impl Into<String>, pin: impl Into<String>) -> Self {
        Location::Pin {
            net: net.into(),
            instance: instance.into(),
            pin: pin.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unknown => write!(f, "<design>"),
            Location::Net { net } => write!(f, "net `{net}`"),
            Location::Pin { net, instance, pin } => write!(f, "net `{net}`, pin {instance}.{pin}"),
        }
    }
}
