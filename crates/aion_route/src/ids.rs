//! Opaque ID newtypes for design entities.
//!
//! [`InstanceId`] and [`NetId`] are thin `u32` wrappers used as indices into
//! the [`Design`](crate::Design). They are `Copy`, `Hash`, `Ord`, and
//! `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Index of a placed primitive instance in the design.
    InstanceId
);

define_id!(
    /// Index of a net in the design; also the owner tag in the router's
    /// usage tables.
    NetId
);
