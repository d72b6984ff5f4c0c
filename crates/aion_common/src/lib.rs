//! Shared foundational types used across the Aion routing back end.
//!
//! This crate provides structural hashing, the deduplicating [`InternPool`]
//! used to share identical device data between tiles, and the common result
//! types for internal errors.

#![warn(missing_docs)]

pub mod hash;
pub mod pool;
pub mod result;

pub use hash::StructuralHash;
pub use pool::InternPool;
pub use result::{AionResult, InternalError};
