//! Structural hashing for value deduplication.

use std::fmt;
use std::hash::{Hash, Hasher};
use xxhash_rust::xxh3::Xxh3;

/// A 64-bit structural hash computed with XXH3 over a value's [`Hash`] impl.
///
/// Two values that compare equal always produce the same `StructuralHash`.
/// Used by [`InternPool`](crate::InternPool) to bucket candidate duplicates
/// before the full equality check.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuralHash(u64);

impl StructuralHash {
    /// Hashes any `Hash` value with XXH3.
    pub fn of<T: Hash + ?Sized>(value: &T) -> Self {
        let mut hasher = Xxh3::new();
        value.hash(&mut hasher);
        Self(hasher.finish())
    }
}

impl fmt::Debug for StructuralHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructuralHash({:08x}..)", self.0 >> 32)
    }
}
