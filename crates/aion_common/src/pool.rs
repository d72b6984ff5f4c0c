//! Deduplicating pool of canonical shared values.

use crate::hash::StructuralHash;
use crate::result::{AionResult, InternalError};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// A deduplicating pool that keeps one canonical [`Arc`] per distinct value.
///
/// Values are bucketed by their [`StructuralHash`] and compared with `Eq`
/// inside a bucket, so hash collisions never merge unequal values. Every
/// canonical value gets a stable dense enumeration in insertion order.
///
/// Device construction interns whole per-tile wire tables, connection arrays,
/// and tile descriptors through pools like this one, which is how tiles of
/// the same kind end up sharing a single physical copy.
pub struct InternPool<T: ?Sized> {
    index: HashMap<StructuralHash, Vec<u32>>,
    values: Vec<Arc<T>>,
}

impl<T: ?Sized + Hash + Eq> InternPool<T> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// Interns a value, returning the canonical instance.
    ///
    /// If a structurally equal value is already pooled, that instance is
    /// returned and `value` is dropped. Otherwise `value` itself becomes the
    /// canonical instance.
    pub fn intern(&mut self, value: impl Into<Arc<T>>) -> Arc<T> {
        self.intern_enumerated(value).1
    }

    /// Interns a value and also returns its enumeration.
    pub fn intern_enumerated(&mut self, value: impl Into<Arc<T>>) -> (u32, Arc<T>) {
        let value = value.into();
        let hash = StructuralHash::of(&*value);
        let bucket = self.index.entry(hash).or_default();
        for &enumeration in bucket.iter() {
            let existing = &self.values[enumeration as usize];
            if **existing == *value {
                return (enumeration, Arc::clone(existing));
            }
        }
        let enumeration = self.values.len() as u32;
        bucket.push(enumeration);
        self.values.push(Arc::clone(&value));
        (enumeration, value)
    }

    /// Returns the canonical instance equal to `value`, if one was interned.
    pub fn find(&self, value: &T) -> Option<&Arc<T>> {
        let bucket = self.index.get(&StructuralHash::of(value))?;
        bucket
            .iter()
            .map(|&e| &self.values[e as usize])
            .find(|existing| ***existing == *value)
    }

    /// Returns the enumeration of a previously interned value.
    ///
    /// Asking for a value that was never interned is a caller bug and is
    /// reported as an [`InternalError`].
    pub fn enumeration_of(&self, value: &T) -> AionResult<u32> {
        let bucket = self
            .index
            .get(&StructuralHash::of(value))
            .ok_or_else(|| InternalError::new("enumeration requested for a value never interned"))?;
        bucket
            .iter()
            .copied()
            .find(|&e| *self.values[e as usize] == *value)
            .ok_or_else(|| InternalError::new("enumeration requested for a value never interned"))
    }

    /// Returns the canonical instance with the given enumeration.
    pub fn get(&self, enumeration: u32) -> Option<&Arc<T>> {
        self.values.get(enumeration as usize)
    }

    /// Returns the number of distinct values in the pool.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates canonical values in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.values.iter()
    }
}

impl<T: ?Sized + Hash + Eq> Default for InternPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for InternPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InternPool")
            .field("len", &self.values.len())
            .finish()
    }
}
