//! Bucket: one slot of the table, an ordered growable array of entries.
//!
//! Capacity starts at [`INITIAL_BUCKET_CAPACITY`] and doubles whenever an
//! append finds the bucket full. It never shrinks: `clear` and `remove`
//! only touch the length.

use crate::error::TableError;
use crate::hashing::KeyEq;
use std::collections::TryReserveError;

/// Capacity every bucket is pre-allocated with.
pub const INITIAL_BUCKET_CAPACITY: usize = 1;

/// A stored key/value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self { key, value }
    }
}

#[derive(Debug)]
pub(crate) struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Bucket<K, V> {
    pub(crate) fn try_new() -> Result<Self, TableError> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(INITIAL_BUCKET_CAPACITY)
            .map_err(|e| TableError::allocation(INITIAL_BUCKET_CAPACITY, e))?;
        Ok(Self { entries })
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    #[inline]
    pub(crate) fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    #[inline]
    pub(crate) fn entries_mut(&mut self) -> &mut [Entry<K, V>] {
        &mut self.entries
    }

    pub(crate) fn position<E>(&self, eq: &E, key: &K) -> Option<usize>
    where
        E: KeyEq<K>,
    {
        self.entries.iter().position(|e| eq.key_eq(key, &e.key))
    }

    /// Overwrite the value of an existing key, or append a new entry.
    ///
    /// Appending to a full bucket doubles its capacity first. If that
    /// reservation fails the bucket is left untouched and the entry is
    /// dropped along with the error.
    pub(crate) fn upsert<E>(&mut self, eq: &E, key: K, value: V) -> Result<Option<V>, TableError>
    where
        E: KeyEq<K>,
    {
        if let Some(i) = self.position(eq, &key) {
            return Ok(Some(core::mem::replace(&mut self.entries[i].value, value)));
        }
        self.grow_if_full()?;
        self.entries.push(Entry { key, value });
        Ok(None)
    }

    fn grow_if_full(&mut self) -> Result<(), TableError> {
        let cap = self.entries.capacity();
        if self.entries.len() < cap {
            return Ok(());
        }
        // `cap` extra slots doubles the buffer. A zero capacity only happens
        // for a bucket built without `try_new`.
        let extra = cap.max(INITIAL_BUCKET_CAPACITY);
        reserve_exact(&mut self.entries, extra)
            .map_err(|e| TableError::allocation(cap + extra, e))?;
        log::debug!("bucket grown from {} to {} entries", cap, self.entries.capacity());
        Ok(())
    }

    /// Remove the entry at `i`, shifting the `len - i - 1` entries after it
    /// down by one. Capacity is kept.
    pub(crate) fn take(&mut self, i: usize) -> Entry<K, V> {
        self.entries.remove(i)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
thread_local! {
    static GROWTH_REFUSED: core::cell::Cell<bool> = const { core::cell::Cell::new(false) };
}

fn reserve_exact<T>(buf: &mut Vec<T>, extra: usize) -> Result<(), TryReserveError> {
    #[cfg(test)]
    if GROWTH_REFUSED.with(|r| r.get()) {
        // A real reservation error: more than `isize::MAX` bytes.
        return Vec::<u8>::new().try_reserve_exact(usize::MAX);
    }
    buf.try_reserve_exact(extra)
}

/// Run `f` with every bucket growth on this thread failing.
#[cfg(test)]
pub(crate) fn refuse_growth<R>(f: impl FnOnce() -> R) -> R {
    GROWTH_REFUSED.with(|r| r.set(true));
    let out = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    GROWTH_REFUSED.with(|r| r.set(false));
    out.unwrap_or_else(|p| std::panic::resume_unwind(p))
}
