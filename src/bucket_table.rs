//! BucketTable: fixed bucket array with per-bucket growable entry arrays.

use crate::bucket::{Bucket, Entry};
use crate::config::TableConfig;
use crate::error::TableError;
use crate::hashing::{BytewiseEq, KeyEq, KeyHash, OneAtATime};
use core::fmt;

struct Storage<K, V, H, E> {
    buckets: Box<[Bucket<K, V>]>,
    hasher: H,
    key_eq: E,
    len: usize,
}

impl<K, V, H, E> Storage<K, V, H, E>
where
    H: KeyHash<K>,
{
    #[inline]
    fn index_of(&self, key: &K) -> usize {
        (self.hasher.hash_key(key) % self.buckets.len() as u64) as usize
    }
}

/// A hash table with a fixed number of buckets chosen at allocation time.
///
/// The table starts out unallocated; [`allocate`](Self::allocate) or
/// [`with_config`](Self::with_config) give it storage, and
/// [`release`](Self::release) (or drop) returns it. Every data operation on
/// an unallocated table fails with [`TableError::NotInitialized`].
///
/// Keys and values are stored as given. Store references (`&str`, `&T`) to
/// keep payload ownership with the caller.
pub struct BucketTable<K, V, H = OneAtATime, E = BytewiseEq> {
    storage: Option<Storage<K, V, H, E>>,
}

/// Occupancy snapshot returned by [`BucketTable::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    pub bucket_count: usize,
    pub entries: usize,
    pub occupied_buckets: usize,
    pub longest_bucket: usize,
    pub total_capacity: usize,
}

impl TableStats {
    /// Entries per bucket.
    pub fn load_factor(&self) -> f64 {
        self.entries as f64 / self.bucket_count as f64
    }
}

impl<K, V, H, E> BucketTable<K, V, H, E> {
    /// An unallocated table.
    pub const fn new() -> Self {
        Self { storage: None }
    }

    pub fn is_allocated(&self) -> bool {
        self.storage.is_some()
    }

    /// Number of buckets, or `None` while unallocated.
    pub fn bucket_count(&self) -> Option<usize> {
        self.storage.as_ref().map(|s| s.buckets.len())
    }

    pub fn len(&self) -> usize {
        self.storage.as_ref().map_or(0, |s| s.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries per bucket; 0.0 while unallocated.
    pub fn load_factor(&self) -> f64 {
        self.stats().map_or(0.0, |s| s.load_factor())
    }

    /// Free every bucket. The table must be allocated again before reuse.
    pub fn release(&mut self) -> Result<(), TableError> {
        let storage = self.storage.take().ok_or(TableError::NotInitialized)?;
        log::debug!(
            "releasing table: {} buckets, {} entries",
            storage.buckets.len(),
            storage.len
        );
        drop(storage);
        Ok(())
    }

    /// Forget every entry while keeping each bucket's capacity.
    pub fn clear(&mut self) -> Result<(), TableError> {
        let storage = self.storage.as_mut().ok_or(TableError::NotInitialized)?;
        for bucket in storage.buckets.iter_mut() {
            bucket.clear();
        }
        storage.len = 0;
        Ok(())
    }

    /// Number of entries in bucket `i`, or `None` if unallocated or out of range.
    pub fn bucket_len(&self, i: usize) -> Option<usize> {
        self.storage.as_ref()?.buckets.get(i).map(Bucket::len)
    }

    /// Capacity of bucket `i`, or `None` if unallocated or out of range.
    pub fn bucket_capacity(&self, i: usize) -> Option<usize> {
        self.storage.as_ref()?.buckets.get(i).map(Bucket::capacity)
    }

    pub fn stats(&self) -> Option<TableStats> {
        let storage = self.storage.as_ref()?;
        let mut stats = TableStats {
            bucket_count: storage.buckets.len(),
            entries: storage.len,
            occupied_buckets: 0,
            longest_bucket: 0,
            total_capacity: 0,
        };
        for bucket in storage.buckets.iter() {
            if bucket.len() > 0 {
                stats.occupied_buckets += 1;
            }
            stats.longest_bucket = stats.longest_bucket.max(bucket.len());
            stats.total_capacity += bucket.capacity();
        }
        Some(stats)
    }

    /// Iterate over all entries in bucket order. Empty while unallocated.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let buckets: &[Bucket<K, V>] = match &self.storage {
            Some(s) => &s.buckets,
            None => &[],
        };
        Iter {
            buckets: buckets.iter(),
            current: Default::default(),
            remaining: self.len(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let remaining = self.len();
        let buckets: &mut [Bucket<K, V>] = match self.storage.as_mut() {
            Some(s) => &mut s.buckets,
            None => &mut [],
        };
        IterMut {
            buckets: buckets.iter_mut(),
            current: Default::default(),
            remaining,
        }
    }
}

impl<K, V, H, E> BucketTable<K, V, H, E>
where
    H: KeyHash<K>,
    E: KeyEq<K>,
{
    /// Allocate a table straight from `config`.
    pub fn with_config(config: TableConfig<H, E>) -> Result<Self, TableError> {
        let mut table = Self::new();
        table.allocate(config)?;
        Ok(table)
    }

    /// Give an unallocated table its buckets, each with capacity 1.
    ///
    /// On any failure the table is left unallocated; buckets reserved before
    /// the failure are freed.
    pub fn allocate(&mut self, config: TableConfig<H, E>) -> Result<(), TableError> {
        if self.storage.is_some() {
            return Err(TableError::AlreadyInitialized);
        }
        let n = config.validate()?;

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(n)
            .map_err(|e| TableError::allocation(n, e))?;
        for _ in 0..n {
            buckets.push(Bucket::try_new()?);
        }

        self.storage = Some(Storage {
            buckets: buckets.into_boxed_slice(),
            hasher: config.hasher,
            key_eq: config.key_eq,
            len: 0,
        });
        log::debug!("allocated table with {n} buckets");
        Ok(())
    }

    /// Index of the bucket `key` hashes to.
    pub fn bucket_of(&self, key: &K) -> Option<usize> {
        Some(self.storage.as_ref()?.index_of(key))
    }

    /// Insert or update. Returns the replaced value when `key` was present.
    ///
    /// Appending to a full bucket doubles that bucket's capacity; if the
    /// reservation fails nothing is stored and `AllocationFailure` is
    /// returned.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let storage = self.storage.as_mut().ok_or(TableError::NotInitialized)?;
        let idx = storage.index_of(&key);
        let prev = storage.buckets[idx].upsert(&storage.key_eq, key, value)?;
        if prev.is_none() {
            storage.len += 1;
        }
        Ok(prev)
    }

    pub fn insert_entry(&mut self, entry: Entry<K, V>) -> Result<Option<V>, TableError> {
        self.insert(entry.key, entry.value)
    }

    /// The stored entry for `key`.
    pub fn find_entry(&self, key: &K) -> Result<&Entry<K, V>, TableError> {
        let storage = self.storage.as_ref().ok_or(TableError::NotInitialized)?;
        let bucket = &storage.buckets[storage.index_of(key)];
        bucket
            .position(&storage.key_eq, key)
            .map(|i| &bucket.entries()[i])
            .ok_or(TableError::NotFound)
    }

    pub fn find(&self, key: &K) -> Result<&V, TableError> {
        self.find_entry(key).map(|e| &e.value)
    }

    /// Like [`find`](Self::find), but folds "not found" and "not
    /// allocated" into `None`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).ok()
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let storage = self.storage.as_mut()?;
        let idx = storage.index_of(key);
        let bucket = &mut storage.buckets[idx];
        let i = bucket.position(&storage.key_eq, key)?;
        Some(&mut bucket.entries_mut()[i].value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_entry(key).is_ok()
    }

    /// Remove `key`, closing the gap in its bucket. Capacity is kept and the
    /// remaining entries of the bucket keep their relative order.
    pub fn remove_entry(&mut self, key: &K) -> Result<Entry<K, V>, TableError> {
        let storage = self.storage.as_mut().ok_or(TableError::NotInitialized)?;
        let idx = storage.index_of(key);
        let bucket = &mut storage.buckets[idx];
        let i = bucket
            .position(&storage.key_eq, key)
            .ok_or(TableError::NotFound)?;
        let entry = bucket.take(i);
        storage.len -= 1;
        Ok(entry)
    }

    pub fn remove(&mut self, key: &K) -> Result<V, TableError> {
        self.remove_entry(key).map(|e| e.value)
    }
}

impl<K, V, H, E> Default for BucketTable<K, V, H, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H, E> fmt::Debug for BucketTable<K, V, H, E>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_allocated() {
            return f.write_str("BucketTable(unallocated)");
        }
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, H, E> IntoIterator for &'a BucketTable<K, V, H, E> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, H, E> IntoIterator for &'a mut BucketTable<K, V, H, E> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Iterator over `(&K, &V)`, bucket by bucket.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Bucket<K, V>>,
    current: core::slice::Iter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.current.next() {
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            self.current = self.buckets.next()?.entries().iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)`, bucket by bucket.
pub struct IterMut<'a, K, V> {
    buckets: core::slice::IterMut<'a, Bucket<K, V>>,
    current: core::slice::IterMut<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(Entry { key, value }) = self.current.next() {
                self.remaining -= 1;
                return Some((&*key, value));
            }
            self.current = self.buckets.next()?.entries_mut().iter_mut();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
