//! TableConfig: construction-time knobs for `BucketTable::allocate`.

use crate::error::TableError;
use crate::hashing::{BytewiseEq, OneAtATime};

/// Bucket count used when none is configured.
pub const DEFAULT_BUCKET_COUNT: usize = 1024;

/// Largest bucket count a table accepts.
pub const MAX_BUCKET_COUNT: usize = 1 << 16;

/// Bucket count, hash capability and equality capability for a table.
///
/// ```
/// use bucket_table::TableConfig;
///
/// let cfg = TableConfig::new()
///     .bucket_count(64)
///     .hasher(|k: &u32| *k as u64)
///     .key_eq(|a: &u32, b: &u32| a == b);
/// assert_eq!(cfg.buckets(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig<H = OneAtATime, E = BytewiseEq> {
    bucket_count: Option<usize>,
    pub(crate) hasher: H,
    pub(crate) key_eq: E,
}

impl TableConfig {
    pub fn new() -> Self {
        Self {
            bucket_count: None,
            hasher: OneAtATime,
            key_eq: BytewiseEq,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, E> TableConfig<H, E> {
    /// Override the bucket count. Must be in `1..=MAX_BUCKET_COUNT`.
    pub fn bucket_count(mut self, n: usize) -> Self {
        self.bucket_count = Some(n);
        self
    }

    pub fn hasher<H2>(self, hasher: H2) -> TableConfig<H2, E> {
        TableConfig {
            bucket_count: self.bucket_count,
            hasher,
            key_eq: self.key_eq,
        }
    }

    pub fn key_eq<E2>(self, key_eq: E2) -> TableConfig<H, E2> {
        TableConfig {
            bucket_count: self.bucket_count,
            hasher: self.hasher,
            key_eq,
        }
    }

    /// The bucket count this configuration resolves to.
    pub fn buckets(&self) -> usize {
        self.bucket_count.unwrap_or(DEFAULT_BUCKET_COUNT)
    }

    pub(crate) fn validate(&self) -> Result<usize, TableError> {
        match self.buckets() {
            0 => Err(TableError::InvalidArgument {
                reason: "bucket count must be non-zero",
            }),
            n if n > MAX_BUCKET_COUNT => Err(TableError::InvalidArgument {
                reason: "bucket count exceeds MAX_BUCKET_COUNT",
            }),
            n => Ok(n),
        }
    }
}
