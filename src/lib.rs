//! bucket-table: a hash table with a fixed number of buckets, each bucket
//! an ordered, growable array of key/value entries.
//!
//! ```
//! use bucket_table::{BucketTable, TableConfig, TableError};
//!
//! let mut people = BucketTable::new();
//! people.allocate(TableConfig::new()).unwrap();
//! people.insert("Person 1", "Paul").unwrap();
//! people.insert("Person 2", "Jean").unwrap();
//! assert_eq!(people.find(&"Person 1"), Ok(&"Paul"));
//!
//! people.remove(&"Person 1").unwrap();
//! assert_eq!(people.find(&"Person 1"), Err(TableError::NotFound));
//! assert_eq!(people.find(&"Person 2"), Ok(&"Jean"));
//!
//! // Non-string keys bring their own hash and equality.
//! let (k1, k2, v1, v2) = (1, 2, 2, 4);
//! let mut ids = BucketTable::with_config(
//!     TableConfig::new()
//!         .hasher(|k: &&i32| **k as u64)
//!         .key_eq(|a: &&i32, b: &&i32| a == b),
//! )
//! .unwrap();
//! ids.insert(&k1, &v1).unwrap();
//! ids.insert(&k2, &v2).unwrap();
//! assert_eq!(ids.find(&&k1).copied(), Ok(&2));
//! ```
//!
//! Internal Design:
//!
//! Summary
//! - Layers:
//!   - `Bucket<K, V>`: a `Vec` of entries with explicit doubling growth
//!     (fallible reservation) and gap-closing removal. Capacity starts
//!     at 1 and never shrinks.
//!   - `BucketTable<K, V, H, E>`: owns `bucket_count` buckets plus the hash
//!     (`H: KeyHash<K>`) and equality (`E: KeyEq<K>`) capabilities. A key
//!     lives in bucket `hash(key) % bucket_count`.
//!
//! Constraints
//! - The bucket count is fixed at allocation; there is no rehashing. Load
//!   (entries per bucket) is reported but not managed.
//! - Unique keys: inserting an existing key overwrites its value in place.
//! - Allocated or not, nothing in between: storage lives in an
//!   `Option`, and a failed `allocate` leaves it `None`.
//! - Single-threaded. Mutation takes `&mut self`; share across threads
//!   behind a lock.
//!
//! Ownership
//! - The table owns its bucket array and each bucket's entry buffer. Keys
//!   and values are stored as given: storing `&T` keeps payload ownership
//!   with the caller, and the borrow checker ties the payloads' lifetime to
//!   the table's.
//! - References returned by lookups borrow the table, so a bucket
//!   reallocation on insert can never leave one dangling.
//!
//! Reentrancy
//! - Lookups take `&self` and mutation takes `&mut self`, so a hash or
//!   equality capability can read the table it is serving (through an
//!   `Rc`/`Weak`, say) but never observe a bucket mid-update. No runtime
//!   guard is kept, and `BucketTable` is `Send`/`Sync` exactly when its
//!   keys, values and capabilities are.
//!
//! Defaults and their limits
//! - `OneAtATime` and `BytewiseEq` only make sense for byte-string keys
//!   (`K: AsRef<[u8]>`). Other key types pass closures or the
//!   `StdHash`/`NativeEq` adapters. Equality must agree with the hash;
//!   this is not checked.

mod bucket;
mod bucket_table;
mod bucket_table_proptest;
mod config;
mod error;
pub mod hashing;

// Public surface
pub use bucket::{Entry, INITIAL_BUCKET_CAPACITY};
pub use bucket_table::{BucketTable, Iter, IterMut, TableStats};
pub use config::{TableConfig, DEFAULT_BUCKET_COUNT, MAX_BUCKET_COUNT};
pub use error::TableError;
pub use hashing::{BytewiseEq, KeyEq, KeyHash, NativeEq, OneAtATime, StdHash};
