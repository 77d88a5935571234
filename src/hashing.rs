//! Hash and equality capabilities plugged into a `BucketTable`.
//!
//! A table needs two things from its keys: a deterministic hash and an
//! equality relation consistent with it (`key_eq(a, b)` implies
//! `hash_key(a) == hash_key(b)`). Neither is checked at runtime.
//!
//! The defaults, [`OneAtATime`] and [`BytewiseEq`], treat keys as byte
//! strings and only apply to `K: AsRef<[u8]>`. Any other key type needs
//! either the [`StdHash`]/[`NativeEq`] adapters or plain closures.

use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Maps a key to an unsigned integer. Must be deterministic for the
/// lifetime of the table.
pub trait KeyHash<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
}

/// Resolves collisions inside a bucket. Must be an equivalence relation.
pub trait KeyEq<K: ?Sized> {
    fn key_eq(&self, a: &K, b: &K) -> bool;
}

impl<K: ?Sized, F> KeyHash<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

impl<K: ?Sized, F> KeyEq<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// One-byte-at-a-time hash built on Murmur's multiplicative mix.
///
/// Starts from 1 and for every byte `b` does `h ^= b; h *= 0x5bd1e995;
/// h ^= h >> 15` with wrapping arithmetic. Bytes are sign-extended before
/// mixing, so non-ASCII keys hash like a signed `char` string would.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneAtATime;

impl OneAtATime {
    const MIX: u64 = 0x5bd1e995;

    pub fn hash_bytes(bytes: &[u8]) -> u64 {
        bytes.iter().fold(1u64, |mut h, &b| {
            h ^= b as i8 as u64;
            h = h.wrapping_mul(Self::MIX);
            h ^ (h >> 15)
        })
    }
}

impl<K> KeyHash<K> for OneAtATime
where
    K: ?Sized + AsRef<[u8]>,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        Self::hash_bytes(key.as_ref())
    }
}

/// Byte-wise string equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BytewiseEq;

impl<K> KeyEq<K> for BytewiseEq
where
    K: ?Sized + AsRef<[u8]>,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a.as_ref() == b.as_ref()
    }
}

/// Hashes any `K: Hash` through a `BuildHasher`.
#[derive(Debug, Clone, Default)]
pub struct StdHash<S = RandomState> {
    build: S,
}

impl<S> StdHash<S> {
    pub fn with_hasher(build: S) -> Self {
        Self { build }
    }
}

impl<K, S> KeyHash<K> for StdHash<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.build.hash_one(key)
    }
}

/// Equality through `K: Eq`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeEq;

impl<K> KeyEq<K> for NativeEq
where
    K: ?Sized + Eq,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_at_a_time_known_values() {
        // Empty input leaves the seed untouched.
        assert_eq!(OneAtATime::hash_bytes(b""), 1);

        // Single byte, worked by hand: (1 ^ 'a') * MIX, then fold.
        let h = (1u64 ^ b'a' as u64).wrapping_mul(0x5bd1e995);
        assert_eq!(OneAtATime::hash_bytes(b"a"), h ^ (h >> 15));
    }

    #[test]
    fn one_at_a_time_is_deterministic_across_key_types() {
        let owned = String::from("Person 1");
        let borrowed: &str = "Person 1";
        assert_eq!(
            KeyHash::<String>::hash_key(&OneAtATime, &owned),
            KeyHash::<&str>::hash_key(&OneAtATime, &borrowed)
        );
        assert_ne!(
            OneAtATime::hash_bytes(b"Person 1"),
            OneAtATime::hash_bytes(b"Person 2")
        );
    }

    #[test]
    fn high_bytes_are_sign_extended() {
        let h = (1u64 ^ (0xffu8 as i8 as u64)).wrapping_mul(0x5bd1e995);
        assert_eq!(OneAtATime::hash_bytes(&[0xff]), h ^ (h >> 15));
    }

    #[test]
    fn bytewise_eq_compares_contents() {
        let a = String::from("abc");
        assert!(KeyEq::<str>::key_eq(&BytewiseEq, a.as_str(), "abc"));
        assert!(!KeyEq::<str>::key_eq(&BytewiseEq, "abc", "abd"));
        assert!(!KeyEq::<[u8]>::key_eq(&BytewiseEq, b"ab", b"abc"));
    }

    #[test]
    fn closures_are_capabilities() {
        let h = |k: &i32| *k as u64;
        let e = |a: &i32, b: &i32| a == b;
        assert_eq!(KeyHash::<i32>::hash_key(&h, &7), 7);
        assert!(KeyEq::<i32>::key_eq(&e, &3, &3));
        assert!(!KeyEq::<i32>::key_eq(&e, &3, &4));
    }

    #[test]
    fn std_adapters_agree_with_eq() {
        let h = StdHash::<RandomState>::default();
        assert_eq!(h.hash_key(&(1u32, 2u32)), h.hash_key(&(1u32, 2u32)));
        assert!(NativeEq.key_eq(&5u8, &5u8));
        assert!(!NativeEq.key_eq(&5u8, &6u8));
    }
}
