#![cfg(test)]

// Property tests for BucketTable kept inside the crate so the per-bucket
// length/capacity invariants can be checked after every step.

use crate::bucket_table::BucketTable;
use crate::config::TableConfig;
use crate::error::TableError;
use crate::hashing::{KeyEq, KeyHash};
use hashbrown::HashMap;
use proptest::prelude::*;
use std::collections::BTreeSet;

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Find(usize),
    Mutate(usize, i32),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Find),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: state-machine equivalence against a hashbrown model.
// Invariants checked after every op:
// - `insert` returns the previous model value; no key is ever duplicated.
// - `find`/`remove` return `NotFound` exactly when the model lacks the key.
// - per-bucket lengths sum to `len`; capacity >= length, is a power of two
//   (starts at 1, only doubles) and never decreases, including across clear.
fn run_scenario<H, E>(
    mut sut: BucketTable<String, i32, H, E>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    H: KeyHash<String>,
    E: KeyEq<String>,
{
    let buckets = sut.bucket_count().expect("allocated");
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut caps: Vec<usize> = (0..buckets)
        .map(|i| sut.bucket_capacity(i).unwrap())
        .collect();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i].clone();
                let expected = model.insert(k.clone(), v);
                prop_assert_eq!(sut.insert(k, v), Ok(expected));
            }
            Op::Remove(i) => {
                let k = &pool[i];
                match model.remove(k) {
                    Some(mv) => prop_assert_eq!(sut.remove(k), Ok(mv)),
                    None => prop_assert_eq!(sut.remove(k), Err(TableError::NotFound)),
                }
            }
            Op::Find(i) => {
                let k = &pool[i];
                match model.get(k) {
                    Some(mv) => prop_assert_eq!(sut.find(k), Ok(mv)),
                    None => prop_assert_eq!(sut.find(k), Err(TableError::NotFound)),
                }
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.wrapping_add(d);
                        *mv = mv.wrapping_add(d);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "presence mismatch: {:?} vs {:?}", s, m),
                }
            }
            Op::Clear => {
                sut.clear().unwrap();
                model.clear();
            }
            Op::Iterate => {
                let s_keys: BTreeSet<&String> = sut.iter().map(|(k, _)| k).collect();
                let m_keys: BTreeSet<&String> = model.keys().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.iter().count(), model.len());

        let mut total = 0;
        for (i, prev) in caps.iter_mut().enumerate() {
            let len = sut.bucket_len(i).unwrap();
            let cap = sut.bucket_capacity(i).unwrap();
            prop_assert!(cap >= len);
            prop_assert!(cap.is_power_of_two());
            prop_assert!(cap >= *prev, "bucket {} shrank from {} to {}", i, prev, cap);
            *prev = cap;
            total += len;
        }
        prop_assert_eq!(total, model.len());

        for (k, v) in &model {
            let idx = sut.bucket_of(k).unwrap();
            prop_assert!(sut.bucket_len(idx).unwrap() >= 1);
            prop_assert_eq!(sut.get(k), Some(v));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), buckets in 1usize..=16) {
        let sut = BucketTable::with_config(TableConfig::new().bucket_count(buckets)).unwrap();
        run_scenario(sut, pool, ops)?;
    }
}

// Same invariants with every key in one bucket, so growth and compaction
// are exercised on every step.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = BucketTable::with_config(
            TableConfig::new()
                .bucket_count(4)
                .hasher(|_: &String| 3u64)
                .key_eq(|a: &String, b: &String| a == b),
        )
        .unwrap();
        run_scenario(sut, pool, ops)?;
    }
}
