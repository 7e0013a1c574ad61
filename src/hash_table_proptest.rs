#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can reach the
// link-integrity checks on chains.

use crate::error::TableError;
use crate::hash_table::HashTable;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hasher;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum Op {
    Set(usize, i32),
    Get(usize),
    Bump(usize, i32),
    Delete(usize),
    Contains(String),
    Items,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<Op>)> {
    (1usize..=9, proptest::collection::vec("[a-z]{0,5}", 1..=10)).prop_flat_map(
        |(buckets, pool)| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let contains_pool = proptest::sample::select(pool.clone());
            let op = prop_oneof![
                3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
                1 => idx.clone().prop_map(Op::Get),
                1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Bump(i, d)),
                2 => idx.clone().prop_map(Op::Delete),
                1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(Op::Contains),
                1 => Just(Op::Items),
            ];
            proptest::collection::vec(op, 1..80)
                .prop_map(move |ops| (buckets, pool.clone(), ops))
        },
    )
}

// Drive `sut` and a std HashMap model through the same ops and compare.
fn run_against_model<S>(
    mut sut: HashTable<Key, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher + Clone + Default,
{
    let mut model: HashMap<Key, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Set(i, v) => {
                let k = key_from(pool, i);
                let before = sut.len();
                let prev = sut.set(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
                let grew = usize::from(prev.is_none());
                prop_assert_eq!(sut.len(), before + grew);
            }
            Op::Get(i) => {
                let k = key_from(pool, i);
                let before = sut.len();
                match model.get(&k) {
                    Some(v) => prop_assert_eq!(sut.get(&k), Ok(v)),
                    None => prop_assert_eq!(sut.get(&k), Err(TableError::KeyNotFound)),
                }
                // Lookups never remove.
                prop_assert_eq!(sut.len(), before);
                prop_assert_eq!(sut.contains(&k), model.contains_key(&k));
            }
            Op::Bump(i, d) => {
                let k = key_from(pool, i);
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Ok(s), Some(m)) => {
                        *s = s.wrapping_add(d);
                        *m = m.wrapping_add(d);
                    }
                    (Err(TableError::KeyNotFound), None) => {}
                    (s, m) => prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", s, m),
                }
            }
            Op::Delete(i) => {
                let k = key_from(pool, i);
                match model.remove(&k) {
                    Some(v) => {
                        prop_assert_eq!(sut.delete(&k), Ok(v));
                        prop_assert!(!sut.contains(&k));
                    }
                    None => prop_assert_eq!(sut.delete(&k), Err(TableError::KeyNotFound)),
                }
            }
            Op::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains(s.as_str()), has_model);
            }
            Op::Items => {
                let s_items: BTreeSet<_> = sut.items().map(|(k, v)| (k.clone(), *v)).collect();
                let m_items: BTreeSet<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s_items, m_items);
                prop_assert_eq!(sut.keys().count(), sut.values().count());
            }
        }

        // Post-conditions after each op.
        sut.assert_consistent();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.items().count(), sut.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap with
// the default hasher and a random bucket count.
// - `set` returns the previous value and grows `len` only for new keys.
// - `get` is read-only; `contains` matches the model.
// - `delete` removes exactly one entry; absent keys fail with KeyNotFound.
// - `items` yields each live entry exactly once.
// - Chain links and the size counter stay consistent after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((buckets, pool, ops) in arb_scenario()) {
        run_against_model(HashTable::with_buckets(buckets), &pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key shares bucket 0, so
// each op exercises head/middle/tail relinking of one long chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((_buckets, pool, ops) in arb_scenario()) {
        let sut: HashTable<Key, i32, ConstBuildHasher> = HashTable::with_hasher(ConstBuildHasher);
        run_against_model(sut, &pool, ops)?;
    }
}

// Property: routing is a pure function of the key for the table's lifetime.
proptest! {
    #[test]
    fn prop_bucket_index_is_stable(keys in proptest::collection::vec(any::<u64>(), 1..50), buckets in 1usize..32) {
        let mut t: HashTable<u64, ()> = HashTable::with_buckets(buckets);
        let first: Vec<usize> = keys.iter().map(|k| t.bucket_index(k)).collect();
        for k in &keys {
            t.set(*k, ());
        }
        for (k, b) in keys.iter().zip(first) {
            prop_assert!(b < buckets);
            prop_assert_eq!(t.bucket_index(k), b);
            let chain = t.bucket(b).expect("bucket in range");
            prop_assert!(chain.find(|ck, _| ck == k));
        }
    }
}
