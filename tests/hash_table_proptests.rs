use chained_hashtable::{HashTable, TableError};
use proptest::prelude::*;
use std::collections::HashMap;

// Property: random set/delete sequences keep len() equal to the number of
// items and agree with a std HashMap on every key.
proptest! {
    #[test]
    fn prop_size_and_membership(
        buckets in 1usize..=16,
        ops in proptest::collection::vec((any::<bool>(), 0u16..64, any::<i64>()), 1..200),
    ) {
        let mut t: HashTable<u16, i64> = HashTable::with_buckets(buckets);
        let mut model: HashMap<u16, i64> = HashMap::new();
        for (is_set, k, v) in ops {
            if is_set {
                prop_assert_eq!(t.set(k, v), model.insert(k, v));
            } else {
                let expected = model.remove(&k).ok_or(TableError::KeyNotFound);
                prop_assert_eq!(t.delete(&k), expected);
            }
            prop_assert_eq!(t.len(), model.len());
            prop_assert_eq!(t.items().count(), t.len());
        }
        for k in 0u16..64 {
            prop_assert_eq!(t.contains(&k), model.contains_key(&k));
            prop_assert_eq!(t.get(&k).ok(), model.get(&k));
        }
        prop_assert_eq!(t.bucket_count(), buckets);
    }
}

// Property: set then get round-trips; a second set replaces without growth.
proptest! {
    #[test]
    fn prop_round_trip_and_update(k in "[a-z]{1,8}", v1 in any::<u32>(), v2 in any::<u32>()) {
        let mut t: HashTable<String, u32> = HashTable::new();
        t.set(k.clone(), v1);
        prop_assert_eq!(t.get(k.as_str()), Ok(&v1));
        t.set(k.clone(), v2);
        prop_assert_eq!(t.len(), 1);
        prop_assert_eq!(t.get(k.as_str()), Ok(&v2));
        prop_assert_eq!(t.delete(k.as_str()), Ok(v2));
        prop_assert!(!t.contains(k.as_str()));
        prop_assert_eq!(t.delete(k.as_str()), Err(TableError::KeyNotFound));
    }
}
