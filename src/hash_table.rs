//! HashTable: fixed array of chains with a maintained entry count.
//!
//! Routing is `hash_one(key) % bucket_count`. The bucket count is chosen at
//! construction and never changes, so the routing function is pure for the
//! table's lifetime. There is no rehashing: a skewed key set degrades the
//! affected chain, and every operation on it, to O(n).

use crate::chain::{self, Chain};
use crate::config::TableConfig;
use crate::error::{Result, TableError};
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use log::{debug, trace};

pub struct HashTable<K, V, S = DefaultHashBuilder> {
    hasher: S,
    buckets: Vec<Chain<K, V>>,
    size: usize,
    reentrancy: DebugReentrancy,
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
{
    /// Empty table with `DEFAULT_BUCKETS` chains.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_buckets(buckets: usize) -> Self {
        Self::with_config(TableConfig::with_buckets(buckets))
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HashTable<K, V, S> {
    pub(crate) fn with_config_and_hasher(config: TableConfig, hasher: S) -> Self {
        let n = config.bucket_count();
        let mut buckets = Vec::with_capacity(n);
        buckets.resize_with(n, Chain::new);
        debug!("hash table created with {n} buckets");
        Self {
            hasher,
            buckets,
            size: 0,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Number of entries. O(1); read from the maintained counter.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Alias of `len`.
    pub fn length(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries per bucket. Informational; never triggers a resize.
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// The chain stored at bucket `index`.
    pub fn bucket(&self, index: usize) -> Option<&Chain<K, V>> {
        self.buckets.get(index)
    }

    /// Drop every entry; the bucket count is unchanged.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.size = 0;
    }

    /// Entries in bucket order, then chain order within each bucket.
    pub fn items(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.size,
        }
    }

    /// Same sequence as `items`.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.items()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.items() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.items() }
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_config_and_hasher(TableConfig::default(), hasher)
    }

    fn route<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        (self.hasher.hash_one(q) % self.buckets.len() as u64) as usize
    }

    /// Bucket that `q` routes to.
    pub fn bucket_index<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("bucket_index");
        self.route(q)
    }

    /// Insert or update. Returns the previous value when `key` was present;
    /// in that case the entry keeps its position and `len` is unchanged.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter("set");
        let index = self.route(&key);
        let chain = &mut self.buckets[index];
        if let Some(slot) = chain.get_mut(&key) {
            trace!("set: updated entry in bucket {index}");
            return Some(core::mem::replace(slot, value));
        }
        chain.append(key, value);
        self.size += 1;
        trace!("set: inserted entry in bucket {index}, size {}", self.size);
        None
    }

    /// Read-only lookup.
    pub fn get<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let index = self.route(q);
        self.buckets[index].get(q).ok_or(TableError::KeyNotFound)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_mut");
        let index = self.route(q);
        self.buckets[index].get_mut(q).ok_or(TableError::KeyNotFound)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("contains");
        let index = self.route(q);
        self.buckets[index].find(|k, _| k.borrow() == q)
    }

    /// Remove `q` and return its value. Absent keys leave the table untouched.
    pub fn delete<Q>(&mut self, q: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        // The removed pair outlives the guard so K/V drops may reenter.
        let (_key, value) = {
            let _g = self.reentrancy.enter("delete");
            let index = self.route(q);
            let pair = self.buckets[index].remove(q)?;
            self.size -= 1;
            trace!("delete: removed entry from bucket {index}, size {}", self.size);
            pair
        };
        Ok(value)
    }

    /// Length of every chain, in bucket order.
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets.iter().map(Chain::len).collect()
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut total = 0;
        for (i, chain) in self.buckets.iter().enumerate() {
            chain.assert_links();
            for (k, _) in chain.iter() {
                assert_eq!(self.route(k), i, "entry stored in foreign bucket");
                assert_eq!(chain.iter().filter(|(other, _)| *other == k).count(), 1);
                total += 1;
            }
        }
        assert_eq!(total, self.size, "size counter out of sync");
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = HashTable::with_hasher(S::default());
        table.extend(iter);
        table
    }
}

impl<K, V, S> Extend<(K, V)> for HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.items()
    }
}

/// `{k: v, ...}` in item order.
impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Display for HashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.items().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}: {:?}", k, v)?;
        }
        f.write_str("}")
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashTable(")?;
        f.debug_list().entries(self.items()).finish()?;
        f.write_str(")")
    }
}

/// Iterator over `(&K, &V)` across all buckets.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Chain<K, V>>,
    chain: Option<chain::Iter<'a, K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.chain.as_mut().and_then(|c| c.next()) {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(item);
            }
            self.chain = Some(self.buckets.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashTableBuilder;
    use std::collections::BTreeSet;
    use std::hash::Hasher;

    fn init_test_logger() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .try_init();
    }

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
        } // every key lands in bucket 0
    }

    fn collide<V>() -> HashTable<String, V, ConstBuildHasher> {
        HashTable::with_hasher(ConstBuildHasher)
    }

    /// Invariant: the I/V/X walkthrough on an 8-bucket table.
    #[test]
    fn roman_numeral_scenario() {
        init_test_logger();
        let mut t = HashTable::new();
        assert_eq!(t.bucket_count(), 8);
        for (k, v) in [("I", 1), ("V", 5), ("X", 10)] {
            assert_eq!(t.set(k.to_string(), v), None);
        }
        assert_eq!(t.length(), 3);
        let items: BTreeSet<(String, i32)> =
            t.items().map(|(k, v)| (k.clone(), *v)).collect();
        let expected: BTreeSet<(String, i32)> = [("I", 1), ("V", 5), ("X", 10)]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        assert_eq!(items, expected);
        assert!(t.contains("X"));

        assert_eq!(t.delete("I"), Ok(1));
        assert_eq!(t.length(), 2);
        assert!(!t.contains("I"));
        assert_eq!(t.get("I"), Err(TableError::KeyNotFound));
        t.assert_consistent();
    }

    /// Invariant: `get` observes without removing.
    #[test]
    fn get_is_read_only() {
        let mut t = HashTable::new();
        t.set("k".to_string(), 7);
        for _ in 0..3 {
            assert_eq!(t.get("k"), Ok(&7));
        }
        assert_eq!(t.len(), 1);
        assert!(t.contains("k"));
        t.assert_consistent();
    }

    /// Invariant: updating an existing key keeps size and swaps the value.
    #[test]
    fn set_existing_updates_in_place() {
        let mut t = HashTable::new();
        assert_eq!(t.set("a".to_string(), 1), None);
        assert_eq!(t.set("a".to_string(), 2), Some(1));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get("a"), Ok(&2));
        t.assert_consistent();
    }

    /// Invariant: delete removes exactly one entry; a repeat delete fails
    /// without side effects.
    #[test]
    fn delete_twice_fails_second_time() {
        let mut t = HashTable::new();
        t.set(1u32, "one");
        t.set(2u32, "two");
        assert_eq!(t.delete(&1u32), Ok("one"));
        assert_eq!(t.len(), 1);
        assert_eq!(t.delete(&1u32), Err(TableError::KeyNotFound));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(&2u32), Ok(&"two"));
        t.assert_consistent();
    }

    #[test]
    fn missing_key_errors_on_empty_table() {
        let mut t: HashTable<String, i32> = HashTable::new();
        assert_eq!(t.get("nope"), Err(TableError::KeyNotFound));
        assert_eq!(t.get_mut("nope"), Err(TableError::KeyNotFound));
        assert_eq!(t.delete("nope"), Err(TableError::KeyNotFound));
        assert!(!t.contains("nope"));
        assert!(t.is_empty());
    }

    /// Invariant: colliding keys share one chain yet resolve independently.
    #[test]
    fn colliding_keys_are_independent() {
        let mut t = collide();
        t.set("a".to_string(), 1);
        t.set("b".to_string(), 2);
        t.set("c".to_string(), 3);
        assert_eq!(t.chain_lengths()[0], 3);
        assert_eq!(t.get("a"), Ok(&1));
        assert_eq!(t.get("b"), Ok(&2));
        assert_eq!(t.get("c"), Ok(&3));
        // Within a bucket, iteration follows insertion order.
        let keys: Vec<&str> = t.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        t.assert_consistent();
    }

    /// Invariant: removing head, middle and tail of one chain keeps links sound.
    #[test]
    fn chain_integrity_after_head_middle_tail_removal() {
        for victim in ["a", "c", "e"] {
            let mut t = collide();
            for (i, k) in ["a", "b", "c", "d", "e"].iter().enumerate() {
                t.set(k.to_string(), i);
            }
            t.delete(victim).unwrap();
            t.assert_consistent();
            let chain = t.bucket(0).unwrap();
            assert_eq!(chain.len(), 4);
            assert!(!chain.find(|k, _| k == victim));
        }

        let mut t = collide();
        for k in ["a", "b", "c"] {
            t.set(k.to_string(), 0);
        }
        t.delete("b").unwrap();
        t.delete("c").unwrap();
        t.delete("a").unwrap();
        t.assert_consistent();
        assert!(t.bucket(0).unwrap().is_empty());
        t.set("z".to_string(), 9);
        assert_eq!(t.items().collect::<Vec<_>>(), [(&"z".to_string(), &9)]);
    }

    /// Invariant: keys/values/items agree with each other and with `len`.
    #[test]
    fn iteration_views_agree() {
        let t: HashTable<u32, u32> = (0..50).map(|i| (i, i * 10)).collect();
        assert_eq!(t.len(), 50);
        assert_eq!(t.items().len(), 50);
        let items: Vec<(u32, u32)> = t.items().map(|(k, v)| (*k, *v)).collect();
        let keys: Vec<u32> = t.keys().copied().collect();
        let values: Vec<u32> = t.values().copied().collect();
        assert_eq!(items.iter().map(|(k, _)| *k).collect::<Vec<_>>(), keys);
        assert_eq!(items.iter().map(|(_, v)| *v).collect::<Vec<_>>(), values);
        let via_ref: Vec<(u32, u32)> = (&t).into_iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(via_ref, items);
        t.assert_consistent();
    }

    /// Invariant: item order is bucket order, then chain order.
    #[test]
    fn items_follow_bucket_then_chain_order() {
        let t: HashTable<u32, ()> = (0..40).map(|i| (i, ())).collect();
        let mut last_bucket = 0;
        for k in t.keys() {
            let b = t.bucket_index(k);
            assert!(b >= last_bucket);
            last_bucket = b;
        }
    }

    #[test]
    fn get_mut_accumulates() {
        let mut t = HashTable::new();
        t.set("w".to_string(), 0usize);
        for _ in 0..5 {
            *t.get_mut("w").unwrap() += 1;
        }
        assert_eq!(t.get("w"), Ok(&5));
    }

    #[test]
    fn fixed_bucket_count_never_changes() {
        let mut t = HashTable::with_buckets(4);
        for i in 0..1_000u32 {
            t.set(i, i);
        }
        assert_eq!(t.bucket_count(), 4);
        assert_eq!(t.load_factor(), 250.0);
        assert_eq!(t.chain_lengths().iter().sum::<usize>(), 1_000);
        t.assert_consistent();
    }

    #[test]
    fn clear_keeps_buckets() {
        let mut t = HashTableBuilder::new().buckets(5).build();
        t.extend((0..20u8).map(|i| (i, i)));
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.bucket_count(), 5);
        assert_eq!(t.items().count(), 0);
        t.set(1, 1);
        t.assert_consistent();
    }

    #[test]
    fn display_and_debug() {
        let mut t = collide();
        assert_eq!(t.to_string(), "{}");
        t.set("I".to_string(), 1);
        t.set("V".to_string(), 5);
        assert_eq!(t.to_string(), r#"{"I": 1, "V": 5}"#);
        assert_eq!(format!("{:?}", t), r#"HashTable([("I", 1), ("V", 5)])"#);
    }

    /// Invariant (debug-only): user `Eq` code re-entering the table during a
    /// chain walk panics.
    #[cfg(debug_assertions)]
    #[test]
    fn reentrancy_from_eq_panics() {
        use std::cell::Cell;

        thread_local! {
            static TABLE: Cell<*const HashTable<Sneaky, i32, ConstBuildHasher>> =
                const { Cell::new(core::ptr::null()) };
        }

        #[derive(Debug)]
        struct Sneaky(&'static str);
        impl PartialEq for Sneaky {
            fn eq(&self, other: &Self) -> bool {
                TABLE.with(|t| {
                    let p = t.get();
                    if !p.is_null() {
                        // Attempt to re-enter the same table mid-lookup.
                        unsafe {
                            let _ = (*p).len();
                            let _ = (*p).contains(&Sneaky("x"));
                        }
                    }
                });
                self.0 == other.0
            }
        }
        impl Eq for Sneaky {}
        impl Hash for Sneaky {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        let mut t: HashTable<Sneaky, i32, ConstBuildHasher> =
            HashTable::with_hasher(ConstBuildHasher);
        t.set(Sneaky("a"), 1);
        TABLE.with(|c| c.set(&t as *const _));
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = t.contains(&Sneaky("b"));
        }));
        TABLE.with(|c| c.set(core::ptr::null()));
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");
    }
}
