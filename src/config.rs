//! Construction-time configuration for `HashTable`.

use crate::hash_table::HashTable;
use core::hash::BuildHasher;
use hashbrown::hash_map::DefaultHashBuilder;

/// Bucket count used by `HashTable::new`.
pub const DEFAULT_BUCKETS: usize = 8;

/// Settings fixed for the lifetime of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of chains. Zero is clamped to one.
    pub buckets: usize,
}

impl TableConfig {
    pub fn with_buckets(buckets: usize) -> Self {
        Self { buckets }
    }

    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.max(1)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS,
        }
    }
}

/// Builder for tables that need a non-default bucket count or hasher.
///
/// ```
/// use chained_hashtable::HashTableBuilder;
///
/// let mut t = HashTableBuilder::new().buckets(64).build();
/// t.set("k", 1);
/// assert_eq!(t.bucket_count(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct HashTableBuilder<S = DefaultHashBuilder> {
    config: TableConfig,
    hasher: S,
}

impl HashTableBuilder<DefaultHashBuilder> {
    pub fn new() -> Self {
        Self {
            config: TableConfig::default(),
            hasher: DefaultHashBuilder::default(),
        }
    }
}

impl Default for HashTableBuilder<DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> HashTableBuilder<S>
where
    S: BuildHasher + Clone + Default,
{
    pub fn buckets(mut self, buckets: usize) -> Self {
        self.config.buckets = buckets;
        self
    }

    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Swap the hasher; the bucket count carries over.
    pub fn hasher<T>(self, hasher: T) -> HashTableBuilder<T>
    where
        T: BuildHasher + Clone + Default,
    {
        HashTableBuilder {
            config: self.config,
            hasher,
        }
    }

    pub fn build<K, V>(self) -> HashTable<K, V, S> {
        HashTable::with_config_and_hasher(self.config, self.hasher)
    }
}
