//! chained-hashtable: a fixed-bucket hash table that resolves collisions by
//! separate chaining, plus a word histogram built on it.
//!
//! Internal Design:
//!
//! Layers
//! - Chain<K, V>: one bucket. A singly linked list whose nodes live in a
//!   per-chain `SlotMap` arena and link forward by generational key. Append
//!   at tail is O(1) via a tail link; search and removal are linear. The
//!   chain neither deduplicates keys nor counts its entries.
//! - HashTable<K, V, S>: `Vec<Chain>` of fixed length N plus a `size`
//!   counter. Every operation routes `hash_one(key) % N` to one chain and
//!   delegates to it; the table bumps `size` when the chain gains or loses
//!   an entry, so `len()` is O(1).
//! - Histogram: `HashTable<String, usize>` word counts with weighted
//!   sampling.
//!
//! Invariants
//! - `size` equals the number of nodes reachable from all chain heads.
//! - A key lives in exactly the bucket it routes to, at most once.
//! - Per chain: head absent iff tail absent; `tail.next` is absent; the
//!   walk from head reaches tail in `len - 1` steps.
//!
//! Bucket count
//! - Chosen at construction (default 8) and never changed. There is no
//!   rehash, so a skewed key set makes one chain, and every operation on
//!   it, O(n). Pick a bucket count sized for the expected key volume.
//!
//! Lookups
//! - `get` is read-only. `delete` is the only operation that removes.
//! - `get`/`get_mut`/`delete` on an absent key return
//!   `TableError::KeyNotFound` and leave the table unchanged.
//!
//! Iteration order
//! - `keys`/`values`/`items` walk buckets in index order and each chain
//!   head to tail. That is deterministic for a fixed hasher and operation
//!   sequence but it is neither sorted nor global insertion order.
//!
//! Threading and reentrancy
//! - Single-threaded: tables are `!Send`/`!Sync`. Wrap in a lock owned by
//!   the caller if sharing is needed.
//! - User `Hash`/`Eq` code runs mid-operation. A debug-only guard panics if
//!   it re-enters the same table; removed keys and values are dropped only
//!   after the guard is released.

pub mod chain;
mod config;
mod error;
pub mod hash_table;
mod hash_table_proptest;
mod histogram;
mod reentrancy;

// Public surface
pub use chain::Chain;
pub use config::{HashTableBuilder, TableConfig, DEFAULT_BUCKETS};
pub use error::{ChainError, Result, TableError};
pub use hash_table::HashTable;
pub use histogram::Histogram;
pub use reentrancy::DebugReentrancy;
