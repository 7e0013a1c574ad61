//! Chain: one bucket's singly linked list of entries.
//!
//! Nodes live in a per-chain `SlotMap` arena and link forward by
//! generational key, so every node has exactly one owner (the arena) and
//! exactly one predecessor link (the previous node, or `head`).

use crate::error::ChainError;
use core::borrow::Borrow;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    next: Option<DefaultKey>,
}

/// Insertion-ordered list of `(K, V)` entries with O(1) append.
///
/// The chain does not deduplicate keys and keeps no length counter;
/// uniqueness and sizing belong to the owning table.
pub struct Chain<K, V> {
    nodes: SlotMap<DefaultKey, Node<K, V>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<K, V> Chain<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of entries, counted by walking from head. O(n).
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Insert at the tail. O(1).
    pub fn append(&mut self, key: K, value: V) {
        let k = self.nodes.insert(Node {
            key,
            value,
            next: None,
        });
        match self.tail.and_then(|t| self.nodes.get_mut(t)) {
            Some(last) => last.next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
    }

    /// Insert at the head. O(1).
    pub fn prepend(&mut self, key: K, value: V) {
        let k = self.nodes.insert(Node {
            key,
            value,
            next: self.head,
        });
        if self.tail.is_none() {
            self.tail = Some(k);
        }
        self.head = Some(k);
    }

    /// Whether any entry satisfies `matcher`. Stops at the first hit.
    pub fn find<F>(&self, mut matcher: F) -> bool
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.iter().any(|(k, v)| matcher(k, v))
    }

    fn locate<Q>(&self, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = self.nodes.get(k)?;
            if node.key.borrow() == q {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let k = self.locate(q)?;
        self.nodes.get(k).map(|n| &n.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let k = self.locate(q)?;
        self.nodes.get_mut(k).map(|n| &mut n.value)
    }

    /// Unlink and return the first entry whose key equals `q`.
    pub fn remove<Q>(&mut self, q: &Q) -> Result<(K, V), ChainError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = self.nodes.get(k).ok_or(ChainError::NotFound)?;
            let next = node.next;
            if node.key.borrow() == q {
                match prev.and_then(|p| self.nodes.get_mut(p)) {
                    Some(p) => p.next = next,
                    None => self.head = next,
                }
                if self.tail == Some(k) {
                    self.tail = prev;
                }
                return self
                    .nodes
                    .remove(k)
                    .map(|n| (n.key, n.value))
                    .ok_or(ChainError::NotFound);
            }
            prev = cur;
            cur = next;
        }
        Err(ChainError::NotFound)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.head
            .and_then(|k| self.nodes.get(k))
            .map(|n| (&n.key, &n.value))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.tail
            .and_then(|k| self.nodes.get(k))
            .map(|n| (&n.key, &n.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cur: self.head,
        }
    }

    /// Owned copy of the entries, head to tail.
    pub fn to_vec(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Panics if head/tail/next links disagree with the arena contents.
    #[cfg(test)]
    pub(crate) fn assert_links(&self) {
        assert_eq!(self.head.is_none(), self.tail.is_none(), "head/tail presence");
        let mut steps = 0usize;
        let mut last = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = self.nodes.get(k).expect("link to live node");
            last = Some(k);
            cur = node.next;
            steps += 1;
            assert!(steps <= self.nodes.len(), "cycle in chain");
        }
        assert_eq!(last, self.tail, "walk must end at tail");
        assert_eq!(steps, self.nodes.len(), "every node reachable from head");
    }
}

impl<K, V> Default for Chain<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for Chain<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut chain = Chain::new();
        for (k, v) in iter {
            chain.append(k, v);
        }
        chain
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Chain<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a Chain<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Head-to-tail iterator over a chain.
pub struct Iter<'a, K, V> {
    nodes: &'a SlotMap<DefaultKey, Node<K, V>>,
    cur: Option<DefaultKey>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.cur?)?;
        self.cur = node.next;
        Some((&node.key, &node.value))
    }
}
