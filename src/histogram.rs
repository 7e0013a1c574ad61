//! Word-frequency histogram on top of `HashTable`.
//!
//! Tokenization is plain whitespace splitting; any cleanup belongs to the
//! caller.

use crate::hash_table::HashTable;
use log::debug;
use rand::Rng;

/// Counts of each distinct word, with frequency-weighted sampling.
#[derive(Debug, Default)]
pub struct Histogram {
    counts: HashTable<String, usize>,
    total: usize,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_words(text.split_whitespace())
    }

    pub fn from_words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut hist = Self::new();
        for w in words {
            hist.add(w.as_ref());
        }
        debug!(
            "histogram built: {} tokens, {} distinct",
            hist.total,
            hist.unique_words()
        );
        hist
    }

    /// Count one more occurrence of `word`.
    pub fn add(&mut self, word: &str) {
        match self.counts.get_mut(word) {
            Ok(n) => *n += 1,
            Err(_) => {
                self.counts.set(word.to_owned(), 1);
            }
        }
        self.total += 1;
    }

    /// Occurrences of `word`; zero when it was never seen.
    pub fn frequency(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn unique_words(&self) -> usize {
        self.counts.len()
    }

    /// Total tokens counted.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn table(&self) -> &HashTable<String, usize> {
        &self.counts
    }

    /// Draw one word with probability proportional to its count.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        if self.total == 0 {
            return None;
        }
        let mut target = rng.gen_range(0..self.total);
        for (word, &count) in self.counts.items() {
            if target < count {
                return Some(word.as_str());
            }
            target -= count;
        }
        None
    }

    /// Draw `n` samples and count how often each word came up. Every known
    /// word appears in the result, possibly with a zero count.
    pub fn tally<R: Rng>(&self, rng: &mut R, n: usize) -> HashTable<String, usize> {
        let mut out: HashTable<String, usize> =
            self.counts.keys().map(|w| (w.clone(), 0)).collect();
        for _ in 0..n {
            if let Some(w) = self.sample(rng) {
                if let Ok(c) = out.get_mut(w) {
                    *c += 1;
                }
            }
        }
        out
    }
}
