//! Memoization caches for tokenization and diff lookups.
//!
//! Pure memoization with unbounded growth; entries are invalidated only by
//! an explicit clear. Callers needing bounded memory clear periodically and
//! accept the recomputation cost.

use ahash::AHashMap;

use crate::classifier::model::BigramKey;
use crate::classifier::types::Diff;

/// Caches shared by training and prediction.
#[derive(Debug, Default)]
pub struct Caches {
    tokenize: AHashMap<String, Vec<u32>>,
    diff: AHashMap<BigramKey, Diff>,
}

impl Caches {
    /// Create empty caches.
    pub fn new() -> Self {
        Caches::default()
    }

    /// Cached tokenization for a raw message.
    pub fn tokenized(&self, message: &str) -> Option<&Vec<u32>> {
        self.tokenize.get(message)
    }

    /// Memoize a tokenization.
    pub fn store_tokenized(&mut self, message: &str, ids: Vec<u32>) {
        self.tokenize.insert(message.to_string(), ids);
    }

    /// Cached diff result for a word pair.
    pub fn diff(&self, key: BigramKey) -> Option<Diff> {
        self.diff.get(&key).copied()
    }

    /// Memoize a diff result.
    pub fn store_diff(&mut self, key: BigramKey, diff: Diff) {
        self.diff.insert(key, diff);
    }

    /// Drop every cached entry.
    pub fn clear(&mut self) {
        self.tokenize.clear();
        self.diff.clear();
    }

    /// Number of cached tokenizations.
    pub fn tokenize_len(&self) -> usize {
        self.tokenize.len()
    }

    /// Number of cached diff results.
    pub fn diff_len(&self) -> usize {
        self.diff.len()
    }
}
