//! Sparse bigram weight store.

use ahash::AHashMap;

use crate::classifier::types::Diff;
use crate::util::stats::round3;

/// Two word ids packed into a single map key; the high 32 bits hold the
/// first id. The string form `"<idA>:<idB>"` exists only in stored models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BigramKey(u64);

impl BigramKey {
    /// Pack an ordered pair of word ids.
    pub fn new(a: u32, b: u32) -> Self {
        BigramKey(((a as u64) << 32) | b as u64)
    }

    /// Recover the word ids.
    pub fn split(self) -> (u32, u32) {
        ((self.0 >> 32) as u32, self.0 as u32)
    }

    /// The wire form used by stored models.
    pub fn encode(self) -> String {
        let (a, b) = self.split();
        format!("{a}:{b}")
    }

    /// Parse the wire form.
    pub fn decode(s: &str) -> Option<Self> {
        let (a, b) = s.split_once(':')?;
        Some(Self::new(a.parse().ok()?, b.parse().ok()?))
    }
}

/// Lazily grown mapping from bigram to per-output weights.
///
/// Entries appear the first time training encounters a bigram, seeded from
/// the cold-start diff estimate, and are then reinforced in place. Weights
/// are clamped at a floor of 0 and unbounded above.
#[derive(Debug, Default)]
pub struct ModelStore {
    weights: AHashMap<BigramKey, Vec<f64>>,
}

impl ModelStore {
    /// Create an empty store.
    pub fn new() -> Self {
        ModelStore::default()
    }

    /// Number of known bigrams.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check whether any bigram has been stored.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Check whether a bigram is known.
    pub fn contains(&self, key: BigramKey) -> bool {
        self.weights.contains_key(&key)
    }

    /// Weight row for a bigram, if known.
    pub fn get(&self, key: BigramKey) -> Option<&[f64]> {
        self.weights.get(&key).map(Vec::as_slice)
    }

    /// Seed a new bigram from its cold-start estimate, scaled by
    /// `max_weight` and capped at 1 per output.
    pub fn seed(&mut self, key: BigramKey, diff: Diff, max_weight: f64, num_outputs: usize) {
        let mut row = vec![0.0; num_outputs];
        if diff.output >= 0 {
            let index = diff.output as usize;
            if index < num_outputs {
                let scaled = diff.weight / max_weight;
                row[index] = if scaled.is_nan() { 0.0 } else { scaled.min(1.0) };
            }
        }
        self.weights.insert(key, row);
    }

    /// Add `amount` to the weight at the gold-label index, floored at 0.
    pub fn reinforce(&mut self, key: BigramKey, gold: usize, amount: f64) {
        if let Some(row) = self.weights.get_mut(&key) {
            if row.len() <= gold {
                row.resize(gold + 1, 0.0);
            }
            row[gold] = round3((row[gold] + amount).max(0.0));
        }
    }

    /// Insert a weight row verbatim (model load).
    pub fn insert_row(&mut self, key: BigramKey, row: Vec<f64>) {
        self.weights.insert(key, row);
    }

    /// Iterate over all stored bigrams.
    pub fn iter(&self) -> impl Iterator<Item = (BigramKey, &[f64])> {
        self.weights.iter().map(|(&key, row)| (key, row.as_slice()))
    }
}
