//! Vocabulary storage and per-word output statistics.
//!
//! The vocabulary maps stemmed words to stable insertion-order ids. It only
//! ever grows; ids are never reassigned. Each aggregation pass recomputes a
//! per-word statistics entry (dominant output and a confidence value) for
//! the words present in the dataset, leaving entries of absent words as the
//! last pass wrote them.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::util::stats::{head_quantile_mean, round3};

/// Per-word statistics produced by an aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabEntry {
    /// Stable insertion-order id.
    pub id: u32,
    /// Output label this word most strongly favors.
    pub output: usize,
    /// Confidence: ratio of the top normalized frequency to the runner-up.
    pub value: f64,
    /// Raw co-occurrence counts per output label.
    pub stats: Vec<f64>,
}

/// Outcome of a statistics aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutcome {
    /// High-quantile mean over the non-sentinel word confidences.
    pub max_weight: f64,
    /// Per-output balance factors correcting class imbalance.
    pub balance: Vec<f64>,
}

/// Append-only word registry with attached statistics entries.
#[derive(Debug, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    ids: AHashMap<String, u32>,
    entries: Vec<Option<VocabEntry>>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Vocabulary::default()
    }

    /// Number of registered words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Id for a stemmed word, if known.
    pub fn id_of(&self, word: &str) -> Option<u32> {
        self.ids.get(word).copied()
    }

    /// Word for an id, if assigned.
    pub fn word(&self, id: u32) -> Option<&str> {
        self.words.get(id as usize).map(String::as_str)
    }

    /// All registered words in id order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Register a word if unseen; returns its id either way.
    pub fn insert(&mut self, word: &str) -> u32 {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = self.words.len() as u32;
        self.words.push(word.to_string());
        self.ids.insert(word.to_string(), id);
        self.entries.push(None);
        id
    }

    /// Replace the word list wholesale (model load). Ids become indices;
    /// statistics entries are dropped and repopulate on the next pass.
    pub fn replace_words(&mut self, words: Vec<String>) {
        self.ids = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i as u32))
            .collect();
        self.entries = vec![None; words.len()];
        self.words = words;
    }

    /// Statistics entry for an id, if one was aggregated.
    pub fn entry(&self, id: u32) -> Option<&VocabEntry> {
        self.entries.get(id as usize).and_then(|e| e.as_ref())
    }

    #[cfg(test)]
    pub(crate) fn set_entry(&mut self, id: u32, entry: VocabEntry) {
        self.entries[id as usize] = Some(entry);
    }

    /// Recompute statistics entries from tokenized rows of `(ids, label)`.
    ///
    /// Counts every token occurrence per output label, normalizes by the
    /// per-output totals, and derives each word's dominant output and
    /// confidence ratio. Words whose runner-up frequency is zero take the
    /// sentinel value −1 and are then assigned `max_weight`, the
    /// high-quantile mean of the real confidences; when no real confidence
    /// exists, `prev_max_weight` is retained. Also derives the per-output
    /// balance vector `mean(totals) / totals[i]`.
    pub fn aggregate(
        &mut self,
        rows: &[(Vec<u32>, usize)],
        num_outputs: usize,
        quantile: f64,
        prev_max_weight: f64,
    ) -> AggregateOutcome {
        // fresh counts for the words of this dataset
        let mut counts: AHashMap<u32, Vec<f64>> = AHashMap::new();
        let mut totals = vec![0.0; num_outputs];
        for (ids, label) in rows {
            for &id in ids {
                let stats = counts
                    .entry(id)
                    .or_insert_with(|| vec![0.0; num_outputs]);
                stats[*label] += 1.0;
                totals[*label] += 1.0;
            }
        }

        // rank normalized frequencies per word
        let mut fresh: Vec<(u32, usize, f64, Vec<f64>)> = Vec::with_capacity(counts.len());
        let mut confidences = Vec::new();
        for (id, stats) in counts {
            let mut ranked: Vec<(usize, f64)> = stats
                .iter()
                .enumerate()
                .map(|(label, &count)| {
                    let frequency = if totals[label] > 0.0 {
                        count / totals[label]
                    } else {
                        0.0
                    };
                    (label, frequency)
                })
                .collect();
            ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

            let (dominant, top) = ranked[0];
            let value = match ranked.get(1) {
                Some(&(_, second)) if second > 0.0 => {
                    let value = round3(top / second);
                    confidences.push(value);
                    value
                }
                _ => -1.0,
            };
            fresh.push((id, dominant, value, stats));
        }

        let max_weight = head_quantile_mean(&confidences, quantile, true)
            .map(round3)
            .unwrap_or(prev_max_weight);

        for (id, output, value, stats) in fresh {
            let value = if value == -1.0 { max_weight } else { value };
            if let Some(slot) = self.entries.get_mut(id as usize) {
                *slot = Some(VocabEntry {
                    id,
                    output,
                    value,
                    stats,
                });
            }
        }

        let mean = totals.iter().sum::<f64>() / num_outputs.max(1) as f64;
        let balance = totals
            .iter()
            .map(|&total| if total > 0.0 { mean / total } else { 0.0 })
            .collect();

        AggregateOutcome {
            max_weight,
            balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenized(vocabulary: &mut Vocabulary, words: &[&str]) -> Vec<u32> {
        words.iter().map(|w| vocabulary.insert(w)).collect()
    }

    #[test]
    fn test_insert_assigns_stable_ids() {
        let mut vocabulary = Vocabulary::new();
        assert_eq!(vocabulary.insert("hello"), 0);
        assert_eq!(vocabulary.insert("world"), 1);
        assert_eq!(vocabulary.insert("hello"), 0);
        assert_eq!(vocabulary.len(), 2);
        assert_eq!(vocabulary.id_of("world"), Some(1));
        assert_eq!(vocabulary.word(1), Some("world"));
        assert_eq!(vocabulary.id_of("missing"), None);
    }

    #[test]
    fn test_replace_words() {
        let mut vocabulary = Vocabulary::new();
        vocabulary.insert("stale");
        vocabulary.replace_words(vec!["fresh".to_string(), "words".to_string()]);
        assert_eq!(vocabulary.len(), 2);
        assert_eq!(vocabulary.id_of("fresh"), Some(0));
        assert_eq!(vocabulary.id_of("stale"), None);
        assert!(vocabulary.entry(0).is_none());
    }

    #[test]
    fn test_aggregate_dominant_output_and_confidence() {
        let mut vocabulary = Vocabulary::new();
        let row_a = tokenized(&mut vocabulary, &["good", "fine", "good"]);
        let row_b = tokenized(&mut vocabulary, &["bad", "good"]);
        let rows = vec![(row_a, 0), (row_b, 1)];

        let outcome = vocabulary.aggregate(&rows, 2, 0.5, 1.0);

        // "good": 2 of 3 label-0 tokens, 1 of 2 label-1 tokens
        let good = vocabulary.entry(0).unwrap();
        assert_eq!(good.output, 0);
        assert_eq!(good.value, round3((2.0 / 3.0) / (1.0 / 2.0)));
        assert_eq!(good.stats, vec![2.0, 1.0]);

        // "fine" and "bad" never co-occur with a second label: sentinel
        // replaced by the aggregated max weight
        let fine = vocabulary.entry(1).unwrap();
        assert_eq!(fine.output, 0);
        assert_eq!(fine.value, outcome.max_weight);
        let bad = vocabulary.entry(2).unwrap();
        assert_eq!(bad.output, 1);
        assert_eq!(bad.value, outcome.max_weight);
    }

    #[test]
    fn test_aggregate_balance_vector() {
        let mut vocabulary = Vocabulary::new();
        let row_a = tokenized(&mut vocabulary, &["a", "b"]);
        let row_b = tokenized(&mut vocabulary, &["c", "d"]);
        let rows = vec![(row_a, 0), (row_b, 1)];

        let outcome = vocabulary.aggregate(&rows, 2, 0.5, 1.0);

        assert_eq!(outcome.balance.len(), 2);
        assert!((outcome.balance[0] - 1.0).abs() < 1e-12);
        assert!((outcome.balance[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_balance_skewed() {
        let mut vocabulary = Vocabulary::new();
        let row_a = tokenized(&mut vocabulary, &["a", "b", "c"]);
        let row_b = tokenized(&mut vocabulary, &["d"]);
        let rows = vec![(row_a, 0), (row_b, 1)];

        let outcome = vocabulary.aggregate(&rows, 2, 0.5, 1.0);

        // totals [3, 1], mean 2: the frequent class scores lower per feature
        assert!((outcome.balance[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((outcome.balance[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_absent_output_gets_zero_balance() {
        let mut vocabulary = Vocabulary::new();
        let row = tokenized(&mut vocabulary, &["a", "b"]);
        let rows = vec![(row, 0)];

        let outcome = vocabulary.aggregate(&rows, 2, 0.5, 1.0);

        assert_eq!(outcome.balance.len(), 2);
        assert_eq!(outcome.balance[1], 0.0);
    }

    #[test]
    fn test_aggregate_all_sentinel_keeps_previous_max_weight() {
        let mut vocabulary = Vocabulary::new();
        let row_a = tokenized(&mut vocabulary, &["a", "b"]);
        let row_b = tokenized(&mut vocabulary, &["c", "d"]);
        let rows = vec![(row_a, 0), (row_b, 1)];

        // no word is seen under more than one label
        let outcome = vocabulary.aggregate(&rows, 2, 0.5, 7.5);
        assert_eq!(outcome.max_weight, 7.5);
        assert_eq!(vocabulary.entry(0).unwrap().value, 7.5);
    }

    #[test]
    fn test_aggregate_preserves_entries_of_absent_words() {
        let mut vocabulary = Vocabulary::new();
        let row_a = tokenized(&mut vocabulary, &["a", "b"]);
        let rows_a = vec![(row_a, 0)];
        vocabulary.aggregate(&rows_a, 1, 0.5, 1.0);
        let before = vocabulary.entry(0).cloned();
        assert!(before.is_some());

        // a second pass over different words leaves "a" untouched
        let row_b = tokenized(&mut vocabulary, &["c", "d"]);
        let rows_b = vec![(row_b, 0)];
        vocabulary.aggregate(&rows_b, 1, 0.5, 1.0);
        assert_eq!(vocabulary.entry(0).cloned(), before);
    }
}
