//! The classifier engine: tokenization, cold-start estimation, the
//! reinforcement training loop, and the scorer.
//!
//! All state lives on [`TextClassifier`] and every mutating operation takes
//! `&mut self`; one training or prediction caller at a time is a design
//! assumption, encoded in the borrow rules rather than in locks.

use std::fmt;

use tracing::{debug, info, warn};

use crate::analysis::cleaner::TextCleaner;
use crate::analysis::stemmer::{CaseFoldStemmer, Stemmer};
use crate::classifier::cache::Caches;
use crate::classifier::config::ClassifierConfig;
use crate::classifier::model::{BigramKey, ModelStore};
use crate::classifier::persist::{MODEL_VERSION, SavedModel};
use crate::classifier::types::{Diff, Prediction, Thresholds, TrainReport, TrainSample};
use crate::classifier::vocabulary::Vocabulary;
use crate::error::{AugurError, Result};
use crate::util::stats::head_quantile_mean;

/// Result of one training pass.
struct PassOutcome {
    accuracy: f64,
    not_predicted: Vec<TrainSample>,
}

/// A reinforcement-trained bigram text classifier.
///
/// The vocabulary, the model store, and the caches accumulate across
/// repeated [`train`](TextClassifier::train) calls on the same instance;
/// nothing is reset implicitly.
pub struct TextClassifier {
    config: ClassifierConfig,
    cleaner: TextCleaner,
    stemmer: Box<dyn Stemmer>,
    vocabulary: Vocabulary,
    model: ModelStore,
    caches: Caches,
    outputs: Vec<usize>,
    balance: Vec<f64>,
    max_weight: f64,
    thresholds: Thresholds,
    accuracy: f64,
    ready: bool,
}

impl fmt::Debug for TextClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextClassifier")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("model_size", &self.model.len())
            .field("outputs", &self.outputs)
            .field("accuracy", &self.accuracy)
            .field("ready", &self.ready)
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl TextClassifier {
    /// Create a classifier with the default case-folding stemmer.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        Self::with_stemmer(config, Box::new(CaseFoldStemmer::new()))
    }

    /// Create a classifier with a custom stemmer.
    pub fn with_stemmer(config: ClassifierConfig, stemmer: Box<dyn Stemmer>) -> Result<Self> {
        let cleaner = TextCleaner::with_pattern(&config.clean_pattern)?;

        Ok(TextClassifier {
            config,
            cleaner,
            stemmer,
            vocabulary: Vocabulary::new(),
            model: ModelStore::new(),
            caches: Caches::new(),
            outputs: Vec::new(),
            balance: Vec::new(),
            max_weight: 1.0,
            thresholds: Thresholds::default(),
            accuracy: -1.0,
            ready: false,
        })
    }

    /// Whether a model is available (trained or loaded).
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Accuracy of the most recent training pass, or -1 before any training.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Distinct output labels seen so far, ascending.
    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    /// Current per-output balance factors.
    pub fn balance(&self) -> &[f64] {
        &self.balance
    }

    /// Current confidence thresholds.
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// The vocabulary built so far.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Number of registered vocabulary words.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of stored bigrams.
    pub fn model_len(&self) -> usize {
        self.model.len()
    }

    /// Drop every memoized tokenization and diff result.
    pub fn clear_caches(&mut self) {
        self.caches.clear();
    }

    /// Map a raw message to known vocabulary ids, memoized by message text.
    /// Unknown and empty fragments are dropped.
    fn tokenize(&mut self, message: &str) -> Vec<u32> {
        if let Some(ids) = self.caches.tokenized(message) {
            return ids.clone();
        }
        let fragments = self.cleaner.split(message);
        let ids: Vec<u32> = fragments
            .iter()
            .filter_map(|fragment| {
                let stemmed = self.stemmer.stem(fragment);
                if stemmed.is_empty() {
                    None
                } else {
                    self.vocabulary.id_of(&stemmed)
                }
            })
            .collect();
        self.caches.store_tokenized(message, ids.clone());
        ids
    }

    /// Adjacent-pair decomposition of a token sequence.
    fn bigrams(tokens: &[u32]) -> Vec<BigramKey> {
        tokens
            .windows(2)
            .map(|pair| BigramKey::new(pair[0], pair[1]))
            .collect()
    }

    /// Cold-start estimate for a word pair, memoized by the packed key.
    ///
    /// Words agreeing on their dominant output favor it with the sum of
    /// their confidences; disagreeing words resolve to the more confident
    /// one, weighted by the difference. A pair with no aggregated entries
    /// carries no signal.
    fn lookup_diff(vocabulary: &Vocabulary, caches: &mut Caches, key: BigramKey) -> Diff {
        if let Some(diff) = caches.diff(key) {
            return diff;
        }
        let (a, b) = key.split();
        let diff = match (vocabulary.entry(a), vocabulary.entry(b)) {
            (Some(entry_a), Some(entry_b)) => {
                if entry_a.output == entry_b.output {
                    Diff {
                        output: entry_a.output as i32,
                        weight: entry_a.value + entry_b.value,
                    }
                } else if entry_a.value > entry_b.value {
                    Diff {
                        output: entry_a.output as i32,
                        weight: entry_a.value - entry_b.value,
                    }
                } else {
                    Diff {
                        output: entry_b.output as i32,
                        weight: entry_b.value - entry_a.value,
                    }
                }
            }
            (Some(entry_a), None) => Diff {
                output: entry_a.output as i32,
                weight: entry_a.value,
            },
            (None, Some(entry_b)) => Diff {
                output: entry_b.output as i32,
                weight: entry_b.value,
            },
            (None, None) => Diff::NONE,
        };
        caches.store_diff(key, diff);
        diff
    }

    fn diff(&mut self, key: BigramKey) -> Diff {
        Self::lookup_diff(&self.vocabulary, &mut self.caches, key)
    }

    /// Register every stemmed word of `dataset`, assigning ids in insertion
    /// order. Already-known words keep their ids.
    fn build_vocabulary(&mut self, dataset: &[TrainSample]) {
        let before = self.vocabulary.len();
        for row in dataset {
            for fragment in self.cleaner.split(&row.input) {
                let stemmed = self.stemmer.stem(&fragment);
                if stemmed.is_empty() {
                    continue;
                }
                self.vocabulary.insert(&stemmed);
            }
        }
        debug!(
            size = self.vocabulary.len(),
            added = self.vocabulary.len() - before,
            "vocabulary ready"
        );
    }

    /// Merge dataset labels into the known output set, enforcing density.
    fn register_outputs(&mut self, dataset: &[TrainSample]) -> Result<()> {
        let mut labels = self.outputs.clone();
        for row in dataset {
            if !labels.contains(&row.output) {
                labels.push(row.output);
            }
        }
        labels.sort_unstable();
        labels.dedup();
        if let Some(&max) = labels.last() {
            if max + 1 != labels.len() {
                return Err(AugurError::invalid_argument(format!(
                    "output labels must be dense integers starting at 0, got {labels:?}"
                )));
            }
        }
        self.outputs = labels;
        Ok(())
    }

    /// Rebuild per-word statistics and the balance vector from the dataset.
    fn aggregate(&mut self, dataset: &[TrainSample]) {
        let num_outputs = self.outputs.len();
        let mut rows: Vec<(Vec<u32>, usize)> = Vec::with_capacity(dataset.len());
        for row in dataset {
            let ids = self.tokenize(&row.input);
            if ids.is_empty() {
                debug!(input = %row.input, "row cleaned to nothing, skipping");
                continue;
            }
            rows.push((ids, row.output));
        }

        let outcome = self.vocabulary.aggregate(
            &rows,
            num_outputs,
            self.config.median_max_weight,
            self.max_weight,
        );
        self.max_weight = outcome.max_weight;
        self.balance = outcome.balance;
        debug!(
            max_weight = self.max_weight,
            balance = ?self.balance,
            "dataset aggregated"
        );
    }

    /// One pass: score every row against the current model, reinforce the
    /// gold label's bigram weights, and recompute the confidence thresholds.
    fn train_pass(&mut self, dataset: &[TrainSample], iteration: usize) -> PassOutcome {
        if iteration == 0 {
            self.build_vocabulary(dataset);
        }
        self.aggregate(dataset);

        let num_outputs = self.outputs.len();
        let mut exact = 0usize;
        let mut total = 0usize;
        let mut not_predicted = Vec::new();
        let mut predicted_values = Vec::new();
        let mut predicted_betas = Vec::new();

        for row in dataset {
            let tokens = self.tokenize(&row.input);
            if tokens.len() < 2 {
                debug!(input = %row.input, "fewer than two tokens, no bigram possible");
                continue;
            }

            let scored = self.score(&row.input, true);
            let correct = scored.output == row.output as i32;
            total += 1;
            if correct {
                exact += 1;
                predicted_values.push(scored.max);
                if let Some(beta) = scored.beta {
                    predicted_betas.push(beta);
                }
            } else {
                not_predicted.push(row.clone());
            }

            let amount = if correct {
                1.0
            } else {
                self.config.predicted_weight_multiplier
            };
            for key in Self::bigrams(&tokens) {
                if !self.model.contains(key) {
                    let diff = self.diff(key);
                    self.model.seed(key, diff, self.max_weight, num_outputs);
                }
                self.model.reinforce(key, row.output, amount);
            }
        }

        self.thresholds = Thresholds {
            value_threshold: head_quantile_mean(
                &predicted_values,
                self.config.median_min_threshold,
                false,
            ),
            betas_threshold: head_quantile_mean(
                &predicted_betas,
                self.config.median_min_threshold,
                false,
            ),
        };

        let accuracy = if total > 0 {
            exact as f64 / total as f64
        } else {
            0.0
        };
        PassOutcome {
            accuracy,
            not_predicted,
        }
    }

    /// Train on a labeled dataset, running passes until accuracy converges
    /// or the hard iteration ceiling is hit. Either way the classifier is
    /// ready afterwards.
    pub fn train(&mut self, dataset: &[TrainSample]) -> Result<TrainReport> {
        if dataset.is_empty() {
            return Err(AugurError::training("training dataset must not be empty"));
        }
        self.register_outputs(dataset)?;

        let mut iteration = 0usize;
        let mut repeats = 0usize;
        let mut accuracy;
        let mut not_predicted;

        loop {
            let outcome = self.train_pass(dataset, iteration);
            accuracy = outcome.accuracy;
            not_predicted = outcome.not_predicted;

            if accuracy == self.accuracy {
                repeats += 1;
            } else {
                repeats = 0;
            }
            let improving = accuracy > self.accuracy;
            self.accuracy = accuracy;
            iteration += 1;
            info!(iteration, accuracy, repeats, "training pass complete");

            let stopped = accuracy >= self.config.training_threshold
                || accuracy == 1.0
                || repeats >= self.config.accuracy_repeats_stop
                || !improving;
            if stopped {
                break;
            }
            if iteration >= self.config.max_iterations {
                warn!(
                    iterations = iteration,
                    "training stopped at hard iteration ceiling"
                );
                break;
            }
        }

        self.ready = true;
        Ok(TrainReport {
            accuracy,
            iterations: iteration,
            not_predicted,
        })
    }

    /// Score a message against the current model.
    ///
    /// Returns the negative sentinel for an empty model, for messages with
    /// fewer than two recognized tokens, and for all-zero score vectors.
    pub fn predict(&mut self, message: &str) -> Prediction {
        self.score(message, false)
    }

    fn score(&mut self, message: &str, internal: bool) -> Prediction {
        if self.model.is_empty() {
            return Prediction::unclassified();
        }
        let tokens = self.tokenize(message);
        if tokens.len() < 2 {
            return Prediction::unclassified();
        }

        let num_outputs = self.outputs.len();
        let mut result = vec![0.0; num_outputs];
        for key in Self::bigrams(&tokens) {
            if let Some(row) = self.model.get(key) {
                let sum: f64 = row.iter().sum();
                if sum > 0.0 {
                    for (i, slot) in result.iter_mut().enumerate() {
                        let weight = row.get(i).copied().unwrap_or(0.0);
                        *slot += weight / sum * self.balance[i];
                    }
                } else {
                    warn!(key = %key.encode(), "bigram with an all-zero weight row");
                }
            } else {
                let diff = Self::lookup_diff(&self.vocabulary, &mut self.caches, key);
                if diff.output >= 0 {
                    let index = diff.output as usize;
                    if index < num_outputs {
                        result[index] +=
                            diff.weight.min(self.config.diff_max_value) * self.balance[index];
                    }
                }
            }
        }

        let mut max = 0.0;
        let mut output = -1i32;
        for (i, &score) in result.iter().enumerate() {
            if score > max {
                max = score;
                output = i as i32;
            }
        }
        if output == -1 {
            return Prediction {
                output: -1,
                max: 0.0,
                result,
                beta: None,
                delta: None,
                thresholds: None,
            };
        }

        let mut sorted = result.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let (beta, delta) = if sorted.len() > 1 {
            (
                Some(sorted[0] / sorted[1]),
                Some(sorted[0] / sorted[sorted.len() - 1]),
            )
        } else {
            (None, None)
        };

        let thresholds = if !internal {
            let factor = self.balance[output as usize];
            Some(Thresholds {
                value_threshold: self.thresholds.value_threshold.map(|v| v / factor),
                betas_threshold: self.thresholds.betas_threshold.map(|v| v / factor),
            })
        } else {
            None
        };

        Prediction {
            output,
            max,
            result,
            beta,
            delta,
            thresholds,
        }
    }

    /// Capture the persistable state.
    pub(crate) fn snapshot(&self) -> SavedModel {
        SavedModel {
            model: self
                .model
                .iter()
                .map(|(key, row)| (key.encode(), row.to_vec()))
                .collect(),
            vocabulary: self.vocabulary.words().to_vec(),
            outputs: self.outputs.clone(),
            accuracy: self.accuracy,
            thresholds: self.thresholds,
            balance: self.balance.clone(),
            model_version: MODEL_VERSION,
        }
    }

    /// Replace instance state from a parsed model. Nothing is mutated until
    /// every bigram key has decoded.
    pub(crate) fn restore(&mut self, saved: SavedModel) -> Result<()> {
        if saved.model_version != MODEL_VERSION {
            warn!(
                found = saved.model_version,
                expected = MODEL_VERSION,
                "loading model with unexpected version"
            );
        }
        let mut model = ModelStore::new();
        for (key, row) in &saved.model {
            let key = BigramKey::decode(key).ok_or_else(|| {
                AugurError::model(format!("malformed bigram key `{key}` in saved model"))
            })?;
            model.insert_row(key, row.clone());
        }

        let mut outputs = saved.outputs;
        outputs.sort_unstable();
        outputs.dedup();
        let balance = if saved.balance.len() == outputs.len() {
            saved.balance
        } else {
            vec![1.0; outputs.len()]
        };

        self.vocabulary.replace_words(saved.vocabulary);
        self.model = model;
        self.outputs = outputs;
        self.thresholds = saved.thresholds;
        self.balance = balance;
        self.accuracy = saved.accuracy;
        // the id space changed; memoized results no longer apply
        self.caches.clear();
        self.ready = true;
        Ok(())
    }
}
