//! Reinforcement-trained bigram text classification.
//!
//! The classifier builds an append-only vocabulary over a labeled dataset,
//! aggregates per-word output statistics, and trains a sparse bigram weight
//! table by iteratively scoring the dataset against itself and reinforcing
//! the weights of the gold label. Prediction scores a message's bigrams
//! against the table, normalized by a class-balance vector, falling back to
//! the per-word statistics for bigrams the table has never seen.

pub mod cache;
pub mod config;
pub mod core;
pub mod model;
pub mod persist;
pub mod types;
pub mod vocabulary;

pub use config::ClassifierConfig;
pub use core::TextClassifier;
pub use persist::{MODEL_VERSION, SavedModel};
pub use types::{Diff, Prediction, Thresholds, TrainReport, TrainSample};
pub use vocabulary::{VocabEntry, Vocabulary};
