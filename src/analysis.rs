//! Text analysis primitives: cleaning and stemming.
//!
//! Cleaning strips every character outside a configured pattern and splits
//! the remainder on whitespace; stemming reduces each fragment to the form
//! the vocabulary is keyed by. Both run before any classification step.

pub mod cleaner;
pub mod stemmer;

pub use cleaner::{DEFAULT_CLEAN_PATTERN, TextCleaner};
pub use stemmer::{CaseFoldStemmer, Stemmer, SuffixStemmer};
