//! # Augur
//!
//! A lightweight statistical text classifier for short messages.
//!
//! Augur learns per-word statistics and reinforced bigram weights from a
//! labeled dataset, with no learning framework behind it. Training is an
//! iterative self-scoring loop that reinforces the bigram weights of every
//! row until accuracy stops improving, then derives low-quantile confidence
//! thresholds callers can use to reject weak predictions.
//!
//! ## Features
//!
//! - Pure Rust implementation, single-threaded by design
//! - Per-word dominant-output statistics with class-imbalance correction
//! - Bigram weight model with a cold-start fallback estimator
//! - Pluggable word stemming
//! - JSON model persistence
//!
//! ## Example
//!
//! ```
//! use augur::classifier::{ClassifierConfig, TextClassifier, TrainSample};
//!
//! let mut classifier = TextClassifier::new(ClassifierConfig::default()).unwrap();
//! let dataset = vec![
//!     TrainSample::new("hello world", 0),
//!     TrainSample::new("hi there", 0),
//!     TrainSample::new("bye now", 1),
//!     TrainSample::new("goodbye now", 1),
//! ];
//! classifier.train(&dataset).unwrap();
//!
//! let prediction = classifier.predict("hello there");
//! assert_eq!(prediction.output, 0);
//! ```

pub mod analysis;
pub mod classifier;
pub mod error;
pub mod util;

pub mod prelude {
    pub use crate::classifier::{
        ClassifierConfig, Prediction, TextClassifier, TrainReport, TrainSample,
    };
    pub use crate::error::{AugurError, Result};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
