//! Common types for training and prediction.

use serde::{Deserialize, Serialize};

/// A single labeled training row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSample {
    /// Raw message text.
    pub input: String,
    /// Output label. Labels are dense non-negative integers.
    pub output: usize,
}

impl TrainSample {
    /// Create a new training row.
    pub fn new<S: Into<String>>(input: S, output: usize) -> Self {
        TrainSample {
            input: input.into(),
            output,
        }
    }
}

/// Low-quantile confidence gates computed over the training set's own
/// prediction scores. Callers compare a prediction's `max` and `beta`
/// against these to reject weak classifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Gate on the top score of a prediction.
    #[serde(rename = "valueThreshold")]
    pub value_threshold: Option<f64>,
    /// Gate on the top-to-runner-up score ratio.
    #[serde(rename = "betasThreshold")]
    pub betas_threshold: Option<f64>,
}

/// Cold-start estimate for a bigram absent from the model store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diff {
    /// Favored output label, or -1 when neither word carries a signal.
    pub output: i32,
    /// Strength of the signal.
    pub weight: f64,
}

impl Diff {
    /// The no-signal estimate.
    pub const NONE: Diff = Diff {
        output: -1,
        weight: 0.0,
    };
}

/// Outcome of scoring a message.
///
/// `output == -1` is the defined "cannot classify" result, produced for an
/// empty model, for messages with fewer than two recognized tokens, and for
/// all-zero score vectors. It is not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Winning output label, or -1 for no signal.
    pub output: i32,
    /// Top score.
    pub max: f64,
    /// Per-output score vector in label order.
    pub result: Vec<f64>,
    /// Top score divided by the runner-up score (confidence margin).
    pub beta: Option<f64>,
    /// Top score divided by the lowest score (spread).
    pub delta: Option<f64>,
    /// Confidence gates, rescaled for the winning label. Attached only on
    /// caller-facing predictions that produced a signal.
    pub thresholds: Option<Thresholds>,
}

impl Prediction {
    /// The negative sentinel result.
    pub(crate) fn unclassified() -> Self {
        Prediction {
            output: -1,
            max: 0.0,
            result: Vec::new(),
            beta: None,
            delta: None,
            thresholds: None,
        }
    }

    /// Whether this is the "cannot classify" outcome.
    pub fn is_unclassified(&self) -> bool {
        self.output == -1
    }
}

/// Summary returned by [`TextClassifier::train`](crate::classifier::TextClassifier::train).
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Accuracy of the final training pass.
    pub accuracy: f64,
    /// Number of passes run.
    pub iterations: usize,
    /// Rows the final pass failed to predict.
    pub not_predicted: Vec<TrainSample>,
}
