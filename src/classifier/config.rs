//! Classifier configuration.

use serde::{Deserialize, Serialize};

use crate::analysis::cleaner::DEFAULT_CLEAN_PATTERN;

/// Tunables for training and prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Training stops once pass accuracy reaches this value.
    pub training_threshold: f64,
    /// Quantile of the highest word confidences averaged into `max_weight`,
    /// the fallback confidence for single-output words.
    pub median_max_weight: f64,
    /// Quantile of the lowest prediction scores averaged into the
    /// confidence thresholds.
    pub median_min_threshold: f64,
    /// Cap on a cold-start diff contribution during prediction.
    pub diff_max_value: f64,
    /// Reinforcement amount for rows the current pass mispredicted.
    /// Correctly predicted rows reinforce by 1.
    pub predicted_weight_multiplier: f64,
    /// Training stops after this many consecutive passes with unchanged
    /// accuracy.
    pub accuracy_repeats_stop: usize,
    /// Hard ceiling on training passes.
    pub max_iterations: usize,
    /// Pattern matching everything to strip from message text.
    pub clean_pattern: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            training_threshold: 0.99,
            median_max_weight: 0.06,
            median_min_threshold: 0.05,
            diff_max_value: 1.2,
            predicted_weight_multiplier: 3.0,
            accuracy_repeats_stop: 10,
            max_iterations: 100,
            clean_pattern: DEFAULT_CLEAN_PATTERN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.training_threshold, 0.99);
        assert_eq!(config.median_max_weight, 0.06);
        assert_eq!(config.median_min_threshold, 0.05);
        assert_eq!(config.diff_max_value, 1.2);
        assert_eq!(config.predicted_weight_multiplier, 3.0);
        assert_eq!(config.accuracy_repeats_stop, 10);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.clean_pattern, DEFAULT_CLEAN_PATTERN);
    }
}
