//! Small numeric helpers shared by aggregation and training.

use std::cmp::Ordering;

/// Mean of the leading `ceil(len * q)` values after sorting.
///
/// With `descending` set the head holds the largest values, otherwise the
/// smallest. Returns `None` for empty input.
pub fn head_quantile_mean(values: &[f64], q: f64, descending: bool) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    if descending {
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    } else {
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    }
    let keep = ((sorted.len() as f64) * q).ceil() as usize;
    sorted.truncate(keep.clamp(1, sorted.len()));
    Some(sorted.iter().sum::<f64>() / sorted.len() as f64)
}

/// Round to 3 decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_quantile_mean_descending() {
        let values = vec![0.5, 3.0, 1.0, 2.0];
        // ceil(4 * 0.25) = 1, keeps only the largest value
        assert_eq!(head_quantile_mean(&values, 0.25, true), Some(3.0));
        // ceil(4 * 0.5) = 2, averages the two largest
        assert_eq!(head_quantile_mean(&values, 0.5, true), Some(2.5));
    }

    #[test]
    fn test_head_quantile_mean_ascending() {
        let values = vec![0.5, 3.0, 1.0, 2.0];
        assert_eq!(head_quantile_mean(&values, 0.25, false), Some(0.5));
        assert_eq!(head_quantile_mean(&values, 0.5, false), Some(0.75));
    }

    #[test]
    fn test_head_quantile_mean_numeric_sort() {
        // 10 must sort after 2 numerically
        let values = vec![10.0, 2.0, 1.0];
        assert_eq!(head_quantile_mean(&values, 0.34, false), Some(1.0));
        assert_eq!(head_quantile_mean(&values, 0.34, true), Some(10.0));
    }

    #[test]
    fn test_head_quantile_mean_full_range() {
        let values = vec![1.0, 2.0, 3.0];
        assert_eq!(head_quantile_mean(&values, 1.0, true), Some(2.0));
    }

    #[test]
    fn test_head_quantile_mean_empty() {
        assert_eq!(head_quantile_mean(&[], 0.5, true), None);
    }

    #[test]
    fn test_head_quantile_mean_single_value() {
        assert_eq!(head_quantile_mean(&[4.2], 0.01, false), Some(4.2));
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round3(1.2344), 1.234);
        assert_eq!(round3(0.0005), 0.001);
        assert_eq!(round3(2.0), 2.0);
    }
}
