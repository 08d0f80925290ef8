//! Regex-based text cleaning.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AugurError, Result};

/// Default clean pattern: every run of characters outside ASCII letters,
/// digits, spaces, and apostrophes is stripped.
pub const DEFAULT_CLEAN_PATTERN: &str = r"(?i)[^a-z0-9 ']+";

lazy_static! {
    static ref DEFAULT_CLEAN_REGEX: Regex =
        Regex::new(DEFAULT_CLEAN_PATTERN).expect("default clean pattern should be valid");
}

/// Replaces everything a message should not contain with spaces and splits
/// the remainder into word fragments.
#[derive(Clone, Debug)]
pub struct TextCleaner {
    /// The compiled clean pattern
    pattern: Arc<Regex>,
}

impl TextCleaner {
    /// Create a cleaner with the default pattern.
    pub fn new() -> Self {
        TextCleaner {
            pattern: Arc::new(DEFAULT_CLEAN_REGEX.clone()),
        }
    }

    /// Create a cleaner with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| AugurError::analysis(format!("invalid clean pattern: {e}")))?;

        Ok(TextCleaner {
            pattern: Arc::new(regex),
        })
    }

    /// Get the clean pattern used by this cleaner.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replace every match of the clean pattern with a space.
    pub fn clean(&self, text: &str) -> String {
        self.pattern.replace_all(text, " ").into_owned()
    }

    /// Clean `text` and split it into non-empty fragments.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.clean(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern_strips_punctuation() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.clean("hello, world!"), "hello  world ");
        assert_eq!(
            cleaner.split("hello, world!"),
            vec!["hello".to_string(), "world".to_string()]
        );
    }

    #[test]
    fn test_default_pattern_keeps_case_digits_apostrophes() {
        let cleaner = TextCleaner::new();
        assert_eq!(
            cleaner.split("It's 2am, OK?"),
            vec!["It's".to_string(), "2am".to_string(), "OK".to_string()]
        );
    }

    #[test]
    fn test_split_collapses_whitespace() {
        let cleaner = TextCleaner::new();
        assert_eq!(
            cleaner.split("a -- b"),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(cleaner.split("!!!").is_empty());
    }

    #[test]
    fn test_custom_pattern() {
        let cleaner = TextCleaner::with_pattern(r"[^a-z]+").unwrap();
        assert_eq!(
            cleaner.split("abc123def"),
            vec!["abc".to_string(), "def".to_string()]
        );
        assert_eq!(cleaner.pattern(), r"[^a-z]+");
    }

    #[test]
    fn test_invalid_pattern() {
        let result = TextCleaner::with_pattern("[unclosed");
        assert!(result.is_err());
    }
}
