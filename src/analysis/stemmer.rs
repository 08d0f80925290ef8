//! Stemming: reducing word fragments to the form the vocabulary stores.

/// Trait for pluggable stemming.
///
/// The classifier treats stemming as an injected `word -> word` capability;
/// any implementation works as long as it is deterministic.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its stored form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// Default stemmer: case folding, nothing else.
#[derive(Debug, Clone, Default)]
pub struct CaseFoldStemmer;

impl CaseFoldStemmer {
    pub fn new() -> Self {
        CaseFoldStemmer
    }
}

impl Stemmer for CaseFoldStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_lowercase()
    }

    fn name(&self) -> &'static str {
        "case_fold"
    }
}

/// Stemmer that strips the longest matching suffix from a list.
///
/// Words of three characters or fewer pass through untouched, and a suffix
/// is only stripped when at least three characters of stem remain.
#[derive(Debug, Clone)]
pub struct SuffixStemmer {
    /// Suffixes ordered longest first.
    suffixes: Vec<String>,
}

impl SuffixStemmer {
    /// Create a suffix stemmer with a default English suffix list.
    pub fn new() -> Self {
        Self::with_suffixes(
            [
                "ization", "ability", "fulness", "ousness", "iveness", "ation", "ment", "ness",
                "tion", "sion", "able", "ible", "ful", "ing", "est", "ies", "ied", "ly", "ed",
                "er", "es", "s",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        )
    }

    /// Create a suffix stemmer with custom suffixes.
    pub fn with_suffixes(mut suffixes: Vec<String>) -> Self {
        suffixes.sort_by_key(|s| std::cmp::Reverse(s.len()));
        SuffixStemmer { suffixes }
    }
}

impl Default for SuffixStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stemmer for SuffixStemmer {
    fn stem(&self, word: &str) -> String {
        let word = word.to_lowercase();
        if word.len() <= 3 {
            return word;
        }

        for suffix in &self.suffixes {
            if word.len() > suffix.len() + 2 && word.ends_with(suffix.as_str()) {
                return word[..word.len() - suffix.len()].to_string();
            }
        }

        word
    }

    fn name(&self) -> &'static str {
        "suffix"
    }
}
