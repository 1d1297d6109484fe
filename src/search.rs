//! Search functionality for filtering listings.
//!
//! Encapsulates the fuzzy-matching logic so the underlying implementation can
//! change without affecting the rest of the codebase.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// A matcher for fuzzy searching text.
pub struct Matcher {
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: SkimMatcherV2::default(),
        }
    }

    /// Whether the pattern fuzzy-matches the text. Case-insensitive, allows
    /// non-consecutive characters; the empty pattern matches everything.
    #[must_use]
    pub fn matches(&self, text: &str, pattern: &str) -> bool {
        if pattern.is_empty() {
            return true;
        }
        let pattern_lower = pattern.to_lowercase();
        self.inner.fuzzy_match(text, &pattern_lower).is_some()
    }

    /// Whether the pattern matches any of the given fields.
    pub fn matches_any<'a>(
        &self,
        fields: impl IntoIterator<Item = &'a str>,
        pattern: &str,
    ) -> bool {
        fields.into_iter().any(|f| self.matches(f, pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_matches_subsequences() {
        let matcher = Matcher::new();

        assert!(matcher.matches("Sourdough basics", "sdb"));
        assert!(matcher.matches("Rust for beginners", "rust"));
        assert!(matcher.matches("RUST FOR BEGINNERS", "rust"));
        assert!(!matcher.matches("Guitar chords", "piano"));
    }

    #[test]
    fn empty_pattern_matches_everything() {
        let matcher = Matcher::new();
        assert!(matcher.matches("anything", ""));
    }

    #[test]
    fn matches_any_field() {
        let matcher = Matcher::new();
        let fields = ["Intro to jazz piano", "yuki"];
        assert!(matcher.matches_any(fields, "yuki"));
        assert!(matcher.matches_any(fields, "jazz"));
        assert!(!matcher.matches_any(fields, "sql"));
    }
}
