//! Query normalization for provider lookups
//!
//! Every provider receives the same sanitized term: surrounding whitespace is
//! trimmed and each configured strip character is removed.
//!
//! # Examples
//!
//! ```
//! use domain::QueryNormalizer;
//!
//! let normalizer = QueryNormalizer::new(['(', ')']);
//! assert_eq!(normalizer.normalize("  猫(ねこ) "), "猫ねこ");
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Sanitizes raw input terms into provider query strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryNormalizer {
    strip: BTreeSet<char>,
}

impl QueryNormalizer {
    /// Create a normalizer removing the given characters
    pub fn new(strip: impl IntoIterator<Item = char>) -> Self {
        Self {
            strip: strip.into_iter().collect(),
        }
    }

    /// Characters removed from every query
    pub fn strip_set(&self) -> impl Iterator<Item = char> + '_ {
        self.strip.iter().copied()
    }

    /// Normalize a raw term
    ///
    /// Trims leading and trailing whitespace, then removes every occurrence of
    /// every strip character, then trims once more. No case folding or other
    /// rewriting happens, and an empty result is returned as-is.
    ///
    /// The final trim is the one transformation beyond stripping: `"猫 ~"`
    /// with `~` in the strip set becomes `"猫"`, not `"猫 "`, so normalizing
    /// an already normalized term never changes it.
    #[must_use]
    pub fn normalize(&self, term: &str) -> String {
        let trimmed = term.trim();
        if self.strip.is_empty() {
            return trimmed.to_string();
        }
        // Removing a character may expose whitespace at either end; the
        // second trim keeps the result a fixed point of `normalize`.
        trimmed
            .chars()
            .filter(|c| !self.strip.contains(c))
            .collect::<String>()
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let normalizer = QueryNormalizer::default();
        assert_eq!(normalizer.normalize(" 사랑 "), "사랑");
        assert_eq!(normalizer.normalize("\t猫\n"), "猫");
    }

    #[test]
    fn trims_whitespace_exposed_by_stripping() {
        let normalizer = QueryNormalizer::new(['~']);
        let once = normalizer.normalize("猫 ~");
        assert_eq!(once, "猫");
        assert_eq!(normalizer.normalize(&once), once);
    }

    #[test]
    fn removes_every_occurrence_of_strip_characters() {
        let normalizer = QueryNormalizer::new(['~', '・']);
        assert_eq!(normalizer.normalize("~た・べ・る~"), "たべる");
    }

    #[test]
    fn keeps_case_and_diacritics() {
        let normalizer = QueryNormalizer::new(['-']);
        assert_eq!(normalizer.normalize("Éco-Le"), "ÉcoLe");
    }

    #[test]
    fn empty_result_is_valid() {
        let normalizer = QueryNormalizer::new(['x']);
        assert_eq!(normalizer.normalize(" xxx "), "");
    }

    #[test]
    fn inner_whitespace_is_preserved() {
        let normalizer = QueryNormalizer::default();
        assert_eq!(normalizer.normalize(" ni hao "), "ni hao");
    }

    #[test]
    fn deserializes_from_character_list() {
        let normalizer: QueryNormalizer = serde_json::from_str(r#"["(", ")"]"#).unwrap();
        assert_eq!(normalizer.strip_set().collect::<Vec<_>>(), vec!['(', ')']);
    }
}
