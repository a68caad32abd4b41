//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{AudioSource, MediaRef, Pronunciation, ProviderKind, QueryNormalizer};
use proptest::prelude::*;

// ============================================================================
// QueryNormalizer Property Tests
// ============================================================================

mod query_normalizer_tests {
    use super::*;

    fn strip_set() -> impl Strategy<Value = Vec<char>> {
        prop::collection::vec(
            prop_oneof![
                Just(' '),
                Just('('),
                Just(')'),
                Just('~'),
                Just('・'),
                Just('\u{3000}'),
                any::<char>(),
            ],
            0..6,
        )
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(term in "\\PC{0,24}", strip in strip_set()) {
            let normalizer = QueryNormalizer::new(strip);
            let once = normalizer.normalize(&term);
            prop_assert_eq!(normalizer.normalize(&once), once);
        }

        #[test]
        fn normalized_term_has_no_strip_characters(term in "\\PC{0,24}", strip in strip_set()) {
            let normalizer = QueryNormalizer::new(strip.clone());
            let normalized = normalizer.normalize(&term);
            for c in strip {
                prop_assert!(!normalized.contains(c));
            }
        }

        #[test]
        fn normalized_term_has_no_outer_whitespace(term in "\\s{0,3}[a-z猫사랑]{0,8}\\s{0,3}") {
            let normalized = QueryNormalizer::default().normalize(&term);
            prop_assert_eq!(normalized.trim(), normalized.as_str());
        }

        #[test]
        fn empty_strip_set_only_trims(term in "\\PC{0,24}") {
            let normalized = QueryNormalizer::default().normalize(&term);
            prop_assert_eq!(normalized, term.trim().to_string());
        }
    }
}

// ============================================================================
// Pronunciation Property Tests
// ============================================================================

mod pronunciation_tests {
    use super::*;

    proptest! {
        #[test]
        fn non_empty_headword_is_accepted(headword in "[a-z가-힣]{1,12}") {
            let record = Pronunciation::new(
                ProviderKind::Krdict,
                "ko",
                "",
                AudioSource::Url("https://example.com/a.wav".to_string()),
                headword.clone(),
            );
            prop_assert!(record.is_ok());
            let record = record.unwrap();
            prop_assert_eq!(record.headword(), headword.as_str());
        }

        #[test]
        fn attach_then_detach_returns_same_reference(reference in "[a-z0-9_.]{1,20}") {
            let mut record = Pronunciation::new(
                ProviderKind::Shtooka,
                "zh",
                "",
                AudioSource::Url("https://example.com/a.mp3".to_string()),
                "ni3 hao3",
            )
            .unwrap();

            record.attach_media(MediaRef::new(reference.clone())).unwrap();
            prop_assert_eq!(record.detach_media().unwrap().into_inner(), reference);
            prop_assert!(record.detach_media().is_err());
        }
    }
}
