//! Property tests for the transcription pipeline and the spectrum measures.
//!
//! - simplify is idempotent
//! - the pipeline accepts any lowercase marked text
//! - whole and grouped spectra sum to 1 when non-empty
//! - position windows number len - width + 1
//! - a spectrum is fully similar to itself and unrelated to nothing

use phonetic_core::core::rules::{run_pipeline, simplify};
use phonetic_core::similarity::cosine_similarity;
use phonetic_core::spectrum::{
    grouped_spectrum, phoneme_units, sliding_window_by_length, sliding_window_by_position, whole_spectrum,
};
use phonetic_core::Spectrum;
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn arb_marked_text() -> impl Strategy<Value = String> {
    "[абвгдеёжзийклмнопрстуфхцчшщъыьэюя`' \n]{0,80}"
}

fn arb_transcription() -> impl Strategy<Value = String> {
    "[абвгдйклмнопрстуфхцчшщыэ' ]{1,80}"
}

fn arb_words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[а-я]{1,6}", 0..12)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_simplify_is_idempotent(text in arb_marked_text()) {
        let once = simplify(&text);
        prop_assert_eq!(simplify(&once), once.clone());
        prop_assert!(!once.contains('`'));
        prop_assert!(!once.contains("''"));
    }

    #[test]
    fn prop_pipeline_output_is_clean(text in arb_marked_text()) {
        let out = run_pipeline(&text, true, |_, _| {});
        prop_assert!(!out.contains('ъ'));
        prop_assert!(!out.contains('`'));
        prop_assert!(out.chars().all(|c| c != 'ь' && c != '\t'));
    }

    #[test]
    fn prop_pipeline_reports_every_stage(text in arb_marked_text(), simplify_output in any::<bool>()) {
        let mut seen = 0;
        run_pipeline(&text, simplify_output, |_, _| seen += 1);
        prop_assert_eq!(seen, if simplify_output { 9 } else { 8 });
    }

    #[test]
    fn prop_whole_spectrum_is_normalized(text in arb_transcription()) {
        let spectrum = whole_spectrum(&text);
        let units = phoneme_units(&text).count();
        if units == 0 {
            prop_assert!(spectrum.is_empty());
        } else {
            prop_assert!((spectrum.total() - 1.0).abs() < 1e-9);
            for key in spectrum.keys() {
                prop_assert!(key.chars().count() <= 2);
                prop_assert!(key.chars().next().is_some_and(|c| c != '\''));
            }
        }
    }

    #[test]
    fn prop_grouped_spectrum_is_normalized(text in arb_transcription()) {
        let spectrum = grouped_spectrum(&text);
        prop_assert!(spectrum.is_empty() || (spectrum.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prop_position_window_count(words in arb_words(), width in 0usize..14) {
        let text = words.join(" ");
        match sliding_window_by_position(&text, width) {
            Ok(windows) => prop_assert_eq!(windows.len(), words.len() - width + 1),
            Err(_) => prop_assert!(width > words.len()),
        }
        prop_assert_eq!(sliding_window_by_length(&text).len(), words.len().saturating_sub(1));
    }

    #[test]
    fn prop_cosine_bounds(text in arb_transcription(), other in arb_transcription()) {
        let a = whole_spectrum(&text);
        let b = whole_spectrum(&other);
        if !a.is_empty() {
            prop_assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-9);
        }
        prop_assert_eq!(cosine_similarity(&a, &Spectrum::default()), 0.0);
        let score = cosine_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score));
        prop_assert!((score - cosine_similarity(&b, &a)).abs() < 1e-12);
    }
}
