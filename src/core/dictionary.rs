// src/core/dictionary.rs
use crate::core::types::Interpretation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Allowed part-of-speech markers for one lemma.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmaEntry {
    pub pos: Vec<String>,
}

/// Read-only accented-wordform store.
///
/// Built once at startup (from JSON or the compiled cache, see
/// [`crate::persistence`]) and shared immutably afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dictionary {
    wordforms: HashMap<String, Vec<Interpretation>>,
    lemmas: HashMap<String, LemmaEntry>,
}

impl Dictionary {
    pub fn new(
        wordforms: HashMap<String, Vec<Interpretation>>,
        lemmas: HashMap<String, LemmaEntry>,
    ) -> Self {
        Self { wordforms, lemmas }
    }

    /// Interpretations for a word-form. The exact spelling is tried first,
    /// then the lowercase one. Unknown forms give an empty slice.
    pub fn lookup(&self, word_form: &str) -> &[Interpretation] {
        if let Some(found) = self.wordforms.get(word_form) {
            return found;
        }
        let lower = word_form.to_lowercase();
        if lower != word_form {
            if let Some(found) = self.wordforms.get(&lower) {
                return found;
            }
        }
        &[]
    }

    /// POS markers a lemma may carry. Empty means "no constraint".
    pub fn allowed_pos(&self, lemma: &str) -> &[String] {
        self.lemmas
            .get(lemma)
            .map(|entry| entry.pos.as_slice())
            .unwrap_or(&[])
    }

    pub fn wordform_count(&self) -> usize {
        self.wordforms.len()
    }

    pub fn lemma_count(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wordforms.is_empty()
    }
}
