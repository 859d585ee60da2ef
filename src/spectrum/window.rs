// src/spectrum/window.rs
use crate::error::{PhoneticError, Result};
use crate::spectrum::{whole_spectrum, Spectrum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One step of a sliding-window analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowEntry {
    pub substring: String,
    pub spectrum: Spectrum,
}

impl WindowEntry {
    fn of(words: &[&str]) -> Self {
        let substring = words.join(" ");
        let spectrum = whole_spectrum(&substring);
        Self { substring, spectrum }
    }
}

/// Spectrum of every run of `word_count` consecutive words, keyed by the
/// index of the first word.
pub fn sliding_window_by_position(text: &str, word_count: usize) -> Result<BTreeMap<usize, WindowEntry>> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if word_count > words.len() {
        return Err(PhoneticError::WindowOutOfRange {
            requested: word_count,
            available: words.len(),
        });
    }
    Ok((0..=words.len() - word_count)
        .map(|start| (start, WindowEntry::of(&words[start..start + word_count])))
        .collect())
}

/// Spectrum of every proper prefix of the text, keyed by its word count.
/// The full text itself is not included.
pub fn sliding_window_by_length(text: &str) -> BTreeMap<usize, WindowEntry> {
    let words: Vec<&str> = text.split_whitespace().collect();
    (1..words.len())
        .map(|len| (len, WindowEntry::of(&words[..len])))
        .collect()
}
