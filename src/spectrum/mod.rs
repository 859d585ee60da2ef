// src/spectrum/mod.rs
//! Sound spectra: phoneme frequency profiles of transcribed text.

pub mod groups;
pub mod window;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub use groups::{custom_grouped_spectrum, GroupSet, PhonemeGroup};
pub use window::{sliding_window_by_length, sliding_window_by_position, WindowEntry};

/// A letter optionally followed by the softness mark.
static PHONEME_UNIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[а-яё]'?").unwrap());

/// Consonants with a hard/soft pair.
const PAIRED: &str = "бвгдзклмнпрстфх";

/// Normalized frequency map, serialized as a flat `key → float` record.
///
/// Values sum to 1.0 whenever the map is non-empty. An empty map means there
/// was nothing to measure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Spectrum(BTreeMap<String, f64>);

impl Spectrum {
    /// Normalizes counts over their own total.
    pub fn from_counts(counts: BTreeMap<String, usize>) -> Self {
        let total: usize = counts.values().sum();
        if total == 0 {
            return Self::default();
        }
        Self(
            counts
                .into_iter()
                .map(|(key, n)| (key, n as f64 / total as f64))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries by descending frequency; ties keep key order.
    pub fn sorted_desc(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }
}

impl FromIterator<(String, f64)> for Spectrum {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub fn phoneme_units(text: &str) -> impl Iterator<Item = &str> {
    PHONEME_UNIT.find_iter(text).map(|m| m.as_str())
}

/// Frequency of every phoneme unit in transcribed text.
pub fn whole_spectrum(text: &str) -> Spectrum {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for unit in phoneme_units(text) {
        *counts.entry(unit.to_string()).or_insert(0) += 1;
    }
    Spectrum::from_counts(counts)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PhonemeClass {
    Whistling,
    Hissing,
    Hard,
    Soft,
}

impl PhonemeClass {
    pub const ALL: [PhonemeClass; 4] = [
        PhonemeClass::Whistling,
        PhonemeClass::Hissing,
        PhonemeClass::Hard,
        PhonemeClass::Soft,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PhonemeClass::Whistling => "свистящие",
            PhonemeClass::Hissing => "шипящие",
            PhonemeClass::Hard => "твердые",
            PhonemeClass::Soft => "мягкие",
        }
    }

    /// Classes are not exclusive: "ц" is both whistling and hard.
    pub fn contains(&self, unit: &str) -> bool {
        let mut chars = unit.chars();
        let Some(base) = chars.next() else {
            return false;
        };
        let soft = chars.next() == Some('\'');
        match self {
            PhonemeClass::Whistling => matches!(base, 'з' | 'с' | 'ц'),
            PhonemeClass::Hissing => matches!(base, 'ж' | 'ш' | 'ч' | 'щ'),
            PhonemeClass::Hard => matches!(base, 'ц' | 'ш' | 'ж') || (PAIRED.contains(base) && !soft),
            PhonemeClass::Soft => matches!(base, 'й' | 'ч' | 'щ') || (PAIRED.contains(base) && soft),
        }
    }
}

/// Whistling / hissing / hard / soft shares, normalized over the sum of
/// class counts.
pub fn grouped_spectrum(text: &str) -> Spectrum {
    let mut counts: BTreeMap<PhonemeClass, usize> = BTreeMap::new();
    for unit in phoneme_units(text) {
        for class in PhonemeClass::ALL {
            if class.contains(unit) {
                *counts.entry(class).or_insert(0) += 1;
            }
        }
    }
    if counts.is_empty() {
        return Spectrum::default();
    }
    Spectrum::from_counts(
        PhonemeClass::ALL
            .iter()
            .map(|class| (class.label().to_string(), counts.get(class).copied().unwrap_or(0)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_whole_spectrum_counts_soft_units() {
        let spectrum = whole_spectrum("м'ат' мат");
        assert!((spectrum.get("м'") - 1.0 / 6.0).abs() < EPS);
        assert!((spectrum.get("а") - 2.0 / 6.0).abs() < EPS);
        assert!((spectrum.get("т") - 1.0 / 6.0).abs() < EPS);
        assert!((spectrum.total() - 1.0).abs() < EPS);
        assert_eq!(spectrum.sorted_desc()[0].0, "а");
    }

    #[test]
    fn test_empty_input_is_empty_spectrum() {
        assert!(whole_spectrum("").is_empty());
        assert!(whole_spectrum(" \n ").is_empty());
        assert!(grouped_spectrum("аоу").is_empty());
    }

    #[test]
    fn test_grouped_spectrum_is_not_exclusive() {
        let spectrum = grouped_spectrum("сад");
        assert!((spectrum.get("свистящие") - 1.0 / 3.0).abs() < EPS);
        assert!((spectrum.get("твердые") - 2.0 / 3.0).abs() < EPS);
        assert_eq!(spectrum.get("шипящие"), 0.0);
        assert_eq!(spectrum.len(), 4);

        assert!(PhonemeClass::Whistling.contains("ц"));
        assert!(PhonemeClass::Hard.contains("ц"));
        assert!(!PhonemeClass::Soft.contains("т"));
        assert!(PhonemeClass::Soft.contains("т'"));
    }

    #[test]
    fn test_grouped_spectrum_sums_to_one() {
        let spectrum = grouped_spectrum("щ'ас'т'й'э ц'эл' жук ч'ай");
        assert!((spectrum.total() - 1.0).abs() < EPS);
        assert!(spectrum.get("мягкие") > spectrum.get("шипящие"));
    }

    #[test]
    fn test_spectrum_serializes_flat() {
        let spectrum = whole_spectrum("аа");
        let json = serde_json::to_string(&spectrum).unwrap();
        assert_eq!(json, r#"{"а":1.0}"#);
        let back: Spectrum = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spectrum);
    }
}
