// src/core/stress.rs
//! Stress disambiguation.
//!
//! A word's dictionary interpretations are narrowed step by step (all of
//! them, then the ones compatible with the tagger's features, then the ones
//! sharing the tagger's lemma) until they agree on a single accented
//! spelling. When they never agree the word gets automatic stress only if it
//! has exactly one vowel; otherwise it stays unmarked.

use crate::core::dictionary::Dictionary;
use crate::core::types::{is_cyrillic, is_vowel, Case, Interpretation, MorphTag, Number, Tense, STRESS_MARK};

/// Glyphs dictionaries use *after* a stressed vowel.
const STRESS_GLYPHS: [char; 4] = ['\u{301}', '\u{300}', '\'', '\u{b4}'];

/// Inserts the stress mark before the only vowel of `word`. Words with zero
/// or several vowels come back untouched.
pub fn add_stress_single_vowel(word: &str) -> String {
    let mut positions = word
        .char_indices()
        .filter(|(_, c)| c.to_lowercase().any(is_vowel))
        .map(|(i, _)| i);
    match (positions.next(), positions.next()) {
        (Some(i), None) => {
            let mut out = String::with_capacity(word.len() + 1);
            out.push_str(&word[..i]);
            out.push(STRESS_MARK);
            out.push_str(&word[i..]);
            out
        }
        _ => word.to_string(),
    }
}

/// Rewrites a dictionary spelling into canonical stress-marked form.
pub fn normalize_accented(entry: &str) -> String {
    let chars: Vec<char> = entry.chars().collect();
    let mut out = String::with_capacity(entry.len() + 2);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let glyph_follows = chars.get(i + 1).is_some_and(|n| STRESS_GLYPHS.contains(n));
        if is_cyrillic(c) && glyph_follows {
            let lower = c.to_lowercase().next().unwrap_or(c);
            if is_vowel(lower) && lower != 'ё' && !out.ends_with(STRESS_MARK) {
                out.push(STRESS_MARK);
            }
            out.push(c);
            i += 2;
            continue;
        }
        if !STRESS_GLYPHS.contains(&c) {
            out.push(c);
        }
        i += 1;
    }

    // ё is always stressed.
    if out.contains(['ё', 'Ё']) {
        let mut marked = String::with_capacity(out.len() + 2);
        for c in out.chars() {
            if matches!(c, 'ё' | 'Ё') && !marked.ends_with(STRESS_MARK) {
                marked.push(STRESS_MARK);
            }
            marked.push(c);
        }
        return marked;
    }

    if out.contains(STRESS_MARK) {
        out
    } else {
        add_stress_single_vowel(&out)
    }
}

/// The accented spelling shared by every candidate, if they all agree.
fn unanimous(candidates: &[&Interpretation]) -> Option<String> {
    let (first, rest) = candidates.split_first()?;
    if rest.iter().all(|other| other.accented == first.accented) {
        Some(normalize_accented(&first.accented))
    } else {
        None
    }
}

/// Whether a grammatical label can describe a token carrying `tag`.
///
/// A lemma whose allowed POS markers are all absent from the tag is rejected
/// before any feature is checked.
pub fn is_compatible(interpretation: &Interpretation, tag: &MorphTag, dictionary: &Dictionary) -> bool {
    let allowed = dictionary.allowed_pos(&interpretation.lemma);
    if !allowed.is_empty() && !allowed.iter().any(|pos| tag.has(pos)) {
        return false;
    }

    let label = interpretation.label.as_str();
    if label == "canonical" {
        return true;
    }
    let says = |word: &str| label.contains(word);

    if says("plural") && tag.number() != Some(Number::Plural) {
        return false;
    }
    if says("singular") && tag.number() != Some(Number::Singular) {
        return false;
    }

    let case_ok = match tag.case() {
        Some(Case::Nominative) => says("nominative"),
        Some(Case::Genitive) => says("genitive"),
        Some(Case::Dative) => says("dative"),
        Some(Case::Accusative) => says("accusative") || tag.is_inanimate_adjective(),
        Some(Case::Instrumental) => says("instrumental"),
        Some(Case::Locative) => says("prepositional") || says("locative"),
        None => true,
    };
    if !case_ok {
        return false;
    }

    let conflicting: &[&str] = match tag.tense() {
        Some(Tense::Past) => &["present", "future"],
        Some(Tense::Present) => &["past", "future"],
        Some(Tense::Future) => &["past", "present"],
        None => &[],
    };
    !conflicting.iter().any(|t| says(t))
}

/// Picks a single stressed spelling for a word token.
pub struct StressResolver<'a> {
    dictionary: &'a Dictionary,
}

impl<'a> StressResolver<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self { dictionary }
    }

    /// Returns the stress-marked spelling for `surface`. Capitalization is the
    /// caller's concern.
    pub fn resolve(&self, surface: &str, lemma: &str, tag: &MorphTag) -> String {
        let interpretations = self.dictionary.lookup(surface);
        if tag.is_proper_noun() || interpretations.is_empty() {
            return add_stress_single_vowel(surface);
        }

        let narrowings: [&dyn Fn(&Interpretation) -> bool; 3] = [
            &|_| true,
            &|i| is_compatible(i, tag, self.dictionary),
            &|i| i.lemma == lemma,
        ];

        let mut candidates: Vec<&Interpretation> = interpretations.iter().collect();
        for keep in narrowings {
            candidates.retain(|i| keep(*i));
            if let Some(form) = unanimous(&candidates) {
                return form;
            }
        }

        add_stress_single_vowel(surface)
    }
}
