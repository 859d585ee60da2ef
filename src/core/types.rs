// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Placed immediately before a stressed vowel.
pub const STRESS_MARK: char = '`';
/// Placed immediately after a palatalized consonant.
pub const SOFT_MARK: char = '\'';

pub const VOWELS: &str = "аеёиоуыэюя";
pub const CONSONANTS: &str = "бвгджзйклмнпрстфхцчшщ";

pub fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

pub fn is_consonant(c: char) -> bool {
    CONSONANTS.contains(c)
}

/// Lowercase or uppercase Russian letter, including ё/Ё.
pub fn is_cyrillic(c: char) -> bool {
    matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

/// One candidate grammatical reading of a dictionary word-form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub lemma: String,
    /// Grammatical label such as "canonical" or "plural genitive".
    #[serde(rename = "form")]
    pub label: String,
    /// Spelling with the dictionary's own stress glyph.
    #[serde(rename = "accentuated")]
    pub accented: String,
}

/// Morphological feature string produced by the tagger, e.g.
/// `ADJ__Animacy=Inan|Case=Acc|Number=Sing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MorphTag(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Number {
    Singular,
    Plural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Nominative,
    Genitive,
    Dative,
    Accusative,
    Instrumental,
    Locative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tense {
    Past,
    Present,
    Future,
}

impl MorphTag {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring membership, the way tag features are matched everywhere.
    pub fn has(&self, feature: &str) -> bool {
        !feature.is_empty() && self.0.contains(feature)
    }

    pub fn is_proper_noun(&self) -> bool {
        self.has("PROPN")
    }

    pub fn number(&self) -> Option<Number> {
        if self.has("Number=Plur") {
            Some(Number::Plural)
        } else if self.has("Number=Sing") {
            Some(Number::Singular)
        } else {
            None
        }
    }

    pub fn case(&self) -> Option<Case> {
        [
            ("Case=Nom", Case::Nominative),
            ("Case=Gen", Case::Genitive),
            ("Case=Dat", Case::Dative),
            ("Case=Acc", Case::Accusative),
            ("Case=Ins", Case::Instrumental),
            ("Case=Loc", Case::Locative),
        ]
        .into_iter()
        .find(|(feature, _)| self.has(feature))
        .map(|(_, case)| case)
    }

    pub fn tense(&self) -> Option<Tense> {
        [
            ("Tense=Past", Tense::Past),
            ("Tense=Pres", Tense::Present),
            ("Tense=Fut", Tense::Future),
        ]
        .into_iter()
        .find(|(feature, _)| self.has(feature))
        .map(|(_, tense)| tense)
    }

    /// Inanimate adjectives take the nominative-like accusative form.
    pub fn is_inanimate_adjective(&self) -> bool {
        self.has("ADJ") && self.has("Animacy=Inan")
    }
}

/// A tagged unit of input text. Order across a text is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Punctuation {
        surface: String,
        whitespace: String,
    },
    Word {
        surface: String,
        lemma: String,
        tag: MorphTag,
        whitespace: String,
    },
}

impl Token {
    pub fn word(surface: &str, lemma: &str, tag: &str, whitespace: &str) -> Self {
        Token::Word {
            surface: surface.to_string(),
            lemma: lemma.to_string(),
            tag: MorphTag::new(tag),
            whitespace: whitespace.to_string(),
        }
    }

    pub fn punctuation(surface: &str, whitespace: &str) -> Self {
        Token::Punctuation {
            surface: surface.to_string(),
            whitespace: whitespace.to_string(),
        }
    }

    pub fn surface(&self) -> &str {
        match self {
            Token::Punctuation { surface, .. } | Token::Word { surface, .. } => surface,
        }
    }

    pub fn whitespace(&self) -> &str {
        match self {
            Token::Punctuation { whitespace, .. } | Token::Word { whitespace, .. } => whitespace,
        }
    }
}

/// Letter-case shape of a surface form, reapplied after stress placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseFlags {
    pub uppercase: bool,
    pub capitalized: bool,
}

impl CaseFlags {
    pub fn of(surface: &str) -> Self {
        let letters: Vec<char> = surface.chars().filter(|c| c.is_alphabetic()).collect();
        Self {
            uppercase: letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()),
            capitalized: letters.first().is_some_and(|c| c.is_uppercase()),
        }
    }

    /// Applies the flags to a stress-marked word. The marker is skipped over so
    /// the first *letter* is the one capitalized.
    pub fn apply(&self, marked: &str) -> String {
        if self.uppercase {
            return marked.to_uppercase();
        }
        let lower = marked.to_lowercase();
        if !self.capitalized {
            return lower;
        }
        let mut out = String::with_capacity(lower.len());
        let mut done = false;
        for c in lower.chars() {
            if !done && c.is_alphabetic() {
                out.extend(c.to_uppercase());
                done = true;
            } else {
                out.push(c);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_morph_tag_features() {
        let tag = MorphTag::new("ADJ__Animacy=Inan|Case=Acc|Number=Plur");
        assert_eq!(tag.number(), Some(Number::Plural));
        assert_eq!(tag.case(), Some(Case::Accusative));
        assert_eq!(tag.tense(), None);
        assert!(tag.is_inanimate_adjective());
        assert!(!tag.is_proper_noun());
    }

    #[test]
    fn test_case_flags_skip_stress_mark() {
        let flags = CaseFlags::of("Мама");
        assert!(flags.capitalized);
        assert!(!flags.uppercase);
        assert_eq!(flags.apply("м`ама"), "М`ама");
        assert_eq!(CaseFlags::of("ООН").apply("о`он"), "О`ОН");
        assert_eq!(CaseFlags::of("дуб").apply("д`уб"), "д`уб");
    }

    #[test]
    fn test_alphabet() {
        assert!(is_vowel('ё'));
        assert!(!is_vowel('й'));
        assert!(is_consonant('й'));
        assert!(is_cyrillic('Ё'));
        assert!(!is_cyrillic('z'));
    }
}
