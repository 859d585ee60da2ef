// src/core/accent.rs
use crate::core::dictionary::Dictionary;
use crate::core::stress::StressResolver;
use crate::core::types::{is_cyrillic, CaseFlags, Token};
use crate::error::Result;
use crate::tagger::Tagger;

/// Keeps Russian letters, single spaces and single newlines. Tabs and every
/// other character are dropped.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let c = match c {
            '\r' => '\n',
            c if is_cyrillic(c) || c == '\n' || c == ' ' => c,
            c if c.is_whitespace() && c != '\t' => ' ',
            _ => continue,
        };
        if (c == ' ' || c == '\n') && out.ends_with(c) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Produces stress-marked text from raw input.
pub struct Accentuator<'a> {
    resolver: StressResolver<'a>,
    tagger: &'a dyn Tagger,
}

impl<'a> Accentuator<'a> {
    pub fn new(dictionary: &'a Dictionary, tagger: &'a dyn Tagger) -> Self {
        Self {
            resolver: StressResolver::new(dictionary),
            tagger,
        }
    }

    /// Sanitizes, tags and stress-marks `text`, preserving case and spacing.
    pub fn accentuate(&self, text: &str) -> Result<String> {
        let clean = sanitize(text);
        let tokens = self.tagger.tag(&clean)?;
        tracing::debug!(tokens = tokens.len(), "tagged input");
        Ok(self.accentuate_tokens(&tokens))
    }

    pub fn accentuate_tokens(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for token in tokens {
            match token {
                Token::Punctuation { surface, whitespace } => {
                    out.push_str(surface);
                    out.push_str(whitespace);
                }
                Token::Word { surface, lemma, tag, whitespace } => {
                    let marked = self.resolver.resolve(surface, lemma, tag);
                    out.push_str(&CaseFlags::of(surface).apply(&marked));
                    out.push_str(whitespace);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Interpretation;
    use crate::tagger::BuiltinTagger;
    use std::collections::HashMap;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Hello, мир!  Дом\t\n\n\nкот"), " мир Дом\nкот");
        assert_eq!(sanitize("ёлка   Ёж"), "ёлка Ёж");
        assert_eq!(sanitize("a\r\nб"), "\nб");
    }

    #[test]
    fn test_accentuate_preserves_case_and_spacing() {
        let mut wordforms = HashMap::new();
        wordforms.insert(
            "молоко".to_string(),
            vec![Interpretation {
                lemma: "молоко".to_string(),
                label: "canonical".to_string(),
                accented: "молоко\u{301}".to_string(),
            }],
        );
        let dict = Dictionary::new(wordforms, HashMap::new());
        let tagger = BuiltinTagger;
        let accentuator = Accentuator::new(&dict, &tagger);

        let out = accentuator.accentuate("Молоко и ДУБ,\nкот").unwrap();
        assert_eq!(out, "Молок`о `и Д`УБ\nк`от");
    }
}
