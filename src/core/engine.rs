use crate::config::PhoneticConfig;
use crate::core::accent::Accentuator;
use crate::core::dictionary::Dictionary;
use crate::core::rules;
use crate::error::{PhoneticError, Result};
use crate::persistence::{load_compiled_dictionary, load_dictionary_json, ReferenceCorpus};
use crate::similarity::rank_references;
use crate::spectrum::{self, PhonemeGroup, Spectrum, WindowEntry};
use crate::tagger::Tagger;
use rayon::prelude::*;
use std::borrow::Cow;
use std::collections::BTreeMap;

// The engine owns the dictionary and the tagger handle; every call is a pure
// function of its input, so one engine can serve many threads.
pub struct PhoneticEngine {
    dictionary: Dictionary,
    tagger: Box<dyn Tagger>,
    max_input_chars: usize,
}

impl PhoneticEngine {
    pub fn new(dictionary: Dictionary, tagger: Box<dyn Tagger>) -> Self {
        Self {
            dictionary,
            tagger,
            max_input_chars: crate::config::DEFAULT_MAX_INPUT_CHARS,
        }
    }

    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    /// Loads the compiled dictionary when present, the JSON tables otherwise.
    /// A missing dictionary is fatal.
    pub fn from_config(config: &PhoneticConfig) -> Result<Self> {
        let dictionary = match &config.compiled_dictionary {
            Some(path) if path.is_file() => load_compiled_dictionary(path)?,
            _ => load_dictionary_json(&config.dictionary_dir)?,
        };
        Ok(Self::new(dictionary, config.tagger.build()).with_max_input_chars(config.max_input_chars))
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    fn bounded<'t>(&self, text: &'t str) -> &'t str {
        match text.char_indices().nth(self.max_input_chars) {
            Some((cut, _)) => {
                tracing::warn!(
                    limit = self.max_input_chars,
                    dropped_bytes = text.len() - cut,
                    "input truncated"
                );
                &text[..cut]
            }
            None => text,
        }
    }

    /// Stress-marked text with the original capitalization.
    pub fn accentuate(&self, text: &str) -> Result<String> {
        Accentuator::new(&self.dictionary, self.tagger.as_ref()).accentuate(self.bounded(text))
    }

    pub fn transcribe(&self, text: &str, simplify: bool, verbose: bool) -> Result<String> {
        let marked = self.accentuate(text)?.to_lowercase();
        if verbose {
            tracing::info!(stage = "accentuate", output = %marked);
        }
        Ok(rules::run_pipeline(&marked, simplify, |stage, output| {
            if verbose {
                tracing::info!(stage = stage.name(), %output);
            }
        }))
    }

    /// Transcribes independent texts in parallel.
    pub fn transcribe_batch<S: AsRef<str> + Sync>(&self, texts: &[S], simplify: bool) -> Vec<Result<String>> {
        texts
            .par_iter()
            .map(|text| self.transcribe(text.as_ref(), simplify, false))
            .collect()
    }

    fn transcribed<'t>(&self, text: &'t str, already_transcribed: bool) -> Result<Cow<'t, str>> {
        if already_transcribed {
            Ok(Cow::Borrowed(self.bounded(text)))
        } else {
            Ok(Cow::Owned(self.transcribe(text, true, false)?))
        }
    }

    pub fn sound_spectrum(&self, text: &str, already_transcribed: bool) -> Result<Spectrum> {
        Ok(spectrum::whole_spectrum(&self.transcribed(text, already_transcribed)?))
    }

    pub fn grouped_spectrum(&self, text: &str, already_transcribed: bool) -> Result<Spectrum> {
        Ok(spectrum::grouped_spectrum(&self.transcribed(text, already_transcribed)?))
    }

    pub fn custom_grouped_spectrum(
        &self,
        text: &str,
        already_transcribed: bool,
        groups: &[PhonemeGroup],
    ) -> Result<Spectrum> {
        let text = self.transcribed(text, already_transcribed)?;
        Ok(spectrum::custom_grouped_spectrum(&text, groups))
    }

    pub fn sliding_window_by_position(
        &self,
        text: &str,
        word_count: usize,
        already_transcribed: bool,
    ) -> Result<BTreeMap<usize, WindowEntry>> {
        spectrum::sliding_window_by_position(&self.transcribed(text, already_transcribed)?, word_count)
    }

    pub fn sliding_window_by_length(
        &self,
        text: &str,
        already_transcribed: bool,
    ) -> Result<BTreeMap<usize, WindowEntry>> {
        Ok(spectrum::sliding_window_by_length(&self.transcribed(text, already_transcribed)?))
    }

    /// Authors ranked by similarity of their reference spectrum to the text's.
    pub fn identify_author(
        &self,
        text: &str,
        grouped: bool,
        corpus: &ReferenceCorpus,
    ) -> Result<Vec<(String, f64)>> {
        let spectrum = if grouped {
            self.grouped_spectrum(text, false)?
        } else {
            self.sound_spectrum(text, false)?
        };
        let references = corpus.load_all(grouped)?;
        if references.is_empty() {
            tracing::warn!("no reference spectra to compare against");
        }
        Ok(rank_references(&spectrum, &references))
    }

    /// Computes and stores both spectra of `text` for `author`.
    pub fn build_reference(&self, author: &str, text: &str, corpus: &ReferenceCorpus) -> Result<()> {
        if author.is_empty() || author.contains(['/', '\\']) {
            return Err(PhoneticError::InvalidConfig {
                key: "author",
                value: author.to_string(),
            });
        }
        let transcription = self.transcribe(text, true, false)?;
        corpus.save(author, &spectrum::whole_spectrum(&transcription), false)?;
        corpus.save(author, &spectrum::grouped_spectrum(&transcription), true)?;
        tracing::info!(author, "stored reference spectra");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::BuiltinTagger;

    fn engine() -> PhoneticEngine {
        PhoneticEngine::new(Dictionary::default(), Box::new(BuiltinTagger))
    }

    #[test]
    fn test_transcribe_single_vowel_word() {
        assert_eq!(engine().transcribe("Дуб", true, false).unwrap(), "дуп");
        assert_eq!(engine().transcribe("дуб", false, true).unwrap(), "д`уп");
    }

    #[test]
    fn test_input_is_truncated() {
        let engine = engine().with_max_input_chars(3);
        assert_eq!(engine.transcribe("дуб дуб", true, false).unwrap(), "дуп");
    }

    #[test]
    fn test_batch_matches_sequential() {
        let engine = engine();
        let texts = ["кот", "дуб", "сад"];
        let batch: Vec<String> = engine
            .transcribe_batch(&texts, true)
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(batch, ["кот", "дуп", "сат"]);
    }

    #[test]
    fn test_transcribed_spectrum_skips_pipeline() {
        let spectrum = engine().sound_spectrum("дуб", true).unwrap();
        assert!(spectrum.get("б") > 0.0);
        let spectrum = engine().sound_spectrum("дуб", false).unwrap();
        assert_eq!(spectrum.get("б"), 0.0);
        assert!(spectrum.get("п") > 0.0);
    }
}
