// File: src/persistence.rs
use crate::core::dictionary::{Dictionary, LemmaEntry};
use crate::core::types::Interpretation;
use crate::error::{PhoneticError, Result};
use crate::spectrum::Spectrum;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const WORDFORMS_FILE: &str = "wordforms.json";
pub const LEMMAS_FILE: &str = "lemmas.json";

fn open_resource(path: &Path) -> Result<BufReader<File>> {
    if !path.is_file() {
        return Err(PhoneticError::DictionaryMissing(path.to_path_buf()));
    }
    Ok(BufReader::new(File::open(path)?))
}

/// Loads the two JSON dictionary tables from `dir`.
pub fn load_dictionary_json(dir: &Path) -> Result<Dictionary> {
    let wordforms: HashMap<String, Vec<Interpretation>> =
        serde_json::from_reader(open_resource(&dir.join(WORDFORMS_FILE))?)?;
    let lemmas: HashMap<String, LemmaEntry> = serde_json::from_reader(open_resource(&dir.join(LEMMAS_FILE))?)?;
    tracing::info!(
        wordforms = wordforms.len(),
        lemmas = lemmas.len(),
        dir = %dir.display(),
        "loaded dictionary"
    );
    Ok(Dictionary::new(wordforms, lemmas))
}

/// Writes through a temp file in the target directory, then renames over
/// `path`, so readers never see a half-written file.
fn write_atomic(path: &Path, write: impl FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path)?;
    Ok(())
}

/// Stores the dictionary as one bincode blob.
pub fn save_compiled_dictionary(dictionary: &Dictionary, path: &Path) -> Result<()> {
    write_atomic(path, |writer| Ok(bincode::serialize_into(writer, dictionary)?))
}

pub fn load_compiled_dictionary(path: &Path) -> Result<Dictionary> {
    let dictionary: Dictionary = bincode::deserialize_from(open_resource(path)?)?;
    tracing::info!(
        wordforms = dictionary.wordform_count(),
        lemmas = dictionary.lemma_count(),
        path = %path.display(),
        "loaded compiled dictionary"
    );
    Ok(dictionary)
}

pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    write_atomic(path, |writer| Ok(serde_json::to_writer_pretty(writer, value)?))
}

/// Reference spectra of known authors, one flat JSON record per author:
/// `<root>/whole/<author>.json` and `<root>/grouped/<author>.json`.
#[derive(Debug, Clone)]
pub struct ReferenceCorpus {
    root: PathBuf,
}

impl ReferenceCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn dir(&self, grouped: bool) -> PathBuf {
        self.root.join(if grouped { "grouped" } else { "whole" })
    }

    pub fn path_for(&self, author: &str, grouped: bool) -> PathBuf {
        self.dir(grouped).join(format!("{author}.json"))
    }

    pub fn save(&self, author: &str, spectrum: &Spectrum, grouped: bool) -> Result<()> {
        save_json(spectrum, &self.path_for(author, grouped))
    }

    /// Every readable reference, sorted by author. Files that fail to parse
    /// are skipped with a warning; a missing directory is an empty corpus.
    pub fn load_all(&self, grouped: bool) -> Result<Vec<(String, Spectrum)>> {
        let dir = self.dir(grouped);
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "reference directory not found");
            return Ok(Vec::new());
        }

        let mut references = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(author) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let parsed = File::open(&path)
                .map_err(PhoneticError::from)
                .and_then(|f| Ok(serde_json::from_reader::<_, Spectrum>(BufReader::new(f))?));
            match parsed {
                Ok(spectrum) => references.push((author.to_string(), spectrum)),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable reference"),
            }
        }
        references.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(references)
    }
}
