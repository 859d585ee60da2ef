// src/config.rs
use crate::error::{PhoneticError, Result};
use crate::tagger::{BuiltinTagger, CommandTagger, Tagger};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_INPUT_CHARS: usize = 100_000;
const APP_DIR: &str = "ruphonetic";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaggerConfig {
    Builtin,
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl TaggerConfig {
    pub fn build(&self) -> Box<dyn Tagger> {
        match self {
            TaggerConfig::Builtin => Box::new(BuiltinTagger),
            TaggerConfig::Command { program, args } => Box::new(CommandTagger::new(program.clone(), args.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhoneticConfig {
    /// Directory holding `wordforms.json` and `lemmas.json`.
    pub dictionary_dir: PathBuf,
    /// Preferred over the JSON tables when the file exists.
    pub compiled_dictionary: Option<PathBuf>,
    pub references_dir: PathBuf,
    pub max_input_chars: usize,
    pub tagger: TaggerConfig,
    pub log_level: String,
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Default for PhoneticConfig {
    fn default() -> Self {
        let base = data_dir();
        Self {
            dictionary_dir: base.join("dictionary"),
            compiled_dictionary: Some(base.join("dictionary.bin")),
            references_dir: base.join("references"),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            tagger: TaggerConfig::Builtin,
            log_level: "info".to_string(),
        }
    }
}

impl PhoneticConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Defaults, overlaid by an optional JSON file, overlaid by `RUPHONETIC_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(dir) = var("RUPHONETIC_DICT_DIR") {
            self.dictionary_dir = PathBuf::from(dir);
        }
        if let Some(path) = var("RUPHONETIC_COMPILED_DICT") {
            self.compiled_dictionary = (!path.is_empty()).then(|| PathBuf::from(path));
        }
        if let Some(dir) = var("RUPHONETIC_REFERENCES") {
            self.references_dir = PathBuf::from(dir);
        }
        if let Some(raw) = var("RUPHONETIC_MAX_CHARS") {
            self.max_input_chars = raw
                .trim()
                .parse()
                .ok()
                .filter(|&n: &usize| n > 0)
                .ok_or(PhoneticError::InvalidConfig {
                    key: "RUPHONETIC_MAX_CHARS",
                    value: raw.clone(),
                })?;
        }
        if let Some(command) = var("RUPHONETIC_TAGGER") {
            let mut parts = command.split_whitespace().map(str::to_string);
            self.tagger = match parts.next() {
                Some(program) => TaggerConfig::Command {
                    program,
                    args: parts.collect(),
                },
                None => TaggerConfig::Builtin,
            };
        }
        if let Some(level) = var("RUPHONETIC_LOG") {
            self.log_level = level;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = PhoneticConfig::default()
            .with_env(env(&[
                ("RUPHONETIC_DICT_DIR", "/data/dict"),
                ("RUPHONETIC_MAX_CHARS", "500"),
                ("RUPHONETIC_TAGGER", "python3 tag.py --model md"),
            ]))
            .unwrap();
        assert_eq!(config.dictionary_dir, PathBuf::from("/data/dict"));
        assert_eq!(config.max_input_chars, 500);
        assert_eq!(
            config.tagger,
            TaggerConfig::Command {
                program: "python3".to_string(),
                args: vec!["tag.py".to_string(), "--model".to_string(), "md".to_string()],
            }
        );
    }

    #[test]
    fn test_bad_max_chars_rejected() {
        let result = PhoneticConfig::default().with_env(env(&[("RUPHONETIC_MAX_CHARS", "lots")]));
        assert!(matches!(result, Err(PhoneticError::InvalidConfig { .. })));
        let result = PhoneticConfig::default().with_env(env(&[("RUPHONETIC_MAX_CHARS", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_file_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"max_input_chars": 42, "tagger": {"kind": "command", "program": "tagger"}}"#,
        )
        .unwrap();
        let config = PhoneticConfig::from_file(&path).unwrap();
        assert_eq!(config.max_input_chars, 42);
        assert_eq!(config.log_level, "info");
        assert!(matches!(config.tagger, TaggerConfig::Command { ref args, .. } if args.is_empty()));

        std::fs::write(&path, r#"{"max_chars": 42}"#).unwrap();
        assert!(PhoneticConfig::from_file(&path).is_err());
    }
}
