// src/tagger.rs
//! Tokenization and morphological tagging collaborators.
//!
//! The engine only needs an ordered list of [`Token`]s per text. Real tagging
//! is delegated to an external program; the builtin tagger is a
//! dictionary-only fallback that never yields morphological features.

use crate::core::types::{is_cyrillic, Token};
use crate::error::{PhoneticError, Result};
use serde::Deserialize;
use std::io::{self, Write};
use std::process::{Command, Stdio};

pub trait Tagger: Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<Token>>;
}

/// Splits text into Cyrillic words and single-character punctuation. Lemma is
/// the lowercase surface; tags are empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTagger;

impl Tagger for BuiltinTagger {
    fn tag(&self, text: &str) -> Result<Vec<Token>> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c.is_whitespace() {
                match tokens.last_mut() {
                    Some(Token::Word { whitespace, .. }) | Some(Token::Punctuation { whitespace, .. }) => {
                        whitespace.push(c)
                    }
                    None => tokens.push(Token::punctuation("", &c.to_string())),
                }
            } else if is_cyrillic(c) || c == '-' {
                let mut word = c.to_string();
                while let Some(&next) = chars.peek() {
                    if is_cyrillic(next) || next == '-' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let lemma = word.to_lowercase();
                tokens.push(Token::word(&word, &lemma, "", ""));
            } else {
                tokens.push(Token::punctuation(&c.to_string(), ""));
            }
        }
        Ok(tokens)
    }
}

/// One token as emitted by an external tagger script.
#[derive(Debug, Deserialize)]
struct TaggedRecord {
    text: String,
    #[serde(default)]
    lemma: String,
    #[serde(default)]
    tag: String,
    #[serde(default)]
    whitespace: String,
    #[serde(default)]
    is_punct: bool,
}

impl From<TaggedRecord> for Token {
    fn from(record: TaggedRecord) -> Self {
        if record.is_punct {
            Token::punctuation(&record.text, &record.whitespace)
        } else {
            let lemma = if record.lemma.is_empty() {
                record.text.to_lowercase()
            } else {
                record.lemma
            };
            Token::word(&record.text, &lemma, &record.tag, &record.whitespace)
        }
    }
}

/// Runs an external tagger: text on stdin, a JSON token array on stdout.
#[derive(Debug, Clone)]
pub struct CommandTagger {
    program: String,
    args: Vec<String>,
}

impl CommandTagger {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    fn run(&self, text: &str) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PhoneticError::Tagger(format!("cannot start {}: {e}", self.program)))?;

        // Input is fed from its own thread while stdout drains; a tagger that
        // streams output would otherwise fill its pipe and never read the rest.
        let stdin = child.stdin.take();
        let (output, fed) = std::thread::scope(|scope| {
            let feeder = scope.spawn(move || -> io::Result<()> {
                match stdin {
                    Some(mut stdin) => stdin.write_all(text.as_bytes()),
                    None => Ok(()),
                }
            });
            let output = child.wait_with_output();
            (output, feeder.join())
        });
        let output = output?;
        match fed {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!(program = %self.program, "tagger exited before reading all input");
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(PhoneticError::Tagger("input writer thread panicked".to_string())),
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(program = %self.program, code = ?output.status.code(), %stderr, "tagger exited with failure");
            return Err(PhoneticError::Tagger(format!(
                "{} exited with {:?}",
                self.program,
                output.status.code()
            )));
        }
        Ok(output.stdout)
    }
}

impl Tagger for CommandTagger {
    fn tag(&self, text: &str) -> Result<Vec<Token>> {
        let stdout = self.run(text)?;
        let records: Vec<TaggedRecord> = serde_json::from_slice(&stdout)
            .map_err(|e| PhoneticError::Tagger(format!("unreadable tagger output: {e}")))?;
        Ok(records.into_iter().map(Token::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tagger_keeps_whitespace() {
        let tokens = BuiltinTagger.tag(" Мама мыла\nраму").unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], Token::punctuation("", " "));
        assert_eq!(tokens[1], Token::word("Мама", "мама", "", " "));
        assert_eq!(tokens[2].whitespace(), "\n");
        assert_eq!(tokens[3].surface(), "раму");
    }

    #[test]
    fn test_builtin_tagger_punctuation() {
        let tokens = BuiltinTagger.tag("да, нет").unwrap();
        let surfaces: Vec<&str> = tokens.iter().map(Token::surface).collect();
        assert_eq!(surfaces, ["да", ",", "нет"]);
        assert!(matches!(tokens[1], Token::Punctuation { .. }));
    }

    #[test]
    fn test_record_conversion() {
        let json = r#"[{"text":"Москва","lemma":"москва","tag":"PROPN__Case=Nom","whitespace":" "},
                       {"text":".","is_punct":true}]"#;
        let records: Vec<TaggedRecord> = serde_json::from_str(json).unwrap();
        let tokens: Vec<Token> = records.into_iter().map(Token::from).collect();
        assert_eq!(tokens[0], Token::word("Москва", "москва", "PROPN__Case=Nom", " "));
        assert_eq!(tokens[1], Token::punctuation(".", ""));
    }

    #[cfg(unix)]
    #[test]
    fn test_large_input_does_not_block_on_echoing_tagger() {
        let text = "а ".repeat(70_000);
        let tagger = CommandTagger::new("cat", vec![]);
        let echoed = tagger.run(&text).unwrap();
        assert_eq!(echoed.len(), text.len());
    }

    #[cfg(unix)]
    #[test]
    fn test_tagger_ignoring_input_still_answers() {
        let tagger = CommandTagger::new("sh", vec!["-c".to_string(), "echo '[]'".to_string()]);
        let tokens = tagger.tag(&"слово ".repeat(20_000)).unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_missing_tagger_program_is_error() {
        let tagger = CommandTagger::new("ruphonetic-no-such-tagger", vec![]);
        assert!(matches!(tagger.tag("текст"), Err(PhoneticError::Tagger(_))));
    }
}
