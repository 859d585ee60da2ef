// src/spectrum/groups.rs
use crate::error::{PhoneticError, Result};
use crate::spectrum::Spectrum;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:[а-яё]+'?)+$").unwrap());

/// A caller-declared set of phoneme labels, written as `а|о|т'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonemeGroup {
    declaration: String,
    labels: Vec<String>,
}

impl PhonemeGroup {
    pub fn parse(declaration: &str) -> Result<Self> {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            return Err(PhoneticError::invalid_group(declaration, "empty declaration"));
        }
        let mut seen = HashSet::new();
        let mut labels = Vec::new();
        for label in declaration.split('|') {
            if !LABEL.is_match(label) {
                return Err(PhoneticError::invalid_group(
                    declaration,
                    format!("'{label}' is not a phoneme label"),
                ));
            }
            if !seen.insert(label) {
                return Err(PhoneticError::invalid_group(
                    declaration,
                    format!("'{label}' appears twice"),
                ));
            }
            labels.push(label.to_string());
        }
        Ok(Self {
            declaration: declaration.to_string(),
            labels,
        })
    }

    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Occurrences of the group's labels. A label only counts when it is not
    /// followed by a softness mark, so "т" never counts "т'".
    pub fn count_in(&self, text: &str) -> usize {
        self.labels
            .iter()
            .map(|label| {
                text.match_indices(label.as_str())
                    .filter(|(at, _)| !text[at + label.len()..].starts_with('\''))
                    .count()
            })
            .sum()
    }
}

/// Groups collected one declaration at a time. A label may belong to only
/// one group.
#[derive(Debug, Clone, Default)]
pub struct GroupSet {
    groups: Vec<PhonemeGroup>,
}

impl GroupSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: PhonemeGroup) -> Result<()> {
        let taken = self
            .groups
            .iter()
            .flat_map(|g| g.labels.iter())
            .find(|label| group.labels.contains(label));
        if let Some(label) = taken {
            return Err(PhoneticError::invalid_group(
                &group.declaration,
                format!("'{label}' is already in another group"),
            ));
        }
        self.groups.push(group);
        Ok(())
    }

    /// Parses and adds a declaration; on error the set is left unchanged.
    pub fn declare(&mut self, declaration: &str) -> Result<()> {
        self.push(PhonemeGroup::parse(declaration)?)
    }

    pub fn groups(&self) -> &[PhonemeGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Each group's share of all group matches. When nothing matches at all
/// every group is reported as 0.0.
pub fn custom_grouped_spectrum(text: &str, groups: &[PhonemeGroup]) -> Spectrum {
    let counts: Vec<(String, usize)> = groups
        .iter()
        .map(|g| (g.declaration.clone(), g.count_in(text)))
        .collect();
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    counts
        .into_iter()
        .map(|(key, n)| {
            let share = if total == 0 { 0.0 } else { n as f64 / total as f64 };
            (key, share)
        })
        .collect()
}
