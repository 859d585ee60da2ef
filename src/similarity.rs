// src/similarity.rs
use crate::spectrum::Spectrum;
use std::collections::BTreeSet;

/// Cosine similarity over the union of both spectra's keys; missing keys
/// count as 0.0. Zero-magnitude input gives 0.0.
pub fn cosine_similarity(a: &Spectrum, b: &Spectrum) -> f64 {
    let keys: BTreeSet<&str> = a.keys().chain(b.keys()).collect();
    let (mut dot, mut norm_a, mut norm_b) = (0.0, 0.0, 0.0);
    for key in keys {
        let (x, y) = (a.get(key), b.get(key));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Scores `spectrum` against every reference, best match first.
pub fn rank_references(spectrum: &Spectrum, references: &[(String, Spectrum)]) -> Vec<(String, f64)> {
    let mut scores: Vec<(String, f64)> = references
        .iter()
        .map(|(author, reference)| (author.clone(), cosine_similarity(spectrum, reference)))
        .collect();
    scores.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scores
}
