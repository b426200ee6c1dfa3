//! Pluggable similarity backends scoring two normalized texts on a 0-100 scale

use std::collections::BTreeMap;

/// Highest attainable score
pub const MAX_SCORE: f32 = 100.0;

/// Scores semantic closeness of two already-normalized texts.
///
/// Implementations must be symmetric, return [`MAX_SCORE`] (or the highest
/// value they can reach) for identical non-empty input, stay within
/// `0.0..=100.0`, and return `0.0` rather than failing on empty or
/// out-of-vocabulary text.
pub trait SimilarityBackend: Send + Sync {
    fn score(&self, normalized_a: &str, normalized_b: &str) -> f32;

    /// Short backend name for logs and reports
    fn name(&self) -> &str;
}

/// Cosine similarity of bag-of-words term-count vectors.
///
/// Needs no model, and gives exactly [`MAX_SCORE`] for identical texts since
/// every intermediate value is an integer.
#[derive(Debug, Default, Clone)]
pub struct TermVectorBackend;

impl TermVectorBackend {
    pub fn new() -> Self {
        Self
    }

    fn term_counts(text: &str) -> BTreeMap<&str, u64> {
        let mut counts = BTreeMap::new();
        for term in text.split_whitespace() {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }
}

impl SimilarityBackend for TermVectorBackend {
    fn score(&self, normalized_a: &str, normalized_b: &str) -> f32 {
        let a = Self::term_counts(normalized_a);
        let b = Self::term_counts(normalized_b);

        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let dot: u64 = a
            .iter()
            .filter_map(|(term, count)| b.get(term).map(|other| count * other))
            .sum();
        let norm_a: u64 = a.values().map(|c| c * c).sum();
        let norm_b: u64 = b.values().map(|c| c * c).sum();

        let cosine = dot as f64 / (norm_a as f64 * norm_b as f64).sqrt();
        to_score(cosine)
    }

    fn name(&self) -> &str {
        "term-vector"
    }
}

/// Map a cosine in [-1, 1] onto the 0-100 scale; negatives and NaN become 0
pub fn to_score(cosine: f64) -> f32 {
    if cosine.is_nan() {
        return 0.0;
    }
    (cosine.clamp(0.0, 1.0) * MAX_SCORE as f64) as f32
}

/// Cosine similarity of two dense vectors, 0.0 for mismatched or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b).sqrt()
    }
}
