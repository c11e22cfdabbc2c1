//! Sentence embedding providers.
//!
//! Every provider returns L2-normalized vectors of a fixed dimension, so
//! cosine similarity between two embeddings is a plain dot product.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::EmbeddingError;

static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9+#]+").unwrap());

/// Guards the pooling divisor and normalization against empty input.
const MIN_NORM: f32 = 1e-9;

pub trait Embedder: Send + Sync {
    /// Deterministic for identical input.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn dimension(&self) -> usize;

    fn name(&self) -> &str;
}

pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt().max(MIN_NORM);
    for x in vector.iter_mut() {
        *x /= norm;
    }
}

/// Dot product; callers pass normalized vectors. Mismatched lengths score 0.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Mean of token embeddings where `mask` is non-zero.
///
/// `hidden` is row-major `[seq_len, dim]`.
pub fn masked_mean_pool(hidden: &[f32], mask: &[i64], dim: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; dim];
    let mut count = 0.0f32;

    for (row, &m) in hidden.chunks_exact(dim).zip(mask.iter()) {
        if m == 0 {
            continue;
        }
        let weight = m as f32;
        for (acc, value) in pooled.iter_mut().zip(row) {
            *acc += value * weight;
        }
        count += weight;
    }

    let divisor = count.max(MIN_NORM);
    for x in pooled.iter_mut() {
        *x /= divisor;
    }
    pooled
}

/// Model-free embedder over a fitted vocabulary.
///
/// Each vocabulary word gets its own axis weighted by inverse document
/// frequency across the fitted phrases; words outside the vocabulary are
/// ignored. Good enough to separate a closed set of command phrasings when no
/// ONNX model is installed.
#[derive(Debug, Clone)]
pub struct LexicalEmbedder {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f32>,
}

impl LexicalEmbedder {
    pub fn fit<'a, I>(phrases: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        let mut docs = 0usize;

        for phrase in phrases {
            docs += 1;
            let unique: HashSet<String> = words(phrase).into_iter().collect();
            for word in unique {
                *doc_freq.entry(word).or_insert(0) += 1;
            }
        }

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (idx, (word, df)) in doc_freq.into_iter().enumerate() {
            let weight = ((1.0 + docs as f32) / (1.0 + df as f32)).ln() + 1.0;
            vocabulary.insert(word, idx);
            idf.push(weight);
        }

        log::debug!("Lexical embedder fitted: {} phrases, {} words", docs, vocabulary.len());
        Self { vocabulary, idf }
    }
}

fn words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE_WORD
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

impl Embedder for LexicalEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0f32; self.idf.len()];
        for word in words(text) {
            if let Some(&idx) = self.vocabulary.get(&word) {
                vector[idx] += self.idf[idx];
            }
        }
        l2_normalize(&mut vector);
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn normalize_produces_unit_vectors() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_leaves_zero_vector_finite() {
        let mut v = vec![0.0; 4];
        l2_normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn pooling_ignores_padding_positions() {
        // two real tokens, one padding token with a huge value
        let hidden = vec![1.0, 2.0, 3.0, 4.0, 100.0, 100.0];
        let mask = vec![1, 1, 0];
        let pooled = masked_mean_pool(&hidden, &mask, 2);
        assert_eq!(pooled, vec![2.0, 3.0]);
    }

    #[test]
    fn pooling_all_masked_does_not_divide_by_zero() {
        let pooled = masked_mean_pool(&[5.0, 5.0], &[0], 2);
        assert!(pooled.iter().all(|x| x.is_finite() && *x == 0.0));
    }

    #[test]
    fn dot_of_mismatched_lengths_is_zero() {
        assert_eq!(dot(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn lexical_embeddings_are_normalized_and_deterministic() {
        let embedder = LexicalEmbedder::fit(["open music", "open browser", "lock pc"]);
        let a = embedder.embed("Open Music").unwrap();
        let b = embedder.embed("open music").unwrap();
        assert_eq!(a, b);
        assert!((norm(&a) - 1.0).abs() < 1e-5);
        assert_eq!(a.len(), embedder.dimension());
    }

    #[test]
    fn rare_words_outweigh_common_ones() {
        let embedder = LexicalEmbedder::fit(["open music", "open browser", "open web", "start spotify"]);
        let query = embedder.embed("open spotify").unwrap();
        let generic = embedder.embed("open").unwrap();
        let specific = embedder.embed("start spotify").unwrap();
        assert!(dot(&query, &specific) > dot(&query, &generic));
    }

    #[test]
    fn unknown_words_embed_to_zero() {
        let embedder = LexicalEmbedder::fit(["lock pc"]);
        let v = embedder.embed("qwerty").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
