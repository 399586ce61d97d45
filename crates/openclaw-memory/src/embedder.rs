use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Fixed dimension required by §3's Memory row invariant.
pub const EMBEDDING_DIM: usize = 384;

/// Deterministic, dependency-free local text embedder.
///
/// Produces 384-dim embeddings for cosine similarity (§3) without a
/// network call or model download: a SimHash-style embedding where each
/// word contributes a deterministic +/-1 per dimension via a bit spread of its
/// hash, the per-dimension sums are accumulated, and the result is
/// L2-normalized. Same text always produces the same vector; no two
/// unrelated texts are expected to collide.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(EMBEDDING_DIM)
    }
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        self.compute_embedding(text)
    }

    pub fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.compute_embedding(t)).collect()
    }

    fn compute_embedding(&self, text: &str) -> Vec<f32> {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();

        let mut acc = vec![0.0f32; self.dimension];
        if words.is_empty() {
            return acc;
        }

        for word in &words {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let hash = hasher.finish();

            for (i, slot) in acc.iter_mut().enumerate() {
                let mixed = hash ^ (i as u64);
                let bit = (mixed >> (i % 64)) & 1;
                *slot += if bit == 1 { 1.0 } else { -1.0 };
            }
        }

        let norm = acc.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for slot in &mut acc {
                *slot /= norm;
            }
        }
        acc
    }
}

/// Cosine similarity between two equal-length vectors; 0.0 if either is
/// the zero vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_text() {
        let e = HashEmbedder::default();
        assert_eq!(e.embed("hello world"), e.embed("hello world"));
    }

    #[test]
    fn different_text_yields_different_embedding() {
        let e = HashEmbedder::default();
        assert_ne!(e.embed("hello world"), e.embed("goodbye moon"));
    }

    #[test]
    fn default_dimension_is_384() {
        let e = HashEmbedder::default();
        assert_eq!(e.dimension(), 384);
        assert_eq!(e.embed("x").len(), 384);
    }

    #[test]
    fn empty_input_is_zero_vector() {
        let e = HashEmbedder::default();
        assert!(e.embed("").iter().all(|v| *v == 0.0));
        assert!(e.embed("   ").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn non_empty_input_is_unit_length() {
        let e = HashEmbedder::default();
        let v = e.embed("the quick brown fox");
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn case_insensitive() {
        let e = HashEmbedder::default();
        assert_eq!(e.embed("Hello World"), e.embed("hello world"));
    }

    #[test]
    fn batch_matches_individual() {
        let e = HashEmbedder::default();
        let texts = vec!["alpha".to_string(), "beta".to_string()];
        let batch = e.embed_batch(&texts);
        assert_eq!(batch[0], e.embed("alpha"));
        assert_eq!(batch[1], e.embed("beta"));
    }

    #[test]
    fn identical_text_has_similarity_one() {
        let e = HashEmbedder::default();
        let v = e.embed("I live in Freehold NJ");
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn unrelated_text_has_lower_similarity_than_identical() {
        let e = HashEmbedder::default();
        let a = e.embed("I live in Freehold NJ");
        let b = e.embed("My dog's name is Max");
        assert!(cosine_similarity(&a, &a) > cosine_similarity(&a, &b));
    }
}
