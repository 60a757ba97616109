//! Deterministic fallback provider, grounded in the teacher's
//! `cortex-embeddings::providers::tfidf_fallback` — a provider that is
//! always available so the degradation chain never hard-fails (spec §9).
//!
//! The embedding model proper is explicitly out of scope (spec §1): this
//! expands a blake3 hash of the text into a unit vector of the
//! configured dimension. It is not semantically meaningful, only stable
//! and total, which is all the engine's contract requires of a provider
//! of last resort.

use recall_core::errors::RecallResult;
use recall_core::traits::EmbeddingProvider;

pub struct HashFallbackProvider {
    dimension: u32,
}

impl HashFallbackProvider {
    pub fn new(dimension: u32) -> Self {
        Self { dimension }
    }
}

impl EmbeddingProvider for HashFallbackProvider {
    fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
        let dim = self.dimension as usize;
        let mut out = Vec::with_capacity(dim);
        let mut seed = blake3::hash(text.as_bytes());
        while out.len() < dim {
            let bytes = seed.as_bytes();
            for chunk in bytes.chunks_exact(4) {
                if out.len() >= dim {
                    break;
                }
                let v = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                // Map into [-1, 1].
                out.push((v as f64 / u32::MAX as f64 * 2.0 - 1.0) as f32);
            }
            seed = blake3::hash(seed.as_bytes());
        }
        Ok(out)
    }

    fn dimension(&self) -> u32 {
        self.dimension
    }

    fn name(&self) -> &str {
        "hash-fallback"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_to_the_configured_dimension() {
        let p = HashFallbackProvider::new(16);
        assert_eq!(p.embed("hello").unwrap().len(), 16);
    }

    #[test]
    fn is_deterministic() {
        let p = HashFallbackProvider::new(8);
        assert_eq!(p.embed("same text").unwrap(), p.embed("same text").unwrap());
    }

    #[test]
    fn differs_across_texts() {
        let p = HashFallbackProvider::new(8);
        assert_ne!(p.embed("a").unwrap(), p.embed("b").unwrap());
    }
}
