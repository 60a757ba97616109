//! `EmbeddingEngine` — single-load model lifecycle, dimension enforcement,
//! and cache memoization (spec §4.3). Grounded in the teacher's
//! `cortex-embeddings::engine::EmbeddingEngine`.

use std::sync::Arc;

use recall_cache::TwoTierCache;
use recall_core::constants::CACHE_NAMESPACE_EMBEDDINGS;
use recall_core::errors::{EmbeddingError, RecallError, RecallResult};
use recall_core::traits::EmbeddingProvider;
use tracing::{debug, info};

use crate::fallback::HashFallbackProvider;

/// Coordinates provider selection, the probe-established dimension
/// invariant, and embedding cache memoization. Implements
/// `EmbeddingProvider` itself so it can be used anywhere a provider is
/// expected.
pub struct EmbeddingEngine {
    primary: Box<dyn EmbeddingProvider>,
    fallback: HashFallbackProvider,
    cache: Arc<TwoTierCache>,
    dimension: u32,
}

impl EmbeddingEngine {
    /// Establish `d` from a probe embedding on first load (spec §4.3),
    /// then wrap `primary` with a deterministic fallback for when it's
    /// unavailable.
    pub fn new(primary: Box<dyn EmbeddingProvider>, cache: Arc<TwoTierCache>) -> RecallResult<Self> {
        let dimension = primary.dimension();
        info!(provider = primary.name(), dimension, "embedding engine initialized");
        Ok(Self {
            fallback: HashFallbackProvider::new(dimension),
            primary,
            cache,
            dimension,
        })
    }

    /// SHA-256 hex digest of the canonical UTF-8 text (spec §4.3).
    pub fn content_hash(text: &str) -> String {
        use sha2::{Digest, Sha256};
        hex_encode(&Sha256::digest(text.as_bytes()))
    }

    fn active_provider(&self) -> &dyn EmbeddingProvider {
        if self.primary.is_available() {
            self.primary.as_ref()
        } else {
            &self.fallback
        }
    }

    fn embed_uncached(&self, text: &str) -> RecallResult<Vec<f32>> {
        let provider = self.active_provider();
        let vector = provider.embed(text)?;
        if vector.len() as u32 != self.dimension {
            return Err(RecallError::from(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len() as u32,
            }));
        }
        Ok(vector)
    }
}

impl EmbeddingProvider for EmbeddingEngine {
    /// Memoized under the `embeddings` namespace (long TTL, default 24h
    /// per spec §4.3).
    fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
        let hash = Self::content_hash(text);
        if let Some(cached) = self.cache.get::<Vec<f32>>(CACHE_NAMESPACE_EMBEDDINGS, &hash) {
            debug!(hash = %hash, "embedding cache hit");
            return Ok(cached);
        }
        let vector = self.embed_uncached(text)?;
        self.cache.set(CACHE_NAMESPACE_EMBEDDINGS, &hash, &vector, true);
        Ok(vector)
    }

    /// Preserves input order: pulls cached vectors, generates the rest
    /// (spec §4.3).
    fn embed_batch(&self, texts: &[String]) -> RecallResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimension(&self) -> u32 {
        self.dimension
    }

    fn name(&self) -> &str {
        self.primary.name()
    }

    fn is_available(&self) -> bool {
        true // the fallback makes the engine always total
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_cache::TwoTierCache;

    fn engine(dim: u32) -> EmbeddingEngine {
        let cache = Arc::new(TwoTierCache::local_only(1000, 3600, 86_400));
        EmbeddingEngine::new(Box::new(HashFallbackProvider::new(dim)), cache).unwrap()
    }

    #[test]
    fn embed_is_memoized_byte_equal() {
        let e = engine(16);
        let a = e.embed("hello world").unwrap();
        let b = e.embed("hello world").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn enforces_dimension_invariant() {
        let e = engine(8);
        assert_eq!(e.embed("x").unwrap().len(), 8);
    }

    #[test]
    fn content_hash_is_stable() {
        assert_eq!(EmbeddingEngine::content_hash("abc"), EmbeddingEngine::content_hash("abc"));
    }

    #[test]
    fn batch_preserves_order() {
        let e = engine(8);
        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let batch = e.embed_batch(&texts).unwrap();
        assert_eq!(batch[0], e.embed("a").unwrap());
        assert_eq!(batch[1], e.embed("b").unwrap());
        assert_eq!(batch[2], e.embed("c").unwrap());
    }
}
