//! `EmbeddingProvider` implementation: opaque `text -> vector[d]` with a
//! single-load model lifecycle, cache memoization, and a total
//! degradation chain (spec §4.3, §9).

mod engine;
mod fallback;

pub use engine::EmbeddingEngine;
pub use fallback::HashFallbackProvider;
