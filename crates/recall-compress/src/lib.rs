//! Type-aware and hierarchical content compression (spec §4.5).

pub mod content_kind;
pub mod engine;
pub mod strategies;

pub use content_kind::ContentKind;
pub use engine::{compress, hierarchical_ratio, should_compress, CompressionOutcome, DEFAULT_COMPRESSION_RATIO};
