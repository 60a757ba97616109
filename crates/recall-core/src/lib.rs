//! # recall-core
//!
//! Foundation crate for the semantic memory engine: domain types, config,
//! the error taxonomy, trait seams, and input sanitation. Every other
//! crate in the workspace depends on this one.

pub mod config;
pub mod constants;
pub mod errors;
pub mod memory;
pub mod models;
pub mod sanitize;
pub mod traits;

pub use config::RecallConfig;
pub use errors::{RecallError, RecallResult};
pub use memory::{Memory, MemoryRelation, MemoryState, MemoryType, RelationType};
pub use traits::{EmbeddingProvider, MemoryPredicates, MemoryStore, ScoredMemory};
