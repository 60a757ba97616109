//! The memory engine (spec §4.8): ingestion, search, listing, updates,
//! deletes, graph search, consolidation, relations CRUD, and stats —
//! composing the store, cache, embedding, compression, scoring, and
//! clustering crates behind one `MemoryEngine` facade. Grounded in the
//! teacher's `cortex-memory::engine` composition root.

pub mod consolidate;
pub mod dto;
pub mod engine;
pub mod graph;
pub mod relations;
pub mod workers;

pub use dto::{
    BatchStoreOutcome, ConsolidateInput, ConsolidateOutput, DeleteTarget, EngineStats, GraphSearchInput, GraphSearchNode,
    HealthReport, ListInput, RelateTo, RelationshipRef, SearchInput, StoreInput, UpdateInput,
};
pub use engine::MemoryEngine;
pub use recall_graph::{Algorithm, TraverseOptions, TraverseResult, TraversedNode};
pub use workers::register_handlers;
