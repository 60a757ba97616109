//! Bounded graph traversal and connectivity analysis (spec §4.9).
//!
//! Graph analysis (`{inDegree, outDegree, totalConnections,
//! relationTypes}`) and `findTopConnectors` are join-heavy aggregate
//! queries best expressed directly against the store (they don't need the
//! in-memory traversal machinery below), so they live as methods on
//! `recall_store::SqliteStore` and are re-exported here for callers that
//! only depend on this crate.

pub mod traversal;

pub use recall_store::SqliteStore;
pub use traversal::{traverse, Algorithm, TraverseOptions, TraverseResult, TraversedNode};
