//! Query modules grouped by concern, mirroring the teacher's
//! `cortex-storage::queries` layout.

pub mod decay_queries;
pub mod jobs;
pub mod memory_crud;
pub mod relations;
pub mod revisions;
pub mod stats;
pub mod traversal;
pub mod vector_search;
