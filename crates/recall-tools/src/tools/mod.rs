//! One module per tool in the spec §6.1 catalog. Each exports
//! `definition()` (the JSON-Schema-described catalog entry) and
//! `execute(engine, args)` (validation + dispatch to `MemoryEngine`).

pub mod memory_batch;
pub mod memory_batch_delete;
pub mod memory_consolidate;
pub mod memory_decay_status;
pub mod memory_delete;
pub mod memory_get_relations;
pub mod memory_graph_analysis;
pub mod memory_graph_search;
pub mod memory_list;
pub mod memory_preserve;
pub mod memory_relate;
pub mod memory_search;
pub mod memory_stats;
pub mod memory_store;
pub mod memory_traverse;
pub mod memory_unrelate;
pub mod memory_update;
