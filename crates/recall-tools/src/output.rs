//! JSON rendering helpers. Spec §6.1: "embeddings are never returned" — every
//! path that serializes a `Memory` goes through here so that rule can't be
//! missed in a single tool file.

use recall_core::memory::{Memory, MemoryRelation};
use recall_core::traits::ScoredMemory;
use recall_engine::{RelationshipRef, TraversedNode};
use serde_json::{json, Value};

pub fn memory_json(memory: &Memory) -> Value {
    let mut v = serde_json::to_value(memory).unwrap_or(Value::Null);
    if let Some(obj) = v.as_object_mut() {
        obj.remove("embedding");
    }
    v
}

pub fn memories_json(memories: &[Memory]) -> Value {
    Value::Array(memories.iter().map(memory_json).collect())
}

pub fn scored_memory_json(scored: &ScoredMemory) -> Value {
    json!({
        "memory": memory_json(&scored.memory),
        "similarity": scored.similarity,
    })
}

pub fn relation_json(relation: &MemoryRelation) -> Value {
    serde_json::to_value(relation).unwrap_or(Value::Null)
}

pub fn relationship_ref_json(r: &RelationshipRef) -> Value {
    serde_json::to_value(r).unwrap_or(Value::Null)
}

pub fn traversed_node_json(node: &TraversedNode) -> Value {
    json!({
        "memory": memory_json(&node.memory),
        "depth": node.depth,
        "path": node.path,
        "relationFromParent": node.relation_from_parent,
    })
}
