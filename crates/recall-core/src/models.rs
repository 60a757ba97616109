//! Small shared DTOs used across crate boundaries.

use std::collections::HashMap;

use serde::Serialize;

use crate::memory::MemoryType;

/// Aggregate counters returned by `memory_stats` (spec §4.8).
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryStats {
    pub total: u64,
    pub by_type: HashMap<MemoryType, u64>,
    pub by_state: HashMap<String, u64>,
    pub compressed: u64,
    pub average_confidence: f64,
    pub average_importance: f64,
}

/// `{inDegree, outDegree, totalConnections, relationTypes}` from
/// `memory_graph_analysis` (spec §4.9).
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphAnalysis {
    pub in_degree: u64,
    pub out_degree: u64,
    pub total_connections: u64,
    pub relation_types: HashMap<String, u64>,
}
