//! Aggregation queries behind `memory_stats` / `memory_graph_analysis`
//! (spec §4.8, §4.9), scoped by `user_context`.

use std::collections::HashMap;

use recall_core::errors::RecallResult;
use recall_core::models::{GraphAnalysis, MemoryStats};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::convert::{parse_memory_type, to_storage_err};

pub fn stats(conn: &Connection, user_context: &str) -> RecallResult<MemoryStats> {
    let mut out = MemoryStats::default();

    out.total = conn
        .query_row(
            "SELECT COUNT(*) FROM memories WHERE user_context = ?1 AND deleted_at IS NULL",
            params![user_context],
            |r| r.get::<_, i64>(0),
        )
        .map_err(to_storage_err)? as u64;

    {
        let mut stmt = conn
            .prepare(
                "SELECT memory_type, COUNT(*) FROM memories
                 WHERE user_context = ?1 AND deleted_at IS NULL GROUP BY memory_type",
            )
            .map_err(to_storage_err)?;
        let rows = stmt
            .query_map(params![user_context], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)? as u64))
            })
            .map_err(to_storage_err)?;
        for row in rows {
            let (type_str, count) = row.map_err(to_storage_err)?;
            out.by_type.insert(parse_memory_type(&type_str), count);
        }
    }

    {
        let mut stmt = conn
            .prepare(
                "SELECT state, COUNT(*) FROM memories
                 WHERE user_context = ?1 AND deleted_at IS NULL GROUP BY state",
            )
            .map_err(to_storage_err)?;
        let rows = stmt
            .query_map(params![user_context], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)? as u64))
            })
            .map_err(to_storage_err)?;
        for row in rows {
            let (state, count) = row.map_err(to_storage_err)?;
            out.by_state.insert(state, count);
        }
    }

    out.compressed = conn
        .query_row(
            "SELECT COUNT(*) FROM memories WHERE user_context = ?1 AND deleted_at IS NULL AND is_compressed = 1",
            params![user_context],
            |r| r.get::<_, i64>(0),
        )
        .map_err(to_storage_err)? as u64;

    out.average_confidence = conn
        .query_row(
            "SELECT COALESCE(AVG(confidence), 0.0) FROM memories WHERE user_context = ?1 AND deleted_at IS NULL",
            params![user_context],
            |r| r.get(0),
        )
        .map_err(to_storage_err)?;

    out.average_importance = conn
        .query_row(
            "SELECT COALESCE(AVG(importance_score), 0.0) FROM memories WHERE user_context = ?1 AND deleted_at IS NULL",
            params![user_context],
            |r| r.get(0),
        )
        .map_err(to_storage_err)?;

    Ok(out)
}

pub fn graph_analysis(conn: &Connection, user_context: &str, id: Uuid) -> RecallResult<GraphAnalysis> {
    let mut out = GraphAnalysis::default();

    out.out_degree = conn
        .query_row(
            "SELECT COUNT(*) FROM memory_relations r
             JOIN memories m ON m.id = r.to_memory_id
             WHERE r.from_memory_id = ?1 AND m.user_context = ?2 AND m.deleted_at IS NULL",
            params![id.to_string(), user_context],
            |r| r.get::<_, i64>(0),
        )
        .map_err(to_storage_err)? as u64;

    out.in_degree = conn
        .query_row(
            "SELECT COUNT(*) FROM memory_relations r
             JOIN memories m ON m.id = r.from_memory_id
             WHERE r.to_memory_id = ?1 AND m.user_context = ?2 AND m.deleted_at IS NULL",
            params![id.to_string(), user_context],
            |r| r.get::<_, i64>(0),
        )
        .map_err(to_storage_err)? as u64;

    out.total_connections = out.in_degree + out.out_degree;

    let mut stmt = conn
        .prepare(
            "SELECT relation_type, COUNT(*) FROM memory_relations
             WHERE from_memory_id = ?1 OR to_memory_id = ?1 GROUP BY relation_type",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![id.to_string()], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)? as u64))
        })
        .map_err(to_storage_err)?;
    for row in rows {
        let (t, count) = row.map_err(to_storage_err)?;
        out.relation_types.insert(t, count);
    }

    Ok(out)
}

/// Memories ordered by distinct-edge count descending (spec §4.9
/// `findTopConnectors`).
pub fn top_connectors(conn: &Connection, user_context: &str, limit: usize) -> RecallResult<Vec<(Uuid, u64)>> {
    let mut stmt = conn
        .prepare(
            "SELECT m.id, COUNT(*) as degree FROM memories m
             JOIN memory_relations r ON r.from_memory_id = m.id OR r.to_memory_id = m.id
             WHERE m.user_context = ?1 AND m.deleted_at IS NULL
             GROUP BY m.id
             ORDER BY degree DESC
             LIMIT ?2",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![user_context, limit as i64], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)? as u64))
        })
        .map_err(to_storage_err)?;
    let mut out = Vec::new();
    for row in rows {
        let (id, degree) = row.map_err(to_storage_err)?;
        if let Ok(uuid) = Uuid::parse_str(&id) {
            out.push((uuid, degree));
        }
    }
    Ok(out)
}

/// Tag frequency histogram (spec §4.8 "stats/types/tags/clusters"). Tags
/// are stored as a JSON array per row, so the fan-out happens in Rust
/// rather than SQL to stay independent of a JSON1 extension.
pub fn tag_histogram(conn: &Connection, user_context: &str) -> RecallResult<HashMap<String, u64>> {
    let mut stmt = conn
        .prepare("SELECT tags FROM memories WHERE user_context = ?1 AND deleted_at IS NULL")
        .map_err(to_storage_err)?;
    let rows = stmt.query_map(params![user_context], |r| r.get::<_, String>(0)).map_err(to_storage_err)?;
    let mut out = HashMap::new();
    for row in rows {
        let raw = row.map_err(to_storage_err)?;
        let tags: Vec<String> = serde_json::from_str(&raw).unwrap_or_default();
        for tag in tags {
            *out.entry(tag).or_insert(0) += 1;
        }
    }
    Ok(out)
}

/// Cluster membership counts (spec §4.8 "stats/types/tags/clusters").
/// Only non-null cluster ids are counted.
pub fn cluster_histogram(conn: &Connection, user_context: &str) -> RecallResult<HashMap<String, u64>> {
    let mut stmt = conn
        .prepare(
            "SELECT cluster_id, COUNT(*) FROM memories
             WHERE user_context = ?1 AND deleted_at IS NULL AND cluster_id IS NOT NULL
             GROUP BY cluster_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![user_context], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)? as u64)))
        .map_err(to_storage_err)?;
    let mut out = HashMap::new();
    for row in rows {
        let (cluster_id, count) = row.map_err(to_storage_err)?;
        out.insert(cluster_id, count);
    }
    Ok(out)
}
