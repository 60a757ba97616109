//! Brute-force cosine similarity scan, grounded in the teacher's
//! `cortex-storage::queries::vector_search` (sqlite-vec extension is not
//! loaded; this is the documented fallback path there too).

use recall_core::errors::RecallResult;
use recall_core::traits::{MemoryPredicates, ScoredMemory};
use rusqlite::{params, Connection};

use crate::convert::{bytes_to_f32_vec, row_to_memory, to_storage_err};

pub fn knn_search(
    conn: &Connection,
    user_context: &str,
    query_embedding: &[f32],
    predicates: &MemoryPredicates,
    threshold: f64,
    limit: usize,
) -> RecallResult<Vec<ScoredMemory>> {
    let mut sql = String::from(
        "SELECT * FROM memories WHERE user_context = ?1 AND deleted_at IS NULL AND embedding IS NOT NULL",
    );
    if predicates.memory_type.is_some() {
        sql.push_str(" AND memory_type = ?2");
    }

    let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
    let rows = if let Some(t) = predicates.memory_type {
        let type_str = crate::convert::memory_type_str(t);
        stmt.query_map(params![user_context, type_str], row_to_memory)
    } else {
        stmt.query_map(params![user_context], row_to_memory)
    }
    .map_err(to_storage_err)?;

    let query_len = query_embedding.len();
    let mut scored = Vec::new();
    for row in rows {
        let memory = row.map_err(to_storage_err)?;
        if !predicates.tags.is_empty() && !memory.tags.iter().any(|t| predicates.tags.contains(t)) {
            continue;
        }
        let Some(embedding) = memory.embedding.as_ref() else {
            continue;
        };
        if embedding.len() != query_len {
            continue;
        }
        let similarity = recall_vector::cosine_similarity(query_embedding, embedding);
        if similarity >= threshold {
            scored.push(ScoredMemory { memory, similarity });
        }
    }

    scored.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    Ok(scored)
}

/// Fetch `(memory_id, embedding)` pairs for every non-deleted, embedded
/// memory in a user context — used by the clustering engine.
pub fn all_embeddings(conn: &Connection, user_context: &str) -> RecallResult<Vec<(String, Vec<f32>)>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, embedding FROM memories
             WHERE user_context = ?1 AND deleted_at IS NULL AND embedding IS NOT NULL",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![user_context], |row| {
            let id: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            Ok((id, blob))
        })
        .map_err(to_storage_err)?;
    let mut out = Vec::new();
    for row in rows {
        let (id, blob) = row.map_err(to_storage_err)?;
        out.push((id, bytes_to_f32_vec(&blob)));
    }
    Ok(out)
}

pub fn set_cluster_id(conn: &Connection, id: &str, cluster_id: Option<&str>) -> RecallResult<()> {
    conn.execute(
        "UPDATE memories SET cluster_id = ?1 WHERE id = ?2",
        params![cluster_id, id],
    )
    .map_err(to_storage_err)?;
    Ok(())
}
