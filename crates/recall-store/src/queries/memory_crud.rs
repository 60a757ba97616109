//! Basic CRUD, grounded in the teacher's `cortex-storage::queries::memory_crud`.

use recall_core::errors::RecallResult;
use recall_core::memory::Memory;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::convert::{fmt_dt, row_to_memory, to_params, to_storage_err};

pub fn insert(conn: &Connection, m: &Memory) -> RecallResult<()> {
    let p = to_params(m);
    conn.execute(
        "INSERT INTO memories (
            id, user_context, content, content_hash, embedding, embedding_dimension,
            tags, memory_type, source, confidence, importance_score, similarity_threshold,
            decay_rate, access_count, parent_id, relation_type, cluster_id,
            created_at, updated_at, accessed_at, deleted_at, last_decay_update,
            state, decay_score, is_compressed, metadata
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21,?22,?23,?24,?25,?26)",
        params![
            m.id.to_string(),
            m.user_context,
            p.content,
            p.content_hash,
            p.embedding,
            p.embedding_dimension,
            p.tags,
            p.memory_type,
            m.source,
            m.confidence,
            m.importance_score,
            m.similarity_threshold,
            m.decay_rate,
            m.access_count as i64,
            m.parent_id.map(|u| u.to_string()),
            m.relation_type,
            m.cluster_id,
            fmt_dt(m.created_at),
            fmt_dt(m.updated_at),
            fmt_dt(m.accessed_at),
            m.deleted_at.map(fmt_dt),
            fmt_dt(m.last_decay_update),
            p.state,
            m.decay_score,
            m.is_compressed as i64,
            m.metadata.to_string(),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn get(conn: &Connection, user_context: &str, id: Uuid) -> RecallResult<Option<Memory>> {
    conn.query_row(
        "SELECT * FROM memories WHERE id = ?1 AND user_context = ?2 AND deleted_at IS NULL",
        params![id.to_string(), user_context],
        row_to_memory,
    )
    .optional()
    .map_err(to_storage_err)
}

pub fn get_by_id_any_context(conn: &Connection, id: Uuid) -> RecallResult<Option<Memory>> {
    conn.query_row(
        "SELECT * FROM memories WHERE id = ?1 AND deleted_at IS NULL",
        params![id.to_string()],
        row_to_memory,
    )
    .optional()
    .map_err(to_storage_err)
}

pub fn find_by_hash(conn: &Connection, user_context: &str, content_hash: &str) -> RecallResult<Option<Memory>> {
    conn.query_row(
        "SELECT * FROM memories WHERE user_context = ?1 AND content_hash = ?2 AND deleted_at IS NULL",
        params![user_context, content_hash],
        row_to_memory,
    )
    .optional()
    .map_err(to_storage_err)
}

pub fn update(conn: &Connection, m: &Memory) -> RecallResult<()> {
    let p = to_params(m);
    conn.execute(
        "UPDATE memories SET
            content = ?1, content_hash = ?2, embedding = ?3, embedding_dimension = ?4,
            tags = ?5, memory_type = ?6, source = ?7, confidence = ?8, importance_score = ?9,
            similarity_threshold = ?10, decay_rate = ?11, access_count = ?12, parent_id = ?13,
            relation_type = ?14, cluster_id = ?15, updated_at = ?16, accessed_at = ?17,
            deleted_at = ?18, last_decay_update = ?19, state = ?20, decay_score = ?21,
            is_compressed = ?22, metadata = ?23
        WHERE id = ?24",
        params![
            p.content,
            p.content_hash,
            p.embedding,
            p.embedding_dimension,
            p.tags,
            p.memory_type,
            m.source,
            m.confidence,
            m.importance_score,
            m.similarity_threshold,
            m.decay_rate,
            m.access_count as i64,
            m.parent_id.map(|u| u.to_string()),
            m.relation_type,
            m.cluster_id,
            fmt_dt(m.updated_at),
            fmt_dt(m.accessed_at),
            m.deleted_at.map(fmt_dt),
            fmt_dt(m.last_decay_update),
            p.state,
            m.decay_score,
            m.is_compressed as i64,
            m.metadata.to_string(),
            m.id.to_string(),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn bump_access(conn: &Connection, ids: &[Uuid]) -> RecallResult<()> {
    let now = fmt_dt(chrono::Utc::now());
    for id in ids {
        conn.execute(
            "UPDATE memories SET access_count = access_count + 1, accessed_at = ?1 WHERE id = ?2",
            params![now, id.to_string()],
        )
        .map_err(to_storage_err)?;
    }
    Ok(())
}

pub fn soft_delete(conn: &Connection, ids: &[Uuid]) -> RecallResult<()> {
    let now = fmt_dt(chrono::Utc::now());
    for id in ids {
        conn.execute(
            "UPDATE memories SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
            params![now, id.to_string()],
        )
        .map_err(to_storage_err)?;
    }
    Ok(())
}

pub fn hard_delete(conn: &Connection, ids: &[Uuid]) -> RecallResult<()> {
    for id in ids {
        conn.execute(
            "DELETE FROM memory_relations WHERE from_memory_id = ?1 OR to_memory_id = ?1",
            params![id.to_string()],
        )
        .map_err(to_storage_err)?;
        conn.execute("DELETE FROM memories WHERE id = ?1", params![id.to_string()])
            .map_err(to_storage_err)?;
    }
    Ok(())
}

pub fn list(
    conn: &Connection,
    user_context: &str,
    memory_type: Option<&str>,
    tags: &[String],
    limit: usize,
    offset: usize,
) -> RecallResult<Vec<Memory>> {
    let mut sql = String::from(
        "SELECT * FROM memories WHERE user_context = ?1 AND deleted_at IS NULL",
    );
    let rows = if let Some(t) = memory_type {
        sql.push_str(" AND memory_type = ?2 ORDER BY created_at DESC LIMIT ?3 OFFSET ?4");
        let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
        stmt.query_map(params![user_context, t, limit as i64, offset as i64], row_to_memory)
            .map_err(to_storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_storage_err)?
    } else {
        sql.push_str(" ORDER BY created_at DESC LIMIT ?2 OFFSET ?3");
        let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
        stmt.query_map(params![user_context, limit as i64, offset as i64], row_to_memory)
            .map_err(to_storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_storage_err)?
    };

    let out = rows
        .into_iter()
        .filter(|m| tags.is_empty() || m.tags.iter().any(|t| tags.contains(t)))
        .collect();
    Ok(out)
}
