//! Relationship CRUD, grounded in the teacher's
//! `cortex-storage::queries::relationship_ops`.

use recall_core::errors::RecallResult;
use recall_core::memory::{MemoryRelation, RelationType};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::convert::{fmt_dt, relation_type_param, row_to_relation, to_storage_err};

/// Upsert on `(from, to)`, updating `(relation_type, strength)` on
/// conflict (spec §4.4, §8: "one row with (t', s')").
pub fn upsert_relation(
    conn: &Connection,
    from: Uuid,
    to: Uuid,
    relation_type: RelationType,
    strength: f64,
) -> RecallResult<MemoryRelation> {
    let now = fmt_dt(chrono::Utc::now());
    let id = Uuid::new_v4().to_string();
    let type_str = relation_type_param(relation_type);
    conn.execute(
        "INSERT INTO memory_relations (id, from_memory_id, to_memory_id, relation_type, strength, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
         ON CONFLICT(from_memory_id, to_memory_id) DO UPDATE SET
            relation_type = excluded.relation_type,
            strength = excluded.strength,
            updated_at = excluded.updated_at",
        params![id, from.to_string(), to.to_string(), type_str, strength, now],
    )
    .map_err(to_storage_err)?;

    conn.query_row(
        "SELECT * FROM memory_relations WHERE from_memory_id = ?1 AND to_memory_id = ?2",
        params![from.to_string(), to.to_string()],
        row_to_relation,
    )
    .map_err(to_storage_err)
}

pub fn delete_relation(conn: &Connection, from: Uuid, to: Uuid) -> RecallResult<bool> {
    let affected = conn
        .execute(
            "DELETE FROM memory_relations WHERE from_memory_id = ?1 AND to_memory_id = ?2",
            params![from.to_string(), to.to_string()],
        )
        .map_err(to_storage_err)?;
    Ok(affected > 0)
}

pub fn get_relations(conn: &Connection, memory_id: Uuid) -> RecallResult<Vec<MemoryRelation>> {
    let mut stmt = conn
        .prepare(
            "SELECT * FROM memory_relations WHERE from_memory_id = ?1 OR to_memory_id = ?1",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![memory_id.to_string()], row_to_relation)
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

pub fn outgoing(conn: &Connection, memory_id: Uuid) -> RecallResult<Vec<MemoryRelation>> {
    let mut stmt = conn
        .prepare("SELECT * FROM memory_relations WHERE from_memory_id = ?1")
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![memory_id.to_string()], row_to_relation)
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

pub fn incoming(conn: &Connection, memory_id: Uuid) -> RecallResult<Vec<MemoryRelation>> {
    let mut stmt = conn
        .prepare("SELECT * FROM memory_relations WHERE to_memory_id = ?1")
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![memory_id.to_string()], row_to_relation)
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

pub fn both_endpoints_live(conn: &Connection, from: Uuid, to: Uuid) -> RecallResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM memories WHERE id IN (?1, ?2) AND deleted_at IS NULL",
            params![from.to_string(), to.to_string()],
            |r| r.get(0),
        )
        .map_err(to_storage_err)?;
    Ok(count == 2)
}

pub fn get_relation_by_id(conn: &Connection, id: Uuid) -> RecallResult<Option<MemoryRelation>> {
    conn.query_row(
        "SELECT * FROM memory_relations WHERE id = ?1",
        params![id.to_string()],
        row_to_relation,
    )
    .optional()
    .map_err(to_storage_err)
}
