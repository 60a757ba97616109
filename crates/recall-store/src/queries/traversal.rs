//! Parent/child link queries used by graph traversal's `includeParentLinks`
//! option (spec §4.9).

use recall_core::errors::RecallResult;
use recall_core::memory::Memory;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::convert::{row_to_memory, to_storage_err};

pub fn children_of(conn: &Connection, user_context: &str, id: Uuid) -> RecallResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare(
            "SELECT * FROM memories WHERE user_context = ?1 AND parent_id = ?2 AND deleted_at IS NULL",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![user_context, id.to_string()], row_to_memory)
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

pub fn parent_of(conn: &Connection, user_context: &str, id: Uuid) -> RecallResult<Option<Memory>> {
    let parent_id: Option<String> = conn
        .query_row(
            "SELECT parent_id FROM memories WHERE id = ?1 AND user_context = ?2",
            params![id.to_string(), user_context],
            |r| r.get(0),
        )
        .optional()
        .map_err(to_storage_err)?
        .flatten();

    let Some(parent_id) = parent_id else {
        return Ok(None);
    };

    conn.query_row(
        "SELECT * FROM memories WHERE id = ?1 AND user_context = ?2 AND deleted_at IS NULL",
        params![parent_id, user_context],
        row_to_memory,
    )
    .optional()
    .map_err(to_storage_err)
}
