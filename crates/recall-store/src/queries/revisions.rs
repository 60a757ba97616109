//! Append-only audit trail for mutating operations on memories
//! (SPEC_FULL §A.4), mirroring the teacher's `versioning/tracker.rs`. Not
//! load-bearing for any spec invariant — present because the teacher
//! always carries one for a mutable entity store.

use recall_core::errors::RecallResult;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::convert::{fmt_dt, to_storage_err};

pub fn record(conn: &Connection, memory_id: Uuid, changed_fields: &[&str]) -> RecallResult<()> {
    let next_revision: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(revision_no), 0) + 1 FROM memory_revisions WHERE memory_id = ?1",
            params![memory_id.to_string()],
            |r| r.get(0),
        )
        .optional()
        .map_err(to_storage_err)?
        .unwrap_or(1);

    conn.execute(
        "INSERT INTO memory_revisions (memory_id, revision_no, changed_fields, at) VALUES (?1,?2,?3,?4)",
        params![
            memory_id.to_string(),
            next_revision,
            serde_json::to_string(changed_fields).unwrap_or_else(|_| "[]".to_string()),
            fmt_dt(chrono::Utc::now()),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn revision_count(conn: &Connection, memory_id: Uuid) -> RecallResult<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM memory_revisions WHERE memory_id = ?1",
        params![memory_id.to_string()],
        |r| r.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(to_storage_err)
}
