//! Selection queries for the lifecycle/decay batch processor (spec §4.10)
//! and retention cleanup.

use chrono::{DateTime, Utc};
use recall_core::errors::RecallResult;
use recall_core::memory::Memory;
use rusqlite::{params, Connection};

use crate::convert::{fmt_dt, row_to_memory, to_storage_err};

/// `processBatch` selection: not deleted, not expired, stale by
/// `last_decay_update`, oldest first (spec §4.10).
pub fn due_for_decay(
    conn: &Connection,
    user_context: &str,
    cutoff: DateTime<Utc>,
    limit: usize,
) -> RecallResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare(
            "SELECT * FROM memories
             WHERE user_context = ?1 AND deleted_at IS NULL AND state != 'expired'
               AND last_decay_update < ?2
             ORDER BY last_decay_update ASC
             LIMIT ?3",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![user_context, fmt_dt(cutoff), limit as i64], row_to_memory)
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// Retention cleanup selection (spec §4.10): soft-deleted, expired,
/// older than the retention window.
pub fn expired_before(
    conn: &Connection,
    user_context: &str,
    cutoff: DateTime<Utc>,
    limit: usize,
) -> RecallResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare(
            "SELECT * FROM memories
             WHERE user_context = ?1 AND state = 'expired' AND deleted_at IS NOT NULL
               AND deleted_at < ?2
             LIMIT ?3",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![user_context, fmt_dt(cutoff), limit as i64], row_to_memory)
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}
