//! Durable job queue backing store (spec §4.12). The `jobs` table
//! (schema.rs) is the outbox; this module is the only thing that touches
//! it directly.

use chrono::{DateTime, Utc};
use recall_core::errors::RecallResult;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use uuid::Uuid;

use crate::convert::{fmt_dt, to_storage_err};

#[derive(Debug, Clone)]
pub struct JobRow {
    pub id: Uuid,
    pub topic: String,
    pub payload: Value,
    pub status: String,
    pub attempts: u32,
    pub max_attempts: u32,
    pub priority: i32,
    pub run_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_error: Option<String>,
}

fn row_to_job(row: &Row) -> rusqlite::Result<JobRow> {
    let id: String = row.get("id")?;
    let payload_raw: String = row.get("payload")?;
    Ok(JobRow {
        id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
        topic: row.get("topic")?,
        payload: serde_json::from_str(&payload_raw).unwrap_or(Value::Null),
        status: row.get("status")?,
        attempts: row.get::<_, i64>("attempts")? as u32,
        max_attempts: row.get::<_, i64>("max_attempts")? as u32,
        priority: row.get("priority")?,
        run_at: parse_dt(&row.get::<_, String>("run_at")?),
        created_at: parse_dt(&row.get::<_, String>("created_at")?),
        updated_at: parse_dt(&row.get::<_, String>("updated_at")?),
        last_error: row.get("last_error")?,
    })
}

fn parse_dt(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map(|d| d.with_timezone(&Utc)).unwrap_or_else(|_| Utc::now())
}

pub fn enqueue(
    conn: &Connection,
    topic: &str,
    payload: &Value,
    priority: i32,
    max_attempts: u32,
    run_at: DateTime<Utc>,
) -> RecallResult<Uuid> {
    let id = Uuid::new_v4();
    let now = fmt_dt(Utc::now());
    conn.execute(
        "INSERT INTO jobs (id, topic, payload, status, attempts, max_attempts, priority, run_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, 'pending', 0, ?4, ?5, ?6, ?7, ?7)",
        params![id.to_string(), topic, payload.to_string(), max_attempts, priority, fmt_dt(run_at), now],
    )
    .map_err(to_storage_err)?;
    Ok(id)
}

/// Atomically claim up to `limit` due jobs for `topic` (status `pending`,
/// `run_at <= now`), marking them `running` so no other worker claims them
/// (spec §4.12: at-least-once delivery).
pub fn claim_due(conn: &Connection, topic: &str, limit: usize) -> RecallResult<Vec<JobRow>> {
    let now = fmt_dt(Utc::now());
    let ids: Vec<String> = {
        let mut stmt = conn
            .prepare(
                "SELECT id FROM jobs WHERE topic = ?1 AND status = 'pending' AND run_at <= ?2
                 ORDER BY priority DESC, run_at ASC LIMIT ?3",
            )
            .map_err(to_storage_err)?;
        let rows = stmt
            .query_map(params![topic, now, limit as i64], |r| r.get::<_, String>(0))
            .map_err(to_storage_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)?
    };

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    for id in &ids {
        conn.execute(
            "UPDATE jobs SET status = 'running', updated_at = ?1 WHERE id = ?2",
            params![fmt_dt(Utc::now()), id],
        )
        .map_err(to_storage_err)?;
    }

    let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!("SELECT * FROM jobs WHERE id IN ({placeholders})");
    let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
    let params: Vec<&dyn rusqlite::ToSql> = ids.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    let rows = stmt.query_map(params.as_slice(), row_to_job).map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

pub fn mark_complete(conn: &Connection, id: Uuid) -> RecallResult<()> {
    conn.execute(
        "UPDATE jobs SET status = 'complete', updated_at = ?1 WHERE id = ?2",
        params![fmt_dt(Utc::now()), id.to_string()],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Record a failed attempt. If `attempts` (now incremented) is still under
/// `max_attempts`, reschedule `run_at` for retry with backoff; otherwise
/// mark permanently `failed`.
pub fn mark_failed(conn: &Connection, id: Uuid, error: &str, next_run_at: Option<DateTime<Utc>>) -> RecallResult<bool> {
    let truncated: String = error.chars().take(500).collect();
    let now = fmt_dt(Utc::now());

    let (attempts, max_attempts): (i64, i64) = conn
        .query_row(
            "SELECT attempts, max_attempts FROM jobs WHERE id = ?1",
            params![id.to_string()],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .map_err(to_storage_err)?;
    let attempts = attempts + 1;
    let exhausted = attempts >= max_attempts;

    if exhausted {
        conn.execute(
            "UPDATE jobs SET status = 'failed', attempts = ?1, last_error = ?2, updated_at = ?3 WHERE id = ?4",
            params![attempts, truncated, now, id.to_string()],
        )
        .map_err(to_storage_err)?;
    } else {
        let run_at = next_run_at.map(fmt_dt).unwrap_or(now.clone());
        conn.execute(
            "UPDATE jobs SET status = 'pending', attempts = ?1, last_error = ?2, run_at = ?3, updated_at = ?4 WHERE id = ?5",
            params![attempts, truncated, run_at, now, id.to_string()],
        )
        .map_err(to_storage_err)?;
    }

    Ok(!exhausted)
}

pub fn get(conn: &Connection, id: Uuid) -> RecallResult<Option<JobRow>> {
    conn.query_row("SELECT * FROM jobs WHERE id = ?1", params![id.to_string()], row_to_job)
        .optional()
        .map_err(to_storage_err)
}

/// Count of `pending` jobs per topic, for the health surface (SPEC_FULL §B).
pub fn pending_counts(conn: &Connection) -> RecallResult<std::collections::HashMap<String, u64>> {
    let mut stmt = conn
        .prepare("SELECT topic, COUNT(*) FROM jobs WHERE status = 'pending' GROUP BY topic")
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)? as u64)))
        .map_err(to_storage_err)?;
    rows.collect::<Result<_, _>>().map_err(to_storage_err)
}
