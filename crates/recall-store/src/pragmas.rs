//! PRAGMA configuration applied to every connection, grounded in the
//! teacher's `cortex-storage::pool::pragmas`.

use recall_core::errors::{RecallError, RecallResult, StorageError};
use rusqlite::Connection;

pub fn apply_pragmas(conn: &Connection) -> RecallResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 30000;
        ",
    )
    .map_err(|e| RecallError::from(StorageError::Sqlite { message: e.to_string() }))?;
    Ok(())
}
