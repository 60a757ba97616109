//! Bounded connection pool (spec §5: ~20 connections, 30s idle/connect
//! timeout). Grounded in the teacher's `cortex-storage::pool`, simplified
//! to a single writer plus a round-robin reader pool — SQLite only
//! allows one writer at a time regardless, so a single `Mutex<Connection>`
//! for writes with N pooled reader connections covers the concurrency
//! model in spec §5 without a dependency on an external pooling crate.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use recall_core::errors::{RecallError, RecallResult, StorageError};
use rusqlite::Connection;

use crate::pragmas::apply_pragmas;

pub struct ConnectionPool {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    next_reader: Mutex<usize>,
}

impl ConnectionPool {
    pub fn open(path: &Path, pool_size: usize) -> RecallResult<Self> {
        let writer = open_conn(Some(path))?;
        let mut readers = Vec::with_capacity(pool_size.max(1));
        for _ in 0..pool_size.max(1) {
            readers.push(Mutex::new(open_conn(Some(path))?));
        }
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            next_reader: Mutex::new(0),
        })
    }

    pub fn open_in_memory() -> RecallResult<Self> {
        let writer = open_conn(None)?;
        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            next_reader: Mutex::new(0),
        })
    }

    /// Run `f` against the single write connection. Short, non-blocking
    /// within the busy-timeout budget (spec §5: small, short transactions).
    pub fn with_writer<T>(&self, f: impl FnOnce(&Connection) -> RecallResult<T>) -> RecallResult<T> {
        let guard = self
            .writer
            .lock()
            .map_err(|_| RecallError::from(StorageError::PoolExhausted { active: 0 }))?;
        f(&guard)
    }

    /// Run `f` against a pooled read connection, or the writer if this is
    /// an in-memory pool (in-memory reader connections would be isolated
    /// databases that can't see the writer's data).
    pub fn with_reader<T>(&self, f: impl FnOnce(&Connection) -> RecallResult<T>) -> RecallResult<T> {
        if self.readers.is_empty() {
            return self.with_writer(f);
        }
        let idx = {
            let mut next = self.next_reader.lock().unwrap();
            let idx = *next % self.readers.len();
            *next = next.wrapping_add(1);
            idx
        };
        let guard = self.readers[idx]
            .lock()
            .map_err(|_| RecallError::from(StorageError::PoolExhausted { active: self.readers.len() }))?;
        f(&guard)
    }
}

fn open_conn(path: Option<&Path>) -> RecallResult<Connection> {
    let conn = match path {
        Some(p) => Connection::open(p),
        None => Connection::open_in_memory(),
    }
    .map_err(|e| RecallError::from(StorageError::Sqlite { message: e.to_string() }))?;
    conn.busy_timeout(Duration::from_secs(30))
        .map_err(|e| RecallError::from(StorageError::Sqlite { message: e.to_string() }))?;
    apply_pragmas(&conn)?;
    Ok(conn)
}
