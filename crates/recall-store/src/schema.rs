//! Idempotent schema migrations (spec §6.3). Every statement is
//! `IF NOT EXISTS`, so re-running the migration set is a no-op (spec §8:
//! "migration backfill is idempotent").

use recall_core::errors::{RecallError, RecallResult, StorageError};
use rusqlite::Connection;

const CURRENT_VERSION: u32 = 1;

pub fn run_migrations(conn: &Connection) -> RecallResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);",
    )
    .map_err(to_storage_err)?;

    let version: u32 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
        .map_err(to_storage_err)?;

    if version < CURRENT_VERSION {
        apply_v1(conn)?;
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [CURRENT_VERSION])
            .map_err(to_storage_err)?;
    }

    Ok(())
}

fn apply_v1(conn: &Connection) -> RecallResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memories (
            id TEXT PRIMARY KEY,
            user_context TEXT NOT NULL DEFAULT 'default',
            content TEXT NOT NULL,
            content_hash TEXT NOT NULL,
            embedding BLOB,
            embedding_dimension INTEGER,
            tags TEXT NOT NULL DEFAULT '[]',
            memory_type TEXT NOT NULL,
            source TEXT NOT NULL DEFAULT '',
            confidence REAL NOT NULL DEFAULT 0.5,
            importance_score REAL NOT NULL DEFAULT 0.5,
            similarity_threshold REAL NOT NULL DEFAULT 0.7,
            decay_rate REAL NOT NULL DEFAULT 0.01,
            access_count INTEGER NOT NULL DEFAULT 0,
            parent_id TEXT,
            relation_type TEXT,
            cluster_id TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            accessed_at TEXT NOT NULL,
            deleted_at TEXT,
            last_decay_update TEXT NOT NULL,
            state TEXT NOT NULL DEFAULT 'active',
            decay_score REAL NOT NULL DEFAULT 1.0,
            is_compressed INTEGER NOT NULL DEFAULT 0,
            metadata TEXT NOT NULL DEFAULT '{}'
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_memories_user_hash
            ON memories(user_context, content_hash) WHERE deleted_at IS NULL;
        CREATE INDEX IF NOT EXISTS idx_memories_state ON memories(state);
        CREATE INDEX IF NOT EXISTS idx_memories_decay_score ON memories(decay_score);
        CREATE INDEX IF NOT EXISTS idx_memories_is_compressed ON memories(is_compressed);
        CREATE INDEX IF NOT EXISTS idx_memories_deleted_at ON memories(deleted_at);
        CREATE INDEX IF NOT EXISTS idx_memories_user_context ON memories(user_context);
        CREATE INDEX IF NOT EXISTS idx_memories_parent_id ON memories(parent_id);

        CREATE TRIGGER IF NOT EXISTS trg_memories_updated_at
        AFTER UPDATE ON memories
        FOR EACH ROW
        WHEN NEW.updated_at = OLD.updated_at
        BEGIN
            UPDATE memories SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = NEW.id;
        END;

        CREATE TABLE IF NOT EXISTS memory_relations (
            id TEXT PRIMARY KEY,
            from_memory_id TEXT NOT NULL,
            to_memory_id TEXT NOT NULL,
            relation_type TEXT NOT NULL,
            strength REAL NOT NULL DEFAULT 0.5,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(from_memory_id, to_memory_id),
            FOREIGN KEY(from_memory_id) REFERENCES memories(id) ON DELETE CASCADE,
            FOREIGN KEY(to_memory_id) REFERENCES memories(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_relations_from ON memory_relations(from_memory_id, relation_type);
        CREATE INDEX IF NOT EXISTS idx_relations_to ON memory_relations(to_memory_id, relation_type);

        CREATE TABLE IF NOT EXISTS memory_revisions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            memory_id TEXT NOT NULL,
            revision_no INTEGER NOT NULL,
            changed_fields TEXT NOT NULL,
            at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_revisions_memory ON memory_revisions(memory_id);

        CREATE TABLE IF NOT EXISTS jobs (
            id TEXT PRIMARY KEY,
            topic TEXT NOT NULL,
            payload TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            attempts INTEGER NOT NULL DEFAULT 0,
            max_attempts INTEGER NOT NULL DEFAULT 5,
            priority INTEGER NOT NULL DEFAULT 5,
            run_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_error TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_jobs_topic_status ON jobs(topic, status, run_at);
        ",
    )
    .map_err(to_storage_err)?;
    Ok(())
}

fn to_storage_err(e: rusqlite::Error) -> RecallError {
    RecallError::from(StorageError::MigrationFailed {
        version: CURRENT_VERSION,
        reason: e.to_string(),
    })
}
