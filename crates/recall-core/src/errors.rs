//! Error taxonomy (spec §7): InvalidParams, NotFound, Conflict, Transient,
//! Logic, Data. Each component gets its own `thiserror` enum; `RecallError`
//! aggregates them and exposes the taxonomy `kind()` the tool façade maps
//! to RPC error codes.

use thiserror::Error;

/// Storage-layer errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("connection pool exhausted: {active} active connections")]
    PoolExhausted { active: usize },

    #[error("no memory with id {id}")]
    NotFound { id: String },
}

/// Cache-layer errors. These are always non-fatal to the caller — the
/// cache degrades silently (spec §4.2, §9) — but are surfaced for logging.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("remote cache unavailable: {reason}")]
    RemoteUnavailable { reason: String },

    #[error("cache serialization error: {reason}")]
    Serialization { reason: String },
}

/// Embedding provider errors.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: u32, actual: u32 },

    #[error("embedding provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    #[error("embedding rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },
}

/// Clustering errors.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("not enough points to cluster: need at least {min}, got {got}")]
    InsufficientPoints { min: usize, got: usize },

    #[error("embedding dimension mismatch within cluster input")]
    DimensionMismatch,
}

/// Decay/lifecycle errors.
#[derive(Debug, Error)]
pub enum DecayError {
    #[error("memory {id} not found for decay processing")]
    NotFound { id: String },
}

/// Job system errors.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("job queue unavailable: {reason}")]
    QueueUnavailable { reason: String },

    #[error("job {id} exhausted retries ({attempts} attempts)")]
    RetriesExhausted { id: String, attempts: u32 },

    #[error("unknown job topic: {topic}")]
    UnknownTopic { topic: String },
}

/// Tool façade / input validation errors.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("method not found: {0}")]
    MethodNotFound(String),
}

/// Top-level error type threaded through every public API in the
/// workspace.
#[derive(Debug, Error)]
pub enum RecallError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Decay(#[from] DecayError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("logic error: {0}")]
    Logic(String),

    #[error("data error: {0}")]
    Data(String),
}

/// The spec §7 taxonomy, used by the tool façade and by workers to decide
/// whether to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParams,
    NotFound,
    Conflict,
    Transient,
    Logic,
    Data,
}

impl RecallError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecallError::InvalidParams(_) | RecallError::Tool(ToolError::InvalidParams(_)) => {
                ErrorKind::InvalidParams
            }
            RecallError::Tool(ToolError::MethodNotFound(_)) => ErrorKind::InvalidParams,
            RecallError::NotFound(_)
            | RecallError::Storage(StorageError::NotFound { .. })
            | RecallError::Decay(DecayError::NotFound { .. }) => ErrorKind::NotFound,
            RecallError::Conflict(_) | RecallError::Embedding(EmbeddingError::DimensionMismatch { .. }) => {
                ErrorKind::Conflict
            }
            RecallError::Transient(_)
            | RecallError::Storage(StorageError::PoolExhausted { .. })
            | RecallError::Cache(_)
            | RecallError::Embedding(EmbeddingError::ProviderUnavailable { .. })
            | RecallError::Embedding(EmbeddingError::RateLimited { .. })
            | RecallError::Job(JobError::QueueUnavailable { .. }) => ErrorKind::Transient,
            RecallError::Logic(_)
            | RecallError::Cluster(ClusterError::InsufficientPoints { .. })
            | RecallError::Job(JobError::RetriesExhausted { .. }) => ErrorKind::Logic,
            RecallError::Data(_) => ErrorKind::Data,
            _ => ErrorKind::Transient,
        }
    }

    /// Whether a worker should redeliver the job that produced this error.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

pub type RecallResult<T> = Result<T, RecallError>;
