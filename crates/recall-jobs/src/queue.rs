//! Thin typed wrapper over `recall_store::SqliteStore`'s `jobs` table
//! methods (spec §4.12). This is the only thing in the crate that talks
//! to storage directly.

use chrono::{DateTime, Utc};
use recall_core::errors::{JobError, RecallError, RecallResult};
use recall_store::SqliteStore;
use serde_json::Value;
use uuid::Uuid;

use crate::backoff::backoff_duration;
use crate::topic::JobTopic;

#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    pub topic: JobTopic,
    pub payload: Value,
    pub attempts: u32,
    pub max_attempts: u32,
    pub priority: i32,
}

pub struct JobQueue<'a> {
    store: &'a SqliteStore,
}

impl<'a> JobQueue<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Default `maxAttempts` when the caller doesn't specify one (spec
    /// §4.12 doesn't pin an exact number; 5 matches the `jobs` table's
    /// column default).
    pub fn enqueue(&self, topic: JobTopic, payload: &Value, priority: i32) -> RecallResult<Uuid> {
        self.enqueue_at(topic, payload, priority, Utc::now())
    }

    pub fn enqueue_at(&self, topic: JobTopic, payload: &Value, priority: i32, run_at: DateTime<Utc>) -> RecallResult<Uuid> {
        self.store.enqueue_job(topic.as_str(), payload, priority, 5, run_at)
    }

    pub fn claim(&self, topic: JobTopic, limit: usize) -> RecallResult<Vec<Job>> {
        let rows = self.store.claim_jobs(topic.as_str(), limit)?;
        Ok(rows
            .into_iter()
            .map(|row| Job {
                id: row.id,
                topic,
                payload: row.payload,
                attempts: row.attempts,
                max_attempts: row.max_attempts,
                priority: row.priority,
            })
            .collect())
    }

    pub fn complete(&self, job: &Job) -> RecallResult<()> {
        self.store.complete_job(job.id)
    }

    /// Record a failure. Reschedules with exponential backoff if attempts
    /// remain, otherwise marks the job permanently `failed` and returns a
    /// `RetriesExhausted` error for the caller to log.
    pub fn fail(&self, job: &Job, error: &str) -> RecallResult<()> {
        let next_attempt = job.attempts + 1;
        let retry_at = Utc::now() + chrono::Duration::from_std(backoff_duration(next_attempt)).unwrap_or_default();
        let will_retry = self.store.fail_job(job.id, error, Some(retry_at))?;
        if will_retry {
            Ok(())
        } else {
            Err(RecallError::from(JobError::RetriesExhausted { id: job.id.to_string(), attempts: next_attempt }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn claim_then_complete_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let queue = JobQueue::new(&store);
        queue.enqueue(JobTopic::Embedding, &json!({"memory_id": "x"}), 5).unwrap();

        let claimed = queue.claim(JobTopic::Embedding, 10).unwrap();
        assert_eq!(claimed.len(), 1);
        queue.complete(&claimed[0]).unwrap();

        let again = queue.claim(JobTopic::Embedding, 10).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn fail_reschedules_with_retries_remaining() {
        let store = SqliteStore::open_in_memory().unwrap();
        let queue = JobQueue::new(&store);
        queue.enqueue(JobTopic::Decay, &json!({}), 0).unwrap();

        let claimed = queue.claim(JobTopic::Decay, 10).unwrap();
        assert_eq!(claimed.len(), 1);
        assert!(queue.fail(&claimed[0], "boom").is_ok());

        // run_at was pushed into the future by backoff, so nothing is due yet.
        let claimed = queue.claim(JobTopic::Decay, 10).unwrap();
        assert!(claimed.is_empty());
    }

    #[test]
    fn fail_returns_retries_exhausted_once_max_attempts_hit() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.enqueue_job("decay", &json!({}), 0, 1, Utc::now()).unwrap();
        let queue = JobQueue::new(&store);
        let claimed = queue.claim(JobTopic::Decay, 10).unwrap();
        assert_eq!(claimed[0].id, id);
        assert_eq!(claimed[0].max_attempts, 1);

        let err = queue.fail(&claimed[0], "boom").unwrap_err();
        assert_eq!(err.kind(), recall_core::errors::ErrorKind::Logic);
    }
}
