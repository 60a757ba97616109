//! Drives per-topic polling loops: claims due jobs up to the topic's
//! configured concurrency, runs them against the registered handler,
//! retries with backoff on failure, and drains in-flight work on
//! shutdown (spec §4.12).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use recall_core::config::JobsConfig;
use recall_store::SqliteStore;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::handler::JobHandler;
use crate::limiter::RateLimiter;
use crate::queue::{Job, JobQueue};
use crate::topic::JobTopic;

const POLL_INTERVAL_IDLE: Duration = Duration::from_millis(250);

pub struct JobRunner {
    store: Arc<SqliteStore>,
    jobs_config: JobsConfig,
    handlers: HashMap<JobTopic, Arc<dyn JobHandler>>,
}

/// Returned by [`JobRunner::spawn`]. Dropping it does not stop the runner;
/// call [`JobRunnerHandle::shutdown`] to stop polling and drain in-flight
/// jobs.
pub struct JobRunnerHandle {
    shutdown_tx: watch::Sender<bool>,
    topic_tasks: Vec<tokio::task::JoinHandle<()>>,
}

impl JobRunnerHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for task in self.topic_tasks {
            let _ = task.await;
        }
    }
}

impl JobRunner {
    pub fn new(store: Arc<SqliteStore>, jobs_config: JobsConfig, handlers: HashMap<JobTopic, Arc<dyn JobHandler>>) -> Self {
        Self { store, jobs_config, handlers }
    }

    /// Starts one polling task per topic that has a registered handler.
    /// `enable_async_processing = false` (spec §4.12 kill switch) starts
    /// nothing and returns an immediately-shutdownable handle.
    pub fn spawn(self: Arc<Self>) -> JobRunnerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut topic_tasks = Vec::new();

        if self.jobs_config.enable_async_processing {
            for topic in JobTopic::ALL {
                if topic == JobTopic::Clustering && !self.jobs_config.enable_clustering {
                    continue;
                }
                let Some(handler) = self.handlers.get(&topic).cloned() else { continue };
                let runner = Arc::clone(&self);
                let mut rx = shutdown_rx.clone();
                topic_tasks.push(tokio::spawn(async move {
                    runner.run_topic(topic, handler, &mut rx).await;
                }));
            }
        }

        JobRunnerHandle { shutdown_tx, topic_tasks }
    }

    fn rate_limiter_for(&self, topic: JobTopic) -> Option<RateLimiter> {
        match topic {
            JobTopic::Embedding => Some(RateLimiter::per_second(self.jobs_config.embedding_rate_per_sec)),
            JobTopic::Decay => Some(RateLimiter::per_minute(self.jobs_config.decay_rate_per_min)),
            _ => None,
        }
    }

    async fn run_topic(&self, topic: JobTopic, handler: Arc<dyn JobHandler>, shutdown: &mut watch::Receiver<bool>) {
        let concurrency = topic.concurrency(&self.jobs_config).max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let limiter = self.rate_limiter_for(topic).map(Arc::new);
        let mut in_flight: JoinSet<()> = JoinSet::new();

        loop {
            if *shutdown.borrow() {
                break;
            }

            let available = semaphore.available_permits();
            let claimed = if available > 0 {
                let queue = JobQueue::new(&self.store);
                queue.claim(topic, available).unwrap_or_else(|e| {
                    warn!(topic = topic.as_str(), error = %e, "job claim failed");
                    Vec::new()
                })
            } else {
                Vec::new()
            };

            if claimed.is_empty() {
                tokio::select! {
                    _ = tokio::time::sleep(POLL_INTERVAL_IDLE) => {}
                    _ = shutdown.changed() => {}
                }
                continue;
            }

            for job in claimed {
                let permit = Arc::clone(&semaphore).acquire_owned().await.expect("semaphore not closed");
                let handler = Arc::clone(&handler);
                let store = Arc::clone(&self.store);
                let limiter = limiter.clone();
                in_flight.spawn(async move {
                    let _permit = permit;
                    if let Some(limiter) = &limiter {
                        limiter.acquire().await;
                    }
                    execute_one(&store, topic, &job, handler.as_ref()).await;
                });
            }

            while in_flight.try_join_next().is_some() {}
        }

        while in_flight.join_next().await.is_some() {}
    }
}

async fn execute_one(store: &SqliteStore, topic: JobTopic, job: &Job, handler: &dyn JobHandler) {
    let queue = JobQueue::new(store);
    match handler.handle(&job.payload).await {
        Ok(()) => {
            if let Err(e) = queue.complete(job) {
                warn!(topic = topic.as_str(), job_id = %job.id, error = %e, "failed to mark job complete");
            } else {
                debug!(topic = topic.as_str(), job_id = %job.id, "job complete");
            }
        }
        Err(e) => {
            let message = e.to_string();
            if let Err(terminal) = queue.fail(job, &message) {
                warn!(topic = topic.as_str(), job_id = %job.id, error = %terminal, "job retries exhausted");
            } else {
                debug!(topic = topic.as_str(), job_id = %job.id, error = %message, "job failed, scheduled for retry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::FnHandler;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn processes_an_enqueued_job_and_shuts_down_cleanly() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let queue = JobQueue::new(&store);
        queue.enqueue(JobTopic::Embedding, &json!({"id": "abc"}), 0).unwrap();

        let processed = Arc::new(AtomicUsize::new(0));
        let processed_clone = Arc::clone(&processed);
        let handler: Arc<dyn JobHandler> = Arc::new(FnHandler(move |_payload: &serde_json::Value| {
            let processed = Arc::clone(&processed_clone);
            async move {
                processed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }));

        let mut handlers: HashMap<JobTopic, Arc<dyn JobHandler>> = HashMap::new();
        handlers.insert(JobTopic::Embedding, handler);

        let mut config = JobsConfig::default();
        config.enable_async_processing = true;
        let runner = Arc::new(JobRunner::new(Arc::clone(&store), config, handlers));
        let handle = runner.spawn();

        tokio::time::sleep(Duration::from_millis(400)).await;
        handle.shutdown().await;

        assert_eq!(processed.load(Ordering::SeqCst), 1);
    }
}
