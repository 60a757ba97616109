//! Durable async job queue (spec §4.12): the `jobs` SQLite table as a
//! durable outbox, per-topic concurrency and rate limits from
//! `RecallConfig::jobs`, exponential backoff retries, and graceful
//! shutdown draining. Workers themselves (what an `embedding` or
//! `consolidation` job actually does) are supplied by the composition
//! root as [`JobHandler`] implementations; this crate only owns
//! scheduling.

pub mod backoff;
pub mod handler;
pub mod limiter;
pub mod queue;
pub mod runner;
pub mod topic;

pub use backoff::backoff_duration;
pub use handler::{FnHandler, JobHandler};
pub use limiter::RateLimiter;
pub use queue::{Job, JobQueue};
pub use runner::{JobRunner, JobRunnerHandle};
pub use topic::JobTopic;
