//! The seam workers plug into. `recall-engine` owns the actual embedding,
//! consolidation, clustering, and decay logic; this crate only owns
//! scheduling, retries, and concurrency.

use async_trait::async_trait;
use recall_core::errors::RecallResult;
use serde_json::Value;

/// Implemented once per topic by whatever crate knows how to do the work
/// (embedding provider, consolidation pipeline, ...). Handlers are
/// expected to be idempotent: `JobRunner` delivers at-least-once.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, payload: &Value) -> RecallResult<()>;
}

/// A handler built from an async closure, for composition roots that
/// don't want to name a type per topic.
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F, Fut> JobHandler for FnHandler<F>
where
    F: Fn(&Value) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = RecallResult<()>> + Send,
{
    async fn handle(&self, payload: &Value) -> RecallResult<()> {
        (self.0)(payload).await
    }
}
