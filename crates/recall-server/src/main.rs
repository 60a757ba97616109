//! Binary entry point wiring storage, cache, embeddings, engine, and the
//! background job runner together behind the stdio tool-RPC transport.
//! CLI/config/log-formatting plumbing is out of scope for the engine
//! itself (spec §1), so this stays proportionate: one optional config
//! path argument, `tracing-subscriber` initialized from `RUST_LOG`, and
//! a straight construct-and-run.

mod transport;

use std::path::Path;
use std::sync::Arc;

use recall_cache::{NullBackend, RedisBackend, RemoteBackend, TwoTierCache};
use recall_core::config::RecallConfig;
use recall_embeddings::{EmbeddingEngine, HashFallbackProvider};
use recall_engine::MemoryEngine;
use recall_jobs::JobRunner;
use recall_store::SqliteStore;
use tracing::info;

use transport::StdioTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args().nth(1);
    let config = RecallConfig::load(config_path.as_deref());
    info!(database_url = %config.database.url, "loading recall-server configuration");

    let store = Arc::new(SqliteStore::open(Path::new(&config.database.url), config.database.pool_size as usize)?);

    let remote: Arc<dyn RemoteBackend> = match config.cache.remote_url.as_deref().and_then(RedisBackend::new) {
        Some(backend) => Arc::new(backend),
        None => Arc::new(NullBackend),
    };
    let cache = Arc::new(TwoTierCache::new(
        remote,
        config.cache.local_capacity,
        config.cache.default_ttl_secs,
        config.cache.long_ttl_secs,
    ));

    let provider = Box::new(HashFallbackProvider::new(config.embeddings.dimension));
    let embeddings = Arc::new(EmbeddingEngine::new(provider, Arc::clone(&cache))?);

    let engine = Arc::new(MemoryEngine::new(Arc::clone(&store), Arc::clone(&cache), embeddings, config.clone()));

    let handlers = recall_engine::register_handlers(Arc::clone(&engine));
    let runner = Arc::new(JobRunner::new(Arc::clone(&store), config.jobs.clone(), handlers));
    let job_handle = runner.spawn();

    let transport = StdioTransport::new(Arc::clone(&engine));
    let result = transport.run().await;

    info!("draining in-flight jobs before exit");
    job_handle.shutdown().await;

    result.map_err(anyhow::Error::from)
}
