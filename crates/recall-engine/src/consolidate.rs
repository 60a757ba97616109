//! `consolidate(input)` (spec §4.8): DBSCAN over this user's embeddings,
//! clustered memories get tagged with a cluster id and archived.

use recall_core::errors::RecallResult;
use recall_core::memory::MemoryState;
use uuid::Uuid;

use crate::dto::{now, ConsolidateInput, ConsolidateOutput};
use crate::engine::MemoryEngine;

impl MemoryEngine {
    pub fn consolidate(&self, input: ConsolidateInput) -> RecallResult<ConsolidateOutput> {
        let epsilon = (1.0 - input.threshold).max(0.0);
        let min_cluster_size = input.min_cluster_size.unwrap_or(self.config.consolidation.min_cluster_size);

        let rows = self.store.all_embeddings(&input.user_context)?;
        let ids: Vec<Uuid> = rows.iter().filter_map(|(id, _)| Uuid::parse_str(id).ok()).collect();
        let points: Vec<Vec<f32>> = rows.into_iter().map(|(_, e)| e).collect();

        // Spec: `minPoints = min_cluster_size` for this entry point (C7's
        // own defaults apply only to the standalone clustering worker).
        let assignment = recall_cluster::run_dbscan(&points, epsilon, min_cluster_size);
        let groups = recall_cluster::group_clusters(&assignment, min_cluster_size);

        let mut memories_archived = 0usize;
        for (cluster_idx, members) in groups.iter().enumerate() {
            let cluster_id = format!("c{cluster_idx}");
            for &member_idx in members {
                let Some(&id) = ids.get(member_idx) else { continue };
                if let Some(mut memory) = self.store.get(&input.user_context, id)? {
                    memory.cluster_id = Some(cluster_id.clone());
                    memory.state = MemoryState::Archived;
                    memory.updated_at = now();
                    self.store.update(&memory)?;
                    self.cache.invalidate_memory(&id.to_string());
                    memories_archived += 1;
                }
            }
        }

        Ok(ConsolidateOutput { clusters_created: groups.len(), memories_archived })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::StoreInput;
    use recall_cache::TwoTierCache;
    use recall_core::config::RecallConfig;
    use recall_core::memory::MemoryType;
    use recall_embeddings::{EmbeddingEngine, HashFallbackProvider};
    use recall_store::SqliteStore;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn consolidate_archives_clustered_memories() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let cache = Arc::new(TwoTierCache::local_only(1000, 3600, 86_400));
        let embeddings = Arc::new(EmbeddingEngine::new(Box::new(HashFallbackProvider::new(8)), Arc::clone(&cache)).unwrap());
        let engine = MemoryEngine::new(Arc::clone(&store), cache, embeddings, RecallConfig::default());

        let mut input = StoreInput::new("ctx", json!({"text": "alpha beta gamma"}), MemoryType::Fact);
        input.r#async = false;
        let a = engine.store(input).unwrap();
        let mut input = StoreInput::new("ctx", json!({"text": "alpha beta gamma delta"}), MemoryType::Fact);
        input.r#async = false;
        let b = engine.store(input).unwrap();
        let _ = (a, b);

        let output = engine
            .consolidate(ConsolidateInput { user_context: "ctx".to_string(), threshold: -1.0, min_cluster_size: Some(1) })
            .unwrap();
        assert!(output.clusters_created >= 1);
    }
}
