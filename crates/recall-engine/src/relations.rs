//! Relations CRUD (spec §4.8): `createRelation`, `deleteRelation`,
//! `createBidirectionalRelation`.

use recall_core::errors::{RecallError, RecallResult};
use recall_core::memory::{MemoryRelation, RelationType};
use uuid::Uuid;

use crate::engine::MemoryEngine;

impl MemoryEngine {
    /// Verifies both endpoints exist and are not deleted, upserts, and
    /// invalidates both memories' cache entries.
    pub fn create_relation(&self, from: Uuid, to: Uuid, relation_type: RelationType, strength: f64) -> RecallResult<MemoryRelation> {
        if !self.store.both_endpoints_live(from, to)? {
            return Err(RecallError::NotFound(format!("one or both of {from}, {to} do not exist or are deleted")));
        }
        let relation = self.store.upsert_relation(from, to, relation_type, strength)?;
        self.cache.invalidate_memory(&from.to_string());
        self.cache.invalidate_memory(&to.to_string());
        Ok(relation)
    }

    pub fn delete_relation(&self, from: Uuid, to: Uuid) -> RecallResult<bool> {
        let deleted = self.store.delete_relation(from, to)?;
        self.cache.invalidate_memory(&from.to_string());
        self.cache.invalidate_memory(&to.to_string());
        Ok(deleted)
    }

    /// Creates `from -> to` with `relation_type` and `to -> from` with its
    /// reverse (`extends <-> references`, others identity) (spec §4.8).
    pub fn create_bidirectional_relation(
        &self,
        from: Uuid,
        to: Uuid,
        relation_type: RelationType,
        strength: f64,
    ) -> RecallResult<(MemoryRelation, MemoryRelation)> {
        let forward = self.create_relation(from, to, relation_type, strength)?;
        let backward = self.create_relation(to, from, relation_type.reverse(), strength)?;
        Ok((forward, backward))
    }

    pub fn get_relations(&self, memory_id: Uuid) -> RecallResult<Vec<MemoryRelation>> {
        self.store.get_relations(memory_id)
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

    fn engine() -> MemoryEngine {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let cache = Arc::new(TwoTierCache::local_only(1000, 3600, 86_400));
        let embeddings = Arc::new(EmbeddingEngine::new(Box::new(HashFallbackProvider::new(16)), Arc::clone(&cache)).unwrap());
        MemoryEngine::new(store, cache, embeddings, RecallConfig::default())
    }

    #[test]
    fn create_relation_rejects_missing_endpoint() {
        let e = engine();
        let a = e.store(StoreInput::new("ctx", json!({"text": "a"}), MemoryType::Fact)).unwrap();
        assert!(e.create_relation(a.id, Uuid::new_v4(), RelationType::References, 0.5).is_err());
    }

    #[test]
    fn bidirectional_relation_uses_reverse_type() {
        let e = engine();
        let a = e.store(StoreInput::new("ctx", json!({"text": "a"}), MemoryType::Fact)).unwrap();
        let b = e.store(StoreInput::new("ctx", json!({"text": "b"}), MemoryType::Fact)).unwrap();
        let (fwd, back) = e.create_bidirectional_relation(a.id, b.id, RelationType::Extends, 0.7).unwrap();
        assert_eq!(fwd.relation_type, RelationType::Extends);
        assert_eq!(back.relation_type, RelationType::References);
    }
}
