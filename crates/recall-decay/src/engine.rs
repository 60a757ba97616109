//! `DecayEngine`: batch processing, preservation, and retention cleanup
//! (spec §4.10). Grounded in the teacher's `cortex-decay::engine::DecayEngine`
//! (`process_batch` fans a formula + transition decision out over a slice
//! of memories the same way).

use chrono::{Duration, Utc};
use recall_compress::engine::{compress, hierarchical_ratio, should_compress, DEFAULT_COMPRESSION_RATIO};
use recall_core::config::{DecayConfig, LimitsConfig};
use recall_core::errors::RecallResult;
use recall_core::memory::{Memory, MemoryState};
use recall_core::traits::MemoryStore;
use uuid::Uuid;

use crate::formula::compute;
use crate::state::{map_state, record_transition};

/// Age thresholds (in days) driving `hierarchicalCompress`'s level
/// multiplier on archival (spec §4.5, §4.10).
const AGE_THRESHOLDS_DAYS: [i64; 3] = [7, 30, 90];

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub processed: usize,
    pub transitioned: usize,
    pub errors: Vec<String>,
}

pub struct DecayEngine<'a> {
    store: &'a dyn MemoryStore,
    decay: DecayConfig,
    limits: LimitsConfig,
}

impl<'a> DecayEngine<'a> {
    pub fn new(store: &'a dyn MemoryStore, decay: DecayConfig, limits: LimitsConfig) -> Self {
        Self { store, decay, limits }
    }

    /// Recompute decay score/state for up to `size` due memories in
    /// `user_context`, applying transition side effects (spec §4.10).
    pub fn process_batch(&self, user_context: &str, size: usize) -> RecallResult<BatchOutcome> {
        let now = Utc::now();
        let cutoff = now - Duration::hours(1);
        let due = self.store.due_for_decay(user_context, cutoff, size)?;

        let mut outcome = BatchOutcome::default();
        for mut memory in due {
            match self.process_one(&mut memory, now) {
                Ok(transitioned) => {
                    outcome.processed += 1;
                    if transitioned {
                        outcome.transitioned += 1;
                    }
                }
                Err(e) => outcome.errors.push(format!("{}: {e}", memory.id)),
            }
        }
        Ok(outcome)
    }

    fn process_one(&self, memory: &mut Memory, now: chrono::DateTime<Utc>) -> RecallResult<bool> {
        let degree = self.store.get_relations(memory.id).map(|r| r.len() as u64).unwrap_or(0);
        let score = compute(memory, &self.decay, degree, now);
        let new_state = map_state(score);
        let old_state = memory.state;

        memory.decay_score = score;
        memory.last_decay_update = now;

        let transitioned = new_state != old_state;
        if transitioned {
            record_transition(&mut memory.metadata, old_state, new_state, now);
            memory.state = new_state;
            self.apply_transition_side_effects(memory, new_state, now);
        }

        self.store.update(memory)?;
        Ok(transitioned)
    }

    fn apply_transition_side_effects(&self, memory: &mut Memory, new_state: MemoryState, now: chrono::DateTime<Utc>) {
        match new_state {
            MemoryState::Archived if !memory.is_compressed => {
                let serialized = serde_json::to_string(&memory.content).unwrap_or_default();
                if should_compress(serialized.len(), self.limits.compression_threshold_bytes) {
                    let age_days = (now - memory.created_at).num_days();
                    let ratio = hierarchical_ratio(age_days, &AGE_THRESHOLDS_DAYS, DEFAULT_COMPRESSION_RATIO);
                    let outcome = compress(&memory.content, ratio);
                    memory.content = outcome.content;
                    memory.is_compressed = true;
                    if let Some(obj) = memory.metadata.as_object_mut() {
                        obj.insert("compressed".into(), serde_json::json!(true));
                        obj.insert("originalSize".into(), serde_json::json!(outcome.original_size));
                        obj.insert("compressionRatio".into(), serde_json::json!(outcome.compression_ratio));
                    }
                }
            }
            MemoryState::Expired => {
                memory.deleted_at = Some(now);
            }
            _ => {}
        }
    }

    /// `preserveMemory` (spec §4.10): pin a memory at its maximum score and
    /// `active` state, appending the `preserved` tag.
    pub fn preserve_memory(&self, user_context: &str, id: Uuid, until: Option<chrono::DateTime<Utc>>) -> RecallResult<Option<Memory>> {
        let Some(mut memory) = self.store.get(user_context, id)? else {
            return Ok(None);
        };
        let now = Utc::now();
        memory.decay_score = 1.0;
        memory.state = MemoryState::Active;
        memory.last_decay_update = now;
        if !memory.tags.iter().any(|t| t == "preserved") {
            memory.tags.push("preserved".to_string());
        }
        if let Some(until) = until {
            if !memory.metadata.is_object() {
                memory.metadata = serde_json::json!({});
            }
            memory.metadata["preservedUntil"] = serde_json::json!(until.to_rfc3339());
        }
        self.store.update(&memory)?;
        Ok(Some(memory))
    }

    /// `cleanupExpiredMemories` (spec §4.10): hard-delete expired,
    /// soft-deleted memories past the retention window, edges first.
    pub fn cleanup_expired(&self, user_context: &str, retention_days: i64, batch: usize) -> RecallResult<usize> {
        let cutoff = Utc::now() - Duration::days(retention_days);
        let expired = self.store.expired_before(user_context, cutoff, batch)?;
        let ids: Vec<Uuid> = expired.iter().map(|m| m.id).collect();
        if ids.is_empty() {
            return Ok(0);
        }
        self.store.hard_delete(&ids)?;
        Ok(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::memory::MemoryType;
    use recall_store::SqliteStore;
    use serde_json::json;

    fn insert(store: &SqliteStore, importance: f64, confidence: f64, days_ago: i64) -> Memory {
        let now = Utc::now();
        let content = json!({"text": format!("m-{}", Uuid::new_v4())});
        let m = Memory {
            id: Uuid::new_v4(),
            user_context: "ctx".into(),
            content_hash: Memory::compute_content_hash(&content),
            content,
            embedding: None,
            embedding_dimension: None,
            tags: vec![],
            memory_type: MemoryType::Fact,
            source: "test".into(),
            confidence,
            importance_score: importance,
            similarity_threshold: 0.7,
            decay_rate: 0.01,
            access_count: 0,
            parent_id: None,
            relation_type: None,
            cluster_id: None,
            created_at: now - Duration::days(days_ago),
            updated_at: now,
            accessed_at: now - Duration::days(days_ago),
            deleted_at: None,
            last_decay_update: now - Duration::hours(2),
            state: MemoryState::Active,
            decay_score: 1.0,
            is_compressed: false,
            metadata: json!({}),
        };
        store.insert(&m).unwrap();
        m
    }

    #[test]
    fn old_low_confidence_memory_transitions_and_is_logged() {
        let store = SqliteStore::open_in_memory().unwrap();
        let m = insert(&store, 0.05, 0.05, 400);
        let engine = DecayEngine::new(&store, DecayConfig::default(), LimitsConfig::default());
        let outcome = engine.process_batch("ctx", 10).unwrap();
        assert_eq!(outcome.processed, 1);
        let updated = store.get_by_id_any_context(m.id).unwrap().unwrap();
        assert!(updated.metadata["transitions"].as_array().unwrap().len() >= 1);
    }

    #[test]
    fn preserve_memory_pins_score_and_tag() {
        let store = SqliteStore::open_in_memory().unwrap();
        let m = insert(&store, 0.01, 0.01, 1000);
        let engine = DecayEngine::new(&store, DecayConfig::default(), LimitsConfig::default());
        let preserved = engine.preserve_memory("ctx", m.id, None).unwrap().unwrap();
        assert!((preserved.decay_score - 1.0).abs() < 1e-9);
        assert!(preserved.tags.contains(&"preserved".to_string()));
    }

    #[test]
    fn cleanup_expired_removes_past_retention_window() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut m = insert(&store, 0.01, 0.01, 1000);
        m.state = MemoryState::Expired;
        m.deleted_at = Some(Utc::now() - Duration::days(60));
        store.update(&m).unwrap();

        let engine = DecayEngine::new(&store, DecayConfig::default(), LimitsConfig::default());
        let removed = engine.cleanup_expired("ctx", 30, 100).unwrap();
        assert_eq!(removed, 1);
        assert!(store.get_by_id_any_context(m.id).unwrap().is_none());
    }
}
