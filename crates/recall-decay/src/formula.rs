//! Decay score (spec §4.10). Grounded in the teacher's
//! `cortex-decay::formula::compute`, generalized from a 5-factor
//! multiplicative product to the additive/boost shape the spec defines.

use chrono::{DateTime, Utc};

use recall_core::config::DecayConfig;
use recall_core::memory::Memory;

/// `isPreserved(m)` (spec §4.10): any tag in `preservation_tags`
/// (case-insensitive) and `metadata.preservedUntil` either absent or in
/// the future.
pub fn is_preserved(memory: &Memory, config: &DecayConfig, now: DateTime<Utc>) -> bool {
    let tagged = memory
        .tags
        .iter()
        .any(|t| config.preservation_tags.iter().any(|p| p.eq_ignore_ascii_case(t)));
    if !tagged {
        return false;
    }
    match memory.metadata.get("preservedUntil").and_then(|v| v.as_str()) {
        Some(s) => DateTime::parse_from_rfc3339(s).map(|d| d.with_timezone(&Utc) > now).unwrap_or(true),
        None => true,
    }
}

/// Decay score for `memory` at `now`, given its relation degree (spec
/// §4.10):
/// ```text
/// d_days = (now - (accessed_at || created_at)) / 86400
/// lambda = decay_rate || base_decay_rate
/// base   = importance_score * exp(-lambda * d_days)
/// score  = base + access_boost * ln(1 + access_count)
/// score *= confidence
/// if relationship_boost: score += relationship_boost * ln(1 + degree)
/// if preserved: score = max(score, 0.95)
/// clamp [0, 1]
/// ```
pub fn compute(memory: &Memory, config: &DecayConfig, degree: u64, now: DateTime<Utc>) -> f64 {
    let anchor = memory.accessed_at;
    let d_days = (now - anchor).num_seconds() as f64 / 86_400.0;
    let lambda = if memory.decay_rate > 0.0 { memory.decay_rate } else { config.base_decay_rate };

    let base = memory.importance_score * (-lambda * d_days.max(0.0)).exp();
    let mut score = base + config.access_boost * ((1.0 + memory.access_count as f64).ln());
    score *= memory.confidence;

    if config.relationship_boost > 0.0 {
        score += config.relationship_boost * (1.0 + degree as f64).ln();
    }

    if is_preserved(memory, config, now) {
        score = score.max(0.95);
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn memory_with(importance: f64, confidence: f64, access_count: u64, accessed_days_ago: i64) -> Memory {
        let now = Utc::now();
        Memory {
            id: uuid::Uuid::new_v4(),
            user_context: "ctx".into(),
            content_hash: "h".into(),
            content: json!({}),
            embedding: None,
            embedding_dimension: None,
            tags: vec![],
            memory_type: recall_core::memory::MemoryType::Fact,
            source: "".into(),
            confidence,
            importance_score: importance,
            similarity_threshold: 0.7,
            decay_rate: 0.0,
            access_count,
            parent_id: None,
            relation_type: None,
            cluster_id: None,
            created_at: now - chrono::Duration::days(accessed_days_ago),
            updated_at: now,
            accessed_at: now - chrono::Duration::days(accessed_days_ago),
            deleted_at: None,
            last_decay_update: now,
            state: recall_core::memory::MemoryState::Active,
            decay_score: 1.0,
            is_compressed: false,
            metadata: json!({}),
        }
    }

    #[test]
    fn fresh_important_memory_scores_high() {
        let m = memory_with(0.9, 0.9, 0, 0);
        let score = compute(&m, &DecayConfig::default(), 0, Utc::now());
        assert!(score > 0.7);
    }

    #[test]
    fn old_memory_scores_lower_than_fresh_one() {
        let config = DecayConfig::default();
        let now = Utc::now();
        let fresh = memory_with(0.5, 0.5, 0, 0);
        let old = memory_with(0.5, 0.5, 0, 365);
        assert!(compute(&old, &config, 0, now) < compute(&fresh, &config, 0, now));
    }

    #[test]
    fn preserved_tag_floors_score_at_point_nine_five() {
        let mut m = memory_with(0.01, 0.01, 0, 1000);
        m.tags.push("pinned".to_string());
        let score = compute(&m, &DecayConfig::default(), 0, Utc::now());
        assert!((score - 0.95).abs() < 1e-9);
    }

    #[test]
    fn preserved_until_in_past_does_not_floor_score() {
        let mut m = memory_with(0.01, 0.01, 0, 1000);
        m.tags.push("pinned".to_string());
        m.metadata = json!({"preservedUntil": "2000-01-01T00:00:00Z"});
        let score = compute(&m, &DecayConfig::default(), 0, Utc::now());
        assert!(score < 0.95);
    }
}
