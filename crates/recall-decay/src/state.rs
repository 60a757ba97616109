//! State mapping and transition bookkeeping (spec §4.10). The
//! `metadata.transitions` audit trail is a bounded ring — a supplemented
//! ambient concern not named by the distilled spec but needed so a
//! long-lived memory's JSON metadata doesn't grow without bound.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use recall_core::memory::MemoryState;

/// Cap on `metadata.transitions[]` entries.
pub const TRANSITIONS_RING_CAP: usize = 50;

/// `score >= 0.5 -> active`, `>= 0.1 -> dormant`, `>= 0.01 -> archived`,
/// else `expired` (spec §4.10).
pub fn map_state(score: f64) -> MemoryState {
    if score >= 0.5 {
        MemoryState::Active
    } else if score >= 0.1 {
        MemoryState::Dormant
    } else if score >= 0.01 {
        MemoryState::Archived
    } else {
        MemoryState::Expired
    }
}

fn state_label(s: MemoryState) -> &'static str {
    match s {
        MemoryState::Active => "active",
        MemoryState::Dormant => "dormant",
        MemoryState::Archived => "archived",
        MemoryState::Expired => "expired",
    }
}

/// Append `{from, to, timestamp}` to `metadata.transitions[]`, evicting
/// the oldest entries past [`TRANSITIONS_RING_CAP`].
pub fn record_transition(metadata: &mut Value, from: MemoryState, to: MemoryState, at: DateTime<Utc>) {
    if !metadata.is_object() {
        *metadata = json!({});
    }
    let obj = metadata.as_object_mut().expect("coerced to object above");
    let entries = obj.entry("transitions").or_insert_with(|| json!([]));
    if !entries.is_array() {
        *entries = json!([]);
    }
    let arr = entries.as_array_mut().expect("coerced to array above");
    arr.push(json!({
        "from": state_label(from),
        "to": state_label(to),
        "timestamp": at.to_rfc3339(),
    }));
    if arr.len() > TRANSITIONS_RING_CAP {
        let drop = arr.len() - TRANSITIONS_RING_CAP;
        arr.drain(0..drop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_thresholds_map_to_expected_states() {
        assert_eq!(map_state(0.9), MemoryState::Active);
        assert_eq!(map_state(0.5), MemoryState::Active);
        assert_eq!(map_state(0.3), MemoryState::Dormant);
        assert_eq!(map_state(0.1), MemoryState::Dormant);
        assert_eq!(map_state(0.05), MemoryState::Archived);
        assert_eq!(map_state(0.01), MemoryState::Archived);
        assert_eq!(map_state(0.0), MemoryState::Expired);
    }

    #[test]
    fn transitions_ring_evicts_oldest_past_cap() {
        let mut metadata = json!({});
        let now = Utc::now();
        for _ in 0..(TRANSITIONS_RING_CAP + 10) {
            record_transition(&mut metadata, MemoryState::Active, MemoryState::Dormant, now);
        }
        let arr = metadata["transitions"].as_array().unwrap();
        assert_eq!(arr.len(), TRANSITIONS_RING_CAP);
    }
}
