//! Composite score (spec §4.6):
//! `score = w_r·recency + w_i·importance + w_a·access + w_v·relevance`.

use crate::weights::Weights;

/// Exponential recency decay `exp(-lambda * age_hours)`, clamped to [0, 1].
pub fn recency(age_hours: f64, lambda: f64) -> f64 {
    (-lambda * age_hours.max(0.0)).exp().clamp(0.0, 1.0)
}

/// Log-scaled access frequency relative to the corpus-wide max access
/// count `n`.
pub fn access(count: u64, n: u64) -> f64 {
    let numerator = ((count as f64) + 1.0).ln();
    let denominator = ((n as f64) + 1.0).ln();
    if denominator == 0.0 {
        0.0
    } else {
        (numerator / denominator).clamp(0.0, 1.0)
    }
}

/// Similarity-derived relevance, `max(0, sim)^0.7`.
pub fn relevance(similarity: f64) -> f64 {
    similarity.max(0.0).powf(0.7)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInputs {
    pub age_hours: f64,
    pub importance: f64,
    pub access_count: u64,
    pub max_access_count: u64,
    pub similarity: f64,
}

/// The weighted composite used by search ranking and context-window
/// rescoring (spec §4.6, §4.11).
pub fn score(inputs: ScoreInputs, weights: &Weights) -> f64 {
    let r = recency(inputs.age_hours, weights.lambda);
    let i = inputs.importance.clamp(0.0, 1.0);
    let a = access(inputs.access_count, inputs.max_access_count);
    let v = relevance(inputs.similarity);
    weights.recency * r + weights.importance * i + weights.access * a + weights.relevance * v
}

/// Rough token estimate, `ceil(chars / 4)` (spec §4.6).
pub fn estimate_tokens(text: &str) -> usize {
    (text.chars().count() as f64 / 4.0).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recency_at_zero_age_is_one() {
        assert!((recency(0.0, 0.1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn recency_decays_with_age() {
        assert!(recency(100.0, 0.1) < recency(1.0, 0.1));
    }

    #[test]
    fn relevance_clamps_negative_similarity_to_zero() {
        assert_eq!(relevance(-0.5), 0.0);
    }

    #[test]
    fn access_of_max_count_is_one() {
        assert!((access(10, 10) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens(""), 0);
    }

    proptest::proptest! {
        #[test]
        fn score_stays_bounded(
            age_hours in 0.0f64..10_000.0,
            importance in 0.0f64..1.0,
            access_count in 0u64..1000,
            similarity in -1.0f64..1.0,
        ) {
            let weights = Weights::default();
            let inputs = ScoreInputs {
                age_hours,
                importance,
                access_count,
                max_access_count: 1000,
                similarity,
            };
            let s = score(inputs, &weights);
            proptest::prop_assert!((0.0..=1.0001).contains(&s));
        }
    }
}
