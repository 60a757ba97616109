//! Scoring weights and adaptation (spec §4.6). Grounded in the teacher's
//! `cortex-decay::formula` factor-composition shape, generalized from a
//! fixed 5-factor product to 4 normalized additive weights.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub recency: f64,
    pub importance: f64,
    pub access: f64,
    pub relevance: f64,
    pub lambda: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            recency: 0.3,
            importance: 0.3,
            access: 0.2,
            relevance: 0.2,
            lambda: 0.1,
        }
    }
}

impl Weights {
    fn normalize(&mut self) {
        let sum = self.recency + self.importance + self.access + self.relevance;
        if sum > 0.0 {
            self.recency /= sum;
            self.importance /= sum;
            self.access /= sum;
            self.relevance /= sum;
        }
    }
}

/// Signals driving `adaptWeights` (spec §4.6).
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptSignals {
    pub is_recent: bool,
    pub is_important: bool,
    pub is_frequent: bool,
    pub is_relevant: bool,
}

/// Boost the weight matching the dominant signal by 1.5x (halving `lambda`
/// if recency is the signal), then renormalize so the four weights still
/// sum to 1 (spec §4.6).
pub fn adapt_weights(base: Weights, signals: AdaptSignals) -> Weights {
    let mut w = base;
    if signals.is_recent {
        w.recency *= 1.5;
        w.lambda /= 2.0;
    }
    if signals.is_important {
        w.importance *= 1.5;
    }
    if signals.is_frequent {
        w.access *= 1.5;
    }
    if signals.is_relevant {
        w.relevance *= 1.5;
    }
    w.normalize();
    w
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let w = Weights::default();
        let sum = w.recency + w.importance + w.access + w.relevance;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn adapt_weights_stays_normalized_and_boosts_signaled_weights() {
        let base = Weights::default();
        let w = adapt_weights(
            base,
            AdaptSignals { is_recent: true, is_important: true, is_frequent: false, is_relevant: false },
        );
        let sum = w.recency + w.importance + w.access + w.relevance;
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(w.recency > base.recency);
        assert!(w.importance > base.importance);
        assert!(w.access < base.access);
    }

    #[test]
    fn is_recent_halves_lambda() {
        let base = Weights::default();
        let w = adapt_weights(base, AdaptSignals { is_recent: true, ..Default::default() });
        assert!((w.lambda - base.lambda / 2.0).abs() < 1e-9);
    }
}
