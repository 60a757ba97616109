//! Composite relevance scoring, weight adaptation, and token estimation
//! (spec §4.6).

pub mod formula;
pub mod weights;

pub use formula::{access, estimate_tokens, recency, relevance, score, ScoreInputs};
pub use weights::{adapt_weights, AdaptSignals, Weights};
