//! Per-session working set (spec §4.11): bounded by `maxWindowSize` and
//! `maxTokens`, with compression triggered by `compressionThreshold` and
//! task-adaptive resizing via C6's weight adaptation.

use chrono::{DateTime, Utc};
use recall_score::{adapt_weights, AdaptSignals, Weights};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Coding,
    Conversation,
    Analysis,
    Creative,
}

/// Window size for a task type (spec §4.11).
pub fn window_size_for(task: TaskType) -> usize {
    match task {
        TaskType::Coding => 15,
        TaskType::Conversation => 10,
        TaskType::Analysis => 20,
        TaskType::Creative => 8,
    }
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub max_window_size: usize,
    pub max_tokens: usize,
    pub compression_threshold: f64,
    pub scoring_interval_secs: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            max_window_size: 20,
            max_tokens: 8_000,
            compression_threshold: 0.7,
            scoring_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WindowEntry {
    pub memory_id: Uuid,
    pub tokens: usize,
    pub score: f64,
    pub added_at: DateTime<Utc>,
    pub compressed: bool,
}

/// The side effects the caller (the engine, spec §4.8/§4.11) must carry
/// out after [`ContextWindow::add`]: which ids to hand to C5
/// `hierarchicalCompress`, and which id (if any) was evicted to make room.
#[derive(Debug, Default)]
pub struct AddOutcome {
    pub compress_ids: Vec<Uuid>,
    pub evicted_id: Option<Uuid>,
}

pub struct ContextWindow {
    pub user_context: String,
    pub config: WindowConfig,
    pub weights: Weights,
    entries: Vec<WindowEntry>,
    total_tokens: usize,
}

impl ContextWindow {
    pub fn new(user_context: String, config: WindowConfig) -> Self {
        Self { user_context, config, weights: Weights::default(), entries: Vec::new(), total_tokens: 0 }
    }

    pub fn entries(&self) -> &[WindowEntry] {
        &self.entries
    }

    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    fn crosses_compression_threshold(&self, incoming_tokens: usize) -> bool {
        let projected = self.total_tokens + incoming_tokens;
        (projected as f64) >= (self.config.max_tokens as f64) * self.config.compression_threshold
    }

    /// The oldest third of entries by insertion order (spec §4.11:
    /// "call C5 hierarchicalCompress on oldest third").
    fn oldest_third_ids(&self) -> Vec<Uuid> {
        let n = self.entries.len();
        let count = ((n as f64) / 3.0).ceil() as usize;
        self.entries.iter().take(count.min(n)).map(|e| e.memory_id).collect()
    }

    fn lowest_scoring_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.score.partial_cmp(&b.1.score).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }

    /// `addToWindow` (spec §4.11): compress the oldest third if the new
    /// entry would cross the compression threshold, evict the
    /// lowest-scoring entry if the window is full, then insert.
    pub fn add(&mut self, memory_id: Uuid, tokens: usize, score: f64, now: DateTime<Utc>) -> AddOutcome {
        let mut outcome = AddOutcome::default();

        if self.crosses_compression_threshold(tokens) {
            outcome.compress_ids = self.oldest_third_ids();
        }

        if self.entries.len() >= self.config.max_window_size {
            if let Some(idx) = self.lowest_scoring_index() {
                let removed = self.entries.remove(idx);
                self.total_tokens = self.total_tokens.saturating_sub(removed.tokens);
                outcome.evicted_id = Some(removed.memory_id);
            }
        }

        self.entries.push(WindowEntry { memory_id, tokens, score, added_at: now, compressed: false });
        self.total_tokens += tokens;
        outcome
    }

    /// Update token accounting after an out-of-band compression of `id`
    /// (the caller ran C5 and now reports the new size).
    pub fn mark_compressed(&mut self, memory_id: Uuid, new_tokens: usize) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.memory_id == memory_id) {
            self.total_tokens = self.total_tokens.saturating_sub(entry.tokens) + new_tokens;
            entry.tokens = new_tokens;
            entry.compressed = true;
        }
    }

    /// `removeFromWindow` (spec §4.11).
    pub fn remove(&mut self, memory_id: Uuid) -> bool {
        if let Some(idx) = self.entries.iter().position(|e| e.memory_id == memory_id) {
            let removed = self.entries.remove(idx);
            self.total_tokens = self.total_tokens.saturating_sub(removed.tokens);
            true
        } else {
            false
        }
    }

    /// `adaptWindow` (spec §4.11): switch weight preferences via C6's
    /// `adaptWeights` and resize for the task type.
    pub fn adapt(&mut self, task_type: TaskType, signals: AdaptSignals, token_budget: Option<usize>) {
        self.weights = adapt_weights(self.weights, signals);
        self.config.max_window_size = window_size_for(task_type);
        if let Some(budget) = token_budget {
            self.config.max_tokens = budget;
        }
    }

    /// Rescore every entry with `scorer`, called on the `scoringInterval`
    /// cadence by the caller.
    pub fn rescore(&mut self, mut scorer: impl FnMut(Uuid) -> f64) {
        for entry in &mut self.entries {
            entry.score = scorer(entry.memory_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_evicts_lowest_scoring_when_full() {
        let mut window = ContextWindow::new("ctx".into(), WindowConfig { max_window_size: 2, ..Default::default() });
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        window.add(a, 10, 0.9, Utc::now());
        window.add(b, 10, 0.1, Utc::now());
        let outcome = window.add(c, 10, 0.5, Utc::now());
        assert_eq!(outcome.evicted_id, Some(b));
        assert_eq!(window.entries().len(), 2);
    }

    #[test]
    fn add_flags_oldest_third_for_compression_near_token_budget() {
        let mut window = ContextWindow::new(
            "ctx".into(),
            WindowConfig { max_window_size: 10, max_tokens: 100, compression_threshold: 0.5, ..Default::default() },
        );
        for _ in 0..3 {
            window.add(Uuid::new_v4(), 10, 0.5, Utc::now());
        }
        let outcome = window.add(Uuid::new_v4(), 40, 0.5, Utc::now());
        assert!(!outcome.compress_ids.is_empty());
    }

    #[test]
    fn adapt_resizes_window_by_task_type() {
        let mut window = ContextWindow::new("ctx".into(), WindowConfig::default());
        window.adapt(TaskType::Creative, AdaptSignals::default(), None);
        assert_eq!(window.config.max_window_size, 8);
    }

    #[test]
    fn remove_recalculates_total_tokens() {
        let mut window = ContextWindow::new("ctx".into(), WindowConfig::default());
        let a = Uuid::new_v4();
        window.add(a, 25, 0.5, Utc::now());
        assert_eq!(window.total_tokens(), 25);
        assert!(window.remove(a));
        assert_eq!(window.total_tokens(), 0);
    }
}
