//! Per-session token-bounded working memory window (spec §4.11).

pub mod window;

pub use window::{AddOutcome, ContextWindow, TaskType, WindowConfig, WindowEntry};
