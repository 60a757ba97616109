//! Type-aware and hierarchical compression (spec §4.5). Compression is
//! always lossy and always succeeds — there's no error path, only a
//! smaller string, mirroring the teacher's `cortex-compression` levels
//! which never fail either.

use serde_json::{json, Value};

use crate::content_kind::{detect, ContentKind};
use crate::strategies::{code, conversation, document, generic};

pub const DEFAULT_COMPRESSION_RATIO: f64 = 0.3;
const SKELETON_TOP_N: usize = 10;

#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    pub content: Value,
    pub original_size: usize,
    pub compressed_size: usize,
    pub compression_ratio: f64,
    pub content_kind: ContentKind,
}

fn extract_text(content: &Value) -> String {
    if let Some(text) = content.get("text").and_then(Value::as_str) {
        return text.to_string();
    }
    serde_json::to_string(content).unwrap_or_default()
}

fn compress_text(text: &str, ratio: f64) -> (String, ContentKind) {
    let kind = detect(text);
    let target_len = ((text.len() as f64) * ratio).ceil().max(1.0) as usize;
    let summary = match kind {
        ContentKind::Code => code::compress(text, target_len, SKELETON_TOP_N),
        ContentKind::Conversation => conversation::compress(text, target_len),
        ContentKind::Document => document::compress(text, target_len),
        ContentKind::Generic => generic::compress(text, ratio),
    };
    (summary, kind)
}

/// Whether `serialized_len` bytes of content crosses the compression
/// trigger (spec §4.5: "Input ≥100 KB").
pub fn should_compress(serialized_len: usize, threshold_bytes: usize) -> bool {
    serialized_len >= threshold_bytes
}

/// Compress `content` at `ratio` (fraction of original length to keep),
/// returning the replacement `content` value and size bookkeeping for
/// `metadata.originalSize` / `metadata.compressionRatio` (spec §4.8 step b).
pub fn compress(content: &Value, ratio: f64) -> CompressionOutcome {
    let original = serde_json::to_string(content).unwrap_or_default();
    let original_size = original.len();
    let text = extract_text(content);
    let (summary, kind) = compress_text(&text, ratio);
    let compressed = json!({ "text": summary });
    let compressed_size = serde_json::to_string(&compressed).unwrap_or_default().len();
    CompressionOutcome {
        content: compressed,
        original_size,
        compressed_size,
        compression_ratio: if original_size == 0 {
            1.0
        } else {
            compressed_size as f64 / original_size as f64
        },
        content_kind: kind,
    }
}

/// Age-tiered compression ratio (spec §4.7 hierarchical compress): level is
/// the count of `thresholds` (in days) the memory's age exceeds; each level
/// multiplies the base ratio by 0.7.
pub fn hierarchical_ratio(age_days: i64, thresholds: &[i64], base_ratio: f64) -> f64 {
    let level = thresholds.iter().filter(|&&t| age_days >= t).count() as i32;
    base_ratio * 0.7f64.powi(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compress_respects_threshold() {
        assert!(!should_compress(99, 100));
        assert!(should_compress(100, 100));
    }

    #[test]
    fn compress_marks_content_kind_and_shrinks_generic_text() {
        let content = json!({"text": "One. Two. Three. Four. Five. Six. Seven. Eight."});
        let outcome = compress(&content, 0.5);
        assert_eq!(outcome.content_kind, ContentKind::Generic);
        assert!(outcome.compressed_size <= outcome.original_size);
    }

    #[test]
    fn hierarchical_ratio_decays_per_threshold_crossed() {
        let thresholds = [7, 30, 90];
        let r0 = hierarchical_ratio(1, &thresholds, 0.3);
        let r1 = hierarchical_ratio(10, &thresholds, 0.3);
        let r3 = hierarchical_ratio(100, &thresholds, 0.3);
        assert!((r0 - 0.3).abs() < 1e-9);
        assert!((r1 - 0.3 * 0.7).abs() < 1e-9);
        assert!((r3 - 0.3 * 0.7f64.powi(3)).abs() < 1e-9);
    }
}
