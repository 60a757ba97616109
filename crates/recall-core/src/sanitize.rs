//! Input sanitation shared by every tool (spec §6.1).

use crate::config::LimitsConfig;
use crate::errors::{RecallError, RecallResult};

/// Strip ASCII control characters (0x00-0x1F, 0x7F) except `\n` and `\t`.
pub fn strip_control_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            let code = c as u32;
            !(code <= 0x1F || code == 0x7F) || c == '\n' || c == '\t'
        })
        .collect()
}

/// Reduce a tag to `[A-Za-z0-9 _-]`.
pub fn sanitize_tag(tag: &str) -> String {
    tag.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '_' || *c == '-')
        .collect()
}

/// Validate and normalize a tag list against the configured limits
/// (spec §3: at most 20 tags, each ≤50 chars, alphanumeric + ` - _`).
pub fn validate_tags(tags: &[String], limits: &LimitsConfig) -> RecallResult<Vec<String>> {
    if tags.len() > limits.max_tags {
        return Err(RecallError::InvalidParams(format!(
            "tags: at most {} tags allowed, got {}",
            limits.max_tags,
            tags.len()
        )));
    }
    let mut out = Vec::with_capacity(tags.len());
    for tag in tags {
        let cleaned = sanitize_tag(tag);
        if cleaned.len() > limits.max_tag_length {
            return Err(RecallError::InvalidParams(format!(
                "tags: tag '{cleaned}' exceeds {} chars",
                limits.max_tag_length
            )));
        }
        if !cleaned.is_empty() {
            out.push(cleaned);
        }
    }
    Ok(out)
}

/// Validate a `user_context` string.
pub fn validate_user_context(ctx: &str, limits: &LimitsConfig) -> RecallResult<String> {
    let ctx = if ctx.is_empty() { "default" } else { ctx };
    if ctx.len() > limits.max_user_context_length {
        return Err(RecallError::InvalidParams(format!(
            "user_context: exceeds {} chars",
            limits.max_user_context_length
        )));
    }
    Ok(strip_control_chars(ctx))
}

/// Validate that a serialized content payload does not exceed the
/// configured byte cap (spec §6.1: content ≤1MB).
pub fn validate_content_size(serialized: &str, limits: &LimitsConfig) -> RecallResult<()> {
    if serialized.len() > limits.max_content_bytes {
        return Err(RecallError::InvalidParams(format!(
            "content: exceeds {} bytes (got {})",
            limits.max_content_bytes,
            serialized.len()
        )));
    }
    Ok(())
}

/// Validate a value lies within an inclusive range, producing a
/// `<path>: <message>` formatted error per spec §6.1.
pub fn validate_range(path: &str, value: f64, min: f64, max: f64) -> RecallResult<()> {
    if value < min || value > max {
        return Err(RecallError::InvalidParams(format!(
            "{path}: must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_control_chars_but_keeps_newline_and_tab() {
        let input = "hello\x00world\n\ttab\x7f";
        assert_eq!(strip_control_chars(input), "helloworld\n\ttab");
    }

    #[test]
    fn sanitizes_special_chars_from_tags() {
        assert_eq!(sanitize_tag("rust!@# lang_2024-ok"), "rust lang_2024-ok");
    }

    #[test]
    fn rejects_too_many_tags() {
        let limits = LimitsConfig::default();
        let tags: Vec<String> = (0..21).map(|i| format!("t{i}")).collect();
        assert!(validate_tags(&tags, &limits).is_err());
    }

    #[test]
    fn accepts_exactly_twenty_tags() {
        let limits = LimitsConfig::default();
        let tags: Vec<String> = (0..20).map(|i| format!("t{i}")).collect();
        assert!(validate_tags(&tags, &limits).is_ok());
    }
}
