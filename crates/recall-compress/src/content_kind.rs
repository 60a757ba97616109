//! Content-kind detection driving strategy selection (spec §4.5: "Strategy
//! per type"). The store doesn't carry an explicit content kind, so the
//! compressor sniffs it from the extracted text the same way the teacher's
//! `cortex-compression` picks a format from `BaseMemory::memory_type`, but
//! keyed on textual shape rather than the enum — the source text, not the
//! memory's semantic type, is what determines whether comment-stripping or
//! Q/A filtering is the reasonable transform.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Code,
    Conversation,
    Document,
    Generic,
}

const CODE_MARKERS: &[&str] = &["fn ", "function ", "class ", "import ", "def ", "{", "};", "=>"];
const ROLE_MARKERS: &[&str] = &["user:", "assistant:", "system:", "human:", "ai:"];

pub fn detect(text: &str) -> ContentKind {
    let lower = text.to_lowercase();

    let code_hits = CODE_MARKERS.iter().filter(|m| lower.contains(*m)).count();
    if code_hits >= 2 {
        return ContentKind::Code;
    }

    if ROLE_MARKERS.iter().any(|m| lower.contains(m)) || text.trim_end().ends_with('?') {
        return ContentKind::Conversation;
    }

    let header_lines = text.lines().filter(|l| l.trim_start().starts_with('#')).count();
    if header_lines >= 1 {
        return ContentKind::Document;
    }

    ContentKind::Generic
}
