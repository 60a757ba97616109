//! Document strategy (spec §4.5): first paragraph (≤200 chars), first ≤5
//! headers, paragraphs mentioning a summary-ish keyword; truncated to the
//! target length.

const KEYWORDS: &[&str] = &["summary", "conclusion", "important", "key", "main"];

fn paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()).collect()
}

pub fn compress(text: &str, target_len: usize) -> String {
    let paras = paragraphs(text);
    let mut out = String::new();

    if let Some(first) = paras.first() {
        let truncated: String = first.chars().take(200).collect();
        out.push_str(&truncated);
        out.push('\n');
    }

    let headers: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with('#'))
        .take(5)
        .collect();
    if !headers.is_empty() {
        out.push_str(&headers.join("\n"));
        out.push('\n');
    }

    for p in paras.iter().skip(1) {
        let lower = p.to_lowercase();
        if KEYWORDS.iter().any(|k| lower.contains(k)) {
            out.push_str(p);
            out.push('\n');
        }
    }

    out.chars().take(target_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_paragraph_headers_and_keyword_paragraphs() {
        let text = "Intro paragraph here.\n\n# Header One\n\nSome filler paragraph.\n\nThis is the key conclusion of the document.";
        let out = compress(text, 1000);
        assert!(out.starts_with("Intro paragraph here."));
        assert!(out.contains("# Header One"));
        assert!(out.contains("key conclusion"));
        assert!(!out.contains("Some filler paragraph"));
    }

    #[test]
    fn truncates_to_target_length() {
        let text = "a".repeat(5000);
        let out = compress(&text, 50);
        assert_eq!(out.chars().count(), 50);
    }
}
