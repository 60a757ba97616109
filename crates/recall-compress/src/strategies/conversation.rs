//! Conversation strategy (spec §4.5): keep lines that look like questions,
//! role markers, or contain an importance keyword; if still too long,
//! bracket head+tail around an elision marker.

const KEYWORDS: &[&str] = &["important", "critical", "must", "should", "need"];
const ROLE_MARKERS: &[&str] = &["user:", "assistant:", "system:", "human:", "ai:"];
const ELISION_MARKER: &str = "[...]";

fn is_kept(line: &str) -> bool {
    let lower = line.to_lowercase();
    line.trim_end().ends_with('?')
        || ROLE_MARKERS.iter().any(|m| lower.starts_with(m))
        || KEYWORDS.iter().any(|k| lower.contains(k))
}

pub fn compress(text: &str, target_len: usize) -> String {
    let kept: Vec<&str> = text.lines().filter(|l| is_kept(l)).collect();
    let filtered = kept.join("\n");
    if filtered.len() <= target_len {
        return filtered;
    }

    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let half_budget = target_len / 2;
    let mut head = String::new();
    for line in &lines {
        if head.len() + line.len() + 1 > half_budget {
            break;
        }
        head.push_str(line);
        head.push('\n');
    }
    let mut tail = String::new();
    for line in lines.iter().rev() {
        if tail.len() + line.len() + 1 > half_budget {
            break;
        }
        tail.insert_str(0, &format!("{line}\n"));
    }
    format!("{}{}\n{}", head, ELISION_MARKER, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_questions_and_keyword_lines() {
        let text = "hello there\nwhat time is it?\nthis is critical\nsmall talk";
        let out = compress(text, 1000);
        assert!(out.contains("what time is it?"));
        assert!(out.contains("critical"));
        assert!(!out.contains("small talk"));
    }

    #[test]
    fn brackets_head_and_tail_when_still_long() {
        let mut text = String::new();
        for i in 0..200 {
            text.push_str(&format!("line number {i} with some filler words to pad it out\n"));
        }
        let out = compress(&text, 200);
        assert!(out.contains(ELISION_MARKER));
        assert!(out.len() <= text.len());
    }
}
