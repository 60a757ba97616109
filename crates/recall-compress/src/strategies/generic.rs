//! Generic strategy (spec §4.5): sentence-split, stride-pick first/middle/
//! last, capped at `ceil(n * ratio)` sentences.

fn split_sentences(text: &str) -> Vec<&str> {
    text.split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn compress(text: &str, ratio: f64) -> String {
    let sentences = split_sentences(text);
    let n = sentences.len();
    if n == 0 {
        return String::new();
    }
    let keep = ((n as f64) * ratio).ceil() as usize;
    let keep = keep.clamp(1, n);

    if keep >= n {
        return sentences.join(" ");
    }

    let mut indices = Vec::with_capacity(keep);
    if keep == 1 {
        indices.push(0);
    } else {
        for i in 0..keep {
            let idx = (i * (n - 1)) / (keep - 1);
            indices.push(idx);
        }
    }
    indices.dedup();

    indices.into_iter().map(|i| sentences[i]).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_middle_last_by_stride() {
        let text = "One. Two. Three. Four. Five.";
        let out = compress(text, 0.5);
        assert!(out.starts_with("One."));
        assert!(out.ends_with("Five."));
    }

    #[test]
    fn ratio_one_keeps_everything() {
        let text = "One. Two. Three.";
        assert_eq!(compress(text, 1.0), "One. Two. Three.");
    }
}
