/// One non-empty, trimmed line of recognized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based position in the raw text, counting blank lines.
    pub no: usize,
    pub text: String,
    /// Lowercased copy used for keyword matching.
    pub folded: String,
}

pub fn normalize(text: &str) -> Vec<Line> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let text = raw.trim();
            if text.is_empty() {
                return None;
            }
            Some(Line {
                no: i + 1,
                text: text.to_string(),
                folded: text.to_lowercase(),
            })
        })
        .collect()
}
