use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::dedup::Unique;
use crate::parser::lines::Line;

// "Jl. Merdeka", "Jl Gatot Subroto", "JALAN Sudirman"
static STREET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:jalan|jl)(?:\.\s*|\s+)([a-z][a-z\s]*)").unwrap()
});
static HOUSE_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+no$").unwrap());

/// Street name in canonical `Jl. <Name>` form.
pub fn parse_street(text: &str) -> Option<String> {
    let caps = STREET_RE.captures(text)?;
    let raw = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
    let name = HOUSE_NO_RE.replace(&raw, "");
    if name.chars().count() < 2 {
        return None;
    }
    Some(format!("Jl. {}", name))
}

pub fn extract(lines: &[Line], skip: &HashSet<usize>) -> Vec<String> {
    let mut streets: Unique<String, String> = Unique::new();
    for line in lines.iter().filter(|l| !skip.contains(&l.no)) {
        if let Some(street) = parse_street(&line.text) {
            if streets.insert_with(street.clone(), street.clone()) {
                debug!(line = line.no, street = %street, "street");
            }
        }
    }
    streets.into_vec()
}
