use std::collections::HashSet;
use std::sync::LazyLock;

use crate::dedup::Unique;
use crate::keywords::{strip_punctuation, Keywords};
use crate::parser::lines::Line;

static LANDMARK: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&[
        "monument", "park", "square", "temple", "church", "mosque", "museum", "tugu", "patung",
        "alun-alun",
    ])
    .unwrap()
});

pub fn extract(lines: &[Line], skip: &HashSet<usize>) -> Vec<String> {
    let mut landmarks: Unique<String, String> = Unique::new();
    for line in lines.iter().filter(|l| !skip.contains(&l.no)) {
        if !LANDMARK.matches(&line.folded) {
            continue;
        }
        let name = strip_punctuation(&line.text);
        if name.chars().count() > 2 {
            landmarks.insert_with(name.clone(), name);
        }
    }
    landmarks.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::normalize;

    #[test]
    fn landmark_lines() {
        let l = extract(
            &normalize("Tugu Pahlawan\nMuseum Bali (Puputan)\nTugu Pahlawan\nPatungan warga"),
            &HashSet::new(),
        );
        assert_eq!(l, vec!["Tugu Pahlawan", "Museum Bali Puputan"]);
    }
}
