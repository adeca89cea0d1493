use std::sync::LazyLock;

use regex::Regex;

use crate::dedup::Unique;
use crate::parser::lines::Line;
use crate::record::CoordinatePair;

static COORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+\.\d+),\s*(-?\d+\.\d+)").unwrap());

pub fn parse_pair(text: &str) -> Option<CoordinatePair> {
    let caps = COORD_RE.captures(text)?;
    Some(CoordinatePair {
        latitude: caps[1].parse().ok()?,
        longitude: caps[2].parse().ok()?,
    })
}

/// Deduplicated on exact value.
pub fn extract(lines: &[Line]) -> Vec<CoordinatePair> {
    let mut pairs: Unique<(u64, u64), CoordinatePair> = Unique::new();
    for line in lines {
        if let Some(p) = parse_pair(&line.text) {
            pairs.insert_with((p.latitude.to_bits(), p.longitude.to_bits()), p);
        }
    }
    pairs.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::normalize;

    #[test]
    fn parses_signed_pairs() {
        let p = parse_pair("Titik -8.6560, 115.2120").unwrap();
        assert_eq!(p.latitude, -8.656);
        assert_eq!(p.longitude, 115.212);
        assert!(parse_pair("1:5000").is_none());
        assert!(parse_pair("8, 115").is_none());
    }

    #[test]
    fn value_dedup() {
        // same value, different spelling
        let c = extract(&normalize("-8.6560,115.2120\n-8.656, 115.212\n-8.7, 115.2"));
        assert_eq!(c.len(), 2);
    }
}
