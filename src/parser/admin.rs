use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::lines::Line;
use crate::gazetteer::{Gazetteer, Level};
use crate::record::AdministrativeRecord;

// 16 digits that are not part of a longer digit run
static MAP_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)(\d{16})(?:\D|$)").unwrap());

static PROVINCE_GATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:PROVINSI|PROVINCE)\b").unwrap());
static REGENCY_GATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:KABUPATEN|KOTA|REGENCY)\b").unwrap());
static DISTRICT_GATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:KECAMATAN|DISTRICT)\b").unwrap());
static VILLAGE_GATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:DESA|KELURAHAN|VILLAGE)\b").unwrap());
static SCALE_GATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:SKALA|SCALE)\b").unwrap());

// LABEL : [code] NAME
static PROVINCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:PROVINSI|PROVINCE)\s*:\s*(?:\[?\d+\]?)?\s*([A-Z][A-Z\s]*)").unwrap()
});
static REGENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:KABUPATEN|KOTA|REGENCY)\s*:\s*(?:\[?\d+\]?)?\s*([A-Z][A-Z\s]*)").unwrap()
});
static DISTRICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:KECAMATAN|DISTRICT)\s*:\s*(?:\[?\d+\]?)?\s*([A-Z][A-Z\s]*)").unwrap()
});
static VILLAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:DESA|KELURAHAN|VILLAGE)\s*:\s*(?:\[?\d+\]?)?\s*([A-Z][A-Z\s]*)").unwrap()
});

// Unlabeled "KELURAHAN DAUH PURI" / "DESA PEGUYANGAN"
static KELURAHAN_BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bKELURAHAN\s+([A-Z][A-Z\s]*)").unwrap());
static DESA_BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDESA\s+([A-Z][A-Z\s]*)").unwrap());

static SCALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:SKALA|SCALE)\s*:?\s*(\d+:\d+)").unwrap());
static RATIO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d+:\d+)\b").unwrap());

/// Administrative fields plus the line numbers they were read from.
#[derive(Debug, Clone, Default)]
pub struct AdminFields {
    pub record: AdministrativeRecord,
    pub lines: HashSet<usize>,
}

/// Every matching line overwrites the field it matched, so the last
/// occurrence on the map wins.
pub fn extract(lines: &[Line], gazetteer: &Gazetteer) -> AdminFields {
    let mut out = AdminFields::default();

    for line in lines {
        let text = line.text.as_str();
        let mut hit = false;

        if let Some(caps) = MAP_ID_RE.captures(text) {
            out.record.map_id = caps[1].to_string();
            hit = true;
            debug!(line = line.no, map_id = %out.record.map_id, "map id");
        }

        if PROVINCE_GATE.is_match(text) {
            if let Some(v) = labeled(&PROVINCE_RE, text)
                .or_else(|| gazetteer.lookup(Level::Province, text).map(String::from))
            {
                out.record.province = v;
                hit = true;
            }
        }

        if REGENCY_GATE.is_match(text) {
            if let Some(v) = labeled(&REGENCY_RE, text)
                .or_else(|| gazetteer.lookup(Level::Regency, text).map(String::from))
            {
                out.record.regency = v;
                hit = true;
            }
        }

        if DISTRICT_GATE.is_match(text) {
            if let Some(v) = labeled(&DISTRICT_RE, text)
                .or_else(|| gazetteer.lookup(Level::District, text).map(String::from))
            {
                out.record.district = v;
                hit = true;
            }
        }

        if VILLAGE_GATE.is_match(text) {
            if let Some(v) = labeled(&VILLAGE_RE, text)
                .or_else(|| gazetteer.lookup(Level::Village, text).map(String::from))
                .or_else(|| labeled(&KELURAHAN_BARE_RE, text))
                .or_else(|| labeled(&DESA_BARE_RE, text))
            {
                out.record.village = v;
                hit = true;
            }
        }

        if SCALE_GATE.is_match(text) {
            let scale = SCALE_RE
                .captures(text)
                .or_else(|| RATIO_RE.captures(text))
                .map(|c| c[1].to_string());
            if let Some(s) = scale {
                out.record.scale = s;
                hit = true;
            }
        }

        if hit {
            out.lines.insert(line.no);
        }
    }

    out
}

fn labeled(re: &Regex, text: &str) -> Option<String> {
    let name = re.captures(text)?.get(1)?.as_str();
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::normalize;

    fn run(text: &str) -> AdminFields {
        extract(&normalize(text), &Gazetteer::default())
    }

    #[test]
    fn labeled_province_with_code() {
        let a = run("PROVINSI : [51] BALI");
        assert_eq!(a.record.province, "BALI");
        assert!(a.lines.contains(&1));
    }

    #[test]
    fn full_header_block() {
        let a = run(
            "ID SLS 5171030005000100\n\
             Provinsi : [51] Bali\n\
             Kabupaten/Kota : [71] Denpasar\n\
             Kecamatan : [030] Denpasar Barat\n\
             Desa/Kelurahan : [005] Dauh Puri\n\
             Skala 1:353",
        );
        let r = &a.record;
        assert_eq!(r.map_id, "5171030005000100");
        assert_eq!(r.province, "BALI");
        assert_eq!(r.regency, "DENPASAR");
        assert_eq!(r.district, "DENPASAR BARAT");
        assert_eq!(r.village, "DAUH PURI");
        assert_eq!(r.scale, "1:353");
        assert_eq!(a.lines.len(), 6);
    }

    #[test]
    fn map_id_needs_exactly_sixteen_digits() {
        assert_eq!(run("ID 123456789012345").record.map_id, "");
        assert_eq!(run("ID 12345678901234567").record.map_id, "");
        assert_eq!(run("no.1234567890123456.").record.map_id, "1234567890123456");
    }

    #[test]
    fn last_occurrence_wins() {
        let a = run("1111111111111111\n2222222222222222");
        assert_eq!(a.record.map_id, "2222222222222222");
    }

    #[test]
    fn gazetteer_fallback_only_on_labeled_lines() {
        let a = run("PROVINSI JAWA TENGAH\nKECAMATAN DENPASAR SELATAN");
        assert_eq!(a.record.province, "JAWA TENGAH");
        assert_eq!(a.record.district, "DENPASAR SELATAN");

        // a shop named after the island does not set the province
        let b = run("Toko Bali Indah");
        assert_eq!(b.record.province, "");
        assert!(b.lines.is_empty());
    }

    #[test]
    fn bare_village_names() {
        assert_eq!(run("KELURAHAN PEMECUTAN").record.village, "PEMECUTAN");
        assert_eq!(run("Desa Peguyangan Kaja").record.village, "PEGUYANGAN KAJA");
    }

    #[test]
    fn scale_forms() {
        assert_eq!(run("SKALA 1:5000").record.scale, "1:5000");
        assert_eq!(run("Skala peta 1 : 2500 (1:2500)").record.scale, "1:2500");
        assert_eq!(run("1:5000").record.scale, "");
    }
}
