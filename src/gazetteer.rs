//! Known administrative names, used when a labeled line carries no readable
//! `LABEL : [code] NAME` value.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum GazetteerError {
    #[error("cannot read gazetteer file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed gazetteer: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("gazetteer entry {name:?} has no match phrases")]
    EmptyEntry { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Province,
    Regency,
    District,
    Village,
}

/// Resolves to `name` when every phrase in `all_of` occurs in the line as
/// whole words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub all_of: Vec<String>,
}

impl Entry {
    fn new(name: &str, all_of: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            all_of: all_of.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn same(name: &str) -> Self {
        Self::new(name, &[name])
    }

    fn matches(&self, words: &[String]) -> bool {
        self.all_of.iter().all(|phrase| contains_phrase(words, phrase))
    }
}

/// Ordered per-level tables; the first matching entry wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gazetteer {
    #[serde(default)]
    pub provinces: Vec<Entry>,
    #[serde(default)]
    pub regencies: Vec<Entry>,
    #[serde(default)]
    pub districts: Vec<Entry>,
    #[serde(default)]
    pub villages: Vec<Entry>,
}

impl Default for Gazetteer {
    fn default() -> Self {
        let provinces = vec![
            Entry::same("BALI"),
            Entry::same("JAWA TIMUR"),
            Entry::same("JAWA TENGAH"),
            Entry::same("JAWA BARAT"),
            Entry::same("JAWA"),
            Entry::same("SUMATERA"),
            Entry::new("SUMATERA", &["SUMATRA"]),
            Entry::same("KALIMANTAN"),
            Entry::same("SULAWESI"),
            Entry::same("PAPUA"),
            Entry::same("MALUKU"),
            Entry::same("NUSA TENGGARA"),
        ];
        let regencies = [
            "DENPASAR", "BADUNG", "GIANYAR", "KLUNGKUNG", "BANGLI", "KARANGASEM", "BULELENG",
            "JEMBRANA", "TABANAN",
        ]
        .iter()
        .map(|n| Entry::same(n))
        .collect();
        let districts = [
            "DENPASAR BARAT",
            "DENPASAR TIMUR",
            "DENPASAR SELATAN",
            "DENPASAR UTARA",
        ]
        .iter()
        .map(|n| Entry::same(n))
        .collect();
        let villages = vec![Entry::same("DAUH PURI")];

        Self {
            provinces,
            regencies,
            districts,
            villages,
        }
    }
}

impl Gazetteer {
    pub fn from_json_str(json: &str) -> Result<Self, GazetteerError> {
        let g: Gazetteer = serde_json::from_str(json)?;
        for entry in g
            .provinces
            .iter()
            .chain(&g.regencies)
            .chain(&g.districts)
            .chain(&g.villages)
        {
            if entry.all_of.iter().all(|p| p.trim().is_empty()) {
                return Err(GazetteerError::EmptyEntry {
                    name: entry.name.clone(),
                });
            }
        }
        Ok(g)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GazetteerError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    fn entries(&self, level: Level) -> &[Entry] {
        match level {
            Level::Province => &self.provinces,
            Level::Regency => &self.regencies,
            Level::District => &self.districts,
            Level::Village => &self.villages,
        }
    }

    pub fn lookup(&self, level: Level, line: &str) -> Option<&str> {
        let words = upper_words(line);
        self.entries(level)
            .iter()
            .find(|e| e.matches(&words))
            .map(|e| e.name.as_str())
    }
}

fn upper_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_uppercase())
        .collect()
}

fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let needle = upper_words(phrase);
    if needle.is_empty() {
        return false;
    }
    words.windows(needle.len()).any(|w| w == needle.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_ordered() {
        let g = Gazetteer::default();
        assert_eq!(g.lookup(Level::Province, "Provinsi Jawa Timur"), Some("JAWA TIMUR"));
        assert_eq!(g.lookup(Level::Province, "PROVINSI SUMATRA UTARA"), Some("SUMATERA"));
        assert_eq!(g.lookup(Level::District, "KEC. DENPASAR UTARA"), Some("DENPASAR UTARA"));
        assert_eq!(g.lookup(Level::Village, "kelurahan dauh puri"), Some("DAUH PURI"));
        assert_eq!(g.lookup(Level::Regency, "KABUPATEN"), None);
    }

    #[test]
    fn whole_words_only() {
        let g = Gazetteer::default();
        assert_eq!(g.lookup(Level::Province, "PROVINSI BALIKPAPAN"), None);
    }

    #[test]
    fn extended_from_json() {
        let json = r#"{
            "regencies": [
                {"name": "KOTA BANDUNG", "all_of": ["BANDUNG"]},
                {"name": "SLEMAN", "all_of": ["SLEMAN"]}
            ]
        }"#;
        let g = Gazetteer::from_json_str(json).unwrap();
        assert_eq!(g.lookup(Level::Regency, "KOTA : BANDUNG"), Some("KOTA BANDUNG"));
        assert_eq!(g.lookup(Level::Province, "PROVINSI BALI"), None);
    }

    #[test]
    fn rejects_empty_entry() {
        let json = r#"{"villages": [{"name": "X", "all_of": [" "]}]}"#;
        assert!(matches!(
            Gazetteer::from_json_str(json),
            Err(GazetteerError::EmptyEntry { .. })
        ));
    }
}
