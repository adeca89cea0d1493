use regex::Regex;

/// A case-insensitive, whole-word keyword set compiled into one alternation.
///
/// Matching on word boundaries keeps short keywords from firing inside
/// longer words: `kos` does not match `kosong`, `pasar` does not match
/// `DENPASAR`.
#[derive(Debug, Clone)]
pub struct Keywords {
    re: Regex,
}

impl Keywords {
    pub fn new(words: &[&str]) -> Result<Self, regex::Error> {
        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let re = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))?;
        Ok(Self { re })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

/// Keeps word characters, whitespace, `-` and `.`; trims the result.
pub fn strip_punctuation(line: &str) -> String {
    line.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '.'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Lowercase with whitespace runs collapsed. Used as the dedup key for names.
pub fn fold(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_word_only() {
        let kos = Keywords::new(&["kos", "kost"]).unwrap();
        assert!(kos.matches("Kost Putra Sejahtera"));
        assert!(!kos.matches("Rumah Kosong"));

        let pasar = Keywords::new(&["pasar"]).unwrap();
        assert!(!pasar.matches("KAWASAN INDUSTRI DENPASAR"));
        assert!(pasar.matches("Pasar Badung"));
    }

    #[test]
    fn multi_word_and_hyphenated_keywords() {
        let kw = Keywords::new(&["alun-alun", "gas station"]).unwrap();
        assert!(kw.matches("Alun-alun Kota"));
        assert!(!kw.matches("Alun Kota"));
        assert!(kw.matches("Shell Gas Station"));
    }

    #[test]
    fn strip_and_fold() {
        assert_eq!(strip_punctuation("  Toko \"Maju\" (Jaya)! "), "Toko Maju Jaya");
        assert_eq!(strip_punctuation("Masjid Al-Ikhlas."), "Masjid Al-Ikhlas.");
        assert_eq!(fold("Toko   MAJU jaya"), "toko maju jaya");
    }
}
