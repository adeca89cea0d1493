use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::keywords::Keywords;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaType {
    #[serde(rename = "high_density_residential")]
    HighDensity,
    #[serde(rename = "low_density_residential")]
    LowDensity,
    Commercial,
    Industrial,
    #[serde(rename = "standard_residential")]
    #[default]
    Standard,
}

/// Building ratios in whole percent of the household baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratios {
    pub residential_pct: u32,
    pub business_pct: u32,
}

impl AreaType {
    pub fn baseline_households(self) -> u32 {
        match self {
            AreaType::HighDensity => 150,
            AreaType::LowDensity => 40,
            AreaType::Commercial => 80,
            AreaType::Industrial => 60,
            AreaType::Standard => 100,
        }
    }

    pub fn ratios(self) -> Ratios {
        let (residential_pct, business_pct) = match self {
            AreaType::HighDensity => (95, 25),
            AreaType::LowDensity => (85, 15),
            AreaType::Commercial => (30, 80),
            AreaType::Industrial => (70, 40),
            AreaType::Standard => (90, 20),
        };
        Ratios {
            residential_pct,
            business_pct,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AreaType::HighDensity => "high_density_residential",
            AreaType::LowDensity => "low_density_residential",
            AreaType::Commercial => "commercial",
            AreaType::Industrial => "industrial",
            AreaType::Standard => "standard_residential",
        }
    }
}

static HIGH_DENSITY: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&[
        "padat", "kumuh", "kampung", "slum", "dense", "crowded", "perumahan", "komplek",
    ])
    .unwrap()
});
static COMMERCIAL: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&[
        "pasar", "mall", "plaza", "commercial", "bisnis", "usaha", "toko", "warung",
    ])
    .unwrap()
});
static INDUSTRIAL: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&["industri", "pabrik", "factory", "industrial", "kawasan industri"]).unwrap()
});
static LOW_DENSITY: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&[
        "elite", "mewah", "luxury", "villa", "perumahan mewah", "komplek mewah",
    ])
    .unwrap()
});

/// First matching group wins; high density is tested before low density, so
/// "PERUMAHAN MEWAH" is high density.
pub fn classify(name: &str) -> AreaType {
    let rules: [(&Keywords, AreaType); 4] = [
        (&HIGH_DENSITY, AreaType::HighDensity),
        (&COMMERCIAL, AreaType::Commercial),
        (&INDUSTRIAL, AreaType::Industrial),
        (&LOW_DENSITY, AreaType::LowDensity),
    ];
    rules
        .iter()
        .find(|(kw, _)| kw.matches(name))
        .map(|(_, area)| *area)
        .unwrap_or(AreaType::Standard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn industrial_estate_not_commercial() {
        // "DENPASAR" must not count as "pasar"
        let a = classify("KAWASAN INDUSTRI DENPASAR");
        assert_eq!(a, AreaType::Industrial);
        assert_eq!(a.baseline_households(), 60);
    }

    #[test]
    fn rule_order() {
        assert_eq!(classify("Kampung Baru"), AreaType::HighDensity);
        assert_eq!(classify("Perumahan Mewah Nusa"), AreaType::HighDensity);
        assert_eq!(classify("Villa Hijau"), AreaType::LowDensity);
        assert_eq!(classify("Pasar Kumbasari"), AreaType::Commercial);
        assert_eq!(classify("Pabrik Tekstil"), AreaType::Industrial);
        assert_eq!(classify("Banjar Tengah"), AreaType::Standard);
    }

    #[test]
    fn ratio_table() {
        assert_eq!(AreaType::Commercial.ratios().residential_pct, 30);
        assert_eq!(AreaType::Commercial.ratios().business_pct, 80);
        assert_eq!(AreaType::LowDensity.ratios().residential_pct, 85);
    }
}
