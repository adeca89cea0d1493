use std::sync::LazyLock;

use tracing::debug;

use super::extract::{businesses, coordinates, streets};
use super::lines::Line;
use crate::classify::AreaProfile;
use crate::dedup::Unique;
use crate::keywords::{fold, Keywords};
use crate::record::{AreaBusiness, CoordinatePair, MapContext};

const DEFAULT_ENVIRONMENT: &str = "perumahan";

const ENVIRONMENT_TYPES: &[(&str, &[&str])] = &[
    ("perkambingan", &["perkambingan", "kambing", "ternak", "peternakan", "farm"]),
    ("perumahan", &["perumahan", "rumah", "housing", "residential", "permukiman"]),
    ("komersial", &["komersial", "commercial", "bisnis", "business", "toko", "mall"]),
    ("industri", &["industri", "industrial", "pabrik", "factory", "kawasan industri"]),
    ("pendidikan", &["pendidikan", "education", "sekolah", "school", "universitas"]),
    ("kesehatan", &["kesehatan", "health", "rumah sakit", "hospital", "klinik"]),
    ("pariwisata", &["pariwisata", "tourism", "hotel", "resort", "wisata"]),
    ("pertanian", &["pertanian", "agriculture", "sawah", "ladang", "kebun"]),
    ("perikanan", &["perikanan", "fishery", "tambak", "kolam", "ikan"]),
    ("kehutanan", &["kehutanan", "forestry", "hutan", "forest", "kayu"]),
];

static TYPES: LazyLock<Vec<(&'static str, Keywords)>> = LazyLock::new(|| {
    ENVIRONMENT_TYPES
        .iter()
        .map(|(name, words)| (*name, Keywords::new(words).unwrap()))
        .collect()
});

fn keywords_for(env_type: &str) -> Option<&'static Keywords> {
    TYPES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(env_type))
        .map(|(_, kw)| kw)
}

/// First environment type (in table order) mentioned anywhere on the map.
pub fn detect_environment(lines: &[Line]) -> &'static str {
    TYPES
        .iter()
        .find(|(_, kw)| lines.iter().any(|l| kw.matches(&l.folded)))
        .map(|(name, _)| *name)
        .unwrap_or(DEFAULT_ENVIRONMENT)
}

static AREA_LANDMARK: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&[
        "masjid", "gereja", "pura", "taman", "lapangan", "alun-alun", "monumen", "museum",
        "stasiun", "terminal", "bandara", "pelabuhan",
    ])
    .unwrap()
});

/// Describe the part of the map that belongs to `target` (detected when
/// None). The area opens at the first line naming the target type and runs
/// to the end of the text; lines naming the type again are entry lines and
/// are not classified.
pub fn describe(lines: &[Line], target: Option<&str>) -> MapContext {
    let target = match target {
        Some(t) => t.trim().to_lowercase(),
        None => detect_environment(lines).to_string(),
    };
    let entry = keywords_for(&target);

    let mut target_line = None;
    let mut found: Unique<String, AreaBusiness> = Unique::new();
    let mut streets: Unique<String, String> = Unique::new();
    let mut landmarks: Unique<String, String> = Unique::new();
    let mut coordinates: Unique<(u64, u64), CoordinatePair> = Unique::new();

    for line in lines {
        if entry.is_some_and(|kw| kw.matches(&line.folded)) {
            target_line.get_or_insert(line.no);
            continue;
        }
        if target_line.is_none() {
            continue;
        }

        if let (Some(category), Some(name)) =
            (businesses::classify(&line.folded), businesses::business_name(&line.text))
        {
            let business = AreaBusiness {
                name: name.clone(),
                category,
                line: line.no,
            };
            found.insert_with(fold(&name), business);
        }
        if let Some(street) = streets::parse_street(&line.text) {
            streets.insert_with(street.clone(), street);
        }
        if AREA_LANDMARK.matches(&line.folded) {
            if let Some(name) = businesses::business_name(&line.text) {
                landmarks.insert_with(name.clone(), name);
            }
        }
        if let Some(p) = coordinates::parse_pair(&line.text) {
            coordinates.insert_with((p.latitude.to_bits(), p.longitude.to_bits()), p);
        }
    }

    let profile = AreaProfile::of(&target);
    let businesses = found.into_vec();
    debug!(
        target = %target,
        ?target_line,
        businesses = businesses.len(),
        "map context"
    );

    MapContext {
        target_environment: target,
        target_line,
        area_type: profile.area,
        estimated_kk: profile.area.baseline_households(),
        load_description: profile.load.description().to_string(),
        business_count: businesses.len(),
        businesses,
        streets: streets.into_vec(),
        landmarks: landmarks.into_vec(),
        coordinates: coordinates.into_vec(),
    }
}
