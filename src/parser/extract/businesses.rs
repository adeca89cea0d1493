use std::collections::HashSet;
use std::sync::LazyLock;

use tracing::debug;

use crate::dedup::Unique;
use crate::keywords::{fold, strip_punctuation, Keywords};
use super::environments::Resolved;
use crate::parser::sections::Section;
use crate::record::{BusinessCategory, BusinessEntity};

/// Tested top to bottom; a line takes the first category that matches.
const TAXONOMY: &[(BusinessCategory, &[&str])] = &[
    (
        BusinessCategory::Mall,
        &["mall", "plaza", "center", "supermarket", "hypermarket", "department store", "pusat perbelanjaan"],
    ),
    (
        BusinessCategory::Pasar,
        &["pasar", "market", "traditional market", "pasar tradisional", "pasar induk", "pasar besar"],
    ),
    (BusinessCategory::Hotel, &["hotel", "resort", "inn", "guesthouse", "penginapan"]),
    (
        BusinessCategory::Restaurant,
        &["restaurant", "cafe", "warung", "rumah makan", "restoran"],
    ),
    (BusinessCategory::Bank, &["bank", "atm", "bca", "mandiri", "bni", "bri"]),
    (
        BusinessCategory::Hospital,
        &["hospital", "rumah sakit", "klinik", "apotek", "puskesmas"],
    ),
    (
        BusinessCategory::School,
        &["school", "sekolah", "universitas", "kampus", "sd", "smp", "sma"],
    ),
    (BusinessCategory::Office, &["office", "kantor", "perkantoran", "gedung"]),
    (BusinessCategory::GasStation, &["gas", "spbu", "pertamina", "shell", "bp"]),
    (BusinessCategory::CarWash, &["car wash", "cuci mobil", "cuci motor"]),
    (BusinessCategory::Salon, &["salon", "spa", "beauty", "kecantikan"]),
    (BusinessCategory::Store, &["toko", "store", "shop", "market", "warung"]),
    (BusinessCategory::Motorcycle, &["motor", "honda", "yamaha", "suzuki", "kawasaki"]),
    (BusinessCategory::Dental, &["dental", "gigi", "drg", "dokter gigi"]),
    (BusinessCategory::Music, &["music", "gitar", "piano", "alat musik"]),
    (BusinessCategory::Battery, &["battery", "aki", "accu", "baterai"]),
    (BusinessCategory::Pharmacy, &["pharmacy", "apotek", "kimia farma", "century"]),
    (BusinessCategory::Mosque, &["mosque", "masjid", "musholla", "surau"]),
    (BusinessCategory::Church, &["church", "gereja", "kapel"]),
    (BusinessCategory::Temple, &["temple", "pura", "vihara", "klenteng"]),
    (BusinessCategory::Park, &["park", "taman", "alun-alun", "lapangan"]),
];

const GENERAL: &[&str] = &[
    "warung", "toko", "restaurant", "store", "shop", "gallery", "motor", "dental", "battery",
    "music", "hotel", "mall", "market", "cafe", "bank", "pharmacy", "hospital", "school",
    "university", "office", "factory", "warehouse", "gas station", "car wash", "salon", "spa",
];

static CATEGORIES: LazyLock<Vec<(BusinessCategory, Keywords)>> = LazyLock::new(|| {
    TAXONOMY
        .iter()
        .map(|(cat, words)| (*cat, Keywords::new(words).unwrap()))
        .collect()
});
static GENERAL_KEYWORDS: LazyLock<Keywords> =
    LazyLock::new(|| Keywords::new(GENERAL).unwrap());

/// Category of a business line, or None if it names no business.
pub fn classify(text: &str) -> Option<BusinessCategory> {
    CATEGORIES
        .iter()
        .find(|(_, kw)| kw.matches(text))
        .map(|(cat, _)| *cat)
        .or_else(|| GENERAL_KEYWORDS.matches(text).then_some(BusinessCategory::General))
}

/// Display name of a business line: punctuation stripped, at least three
/// characters.
pub fn business_name(text: &str) -> Option<String> {
    let name = strip_punctuation(text);
    (name.chars().count() > 2).then_some(name)
}

/// Businesses in first-seen order, deduplicated on the folded name, each
/// tagged with the environment section it was listed under. A header line
/// is classified like any other line and belongs to its own section.
pub fn extract(sections: &[Section], skip: &HashSet<usize>, envs: &Resolved) -> Vec<BusinessEntity> {
    let mut found: Unique<String, BusinessEntity> = Unique::new();

    for section in sections {
        let env = envs.for_header(section.header);
        for line in section.lines.iter().filter(|l| !skip.contains(&l.no)) {
            let Some(category) = classify(&line.folded) else {
                continue;
            };
            let Some(name) = business_name(&line.text) else {
                continue;
            };
            let key = fold(&name);
            let entity = BusinessEntity {
                name: name.clone(),
                category,
                environment: env.map(|e| e.name.clone()),
                environment_code: env.map(|e| e.code.clone()),
                line: line.no,
                enrichment: None,
            };
            if found.insert_with(key, entity) {
                debug!(line = line.no, business = %name, category = category.as_str(), "business");
            }
        }
    }

    found.into_vec()
}
