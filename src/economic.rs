use std::sync::LazyLock;

use tracing::debug;

use crate::classify::{load, DominantLoad};
use crate::keywords::Keywords;
use crate::record::{BusinessEntity, CenterKind, EconomicCenter, Environment, Location};

static MALL: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&[
        "mall", "plaza", "shopping center", "pusat perbelanjaan", "supermarket", "hypermarket",
        "department store", "mal", "shopping mall", "retail center", "commercial center",
    ])
    .unwrap()
});
static PASAR: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&[
        "pasar", "market", "traditional market", "pasar tradisional", "pasar induk",
        "pasar besar", "pasar utama", "pasar raya", "pasar modern", "pasar swalayan",
    ])
    .unwrap()
});

static LARGE_RETAIL: LazyLock<Keywords> =
    LazyLock::new(|| Keywords::new(&["supermarket", "hypermarket", "department store"]).unwrap());
static STANDARD_MALL: LazyLock<Keywords> =
    LazyLock::new(|| Keywords::new(&["mall", "plaza", "shopping center"]).unwrap());
static LARGE_PASAR: LazyLock<Keywords> =
    LazyLock::new(|| Keywords::new(&["pasar induk", "pasar besar", "pasar utama"]).unwrap());
static MODERN_PASAR: LazyLock<Keywords> =
    LazyLock::new(|| Keywords::new(&["pasar modern", "pasar swalayan"]).unwrap());

static LIVESTOCK_ENV: LazyLock<Keywords> =
    LazyLock::new(|| Keywords::new(&["perkambingan"]).unwrap());
static AGRICULTURE_ENV: LazyLock<Keywords> = LazyLock::new(|| Keywords::new(&["sawah"]).unwrap());
static INDUSTRIAL_ENV: LazyLock<Keywords> = LazyLock::new(|| Keywords::new(&["pabrik"]).unwrap());

/// What surrounds the centers on this map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surroundings {
    Livestock,
    Agriculture,
    Industrial,
    Neutral,
}

impl Surroundings {
    /// Checked in order: livestock, agriculture, industrial.
    pub fn detect(env_context: &str, load: Option<DominantLoad>) -> Self {
        if LIVESTOCK_ENV.matches(env_context) || load == Some(DominantLoad::KawasanPeternakan) {
            Surroundings::Livestock
        } else if load == Some(DominantLoad::KawasanPertanian) || AGRICULTURE_ENV.matches(env_context) {
            Surroundings::Agriculture
        } else if load == Some(DominantLoad::KawasanIndustri) || INDUSTRIAL_ENV.matches(env_context) {
            Surroundings::Industrial
        } else {
            Surroundings::Neutral
        }
    }
}

pub fn center_kind(name: &str) -> Option<CenterKind> {
    if MALL.matches(name) {
        Some(CenterKind::Mall)
    } else if PASAR.matches(name) {
        Some(CenterKind::Pasar)
    } else {
        None
    }
}

/// Micro-business count before context adjustment.
pub fn base_estimate(kind: CenterKind, name: &str) -> u32 {
    match kind {
        CenterKind::Mall if LARGE_RETAIL.matches(name) => 80,
        CenterKind::Mall if STANDARD_MALL.matches(name) => 60,
        CenterKind::Mall => 40,
        CenterKind::Pasar if LARGE_PASAR.matches(name) => 150,
        CenterKind::Pasar if MODERN_PASAR.matches(name) => 80,
        CenterKind::Pasar => 100,
    }
}

pub fn adjust(kind: CenterKind, base: u32, around: Surroundings) -> u32 {
    match (around, kind) {
        (Surroundings::Livestock, CenterKind::Mall) => (base / 2).max(20),
        (Surroundings::Livestock, CenterKind::Pasar) => (base / 2).max(30),
        (Surroundings::Agriculture, CenterKind::Mall) => (base * 10 / 13).max(25),
        (Surroundings::Agriculture, CenterKind::Pasar) => (base * 10 / 12).max(50),
        (Surroundings::Industrial, CenterKind::Mall) => (base * 11 / 10).min(80),
        (Surroundings::Industrial, CenterKind::Pasar) => (base * 11 / 10).min(120),
        (Surroundings::Neutral, _) => base,
    }
}

/// Malls and markets among the businesses, with estimates scaled to the
/// map's surroundings. The load comes from the first environment; a map
/// without environments has neutral surroundings.
pub fn detect(businesses: &[BusinessEntity], environments: &[Environment]) -> Vec<EconomicCenter> {
    let env_context = environments
        .iter()
        .map(|e| e.name.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let dominant = environments.first().map(|e| load::classify(&e.name));
    let around = Surroundings::detect(&env_context, dominant);

    businesses
        .iter()
        .filter_map(|b| {
            let kind = center_kind(&b.name)?;
            let base = base_estimate(kind, &b.name);
            let estimated = adjust(kind, base, around);
            let context = if !env_context.is_empty() {
                format!("Pusat ekonomi ({}) di {}", kind.as_str(), env_context)
            } else {
                format!("Pusat ekonomi ({}) yang berisi multiple UMKM", kind.as_str())
            };
            debug!(center = %b.name, kind = kind.as_str(), base, estimated, ?around, "economic center");
            Some(EconomicCenter {
                name: b.name.clone(),
                kind,
                base_estimate: base,
                estimated_umkm: estimated,
                context,
                location: b
                    .enrichment
                    .as_ref()
                    .and_then(|e| e.coordinates)
                    .map(Location::of),
                enrichment: b.enrichment.clone(),
            })
        })
        .collect()
}
