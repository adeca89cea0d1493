use std::sync::LazyLock;

use tracing::debug;

use crate::classify::AreaProfile;
use crate::keywords::Keywords;
use crate::record::{BusinessEntity, Environment, Segment, UnitKind};

pub const UNKNOWN_AREA: &str = "Wilayah Tidak Diketahui";

static SHOPPING: LazyLock<Keywords> =
    LazyLock::new(|| Keywords::new(&["mall", "pasar", "toko"]).unwrap());
static INDUSTRY: LazyLock<Keywords> =
    LazyLock::new(|| Keywords::new(&["industri", "factory"]).unwrap());
static LODGING: LazyLock<Keywords> =
    LazyLock::new(|| Keywords::new(&["hotel", "resort"]).unwrap());

/// Business-count guess from the unit name alone.
pub fn business_estimate_from_name(name: &str) -> u32 {
    if SHOPPING.matches(name) {
        20
    } else if INDUSTRY.matches(name) {
        100
    } else if LODGING.matches(name) {
        50
    } else {
        10
    }
}

/// Same name and, when the business carries one, the same code. Records
/// written before codes were attached match on the name alone.
fn listed_under(business: &BusinessEntity, env: &Environment) -> bool {
    business.environment.as_deref() == Some(env.name.as_str())
        && business
            .environment_code
            .as_deref()
            .map_or(true, |code| code == env.code)
}

struct Unit {
    name: String,
    kind: UnitKind,
    sub_sls_code: String,
    known_businesses: usize,
}

fn units(
    environments: &[Environment],
    streets: &[String],
    village: &str,
    businesses: &[BusinessEntity],
) -> Vec<Unit> {
    if !environments.is_empty() {
        return environments
            .iter()
            .map(|env| Unit {
                name: env.name.clone(),
                kind: UnitKind::Environment,
                sub_sls_code: env
                    .code
                    .parse::<u32>()
                    .map(|n| format!("{:02}", n))
                    .unwrap_or_else(|_| env.code.clone()),
                known_businesses: businesses.iter().filter(|b| listed_under(b, env)).count(),
            })
            .collect();
    }

    if !streets.is_empty() {
        return streets
            .iter()
            .enumerate()
            .map(|(i, street)| Unit {
                name: street.clone(),
                kind: UnitKind::Street,
                sub_sls_code: format!("{:02}", i + 1),
                known_businesses: businesses.len(),
            })
            .collect();
    }

    let name = if village.trim().is_empty() {
        UNKNOWN_AREA.to_string()
    } else {
        village.to_string()
    };
    vec![Unit {
        name,
        kind: UnitKind::Village,
        sub_sls_code: "01".to_string(),
        known_businesses: businesses.len(),
    }]
}

fn build(number: usize, unit: Unit) -> Segment {
    let profile = AreaProfile::of(&unit.name);
    let ratios = profile.area.ratios();

    let households = profile.area.baseline_households();
    let residential_buildings = households * ratios.residential_pct / 100;
    let business_buildings = households * ratios.business_pct / 100;
    let vacant_residential = households.saturating_sub(residential_buildings);
    let non_business_buildings = households * 5 / 100;
    let business_count = match unit.known_businesses {
        0 => business_estimate_from_name(&unit.name),
        n => n as u32,
    };
    let total_load = households.max(residential_buildings)
        + vacant_residential
        + non_business_buildings
        + business_count;

    debug!(
        segment = number,
        name = %unit.name,
        area = profile.area.as_str(),
        load = profile.load.code(),
        total_load,
        "segment"
    );

    Segment {
        number,
        label: format!("SEG{:02}", number),
        sub_sls_code: unit.sub_sls_code,
        name: unit.name,
        unit: unit.kind,
        area_type: profile.area,
        load_code: profile.load.code(),
        load_description: profile.load.description().to_string(),
        classifiers_agree: profile.agree(),
        households,
        residential_buildings,
        vacant_residential,
        business_buildings,
        non_business_buildings,
        business_count,
        total_load,
    }
}

/// One segment per environment; per street when there are no environments;
/// otherwise a single segment for the village.
pub fn synthesize(
    environments: &[Environment],
    streets: &[String],
    village: &str,
    businesses: &[BusinessEntity],
) -> Vec<Segment> {
    units(environments, streets, village, businesses)
        .into_iter()
        .enumerate()
        .map(|(i, unit)| build(i + 1, unit))
        .collect()
}
