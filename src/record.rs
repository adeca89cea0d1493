use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::AreaType;

/// Map identity and the administrative hierarchy. Empty string means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministrativeRecord {
    pub map_id: String,
    pub province: String,
    pub regency: String,
    pub district: String,
    pub village: String,
    pub scale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessCategory {
    Mall,
    Pasar,
    Hotel,
    Restaurant,
    Bank,
    Hospital,
    School,
    Office,
    GasStation,
    CarWash,
    Salon,
    Store,
    Motorcycle,
    Dental,
    Music,
    Battery,
    Pharmacy,
    Mosque,
    Church,
    Temple,
    Park,
    General,
}

impl BusinessCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            BusinessCategory::Mall => "mall",
            BusinessCategory::Pasar => "pasar",
            BusinessCategory::Hotel => "hotel",
            BusinessCategory::Restaurant => "restaurant",
            BusinessCategory::Bank => "bank",
            BusinessCategory::Hospital => "hospital",
            BusinessCategory::School => "school",
            BusinessCategory::Office => "office",
            BusinessCategory::GasStation => "gas_station",
            BusinessCategory::CarWash => "car_wash",
            BusinessCategory::Salon => "salon",
            BusinessCategory::Store => "store",
            BusinessCategory::Motorcycle => "motorcycle",
            BusinessCategory::Dental => "dental",
            BusinessCategory::Music => "music",
            BusinessCategory::Battery => "battery",
            BusinessCategory::Pharmacy => "pharmacy",
            BusinessCategory::Mosque => "mosque",
            BusinessCategory::Church => "church",
            BusinessCategory::Temple => "temple",
            BusinessCategory::Park => "park",
            BusinessCategory::General => "general",
        }
    }

    /// Fallback opening hours when the lookup source has none.
    pub fn default_hours(self) -> &'static str {
        match self {
            BusinessCategory::Restaurant => "08:00-22:00",
            BusinessCategory::Bank => "08:00-16:00",
            BusinessCategory::Mall => "09:00-21:00",
            BusinessCategory::Hotel
            | BusinessCategory::Hospital
            | BusinessCategory::Mosque
            | BusinessCategory::Church
            | BusinessCategory::Temple => "24 Jam",
            BusinessCategory::School => "07:00-15:00",
            BusinessCategory::Office => "08:00-17:00",
            BusinessCategory::GasStation => "06:00-22:00",
            BusinessCategory::CarWash => "08:00-18:00",
            BusinessCategory::Salon => "09:00-20:00",
            BusinessCategory::Dental => "09:00-17:00",
            BusinessCategory::Music => "09:00-18:00",
            BusinessCategory::Pharmacy => "08:00-21:00",
            BusinessCategory::Park => "06:00-22:00",
            _ => "08:00-17:00",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accuracy {
    High,
    Low,
    None,
}

impl Accuracy {
    pub fn as_str(self) -> &'static str {
        match self {
            Accuracy::High => "high",
            Accuracy::Low => "low",
            Accuracy::None => "none",
        }
    }
}

/// Best-effort contact and location data from an external lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub coordinates: Option<CoordinatePair>,
    pub operating_hours: String,
    pub accuracy: Accuracy,
    pub validated: bool,
    pub place_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessEntity {
    pub name: String,
    pub category: BusinessCategory,
    /// Name of the LINGKUNGAN section the business was listed under.
    pub environment: Option<String>,
    /// Code of that section, telling apart environments that share a name.
    #[serde(default)]
    pub environment_code: Option<String>,
    pub line: usize,
    pub enrichment: Option<Enrichment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub code: String,
    /// Code was numbered by the extractor rather than read from the map.
    pub synthesized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatePair {
    pub latitude: f64,
    pub longitude: f64,
}

impl CoordinatePair {
    pub fn in_indonesia(&self) -> bool {
        (-11.0..=6.0).contains(&self.latitude) && (95.0..=141.0).contains(&self.longitude)
    }

    /// `8°39'0.00"S, 115°13'0.00"E`
    pub fn to_dms(&self) -> String {
        let lat_dir = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let lon_dir = if self.longitude >= 0.0 { 'E' } else { 'W' };
        format!(
            "{}{}, {}{}",
            dms(self.latitude),
            lat_dir,
            dms(self.longitude),
            lon_dir
        )
    }

    pub fn google_maps_link(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }

    pub fn osm_link(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={}&mlon={}&zoom=18",
            self.latitude, self.longitude
        )
    }
}

fn dms(value: f64) -> String {
    let abs = value.abs();
    let degrees = abs.trunc();
    let minutes_full = (abs - degrees) * 60.0;
    let minutes = minutes_full.trunc();
    let seconds = (minutes_full - minutes) * 60.0;
    format!("{}°{}'{:.2}\"", degrees as u32, minutes as u32, seconds)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingTally {
    pub vacant: usize,
    pub non_residential: usize,
    pub business: usize,
    pub boarding: usize,
    pub vacant_names: Vec<String>,
    pub non_residential_names: Vec<String>,
    pub business_names: Vec<String>,
    pub boarding_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CenterKind {
    Mall,
    Pasar,
}

impl CenterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CenterKind::Mall => "mall",
            CenterKind::Pasar => "pasar",
        }
    }
}

/// A point with its human-facing renderings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinates: CoordinatePair,
    pub dms: String,
    pub google_maps_link: String,
    pub osm_link: String,
}

impl Location {
    pub fn of(coordinates: CoordinatePair) -> Self {
        Self {
            dms: coordinates.to_dms(),
            google_maps_link: coordinates.google_maps_link(),
            osm_link: coordinates.osm_link(),
            coordinates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicCenter {
    pub name: String,
    pub kind: CenterKind,
    pub base_estimate: u32,
    pub estimated_umkm: u32,
    pub context: String,
    pub enrichment: Option<Enrichment>,
    /// From the enrichment coordinates, when there are any.
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Environment,
    Street,
    Village,
}

impl UnitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitKind::Environment => "environment",
            UnitKind::Street => "street",
            UnitKind::Village => "village",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub number: usize,
    pub label: String,
    pub sub_sls_code: String,
    pub name: String,
    pub unit: UnitKind,
    pub area_type: AreaType,
    pub load_code: u8,
    pub load_description: String,
    pub classifiers_agree: bool,
    pub households: u32,
    pub residential_buildings: u32,
    pub vacant_residential: u32,
    pub business_buildings: u32,
    pub non_business_buildings: u32,
    pub business_count: u32,
    pub total_load: u32,
}

impl Segment {
    pub fn expected_total(&self) -> u32 {
        self.households.max(self.residential_buildings)
            + self.households.saturating_sub(self.residential_buildings)
            + self.non_business_buildings
            + self.business_count
    }
}

/// A business named inside the target area of the map context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaBusiness {
    pub name: String,
    pub category: BusinessCategory,
    pub line: usize,
}

/// Which kind of area the map as a whole is about, and what was listed
/// inside it. Lines naming the area type open the area and are not
/// classified themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapContext {
    pub target_environment: String,
    /// First line naming the area type.
    pub target_line: Option<usize>,
    pub area_type: AreaType,
    pub estimated_kk: u32,
    pub load_description: String,
    pub businesses: Vec<AreaBusiness>,
    pub streets: Vec<String>,
    pub landmarks: Vec<String>,
    pub coordinates: Vec<CoordinatePair>,
    pub business_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapRecord {
    pub admin: AdministrativeRecord,
    pub businesses: Vec<BusinessEntity>,
    pub streets: Vec<String>,
    pub environments: Vec<Environment>,
    pub landmarks: Vec<String>,
    pub coordinates: Vec<CoordinatePair>,
    pub buildings: BuildingTally,
    pub economic_centers: Vec<EconomicCenter>,
    pub segments: Vec<Segment>,
    pub context: MapContext,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub households: u32,
    pub residential_buildings: u32,
    pub business_count: u32,
    pub total_load: u32,
    pub umkm_in_centers: u32,
}

impl MapRecord {
    pub fn totals(&self) -> Totals {
        let mut t = Totals::default();
        for s in &self.segments {
            t.households += s.households;
            t.residential_buildings += s.residential_buildings;
            t.business_count += s.business_count;
            t.total_load += s.total_load;
        }
        t.umkm_in_centers = self.economic_centers.iter().map(|c| c.estimated_umkm).sum();
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dms_formatting() {
        let c = CoordinatePair {
            latitude: -8.65,
            longitude: 115.2166,
        };
        assert_eq!(c.to_dms(), "8°39'0.00\"S, 115°12'59.76\"E");
        assert!(c.in_indonesia());
        assert!(c.google_maps_link().ends_with("q=-8.65,115.2166"));
    }

    #[test]
    fn outside_bounds() {
        let c = CoordinatePair {
            latitude: 48.85,
            longitude: 2.35,
        };
        assert!(!c.in_indonesia());
    }

    #[test]
    fn fallback_hours() {
        assert_eq!(BusinessCategory::Hotel.default_hours(), "24 Jam");
        assert_eq!(BusinessCategory::General.default_hours(), "08:00-17:00");
    }
}
