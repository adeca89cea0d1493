use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::{EnrichmentError, EnrichmentSource, Query};
use crate::record::{Accuracy, BusinessCategory, CoordinatePair, Enrichment};

pub const DEFAULT_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "WSS-Map-Extractor/1.0";
const RESULT_LIMIT: &str = "5";

/// OpenStreetMap Nominatim search.
pub struct NominatimSource {
    client: reqwest::Client,
    url: String,
}

impl NominatimSource {
    pub fn new(url: &str, user_agent: &str) -> Result<Self, EnrichmentError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    importance: Option<f64>,
    #[serde(default)]
    osm_type: Option<String>,
    #[serde(default, rename = "type")]
    place_type: Option<String>,
    #[serde(default)]
    address: HashMap<String, serde_json::Value>,
    #[serde(default)]
    extratags: Option<HashMap<String, String>>,
}

impl Place {
    fn tag(&self, key: &str) -> Option<&str> {
        self.extratags.as_ref()?.get(key).map(String::as_str)
    }

    fn address_field(&self, key: &str) -> Option<&str> {
        self.address.get(key)?.as_str()
    }

    fn coordinates(&self) -> Option<CoordinatePair> {
        Some(CoordinatePair {
            latitude: self.lat.parse().ok()?,
            longitude: self.lon.parse().ok()?,
        })
    }
}

/// Name with everything but word characters and spaces removed.
fn clean_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect::<String>()
        .trim()
        .to_string()
}

/// OSM tag values that confirm a result is the kind of place we asked for.
fn type_matches(category: BusinessCategory, place: &Place) -> bool {
    let is = |key: &str, values: &[&str]| place.tag(key).is_some_and(|v| values.contains(&v));
    match category {
        BusinessCategory::Mall => is("shop", &["mall", "supermarket"]),
        BusinessCategory::Pasar => is("amenity", &["marketplace"]),
        BusinessCategory::Hotel => is("tourism", &["hotel"]),
        BusinessCategory::Restaurant => is("amenity", &["restaurant"]),
        BusinessCategory::Bank => is("amenity", &["bank"]),
        BusinessCategory::Hospital => is("amenity", &["hospital"]),
        BusinessCategory::School => is("amenity", &["school"]),
        BusinessCategory::Office => place.tag("office").is_some(),
        BusinessCategory::GasStation => is("amenity", &["fuel"]),
        BusinessCategory::CarWash => is("shop", &["car_repair"]),
        BusinessCategory::Salon => is("shop", &["hairdresser"]),
        BusinessCategory::Motorcycle => is("shop", &["motorcycle"]),
        BusinessCategory::Dental => is("amenity", &["dentist"]),
        BusinessCategory::Music => is("shop", &["music"]),
        BusinessCategory::Battery => is("shop", &["car_parts"]),
        BusinessCategory::Pharmacy => is("amenity", &["pharmacy"]),
        BusinessCategory::Mosque | BusinessCategory::Church | BusinessCategory::Temple => {
            is("amenity", &["place_of_worship"])
        }
        BusinessCategory::Park => is("leisure", &["park"]),
        BusinessCategory::Store | BusinessCategory::General => false,
    }
}

/// First node/way whose tags match the category, else the first result.
fn best_match(category: BusinessCategory, places: &[Place]) -> Option<&Place> {
    places
        .iter()
        .find(|p| {
            matches!(p.osm_type.as_deref(), Some("node") | Some("way")) && type_matches(category, p)
        })
        .or_else(|| places.first())
}

/// Coordinates of the most important result.
fn precise_coordinates(places: &[Place]) -> Option<CoordinatePair> {
    places
        .iter()
        .filter_map(|p| Some((p.importance.unwrap_or(0.0), p.coordinates()?)))
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, c)| c)
}

pub(crate) fn to_enrichment(category: BusinessCategory, places: &[Place]) -> Option<Enrichment> {
    let best = best_match(category, places)?;
    let coordinates = precise_coordinates(places);
    let (accuracy, validated) = match coordinates {
        Some(c) if c.in_indonesia() => (Accuracy::High, true),
        Some(_) => (Accuracy::Low, false),
        None => (Accuracy::None, false),
    };

    let pick = |address_key: &str, tag_keys: &[&str]| -> String {
        best.address_field(address_key)
            .or_else(|| tag_keys.iter().find_map(|k| best.tag(k)))
            .unwrap_or_default()
            .to_string()
    };

    let mut operating_hours = pick("opening_hours", &["opening_hours"]);
    if operating_hours.is_empty() {
        operating_hours = category.default_hours().to_string();
    }

    Some(Enrichment {
        address: best.display_name.clone(),
        phone: pick("phone", &["contact:phone", "phone"]),
        email: pick("email", &["contact:email", "email"]),
        website: pick("website", &["contact:website", "website"]),
        coordinates,
        operating_hours,
        accuracy,
        validated,
        place_type: best.place_type.clone().unwrap_or_else(|| "general".to_string()),
    })
}

#[async_trait]
impl EnrichmentSource for NominatimSource {
    async fn lookup(&self, query: &Query<'_>) -> Result<Option<Enrichment>, EnrichmentError> {
        let name = clean_name(query.name);
        if name.chars().count() < 3 {
            return Ok(None);
        }
        let q = format!("{}, {}", name, query.location);
        info!("Searching for business: {}", q);

        let resp = self
            .client
            .get(&self.url)
            .query(&[
                ("q", q.as_str()),
                ("format", "json"),
                ("limit", RESULT_LIMIT),
                ("addressdetails", "1"),
                ("extratags", "1"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let places: Vec<Place> =
            serde_json::from_str(&body).map_err(|e| EnrichmentError::Decode(e.to_string()))?;
        debug!(query = %q, results = places.len(), "nominatim");

        Ok(to_enrichment(query.category, &places))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"[
        {
            "lat": "-8.6580", "lon": "115.2110", "display_name": "Badung, Denpasar",
            "importance": 0.2, "osm_type": "relation", "type": "administrative",
            "address": {"city": "Denpasar"}, "extratags": null
        },
        {
            "lat": "-8.6553", "lon": "115.2125", "display_name": "Pasar Badung, Jalan Gajah Mada, Denpasar",
            "importance": 0.45, "osm_type": "way", "type": "marketplace",
            "address": {"road": "Jalan Gajah Mada"},
            "extratags": {"amenity": "marketplace", "opening_hours": "Mo-Su 06:00-22:00", "contact:phone": "+62 361 123"}
        }
    ]"#;

    fn places(json: &str) -> Vec<Place> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn prefers_typed_match() {
        let e = to_enrichment(BusinessCategory::Pasar, &places(RESPONSE)).unwrap();
        assert_eq!(e.address, "Pasar Badung, Jalan Gajah Mada, Denpasar");
        assert_eq!(e.phone, "+62 361 123");
        assert_eq!(e.operating_hours, "Mo-Su 06:00-22:00");
        assert_eq!(e.place_type, "marketplace");
        assert_eq!(e.accuracy, Accuracy::High);
        assert!(e.validated);
        assert_eq!(e.coordinates.unwrap().latitude, -8.6553);
    }

    #[test]
    fn falls_back_to_first_result_and_default_hours() {
        let e = to_enrichment(BusinessCategory::Bank, &places(RESPONSE)).unwrap();
        assert_eq!(e.address, "Badung, Denpasar");
        assert_eq!(e.operating_hours, "08:00-16:00");
        assert_eq!(e.phone, "");
    }

    #[test]
    fn outside_indonesia_is_low_accuracy() {
        let json = r#"[{"lat": "48.85", "lon": "2.35", "display_name": "Paris"}]"#;
        let e = to_enrichment(BusinessCategory::General, &places(json)).unwrap();
        assert_eq!(e.accuracy, Accuracy::Low);
        assert!(!e.validated);
    }

    #[test]
    fn empty_results() {
        assert!(to_enrichment(BusinessCategory::Mall, &[]).is_none());
    }

    #[test]
    fn cleans_names() {
        assert_eq!(clean_name("Toko \"Maju\"-Jaya."), "Toko MajuJaya");
    }
}
