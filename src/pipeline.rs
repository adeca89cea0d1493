use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::economic;
use crate::enrich::{enrich_businesses, EnrichmentGateway};
use crate::gazetteer::Gazetteer;
use crate::ocr::{OcrError, OcrService};
use crate::parser::{self, ParsedMap};
use crate::record::MapRecord;
use crate::segments;
use crate::validate::{validate, ValidationError};

pub const DEFAULT_LOCATION: &str = "Indonesia";

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error(transparent)]
    Ocr(#[from] OcrError),
    #[error("internal extraction fault: {0}")]
    Internal(String),
}

/// A finished record plus its validation outcome. An invalid header does
/// not stop the rest of the record from being produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    pub record: MapRecord,
    pub validation: Option<ValidationError>,
}

impl Extraction {
    pub fn is_valid(&self) -> bool {
        self.validation.is_none()
    }
}

/// Run a pure stage, turning a panic into a reportable error.
fn guarded<T>(stage: &str, f: impl FnOnce() -> T) -> Result<T, ExtractError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!(stage, "extraction fault: {}", msg);
        ExtractError::Internal(format!("{}: {}", stage, msg))
    })
}

/// Economic centers, segments and validation from the entity collections.
fn derive(mut record: MapRecord) -> Extraction {
    record.economic_centers = economic::detect(&record.businesses, &record.environments);
    record.segments = segments::synthesize(
        &record.environments,
        &record.streets,
        &record.admin.village,
        &record.businesses,
    );

    let validation = validate(&record.admin).err();
    if let Some(v) = &validation {
        warn!(kind = %v.kind, fields = ?v.fields, "map header invalid");
    }
    Extraction { record, validation }
}

/// Recompute derived data for a record whose fields were edited by hand.
pub fn resynthesize(record: MapRecord) -> Result<Extraction, ExtractError> {
    guarded("resynthesize", || derive(record))
}

/// Request entry point. Holds no per-request state; one instance can serve
/// any number of extractions.
#[derive(Clone)]
pub struct Extractor {
    gazetteer: Arc<Gazetteer>,
    gateway: EnrichmentGateway,
    default_location: String,
    target_environment: Option<String>,
}

impl Extractor {
    pub fn new(gazetteer: Gazetteer, gateway: EnrichmentGateway) -> Self {
        Self {
            gazetteer: Arc::new(gazetteer),
            gateway,
            default_location: DEFAULT_LOCATION.to_string(),
            target_environment: None,
        }
    }

    pub fn with_default_location(mut self, location: &str) -> Self {
        self.default_location = location.to_string();
        self
    }

    /// Fix the map context to one environment type instead of detecting it.
    pub fn with_target_environment(mut self, target: Option<String>) -> Self {
        self.target_environment = target;
        self
    }

    /// The pure classification passes. Safe to run on many maps in parallel.
    pub fn classify(&self, text: &str) -> Result<ParsedMap, ExtractError> {
        guarded("classify", || {
            parser::parse_map(text, &self.gazetteer, self.target_environment.as_deref())
        })
    }

    /// Enrich the parsed businesses, then derive centers and segments.
    pub async fn complete(&self, parsed: ParsedMap) -> Result<Extraction, ExtractError> {
        let ParsedMap {
            admin,
            entities,
            context,
        } = parsed;
        let mut businesses = entities.businesses;

        let location = if admin.regency.trim().is_empty() {
            self.default_location.clone()
        } else {
            admin.regency.clone()
        };
        enrich_businesses(&self.gateway, &mut businesses, &location).await;

        let record = MapRecord {
            admin,
            businesses,
            streets: entities.streets,
            environments: entities.environments,
            landmarks: entities.landmarks,
            coordinates: entities.coordinates,
            buildings: entities.buildings,
            economic_centers: Vec::new(),
            segments: Vec::new(),
            context,
            processed_at: Utc::now(),
        };
        let extraction = guarded("derive", || derive(record))?;

        info!(
            map_id = %extraction.record.admin.map_id,
            businesses = extraction.record.businesses.len(),
            segments = extraction.record.segments.len(),
            valid = extraction.is_valid(),
            "extraction complete"
        );
        Ok(extraction)
    }

    pub async fn extract_text(&self, text: &str) -> Result<Extraction, ExtractError> {
        let parsed = self.classify(text)?;
        self.complete(parsed).await
    }

    pub async fn extract_image(
        &self,
        ocr: &OcrService,
        image: &[u8],
    ) -> Result<Extraction, ExtractError> {
        let text = ocr.read_text(image).await?;
        self.extract_text(&text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panics_become_errors() {
        let r: Result<(), _> = guarded("test", || panic!("boom"));
        match r {
            Err(ExtractError::Internal(msg)) => assert_eq!(msg, "test: boom"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn village_does_not_shape_centers() {
        let ex = Extractor::new(Gazetteer::default(), EnrichmentGateway::disabled());
        let text = "DESA/KELURAHAN : [005] DAUH PURI\nPasar Badung";
        let out = ex.extract_text(text).await.unwrap();
        assert_eq!(out.record.admin.village, "DAUH PURI");
        assert_eq!(out.record.economic_centers.len(), 1);
        assert_eq!(
            out.record.economic_centers[0].context,
            "Pusat ekonomi (pasar) yang berisi multiple UMKM"
        );
    }

    #[tokio::test]
    async fn market_environment_becomes_a_center() {
        let ex = Extractor::new(Gazetteer::default(), EnrichmentGateway::disabled());
        let out = ex.extract_text("LINGKUNGAN PASAR BARU [01]\nRumah Warga").await.unwrap();
        assert_eq!(out.record.businesses.len(), 1);
        assert_eq!(out.record.economic_centers.len(), 1);
        assert_eq!(out.record.economic_centers[0].kind, crate::record::CenterKind::Pasar);
    }

    #[tokio::test]
    async fn empty_text_still_yields_a_record() {
        let ex = Extractor::new(Gazetteer::default(), EnrichmentGateway::disabled());
        let out = ex.extract_text("").await.unwrap();
        assert!(!out.is_valid());
        assert_eq!(out.record.segments.len(), 1);
        assert_eq!(out.record.segments[0].name, segments::UNKNOWN_AREA);
    }
}
