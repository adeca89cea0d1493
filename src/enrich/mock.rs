use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use super::{EnrichmentError, EnrichmentSource, Query};
use crate::keywords::fold;
use crate::record::{Accuracy, CoordinatePair, Enrichment};

/// Never finds anything. Used when enrichment is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSource;

#[async_trait]
impl EnrichmentSource for DisabledSource {
    async fn lookup(&self, _query: &Query<'_>) -> Result<Option<Enrichment>, EnrichmentError> {
        Ok(None)
    }
}

/// In-memory answers keyed by business name (case and spacing ignored).
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: HashMap<String, Enrichment>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, enrichment: Enrichment) -> Self {
        self.entries.insert(fold(name), enrichment);
        self
    }

    /// JSON object of business name to enrichment record.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let entries: HashMap<String, Enrichment> = serde_json::from_str(&raw)?;
        Ok(Self {
            entries: entries.into_iter().map(|(k, v)| (fold(&k), v)).collect(),
        })
    }

    /// A validated central-Denpasar result with the given address.
    pub fn sample(address: &str) -> Enrichment {
        Enrichment {
            address: address.to_string(),
            phone: "0361-000000".to_string(),
            email: String::new(),
            website: String::new(),
            coordinates: Some(CoordinatePair {
                latitude: -8.6553,
                longitude: 115.2160,
            }),
            operating_hours: "08:00-17:00".to_string(),
            accuracy: Accuracy::High,
            validated: true,
            place_type: "shop".to_string(),
        }
    }
}

#[async_trait]
impl EnrichmentSource for StaticSource {
    async fn lookup(&self, query: &Query<'_>) -> Result<Option<Enrichment>, EnrichmentError> {
        Ok(self.entries.get(&fold(query.name)).cloned())
    }
}
