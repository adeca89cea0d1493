use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::enrich::nominatim::{self, NominatimSource};
use crate::enrich::mock::StaticSource;
use crate::enrich::{EnrichmentGateway, GatewayPolicy};
use crate::gazetteer::{Gazetteer, GazetteerError};
use crate::ocr::MIN_CONFIDENCE;
use crate::pipeline::DEFAULT_LOCATION;

/// Runtime settings: defaults, then an optional `wss.toml`, then `WSS_*`
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub db_path: PathBuf,
    pub gazetteer_path: Option<PathBuf>,
    pub default_location: String,
    pub enrichment_enabled: bool,
    /// JSON answers file served instead of Nominatim.
    pub enrichment_fixture: Option<PathBuf>,
    pub nominatim_url: String,
    pub user_agent: String,
    pub enrichment_timeout_secs: u64,
    pub enrichment_retries: u32,
    pub enrichment_backoff_ms: u64,
    pub min_confidence: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/wss.sqlite"),
            gazetteer_path: None,
            default_location: DEFAULT_LOCATION.to_string(),
            enrichment_enabled: true,
            enrichment_fixture: None,
            nominatim_url: nominatim::DEFAULT_URL.to_string(),
            user_agent: nominatim::DEFAULT_USER_AGENT.to_string(),
            enrichment_timeout_secs: 15,
            enrichment_retries: 0,
            enrichment_backoff_ms: 2000,
            min_confidence: MIN_CONFIDENCE,
        }
    }
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from("wss")
    }

    fn load_from(file: &str) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("WSS").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn policy(&self) -> GatewayPolicy {
        GatewayPolicy {
            timeout: Duration::from_secs(self.enrichment_timeout_secs),
            retries: self.enrichment_retries,
            base_backoff: Duration::from_millis(self.enrichment_backoff_ms),
        }
    }

    pub fn gateway(&self) -> anyhow::Result<EnrichmentGateway> {
        if !self.enrichment_enabled {
            return Ok(EnrichmentGateway::disabled());
        }
        if let Some(path) = &self.enrichment_fixture {
            let source = StaticSource::from_json_file(path)?;
            return Ok(EnrichmentGateway::new(Arc::new(source), self.policy()));
        }
        let source = NominatimSource::new(&self.nominatim_url, &self.user_agent)?;
        Ok(EnrichmentGateway::new(Arc::new(source), self.policy()))
    }

    /// The built-in tables unless a JSON gazetteer file is configured.
    pub fn gazetteer(&self) -> Result<Gazetteer, GazetteerError> {
        match &self.gazetteer_path {
            Some(path) => Gazetteer::from_json_file(path),
            None => Ok(Gazetteer::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let s = Settings::load_from("tests/fixtures/no_such_settings").unwrap();
        assert_eq!(s.enrichment_retries, 0);
        assert_eq!(s.enrichment_timeout_secs, 15);
        assert_eq!(s.default_location, "Indonesia");
    }

    #[test]
    fn policy_from_settings() {
        let s = Settings {
            enrichment_retries: 3,
            enrichment_backoff_ms: 10,
            ..Settings::default()
        };
        let p = s.policy();
        assert_eq!(p.retries, 3);
        assert_eq!(p.base_backoff, Duration::from_millis(10));
    }

    #[tokio::test]
    async fn fixture_answers_replace_nominatim() {
        let s = Settings {
            enrichment_fixture: Some(PathBuf::from("tests/fixtures/enrichment.json")),
            ..Settings::default()
        };
        let gateway = s.gateway().unwrap();
        let query = crate::enrich::Query {
            name: "pasar badung",
            category: crate::record::BusinessCategory::Pasar,
            location: "DENPASAR",
        };
        let found = gateway.lookup(&query).await.unwrap();
        assert_eq!(found.address, "Jl. Gajah Mada, Denpasar");
    }

    #[test]
    fn missing_fixture_is_an_error() {
        let s = Settings {
            enrichment_fixture: Some(PathBuf::from("tests/fixtures/absent.json")),
            ..Settings::default()
        };
        assert!(s.gateway().is_err());
    }
}
