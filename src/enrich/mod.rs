//! Business enrichment behind a port. Sources may fail in any way; the
//! gateway turns every failure into "no enrichment".

pub mod mock;
pub mod nominatim;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::record::{BusinessCategory, BusinessEntity, Enrichment};

pub use mock::{DisabledSource, StaticSource};
pub use nominatim::NominatimSource;

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("lookup service returned status {0}")]
    Status(u16),
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed lookup response: {0}")]
    Decode(String),
}

impl EnrichmentError {
    /// Worth another attempt: rate limiting, server errors, timeouts.
    pub fn is_transient(&self) -> bool {
        match self {
            EnrichmentError::Status(code) => *code == 429 || *code >= 500,
            EnrichmentError::Timeout(_) => true,
            EnrichmentError::Http(e) => e.is_timeout() || e.is_connect(),
            EnrichmentError::Decode(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    pub name: &'a str,
    pub category: BusinessCategory,
    pub location: &'a str,
}

#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    async fn lookup(&self, query: &Query<'_>) -> Result<Option<Enrichment>, EnrichmentError>;
}

#[derive(Debug, Clone, Copy)]
pub struct GatewayPolicy {
    pub timeout: Duration,
    /// Extra attempts after a transient failure. Zero means a single call.
    pub retries: u32,
    pub base_backoff: Duration,
}

/// Longest single wait between attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(300);

impl GatewayPolicy {
    /// `base_backoff * 2^attempt`, capped at `MAX_BACKOFF`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.base_backoff.checked_mul(factor))
            .map_or(MAX_BACKOFF, |d| d.min(MAX_BACKOFF))
    }
}

impl Default for GatewayPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            retries: 0,
            base_backoff: Duration::from_millis(2000),
        }
    }
}

/// Wraps a source with a per-call timeout and bounded retry. `lookup`
/// never fails.
#[derive(Clone)]
pub struct EnrichmentGateway {
    source: Arc<dyn EnrichmentSource>,
    policy: GatewayPolicy,
}

impl EnrichmentGateway {
    pub fn new(source: Arc<dyn EnrichmentSource>, policy: GatewayPolicy) -> Self {
        Self { source, policy }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledSource), GatewayPolicy::default())
    }

    async fn attempt(&self, query: &Query<'_>) -> Result<Option<Enrichment>, EnrichmentError> {
        match tokio::time::timeout(self.policy.timeout, self.source.lookup(query)).await {
            Ok(result) => result,
            Err(_) => Err(EnrichmentError::Timeout(self.policy.timeout)),
        }
    }

    pub async fn lookup(&self, query: &Query<'_>) -> Option<Enrichment> {
        let max = self.policy.retries;
        for attempt in 0..=max {
            match self.attempt(query).await {
                Ok(found) => return found,
                Err(e) if e.is_transient() && attempt < max => {
                    let backoff = self.policy.backoff(attempt);
                    warn!(
                        "Lookup for {} failed (attempt {}/{}): {}, backing off {:.1}s",
                        query.name,
                        attempt + 1,
                        max + 1,
                        e,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    warn!(business = %query.name, error = %e, "enrichment unavailable");
                    return None;
                }
            }
        }
        None
    }
}

/// Looks up each distinct business once, in order, and attaches the result.
pub async fn enrich_businesses(
    gateway: &EnrichmentGateway,
    businesses: &mut [BusinessEntity],
    location: &str,
) -> usize {
    let mut enriched = 0;
    for b in businesses.iter_mut() {
        let query = Query {
            name: &b.name,
            category: b.category,
            location,
        };
        b.enrichment = gateway.lookup(&query).await;
        if b.enrichment.is_some() {
            enriched += 1;
            debug!(business = %b.name, "enriched");
        }
    }
    info!("Enriched {}/{} businesses", enriched, businesses.len());
    enriched
}
