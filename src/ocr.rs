//! Boundary to the external text recognizer. The engine is created lazily,
//! once, by an explicitly constructed service that callers share by
//! reference.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{info, warn};

pub const MIN_CONFIDENCE: f32 = 0.01;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine failed to initialize: {0}")]
    Init(String),
    #[error("recognition failed: {0}")]
    Recognition(String),
    #[error("no text could be recognized in the image")]
    NoText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub confidence: f32,
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<Fragment>, OcrError>;
}

/// Fragments above `min_confidence`, trimmed, joined with newlines.
pub fn accepted_text(fragments: &[Fragment], min_confidence: f32) -> Result<String, OcrError> {
    let accepted: Vec<&str> = fragments
        .iter()
        .filter(|f| f.confidence > min_confidence)
        .map(|f| f.text.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if accepted.is_empty() {
        return Err(OcrError::NoText);
    }
    Ok(accepted.join("\n"))
}

/// Input that is already text: every line becomes a fully confident fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextEngine;

#[async_trait]
impl OcrEngine for PlainTextEngine {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<Fragment>, OcrError> {
        let text = std::str::from_utf8(image).map_err(|e| OcrError::Recognition(e.to_string()))?;
        Ok(text
            .lines()
            .map(|l| Fragment {
                text: l.to_string(),
                confidence: 1.0,
            })
            .collect())
    }
}

/// Input is a JSON array of `{text, confidence}` written by an external
/// recognizer process.
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentDumpEngine;

#[async_trait]
impl OcrEngine for FragmentDumpEngine {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<Fragment>, OcrError> {
        serde_json::from_slice(image).map_err(|e| OcrError::Recognition(e.to_string()))
    }
}

type EngineFactory = Box<dyn Fn() -> Result<Box<dyn OcrEngine>, OcrError> + Send + Sync>;

pub struct OcrService {
    engine: OnceCell<Box<dyn OcrEngine>>,
    factory: EngineFactory,
    min_confidence: f32,
}

impl OcrService {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn OcrEngine>, OcrError> + Send + Sync + 'static,
    {
        Self {
            engine: OnceCell::new(),
            factory: Box::new(factory),
            min_confidence: MIN_CONFIDENCE,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.initialized()
    }

    /// Concurrent first callers wait on a single initialization.
    async fn engine(&self) -> Result<&dyn OcrEngine, OcrError> {
        let engine = self
            .engine
            .get_or_try_init(|| async {
                info!("Initializing OCR engine");
                (self.factory)()
            })
            .await?;
        Ok(engine.as_ref())
    }

    pub async fn read_text(&self, image: &[u8]) -> Result<String, OcrError> {
        let fragments = self.engine().await?.recognize(image).await?;
        let total = fragments.len();
        let text = accepted_text(&fragments, self.min_confidence).inspect_err(|_| {
            warn!("No text extracted from {} fragments", total);
        })?;
        info!(
            "Accepted {} of {} OCR fragments",
            text.lines().count(),
            total
        );
        Ok(text)
    }
}
