//! OCR engine abstraction.
//!
//! Defines the [`OcrEngine`] trait so backends (Tesseract CLI, Mistral OCR)
//! can be swapped through configuration.

pub mod mistral;
pub mod tesseract;

use std::path::Path;
use std::sync::Arc;

use crate::config::{OcrBackendKind, ServiceConfig};
use crate::error::Result;

pub use mistral::MistralOcrEngine;
pub use tesseract::TesseractEngine;

/// Async trait implemented by each OCR backend.
#[async_trait::async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Recognize the text in an image. `language` is a Tesseract-style code
    /// such as `"fra"`; backends that detect language themselves ignore it.
    async fn recognize(&self, image: &Path, language: &str) -> Result<String>;
}

/// Build the configured OCR engine.
pub fn from_config(config: &ServiceConfig) -> Result<Arc<dyn OcrEngine>> {
    let engine: Arc<dyn OcrEngine> = match config.ocr {
        OcrBackendKind::Tesseract => Arc::new(TesseractEngine::new(&config.tesseract_bin)),
        OcrBackendKind::MistralOcr => {
            let client = crate::model::http_client(config.request_timeout_secs)?;
            Arc::new(MistralOcrEngine::from_env(client)?)
        }
    };
    Ok(engine)
}
