//! Mistral OCR backend (uses Mistral's OCR API).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::OcrEngine;
use crate::error::{Error, Result};
use crate::mime::detect_mime_type;
use crate::model::{non_blank, InlinePart};

pub const API_KEY_ENV: &str = "MISTRAL_API_KEY";
const MISTRAL_OCR_URL: &str = "https://api.mistral.ai/v1/ocr";
const OCR_MODEL: &str = "mistral-ocr-latest";

pub struct MistralOcrEngine {
    api_key: String,
    client: reqwest::Client,
}

impl MistralOcrEngine {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Result<Self> {
        let api_key = non_blank(api_key).ok_or(Error::ApiKeyNotDefined)?;
        Ok(Self { api_key, client })
    }

    pub fn from_env(client: reqwest::Client) -> Result<Self> {
        Self::new(client, std::env::var(API_KEY_ENV).ok())
    }
}

// ── Mistral API request/response types ──────────────────────────────────────

#[derive(Serialize)]
struct OcrRequest {
    model: String,
    document: DocumentSource,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum DocumentSource {
    ImageUrl { image_url: String },
}

#[derive(Deserialize)]
struct OcrResponse {
    pages: Vec<MistralPage>,
}

#[derive(Deserialize)]
struct MistralPage {
    markdown: String,
}

// ── Engine implementation ───────────────────────────────────────────────────

#[async_trait::async_trait]
impl OcrEngine for MistralOcrEngine {
    fn name(&self) -> &str {
        "mistral_ocr"
    }

    /// Mistral detects the language itself; `language` is not sent.
    async fn recognize(&self, image: &Path, _language: &str) -> Result<String> {
        let mime_type = detect_mime_type(image)?;
        let bytes = tokio::fs::read(image).await?;
        let body = build_request(&InlinePart::from_bytes(&bytes, mime_type));

        info!(
            "MistralOcrEngine: calling OCR API for {} ({} bytes)",
            image.display(),
            bytes.len()
        );

        let resp = self
            .client
            .post(MISTRAL_OCR_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Provider {
                status: status.as_u16(),
                body: text,
            });
        }

        let raw_text = resp.text().await?;
        debug!("MistralOcrEngine: raw response ({} bytes)", raw_text.len());
        let ocr: OcrResponse = serde_json::from_str(&raw_text)?;

        Ok(join_pages(ocr))
    }
}

fn build_request(part: &InlinePart) -> OcrRequest {
    OcrRequest {
        model: OCR_MODEL.to_string(),
        document: DocumentSource::ImageUrl {
            image_url: part.data_url(),
        },
    }
}

fn join_pages(ocr: OcrResponse) -> String {
    ocr.pages
        .into_iter()
        .map(|p| p.markdown)
        .collect::<Vec<_>>()
        .join("\n\n")
}
