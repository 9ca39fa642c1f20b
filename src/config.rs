//! Service configuration.
//!
//! Settings come from an optional JSON file (`AIPASSCNI_CONFIG`, default
//! `aipasscni.json`) with environment overrides on top. Credentials are never
//! read here; providers take them at construction.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const CONFIG_PATH_ENV: &str = "AIPASSCNI_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "aipasscni.json";

/// Which generative model provider backs the pipelines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Gemini,
    #[serde(rename = "openrouter")]
    OpenRouter,
}

impl ProviderKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "gemini" => Some(Self::Gemini),
            "openrouter" => Some(Self::OpenRouter),
            _ => None,
        }
    }
}

/// Which OCR backend the passport pipeline uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackendKind {
    #[default]
    Tesseract,
    MistralOcr,
}

impl OcrBackendKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tesseract" => Some(Self::Tesseract),
            "mistral_ocr" => Some(Self::MistralOcr),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub provider: ProviderKind,
    /// Overrides the provider's default model name.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub ocr: OcrBackendKind,
    #[serde(default = "default_tesseract_bin")]
    pub tesseract_bin: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_tesseract_bin() -> String {
    "tesseract".to_string()
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            provider: ProviderKind::default(),
            model: None,
            ocr: OcrBackendKind::default(),
            tesseract_bin: default_tesseract_bin(),
            max_upload_bytes: default_max_upload_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    /// Load from the file named by `AIPASSCNI_CONFIG`, then apply env overrides.
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from_file(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a JSON config file. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: ServiceConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply `AIPASSCNI_*` overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(addr) = lookup("AIPASSCNI_LISTEN") {
            self.listen_addr = addr;
        }
        if let Some(provider) = lookup("AIPASSCNI_PROVIDER") {
            self.provider = ProviderKind::from_str(&provider)
                .with_context(|| format!("Unknown provider: {}", provider))?;
        }
        if let Some(model) = lookup("AIPASSCNI_MODEL") {
            self.model = Some(model);
        }
        if let Some(ocr) = lookup("AIPASSCNI_OCR") {
            self.ocr = OcrBackendKind::from_str(&ocr)
                .with_context(|| format!("Unknown OCR backend: {}", ocr))?;
        }
        Ok(())
    }
}
