//! Generative model abstraction.
//!
//! Pipelines only see the [`GenerativeModel`] trait; concrete providers
//! (Gemini, OpenRouter) are picked once at startup via [`from_config`].

pub mod gemini;
pub mod openrouter;

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::config::{ProviderKind, ServiceConfig};
use crate::error::Result;

pub use gemini::GeminiModel;
pub use openrouter::OpenRouterModel;

/// Non-text input sent alongside a prompt: base64 payload plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePart {
    pub data: String,
    pub mime_type: String,
}

impl InlinePart {
    /// Encode raw bytes into an inline part.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: BASE64.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Render as a `data:` URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Async trait implemented by each model provider.
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    fn name(&self) -> &str;

    /// Generate text from a prompt and optional inline parts.
    ///
    /// Returns [`Error::GenerativeModel`](crate::Error::GenerativeModel) when
    /// the provider answers without usable text.
    async fn generate_content(&self, prompt: &str, parts: &[InlinePart]) -> Result<String>;
}

/// Build the configured provider, reading its credential from the environment.
pub fn from_config(config: &ServiceConfig) -> Result<Arc<dyn GenerativeModel>> {
    let client = http_client(config.request_timeout_secs)?;

    let model: Arc<dyn GenerativeModel> = match config.provider {
        ProviderKind::Gemini => {
            let mut model = GeminiModel::from_env(client)?;
            if let Some(name) = &config.model {
                model = model.with_model(name.clone());
            }
            Arc::new(model)
        }
        ProviderKind::OpenRouter => {
            let mut model = OpenRouterModel::from_env(client)?;
            if let Some(name) = &config.model {
                model = model.with_model(name.clone());
            }
            Arc::new(model)
        }
    };

    Ok(model)
}

/// Shared `reqwest` client with the configured request timeout.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Treat a blank credential the same as a missing one.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_part_from_bytes() {
        let part = InlinePart::from_bytes(b"fake data", "image/jpeg");
        assert_eq!(part.data, "ZmFrZSBkYXRh");
        assert_eq!(part.mime_type, "image/jpeg");
        assert_eq!(part.data_url(), "data:image/jpeg;base64,ZmFrZSBkYXRh");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some("key".to_string())), Some("key".to_string()));
    }
}
