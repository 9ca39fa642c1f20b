//! OpenRouter provider (OpenAI-compatible chat completions).
//!
//! Text-only when called without parts; images are sent as `data:` URLs.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{non_blank, GenerativeModel, InlinePart};
use crate::error::{Error, Result};

pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "google/gemini-flash-1.5";

/// OpenRouter client for chat completions.
#[derive(Clone)]
pub struct OpenRouterModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenRouterModel {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Result<Self> {
        let api_key = non_blank(api_key).ok_or(Error::ApiKeyNotDefined)?;
        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            url: OPENROUTER_API_URL.to_string(),
        })
    }

    /// Create a new client, reading API key from OPENROUTER_API_KEY env var.
    pub fn from_env(client: reqwest::Client) -> Result<Self> {
        Self::new(client, std::env::var(API_KEY_ENV).ok())
    }

    /// Create a client with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at another OpenAI-compatible endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait::async_trait]
impl GenerativeModel for OpenRouterModel {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn generate_content(&self, prompt: &str, parts: &[InlinePart]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::user_with_parts(prompt, parts)],
            max_tokens: Some(4096),
            response_format: Some(ResponseFormat::JsonObject),
        };

        debug!("Sending request to OpenRouter: model={}", request.model);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let response: ChatCompletionResponse = response.json().await?;

        if let Some(usage) = &response.usage {
            info!(
                "OpenRouter response: {} tokens (prompt: {}, completion: {})",
                usage.total_tokens, usage.prompt_tokens, usage.completion_tokens
            );
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(Error::GenerativeModel)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseFormat {
    JsonObject,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

// ============================================================================
// Message types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
struct ImageUrl {
    url: String,
}

impl Message {
    /// User message; plain text when there are no parts.
    fn user_with_parts(text: &str, parts: &[InlinePart]) -> Self {
        if parts.is_empty() {
            return Self {
                role: "user",
                content: MessageContent::Text(text.to_string()),
            };
        }

        let mut content = vec![ContentPart::Text {
            text: text.to_string(),
        }];
        content.extend(parts.iter().map(|p| ContentPart::ImageUrl {
            image_url: ImageUrl { url: p.data_url() },
        }));

        Self {
            role: "user",
            content: MessageContent::Parts(content),
        }
    }
}
