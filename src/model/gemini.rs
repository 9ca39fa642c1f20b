//! Google Gemini provider (vision-capable, JSON response mode).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{non_blank, GenerativeModel, InlinePart};
use crate::error::{Error, Result};

pub const API_KEY_ENV: &str = "AIPASSCNI_API_KEY";
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiModel")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiModel {
    /// Create a client. Fails with [`Error::ApiKeyNotDefined`] when the key
    /// is missing or blank.
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Result<Self> {
        let api_key = non_blank(api_key).ok_or(Error::ApiKeyNotDefined)?;
        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_URL.to_string(),
        })
    }

    /// Create a client, reading the key from `AIPASSCNI_API_KEY`.
    pub fn from_env(client: reqwest::Client) -> Result<Self> {
        Self::new(client, std::env::var(API_KEY_ENV).ok())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait::async_trait]
impl GenerativeModel for GeminiModel {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_content(&self, prompt: &str, parts: &[InlinePart]) -> Result<String> {
        let request = build_request(prompt, parts);
        debug!(
            "Sending request to Gemini: model={}, parts={}",
            self.model,
            parts.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
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

        let response: GenerateContentResponse = response.json().await?;
        if let Some(usage) = &response.usage_metadata {
            info!(
                "Gemini response: {} tokens (prompt: {}, completion: {})",
                usage.total_token_count, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        response_text(response).ok_or(Error::GenerativeModel)
    }
}

fn build_request(prompt: &str, parts: &[InlinePart]) -> GenerateContentRequest {
    let mut request_parts = vec![Part::Text {
        text: prompt.to_string(),
    }];
    request_parts.extend(parts.iter().map(|p| Part::InlineData {
        inline_data: InlineData {
            mime_type: p.mime_type.clone(),
            data: p.data.clone(),
        },
    }));

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: request_parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
        },
    }
}

/// Concatenated text of the first candidate, `None` if there is none.
fn response_text(response: GenerateContentResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}
