//! Recording stand-ins for the model and OCR collaborators.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::model::{GenerativeModel, InlinePart};
use crate::ocr::OcrEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub prompt: String,
    pub parts: Vec<InlinePart>,
}

/// Model that answers every prompt the same way and records what it saw.
pub struct StubModel {
    reply: Box<dyn Fn() -> Result<String> + Send + Sync>,
    calls: Mutex<Vec<Call>>,
}

impl StubModel {
    pub fn replying(reply: &str) -> Self {
        let reply = reply.to_string();
        Self {
            reply: Box::new(move || -> Result<String> { Ok(reply.clone()) }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: impl Fn() -> Error + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(move || -> Result<String> { Err(error()) }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GenerativeModel for StubModel {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate_content(&self, prompt: &str, parts: &[InlinePart]) -> Result<String> {
        self.calls.lock().unwrap().push(Call {
            prompt: prompt.to_string(),
            parts: parts.to_vec(),
        });
        (self.reply)()
    }
}

/// OCR engine returning fixed text (or a fixed failure).
pub struct StubOcr {
    text: std::result::Result<String, String>,
    calls: Mutex<Vec<(PathBuf, String)>>,
}

impl StubOcr {
    pub fn returning(text: &str) -> Self {
        Self {
            text: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            text: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl OcrEngine for StubOcr {
    fn name(&self) -> &str {
        "stub"
    }

    async fn recognize(&self, image: &Path, language: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((image.to_path_buf(), language.to_string()));
        self.text.clone().map_err(Error::Ocr)
    }
}

/// Write `bytes` to `dir/name` and return the path.
pub fn image_fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Answer every request with `status` and a JSON `body` from a local port.
/// Returns the base URL.
pub async fn serve_fixed(status: u16, body: &str) -> String {
    use axum::http::{header, StatusCode};

    let status = StatusCode::from_u16(status).unwrap();
    let body = body.to_string();
    let app = axum::Router::new().fallback(move || async move {
        (status, [(header::CONTENT_TYPE, "application/json")], body)
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Client that ignores proxy settings, for talking to [`serve_fixed`].
pub fn local_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
