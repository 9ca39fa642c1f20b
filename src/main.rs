//! aipasscni - HTTP front for CNI and passport extraction.

use std::path::PathBuf;
use std::sync::Arc;

use aipasscni::config::ServiceConfig;
use aipasscni::model::GenerativeModel;
use aipasscni::ocr::OcrEngine;
use aipasscni::{CniData, Error, PassportData};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tempfile::TempDir;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    model: Arc<dyn GenerativeModel>,
    ocr: Arc<dyn OcrEngine>,
}

type ApiError = (StatusCode, String);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aipasscni=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::load()?;

    // Credentials are checked here, once, not per request
    let model = aipasscni::model::from_config(&config)?;
    let ocr = aipasscni::ocr::from_config(&config)?;
    info!(
        "Using model provider {} and OCR engine {}",
        model.name(),
        ocr.name()
    );

    let state = AppState { model, ocr };

    let app = Router::new()
        .route("/health", get(health))
        .route("/extract/cni", post(extract_cni))
        .route("/extract/passport", post(extract_passport))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr.as_str()).await?;
    info!("Server listening on http://{}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> &'static str {
    "ok"
}

/// Multipart fields `front` and `back`.
async fn extract_cni(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CniData>, ApiError> {
    let request_id = Uuid::new_v4();
    async move {
        let mut uploads = Uploads::receive(multipart, &["front", "back"]).await?;
        let front = uploads.take("front")?;
        let back = uploads.take("back")?;

        aipasscni::extract_cni_data(&front, &back, state.model.as_ref())
            .await
            .map(Json)
            .map_err(into_api_error)
    }
    .instrument(info_span!("cni", %request_id))
    .await
}

/// Multipart field `file`.
async fn extract_passport(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PassportData>, ApiError> {
    let request_id = Uuid::new_v4();
    async move {
        let mut uploads = Uploads::receive(multipart, &["file"]).await?;
        let image = uploads.take("file")?;

        aipasscni::extract_passport_data(&image, state.ocr.as_ref(), state.model.as_ref())
            .await
            .map(Json)
            .map_err(into_api_error)
    }
    .instrument(info_span!("passport", %request_id))
    .await
}

// ============================================================================
// Helpers
// ============================================================================

/// Uploaded files staged on disk for the duration of one request.
struct Uploads {
    // Removed, with everything in it, on drop
    _dir: TempDir,
    files: Vec<(String, PathBuf)>,
}

impl Uploads {
    /// Save the wanted multipart fields, keeping each client file name's
    /// extension so the file type check sees it.
    async fn receive(mut multipart: Multipart, wanted: &[&str]) -> Result<Self, ApiError> {
        let dir = TempDir::new().map_err(internal)?;
        let mut files = Vec::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if !wanted.contains(&name.as_str()) {
                continue;
            }
            if files.iter().any(|(n, _)| *n == name) {
                return Err((StatusCode::BAD_REQUEST, format!("Duplicate file field: {}", name)));
            }

            let extension = field
                .file_name()
                .and_then(|f| std::path::Path::new(f).extension())
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            let data = field.bytes().await.map_err(|e| {
                (StatusCode::BAD_REQUEST, format!("Failed to read file: {}", e))
            })?;

            let path = dir.path().join(format!("{}{}", name, extension));
            tokio::fs::write(&path, &data).await.map_err(internal)?;
            info!("Received {} ({} bytes)", name, data.len());
            files.push((name, path));
        }

        Ok(Self { _dir: dir, files })
    }

    fn take(&mut self, name: &str) -> Result<PathBuf, ApiError> {
        let index = self
            .files
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("Missing file field: {}", name)))?;
        Ok(self.files.remove(index).1)
    }
}

fn into_api_error(e: Error) -> ApiError {
    let status = match &e {
        Error::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        Error::GenerativeModel
        | Error::Provider { .. }
        | Error::Http(_)
        | Error::InvalidJson(_) => StatusCode::BAD_GATEWAY,
        Error::ApiKeyNotDefined | Error::Ocr(_) | Error::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error!("Extraction failed: {}", e);
    (status, e.to_string())
}

fn internal(e: std::io::Error) -> ApiError {
    error!("Upload staging failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
