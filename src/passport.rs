//! Passport extraction: OCR the data page, then let a text model structure it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::mime::detect_mime_type;
use crate::model::GenerativeModel;
use crate::ocr::OcrEngine;
use crate::prompts;
use crate::reply::parse_record;
use crate::validation;

/// OCR language for Cameroonian passports.
pub const OCR_LANGUAGE: &str = "fra";

/// Fields read from a Cameroonian passport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassportData {
    pub last_names: String,
    pub first_names: String,
    pub nationality: String,
    pub date_of_birth: String,
    pub gender: String,
    pub place_of_birth: String,
    pub issue_date: String,
    pub expiry_date: String,
    pub profession: String,
    pub height: String,
    /// Card access number printed on the data page.
    pub can: String,
    pub place_of_issue: String,
}

/// Extract passport data from an image of the data page.
///
/// The extension check runs before OCR; the model receives the OCR text
/// only, no image. Every error is returned to the caller as-is.
pub async fn extract_passport_data(
    image: impl AsRef<Path>,
    ocr: &dyn OcrEngine,
    model: &dyn GenerativeModel,
) -> Result<PassportData> {
    let image = image.as_ref();
    detect_mime_type(image)?;

    info!(
        "Starting passport extraction: image={}, ocr={}, model={}",
        image.display(),
        ocr.name(),
        model.name()
    );

    let text = ocr.recognize(image, OCR_LANGUAGE).await?;
    debug!("OCR produced {} chars", text.len());

    let prompt = prompts::passport_prompt(&text);
    debug!(
        "Passport prompt v{} ({} chars)",
        prompts::PROMPT_VERSION,
        prompt.len()
    );

    let reply = model.generate_content(&prompt, &[]).await?;
    debug!("Raw model reply length: {} chars", reply.len());

    let data: PassportData = parse_record(&reply)?;

    for violation in validation::check_passport(&data) {
        warn!("Passport reply breaks a prompt rule: {}", violation);
    }

    info!("Passport extraction complete");
    Ok(data)
}
