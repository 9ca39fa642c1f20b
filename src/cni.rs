//! National identity card (CNI) extraction.
//!
//! Both faces of the card go to a vision-capable model as inline images; the
//! model reads them directly, no OCR pass is involved.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::mime::detect_mime_type;
use crate::model::{GenerativeModel, InlinePart};
use crate::prompts;
use crate::reply::parse_record;
use crate::validation;

/// Fields read from a Cameroonian national identity card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CniData {
    pub last_names: String,
    pub first_names: String,
    pub date_of_birth: String,
    pub place_of_birth: String,
    pub gender: String,
    pub height: String,
    pub profession: String,
    pub mother_name: String,
    pub father_name: String,
    pub address: String,
    pub issue_date: String,
    pub expiry_date: String,
    pub id_post: String,
    pub cni_unique_id: String,
    pub cni_number: String,
}

/// Extract CNI data from the front and back images of a card.
///
/// Both paths are checked before anything is read; an unsupported extension
/// on either fails the call without contacting the model. Every error is
/// returned to the caller as-is.
pub async fn extract_cni_data(
    front_image: impl AsRef<Path>,
    back_image: impl AsRef<Path>,
    model: &dyn GenerativeModel,
) -> Result<CniData> {
    let front_image = front_image.as_ref();
    let back_image = back_image.as_ref();

    let front_mime = detect_mime_type(front_image)?;
    let back_mime = detect_mime_type(back_image)?;

    info!(
        "Starting CNI extraction: front={}, back={}, model={}",
        front_image.display(),
        back_image.display(),
        model.name()
    );

    let parts = [
        load_part(front_image, front_mime).await?,
        load_part(back_image, back_mime).await?,
    ];

    let prompt = prompts::cni_prompt();
    debug!(
        "CNI prompt v{} ({} chars)",
        prompts::PROMPT_VERSION,
        prompt.len()
    );

    let reply = model.generate_content(&prompt, &parts).await?;
    debug!("Raw model reply length: {} chars", reply.len());

    let data: CniData = parse_record(&reply)?;

    for violation in validation::check_cni(&data) {
        warn!("CNI reply breaks a prompt rule: {}", violation);
    }

    info!("CNI extraction complete");
    Ok(data)
}

async fn load_part(path: &Path, mime_type: &str) -> Result<InlinePart> {
    let bytes = tokio::fs::read(path).await?;
    debug!("Loaded {} ({} bytes, {})", path.display(), bytes.len(), mime_type);
    Ok(InlinePart::from_bytes(&bytes, mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::{image_fixture, StubModel};

    const REPLY: &str = r#"{
        "lastNames": "Doe",
        "firstNames": "John",
        "dateOfBirth": "1990-01-01",
        "placeOfBirth": "City",
        "gender": "M",
        "height": "180cm",
        "profession": "Engineer",
        "motherName": "Jane Doe",
        "fatherName": "John Doe Sr.",
        "address": "123 Street Name",
        "issueDate": "2020-01-01",
        "expiryDate": "2030-01-01",
        "idPost": "Post123",
        "cniUniqueId": "Unique123",
        "cniNumber": "123456789"
    }"#;

    fn expected() -> CniData {
        CniData {
            last_names: "Doe".to_string(),
            first_names: "John".to_string(),
            date_of_birth: "1990-01-01".to_string(),
            place_of_birth: "City".to_string(),
            gender: "M".to_string(),
            height: "180cm".to_string(),
            profession: "Engineer".to_string(),
            mother_name: "Jane Doe".to_string(),
            father_name: "John Doe Sr.".to_string(),
            address: "123 Street Name".to_string(),
            issue_date: "2020-01-01".to_string(),
            expiry_date: "2030-01-01".to_string(),
            id_post: "Post123".to_string(),
            cni_unique_id: "Unique123".to_string(),
            cni_number: "123456789".to_string(),
        }
    }

    #[tokio::test]
    async fn test_extract_returns_parsed_reply() {
        let dir = tempfile::tempdir().unwrap();
        let front = image_fixture(&dir, "cni11.jpg", b"fake data");
        let back = image_fixture(&dir, "cni12.PNG", b"back data");
        let model = StubModel::replying(REPLY);

        let data = extract_cni_data(&front, &back, &model).await.unwrap();
        assert_eq!(data, expected());

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].parts,
            vec![
                InlinePart::from_bytes(b"fake data", "image/jpeg"),
                InlinePart::from_bytes(b"back data", "image/png"),
            ]
        );
        assert!(calls[0].prompt.contains("cniNumber"));
    }

    #[tokio::test]
    async fn test_extract_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let front = image_fixture(&dir, "front.jpg", b"front");
        let back = image_fixture(&dir, "back.jpg", b"back");
        let model = StubModel::replying(REPLY);

        let first = extract_cni_data(&front, &back, &model).await.unwrap();
        let second = extract_cni_data(&front, &back, &model).await.unwrap();
        assert_eq!(first, second);

        let calls = model.calls();
        assert_eq!(calls[0], calls[1]);
    }

    #[tokio::test]
    async fn test_unsupported_front_skips_model() {
        let model = StubModel::replying(REPLY);
        let err = extract_cni_data("./images/unsupportedFile.txt", "./images/cni12.jpg", &model)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(ext) if ext == ".txt"));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_back_skips_model() {
        let dir = tempfile::tempdir().unwrap();
        let front = image_fixture(&dir, "front.jpg", b"front");
        let model = StubModel::replying(REPLY);

        let err = extract_cni_data(&front, dir.path().join("back.bmp"), &model)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(ext) if ext == ".bmp"));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let model = StubModel::replying(REPLY);

        let err = extract_cni_data(dir.path().join("a.jpg"), dir.path().join("b.jpg"), &model)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let front = image_fixture(&dir, "front.jpg", b"front");
        let back = image_fixture(&dir, "back.jpg", b"back");

        let model = StubModel::failing(|| Error::GenerativeModel);
        let err = extract_cni_data(&front, &back, &model).await.unwrap_err();
        assert!(matches!(err, Error::GenerativeModel));

        let model = StubModel::failing(|| Error::ApiKeyNotDefined);
        let err = extract_cni_data(&front, &back, &model).await.unwrap_err();
        assert!(matches!(err, Error::ApiKeyNotDefined));

        let model = StubModel::failing(|| Error::Provider {
            status: 500,
            body: "Something went wrong".to_string(),
        });
        let err = extract_cni_data(&front, &back, &model).await.unwrap_err();
        assert!(matches!(err, Error::Provider { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_non_json_reply_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let front = image_fixture(&dir, "front.jpg", b"front");
        let back = image_fixture(&dir, "back.jpg", b"back");
        let model = StubModel::replying("Réponse du modèle GPT");

        let err = extract_cni_data(&front, &back, &model).await.unwrap_err();
        assert!(matches!(err, Error::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_rule_violations_do_not_alter_record() {
        let dir = tempfile::tempdir().unwrap();
        let front = image_fixture(&dir, "front.jpg", b"front");
        let back = image_fixture(&dir, "back.jpg", b"back");
        let model = StubModel::replying(
            r#"{"gender": "Masculin", "issueDate": "2020-01-01", "expiryDate": "2025-01-01"}"#,
        );

        let data = extract_cni_data(&front, &back, &model).await.unwrap();
        assert_eq!(data.gender, "Masculin");
        assert_eq!(data.expiry_date, "2025-01-01");
        assert_eq!(data.last_names, "");
    }
}
