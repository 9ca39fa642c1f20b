//! Error taxonomy shared by both extraction pipelines.

/// Every way an extraction call can fail.
///
/// The first three variants are the named failure kinds of the extraction
/// contract. The rest carry failures from collaborators (filesystem, OCR,
/// provider transport, reply parsing) through to the caller untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The image path has an extension outside the MIME table.
    /// Carries the lowercased extension with its leading dot, or `""`.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// A provider was constructed without its credential.
    #[error("API_KEY is not defined")]
    ApiKeyNotDefined,

    /// The provider answered but produced no usable text.
    #[error("Failed to get a valid response from the generative model.")]
    GenerativeModel,

    #[error("OCR failed: {0}")]
    Ocr(String),

    /// Provider answered with a non-success HTTP status.
    #[error("Provider API error ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::UnsupportedFileType(".txt".to_string()).to_string(),
            "Unsupported file type: .txt"
        );
        assert_eq!(Error::ApiKeyNotDefined.to_string(), "API_KEY is not defined");
        assert_eq!(
            Error::Provider {
                status: 429,
                body: "quota".to_string()
            }
            .to_string(),
            "Provider API error (429): quota"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let err: Error = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::InvalidJson(_)));
    }
}
