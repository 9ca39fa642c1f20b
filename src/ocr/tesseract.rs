//! Tesseract OCR backend (command-line).

use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::process::Command;
use tracing::debug;

use super::OcrEngine;
use crate::error::{Error, Result};

/// Runs `tesseract <image> stdout -l <lang>` and returns stdout.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait::async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &Path, language: &str) -> Result<String> {
        let start = Instant::now();

        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .args(["-l", language])
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::Ocr(format!(
                    "{} not found (install tesseract-ocr)",
                    self.binary.display()
                )));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!("tesseract failed: {}", stderr.trim())));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        debug!(
            "Tesseract recognized {} chars from {} in {}ms",
            text.len(),
            image.display(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}
