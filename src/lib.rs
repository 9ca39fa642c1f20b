//! Structured data extraction from Cameroonian identity documents.
//!
//! Two pipelines share one shape: validate the image path, gather input for
//! a generative model (inline images for the CNI, OCR text for the
//! passport), prompt it, and parse its JSON reply into a typed record.
//!
//! ```no_run
//! # async fn run() -> aipasscni::Result<()> {
//! use aipasscni::model::GeminiModel;
//! use aipasscni::ocr::TesseractEngine;
//!
//! let model = GeminiModel::from_env(reqwest::Client::new())?;
//! let cni = aipasscni::extract_cni_data("cni_front.jpg", "cni_back.jpg", &model).await?;
//! let passport =
//!     aipasscni::extract_passport_data("passport.png", &TesseractEngine::default(), &model)
//!         .await?;
//! println!("{} / {}", cni.last_names, passport.nationality);
//! # Ok(())
//! # }
//! ```

pub mod cni;
pub mod config;
pub mod error;
pub mod mime;
pub mod model;
pub mod ocr;
pub mod passport;
pub mod prompts;
pub mod reply;
pub mod validation;

#[cfg(test)]
mod testing;

pub use cni::{extract_cni_data, CniData};
pub use error::{Error, Result};
pub use passport::{extract_passport_data, PassportData};
