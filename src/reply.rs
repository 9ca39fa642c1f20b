//! Parsing of model replies into typed records.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Result;

/// Parse a model reply strictly as JSON into `T`.
///
/// Only surrounding whitespace is ignored; markdown fences, prose and any
/// other wrapping make the reply invalid.
pub fn parse_record<T: DeserializeOwned>(reply: &str) -> Result<T> {
    let json_str = reply.trim();
    debug!("Parsing model reply ({} chars)", json_str.len());
    Ok(serde_json::from_str(json_str)?)
}
