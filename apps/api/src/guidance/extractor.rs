//! Response extraction. Pulls a JSON payload out of free-text model output.
//!
//! Location is greedy (first `{` to last `}`), parsing is strict. Anything the
//! strict parser rejects is an `ExtractionFailure`; there is no tolerant
//! recovery, so identical model output always extracts identically.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionFailure {
    #[error("no JSON object found in model output")]
    NoPayload,

    #[error("model output is not valid for the expected schema: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("model output violates schema bounds: {0}")]
    Nonconforming(String),
}

/// Extracts and strictly parses the JSON object embedded in `raw`.
pub fn extract<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractionFailure> {
    let candidate = locate_payload(strip_json_fences(raw)).ok_or(ExtractionFailure::NoPayload)?;
    Ok(serde_json::from_str(candidate)?)
}

/// Greedy candidate: first opening brace through last closing brace.
fn locate_payload(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}
