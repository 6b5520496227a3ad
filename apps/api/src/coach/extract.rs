use serde_json::Value;
use tracing::warn;

use crate::coach::GenerationError;

/// Max characters of raw model output preserved in logs for diagnosis.
const LOG_SNIPPET_LEN: usize = 200;

/// Recovers a JSON value from a raw model response that may wrap the payload
/// in prose or code fences.
///
/// Tries a direct parse of the full text first; on failure, parses the span
/// from the first `{` to the last `}`. Single recovery attempt, no bracket
/// balancing — a response with stray braces outside the payload is allowed to
/// fail extraction.
pub fn extract_json(raw: &str) -> Result<Value, GenerationError> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Ok(value);
    }

    let span = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => &raw[start..=end],
        _ => return Err(malformed(raw)),
    };

    serde_json::from_str(span).map_err(|_| malformed(raw))
}

fn malformed(raw: &str) -> GenerationError {
    let snippet: String = raw.chars().take(LOG_SNIPPET_LEN).collect();
    warn!("no JSON object recoverable from model response: {snippet:?}");
    GenerationError::Malformed
}
