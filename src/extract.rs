use serde_json::Value;

use crate::error::{Result, WellnessError};

/// Pull the JSON object out of model output that may be wrapped in prose or code fences.
///
/// Takes everything from the first `{` to the last `}`. Not retried on failure: asking
/// again would not fix a content-shape problem.
pub fn extract_json(text: &str) -> Result<Value> {
    let candidate = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(WellnessError::MalformedResponse(
                "No valid JSON found in response".to_string(),
            ));
        }
    };

    serde_json::from_str(candidate).map_err(|e| {
        WellnessError::MalformedResponse(format!("Failed to parse JSON: {e}. Raw: {candidate}"))
    })
}
