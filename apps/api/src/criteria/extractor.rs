//! Pulls the JSON array out of a free-form model answer.
//!
//! The span runs from the first `[` to the last `]`, inclusive, so prose before
//! or after the array is tolerated. Known limitation: an answer holding two
//! separate arrays, or stray brackets in its commentary, produces a span that is
//! not valid JSON and is reported as `ParseError::InvalidJson`.

use serde_json::Value;
use tracing::debug;

use crate::errors::ParseError;

/// Returns the elements of the first-`[`-to-last-`]` array in `text`.
///
/// Failure modes:
/// - no `[` anywhere → `MissingOpenBracket`
/// - no `]` after the first `[` → `MissingCloseBracket`
/// - the span is not valid JSON → `InvalidJson`
/// - the span parses to something other than an array → `NotAnArray`
pub fn extract_json_array(text: &str) -> Result<Vec<Value>, ParseError> {
    let start = text.find('[').ok_or(ParseError::MissingOpenBracket)?;
    let end = text
        .rfind(']')
        .filter(|&end| end > start)
        .ok_or(ParseError::MissingCloseBracket)?;

    let candidate = &text[start..=end];
    debug!(start, end, len = candidate.len(), "Extracted JSON array span");

    match serde_json::from_str::<Value>(candidate)? {
        Value::Array(items) => Ok(items),
        _ => Err(ParseError::NotAnArray),
    }
}
