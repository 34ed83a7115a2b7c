//! Model Output Parsing
//! 
//! Models wrap JSON in prose or markdown fences often enough that a strict
//! `serde_json::from_str` on the raw reply is not usable.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

use crate::error::GenerationError;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("fence regex is valid"))
}

/// Find the JSON object in a reply and deserialize it.
///
/// Tries, in order: a fenced code block, then the span from the first `{`
/// to the last `}`.
pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Result<T, GenerationError> {
    let body = fence_regex()
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);

    let start = body.find('{');
    let end = body.rfind('}');
    let candidate = match (start, end) {
        (Some(s), Some(e)) if s < e => &body[s..=e],
        _ => return Err(GenerationError::Malformed("no JSON object in reply".to_string())),
    };

    serde_json::from_str(candidate).map_err(|e| GenerationError::Malformed(e.to_string()))
}
