//! Parsing helpers for text-generation responses
//!
//! Models frequently wrap JSON in markdown code fences. These helpers remove
//! the fence and then parse the payload strictly.

use crate::error::{Error, Result};

/// Longest raw excerpt included in parse error messages
const RAW_EXCERPT_CHARS: usize = 200;

/// Remove a surrounding markdown code fence (with or without a `json` tag)
/// and trim whitespace. Text without a fence is only trimmed.
pub fn strip_code_fence(response: &str) -> &str {
    let mut text = response.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse a model response as a JSON array of strings.
///
/// Only a bare (optionally fenced) array of strings is accepted: objects,
/// arrays with non-string items, and surrounding prose are all errors.
pub fn parse_insight_list(response: &str) -> Result<Vec<String>> {
    let payload = strip_code_fence(response);

    serde_json::from_str::<Vec<String>>(payload).map_err(|e| {
        Error::RemoteGeneration(format!(
            "Invalid insight JSON from AI: {} | Raw: {}",
            e,
            excerpt(payload)
        ))
    })
}

fn excerpt(text: &str) -> String {
    if text.chars().count() > RAW_EXCERPT_CHARS {
        let truncated: String = text.chars().take(RAW_EXCERPT_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
