//! CLI output: error mapping and result formatting.

use crate::error::BridgeError;
use crate::interact::Tags;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &BridgeError) -> String {
    match e {
        BridgeError::Prompt(prompt) => format!("Error: {}", prompt),
        other => format!("Error: {}", other),
    }
}

pub fn format_tags(tags: &Tags) -> String {
    if tags.is_empty() {
        return "No tags".to_string();
    }
    tags.iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}
