//! Error types for the prompt bridge.

use std::time::Duration;
use thiserror::Error;

/// Failures of a single interactive prompt.
///
/// Every variant is an ordinary recoverable value. Dispatcher-side variants
/// (`CallbackNotRegistered`, `Cancelled`, `Timeout`) reach the code that asked
/// the question; host-side variants (`RequestNotFound`, `DeliveryFailed`) are
/// reported back to whoever tried to resolve the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("prompt callback not registered - interactive mode requires a host integration")]
    CallbackNotRegistered,

    #[error("no pending prompt found for ID: {0}")]
    RequestNotFound(String),

    #[error("failed to deliver resolution for prompt {0}: already resolved")]
    DeliveryFailed(String),

    #[error("prompt {id} cancelled: {reason}")]
    Cancelled { id: String, reason: String },

    #[error("prompt {id} timed out: no response received within {after:?}")]
    Timeout { id: String, after: Duration },
}

impl PromptError {
    /// True for the variants that end a blocked prompt call.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PromptError::CallbackNotRegistered
                | PromptError::Cancelled { .. }
                | PromptError::Timeout { .. }
        )
    }
}

/// Errors surfaced by the crate outside the prompt core.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid choice: {0}")]
    InvalidChoice(String),

    #[error("Tag update cancelled by user")]
    TagUpdateCancelled,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for BridgeError {
    fn from(err: config::ConfigError) -> Self {
        BridgeError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::TransportError(err.to_string())
    }
}
