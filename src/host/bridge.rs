//! Host-facing entry points with loosely-typed arguments.
//!
//! Embedding hosts hand over whatever values their runtime produced. These
//! functions validate them, never panic on bad input, and answer with the
//! `{success: true}` / `{error: ...}` shape the host expects.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::PromptError;
use crate::prompt::{FnTransport, PromptBroker, PromptDescriptor};

/// Callable supplied by the host; receives `{id, message, type, resourceType}`.
pub type HostCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// A value as the host runtime passes it.
#[derive(Clone)]
pub enum HostValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Function(HostCallback),
}

impl HostValue {
    pub fn string(value: impl Into<String>) -> Self {
        HostValue::String(value.into())
    }

    pub fn function<F>(callback: F) -> Self
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        HostValue::Function(Arc::new(callback))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Undefined => "undefined",
            HostValue::Null => "null",
            HostValue::Bool(_) => "boolean",
            HostValue::Number(_) => "number",
            HostValue::String(_) => "string",
            HostValue::Function(_) => "function",
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::String(s) => write!(f, "String({:?})", s),
            HostValue::Number(n) => write!(f, "Number({})", n),
            HostValue::Bool(b) => write!(f, "Bool({})", b),
            other => f.write_str(other.type_name()),
        }
    }
}

/// Result handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostResult {
    Success { success: bool },
    Error { error: String },
}

pub const INVALID_ARGUMENTS: &str = "Invalid arguments";
pub const PROMPT_NOT_FOUND: &str = "Prompt not found";
pub const SEND_FAILED: &str = "Failed to send response";
pub const CANCEL_FAILED: &str = "Failed to cancel prompt";

impl HostResult {
    pub fn ok() -> Self {
        HostResult::Success { success: true }
    }

    pub fn error(message: impl Into<String>) -> Self {
        HostResult::Error {
            error: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, HostResult::Success { success: true })
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// The four functions a host can call into.
pub struct HostBridge {
    broker: Arc<PromptBroker>,
}

impl HostBridge {
    pub const EXPORTED_FUNCTIONS: [&'static str; 4] = [
        "registerPromptHandler(callback)",
        "submitPromptResponse(id, response)",
        "cancelPrompt(id)",
        "getPendingPrompts()",
    ];

    pub fn new(broker: Arc<PromptBroker>) -> Self {
        info!(functions = ?Self::EXPORTED_FUNCTIONS, "prompt system initialized");
        Self { broker }
    }

    pub fn broker(&self) -> &Arc<PromptBroker> {
        &self.broker
    }

    /// Register the host callback. Anything but a function is rejected and
    /// leaves the current registration untouched.
    pub fn register_prompt_handler(&self, args: &[HostValue]) -> bool {
        let Some(first) = args.first() else {
            error!("registerPromptHandler requires: callback (function)");
            return false;
        };
        let HostValue::Function(callback) = first else {
            error!(got = first.type_name(), "prompt callback must be a function");
            return false;
        };

        let callback = Arc::clone(callback);
        let transport = FnTransport::new(move |descriptor: &PromptDescriptor| {
            match serde_json::to_value(descriptor) {
                Ok(value) => callback(value),
                Err(err) => error!(prompt_id = %descriptor.id, error = %err, "failed to encode prompt"),
            }
        });
        self.broker.register_transport(Arc::new(transport));
        true
    }

    /// `(id, response)`
    pub fn submit_prompt_response(&self, args: &[HostValue]) -> HostResult {
        let (Some(id), Some(answer)) = (
            args.first().and_then(HostValue::as_str),
            args.get(1).and_then(HostValue::as_str),
        ) else {
            error!("submitPromptResponse requires: id (string) and response (string)");
            return HostResult::error(INVALID_ARGUMENTS);
        };

        match self.broker.submit_response(id, answer) {
            Ok(()) => HostResult::ok(),
            Err(PromptError::RequestNotFound(_)) => HostResult::error(PROMPT_NOT_FOUND),
            Err(_) => HostResult::error(SEND_FAILED),
        }
    }

    /// `(id)` or `(id, reason)`
    pub fn cancel_prompt(&self, args: &[HostValue]) -> HostResult {
        let Some(id) = args.first().and_then(HostValue::as_str) else {
            error!("cancelPrompt requires: id (string)");
            return HostResult::error(INVALID_ARGUMENTS);
        };
        let reason = args.get(1).and_then(HostValue::as_str);

        match self.broker.cancel(id, reason) {
            Ok(()) => HostResult::ok(),
            Err(PromptError::RequestNotFound(_)) => HostResult::error(PROMPT_NOT_FOUND),
            Err(err) => {
                warn!(prompt_id = %id, error = %err, "cancel did not reach the prompt");
                HostResult::error(CANCEL_FAILED)
            }
        }
    }

    /// Debug view of pending prompts.
    pub fn get_pending_prompts(&self) -> Value {
        serde_json::to_value(self.broker.pending()).unwrap_or_else(|_| Value::Array(Vec::new()))
    }
}
