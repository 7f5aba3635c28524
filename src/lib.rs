//! Prompt Bridge: blocking interactive prompts over callback-driven hosts
//!
//! Command code asks a question and blocks for the answer; the host that owns
//! the real user-interaction surface receives a descriptor, and resolves it
//! later from wherever its own event loop runs.

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod interact;
pub mod logging;
pub mod prompt;

pub use error::{BridgeError, PromptError};
pub use prompt::{PromptBroker, PromptDescriptor, PromptKind, PromptTransport};
