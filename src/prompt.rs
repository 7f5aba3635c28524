//! Interactive prompt bridge.
//!
//! Lets blocking "ask and wait" code run against a host that can only deliver
//! answers through callbacks arriving later, on another thread or re-entrantly.

pub mod broker;
pub mod id;
pub mod registry;
pub mod request;
pub mod transport;

pub use broker::PromptBroker;
pub use id::new_prompt_id;
pub use registry::PendingRegistry;
pub use request::{PromptDescriptor, PromptKind, PromptRequest, Resolution};
pub use transport::{ChannelTransport, FnTransport, PromptTransport};
