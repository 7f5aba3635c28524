//! Prompt descriptors and in-flight request records.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PromptError;

/// UI hint forwarded to the host. The core never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Text,
    Confirm,
    Resource,
}

impl PromptKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptKind::Text => "text",
            PromptKind::Confirm => "confirm",
            PromptKind::Resource => "resource",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(PromptKind::Text),
            "confirm" => Ok(PromptKind::Confirm),
            "resource" => Ok(PromptKind::Resource),
            other => Err(format!(
                "Invalid prompt kind: {} (must be 'text', 'confirm', or 'resource')",
                other
            )),
        }
    }
}

/// What the host sees of a prompt: `{id, message, type, resourceType}`.
///
/// Also the shape of a diagnostic snapshot entry. A missing resource hint is
/// exchanged as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDescriptor {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: PromptKind,
    #[serde(
        rename = "resourceType",
        default,
        serialize_with = "hint_to_string",
        deserialize_with = "hint_from_string"
    )]
    pub resource_hint: Option<String>,
}

fn hint_to_string<S: Serializer>(hint: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(hint.as_deref().unwrap_or(""))
}

fn hint_from_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.filter(|hint| !hint.is_empty()))
}

/// Value handed to a waiting dispatcher: the answer or the terminal failure.
pub type Resolution = Result<String, PromptError>;

/// One outstanding question.
///
/// The answer and error conduits share a single capacity-1 slot guarded by a
/// claim flag: whichever resolver claims first is the only one that sends.
pub struct PromptRequest {
    descriptor: PromptDescriptor,
    claimed: AtomicBool,
    slot: SyncSender<Resolution>,
}

impl PromptRequest {
    /// Build a request and the receiving end its dispatcher waits on.
    pub fn new(descriptor: PromptDescriptor) -> (Arc<Self>, Receiver<Resolution>) {
        let (slot, receiver) = sync_channel(1);
        let request = Arc::new(Self {
            descriptor,
            claimed: AtomicBool::new(false),
            slot,
        });
        (request, receiver)
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn descriptor(&self) -> &PromptDescriptor {
        &self.descriptor
    }

    pub fn is_resolved(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// Take the right to resolve. Succeeds once per request.
    pub(crate) fn claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Deliver an answer without blocking.
    pub fn respond(&self, answer: String) -> Result<(), PromptError> {
        self.resolve(Ok(answer))
    }

    /// Deliver a terminal failure without blocking.
    pub fn fail(&self, error: PromptError) -> Result<(), PromptError> {
        self.resolve(Err(error))
    }

    fn resolve(&self, resolution: Resolution) -> Result<(), PromptError> {
        if !self.claim() {
            return Err(PromptError::DeliveryFailed(self.id().to_string()));
        }
        match self.slot.try_send(resolution) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                Err(PromptError::DeliveryFailed(self.id().to_string()))
            }
        }
    }
}

impl fmt::Debug for PromptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptRequest")
            .field("descriptor", &self.descriptor)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
