//! Prompt broker: blocking dispatcher, resolution handlers and deadline.

use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::PromptConfig;
use crate::error::PromptError;
use crate::prompt::id::new_prompt_id;
use crate::prompt::registry::PendingRegistry;
use crate::prompt::request::{PromptDescriptor, PromptKind, PromptRequest, Resolution};
use crate::prompt::transport::PromptTransport;

/// How long a timed-out dispatcher waits for a resolver that claimed the
/// request just before the deadline.
const CLAIM_GRACE: Duration = Duration::from_secs(1);

/// Owns the pending registry and the host transport.
///
/// Construct once at startup and share by `Arc`. Any number of threads may
/// call [`PromptBroker::prompt`] at once; each blocks independently.
pub struct PromptBroker {
    registry: PendingRegistry,
    transport: RwLock<Option<Arc<dyn PromptTransport>>>,
    timeout: Duration,
}

impl Default for PromptBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBroker {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            registry: PendingRegistry::new(),
            transport: RwLock::new(None),
            timeout,
        }
    }

    pub fn from_config(config: &PromptConfig) -> Self {
        Self::with_timeout(config.timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Install the host transport, replacing any previous one.
    pub fn register_transport(&self, transport: Arc<dyn PromptTransport>) {
        let replaced = self.transport.write().replace(transport).is_some();
        info!(replaced, "prompt transport registered");
    }

    pub fn unregister_transport(&self) -> Option<Arc<dyn PromptTransport>> {
        self.transport.write().take()
    }

    pub fn has_transport(&self) -> bool {
        self.transport.read().is_some()
    }

    /// Ask the host a question and block until it is answered, cancelled,
    /// or the broker deadline passes.
    pub fn prompt(
        &self,
        message: &str,
        kind: PromptKind,
        resource_hint: Option<&str>,
    ) -> Result<String, PromptError> {
        self.prompt_with_timeout(message, kind, resource_hint, self.timeout)
    }

    /// [`PromptBroker::prompt`] with an explicit deadline.
    pub fn prompt_with_timeout(
        &self,
        message: &str,
        kind: PromptKind,
        resource_hint: Option<&str>,
        timeout: Duration,
    ) -> Result<String, PromptError> {
        let transport = self
            .transport
            .read()
            .clone()
            .ok_or(PromptError::CallbackNotRegistered)?;

        let descriptor = PromptDescriptor {
            id: new_prompt_id(),
            message: message.to_string(),
            kind,
            resource_hint: resource_hint
                .filter(|hint| !hint.is_empty())
                .map(str::to_string),
        };
        let id = descriptor.id.clone();
        let (request, receiver) = PromptRequest::new(descriptor);
        self.registry.register(Arc::clone(&request));

        info!(prompt_id = %id, kind = %kind, message = %message, "requesting input");
        // Outside every lock: the host may resolve from inside notify.
        transport.notify(request.descriptor());

        let resolution: Resolution = match receiver.recv_timeout(timeout) {
            Ok(resolution) => resolution,
            Err(RecvTimeoutError::Timeout) => {
                if request.claim() {
                    Err(PromptError::Timeout {
                        id: id.clone(),
                        after: timeout,
                    })
                } else {
                    // A resolver won the race; its send is already under way.
                    receiver.recv_timeout(CLAIM_GRACE).unwrap_or_else(|_| {
                        Err(PromptError::Timeout {
                            id: id.clone(),
                            after: timeout,
                        })
                    })
                }
            }
            Err(RecvTimeoutError::Disconnected) => Err(PromptError::Cancelled {
                id: id.clone(),
                reason: "prompt channel closed".to_string(),
            }),
        };

        self.registry.remove(&id);

        match &resolution {
            Ok(_) => info!(prompt_id = %id, "received response"),
            Err(err @ PromptError::Timeout { .. }) => warn!(prompt_id = %id, error = %err, "prompt timed out"),
            Err(err) => error!(prompt_id = %id, error = %err, "prompt failed"),
        }
        resolution
    }

    /// [`PromptBroker::prompt`] for async callers; the wait runs on the tokio
    /// blocking pool.
    pub async fn prompt_async(
        self: &Arc<Self>,
        message: impl Into<String>,
        kind: PromptKind,
        resource_hint: Option<String>,
    ) -> Result<String, PromptError> {
        let broker = Arc::clone(self);
        let message = message.into();
        tokio::task::spawn_blocking(move || {
            broker.prompt(&message, kind, resource_hint.as_deref())
        })
        .await
        .unwrap_or_else(|join_err| {
            Err(PromptError::Cancelled {
                id: String::new(),
                reason: format!("prompt task failed: {}", join_err),
            })
        })
    }

    /// Deliver the host's answer. Never blocks and never removes the entry.
    pub fn submit_response(&self, id: &str, answer: impl Into<String>) -> Result<(), PromptError> {
        let request = self.lookup_for_resolution(id)?;
        match request.respond(answer.into()) {
            Ok(()) => {
                debug!(prompt_id = %id, "response sent");
                Ok(())
            }
            Err(err) => {
                error!(prompt_id = %id, "failed to send response");
                Err(err)
            }
        }
    }

    /// Cancel a pending prompt on behalf of the host.
    pub fn cancel(&self, id: &str, reason: Option<&str>) -> Result<(), PromptError> {
        let request = self.lookup_for_resolution(id)?;
        let reason = reason.unwrap_or("prompt cancelled by user").to_string();
        request.fail(PromptError::Cancelled {
            id: id.to_string(),
            reason,
        })?;
        info!(prompt_id = %id, "cancelled prompt");
        Ok(())
    }

    /// Cancel everything still pending. Blocked dispatchers remove their own
    /// entries as they wake. Returns how many prompts were cancelled.
    pub fn cancel_all(&self, reason: &str) -> usize {
        let cancelled = self
            .registry
            .requests()
            .into_iter()
            .filter(|request| {
                request
                    .fail(PromptError::Cancelled {
                        id: request.id().to_string(),
                        reason: reason.to_string(),
                    })
                    .is_ok()
            })
            .count();
        if cancelled > 0 {
            warn!(cancelled, reason = %reason, "cancelled pending prompts");
        }
        cancelled
    }

    /// Diagnostic snapshot of pending prompts; no side effects.
    pub fn pending(&self) -> Vec<PromptDescriptor> {
        self.registry.snapshot()
    }

    pub fn registry(&self) -> &PendingRegistry {
        &self.registry
    }

    fn lookup_for_resolution(&self, id: &str) -> Result<Arc<PromptRequest>, PromptError> {
        self.registry.lookup(id).ok_or_else(|| {
            warn!(prompt_id = %id, "no pending prompt found");
            PromptError::RequestNotFound(id.to_string())
        })
    }
}
