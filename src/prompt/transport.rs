//! Transports: how a prompt descriptor reaches the host.

use std::sync::mpsc::{channel, Receiver, Sender};

use tracing::warn;

use crate::prompt::request::PromptDescriptor;

/// Capability to tell the host that a prompt is waiting.
///
/// `notify` must return promptly and must tolerate concurrent and re-entrant
/// calls. The answer arrives later through the broker's resolution handlers,
/// possibly from inside `notify` itself.
pub trait PromptTransport: Send + Sync {
    fn notify(&self, descriptor: &PromptDescriptor);
}

/// Transport wrapping a host-registered callback.
pub struct FnTransport<F>
where
    F: Fn(&PromptDescriptor) + Send + Sync,
{
    callback: F,
}

impl<F> FnTransport<F>
where
    F: Fn(&PromptDescriptor) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> PromptTransport for FnTransport<F>
where
    F: Fn(&PromptDescriptor) + Send + Sync,
{
    fn notify(&self, descriptor: &PromptDescriptor) {
        (self.callback)(descriptor)
    }
}

/// In-process transport for native builds: descriptors go down a channel to
/// whichever thread plays host.
#[derive(Clone)]
pub struct ChannelTransport {
    sender: Sender<PromptDescriptor>,
}

impl ChannelTransport {
    pub fn new_pair() -> (Self, Receiver<PromptDescriptor>) {
        let (sender, receiver) = channel();
        (Self { sender }, receiver)
    }
}

impl PromptTransport for ChannelTransport {
    fn notify(&self, descriptor: &PromptDescriptor) {
        if self.sender.send(descriptor.clone()).is_err() {
            // The prompt stays pending until its deadline.
            warn!(
                prompt_id = %descriptor.id,
                "prompt host disconnected; descriptor dropped"
            );
        }
    }
}
