//! Native console host: answers prompts at the terminal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use owo_colors::OwoColorize;
use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::prompt::{ChannelTransport, PromptBroker, PromptDescriptor, PromptKind};

/// Where the console host gets its answers from.
pub trait AnswerSource: Send {
    fn answer(&mut self, rendered: &str, descriptor: &PromptDescriptor) -> Result<String, BridgeError>;
}

/// Interactive terminal input via `dialoguer`.
pub struct TerminalSource;

impl AnswerSource for TerminalSource {
    fn answer(&mut self, rendered: &str, _descriptor: &PromptDescriptor) -> Result<String, BridgeError> {
        let input: String = dialoguer::Input::new()
            .with_prompt(rendered)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| BridgeError::TransportError(format!("Failed to get user input: {}", e)))?;
        Ok(input.trim().to_string())
    }
}

/// Icon shown in front of a prompt.
pub fn prompt_icon(descriptor: &PromptDescriptor) -> &'static str {
    match descriptor.kind {
        PromptKind::Text => "❯",
        PromptKind::Confirm => "⚠️ ",
        PromptKind::Resource => match descriptor
            .resource_hint
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("port") => "🔌",
            Some("mve") => "🌐",
            Some("mcr") => "🛰️",
            Some("vxc") => "🔗",
            Some("location") => "📍",
            _ => "❯",
        },
    }
}

pub fn render_prompt(descriptor: &PromptDescriptor, no_color: bool) -> String {
    let text = format!("{} {}", prompt_icon(descriptor), descriptor.message);
    if no_color {
        text
    } else {
        text.bright_red().bold().to_string()
    }
}

/// Background thread that plays host for a [`PromptBroker`].
///
/// Dropping the handle without calling [`ConsoleHost::shutdown`] leaves the
/// thread running until the broker's transport is replaced.
pub struct ConsoleHost {
    broker: Arc<PromptBroker>,
    worker: Option<JoinHandle<()>>,
    // Set while the worker waits on its answer source.
    answering: Arc<AtomicBool>,
}

impl ConsoleHost {
    /// Attach to `broker` and answer prompts from the terminal.
    pub fn spawn(broker: Arc<PromptBroker>, no_color: bool) -> Result<Self, BridgeError> {
        Self::spawn_with_source(broker, no_color, TerminalSource)
    }

    pub fn spawn_with_source<S>(
        broker: Arc<PromptBroker>,
        no_color: bool,
        source: S,
    ) -> Result<Self, BridgeError>
    where
        S: AnswerSource + 'static,
    {
        let (transport, receiver) = ChannelTransport::new_pair();
        let worker_broker = Arc::clone(&broker);
        let answering = Arc::new(AtomicBool::new(false));
        let worker_answering = Arc::clone(&answering);
        let worker = thread::Builder::new()
            .name("prompt-console".to_string())
            .spawn(move || run(worker_broker, receiver, source, no_color, worker_answering))?;
        broker.register_transport(Arc::new(transport));
        Ok(Self {
            broker,
            worker: Some(worker),
            answering,
        })
    }

    /// Detach from the broker and wait for an idle worker to exit.
    ///
    /// A worker still blocked on terminal input for a prompt that already
    /// timed out or was cancelled is left behind rather than joined.
    pub fn shutdown(mut self) {
        self.broker.unregister_transport();
        let Some(worker) = self.worker.take() else {
            return;
        };
        if self.answering.load(Ordering::Acquire) {
            debug!("console prompt host still reading input; not waiting for it");
            return;
        }
        if worker.join().is_err() {
            warn!("console prompt host panicked");
        }
    }
}

fn run<S: AnswerSource>(
    broker: Arc<PromptBroker>,
    receiver: Receiver<PromptDescriptor>,
    mut source: S,
    no_color: bool,
    answering: Arc<AtomicBool>,
) {
    while let Ok(descriptor) = receiver.recv() {
        if !broker.registry().contains(&descriptor.id) {
            debug!(prompt_id = %descriptor.id, "prompt no longer pending; not asking");
            continue;
        }
        let rendered = render_prompt(&descriptor, no_color);
        answering.store(true, Ordering::Release);
        let answer = source.answer(&rendered, &descriptor);
        answering.store(false, Ordering::Release);
        let outcome = match answer {
            Ok(answer) => broker.submit_response(&descriptor.id, answer),
            Err(err) => broker.cancel(&descriptor.id, Some(&err.to_string())),
        };
        if let Err(err) = outcome {
            // Usually the prompt already timed out.
            debug!(prompt_id = %descriptor.id, error = %err, "console answer not delivered");
        }
    }
    debug!("console prompt host stopped");
}
