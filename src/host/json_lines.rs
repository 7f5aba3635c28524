//! Line-delimited JSON host for embedders that drive the process over pipes.
//!
//! Outgoing lines (`event` tagged):
//! - `{"event":"prompt","id":..,"message":..,"type":..,"resourceType":..}`
//! - `{"event":"result","op":..,"id":..,"success":true}` or `..,"error":".."}`
//! - `{"event":"pending","prompts":[..]}`
//! - `{"event":"output","text":..}`
//!
//! Incoming lines (`op` tagged): `submit {id, answer}`, `cancel {id, reason?}`,
//! `pending`.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BridgeError, PromptError};
use crate::host::bridge::{HostResult, CANCEL_FAILED, INVALID_ARGUMENTS, PROMPT_NOT_FOUND, SEND_FAILED};
use crate::prompt::{PromptBroker, PromptDescriptor, PromptTransport};

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum HostEvent {
    Prompt(PromptDescriptor),
    Result {
        op: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(flatten)]
        result: HostResult,
    },
    Pending {
        prompts: Vec<PromptDescriptor>,
    },
    Output {
        text: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum HostCommand {
    Submit { id: String, answer: String },
    Cancel {
        id: String,
        #[serde(default)]
        reason: Option<String>,
    },
    Pending,
}

/// Shared, line-oriented event sink.
pub struct EventSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> EventSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn emit(&self, event: &HostEvent) -> Result<(), BridgeError> {
        let line = serde_json::to_string(event)?;
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> PromptTransport for EventSink<W> {
    fn notify(&self, descriptor: &PromptDescriptor) {
        if let Err(err) = self.emit(&HostEvent::Prompt(descriptor.clone())) {
            warn!(prompt_id = %descriptor.id, error = %err, "failed to write prompt event");
        }
    }
}

/// Host that reads commands from one stream and writes events to another.
pub struct JsonLinesHost<W: Write + Send + 'static> {
    broker: Arc<PromptBroker>,
    sink: Arc<EventSink<W>>,
    // Held from reading a command until its reply is written.
    in_flight: Mutex<()>,
}

impl<W: Write + Send + 'static> JsonLinesHost<W> {
    /// Attach to `broker`; prompt events go to `writer`.
    pub fn attach(broker: Arc<PromptBroker>, writer: W) -> Self {
        let sink = Arc::new(EventSink::new(writer));
        broker.register_transport(Arc::clone(&sink) as Arc<dyn PromptTransport>);
        Self {
            broker,
            sink,
            in_flight: Mutex::new(()),
        }
    }

    pub fn sink(&self) -> Arc<EventSink<W>> {
        Arc::clone(&self.sink)
    }

    /// Writer whose lines become `output` events.
    pub fn output(&self) -> OutputWriter<W> {
        OutputWriter {
            sink: Arc::clone(&self.sink),
            buffer: Vec::new(),
        }
    }

    /// Process commands until `reader` reaches end of input, then cancel
    /// whatever is still pending.
    pub fn serve<R: BufRead>(&self, reader: R) -> Result<(), BridgeError> {
        let result = self.serve_lines(reader);
        let cancelled = self.broker.cancel_all("host input closed");
        debug!(cancelled, "json-lines host input closed");
        result
    }

    fn serve_lines<R: BufRead>(&self, reader: R) -> Result<(), BridgeError> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let _in_flight = self.in_flight.lock();
            let event = self.handle_line(&line);
            self.sink.emit(&event)?;
        }
        Ok(())
    }

    /// Block until the command being handled, if any, has written its reply.
    /// A submit wakes its caller before the acknowledgement is written.
    pub fn wait_idle(&self) {
        drop(self.in_flight.lock());
    }

    /// Handle one command line and build the reply event.
    pub fn handle_line(&self, line: &str) -> HostEvent {
        let command: HostCommand = match serde_json::from_str(line) {
            Ok(command) => command,
            Err(err) => {
                warn!(error = %err, "unreadable host command");
                return HostEvent::Result {
                    op: "unknown".to_string(),
                    id: None,
                    result: HostResult::error(INVALID_ARGUMENTS),
                };
            }
        };

        match command {
            HostCommand::Submit { id, answer } => {
                let result = match self.broker.submit_response(&id, answer) {
                    Ok(()) => HostResult::ok(),
                    Err(PromptError::RequestNotFound(_)) => HostResult::error(PROMPT_NOT_FOUND),
                    Err(_) => HostResult::error(SEND_FAILED),
                };
                HostEvent::Result {
                    op: "submit".to_string(),
                    id: Some(id),
                    result,
                }
            }
            HostCommand::Cancel { id, reason } => {
                let result = match self.broker.cancel(&id, reason.as_deref()) {
                    Ok(()) => HostResult::ok(),
                    Err(PromptError::RequestNotFound(_)) => HostResult::error(PROMPT_NOT_FOUND),
                    Err(_) => HostResult::error(CANCEL_FAILED),
                };
                HostEvent::Result {
                    op: "cancel".to_string(),
                    id: Some(id),
                    result,
                }
            }
            HostCommand::Pending => HostEvent::Pending {
                prompts: self.broker.pending(),
            },
        }
    }
}

/// Line-buffered writer emitting each complete line as an `output` event.
pub struct OutputWriter<W: Write + Send> {
    sink: Arc<EventSink<W>>,
    buffer: Vec<u8>,
}

impl<W: Write + Send> OutputWriter<W> {
    fn emit_line(&self, bytes: &[u8]) -> io::Result<()> {
        let text = String::from_utf8_lossy(bytes).into_owned();
        self.sink
            .emit(&HostEvent::Output { text })
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }
}

impl<W: Write + Send> Write for OutputWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.emit_line(&line[..line.len() - 1])?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.emit_line(&line)?;
        }
        Ok(())
    }
}

impl<W: Write + Send> Drop for OutputWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
