//! Hosts: the environments that own the real user-interaction surface.

pub mod bridge;
pub mod console;
pub mod json_lines;

pub use bridge::{HostBridge, HostCallback, HostResult, HostValue};
pub use console::{AnswerSource, ConsoleHost, TerminalSource};
pub use json_lines::{EventSink, HostCommand, HostEvent, JsonLinesHost, OutputWriter};
