//! Shared test utilities for integration tests
//!
//! A broker wired to an in-process channel host, so tests can play host from
//! any thread, plus process setup for driving the binary.

use std::process::Command;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use prompt_bridge::prompt::{ChannelTransport, PromptBroker, PromptDescriptor};
use tempfile::TempDir;

/// Broker plus the host end of its transport.
pub struct HostHarness {
    pub broker: Arc<PromptBroker>,
    prompts: Receiver<PromptDescriptor>,
}

impl HostHarness {
    pub fn new(timeout: Duration) -> Self {
        let broker = Arc::new(PromptBroker::with_timeout(timeout));
        let (transport, prompts) = ChannelTransport::new_pair();
        broker.register_transport(Arc::new(transport));
        Self { broker, prompts }
    }

    /// Next descriptor the host was notified of; panics after five seconds.
    pub fn next_prompt(&self) -> PromptDescriptor {
        self.prompts
            .recv_timeout(Duration::from_secs(5))
            .expect("host was never notified")
    }
}

/// Command for the binary with HOME and XDG dirs pointed into `dir`.
pub fn isolated_command(dir: &TempDir) -> Command {
    let home = dir.path().join("home");
    let config_home = dir.path().join("config");
    let state_home = dir.path().join("state");
    for path in [&home, &config_home, &state_home] {
        std::fs::create_dir_all(path).unwrap();
    }

    let mut command = Command::new(env!("CARGO_BIN_EXE_prompt-bridge"));
    command
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", &config_home)
        .env("XDG_STATE_HOME", &state_home)
        .env_remove("PROMPT_BRIDGE_LOG")
        .env_remove("PROMPT_BRIDGE_LOG_OUTPUT")
        .env_remove("PROMPT_BRIDGE_LOG_FORMAT");
    command
}
