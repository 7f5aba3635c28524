//! CLI route: single route table and run context.

use std::io::{self, Stdout, Write};
use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::cli::output::format_tags;
use crate::cli::parse::{Cli, Commands};
use crate::config::{BridgeConfig, ConfigLoader};
use crate::error::BridgeError;
use crate::host::{ConsoleHost, HostEvent, JsonLinesHost};
use crate::interact::{Prompter, Tags};
use crate::prompt::{PromptBroker, PromptKind};

/// Who answers prompts for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    Console,
    JsonLines,
}

impl FromStr for HostMode {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "console" => Ok(HostMode::Console),
            "json-lines" | "jsonl" => Ok(HostMode::JsonLines),
            other => Err(BridgeError::InvalidArgument(format!(
                "unknown host '{}' (must be 'console' or 'json-lines')",
                other
            ))),
        }
    }
}

enum ActiveHost {
    Console(ConsoleHost),
    JsonLines(Arc<JsonLinesHost<Stdout>>),
    External,
}

/// Runtime context for CLI execution: configuration, broker and host.
pub struct RunContext {
    config: BridgeConfig,
    broker: Arc<PromptBroker>,
    host: ActiveHost,
    out: Mutex<Box<dyn Write + Send>>,
}

impl RunContext {
    /// Load configuration, build the broker and attach the requested host.
    pub fn new(cli: &Cli) -> Result<Self, BridgeError> {
        let config = effective_config(cli)?;
        let mode: HostMode = cli.host.parse()?;
        let broker = Arc::new(PromptBroker::from_config(&config.prompt));

        let (host, out): (ActiveHost, Box<dyn Write + Send>) = match mode {
            HostMode::Console => {
                let console = ConsoleHost::spawn(Arc::clone(&broker), config.prompt.no_color)?;
                (ActiveHost::Console(console), Box::new(io::stdout()))
            }
            HostMode::JsonLines => {
                let host = Arc::new(JsonLinesHost::attach(Arc::clone(&broker), io::stdout()));
                let out = Box::new(host.output());
                let server = Arc::clone(&host);
                thread::Builder::new()
                    .name("prompt-json-lines".to_string())
                    .spawn(move || {
                        if let Err(err) = server.serve(io::stdin().lock()) {
                            error!(error = %err, "json-lines host stopped");
                        }
                    })?;
                (ActiveHost::JsonLines(host), out)
            }
        };
        info!(host = ?mode, timeout_secs = config.prompt.timeout_secs, "run context ready");

        Ok(Self {
            config,
            broker,
            host,
            out: Mutex::new(out),
        })
    }

    /// Context around a broker whose host is already attached.
    pub fn with_broker(
        config: BridgeConfig,
        broker: Arc<PromptBroker>,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            config,
            broker,
            host: ActiveHost::External,
            out: Mutex::new(out),
        }
    }

    pub fn broker(&self) -> &Arc<PromptBroker> {
        &self.broker
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Route a command to its handler.
    pub fn execute(&self, command: &Commands) -> Result<String, BridgeError> {
        debug!(command = ?command, "executing command");
        match command {
            Commands::Ask {
                message,
                kind,
                resource_type,
            } => {
                let kind: PromptKind = kind.parse().map_err(BridgeError::InvalidArgument)?;
                let answer = self
                    .broker
                    .prompt(message, kind, resource_type.as_deref())?;
                Ok(answer)
            }
            Commands::Confirm { question } => {
                let confirmed = self.with_prompter(|p| Ok(p.confirm(question)))?;
                Ok(if confirmed { "yes" } else { "no" }.to_string())
            }
            Commands::Tags => match self.with_prompter(|p| p.resource_tags())? {
                Some(tags) => Ok(format_tags(&tags)),
                None => Ok("No tags".to_string()),
            },
            Commands::UpdateTags { tags } => {
                let existing = parse_tags(tags)?;
                let updated = self.with_prompter(|p| p.update_resource_tags(&existing))?;
                Ok(format_tags(&updated))
            }
            Commands::Config => self.config.to_toml(),
        }
    }

    /// Print command output where this host expects it.
    pub fn emit(&self, text: &str) -> Result<(), BridgeError> {
        match &self.host {
            ActiveHost::JsonLines(host) => host.sink().emit(&HostEvent::Output {
                text: text.to_string(),
            }),
            ActiveHost::Console(_) | ActiveHost::External => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", text)?;
                Ok(())
            }
        }
    }

    /// Release blocked prompts and detach the host.
    pub fn finish(self) {
        self.out.lock().flush().ok();
        let cancelled = self.broker.cancel_all("shutting down");
        if cancelled > 0 {
            info!(cancelled, "released pending prompts at shutdown");
        }
        match self.host {
            ActiveHost::Console(console) => console.shutdown(),
            ActiveHost::JsonLines(host) => host.wait_idle(),
            ActiveHost::External => {}
        }
    }

    fn with_prompter<T>(
        &self,
        f: impl FnOnce(&mut Prompter<&mut Box<dyn Write + Send>>) -> Result<T, BridgeError>,
    ) -> Result<T, BridgeError> {
        let mut out = self.out.lock();
        let mut prompter = Prompter::new(Arc::clone(&self.broker), &mut *out);
        let result = f(&mut prompter);
        prompter.into_output().flush()?;
        result
    }
}

/// Configuration after CLI overrides.
pub fn effective_config(cli: &Cli) -> Result<BridgeConfig, BridgeError> {
    let mut config = ConfigLoader::resolve(cli.config.as_deref())?;
    if let Some(timeout_secs) = cli.timeout_secs {
        config.prompt.timeout_secs = timeout_secs;
    }
    if cli.no_color {
        config.prompt.no_color = true;
    }
    config.validate()?;
    Ok(config)
}

/// Parse `key=value` pairs.
pub fn parse_tags(raw: &[String]) -> Result<Tags, BridgeError> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(BridgeError::InvalidArgument(format!(
                "tag must look like key=value: {}",
                pair
            ))),
        })
        .collect()
}
