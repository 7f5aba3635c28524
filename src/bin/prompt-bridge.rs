//! prompt-bridge CLI Binary
//!
//! Runs one interactive command with prompts answered by the console or by an
//! embedding host speaking line-delimited JSON.

use clap::Parser;
use prompt_bridge::cli::{Cli, RunContext};
use prompt_bridge::config::ConfigLoader;
use prompt_bridge::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("prompt-bridge starting");

    let context = match RunContext::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing prompt host: {}", e);
            eprintln!("{}", prompt_bridge::cli::map_error(&e));
            process::exit(1);
        }
    };

    let result = context.execute(&cli.command);
    let code = match result {
        Ok(output) => {
            info!("Command completed successfully");
            match context.emit(&output) {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("{}", prompt_bridge::cli::map_error(&e));
                    1
                }
            }
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", prompt_bridge::cli::map_error(&e));
            1
        }
    };
    context.finish();
    process::exit(code);
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = ConfigLoader::resolve(cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
        // Mirror to stderr so verbose runs are observable without losing file logs.
        if config.output == "file" {
            config.output = "file+stderr".to_string();
        }
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }

    let output_uses_file = config.output == "file" || config.output == "file+stderr";
    if config.enabled && output_uses_file {
        if let Ok(path) =
            prompt_bridge::logging::resolve_log_file_path(cli.log_file.clone(), config.file.clone())
        {
            config.file = Some(path);
        }
    } else if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
