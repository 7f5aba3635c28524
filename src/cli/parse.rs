//! CLI parse: clap types for prompt-bridge. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// prompt-bridge - interactive prompts answered by a console or an embedding host
#[derive(Parser, Debug)]
#[command(name = "prompt-bridge")]
#[command(about = "Interactive prompts bridged to a console or an embedding host")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seconds to wait for each answer
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Who answers prompts (console, json-lines)
    #[arg(long, global = true, default_value = "console")]
    pub host: String,

    /// Disable colored prompts
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Ask a single question and print the answer
    Ask {
        /// Prompt text
        message: String,
        /// Prompt kind (text, confirm, resource)
        #[arg(long, default_value = "text")]
        kind: String,
        /// Resource type for resource prompts (port, mcr, mve, vxc, location)
        #[arg(long)]
        resource_type: Option<String>,
    },
    /// Ask a yes/no question; prints "yes" or "no"
    Confirm {
        /// Question text
        question: String,
    },
    /// Collect a new set of resource tags
    Tags,
    /// Interactively replace an existing set of resource tags
    UpdateTags {
        /// Existing tag (key=value); repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Print the effective configuration
    Config,
}
