//! CLI domain: parse, route and output only.
//! Prompting lives in `interact`; the route table dispatches to it.

mod output;
mod parse;
mod route;

pub use output::{format_tags, map_error};
pub use parse::{Cli, Commands};
pub use route::{effective_config, parse_tags, HostMode, RunContext};
