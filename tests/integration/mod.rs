//! Integration tests for the prompt bridge

mod concurrent_prompts;
mod json_lines_cli;
mod logging_default;
pub mod test_utils;
