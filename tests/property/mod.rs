//! Property-based tests for prompt identity and descriptor encoding

mod prompt_ids;
