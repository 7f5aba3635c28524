//! Correlation ID generation for pending prompts.

use std::sync::atomic::{AtomicU64, Ordering};

static PROMPT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Produce a fresh correlation ID.
///
/// The counter alone keeps IDs distinct within the process; the timestamp and
/// pid keep them distinct across restarts of a long-lived host.
pub fn new_prompt_id() -> String {
    let seq = PROMPT_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);
    let pid = std::process::id();
    format!("prompt_{seq}_{nanos}_{pid}")
}
