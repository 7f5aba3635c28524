//! Pending request registry: the single source of truth for what is waiting.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::prompt::request::{PromptDescriptor, PromptRequest};

/// Map from correlation ID to in-flight request, guarded by one lock.
///
/// An entry exists exactly while a dispatcher call for that ID is blocked.
/// Only the dispatcher inserts and removes; resolvers only look up.
#[derive(Default)]
pub struct PendingRegistry {
    pending: Mutex<HashMap<String, Arc<PromptRequest>>>,
}

impl PendingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a request.
    ///
    /// # Panics
    ///
    /// Panics if the ID is already pending. That can only come from a broken
    /// ID generator.
    pub fn register(&self, request: Arc<PromptRequest>) {
        let mut pending = self.pending.lock();
        let id = request.id().to_string();
        assert!(
            !pending.contains_key(&id),
            "prompt ID collision among pending requests: {}",
            id
        );
        pending.insert(id, request);
    }

    pub fn lookup(&self, id: &str) -> Option<Arc<PromptRequest>> {
        self.pending.lock().get(id).cloned()
    }

    /// Idempotent; removing an unknown ID does nothing.
    pub fn remove(&self, id: &str) {
        self.pending.lock().remove(id);
    }

    /// Diagnostic view of every pending prompt. Conduits are not exposed.
    pub fn snapshot(&self) -> Vec<PromptDescriptor> {
        let pending = self.pending.lock();
        let mut entries: Vec<PromptDescriptor> = pending
            .values()
            .map(|request| request.descriptor().clone())
            .collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    /// Every pending request, for forced shutdown.
    pub(crate) fn requests(&self) -> Vec<Arc<PromptRequest>> {
        self.pending.lock().values().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pending.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
