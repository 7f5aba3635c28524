//! Prompt helpers used by command code: text, confirmation, resource fields
//! and resource tag editing, all routed through a [`PromptBroker`].

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use tracing::debug;

use crate::error::{BridgeError, PromptError};
use crate::prompt::{PromptBroker, PromptKind};

pub type Tags = BTreeMap<String, String>;

/// Asks questions through a broker; informational text goes to `out`.
pub struct Prompter<W: Write> {
    broker: Arc<PromptBroker>,
    out: W,
}

impl<W: Write> Prompter<W> {
    pub fn new(broker: Arc<PromptBroker>, out: W) -> Self {
        Self { broker, out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn text(&mut self, message: &str) -> Result<String, PromptError> {
        self.broker.prompt(message, PromptKind::Text, None)
    }

    /// `[y/N]` question. Anything but `y`/`yes`, including a failed prompt,
    /// counts as no.
    pub fn confirm(&mut self, question: &str) -> bool {
        let full_question = format!("{} [y/N]", question);
        match self.broker.prompt(&full_question, PromptKind::Confirm, None) {
            Ok(response) => is_affirmative(&response),
            Err(err) => {
                debug!(error = %err, "confirmation treated as no");
                false
            }
        }
    }

    pub fn resource(&mut self, resource_type: &str, message: &str) -> Result<String, PromptError> {
        self.broker
            .prompt(message, PromptKind::Resource, Some(resource_type))
    }

    /// Optionally collect a fresh set of tags. `None` when the user declines.
    pub fn resource_tags(&mut self) -> Result<Option<Tags>, BridgeError> {
        if !self.confirm("Would you like to add resource tags?") {
            return Ok(None);
        }

        writeln!(self.out, "Enter tags (key and value). Enter empty key to finish.")?;
        let mut tags = Tags::new();
        loop {
            let key = self.text("Tag key (empty to finish):")?;
            if key.is_empty() {
                break;
            }
            let value = self.text(&format!("Tag value for '{}':", key))?;
            tags.insert(key, value);
        }

        if !tags.is_empty() {
            writeln!(self.out, "Tags added:")?;
            self.write_tags(&tags)?;
        }
        Ok(Some(tags))
    }

    /// Replace a resource's tags interactively. The result replaces
    /// `existing` wholesale; declining a confirmation aborts the update.
    pub fn update_resource_tags(&mut self, existing: &Tags) -> Result<Tags, BridgeError> {
        writeln!(
            self.out,
            "⚠️  Warning: This operation will replace all existing tags with the new set of tags you define."
        )?;
        if existing.is_empty() {
            writeln!(self.out, "No existing tags found.")?;
        } else {
            writeln!(self.out, "Current tags:")?;
            self.write_tags(existing)?;
        }

        if !self.confirm("Do you want to continue with updating tags?") {
            return Err(BridgeError::TagUpdateCancelled);
        }

        let mut tags = Tags::new();
        if !existing.is_empty() {
            writeln!(self.out, "\nChoose how you want to update tags:")?;
            writeln!(self.out, "1. Start with a clean slate (remove all existing tags)")?;
            writeln!(self.out, "2. Start with existing tags and modify them")?;

            let choice = self.text("Enter choice (1 or 2):")?;
            match choice.trim() {
                "1" => {}
                "2" => {
                    tags = existing.clone();
                    writeln!(self.out, "\nYou can now modify, add, or remove tags.")?;
                    writeln!(self.out, "To remove a tag, enter its key and an empty value.")?;
                }
                other => return Err(BridgeError::InvalidChoice(other.to_string())),
            }
        }

        writeln!(self.out, "\nEnter tags (key and value). Enter empty key to finish.")?;
        loop {
            let key = self.text("Tag key (empty to finish):")?;
            if key.is_empty() {
                break;
            }
            let value = self.text(&format!("Tag value for '{}' (empty to remove):", key))?;
            if value.is_empty() {
                // A tag that is already empty stays as it is.
                if tags.get(&key).is_some_and(|current| !current.is_empty()) {
                    tags.remove(&key);
                    writeln!(self.out, "  Removed tag: {}", key)?;
                }
            } else {
                writeln!(self.out, "  Updated tag: {}: {}", key, value)?;
                tags.insert(key, value);
            }
        }

        writeln!(self.out, "\nFinal tags that will be applied:")?;
        if tags.is_empty() {
            writeln!(self.out, "  No tags - all existing tags will be removed")?;
        } else {
            self.write_tags(&tags)?;
        }

        if !self.confirm("Apply these changes?") {
            return Err(BridgeError::TagUpdateCancelled);
        }
        Ok(tags)
    }

    fn write_tags(&mut self, tags: &Tags) -> Result<(), BridgeError> {
        for (key, value) in tags {
            writeln!(self.out, "  {}: {}", key, value)?;
        }
        Ok(())
    }
}

pub fn is_affirmative(response: &str) -> bool {
    matches!(response.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
