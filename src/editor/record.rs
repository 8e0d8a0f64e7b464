//! Editor record - one open document inside a workspace

use crate::buffer::Buffer;
use crate::util::time::{self, Timestamp};

/// An open file with its own dirty-state
#[derive(Debug, Clone)]
pub struct EditorRecord {
    /// Path of the document, unique within a workspace
    file: String,
    /// Display label for the tab bar
    name: String,
    opened: Timestamp,
    changed: Timestamp,
    buffer: Buffer,
}

impl EditorRecord {
    /// Open a document. The initial content is the saved snapshot.
    pub fn open(file: impl Into<String>, name: impl Into<String>, content: &str) -> Self {
        let now = time::now();
        Self {
            file: file.into(),
            name: name.into(),
            opened: now,
            changed: now,
            buffer: Buffer::from_str(content),
        }
    }

    /// Replace the content. Returns false (and touches nothing) when identical.
    pub fn mutate(&mut self, content: &str) -> bool {
        if !self.buffer.replace(content) {
            return false;
        }
        self.changed = time::not_before(self.changed);
        true
    }

    /// The content was written out; does not touch `changed`.
    /// Returns false if the editor was already clean.
    pub fn mark_saved(&mut self) -> bool {
        self.buffer.mark_saved()
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn opened(&self) -> Timestamp {
        self.opened
    }

    pub fn changed(&self) -> Timestamp {
        self.changed
    }

    pub fn has_pending_changes(&self) -> bool {
        self.buffer.is_dirty()
    }

    pub fn content(&self) -> String {
        self.buffer.contents()
    }
}
