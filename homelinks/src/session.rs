//! Edit session over a loaded document
//!
//! Keeps the document as it was loaded next to the working copy so edits
//! can be discarded wholesale and compared against the starting point.

use crate::document::Document;

#[derive(Debug, Clone)]
pub struct EditSession {
    original: Document,
    current: Document,
}

impl EditSession {
    /// Start a session; the snapshot is a deep copy of `document`
    pub fn new(document: Document) -> Self {
        Self {
            original: document.clone(),
            current: document,
        }
    }

    pub fn original(&self) -> &Document {
        &self.original
    }

    pub fn current(&self) -> &Document {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut Document {
        &mut self.current
    }

    /// Discard every change and return the restored document for re-rendering
    pub fn reset(&mut self) -> &Document {
        self.current = self.original.clone();
        &self.current
    }

    /// Structural comparison of the working copy against the snapshot
    pub fn has_changes(&self) -> bool {
        self.current != self.original
    }

    pub fn into_current(self) -> Document {
        self.current
    }
}
