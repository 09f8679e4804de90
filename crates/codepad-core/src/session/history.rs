//! Linear undo/redo history of buffer snapshots.

/// Snapshot-based edit history.
///
/// Each recorded entry is the buffer content *before* an edit. Recording a new
/// edit drops the redo branch.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    undo: Vec<String>,
    redo: Vec<String>,
    /// Maximum undo depth; 0 means unlimited.
    limit: usize,
}

impl EditHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Records the content as it was before an edit.
    pub fn record(&mut self, before: String) {
        self.redo.clear();
        self.undo.push(before);
        if self.limit > 0 && self.undo.len() > self.limit {
            let overflow = self.undo.len() - self.limit;
            self.undo.drain(..overflow);
        }
    }

    /// Steps back one edit.
    ///
    /// Returns the content to restore, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: &str) -> Option<String> {
        let previous = self.undo.pop()?;
        self.redo.push(current.to_string());
        Some(previous)
    }

    /// Steps forward one undone edit. Mirror of [`EditHistory::undo`].
    pub fn redo(&mut self, current: &str) -> Option<String> {
        let next = self.redo.pop()?;
        self.undo.push(current.to_string());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
