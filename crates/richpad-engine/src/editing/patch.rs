use crate::editing::{BlockKey, ChangeType, Selection};

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Blocks whose text or styles changed, including created and removed ones
    pub changed: Vec<BlockKey>,
    pub new_selection: Selection,
    pub version: u64,
    pub change_type: ChangeType,
}

impl Patch {
    /// Whether the document content (not just selection or override) changed
    pub fn changes_content(&self) -> bool {
        self.change_type.changes_content() && !self.changed.is_empty()
    }
}
