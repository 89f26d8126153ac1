use crate::editing::{ChangeType, ContentBlock, Document, Patch, Selection};

/// Content and selection of a document at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    blocks: Vec<ContentBlock>,
    selection: Selection,
}

impl DocumentState {
    pub fn capture(doc: &Document) -> Self {
        Self {
            blocks: doc.blocks.clone(),
            selection: doc.selection.clone(),
        }
    }

    fn restore(self, doc: &mut Document) {
        doc.blocks = self.blocks;
        doc.selection = self.selection;
        doc.inline_style_override = None;
        doc.version += 1;
    }
}

/// Undo/redo stacks of whole-document states.
///
/// Consecutive character insertions collapse into a single undo step so
/// undo removes a typed word rather than one letter. Any other change,
/// including a bare cursor move, ends the run.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<DocumentState>,
    redo_stack: Vec<DocumentState>,
    last_change: Option<ChangeType>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied command. `before` is the state prior to it.
    pub fn record(&mut self, before: DocumentState, patch: &Patch) {
        if !patch.changes_content() {
            if patch.change_type == ChangeType::SelectionChange {
                self.last_change = Some(ChangeType::SelectionChange);
            }
            return;
        }

        let coalesce = patch.change_type == ChangeType::InsertCharacters
            && self.last_change == Some(ChangeType::InsertCharacters);
        if !coalesce {
            self.undo_stack.push(before);
        }
        self.redo_stack.clear();
        self.last_change = Some(patch.change_type);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Step back one change. Returns false when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        let Some(state) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(DocumentState::capture(doc));
        state.restore(doc);
        self.last_change = None;
        true
    }

    /// Re-apply the last undone change. Returns false when there is none.
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        let Some(state) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(DocumentState::capture(doc));
        state.restore(doc);
        self.last_change = None;
        true
    }
}
