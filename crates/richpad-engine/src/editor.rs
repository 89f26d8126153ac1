//! Editor session: a document bound to a store, driven by key presses.

use crate::editing::{
    Cmd, Document, DocumentState, History, Patch, ShortcutRule, StyleMap, plan_return,
};
use crate::io::{KeyValueStore, StorageError, load_document, save_document};
use crate::keys::{EditorCommand, KeyPress, key_binding};

pub const DEFAULT_PLACEHOLDER: &str = "Start writing here";

/// Shown once the document has been written to the store
pub const SAVE_ACK_MESSAGE: &str = "Response saved successfully to local storage!";

#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub placeholder: String,
    pub style_map: StyleMap,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            style_map: StyleMap::default(),
        }
    }
}

/// Whether the editor consumed an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    Handled,
    NotHandled,
}

/// Confirmation of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAck {
    pub message: &'static str,
    pub blocks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    NotHandled,
    Saved(SaveAck),
}

impl From<HandleResult> for KeyOutcome {
    fn from(result: HandleResult) -> Self {
        match result {
            HandleResult::Handled => KeyOutcome::Handled,
            HandleResult::NotHandled => KeyOutcome::NotHandled,
        }
    }
}

/// A document being edited, its undo history and the store it saves to.
///
/// The saved document is read exactly once, when the editor is opened.
/// Nothing is written back until [`Editor::save`] runs.
pub struct Editor<S: KeyValueStore> {
    document: Document,
    history: History,
    settings: EditorSettings,
    store: S,
    dirty: bool,
}

impl<S: KeyValueStore> Editor<S> {
    /// Open an editor over `store`, restoring the saved document if there
    /// is one
    pub fn open(store: S, settings: EditorSettings) -> Result<Self, StorageError> {
        let document = match load_document(&store)? {
            Some(document) => document,
            None => {
                log::info!("starting with an empty document");
                Document::new()
            }
        };

        Ok(Self {
            document,
            history: History::new(),
            settings,
            store,
            dirty: false,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Whether content changed since opening or the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The placeholder shows while the document is a single empty
    /// unstyled block
    pub fn show_placeholder(&self) -> bool {
        let blocks = self.document.blocks();
        blocks.len() == 1 && blocks[0].is_empty() && blocks[0].block_type().is_unstyled()
    }

    /// Apply a command and record it for undo
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let before = DocumentState::capture(&self.document);
        let patch = self.document.apply(cmd);
        if patch.changes_content() {
            self.dirty = true;
        }
        self.history.record(before, &patch);
        patch
    }

    /// Type text at the cursor in the current inline style
    pub fn insert_text(&mut self, text: &str) -> Patch {
        self.apply(Cmd::InsertText {
            text: text.to_string(),
        })
    }

    /// Return key: expand a line shortcut if the current line has one, then
    /// break the line
    pub fn handle_return(&mut self) -> HandleResult {
        let plan = plan_return(&self.document);
        if let Some(ShortcutRule { prefix, style }) = plan.rule {
            log::info!("applied shortcut {prefix:?} as {style}");
        }
        for cmd in plan.commands {
            self.apply(cmd);
        }
        HandleResult::Handled
    }

    /// Write the document to the store under the editor content key
    pub fn save(&mut self) -> Result<SaveAck, StorageError> {
        save_document(&mut self.store, &self.document)?;
        self.dirty = false;
        Ok(SaveAck {
            message: SAVE_ACK_MESSAGE,
            blocks: self.document.blocks().len(),
        })
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.document);
        if undone {
            self.dirty = true;
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.document);
        if redone {
            self.dirty = true;
        }
        redone
    }

    /// Resolve a key press through the key binding and run the command
    pub fn handle_key(&mut self, press: &KeyPress) -> Result<KeyOutcome, StorageError> {
        match key_binding(press) {
            Some(command) => self.handle_key_command(command),
            None => {
                log::trace!("unbound key {press:?}");
                Ok(KeyOutcome::NotHandled)
            }
        }
    }

    /// Run a named command
    pub fn handle_key_command(
        &mut self,
        command: EditorCommand,
    ) -> Result<KeyOutcome, StorageError> {
        log::debug!("command {command}");
        let outcome = match command {
            EditorCommand::Save => return self.save().map(KeyOutcome::Saved),
            EditorCommand::Return => self.handle_return().into(),
            EditorCommand::InsertChar(c) => {
                self.insert_text(c.encode_utf8(&mut [0; 4]));
                KeyOutcome::Handled
            }
            EditorCommand::Backspace => {
                self.apply(Cmd::DeleteBackward);
                KeyOutcome::Handled
            }
            EditorCommand::Delete => {
                self.apply(Cmd::DeleteForward);
                KeyOutcome::Handled
            }
            EditorCommand::ToggleStyle(style) => {
                self.apply(Cmd::ToggleInlineStyle(style));
                KeyOutcome::Handled
            }
            EditorCommand::Move(movement) => {
                self.apply(Cmd::MoveCursor(movement));
                KeyOutcome::Handled
            }
            EditorCommand::Undo => {
                self.undo();
                KeyOutcome::Handled
            }
            EditorCommand::Redo => {
                self.redo();
                KeyOutcome::Handled
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{BlockKey, ContentBlock, InlineStyle, Movement, StyleSet};
    use crate::io::{EDITOR_CONTENT_KEY, MemoryStore};
    use crate::keys::{Key, Modifiers};
    use crate::tests::key_presses;
    use pretty_assertions::assert_eq;

    fn empty_editor() -> Editor<MemoryStore> {
        Editor::open(MemoryStore::new(), EditorSettings::default()).unwrap()
    }

    fn type_keys(editor: &mut Editor<MemoryStore>, text: &str) {
        for press in key_presses(text) {
            editor.handle_key(&press).unwrap();
        }
    }

    #[test]
    fn test_open_empty_store() {
        let editor = empty_editor();

        assert_eq!(editor.document().blocks().len(), 1);
        assert!(editor.show_placeholder());
        assert!(!editor.is_dirty());
        assert_eq!(editor.settings().placeholder, "Start writing here");
    }

    #[test]
    fn test_open_restores_saved_document() {
        let mut store = MemoryStore::new();
        let doc = Document::from_blocks(vec![ContentBlock::styled(
            BlockKey::new("saved"),
            "Saved",
            &StyleSet::new().with(InlineStyle::Bold),
        )]);
        save_document(&mut store, &doc).unwrap();

        let editor = Editor::open(store, EditorSettings::default()).unwrap();

        assert_eq!(editor.document().blocks(), doc.blocks());
        assert_eq!(editor.document().selection().start().offset, 0);
        assert!(!editor.show_placeholder());
    }

    #[test]
    fn test_open_malformed_store_fails() {
        let mut store = MemoryStore::new();
        store.set_item(EDITOR_CONTENT_KEY, "not json").unwrap();

        let result = Editor::open(store, EditorSettings::default());

        assert!(matches!(
            result,
            Err(StorageError::MalformedSnapshot { .. })
        ));
    }

    #[test]
    fn test_typing_hides_placeholder() {
        let mut editor = empty_editor();

        type_keys(&mut editor, "a");

        assert!(!editor.show_placeholder());
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_empty_second_block_hides_placeholder() {
        let mut editor = empty_editor();

        editor.handle_return();

        assert!(!editor.show_placeholder());
    }

    #[test]
    fn test_heading_shortcut_through_keys() {
        let mut editor = empty_editor();
        type_keys(&mut editor, "# Title");

        let outcome = editor.handle_key(&KeyPress::plain(Key::Enter)).unwrap();

        assert_eq!(outcome, KeyOutcome::Handled);
        let blocks = editor.document().blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text(), "Title");
        assert!(
            blocks[0]
                .styles()
                .iter()
                .all(|set| set.contains(&InlineStyle::HeaderOne))
        );
        assert_eq!(blocks[1].text(), "");
        assert!(editor.document().current_inline_style().is_empty());
    }

    #[test]
    fn test_typing_after_shortcut_is_unstyled() {
        let mut editor = empty_editor();
        type_keys(&mut editor, "* loud");
        editor.handle_return();

        type_keys(&mut editor, "quiet");

        let blocks = editor.document().blocks();
        assert_eq!(blocks[1].text(), "quiet");
        assert!(blocks[1].styles().iter().all(StyleSet::is_empty));
    }

    #[test]
    fn test_plain_return_after_bold_resets_style() {
        let mut editor = empty_editor();
        editor.handle_key(&KeyPress::ctrl(Key::Char('b'))).unwrap();
        type_keys(&mut editor, "bold");

        editor.handle_return();
        type_keys(&mut editor, "x");

        let blocks = editor.document().blocks();
        assert!(blocks[0].style_at(0).unwrap().contains(&InlineStyle::Bold));
        assert!(blocks[1].style_at(0).unwrap().is_empty());
    }

    #[test]
    fn test_ctrl_enter_saves() {
        let mut editor = empty_editor();
        type_keys(&mut editor, "hello");

        let press = KeyPress::new(Key::Enter, Modifiers::CTRL);
        let outcome = editor.handle_key(&press).unwrap();

        assert_eq!(
            outcome,
            KeyOutcome::Saved(SaveAck {
                message: SAVE_ACK_MESSAGE,
                blocks: 1
            })
        );
        assert!(!editor.is_dirty());
        assert_eq!(editor.document().blocks().len(), 1);
        let stored = editor.store().get_item(EDITOR_CONTENT_KEY).unwrap();
        assert!(stored.unwrap().contains("\"text\":\"hello\""));
    }

    #[test]
    fn test_ctrl_enter_matches_save() {
        let mut by_key = empty_editor();
        let mut by_button = empty_editor();
        type_keys(&mut by_key, "same text");
        type_keys(&mut by_button, "same text");

        by_key
            .handle_key(&KeyPress::ctrl(Key::Enter))
            .unwrap();
        by_button.save().unwrap();

        let saved = |editor: &Editor<MemoryStore>| {
            let json = editor.store().get_item(EDITOR_CONTENT_KEY).unwrap().unwrap();
            let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
            // Keys are random per editor
            value["blocks"][0]["key"] = serde_json::Value::Null;
            value
        };
        assert_eq!(saved(&by_key), saved(&by_button));
    }

    #[test]
    fn test_undo_shortcut_in_two_steps() {
        let mut editor = empty_editor();
        type_keys(&mut editor, "# Title");
        editor.handle_return();

        assert!(editor.undo());
        let blocks = editor.document().blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "Title");
        assert!(blocks[0].style_at(0).unwrap().contains(&InlineStyle::HeaderOne));

        assert!(editor.undo());
        let blocks = editor.document().blocks();
        assert_eq!(blocks[0].text(), "# Title");
        assert!(blocks[0].style_at(0).unwrap().is_empty());

        assert!(editor.redo());
        assert_eq!(editor.document().blocks()[0].text(), "Title");
    }

    #[test]
    fn test_undo_redo_through_keys() {
        let mut editor = empty_editor();
        type_keys(&mut editor, "word");

        editor.handle_key(&KeyPress::ctrl(Key::Char('z'))).unwrap();
        assert_eq!(editor.document().plain_text(), "");
        assert!(editor.can_redo());

        editor.handle_key(&KeyPress::ctrl(Key::Char('y'))).unwrap();
        assert_eq!(editor.document().plain_text(), "word");
    }

    #[test]
    fn test_unbound_key_not_handled() {
        let mut editor = empty_editor();

        let outcome = editor.handle_key(&KeyPress::plain(Key::Escape)).unwrap();

        assert_eq!(outcome, KeyOutcome::NotHandled);
        assert_eq!(editor.document().version(), 0);
    }

    #[test]
    fn test_backspace_and_movement_keys() {
        let mut editor = empty_editor();
        type_keys(&mut editor, "abc");

        editor.handle_key(&KeyPress::plain(Key::Left)).unwrap();
        editor.handle_key(&KeyPress::plain(Key::Backspace)).unwrap();

        assert_eq!(editor.document().plain_text(), "ac");

        editor
            .handle_key_command(EditorCommand::Move(Movement::LineEnd))
            .unwrap();
        editor.handle_key(&KeyPress::plain(Key::Delete)).unwrap();
        assert_eq!(editor.document().plain_text(), "ac");
    }

    #[test]
    fn test_save_leaves_document_untouched() {
        let mut editor = empty_editor();
        type_keys(&mut editor, "text");
        let before = editor.document().clone();

        editor.save().unwrap();

        assert_eq!(editor.document(), &before);
        assert_eq!(editor.into_store().len(), 1);
    }
}
