use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::editing::{Cmd, Patch, StyleSet, commands};

/// Number of characters in a generated block key
const BLOCK_KEY_LEN: usize = 5;

/// Identifier of a block, unique within its document.
///
/// Keys are opaque to the editor. Freshly generated keys are short random
/// strings; keys loaded from storage are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn generate() -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        Self(id[..BLOCK_KEY_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Block type name as stored. This editor only creates `unstyled` blocks but
/// keeps whatever type a loaded block had.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockType(String);

impl BlockType {
    pub const UNSTYLED: &'static str = "unstyled";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn unstyled() -> Self {
        Self(Self::UNSTYLED.to_string())
    }

    pub fn is_unstyled(&self) -> bool {
        self.0 == Self::UNSTYLED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BlockType {
    fn default() -> Self {
        Self::unstyled()
    }
}

/// One line of the document: text plus one style set per character.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    key: BlockKey,
    block_type: BlockType,
    depth: u32,
    text: String,
    /// Invariant: `styles.len() == text.chars().count()`
    styles: Vec<StyleSet>,
}

/// A maximal run of characters sharing the same style set
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRun<'a> {
    /// Character range within the block
    pub range: Range<usize>,
    pub text: &'a str,
    pub styles: &'a StyleSet,
}

impl ContentBlock {
    /// Unstyled block with the given text
    pub fn new(key: BlockKey, text: &str) -> Self {
        Self::styled(key, text, &StyleSet::new())
    }

    /// Block whose characters all carry `style`
    pub fn styled(key: BlockKey, text: &str, style: &StyleSet) -> Self {
        let styles = vec![style.clone(); text.chars().count()];
        Self {
            key,
            block_type: BlockType::unstyled(),
            depth: 0,
            text: text.to_string(),
            styles,
        }
    }

    /// Build a block from per-character styles. `styles` must hold exactly
    /// one entry per character of `text`.
    pub(crate) fn from_parts(
        key: BlockKey,
        block_type: BlockType,
        depth: u32,
        text: String,
        styles: Vec<StyleSet>,
    ) -> Self {
        debug_assert_eq!(styles.len(), text.chars().count());
        Self {
            key,
            block_type,
            depth,
            text,
            styles,
        }
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn block_type(&self) -> &BlockType {
        &self.block_type
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Per-character styles, parallel to `text().chars()`
    pub fn styles(&self) -> &[StyleSet] {
        &self.styles
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn style_at(&self, offset: usize) -> Option<&StyleSet> {
        self.styles.get(offset)
    }

    /// Split the block into runs of identically styled characters
    pub fn style_runs(&self) -> Vec<StyleRun<'_>> {
        let mut runs = Vec::new();
        let mut run_start = 0;
        let mut run_byte_start = 0;

        for (offset, (byte_index, _)) in self.text.char_indices().enumerate() {
            if offset > 0 && self.styles[offset] != self.styles[run_start] {
                runs.push(StyleRun {
                    range: run_start..offset,
                    text: &self.text[run_byte_start..byte_index],
                    styles: &self.styles[run_start],
                });
                run_start = offset;
                run_byte_start = byte_index;
            }
        }

        if run_start < self.len() {
            runs.push(StyleRun {
                range: run_start..self.len(),
                text: &self.text[run_byte_start..],
                styles: &self.styles[run_start],
            });
        }

        runs
    }

    fn byte_index(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map(|(index, _)| index)
            .unwrap_or(self.text.len())
    }

    pub(crate) fn insert(&mut self, offset: usize, text: &str, style: &StyleSet) {
        let offset = offset.min(self.len());
        let byte_index = self.byte_index(offset);
        self.text.insert_str(byte_index, text);
        let inserted = std::iter::repeat_n(style.clone(), text.chars().count());
        self.styles.splice(offset..offset, inserted);
    }

    pub(crate) fn remove(&mut self, range: Range<usize>) {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        let byte_range = self.byte_index(start)..self.byte_index(end);
        self.text.replace_range(byte_range, "");
        self.styles.drain(start..end);
    }

    pub(crate) fn replace_text(&mut self, text: &str, style: &StyleSet) {
        self.text = text.to_string();
        self.styles = vec![style.clone(); text.chars().count()];
    }

    /// Cut everything from `offset` onwards into a new block with `key`.
    /// The new block keeps this block's type and depth.
    pub(crate) fn split_off(&mut self, offset: usize, key: BlockKey) -> ContentBlock {
        let offset = offset.min(self.len());
        let byte_index = self.byte_index(offset);
        let text = self.text.split_off(byte_index);
        let styles = self.styles.split_off(offset);
        ContentBlock {
            key,
            block_type: self.block_type.clone(),
            depth: self.depth,
            text,
            styles,
        }
    }

    /// Join `other`'s content onto the end of this block
    pub(crate) fn append(&mut self, other: ContentBlock) {
        self.text.push_str(&other.text);
        self.styles.extend(other.styles);
    }

    pub(crate) fn set_style(
        &mut self,
        range: Range<usize>,
        style: &crate::editing::InlineStyle,
        add: bool,
    ) {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        for set in &mut self.styles[start..end] {
            if add {
                set.insert(style.clone());
            } else {
                set.remove(style);
            }
        }
    }
}

/// A caret location: character offset within a block
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub key: BlockKey,
    pub offset: usize,
}

impl Position {
    pub fn new(key: BlockKey, offset: usize) -> Self {
        Self { key, offset }
    }
}

/// Selected range. Kept normalized by the document: `start` never comes
/// after `end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    start: Position,
    end: Position,
}

impl Selection {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn collapsed(position: Position) -> Self {
        Self {
            start: position.clone(),
            end: position,
        }
    }

    pub fn start(&self) -> &Position {
        &self.start
    }

    pub fn end(&self) -> &Position {
        &self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// The editable document: ordered blocks, selection and the inline style
/// override that the next typed characters will take.
///
/// All mutation goes through [`Document::apply`] with a [`Cmd`]; each
/// application bumps the version and yields a [`Patch`] describing what
/// changed. A document always holds at least one block and its selection
/// always points into existing blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) blocks: Vec<ContentBlock>,
    pub(crate) selection: Selection,
    pub(crate) inline_style_override: Option<StyleSet>,
    pub(crate) version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document: one empty block with the cursor in it
    pub fn new() -> Self {
        Self::from_blocks(Vec::new())
    }

    /// Document over existing blocks with the cursor at the start of the
    /// first one. An empty list yields a single empty block.
    pub fn from_blocks(mut blocks: Vec<ContentBlock>) -> Self {
        if blocks.is_empty() {
            blocks.push(ContentBlock::new(BlockKey::generate(), ""));
        }
        let selection = Selection::collapsed(Position::new(blocks[0].key.clone(), 0));
        Self {
            blocks,
            selection,
            inline_style_override: None,
            version: 0,
        }
    }

    /// One unstyled block per line of `text`
    pub fn from_plain_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.blocks.clear();
        for line in text.split('\n') {
            let key = doc.generate_key();
            doc.blocks.push(ContentBlock::new(key, line));
        }
        let first = doc.blocks[0].key.clone();
        doc.selection = Selection::collapsed(Position::new(first, 0));
        doc
    }

    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let applied = commands::apply_command(self, cmd);
        self.version += 1;

        Patch {
            changed: applied.changed,
            new_selection: self.selection.clone(),
            version: self.version,
            change_type: applied.change_type,
        }
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn block_for_key(&self, key: &BlockKey) -> Option<&ContentBlock> {
        self.blocks.iter().find(|block| &block.key == key)
    }

    pub fn block_index(&self, key: &BlockKey) -> Option<usize> {
        self.blocks.iter().position(|block| &block.key == key)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn inline_style_override(&self) -> Option<&StyleSet> {
        self.inline_style_override.as_ref()
    }

    /// The block holding the start of the selection
    pub fn current_block(&self) -> &ContentBlock {
        &self.blocks[self.start_block_index()]
    }

    /// Style the next typed character will get.
    ///
    /// The override wins when set. Otherwise a collapsed cursor takes the
    /// style of the character before it, falling back to the first
    /// character of its block and then to the last character of the closest
    /// non-empty block above. A range takes the style of its first
    /// character.
    pub fn current_inline_style(&self) -> StyleSet {
        if let Some(style_override) = &self.inline_style_override {
            return style_override.clone();
        }

        let start = &self.selection.start;
        let index = self.start_block_index();
        let block = &self.blocks[index];

        let style = if self.selection.is_collapsed() {
            if start.offset > 0 {
                block.style_at(start.offset - 1)
            } else if !block.is_empty() {
                block.style_at(0)
            } else {
                self.blocks[..index]
                    .iter()
                    .rev()
                    .find(|block| !block.is_empty())
                    .and_then(|block| block.style_at(block.len() - 1))
            }
        } else if start.offset < block.len() {
            block.style_at(start.offset)
        } else {
            self.blocks[index + 1..]
                .iter()
                .find(|block| !block.is_empty())
                .and_then(|block| block.style_at(0))
        };

        style.cloned().unwrap_or_default()
    }

    /// Block texts joined with newlines
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_text(&self) -> bool {
        self.blocks.iter().any(|block| !block.is_empty())
    }

    pub(crate) fn start_block_index(&self) -> usize {
        self.block_index(&self.selection.start.key).unwrap_or(0)
    }

    pub(crate) fn end_block_index(&self) -> usize {
        self.block_index(&self.selection.end.key)
            .unwrap_or_else(|| self.start_block_index())
    }

    /// Fresh key not used by any block of this document
    pub(crate) fn generate_key(&self) -> BlockKey {
        loop {
            let key = BlockKey::generate();
            if self.block_index(&key).is_none() {
                return key;
            }
        }
    }

    /// Point a position at an existing block and a valid offset
    pub(crate) fn clamp_position(&self, position: Position) -> Position {
        match self.block_for_key(&position.key) {
            Some(block) => Position::new(position.key, position.offset.min(block.len())),
            None => Position::new(self.blocks[0].key.clone(), 0),
        }
    }

    /// Clamp both ends and order them by document position
    pub(crate) fn normalize_selection(&self, selection: Selection) -> Selection {
        let a = self.clamp_position(selection.start);
        let b = self.clamp_position(selection.end);
        let rank = |position: &Position| (self.block_index(&position.key), position.offset);
        if rank(&a) <= rank(&b) {
            Selection::new(a, b)
        } else {
            Selection::new(b, a)
        }
    }
}
