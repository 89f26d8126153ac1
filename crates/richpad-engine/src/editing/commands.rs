use std::ops::Range;

use crate::editing::{BlockKey, Document, InlineStyle, Position, Selection, StyleSet};

/// Cursor movements. All of them collapse the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

/// What kind of change a command made. Drives undo grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    InsertCharacters,
    ChangeInlineStyle,
    SplitBlock,
    BackspaceCharacter,
    DeleteCharacter,
    RemoveRange,
    SelectionChange,
    StyleOverride,
}

impl ChangeType {
    pub fn changes_content(self) -> bool {
        !matches!(self, ChangeType::SelectionChange | ChangeType::StyleOverride)
    }
}

/// Edit commands understood by [`Document::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Replace the selection with text in the current inline style.
    /// Newlines in `text` start new blocks.
    InsertText { text: String },
    /// Replace a block's whole text with uniformly styled text and put the
    /// cursor at its end
    ReplaceBlockText {
        key: BlockKey,
        text: String,
        style: StyleSet,
    },
    /// Delete the selection and split the block at the cursor
    SplitBlock,
    DeleteBackward,
    DeleteForward,
    ToggleInlineStyle(InlineStyle),
    SetInlineStyleOverride(StyleSet),
    MoveCursor(Movement),
    SetSelection(Selection),
}

pub(crate) struct Applied {
    pub changed: Vec<BlockKey>,
    pub change_type: ChangeType,
}

impl Applied {
    fn new(changed: Vec<BlockKey>, change_type: ChangeType) -> Self {
        Self {
            changed,
            change_type,
        }
    }
}

/// Apply a command in place. Every command clears the inline style
/// override except the ones that set it.
pub(crate) fn apply_command(doc: &mut Document, cmd: Cmd) -> Applied {
    let current_style = doc.current_inline_style();
    doc.inline_style_override = None;

    match cmd {
        Cmd::InsertText { text } => insert_text(doc, &text, &current_style),
        Cmd::ReplaceBlockText { key, text, style } => {
            let Some(index) = doc.block_index(&key) else {
                return Applied::new(Vec::new(), ChangeType::ChangeInlineStyle);
            };
            doc.blocks[index].replace_text(&text, &style);
            let end = doc.blocks[index].len();
            doc.selection = Selection::collapsed(Position::new(key.clone(), end));
            Applied::new(vec![key], ChangeType::ChangeInlineStyle)
        }
        Cmd::SplitBlock => {
            let mut changed = remove_selection(doc);
            let original = doc.selection.start().key.clone();
            let created = split_at_cursor(doc);
            push_unique(&mut changed, original);
            push_unique(&mut changed, created);
            Applied::new(changed, ChangeType::SplitBlock)
        }
        Cmd::DeleteBackward => delete_backward(doc),
        Cmd::DeleteForward => delete_forward(doc),
        Cmd::ToggleInlineStyle(style) => {
            if doc.selection.is_collapsed() {
                doc.inline_style_override = Some(current_style.toggled(&style));
                Applied::new(Vec::new(), ChangeType::StyleOverride)
            } else {
                toggle_range_style(doc, &style)
            }
        }
        Cmd::SetInlineStyleOverride(style) => {
            doc.inline_style_override = Some(style);
            Applied::new(Vec::new(), ChangeType::StyleOverride)
        }
        Cmd::MoveCursor(movement) => {
            let position = moved_position(doc, movement);
            doc.selection = Selection::collapsed(position);
            Applied::new(Vec::new(), ChangeType::SelectionChange)
        }
        Cmd::SetSelection(selection) => {
            doc.selection = doc.normalize_selection(selection);
            Applied::new(Vec::new(), ChangeType::SelectionChange)
        }
    }
}

fn push_unique(keys: &mut Vec<BlockKey>, key: BlockKey) {
    if !keys.contains(&key) {
        keys.push(key);
    }
}

fn insert_text(doc: &mut Document, text: &str, style: &StyleSet) -> Applied {
    let mut changed = remove_selection(doc);

    for (line_number, line) in text.split('\n').enumerate() {
        if line_number > 0 {
            let created = split_at_cursor(doc);
            push_unique(&mut changed, created);
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            continue;
        }

        let index = doc.start_block_index();
        let offset = doc.selection.start().offset;
        doc.blocks[index].insert(offset, line, style);

        let key = doc.blocks[index].key().clone();
        let new_offset = offset + line.chars().count();
        doc.selection = Selection::collapsed(Position::new(key.clone(), new_offset));
        push_unique(&mut changed, key);
    }

    Applied::new(changed, ChangeType::InsertCharacters)
}

/// Delete the selected range, merging the first and last block when it
/// spans several. Leaves a collapsed cursor at the old start.
fn remove_selection(doc: &mut Document) -> Vec<BlockKey> {
    if doc.selection.is_collapsed() {
        return Vec::new();
    }

    let start = doc.selection.start().clone();
    let end = doc.selection.end().clone();
    let start_index = doc.start_block_index();
    let end_index = doc.end_block_index();

    let mut changed = vec![start.key.clone()];
    if start_index == end_index {
        doc.blocks[start_index].remove(start.offset..end.offset);
    } else {
        let tail = doc.blocks[end_index].split_off(end.offset, end.key.clone());
        let start_len = doc.blocks[start_index].len();
        doc.blocks[start_index].remove(start.offset..start_len);
        doc.blocks[start_index].append(tail);
        changed.extend(
            doc.blocks
                .drain(start_index + 1..=end_index)
                .map(|block| block.key().clone()),
        );
    }

    doc.selection = Selection::collapsed(start);
    changed
}

/// Split the cursor's block in two and move the cursor to the start of the
/// new block. Returns the new block's key.
fn split_at_cursor(doc: &mut Document) -> BlockKey {
    let index = doc.start_block_index();
    let offset = doc.selection.start().offset;
    let key = doc.generate_key();

    let below = doc.blocks[index].split_off(offset, key.clone());
    doc.blocks.insert(index + 1, below);
    doc.selection = Selection::collapsed(Position::new(key.clone(), 0));
    key
}

fn delete_backward(doc: &mut Document) -> Applied {
    if !doc.selection.is_collapsed() {
        return Applied::new(remove_selection(doc), ChangeType::RemoveRange);
    }

    let index = doc.start_block_index();
    let offset = doc.selection.start().offset;
    let key = doc.blocks[index].key().clone();

    if offset > 0 {
        doc.blocks[index].remove(offset - 1..offset);
        doc.selection = Selection::collapsed(Position::new(key.clone(), offset - 1));
        Applied::new(vec![key], ChangeType::BackspaceCharacter)
    } else if index > 0 {
        let removed = doc.blocks.remove(index);
        let previous = &mut doc.blocks[index - 1];
        let join_at = previous.len();
        previous.append(removed);
        let previous_key = previous.key().clone();
        doc.selection = Selection::collapsed(Position::new(previous_key.clone(), join_at));
        Applied::new(vec![previous_key, key], ChangeType::BackspaceCharacter)
    } else {
        Applied::new(Vec::new(), ChangeType::BackspaceCharacter)
    }
}

fn delete_forward(doc: &mut Document) -> Applied {
    if !doc.selection.is_collapsed() {
        return Applied::new(remove_selection(doc), ChangeType::RemoveRange);
    }

    let index = doc.start_block_index();
    let offset = doc.selection.start().offset;
    let key = doc.blocks[index].key().clone();

    if offset < doc.blocks[index].len() {
        doc.blocks[index].remove(offset..offset + 1);
        Applied::new(vec![key], ChangeType::DeleteCharacter)
    } else if index + 1 < doc.blocks.len() {
        let removed = doc.blocks.remove(index + 1);
        let removed_key = removed.key().clone();
        doc.blocks[index].append(removed);
        Applied::new(vec![key, removed_key], ChangeType::DeleteCharacter)
    } else {
        Applied::new(Vec::new(), ChangeType::DeleteCharacter)
    }
}

/// Character ranges covered by the selection, per block index
fn selected_ranges(doc: &Document) -> Vec<(usize, Range<usize>)> {
    let start_index = doc.start_block_index();
    let end_index = doc.end_block_index();

    (start_index..=end_index)
        .map(|index| {
            let from = if index == start_index {
                doc.selection.start().offset
            } else {
                0
            };
            let to = if index == end_index {
                doc.selection.end().offset
            } else {
                doc.blocks[index].len()
            };
            (index, from..to)
        })
        .collect()
}

fn toggle_range_style(doc: &mut Document, style: &InlineStyle) -> Applied {
    let ranges = selected_ranges(doc);
    let all_styled = ranges.iter().all(|(index, range)| {
        doc.blocks[*index].styles()[range.clone()]
            .iter()
            .all(|set| set.contains(style))
    });

    let mut changed = Vec::new();
    for (index, range) in ranges {
        if range.is_empty() {
            continue;
        }
        doc.blocks[index].set_style(range, style, !all_styled);
        changed.push(doc.blocks[index].key().clone());
    }

    Applied::new(changed, ChangeType::ChangeInlineStyle)
}

fn moved_position(doc: &Document, movement: Movement) -> Position {
    let collapsed = doc.selection.is_collapsed();
    let (index, offset) = match movement {
        Movement::Left | Movement::Up => (doc.start_block_index(), doc.selection.start().offset),
        _ => (doc.end_block_index(), doc.selection.end().offset),
    };
    let block = &doc.blocks[index];
    let last = doc.blocks.len() - 1;
    let at = |index: usize, offset: usize| Position::new(doc.blocks[index].key().clone(), offset);

    match movement {
        // With a range selected, left/right just collapse to its edge
        Movement::Left | Movement::Right if !collapsed => at(index, offset),
        Movement::Left if offset > 0 => at(index, offset - 1),
        Movement::Left if index > 0 => at(index - 1, doc.blocks[index - 1].len()),
        Movement::Left => at(index, 0),
        Movement::Right if offset < block.len() => at(index, offset + 1),
        Movement::Right if index < last => at(index + 1, 0),
        Movement::Right => at(index, block.len()),
        Movement::Up if index > 0 => at(index - 1, offset.min(doc.blocks[index - 1].len())),
        Movement::Up => at(index, 0),
        Movement::Down if index < last => at(index + 1, offset.min(doc.blocks[index + 1].len())),
        Movement::Down => at(index, block.len()),
        Movement::LineStart => at(index, 0),
        Movement::LineEnd => at(index, block.len()),
        Movement::DocumentStart => at(0, 0),
        Movement::DocumentEnd => at(last, doc.blocks[last].len()),
    }
}
