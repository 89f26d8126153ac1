//! Raw representation of a document for storage.
//!
//! The JSON shape is the block/inline-style-range layout used by the saved
//! `editorContent` values:
//!
//! ```json
//! {"blocks":[{"key":"a1b2c","text":"Title","type":"unstyled","depth":0,
//!   "inlineStyleRanges":[{"offset":0,"length":5,"style":"header-one"}],
//!   "entityRanges":[],"data":{}}],"entityMap":{}}
//! ```
//!
//! Offsets and lengths count UTF-16 code units. Entities and block data are
//! accepted and dropped on load and always written empty.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::editing::{BlockKey, BlockType, ContentBlock, Document, InlineStyle, StyleSet};

#[derive(Debug, thiserror::Error)]
pub enum RawError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("style range {offset}+{length} is outside block {block}")]
    StyleRangeOutOfBounds {
        block: String,
        offset: usize,
        length: usize,
    },
    #[error("block key {0} is used more than once")]
    DuplicateBlockKey(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContentState {
    pub blocks: Vec<RawBlock>,
    #[serde(default)]
    pub entity_map: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub key: String,
    pub text: String,
    #[serde(rename = "type", default = "unstyled")]
    pub block_type: String,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawInlineStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<Value>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

fn unstyled() -> String {
    BlockType::UNSTYLED.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInlineStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: InlineStyle,
}

impl RawContentState {
    pub fn to_json(&self) -> Result<String, RawError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RawError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Describe a document's blocks and style ranges
pub fn convert_to_raw(doc: &Document) -> RawContentState {
    RawContentState {
        blocks: doc.blocks().iter().map(encode_block).collect(),
        entity_map: BTreeMap::new(),
    }
}

/// Rebuild a document from its raw description. The cursor starts at the
/// beginning of the first block.
pub fn convert_from_raw(raw: &RawContentState) -> Result<Document, RawError> {
    let mut seen = HashSet::new();
    let mut blocks = Vec::with_capacity(raw.blocks.len());

    for raw_block in &raw.blocks {
        if !seen.insert(raw_block.key.as_str()) {
            return Err(RawError::DuplicateBlockKey(raw_block.key.clone()));
        }
        blocks.push(decode_block(raw_block)?);
    }

    Ok(Document::from_blocks(blocks))
}

fn encode_block(block: &ContentBlock) -> RawBlock {
    RawBlock {
        key: block.key().to_string(),
        text: block.text().to_string(),
        block_type: block.block_type().as_str().to_string(),
        depth: block.depth(),
        inline_style_ranges: encode_style_ranges(block),
        entity_ranges: Vec::new(),
        data: Map::new(),
    }
}

/// One range per maximal run of each style, styles in order of first
/// appearance
fn encode_style_ranges(block: &ContentBlock) -> Vec<RawInlineStyleRange> {
    let utf16_starts = utf16_offsets(block.text());

    let mut styles: Vec<&InlineStyle> = Vec::new();
    for set in block.styles() {
        for style in set {
            if !styles.contains(&style) {
                styles.push(style);
            }
        }
    }

    let mut ranges = Vec::new();
    for style in styles {
        let mut run_start: Option<usize> = None;
        for (offset, set) in block.styles().iter().enumerate() {
            match (set.contains(style), run_start) {
                (true, None) => run_start = Some(offset),
                (false, Some(start)) => {
                    ranges.push(utf16_range(&utf16_starts, start, offset, style));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            ranges.push(utf16_range(&utf16_starts, start, block.len(), style));
        }
    }
    ranges
}

fn utf16_range(
    utf16_starts: &[usize],
    start: usize,
    end: usize,
    style: &InlineStyle,
) -> RawInlineStyleRange {
    RawInlineStyleRange {
        offset: utf16_starts[start],
        length: utf16_starts[end] - utf16_starts[start],
        style: style.clone(),
    }
}

/// UTF-16 offset of every character boundary, including the end of text
fn utf16_offsets(text: &str) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(text.len() + 1);
    let mut position = 0;
    offsets.push(position);
    for c in text.chars() {
        position += c.len_utf16();
        offsets.push(position);
    }
    offsets
}

fn decode_block(raw: &RawBlock) -> Result<ContentBlock, RawError> {
    let utf16_starts = utf16_offsets(&raw.text);
    let char_count = utf16_starts.len() - 1;
    let mut styles = vec![StyleSet::new(); char_count];

    for range in &raw.inline_style_ranges {
        let out_of_bounds = || RawError::StyleRangeOutOfBounds {
            block: raw.key.clone(),
            offset: range.offset,
            length: range.length,
        };
        let end = range.offset.checked_add(range.length).ok_or_else(out_of_bounds)?;
        let start_char = utf16_starts
            .binary_search(&range.offset)
            .map_err(|_| out_of_bounds())?;
        let end_char = utf16_starts
            .binary_search(&end)
            .map_err(|_| out_of_bounds())?;

        for set in &mut styles[start_char..end_char] {
            set.insert(range.style.clone());
        }
    }

    Ok(ContentBlock::from_parts(
        BlockKey::new(raw.key.clone()),
        BlockType::new(raw.block_type.clone()),
        raw.depth,
        raw.text.clone(),
        styles,
    ))
}
