/*!
 * # Editing Core Module
 *
 * The in-memory rich-text model the editor works on.
 *
 * ## Architecture Overview
 *
 * ### 1. Blocks With Per-Character Styles
 * - A **`Document`** is an ordered list of **`ContentBlock`**s, one per line
 * - Each block stores its text and one **`StyleSet`** per character, so
 *   splitting, joining and deleting never have to rewrite style ranges
 * - Range-based views (`style_runs`, the raw storage format) are derived on
 *   demand
 *
 * ### 2. Command-Based Editing
 * - Every edit is a **`Cmd`** applied through `Document::apply`
 * - Applying returns a **`Patch`** with the changed blocks, the new
 *   selection, the new version and the kind of change
 * - **`History`** records whole-document states between commands for
 *   undo/redo, merging runs of typed characters
 *
 * ### 3. Inline Style Override
 * - The style of the next typed character normally follows the character
 *   before the cursor
 * - An explicit override (set by a style toggle on a collapsed cursor, or
 *   cleared to empty after a line break) takes precedence until the next
 *   command
 *
 * ### 4. Line Shortcuts
 * - **`shortcuts`** turns the return key into a **`ReturnPlan`**: restyle the
 *   current line if it starts with a known prefix, split it, reset the
 *   override
 *
 * ## Module Structure
 *
 * - **`document`**: `Document`, `ContentBlock`, keys, positions, selection
 * - **`commands`**: `Cmd` enum and how each command mutates a document
 * - **`style`**: inline styles, style sets and the style map
 * - **`shortcuts`**: return-key shortcut rules
 * - **`history`**: undo/redo stacks
 * - **`patch`**: edit result metadata
 *
 * ## Usage Pattern
 *
 * ```rust
 * use richpad_engine::editing::*;
 *
 * let mut doc = Document::new();
 * doc.apply(Cmd::InsertText { text: "# Title".to_string() });
 *
 * for cmd in plan_return(&doc).commands {
 *     doc.apply(cmd);
 * }
 *
 * assert_eq!(doc.blocks()[0].text(), "Title");
 * assert!(doc.blocks()[0].style_at(0).unwrap().contains(&InlineStyle::HeaderOne));
 * assert!(doc.current_inline_style().is_empty());
 * ```
 */

pub mod commands;
pub mod document;
pub mod history;
pub mod patch;
pub mod shortcuts;
pub mod style;

pub use commands::{ChangeType, Cmd, Movement};
pub use document::{BlockKey, BlockType, ContentBlock, Document, Position, Selection, StyleRun};
pub use history::{DocumentState, History};
pub use patch::Patch;
pub use shortcuts::{
    ReturnPlan, SHORTCUT_RULES, ShortcutMatch, ShortcutRule, match_shortcut, plan_return,
    rules_longest_first,
};
pub use style::{
    FontFamily, FontStyle, FontWeight, InlineStyle, Rgb, StyleMap, StyleSet, TextDecoration,
    VisualStyle,
};
