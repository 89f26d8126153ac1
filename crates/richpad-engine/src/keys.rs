//! Key presses and the commands they are bound to

use std::fmt;

use crate::editing::{InlineStyle, Movement};

/// Modifier keys as a bitfield
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Super elsewhere

    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= Self::CTRL.0;
        }
        if shift {
            bits |= Self::SHIFT.0;
        }
        if alt {
            bits |= Self::ALT.0;
        }
        if meta {
            bits |= Self::META.0;
        }
        Modifiers(bits)
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & Self::CTRL.0 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & Self::ALT.0 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & Self::META.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether the command key is held. Terminals on every platform deliver
    /// Ctrl, and some also report Cmd/Super, so either counts.
    #[inline]
    pub const fn has_command(self) -> bool {
        self.ctrl() || self.meta()
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

/// A single keystroke: a key with modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub const fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub const fn ctrl(key: Key) -> Self {
        Self::new(key, Modifiers::CTRL)
    }
}

/// Named editor commands a key press can resolve to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    Save,
    Return,
    InsertChar(char),
    Backspace,
    Delete,
    ToggleStyle(InlineStyle),
    Undo,
    Redo,
    Move(Movement),
}

impl EditorCommand {
    pub fn name(&self) -> &'static str {
        match self {
            EditorCommand::Save => "editor-save",
            EditorCommand::Return => "split-block",
            EditorCommand::InsertChar(_) => "insert-characters",
            EditorCommand::Backspace => "backspace",
            EditorCommand::Delete => "delete",
            EditorCommand::ToggleStyle(InlineStyle::Bold) => "bold",
            EditorCommand::ToggleStyle(InlineStyle::Italic) => "italic",
            EditorCommand::ToggleStyle(InlineStyle::Underline) => "underline",
            EditorCommand::ToggleStyle(InlineStyle::Code) => "code",
            EditorCommand::ToggleStyle(_) => "toggle-style",
            EditorCommand::Undo => "undo",
            EditorCommand::Redo => "redo",
            EditorCommand::Move(_) => "move-selection",
        }
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Editing gestures every editor understands: typing, deleting, moving,
/// the toolbar styles and undo/redo.
pub fn default_key_binding(press: &KeyPress) -> Option<EditorCommand> {
    let mods = press.modifiers;

    if mods.has_command() {
        let command = match press.key {
            Key::Char(c) => match c.to_ascii_lowercase() {
                'b' => EditorCommand::ToggleStyle(InlineStyle::Bold),
                'i' => EditorCommand::ToggleStyle(InlineStyle::Italic),
                'u' => EditorCommand::ToggleStyle(InlineStyle::Underline),
                'j' => EditorCommand::ToggleStyle(InlineStyle::Code),
                'z' if mods.shift() => EditorCommand::Redo,
                'z' => EditorCommand::Undo,
                'y' => EditorCommand::Redo,
                _ => return None,
            },
            Key::Home => EditorCommand::Move(Movement::DocumentStart),
            Key::End => EditorCommand::Move(Movement::DocumentEnd),
            _ => return None,
        };
        return Some(command);
    }

    let command = match press.key {
        Key::Char(c) if !mods.alt() => EditorCommand::InsertChar(c),
        Key::Enter => EditorCommand::Return,
        Key::Backspace => EditorCommand::Backspace,
        Key::Delete => EditorCommand::Delete,
        Key::Left => EditorCommand::Move(Movement::Left),
        Key::Right => EditorCommand::Move(Movement::Right),
        Key::Up => EditorCommand::Move(Movement::Up),
        Key::Down => EditorCommand::Move(Movement::Down),
        Key::Home => EditorCommand::Move(Movement::LineStart),
        Key::End => EditorCommand::Move(Movement::LineEnd),
        _ => return None,
    };
    Some(command)
}

/// The editor's key binding: Ctrl+Enter saves, everything else falls back
/// to [`default_key_binding`].
pub fn key_binding(press: &KeyPress) -> Option<EditorCommand> {
    if press.key == Key::Enter && press.modifiers.has_command() {
        return Some(EditorCommand::Save);
    }
    default_key_binding(press)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_ctrl_enter_is_save() {
        let command = key_binding(&KeyPress::ctrl(Key::Enter));
        assert_eq!(command, Some(EditorCommand::Save));
        assert_eq!(command.unwrap().name(), "editor-save");
    }

    #[test]
    fn test_cmd_enter_is_save() {
        let press = KeyPress::new(Key::Enter, Modifiers::META);
        assert_eq!(key_binding(&press), Some(EditorCommand::Save));
    }

    #[test]
    fn test_plain_enter_is_return() {
        assert_eq!(
            key_binding(&KeyPress::plain(Key::Enter)),
            Some(EditorCommand::Return)
        );
    }

    #[test]
    fn test_shift_enter_is_still_return() {
        let press = KeyPress::new(Key::Enter, Modifiers::SHIFT);
        assert_eq!(key_binding(&press), Some(EditorCommand::Return));
    }

    #[rstest]
    #[case('b', InlineStyle::Bold)]
    #[case('i', InlineStyle::Italic)]
    #[case('u', InlineStyle::Underline)]
    #[case('j', InlineStyle::Code)]
    #[case('B', InlineStyle::Bold)]
    fn test_style_shortcuts(#[case] c: char, #[case] style: InlineStyle) {
        let command = key_binding(&KeyPress::ctrl(Key::Char(c)));
        assert_eq!(command, Some(EditorCommand::ToggleStyle(style)));
    }

    #[test]
    fn test_undo_redo_bindings() {
        assert_eq!(
            key_binding(&KeyPress::ctrl(Key::Char('z'))),
            Some(EditorCommand::Undo)
        );
        assert_eq!(
            key_binding(&KeyPress::new(
                Key::Char('z'),
                Modifiers::CTRL | Modifiers::SHIFT
            )),
            Some(EditorCommand::Redo)
        );
        assert_eq!(
            key_binding(&KeyPress::ctrl(Key::Char('y'))),
            Some(EditorCommand::Redo)
        );
    }

    #[test]
    fn test_printable_chars_insert() {
        assert_eq!(
            key_binding(&KeyPress::plain(Key::Char('x'))),
            Some(EditorCommand::InsertChar('x'))
        );
        // Shift only changes which character arrives
        assert_eq!(
            key_binding(&KeyPress::new(Key::Char('X'), Modifiers::SHIFT)),
            Some(EditorCommand::InsertChar('X'))
        );
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(key_binding(&KeyPress::ctrl(Key::Char('q'))), None);
        assert_eq!(key_binding(&KeyPress::plain(Key::Escape)), None);
        assert_eq!(key_binding(&KeyPress::plain(Key::Tab)), None);
        assert_eq!(
            key_binding(&KeyPress::new(Key::Char('x'), Modifiers::ALT)),
            None
        );
    }

    #[test]
    fn test_modifier_flags() {
        let mods = Modifiers::new(true, true, false, false);
        assert!(mods.ctrl());
        assert!(mods.shift());
        assert!(!mods.alt());
        assert!(mods.has_command());
        assert!(Modifiers::NONE.is_empty());
    }
}
