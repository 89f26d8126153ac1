//! Translation of terminal key events into editor key presses

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use richpad_engine::{Key, KeyPress, Modifiers};

/// Actions the terminal front-end handles itself rather than the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    /// Save without Ctrl+Enter, for terminals that cannot report it
    Save,
}

pub fn app_action(event: &KeyEvent) -> Option<AppAction> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Esc => Some(AppAction::Quit),
        KeyCode::Char(c) if ctrl && c.eq_ignore_ascii_case(&'q') => Some(AppAction::Quit),
        KeyCode::Char(c) if ctrl && c.eq_ignore_ascii_case(&'s') => Some(AppAction::Save),
        _ => None,
    }
}

/// Convert a crossterm key event. Releases and repeats of non-character
/// keys are dropped, as are keys the editor has no name for.
pub fn to_key_press(event: &KeyEvent) -> Option<KeyPress> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };

    let mods = event.modifiers;
    let modifiers = Modifiers::new(
        mods.contains(KeyModifiers::CONTROL),
        mods.contains(KeyModifiers::SHIFT),
        mods.contains(KeyModifiers::ALT),
        mods.intersects(KeyModifiers::SUPER | KeyModifiers::META),
    );

    Some(KeyPress::new(key, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[rstest]
    #[case(KeyCode::Char('a'), KeyModifiers::NONE, Key::Char('a'), Modifiers::NONE)]
    #[case(KeyCode::Enter, KeyModifiers::CONTROL, Key::Enter, Modifiers::CTRL)]
    #[case(KeyCode::Enter, KeyModifiers::SUPER, Key::Enter, Modifiers::META)]
    #[case(KeyCode::Char('Z'), KeyModifiers::CONTROL | KeyModifiers::SHIFT, Key::Char('Z'), Modifiers::CTRL | Modifiers::SHIFT)]
    #[case(KeyCode::Home, KeyModifiers::CONTROL, Key::Home, Modifiers::CTRL)]
    fn test_to_key_press(
        #[case] code: KeyCode,
        #[case] mods: KeyModifiers,
        #[case] key: Key,
        #[case] modifiers: Modifiers,
    ) {
        assert_eq!(
            to_key_press(&event(code, mods)),
            Some(KeyPress::new(key, modifiers))
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(to_key_press(&release), None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        assert_eq!(
            to_key_press(&event(KeyCode::F(5), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn test_app_actions() {
        assert_eq!(
            app_action(&event(KeyCode::Esc, KeyModifiers::NONE)),
            Some(AppAction::Quit)
        );
        assert_eq!(
            app_action(&event(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Some(AppAction::Quit)
        );
        assert_eq!(
            app_action(&event(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(AppAction::Save)
        );
        assert_eq!(
            app_action(&event(KeyCode::Char('q'), KeyModifiers::NONE)),
            None
        );
    }
}
