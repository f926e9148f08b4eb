//! Keyboard bindings.

use crate::model::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style and arrow key bindings.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Only the key code and modifiers take part in the lookup; event kind
    /// and keyboard state flags are ignored.
    pub fn get(&self, key: KeyEvent) -> Option<Action> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    /// Label of the primary key for `action`, as shown in help bars.
    pub fn label(&self, action: Action) -> &'static str {
        match action {
            Action::PrevLine => "k",
            Action::NextLine => "j",
            Action::ScrollLeft => "h",
            Action::ScrollRight => "l",
            Action::FirstLine => "g",
            Action::LastLine => "G",
            Action::Select => "Enter",
            Action::NextView => "Tab",
            Action::Quit => "q",
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = [
            // Vim-style movement
            (KeyCode::Char('k'), KeyModifiers::NONE, Action::PrevLine),
            (KeyCode::Char('j'), KeyModifiers::NONE, Action::NextLine),
            (KeyCode::Char('h'), KeyModifiers::NONE, Action::ScrollLeft),
            (KeyCode::Char('l'), KeyModifiers::NONE, Action::ScrollRight),
            (KeyCode::Char('g'), KeyModifiers::NONE, Action::FirstLine),
            (KeyCode::Char('G'), KeyModifiers::SHIFT, Action::LastLine),
            // Arrow and navigation keys
            (KeyCode::Up, KeyModifiers::NONE, Action::PrevLine),
            (KeyCode::Down, KeyModifiers::NONE, Action::NextLine),
            (KeyCode::Left, KeyModifiers::NONE, Action::ScrollLeft),
            (KeyCode::Right, KeyModifiers::NONE, Action::ScrollRight),
            (KeyCode::Home, KeyModifiers::NONE, Action::FirstLine),
            (KeyCode::End, KeyModifiers::NONE, Action::LastLine),
            // Selection and focus
            (KeyCode::Enter, KeyModifiers::NONE, Action::Select),
            (KeyCode::Tab, KeyModifiers::NONE, Action::NextView),
            // Application
            (KeyCode::Char('q'), KeyModifiers::NONE, Action::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL, Action::Quit),
        ]
        .into_iter()
        .map(|(code, modifiers, action)| (KeyEvent::new(code, modifiers), action))
        .collect();

        Self { bindings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn vim_and_arrow_keys_move_lines() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.get(key(KeyCode::Char('j'))), Some(Action::NextLine));
        assert_eq!(bindings.get(key(KeyCode::Down)), Some(Action::NextLine));
        assert_eq!(bindings.get(key(KeyCode::Char('k'))), Some(Action::PrevLine));
        assert_eq!(bindings.get(key(KeyCode::Up)), Some(Action::PrevLine));
    }

    #[test]
    fn shift_g_jumps_to_last_line() {
        let bindings = KeyBindings::default();
        let event = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(bindings.get(event), Some(Action::LastLine));
    }

    #[test]
    fn enter_selects() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.get(key(KeyCode::Enter)), Some(Action::Select));
    }

    #[test]
    fn ctrl_c_quits() {
        let bindings = KeyBindings::default();
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(bindings.get(event), Some(Action::Quit));
    }

    #[test]
    fn lookup_ignores_event_kind_and_state() {
        let bindings = KeyBindings::default();
        let event = KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Repeat,
            state: KeyEventState::NUM_LOCK,
        };
        assert_eq!(bindings.get(event), Some(Action::NextLine));
    }

    #[test]
    fn unknown_keys_are_unbound() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.get(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn select_label_is_enter() {
        assert_eq!(KeyBindings::default().label(Action::Select), "Enter");
    }
}
