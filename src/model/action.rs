//! Domain-level actions independent of key bindings.

/// User intents that views handle.
///
/// These represent intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `Action` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move the cursor up one selectable row. Default: k/↑
    PrevLine,
    /// Move the cursor down one selectable row. Default: j/↓
    NextLine,
    /// Scroll one page to the left. Default: h/←
    ScrollLeft,
    /// Scroll one page to the right. Default: l/→
    ScrollRight,
    /// Jump to the first row. Default: g/Home
    FirstLine,
    /// Jump to the last row. Default: G/End
    LastLine,
    /// Toggle a group or select a ref. Default: Enter
    Select,
    /// Move focus to the next view. Default: Tab
    NextView,
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}

impl Action {
    /// Short description used by help bars.
    pub fn describe(self) -> &'static str {
        match self {
            Action::PrevLine => "Up",
            Action::NextLine => "Down",
            Action::ScrollLeft => "Scroll Left",
            Action::ScrollRight => "Scroll Right",
            Action::FirstLine => "First",
            Action::LastLine => "Last",
            Action::Select => "Select",
            Action::NextView => "Next View",
            Action::Quit => "Quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_is_described_as_select() {
        assert_eq!(Action::Select.describe(), "Select");
    }

    #[test]
    fn actions_are_hashable_and_copy() {
        use std::collections::HashSet;
        let set: HashSet<Action> = [Action::PrevLine, Action::PrevLine, Action::Quit]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }
}
