//! Small rendering helpers shared by the views.

use super::theme::{Theme, ThemeComponent};
use crate::config::KeyBindings;
use crate::model::Action;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// The part of `text` visible in a window starting at display column
/// `start_column` that is `width` columns wide.
///
/// A wide character straddling the left edge is dropped rather than split.
pub fn clip_columns(text: &str, start_column: usize, width: usize) -> String {
    let mut column = 0;
    let mut used = 0;
    let mut clipped = String::new();

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if column < start_column {
            column += ch_width;
            continue;
        }
        if used + ch_width > width {
            break;
        }
        clipped.push(ch);
        used += ch_width;
        column += ch_width;
    }

    clipped
}

/// Help bar line listing `actions` as `<key> <description>` pairs.
pub fn key_binding_help(theme: Theme, bindings: &KeyBindings, actions: &[Action]) -> Line<'static> {
    let mut spans = Vec::with_capacity(actions.len() * 3);
    for action in actions {
        spans.push(Span::styled(
            format!(" {}", bindings.label(*action)),
            theme.style(ThemeComponent::HelpBarKey),
        ));
        spans.push(Span::styled(
            format!(" {} ", action.describe()),
            theme.style(ThemeComponent::HelpBarText),
        ));
    }
    Line::from(spans)
}
