//! Styling for view components.
//!
//! Every drawable part of a view maps to a [`ThemeComponent`]; the
//! [`Theme`] turns components into ratatui styles. Rows without a mapping
//! render with [`ThemeComponent::None`], a neutral style.

use crate::view_state::RowKind;
use ratatui::style::{Color, Modifier, Style};

/// Drawable parts of the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeComponent {
    None,
    RefViewTitle,
    RefViewFooter,
    RefViewBranchesHeader,
    RefViewBranch,
    RefViewTagsHeader,
    RefViewTag,
    CommitViewTitle,
    CommitViewFooter,
    CommitViewDate,
    CommitViewAuthor,
    CommitViewSummary,
    HelpBarKey,
    HelpBarText,
}

impl ThemeComponent {
    /// Component for a ref list row. `None` for rows that have no dedicated
    /// styling (spacers, loading placeholders).
    pub fn for_row(kind: RowKind) -> Option<Self> {
        match kind {
            RowKind::BranchGroup => Some(Self::RefViewBranchesHeader),
            RowKind::Branch => Some(Self::RefViewBranch),
            RowKind::TagGroup => Some(Self::RefViewTagsHeader),
            RowKind::Tag => Some(Self::RefViewTag),
            RowKind::Loading | RowKind::Spacer => None,
        }
    }
}

/// Colors on or off, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    colors_enabled: bool,
}

impl Theme {
    pub fn new(colors_enabled: bool) -> Self {
        Self { colors_enabled }
    }

    pub fn colors_enabled(self) -> bool {
        self.colors_enabled
    }

    pub fn style(self, component: ThemeComponent) -> Style {
        if !self.colors_enabled {
            return match component {
                ThemeComponent::RefViewTitle
                | ThemeComponent::CommitViewTitle
                | ThemeComponent::HelpBarKey => Style::default().add_modifier(Modifier::BOLD),
                _ => Style::default(),
            };
        }

        match component {
            ThemeComponent::None | ThemeComponent::HelpBarText => Style::default(),
            ThemeComponent::RefViewTitle | ThemeComponent::CommitViewTitle => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            ThemeComponent::RefViewFooter | ThemeComponent::CommitViewFooter => {
                Style::default().fg(Color::Cyan)
            }
            ThemeComponent::RefViewBranchesHeader | ThemeComponent::RefViewTagsHeader => {
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD)
            }
            ThemeComponent::RefViewBranch => Style::default().fg(Color::White),
            ThemeComponent::RefViewTag => Style::default().fg(Color::Yellow),
            ThemeComponent::CommitViewDate => Style::default().fg(Color::Blue),
            ThemeComponent::CommitViewAuthor => Style::default().fg(Color::Green),
            ThemeComponent::CommitViewSummary => Style::default(),
            ThemeComponent::HelpBarKey => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Style for a ref list row, falling back to neutral.
    pub fn row_style(self, kind: RowKind) -> Style {
        self.style(ThemeComponent::for_row(kind).unwrap_or(ThemeComponent::None))
    }

    /// Highlight for the selected row; the focused view gets the stronger one.
    pub fn selected(self, view_active: bool) -> Style {
        if view_active {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::UNDERLINED)
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(true)
    }
}
