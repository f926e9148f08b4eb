//! Commit history of the selected ref.
//!
//! The view listens for ref selections. Each selected commit id gets its own
//! cursor in a [`ViewIndexCache`], so returning to a branch resumes where its
//! history was left and does not load it again.

use super::display::DisplayUpdater;
use super::helpers::key_binding_help;
use super::listener::RefListener;
use super::theme::{Theme, ThemeComponent};
use crate::config::KeyBindings;
use crate::model::{Action, Commit, Oid, ViewError};
use crate::repo::RepoData;
use crate::view_state::{Selection, ViewIndex, ViewIndexCache};
use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Widget};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

const TITLE: &str = "Commits";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Default)]
struct CommitViewState {
    cache: ViewIndexCache,
    ref_name: Option<String>,
    active: bool,
}

pub struct CommitView {
    repo: Arc<dyn RepoData>,
    updater: DisplayUpdater,
    theme: Theme,
    state: Mutex<CommitViewState>,
}

impl CommitView {
    pub fn new(repo: Arc<dyn RepoData>, updater: DisplayUpdater, theme: Theme) -> Self {
        Self {
            repo,
            updater,
            theme,
            state: Mutex::new(CommitViewState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CommitViewState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Draw the history of the selected ref.
    ///
    /// # Errors
    /// [`ViewError::MissingViewIndex`] if no ref was ever selected.
    pub fn render(&self, area: Rect, buf: &mut Buffer) -> Result<(), ViewError> {
        let mut state = self.lock();
        let (oid, index) = state.cache.active_entry_mut()?;
        debug!(%oid, "Rendering CommitView");

        let history = self.repo.commits(oid);
        let mut block = Block::bordered().title(Line::styled(
            TITLE,
            self.theme.style(ThemeComponent::CommitViewTitle),
        ));
        let inner = block.inner(area);
        index.determine_view_start(usize::from(inner.height));
        let index = *index;

        let footer = if history.loading {
            Some("Loading...".to_string())
        } else if history.value.is_empty() {
            None
        } else {
            Some(format!(
                "Commit {} of {}",
                index.active_index.min(history.value.len() - 1) + 1,
                history.value.len()
            ))
        };
        if let Some(footer) = footer {
            block = block.title_bottom(
                Line::styled(footer, self.theme.style(ThemeComponent::CommitViewFooter))
                    .right_aligned(),
            );
        }
        block.render(area, buf);

        let window = history
            .value
            .iter()
            .enumerate()
            .skip(index.view_start_index)
            .take(usize::from(inner.height));
        for (offset, (position, commit)) in window.enumerate() {
            let y = inner.y + offset as u16;
            if position == index.active_index {
                buf.set_style(
                    Rect::new(inner.x, y, inner.width, 1),
                    self.theme.selected(state.active),
                );
            }
            buf.set_line(inner.x, y, &self.commit_line(commit), inner.width);
        }

        Ok(())
    }

    fn commit_line(&self, commit: &Commit) -> Line<'static> {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                commit.author_when.format(DATE_FORMAT).to_string(),
                self.theme.style(ThemeComponent::CommitViewDate),
            ),
            Span::raw(" "),
            Span::styled(
                commit.author_name.clone(),
                self.theme.style(ThemeComponent::CommitViewAuthor),
            ),
            Span::raw(" "),
            Span::styled(
                commit.summary.clone(),
                self.theme.style(ThemeComponent::CommitViewSummary),
            ),
        ])
    }

    /// Name of the selected ref.
    pub fn render_status_bar(&self) -> Line<'static> {
        match &self.lock().ref_name {
            Some(name) => Line::from(format!(" {name}")),
            None => Line::default(),
        }
    }

    pub fn render_help_bar(&self, bindings: &KeyBindings) -> Line<'static> {
        key_binding_help(
            self.theme,
            bindings,
            &[Action::NextLine, Action::PrevLine, Action::FirstLine, Action::LastLine],
        )
    }

    pub fn on_active_change(&self, active: bool) {
        debug!("CommitView active: {}", active);
        self.lock().active = active;
    }

    pub fn handle_key_press(&self, key: KeyEvent) -> Result<(), ViewError> {
        debug!("CommitView handling key {:?} - NOP", key);
        Ok(())
    }

    /// Move the cursor of the selected history. The scroll window follows
    /// at the next render.
    pub fn handle_action(&self, action: Action) -> Result<(), ViewError> {
        let mut state = self.lock();
        if state.cache.active_oid().is_none() {
            debug!("CommitView has no selected ref, ignoring {:?}", action);
            return Ok(());
        }
        let (oid, index) = state.cache.active_entry_mut()?;
        let count = self.repo.commits(oid).value.len();

        let moved = match action {
            Action::PrevLine => index.move_up(),
            Action::NextLine => index.move_down(count),
            Action::FirstLine => index.move_to_first(),
            Action::LastLine => index.move_to_last(count),
            _ => false,
        };

        if moved {
            debug!(%oid, active_index = index.active_index, "Moved commit cursor");
            self.updater.update_display();
        }
        Ok(())
    }

    /// Whether the selected history is still loading.
    pub fn is_loading(&self) -> bool {
        let state = self.lock();
        state
            .cache
            .active_oid()
            .is_some_and(|oid| self.repo.commits(oid).loading)
    }

    pub fn active_oid(&self) -> Option<Oid> {
        self.lock().cache.active_oid().cloned()
    }

    pub fn view_index(&self, oid: &Oid) -> Option<ViewIndex> {
        self.lock().cache.get(oid).copied()
    }
}

impl RefListener for CommitView {
    /// Load history on the first selection of `oid`; later selections only
    /// switch back to its cached cursor.
    fn on_ref_select(&self, ref_name: &str, oid: &Oid) -> Result<(), ViewError> {
        let mut state = self.lock();

        if !state.cache.contains(oid) {
            debug!(ref_name, %oid, "Loading history");
            self.repo.load_commits(oid)?;
        }
        match state.cache.select(oid) {
            Selection::New => debug!(%oid, "Created commit view index"),
            Selection::Resumed => debug!(%oid, "Resuming commit view index"),
        }
        state.ref_name = Some(ref_name.to_string());
        drop(state);

        self.updater.update_display();
        Ok(())
    }
}
