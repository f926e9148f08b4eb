//! Collapsible list of branches and tags.
//!
//! All mutable state lives in one [`RefViewState`] behind one mutex. Load
//! completions arriving on background threads, navigation handlers and
//! rendering each hold that lock for their whole duration, so a row list is
//! never observed half rebuilt. Rows are regenerated from scratch on every
//! change and the cursor is then pulled back onto a selectable row.

use super::display::DisplayUpdater;
use super::helpers::{clip_columns, key_binding_help};
use super::listener::{ListenerRegistry, RefListener};
use super::theme::{Theme, ThemeComponent};
use crate::config::KeyBindings;
use crate::model::{Action, Branch, Oid, Tag, ViewError};
use crate::repo::{OnBranchesLoaded, OnTagsLoaded, RepoData};
use crate::view_state::{
    branch_row_count, default_groups, generate_rows, head_row_index, RefGroup, Row, RowKind,
    RowSource, ViewPos,
};
use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Widget};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

const TITLE: &str = "Refs";

/// Everything the ref view lock protects.
#[derive(Debug)]
struct RefViewState {
    groups: Vec<RefGroup>,
    rows: Vec<Row>,
    view_pos: ViewPos,
    /// Inner width at the last render; one horizontal scroll page.
    page_width: usize,
    active: bool,
    initialised: bool,
}

impl RefViewState {
    fn new() -> Self {
        Self {
            groups: default_groups(),
            rows: Vec::new(),
            view_pos: ViewPos::new(),
            page_width: 0,
            active: false,
            initialised: false,
        }
    }

    /// Rebuild rows from the latest repository snapshot.
    fn regenerate(&mut self, repo: &dyn RepoData) {
        debug!("Generating ref rows");
        let head = repo.head();
        let branches = repo.local_branches();
        let tags = repo.local_tags();
        let source = RowSource {
            head: head.as_ref(),
            branches: &branches,
            tags: &tags,
        };

        self.rows = generate_rows(&self.groups, &source);
        self.view_pos.clamp_to_selectable(&self.rows);
    }

    fn active_row(&self) -> Option<&Row> {
        self.rows.get(self.view_pos.active_row_index)
    }
}

fn lock_state(state: &Mutex<RefViewState>) -> MutexGuard<'_, RefViewState> {
    // Every mutation replaces rows wholesale, so state behind a poisoned
    // lock is still consistent.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The ref list view.
pub struct RefView {
    repo: Arc<dyn RepoData>,
    updater: DisplayUpdater,
    theme: Theme,
    listeners: ListenerRegistry,
    state: Arc<Mutex<RefViewState>>,
}

impl RefView {
    pub fn new(repo: Arc<dyn RepoData>, updater: DisplayUpdater, theme: Theme) -> Self {
        Self {
            repo,
            updater,
            theme,
            listeners: ListenerRegistry::new(),
            state: Arc::new(Mutex::new(RefViewState::new())),
        }
    }

    /// Add a listener notified whenever a ref is selected. Listeners cannot
    /// be removed.
    pub fn register_listener(&mut self, listener: Arc<dyn RefListener>) {
        self.listeners.register(listener);
    }

    /// Resolve HEAD, start loading branches and tags, and tell listeners
    /// which ref is checked out.
    ///
    /// Calling this again after it succeeded does nothing.
    ///
    /// # Errors
    /// [`ViewError::DataLoad`] if HEAD cannot be resolved or a load cannot be
    /// started. Loads that were already started still complete and update
    /// the rows. [`ViewError::Listener`] if a listener rejects the initial
    /// selection.
    pub fn initialise(&self) -> Result<(), ViewError> {
        if lock_state(&self.state).initialised {
            debug!("RefView already initialised");
            return Ok(());
        }

        info!("Initialising RefView");

        let head = self.repo.load_head()?;
        // The lock is not held here: collaborators may run callbacks inline.
        self.repo.load_local_branches(self.on_branches_loaded())?;
        self.repo.load_local_tags(self.on_tags_loaded())?;

        {
            let mut state = lock_state(&self.state);
            state.regenerate(self.repo.as_ref());
            state.initialised = true;
        }

        self.listeners.notify(&head.display_name(), &head.oid)
    }

    fn on_branches_loaded(&self) -> OnBranchesLoaded {
        let state = Arc::clone(&self.state);
        let repo = Arc::clone(&self.repo);
        let updater = self.updater.clone();

        Box::new(move |branches: &[Branch]| {
            debug!(count = branches.len(), "Local branches loaded");
            {
                let mut state = lock_state(&state);
                state.regenerate(repo.as_ref());

                let head = repo.head();
                if let Some(index) = head_row_index(&state.rows, head.as_ref(), branches) {
                    state.view_pos.active_row_index = index;
                }
            }
            updater.update_display();
        })
    }

    fn on_tags_loaded(&self) -> OnTagsLoaded {
        let state = Arc::clone(&self.state);
        let repo = Arc::clone(&self.repo);
        let updater = self.updater.clone();

        Box::new(move |tags: &[Tag]| {
            debug!(count = tags.len(), "Local tags loaded");
            lock_state(&state).regenerate(repo.as_ref());
            updater.update_display();
        })
    }

    /// Draw the view into `area` of `buf`.
    ///
    /// Safe to call at any time; groups whose data has not arrived show a
    /// loading placeholder.
    pub fn render(&self, area: Rect, buf: &mut Buffer) -> Result<(), ViewError> {
        debug!("Rendering RefView");
        let mut state = lock_state(&self.state);

        let mut block = Block::bordered().title(Line::styled(
            TITLE,
            self.theme.style(ThemeComponent::RefViewTitle),
        ));
        let inner = block.inner(area);
        let visible_rows = usize::from(inner.height);
        let width = usize::from(inner.width);

        state.page_width = width;
        state.view_pos.determine_view_start_row(visible_rows);
        let pos = state.view_pos;

        if let Some(footer) = state.active_row().and_then(|row| self.footer(row)) {
            block = block.title_bottom(
                Line::styled(footer, self.theme.style(ThemeComponent::RefViewFooter))
                    .right_aligned(),
            );
        }
        block.render(area, buf);

        let window = state
            .rows
            .iter()
            .enumerate()
            .skip(pos.view_start_row_index)
            .take(visible_rows);
        for (offset, (index, row)) in window.enumerate() {
            let y = inner.y + offset as u16;
            let text = clip_columns(row.text(), pos.view_start_column, width);
            let mut style = self.theme.row_style(row.kind());
            if index == pos.active_row_index {
                style = style.patch(self.theme.selected(state.active));
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), style);
            }
            buf.set_stringn(inner.x, y, text, width, style);
        }

        Ok(())
    }

    /// Summary for the row under the cursor. Spacers and placeholders have
    /// none.
    fn footer(&self, row: &Row) -> Option<String> {
        match row.kind() {
            RowKind::BranchGroup => {
                let branches = self.repo.local_branches();
                Some(if branches.loading {
                    "Branches: Loading...".to_string()
                } else {
                    let count = branch_row_count(self.repo.head().as_ref(), &branches.value);
                    format!("Branches: {count}")
                })
            }
            RowKind::Branch => {
                let branches = self.repo.local_branches();
                let count = branch_row_count(self.repo.head().as_ref(), &branches.value);
                ordinal(row).map(|ordinal| format!("Branch {ordinal} of {count}"))
            }
            RowKind::TagGroup => {
                let tags = self.repo.local_tags();
                Some(if tags.loading {
                    "Tags: Loading...".to_string()
                } else {
                    format!("Tags: {}", tags.value.len())
                })
            }
            RowKind::Tag => {
                let count = self.repo.local_tags().value.len();
                ordinal(row).map(|ordinal| format!("Tag {ordinal} of {count}"))
            }
            RowKind::Loading | RowKind::Spacer => None,
        }
    }

    /// The ref view contributes nothing to the status bar.
    pub fn render_status_bar(&self) -> Line<'static> {
        Line::default()
    }

    pub fn render_help_bar(&self, bindings: &KeyBindings) -> Line<'static> {
        key_binding_help(self.theme, bindings, &[Action::Select])
    }

    /// Focus changed; only the selection highlight depends on it.
    pub fn on_active_change(&self, active: bool) {
        debug!("RefView active: {}", active);
        lock_state(&self.state).active = active;
    }

    /// Raw key presses are not interpreted by this view.
    pub fn handle_key_press(&self, key: KeyEvent) -> Result<(), ViewError> {
        debug!("RefView handling key {:?} - NOP", key);
        Ok(())
    }

    /// Run the handler for `action` under the view lock. Actions outside the
    /// ref view's table are ignored.
    ///
    /// # Errors
    /// Only [`Action::Select`] on a ref can fail, with the first listener
    /// failure.
    pub fn handle_action(&self, action: Action) -> Result<(), ViewError> {
        debug!("RefView handling action {:?}", action);
        let mut state = lock_state(&self.state);

        match action {
            Action::PrevLine => self.move_up(&mut state),
            Action::NextLine => self.move_down(&mut state),
            Action::ScrollRight => self.scroll_right(&mut state),
            Action::ScrollLeft => self.scroll_left(&mut state),
            Action::FirstLine => self.move_to_first(&mut state),
            Action::LastLine => self.move_to_last(&mut state),
            Action::Select => return self.select_ref(&mut state),
            Action::NextView | Action::Quit => {}
        }

        Ok(())
    }

    fn move_up(&self, state: &mut RefViewState) {
        let RefViewState { rows, view_pos, .. } = state;
        if view_pos.move_up(rows) {
            debug!("Moved up to row {}", view_pos.active_row_index);
            self.updater.update_display();
        } else {
            debug!("No valid ref entry to move to");
        }
    }

    fn move_down(&self, state: &mut RefViewState) {
        let RefViewState { rows, view_pos, .. } = state;
        if view_pos.move_down(rows) {
            debug!("Moved down to row {}", view_pos.active_row_index);
            self.updater.update_display();
        } else {
            debug!("No valid ref entry to move to");
        }
    }

    fn scroll_right(&self, state: &mut RefViewState) {
        if state.view_pos.move_page_right(state.page_width) {
            debug!(
                "Scrolling right. View starts at column {}",
                state.view_pos.view_start_column
            );
            self.updater.update_display();
        }
    }

    fn scroll_left(&self, state: &mut RefViewState) {
        if state.view_pos.move_page_left(state.page_width) {
            debug!(
                "Scrolling left. View starts at column {}",
                state.view_pos.view_start_column
            );
            self.updater.update_display();
        }
    }

    fn move_to_first(&self, state: &mut RefViewState) {
        if state.view_pos.move_to_first_line() {
            debug!("Moving to first ref");
            self.updater.update_display();
        }
    }

    fn move_to_last(&self, state: &mut RefViewState) {
        let RefViewState { rows, view_pos, .. } = state;
        if view_pos.move_to_last_line(rows) {
            debug!("Moving to last ref");
            self.updater.update_display();
        }
    }

    fn select_ref(&self, state: &mut RefViewState) -> Result<(), ViewError> {
        let Some(row) = state.active_row().cloned() else {
            warn!("Select with no rows generated");
            return Ok(());
        };

        match &row {
            Row::GroupHeader { group, .. } => {
                let group = &mut state.groups[*group];
                group.expanded = !group.expanded;
                debug!("Setting ref group {} to expanded {}", group.name, group.expanded);
                state.regenerate(self.repo.as_ref());
                self.updater.update_display();
            }
            Row::Leaf { oid, .. } => {
                debug!("Selecting ref {}:{}", row.display_name(), oid);
                self.listeners.notify(row.display_name(), oid)?;
                self.updater.update_display();
            }
            Row::Loading { .. } | Row::Spacer => {
                warn!("Unexpected selection of {:?} row", row.kind());
            }
        }

        Ok(())
    }

    /// Snapshot of the current rows (for hosts and tests).
    pub fn rows(&self) -> Vec<Row> {
        lock_state(&self.state).rows.clone()
    }

    /// Snapshot of the cursor (for hosts and tests).
    pub fn view_pos(&self) -> ViewPos {
        lock_state(&self.state).view_pos
    }

    /// Text of the footer for the row under the cursor.
    pub fn footer_text(&self) -> Option<String> {
        let state = lock_state(&self.state);
        state.active_row().and_then(|row| self.footer(row))
    }

    /// Name and target of the selected leaf, if the cursor is on one.
    pub fn selected_ref(&self) -> Option<(String, Oid)> {
        let state = lock_state(&self.state);
        let row = state.active_row()?;
        match row {
            Row::Leaf { oid, .. } => Some((row.display_name().to_string(), oid.clone())),
            _ => None,
        }
    }
}

fn ordinal(row: &Row) -> Option<usize> {
    match row {
        Row::Leaf { ordinal, .. } => Some(*ordinal),
        _ => None,
    }
}

#[cfg(test)]
#[path = "ref_view_tests.rs"]
mod tests;
