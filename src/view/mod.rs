//! TUI rendering and terminal management (impure shell)

pub mod commit_view;
pub mod display;
mod helpers;
pub mod listener;
pub mod ref_view;
pub mod theme;

pub use commit_view::CommitView;
pub use display::{display_channel, DisplayUpdater, DisplayUpdates};
pub use helpers::clip_columns;
pub use listener::{ListenerRegistry, RefListener};
pub use ref_view::RefView;
pub use theme::{Theme, ThemeComponent};

use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::{Action, AppError, ViewError};
use crate::repo::RepoData;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::Widget;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Which pane receives actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Refs,
    Commits,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Refs => Focus::Commits,
            Focus::Commits => Focus::Refs,
        }
    }
}

/// Presentation settings taken from the resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOptions {
    pub ref_pane_width: u16,
    pub colors_enabled: bool,
    pub show_help_bar: bool,
}

impl From<&ResolvedConfig> for AppOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            ref_pane_width: config.ref_pane_width,
            colors_enabled: !config.no_color,
            show_help_bar: config.show_help_bar,
        }
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::from(&ResolvedConfig::default())
    }
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    ref_view: RefView,
    commit_view: Arc<CommitView>,
    updates: DisplayUpdates,
    key_bindings: KeyBindings,
    theme: Theme,
    focus: Focus,
    options: AppOptions,
    /// History was still loading at the last tick; draw once more after it
    /// finishes.
    history_pending: bool,
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Wire the views together and initialise them.
    ///
    /// The commit view listens to the ref view, so initialising the ref view
    /// also selects HEAD's history.
    pub fn new(
        terminal: Terminal<B>,
        repo: Arc<dyn RepoData>,
        options: AppOptions,
    ) -> Result<Self, AppError> {
        let (updater, updates) = display_channel();
        let theme = Theme::new(options.colors_enabled);

        let commit_view = Arc::new(CommitView::new(Arc::clone(&repo), updater.clone(), theme));
        let mut ref_view = RefView::new(repo, updater, theme);
        ref_view.register_listener(Arc::clone(&commit_view) as Arc<dyn RefListener>);

        ref_view.initialise()?;
        ref_view.on_active_change(true);
        commit_view.on_active_change(false);
        info!("Views initialised");

        Ok(Self {
            terminal,
            ref_view,
            commit_view,
            updates,
            key_bindings: KeyBindings::default(),
            theme,
            focus: Focus::Refs,
            options,
            history_pending: false,
        })
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. Redraws on key presses, resizes, display
    /// updates from background loads, and on ticks while history loads.
    pub fn run(&mut self) -> Result<(), AppError> {
        const TICK: Duration = Duration::from_millis(250);

        self.draw()?;

        loop {
            let mut redraw = false;

            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        redraw = true;
                    }
                    Event::Resize(width, height) => {
                        debug!("Terminal resized to {}x{}", width, height);
                        redraw = true;
                    }
                    _ => {}
                }
            }

            if self.needs_redraw(redraw) {
                self.draw()?;
            }
        }
    }

    /// Coalesce pending display updates into a single redraw decision.
    fn needs_redraw(&mut self, event_redraw: bool) -> bool {
        let pending_updates = self.updates.drain();
        let loading = self.commit_view.is_loading();
        let redraw = event_redraw || pending_updates > 0 || loading || self.history_pending;
        self.history_pending = loading;
        redraw
    }

    /// Returns `true` if the application should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(action) = self.key_bindings.get(key) else {
            let result = match self.focus {
                Focus::Refs => self.ref_view.handle_key_press(key),
                Focus::Commits => self.commit_view.handle_key_press(key),
            };
            log_failure(result);
            return false;
        };

        match action {
            Action::Quit => {
                info!("Quit requested");
                return true;
            }
            Action::NextView => {
                self.focus = self.focus.next();
                debug!(focus = ?self.focus, "Focus changed");
                self.ref_view.on_active_change(self.focus == Focus::Refs);
                self.commit_view
                    .on_active_change(self.focus == Focus::Commits);
            }
            _ => {
                let result = match self.focus {
                    Focus::Refs => self.ref_view.handle_action(action),
                    Focus::Commits => self.commit_view.handle_action(action),
                };
                log_failure(result);
            }
        }

        false
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), AppError> {
        let Self {
            terminal,
            ref_view,
            commit_view,
            key_bindings,
            theme,
            focus,
            options,
            ..
        } = self;
        let mut rendered: Result<(), ViewError> = Ok(());

        terminal.draw(|frame| {
            let area = frame.area();
            let (main, help) = if options.show_help_bar {
                let [main, help] =
                    Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
                (main, Some(help))
            } else {
                (area, None)
            };
            let [refs, commits] = Layout::horizontal([
                Constraint::Length(options.ref_pane_width),
                Constraint::Min(0),
            ])
            .areas(main);

            let buf = frame.buffer_mut();
            rendered = ref_view
                .render(refs, buf)
                .and_then(|()| commit_view.render(commits, buf));

            if let Some(help) = help {
                let (mut line, status) = match focus {
                    Focus::Refs => (
                        ref_view.render_help_bar(key_bindings),
                        ref_view.render_status_bar(),
                    ),
                    Focus::Commits => (
                        commit_view.render_help_bar(key_bindings),
                        commit_view.render_status_bar(),
                    ),
                };
                let global = [Action::NextView, Action::Quit];
                line.spans
                    .extend(helpers::key_binding_help(*theme, key_bindings, &global).spans);
                buf.set_line(help.x, help.y, &line, help.width);
                status.right_aligned().render(help, buf);
            }
        })?;

        rendered.map_err(AppError::from)
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn ref_view(&self) -> &RefView {
        &self.ref_view
    }

    pub fn commit_view(&self) -> &CommitView {
        &self.commit_view
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

fn log_failure(result: Result<(), ViewError>) {
    if let Err(err) = result {
        error!(error = %err, "View action failed");
    }
}

/// Set up the terminal, run the TUI over `repo`, and restore the terminal
/// afterwards, even when the app fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_repo(repo: Arc<dyn RepoData>, options: AppOptions) -> Result<(), AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let terminal: Terminal<CrosstermBackend<Stdout>> =
        Terminal::new(CrosstermBackend::new(stdout))?;

    let result = TuiApp::new(terminal, repo, options).and_then(|mut app| app.run());

    restore_terminal()?;

    result
}

/// Disables raw mode and leaves the alternate screen.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
