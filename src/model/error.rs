//! Error types for refscope.
//!
//! Errors are structured with `thiserror` and compose via `?` and `From`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - top-level error returned from `main`
//!   - [`ConfigError`] - config file could not be read or parsed
//!   - [`LoggingError`] - tracing subscriber could not be installed
//!   - [`ViewError`] - failures inside the ref and commit views
//!     - [`RepoError`] - the repository data collaborator failed
//!   - `std::io::Error` - terminal failures
//!
//! # Recovery
//!
//! Nothing in the views retries. A [`RepoError`] during initialisation leaves
//! the view unusable; a listener failure is handed back to whoever triggered
//! the selection; a missing commit view index is a caller contract violation.
//! Row kinds without a theme or footer never error, they render neutrally.

use super::identifiers::{InvalidOid, Oid};
use crate::config::ConfigError;
use crate::logging::LoggingError;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("View error: {0}")]
    View(#[from] ViewError),

    /// Terminal or TUI rendering error. Fatal: the terminal is restored and
    /// the process exits.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Failures reported by the repository data collaborator.
#[derive(Debug, Error)]
pub enum RepoError {
    /// A `git` invocation exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// Output from a `git` invocation could not be interpreted.
    #[error("Unexpected output from `{command}`: {line:?}")]
    MalformedOutput { command: String, line: String },

    #[error(transparent)]
    InvalidOid(#[from] InvalidOid),

    #[error("Repository I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure injected by an in-memory collaborator.
    #[error("{0}")]
    Unavailable(String),
}

/// Failures surfaced by the ref and commit views.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A data load could not be issued during initialisation.
    #[error("Failed to load repository data: {0}")]
    DataLoad(#[from] RepoError),

    /// A selection listener failed. Listeners registered after it were not
    /// notified; listeners before it are not rolled back.
    #[error("Listener failed while selecting {ref_name:?}: {source}")]
    Listener {
        ref_name: String,
        #[source]
        source: Box<ViewError>,
    },

    /// Render was asked for an identity that was never selected.
    #[error("No view index exists for {}", display_oid(.oid))]
    MissingViewIndex { oid: Option<Oid> },

    /// A terminal surface rejected a draw.
    #[error("Render failed: {0}")]
    Render(String),
}

fn display_oid(oid: &Option<Oid>) -> String {
    match oid {
        Some(oid) => format!("oid {oid}"),
        None => "an unselected ref".to_string(),
    }
}
