//! Tracing subscriber initialization.
//!
//! The terminal belongs to the TUI, so logs are written to a file instead.
//! Follow them with `tail -f` in a separate terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Initialize the tracing subscriber with file-based logging.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` (e.g. `"info"`)
/// is used. Creates the log directory if it doesn't exist.
///
/// The returned guard flushes buffered log lines when dropped; keep it alive
/// for the lifetime of the application.
pub fn init(log_path: &Path, default_level: &str) -> Result<WorkerGuard, LoggingError> {
    use tracing_subscriber::EnvFilter;

    let file_name = log_path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    std::fs::create_dir_all(&directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.clone(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::never(&directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false) // No ANSI colors in log files
        .with_thread_names(true)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory_if_missing() {
        let test_dir = std::env::temp_dir().join("refscope_test_logs_create");
        let log_file = test_dir.join("test.log");
        let _ = fs::remove_dir_all(&test_dir);

        // Subscriber may already be set by another test; the directory is
        // created either way.
        let _ = init(&log_file, "info");

        assert!(test_dir.exists(), "Log directory should be created: {:?}", test_dir);
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn init_succeeds_or_reports_existing_subscriber() {
        let test_dir = std::env::temp_dir().join("refscope_test_logs_exists");
        let _ = fs::create_dir_all(&test_dir);

        match init(&test_dir.join("app.log"), "debug") {
            Ok(_guard) => {}
            Err(LoggingError::SubscriberAlreadySet) => {}
            Err(other) => panic!("unexpected logging error: {other}"),
        }

        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    fn init_rejects_path_without_file_name() {
        let result = init(Path::new("/"), "info");
        assert!(matches!(result, Err(LoggingError::InvalidPath(_))));
    }
}
