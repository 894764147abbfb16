//! Tracing subscriber initialization.
//!
//! Logs go to stderr unless a log file is given, in which case they are
//! appended there without ANSI colors. `RUST_LOG` overrides the default
//! level.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Default filter directive: warnings only, or info with `--verbose`.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "broadsheet=info,warn"
    } else {
        "warn"
    }
}

/// Split a log file path into the directory and file name the appender
/// wants, creating the directory if needed.
fn prepare_log_path(log_path: &Path) -> Result<(PathBuf, String), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    std::fs::create_dir_all(&directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.clone(),
        source,
    })?;

    Ok((directory, file_name.to_string()))
}

/// Install the global subscriber.
///
/// With a log file the returned guard must be held until exit so buffered
/// lines are flushed.
pub fn init(log_file: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    match log_file {
        Some(path) => {
            let (directory, file_name) = prepare_log_path(path)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .try_init()
                .map_err(|_| LoggingError::SubscriberAlreadySet)?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .try_init()
                .map_err(|_| LoggingError::SubscriberAlreadySet)?;
            Ok(None)
        }
    }
}
