//! Error types for build-and-package operations.
//!
//! Every failure the orchestrator can report is a variant of [`Error`]. External
//! tool failures keep the rendered command line so the release log shows
//! exactly which invocation broke.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error as DeriveError;

/// Result alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while compiling and packaging the target matrix.
#[derive(Debug, DeriveError)]
pub enum Error {
    /// Build configuration rejected before any process was launched.
    #[error("Invalid build configuration: {0}")]
    InvalidConfig(String),

    /// The external tool could not be started (not found, not executable, ...).
    #[error("Failed to launch `{command}`: {source}")]
    Launch {
        /// Rendered command line
        command: String,
        /// Underlying spawn error
        #[source]
        source: io::Error,
    },

    /// The external tool ran and reported failure.
    #[error("`{command}` failed with {}", exit_description(.code))]
    ToolFailed {
        /// Rendered command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// The external tool did not finish within the configured timeout.
    #[error("`{command}` timed out after {timeout:?}")]
    Timeout {
        /// Rendered command line
        command: String,
        /// Timeout that elapsed
        timeout: Duration,
    },

    /// Preflight check could not resolve a tool in PATH.
    #[error("Required tool `{tool}` not found in PATH")]
    ToolNotFound {
        /// Tool name as configured
        tool: String,
    },

    /// The archiver exited successfully but the archive is not on disk.
    #[error("Archive not found after packaging: {}", .path.display())]
    MissingArtifact {
        /// Expected archive path
        path: PathBuf,
    },

    /// Release manifest already lists this matrix cell for the version.
    #[error("{target} artifact already exists in manifest for version {version}")]
    DuplicateArtifact {
        /// `<os>-<arch>` of the duplicate
        target: String,
        /// Release version
        version: String,
    },

    /// Filesystem operation failed on a specific path.
    #[error("Failed {context} {}: {error}", .path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        error: io::Error,
    },

    /// IO error without path context.
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Manifest (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}

/// Attach path context to IO results.
pub trait ErrorExt<T> {
    /// Wraps the IO error into [`Error::Fs`] with a description and path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Convert missing values into [`Error::GenericError`].
pub trait Context<T> {
    /// Returns the value or an error carrying `msg`.
    fn context<C: Display>(self, msg: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

/// Return early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failed_reports_exit_code() {
        let err = Error::ToolFailed {
            command: "zip -j a.zip ./pkg/linux-amd64/app".into(),
            code: Some(12),
        };
        assert_eq!(
            err.to_string(),
            "`zip -j a.zip ./pkg/linux-amd64/app` failed with exit code 12"
        );
    }

    #[test]
    fn tool_failed_reports_signal() {
        let err = Error::ToolFailed {
            command: "gox".into(),
            code: None,
        };
        assert!(err.to_string().ends_with("termination by signal"));
    }

    #[test]
    fn fs_context_keeps_path() {
        let res: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = res.fs_context("reading", "/tmp/x.zip").unwrap_err();
        assert_eq!(err.to_string(), "Failed reading /tmp/x.zip: gone");
    }

    #[test]
    fn option_context() {
        let none: Option<u8> = None;
        let err = none.context("version is required").unwrap_err();
        assert_eq!(err.to_string(), "version is required");
    }
}
