//! Comprehensive error types for bundler operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all bundler operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as E;

        match self {
            Self::Cli(CliError::MissingArgument { argument }) => vec![format!(
                "Pass --{} or declare it under [package.metadata.matrix] / \"matrix\"",
                argument
            )],
            Self::Bundler(E::ToolNotFound { tool }) | Self::Bundler(E::Launch { command: tool, .. }) => vec![
                format!("Install `{}` or point to it with --gox / --zip", tool),
                "Check that PATH is set in the release environment".to_string(),
            ],
            Self::Bundler(E::ToolFailed { .. }) => vec![
                "See the tool output above for the cause".to_string(),
                "Partially produced binaries and archives are left in place".to_string(),
            ],
            Self::Bundler(E::Timeout { .. }) => {
                vec!["Raise --timeout-secs or investigate the hung tool".to_string()]
            }
            Self::Bundler(E::DuplicateArtifact { .. }) => vec![
                "This version was already recorded; bump the version or remove it from the manifest"
                    .to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if re-running the release could succeed without configuration changes
    pub fn is_recoverable(&self) -> bool {
        use crate::bundler::Error as E;

        matches!(
            self,
            Self::Io(_)
                | Self::Bundler(E::ToolFailed { .. })
                | Self::Bundler(E::Timeout { .. })
                | Self::Bundler(E::IoError(_))
        )
    }
}
