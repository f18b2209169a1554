//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Command-line value rejected before any work started
    #[error("Invalid value for --{name}: {message}")]
    InvalidArgument { name: &'static str, message: String },

    /// Recording session error
    #[error(transparent)]
    Session(#[from] recorder::SessionError),

    /// Replay capture could not be loaded
    #[error(transparent)]
    Replay(#[from] ingestion::IngestionError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }
}
