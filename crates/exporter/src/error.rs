//! Exporter error types

use std::path::PathBuf;

use thiserror::Error;

/// Exporter-specific errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Sink open/write/close error (from contract)
    #[error("sink error: {0}")]
    Sink(#[from] contracts::ContractError),

    /// A single line does not match the record format
    #[error("malformed record line: {message}")]
    Malformed { message: String },

    /// A line of an exported file failed to parse
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Create a malformed line error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}
