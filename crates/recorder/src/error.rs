//! Session error types

use std::fmt;

use exporter::ExportError;
use ingestion::IngestionError;
use thiserror::Error;

use crate::session::SessionState;

/// User command on the start/stop surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Command::Start => "start",
            Command::Stop => "stop",
        })
    }
}

/// Session controller errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// A sensor could not be subscribed; the session stays idle
    #[error("sensor unavailable: {0}")]
    SensorUnavailable(#[source] IngestionError),

    /// Re-entrant command under the `reject` policy
    #[error("'{command}' is not valid while {state}")]
    InvalidCommand {
        command: Command,
        state: SessionState,
    },

    /// The recording could not be written; the session is back to idle
    #[error("export of record {record_id} failed: {source}")]
    Export {
        record_id: u64,
        #[source]
        source: ExportError,
    },
}

impl From<IngestionError> for SessionError {
    fn from(error: IngestionError) -> Self {
        Self::SensorUnavailable(error)
    }
}
