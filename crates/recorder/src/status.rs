//! Human-readable status label for the display surface

use std::fmt;

/// Status shown next to the start/stop control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    PressStart,
    Recording,
    Saving,
    /// Written under this record id
    Saved(u64),
    SaveFailed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::PressStart => f.write_str("Press start"),
            Status::Recording => f.write_str("Recording..."),
            Status::Saving => f.write_str("Saving..."),
            Status::Saved(id) => write!(f, "Saved. ID:{id}"),
            Status::SaveFailed => f.write_str("Save failed"),
        }
    }
}
