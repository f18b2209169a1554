//! # Recorder
//!
//! Session controller for the motion recorder.
//!
//! One recording is `Idle -> Recording -> Exporting -> Idle`. Starting
//! subscribes both sensors on a fresh channel; stopping fences the channel,
//! aligns the two buffers and writes one file named by `record_id`.
//!
//! ## Usage Example
//!
//! ```ignore
//! use recorder::{SessionController, Status};
//!
//! let mut controller = SessionController::from_blueprint(&blueprint, pipeline, sinks)?;
//! controller.start_recording()?;
//! // ... pump periodically ...
//! controller.pump();
//! let outcome = controller.stop_recording()?;
//! println!("{}", controller.status()); // "Saved. ID:0"
//! ```

mod controller;
mod error;
mod session;
mod status;

pub use controller::{CommandOutcome, SessionController};
pub use error::{Command, SessionError};
pub use session::{Session, SessionBuffers, SessionState};
pub use status::Status;

// Re-export types callers handle directly
pub use exporter::ExportSummary;
