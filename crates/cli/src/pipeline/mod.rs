//! Recorder wiring and run statistics.

mod orchestrator;
mod stats;

pub use orchestrator::{build_recorder, load_blueprint, Recorder};
pub use stats::RecordStats;
