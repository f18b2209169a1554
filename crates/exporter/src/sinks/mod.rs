//! Sink implementations
//!
//! Contains FileSink, LogSink, and MemorySink, each with a provider that opens
//! one sink per recording.

mod file;
mod log;
mod memory;

pub use self::file::{FileSink, FileSinkProvider};
pub use self::log::{LogSink, LogSinkProvider};
pub use self::memory::{MemorySink, MemorySinkProvider};
