//! RecordSink trait - Exporter output interface
//!
//! Defines the abstract interface for Sinks.

use std::path::Path;

use crate::{ContractError, PairedRecord};

/// Data output trait
///
/// All sink implementations must implement this trait.
pub trait RecordSink: Send {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Backing file, if the sink writes to one
    fn path(&self) -> Option<&Path> {
        None
    }

    /// Write one paired record
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write(&mut self, record: &PairedRecord) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    fn close(&mut self) -> Result<(), ContractError>;

    /// Abandon a failed export, removing any partial output
    ///
    /// Defaults to `close` for sinks that leave nothing behind.
    fn discard(&mut self) -> Result<(), ContractError> {
        self.close()
    }
}

/// Opens one sink per completed recording
pub trait SinkProvider: Send {
    /// Open the destination for `record_id`
    ///
    /// # Errors
    /// Returns open error when the destination cannot be created.
    fn open(&mut self, record_id: u64) -> Result<Box<dyn RecordSink>, ContractError>;
}
