//! LogSink - logs record summaries via tracing

use contracts::{ContractError, PairedRecord, RecordSink, SinkProvider};
use tracing::{info, instrument};

/// Sink that logs records instead of persisting them (dry runs, debugging)
pub struct LogSink {
    name: String,
    written: u64,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            written: 0,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl RecordSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, record: &PairedRecord) -> Result<(), ContractError> {
        self.written += 1;
        info!(
            sink = %self.name,
            time = record.fused_timestamp,
            skew = record.skew(),
            accel = ?record.accel.values,
            gyro = ?record.gyro.values,
            "PairedRecord"
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, records = self.written, "LogSink closed");
        Ok(())
    }
}

/// Opens a `LogSink` named after the record id
#[derive(Debug, Clone, Default)]
pub struct LogSinkProvider;

impl SinkProvider for LogSinkProvider {
    fn open(&mut self, record_id: u64) -> Result<Box<dyn RecordSink>, ContractError> {
        Ok(Box::new(LogSink::new(format!("log:{record_id}"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Sample;

    #[test]
    fn test_log_sink_counts_writes() {
        let mut sink = LogSink::new("test_log");
        let record = PairedRecord::new(Sample::new(1, [0.0; 3]), Sample::new(3, [0.0; 3]));

        sink.write(&record).unwrap();
        sink.write(&record).unwrap();
        sink.close().unwrap();

        assert_eq!(sink.written(), 2);
    }

    #[test]
    fn test_log_provider_names_sink() {
        let sink = LogSinkProvider.open(4).unwrap();
        assert_eq!(sink.name(), "log:4");
        assert!(sink.path().is_none());
    }
}
