//! Exporter - writes a merged sequence to a sink

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, TimeDelta, Utc};
use contracts::{PairedRecord, RecordSink, SinkProvider};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::error::ExportError;

/// Outcome of one successful export
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub record_id: u64,
    pub sink: String,
    pub lines: usize,
    pub path: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExportSummary {
    pub fn duration(&self) -> TimeDelta {
        self.finished_at - self.started_at
    }
}

/// Writes paired records in order, then flushes and closes the sink
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter;

impl Exporter {
    pub fn new() -> Self {
        Self
    }

    /// Export `records` into an already opened sink
    ///
    /// The sink is closed on success. On any failure it is discarded, so a
    /// partial destination never looks like a saved record.
    #[instrument(
        name = "exporter_export",
        skip(self, records, sink),
        fields(sink = %sink.name(), records = records.len())
    )]
    pub fn export(
        &self,
        record_id: u64,
        records: &[PairedRecord],
        sink: &mut dyn RecordSink,
    ) -> Result<ExportSummary, ExportError> {
        let started_at = Utc::now();
        let timer = Instant::now();

        if let Err(e) = Self::write_all(records, sink) {
            error!(record_id, error = %e, "Export failed");
            if let Err(discard_err) = sink.discard() {
                warn!(record_id, error = %discard_err, "Discarding partial output also failed");
            }
            metrics::counter!("motion_recorder_exports_total", "result" => "failure").increment(1);
            return Err(e);
        }

        let summary = ExportSummary {
            record_id,
            sink: sink.name().to_string(),
            lines: records.len(),
            path: sink.path().map(PathBuf::from),
            started_at,
            finished_at: Utc::now(),
        };

        metrics::counter!("motion_recorder_exports_total", "result" => "success").increment(1);
        metrics::counter!("motion_recorder_lines_written_total").increment(records.len() as u64);
        metrics::histogram!("motion_recorder_export_seconds").record(timer.elapsed().as_secs_f64());

        info!(
            record_id,
            sink = %summary.sink,
            lines = summary.lines,
            path = ?summary.path,
            "Export complete"
        );
        Ok(summary)
    }

    /// Open the destination for `record_id` through `provider`, then export
    pub fn export_to(
        &self,
        provider: &mut dyn SinkProvider,
        record_id: u64,
        records: &[PairedRecord],
    ) -> Result<ExportSummary, ExportError> {
        let mut sink = provider.open(record_id).inspect_err(|e| {
            error!(record_id, error = %e, "Could not open sink");
            metrics::counter!("motion_recorder_exports_total", "result" => "failure").increment(1);
        })?;
        self.export(record_id, records, sink.as_mut())
    }

    fn write_all(records: &[PairedRecord], sink: &mut dyn RecordSink) -> Result<(), ExportError> {
        for record in records {
            sink.write(record)?;
        }
        sink.flush()?;
        sink.close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::parse_line;
    use crate::sinks::{FileSinkProvider, MemorySinkProvider};
    use contracts::{ContractError, OutputConfig, Sample};
    use std::path::Path;

    /// Passes writes through until `remaining` runs out, then fails
    struct FailAfter {
        inner: Box<dyn RecordSink>,
        remaining: usize,
    }

    impl RecordSink for FailAfter {
        fn name(&self) -> &str {
            self.inner.name()
        }

        fn path(&self) -> Option<&Path> {
            self.inner.path()
        }

        fn write(&mut self, record: &PairedRecord) -> Result<(), ContractError> {
            if self.remaining == 0 {
                return Err(ContractError::sink_write(self.inner.name(), "File too large"));
            }
            self.remaining -= 1;
            self.inner.write(record)
        }

        fn flush(&mut self) -> Result<(), ContractError> {
            self.inner.flush()
        }

        fn close(&mut self) -> Result<(), ContractError> {
            self.inner.close()
        }

        fn discard(&mut self) -> Result<(), ContractError> {
            self.inner.discard()
        }
    }

    fn records(n: u64) -> Vec<PairedRecord> {
        (0..n)
            .map(|i| {
                PairedRecord::new(
                    Sample::new(i * 100, [i as f32, 0.5, -0.25]),
                    Sample::new(i * 100 + 3, [0.125, i as f32, 9.5]),
                )
            })
            .collect()
    }

    #[test]
    fn test_export_preserves_order_and_count() {
        let mut provider = MemorySinkProvider::new();
        let input = records(5);

        let summary = Exporter::new().export_to(&mut provider, 2, &input).unwrap();

        assert_eq!(summary.record_id, 2);
        assert_eq!(summary.lines, 5);
        assert!(summary.duration() >= TimeDelta::zero());

        let lines = provider.lines(2).unwrap();
        assert_eq!(lines.len(), input.len());
        for (line, record) in lines.iter().zip(&input) {
            assert!(parse_line(line).unwrap().matches(record));
        }
    }

    #[test]
    fn test_empty_export_opens_destination() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = FileSinkProvider::new(OutputConfig {
            directory: dir.path().to_path_buf(),
            ..Default::default()
        });

        let summary = Exporter::new().export_to(&mut provider, 0, &[]).unwrap();

        let path = summary.path.unwrap();
        assert_eq!(path, dir.path().join("record_0.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn test_write_failure_reported() {
        let mut provider = MemorySinkProvider::new();
        provider.set_fail_write(true);

        let err = Exporter::new()
            .export_to(&mut provider, 1, &records(2))
            .unwrap_err();
        assert!(matches!(err, ExportError::Sink(_)));
    }

    #[test]
    fn test_failed_file_export_leaves_no_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = FileSinkProvider::new(OutputConfig {
            directory: dir.path().to_path_buf(),
            ..Default::default()
        });

        // Enough lines to spill out of the BufWriter before the failure
        let input = records(2000);
        let mut sink = FailAfter {
            inner: provider.open(0).unwrap(),
            remaining: 1500,
        };
        let err = Exporter::new().export(0, &input, &mut sink).unwrap_err();

        assert!(matches!(err, ExportError::Sink(ContractError::SinkWrite { .. })));
        assert!(!dir.path().join("record_0.txt").exists());
        assert_eq!(provider.next_record_id().unwrap(), 0);
    }

    #[test]
    fn test_failed_write_discards_memory_record() {
        let mut provider = MemorySinkProvider::new();
        provider.set_fail_write(true);

        assert!(Exporter::new().export_to(&mut provider, 3, &records(2)).is_err());
        assert!(provider.lines(3).is_none());
    }

    #[test]
    fn test_open_failure_reported() {
        let mut provider = MemorySinkProvider::new();
        provider.set_fail_open(true);

        let err = Exporter::new()
            .export_to(&mut provider, 1, &records(1))
            .unwrap_err();
        assert!(err.to_string().contains("injected open failure"));
    }
}
