//! FileSink - writes one text file per recording

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use contracts::{ContractError, OutputConfig, PairedRecord, RecordSink, SinkProvider};
use tracing::{debug, error, info, instrument, warn};

use crate::format;

/// Sink that writes encoded records to a text file
pub struct FileSink {
    name: String,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Create (or truncate) the file, creating parent directories
    pub fn create(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let path = path.into();

        let open = || -> std::io::Result<File> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            File::create(&path)
        };

        let file = open().map_err(|e| {
            error!(sink = %name, path = %path.display(), error = %e, "Open failed");
            ContractError::sink_open(&name, format!("{}: {e}", path.display()))
        })?;

        debug!(sink = %name, path = %path.display(), "FileSink opened");
        Ok(Self {
            name,
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>, ContractError> {
        let name = &self.name;
        self.writer
            .as_mut()
            .ok_or_else(|| ContractError::sink_write(name, "sink already closed"))
    }
}

impl RecordSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn write(&mut self, record: &PairedRecord) -> Result<(), ContractError> {
        let writer = self.writer()?;
        format::write_line(writer, record).map_err(|e| {
            error!(sink = %self.name, time = record.fused_timestamp, error = %e, "Write failed");
            ContractError::sink_write(&self.name, e.to_string())
        })
    }

    #[instrument(name = "file_sink_flush", skip(self), fields(sink = %self.name))]
    fn flush(&mut self) -> Result<(), ContractError> {
        let writer = self.writer()?;
        writer
            .flush()
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    #[instrument(name = "file_sink_close", skip(self), fields(sink = %self.name))]
    fn close(&mut self) -> Result<(), ContractError> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;
        }
        debug!(sink = %self.name, path = %self.path.display(), "FileSink closed");
        Ok(())
    }

    #[instrument(name = "file_sink_discard", skip(self), fields(sink = %self.name))]
    fn discard(&mut self) -> Result<(), ContractError> {
        // Unflushed bytes go with the file
        drop(self.writer.take());
        match fs::remove_file(&self.path) {
            Ok(()) => {
                warn!(
                    sink = %self.name,
                    path = %self.path.display(),
                    "Partial record file removed"
                );
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ContractError::sink_write(
                &self.name,
                format!("could not remove {}: {e}", self.path.display()),
            )),
        }
    }
}

/// Opens `<directory>/<prefix><record_id>.<extension>` per recording
#[derive(Debug, Clone)]
pub struct FileSinkProvider {
    config: OutputConfig,
}

impl FileSinkProvider {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// One past the highest record id already present in the output directory
    ///
    /// A missing directory counts as empty.
    pub fn next_record_id(&self) -> std::io::Result<u64> {
        let entries = match fs::read_dir(&self.config.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let suffix = format!(".{}", self.config.file_extension);
        let mut next = 0;
        for entry in entries {
            let name = entry?.file_name();
            let id = name
                .to_str()
                .and_then(|n| n.strip_prefix(self.config.file_prefix.as_str()))
                .and_then(|n| n.strip_suffix(suffix.as_str()))
                .and_then(|n| n.parse::<u64>().ok());
            if let Some(id) = id {
                next = next.max(id.saturating_add(1));
            }
        }
        Ok(next)
    }
}

impl SinkProvider for FileSinkProvider {
    fn open(&mut self, record_id: u64) -> Result<Box<dyn RecordSink>, ContractError> {
        let path = self.config.record_path(record_id);
        info!(record_id, path = %path.display(), "Opening record file");
        Ok(Box::new(FileSink::create("file", path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Sample;
    use tempfile::tempdir;

    fn sample_record(ts: u64) -> PairedRecord {
        PairedRecord::new(
            Sample::new(ts, [1.0, 0.0, 0.0]),
            Sample::new(ts + 4, [0.0, 0.0, 1.0]),
        )
    }

    #[test]
    fn test_file_sink_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let mut sink = FileSink::create("test_file", &path).unwrap();
        sink.write(&sample_record(100)).unwrap();
        sink.write(&sample_record(200)).unwrap();
        sink.close().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.ends_with("'Time': 202}\n"));
    }

    #[test]
    fn test_write_after_close_fails() {
        let dir = tempdir().unwrap();
        let mut sink = FileSink::create("closed", dir.path().join("c.txt")).unwrap();
        sink.close().unwrap();

        let err = sink.write(&sample_record(1)).unwrap_err();
        assert!(matches!(err, ContractError::SinkWrite { .. }));
        // Closing twice is harmless
        sink.close().unwrap();
    }

    #[test]
    fn test_discard_removes_partial_file() {
        let dir = tempdir().unwrap();
        let provider_config = OutputConfig {
            directory: dir.path().to_path_buf(),
            ..Default::default()
        };
        let mut provider = FileSinkProvider::new(provider_config);

        let mut sink = provider.open(0).unwrap();
        sink.write(&sample_record(100)).unwrap();
        sink.flush().unwrap();
        assert!(dir.path().join("record_0.txt").exists());

        sink.discard().unwrap();
        assert!(!dir.path().join("record_0.txt").exists());
        assert_eq!(provider.next_record_id().unwrap(), 0);

        // Nothing left to remove
        sink.discard().unwrap();
    }

    #[test]
    fn test_provider_builds_path_and_directory() {
        let dir = tempdir().unwrap();
        let config = OutputConfig {
            directory: dir.path().join("nested").join("records"),
            ..Default::default()
        };
        let mut provider = FileSinkProvider::new(config);

        let mut sink = provider.open(7).unwrap();
        sink.close().unwrap();

        let expected = dir.path().join("nested/records/record_7.txt");
        assert_eq!(sink.path(), Some(expected.as_path()));
        assert!(expected.exists());
    }

    #[test]
    fn test_next_record_id_scans_directory() {
        let dir = tempdir().unwrap();
        let provider = FileSinkProvider::new(OutputConfig {
            directory: dir.path().to_path_buf(),
            ..Default::default()
        });
        assert_eq!(provider.next_record_id().unwrap(), 0);

        let names = [
            "record_0.txt",
            "record_4.txt",
            "record_x.txt",
            "other_9.txt",
            "record_7.csv",
        ];
        for name in names {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        assert_eq!(provider.next_record_id().unwrap(), 5);

        let missing = FileSinkProvider::new(OutputConfig {
            directory: dir.path().join("absent"),
            ..Default::default()
        });
        assert_eq!(missing.next_record_id().unwrap(), 0);
    }

    #[test]
    fn test_provider_open_failure() {
        let dir = tempdir().unwrap();
        // A regular file where the directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let mut provider = FileSinkProvider::new(OutputConfig {
            directory: blocker,
            ..Default::default()
        });

        let err = provider.open(0).err().unwrap();
        assert!(matches!(err, ContractError::SinkOpen { .. }));
    }
}
