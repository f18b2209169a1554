//! MemorySink - keeps encoded lines in a shared map
//!
//! Used by tests and by callers that want the export without touching disk.
//! The provider can be switched to fail on open or on write.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{ContractError, PairedRecord, RecordSink, SinkProvider};

type Files = Arc<Mutex<BTreeMap<u64, Vec<String>>>>;

fn lock(files: &Files) -> MutexGuard<'_, BTreeMap<u64, Vec<String>>> {
    files.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory sink writing into the provider's map under its record id
pub struct MemorySink {
    name: String,
    record_id: u64,
    files: Files,
    fail_write: Arc<AtomicBool>,
}

impl RecordSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, record: &PairedRecord) -> Result<(), ContractError> {
        if self.fail_write.load(Ordering::Relaxed) {
            return Err(ContractError::sink_write(&self.name, "injected write failure"));
        }
        lock(&self.files)
            .entry(self.record_id)
            .or_default()
            .push(crate::format::encode_line(record));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    fn discard(&mut self) -> Result<(), ContractError> {
        lock(&self.files).remove(&self.record_id);
        Ok(())
    }
}

/// Cloneable handle: keep one clone to inspect what the other one exported
#[derive(Clone, Default)]
pub struct MemorySinkProvider {
    files: Files,
    fail_open: Arc<AtomicBool>,
    fail_write: Arc<AtomicBool>,
}

impl MemorySinkProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_write(&self, fail: bool) {
        self.fail_write.store(fail, Ordering::Relaxed);
    }

    /// Lines exported under `record_id` (each ends with `\n`)
    pub fn lines(&self, record_id: u64) -> Option<Vec<String>> {
        lock(&self.files).get(&record_id).cloned()
    }

    /// Record ids that have been opened, ascending
    pub fn record_ids(&self) -> Vec<u64> {
        lock(&self.files).keys().copied().collect()
    }
}

impl SinkProvider for MemorySinkProvider {
    fn open(&mut self, record_id: u64) -> Result<Box<dyn RecordSink>, ContractError> {
        let name = format!("memory:{record_id}");
        if self.fail_open.load(Ordering::Relaxed) {
            return Err(ContractError::sink_open(name, "injected open failure"));
        }

        // Reopening an id starts it over, like truncating a file
        lock(&self.files).insert(record_id, Vec::new());
        Ok(Box::new(MemorySink {
            name,
            record_id,
            files: self.files.clone(),
            fail_write: self.fail_write.clone(),
        }))
    }
}
