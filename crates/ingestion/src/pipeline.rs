//! Ingestion Pipeline main entry

use std::sync::Arc;

use async_channel::{bounded, unbounded, Receiver, Sender, TryRecvError};
use contracts::{SensorKind, SensorSource, TaggedSample};
use tracing::{debug, info, instrument};

use crate::adapter::SensorAdapter;
use crate::config::{BackpressureConfig, IngestionMetrics};
use crate::error::{IngestionError, Result};
use crate::generic_adapter::GenericSensorAdapter;

/// Ingestion Pipeline
///
/// Owns one adapter per sensor kind and a per-session channel. The channel is
/// created by `start_all` and closed by `stop_and_drain`, so samples from two
/// recordings can never mix.
pub struct IngestionPipeline {
    /// Registered adapters (at most one per kind)
    adapters: Vec<Box<dyn SensorAdapter>>,

    /// Shared metrics
    metrics: Arc<IngestionMetrics>,

    /// Session receiver (present while running)
    rx: Option<Receiver<TaggedSample>>,

    /// Backpressure configuration
    config: BackpressureConfig,
}

impl IngestionPipeline {
    /// Create new Ingestion Pipeline
    pub fn new(config: BackpressureConfig) -> Self {
        Self {
            adapters: Vec::new(),
            metrics: Arc::new(IngestionMetrics::new()),
            rx: None,
            config,
        }
    }

    /// Register sensor data source
    ///
    /// Replaces any source previously registered for the same kind.
    #[instrument(
        name = "ingestion_register_sensor_source",
        skip(self, source),
        fields(kind = %source.kind())
    )]
    pub fn register_sensor_source(&mut self, source: Box<dyn SensorSource>) {
        self.register_adapter(Box::new(GenericSensorAdapter::new(source)));
    }

    /// Register a prebuilt adapter
    pub fn register_adapter(&mut self, adapter: Box<dyn SensorAdapter>) {
        let kind = adapter.kind();
        if let Some(old) = self.adapters.iter().position(|a| a.kind() == kind) {
            self.adapters[old].stop();
            self.adapters.remove(old);
        }
        debug!(kind = %kind, "registered sensor adapter");
        self.adapters.push(adapter);
    }

    fn open_channel(&self) -> (Sender<TaggedSample>, Receiver<TaggedSample>) {
        if self.config.is_unbounded() {
            unbounded()
        } else {
            bounded(self.config.channel_capacity)
        }
    }

    /// Start all registered sensors on a fresh session channel
    ///
    /// Both kinds must be registered. If any sensor fails to subscribe, the
    /// ones already started are stopped and no channel survives.
    #[instrument(name = "ingestion_start_all", skip(self))]
    pub fn start_all(&mut self) -> Result<()> {
        if self.rx.is_some() {
            return Err(IngestionError::AlreadyStarted);
        }

        for kind in SensorKind::ALL {
            if !self.adapters.iter().any(|a| a.kind() == kind) {
                return Err(IngestionError::MissingSource { kind });
            }
        }

        self.metrics.reset();
        let (tx, rx) = self.open_channel();

        for (idx, adapter) in self.adapters.iter().enumerate() {
            if let Err(e) = adapter.start(tx.clone(), self.metrics.clone()) {
                for started in &self.adapters[..idx] {
                    started.stop();
                }
                return Err(e);
            }
        }

        info!(
            count = self.adapters.len(),
            unbounded = self.config.is_unbounded(),
            "all sensor adapters started"
        );
        self.rx = Some(rx);
        Ok(())
    }

    /// Move samples that already arrived out of the channel, without blocking
    ///
    /// Returns the number of samples handed to `sink`.
    pub fn drain_pending(&mut self, mut sink: impl FnMut(TaggedSample)) -> usize {
        let Some(rx) = self.rx.as_ref() else {
            return 0;
        };

        let mut count = 0;
        while let Ok(sample) = rx.try_recv() {
            sink(sample);
            count += 1;
        }
        self.metrics.record_drained(count);
        count
    }

    /// Stop every sensor, fence in-flight deliveries, then drain the channel dry
    ///
    /// After this returns no further sample of this session can be observed.
    #[instrument(name = "ingestion_stop_and_drain", skip(self, sink))]
    pub fn stop_and_drain(&mut self, mut sink: impl FnMut(TaggedSample)) -> usize {
        self.stop_all();

        let Some(rx) = self.rx.take() else {
            return 0;
        };

        let mut count = 0;
        loop {
            match rx.try_recv() {
                Ok(sample) => {
                    sink(sample);
                    count += 1;
                }
                Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Empty) => {
                    // Every sender is released by the fence; an open channel here
                    // means an adapter outside this pipeline still holds one.
                    debug!("channel empty but not closed after fence");
                    break;
                }
            }
        }

        self.metrics.record_drained(count);
        info!(drained = count, "ingestion stopped");
        count
    }

    fn stop_all(&self) {
        for adapter in &self.adapters {
            if adapter.is_listening() {
                debug!(kind = %adapter.kind(), "stopping adapter");
            }
            adapter.stop();
        }
    }

    /// Whether a session channel is open
    pub fn is_running(&self) -> bool {
        self.rx.is_some()
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    /// Get registered sensor count
    pub fn sensor_count(&self) -> usize {
        self.adapters.len()
    }

    /// Check if the sensor of the given kind is listening
    pub fn is_sensor_listening(&self, kind: SensorKind) -> bool {
        self.adapters
            .iter()
            .find(|a| a.kind() == kind)
            .map(|a| a.is_listening())
            .unwrap_or(false)
    }
}

impl Drop for IngestionPipeline {
    fn drop(&mut self) {
        self.stop_all();
    }
}
