//! Backpressure configuration and metrics

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{IngestionConfig, SensorKind};

/// Backpressure configuration
#[derive(Debug, Clone, Default)]
pub struct BackpressureConfig {
    /// Channel capacity (0 = unbounded)
    pub channel_capacity: usize,
}

impl BackpressureConfig {
    /// Create new backpressure configuration
    pub fn new(channel_capacity: usize) -> Self {
        Self { channel_capacity }
    }

    /// Unbounded channel
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    pub fn is_unbounded(&self) -> bool {
        self.channel_capacity == 0
    }
}

impl From<&IngestionConfig> for BackpressureConfig {
    fn from(config: &IngestionConfig) -> Self {
        Self::new(config.channel_capacity)
    }
}

/// Ingestion metrics (per recording session)
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Accelerometer samples received
    pub accel_received: AtomicU64,

    /// Gyroscope samples received
    pub gyro_received: AtomicU64,

    /// Samples dropped because the bounded channel was full
    pub samples_dropped: AtomicU64,

    /// Samples delivered to the sink side
    pub samples_drained: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    fn received_counter(&self, kind: SensorKind) -> &AtomicU64 {
        match kind {
            SensorKind::Accelerometer => &self.accel_received,
            SensorKind::Gyroscope => &self.gyro_received,
        }
    }

    /// Record sample received
    pub fn record_received(&self, kind: SensorKind) {
        self.received_counter(kind).fetch_add(1, Ordering::Relaxed);
        metrics::counter!(
            "motion_recorder_samples_received_total",
            "sensor" => kind.as_str()
        )
        .increment(1);
    }

    /// Record sample dropped
    pub fn record_dropped(&self, kind: SensorKind) {
        self.samples_dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(
            "motion_recorder_samples_dropped_total",
            "sensor" => kind.as_str()
        )
        .increment(1);
    }

    /// Record samples handed out of the channel
    pub fn record_drained(&self, count: usize) {
        self.samples_drained
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Zero all counters (new session)
    pub fn reset(&self) {
        self.accel_received.store(0, Ordering::Relaxed);
        self.gyro_received.store(0, Ordering::Relaxed);
        self.samples_dropped.store(0, Ordering::Relaxed);
        self.samples_drained.store(0, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            accel_received: self.accel_received.load(Ordering::Relaxed),
            gyro_received: self.gyro_received.load(Ordering::Relaxed),
            samples_dropped: self.samples_dropped.load(Ordering::Relaxed),
            samples_drained: self.samples_drained.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub accel_received: u64,
    pub gyro_received: u64,
    pub samples_dropped: u64,
    pub samples_drained: u64,
}

impl MetricsSnapshot {
    pub fn total_received(&self) -> u64 {
        self.accel_received + self.gyro_received
    }
}
