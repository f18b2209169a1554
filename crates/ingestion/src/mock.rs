//! Mock motion sensor implementation
//!
//! Implements `SensorSource` trait, generates simulated 3-axis readings.
//! Used for testing and development without a platform sensor service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use contracts::{Accuracy, ContractError, Sample, SampleCallback, SensorKind, SensorSource};
use tracing::{debug, trace, warn};

/// Standard gravity (m/s²)
const GRAVITY: f32 = 9.81;

/// Shared device clock
///
/// Both mock sensors must read the same clock so their timestamps are comparable.
#[derive(Debug, Clone, Copy)]
pub struct DeviceClock {
    origin: Instant,
}

impl DeviceClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Microseconds since the clock was created
    pub fn now_us(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

impl Default for DeviceClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock sensor configuration
#[derive(Debug, Clone)]
pub struct MockSensorConfig {
    /// Delivery interval (milliseconds)
    pub interval_ms: u64,
    /// Whether the capability is present
    pub supported: bool,
    /// Reported accuracy
    pub accuracy: Accuracy,
}

impl Default for MockSensorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 20,
            supported: true,
            accuracy: Accuracy::Good,
        }
    }
}

impl MockSensorConfig {
    /// Build from the blueprint's per-sensor section
    pub fn from_sensor_config(config: &contracts::SensorConfig) -> Self {
        Self {
            interval_ms: config.interval_ms,
            ..Default::default()
        }
    }
}

/// Mock motion sensor
///
/// Generates simulated readings at the configured interval in a background thread.
/// Data is sent through the callback function, like a platform sensor listener.
pub struct MockMotionSensor {
    kind: SensorKind,
    config: MockSensorConfig,
    clock: DeviceClock,
    listening: Arc<AtomicBool>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl MockMotionSensor {
    /// Create new mock sensor
    pub fn new(kind: SensorKind, config: MockSensorConfig, clock: DeviceClock) -> Self {
        Self {
            kind,
            config,
            clock,
            listening: Arc::new(AtomicBool::new(false)),
            thread_handle: Mutex::new(None),
        }
    }

    /// Create mock sensor with default configuration
    pub fn with_defaults(kind: SensorKind, clock: DeviceClock) -> Self {
        Self::new(kind, MockSensorConfig::default(), clock)
    }

    /// Synthetic reading at `t` seconds: gravity plus gentle sway, or slow rotation
    fn generate_values(kind: SensorKind, t: f32) -> [f32; 3] {
        match kind {
            SensorKind::Accelerometer => [
                0.3 * t.sin(),
                0.2 * t.cos(),
                GRAVITY + 0.05 * (2.0 * t).sin(),
            ],
            SensorKind::Gyroscope => [0.1 * t.sin(), 0.05 * t.cos(), 0.02],
        }
    }
}

impl SensorSource for MockMotionSensor {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn is_supported(&self) -> bool {
        self.config.supported
    }

    fn listen(&self, callback: SampleCallback) -> Result<(), ContractError> {
        if !self.config.supported {
            return Err(ContractError::SensorNotSupported { kind: self.kind });
        }
        if self.config.interval_ms == 0 {
            return Err(ContractError::sensor_subscribe(
                self.kind,
                "interval must be > 0",
            ));
        }

        // Idempotent: if already listening, don't start again
        if self.listening.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let kind = self.kind;
        let clock = self.clock;
        let accuracy = self.config.accuracy;
        let listening = self.listening.clone();
        let interval = Duration::from_millis(self.config.interval_ms);

        let handle = thread::spawn(move || {
            debug!(kind = %kind, interval_ms = interval.as_millis() as u64, "mock sensor started");

            while listening.load(Ordering::Relaxed) {
                let timestamp = clock.now_us();
                let t = timestamp as f32 / 1_000_000.0;
                let sample =
                    Sample::new(timestamp, Self::generate_values(kind, t)).with_accuracy(accuracy);

                callback(sample);
                trace!(kind = %kind, timestamp, "mock sample sent");

                thread::sleep(interval);
            }

            debug!(kind = %kind, "mock sensor stopped");
        });

        *self
            .thread_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
        let handle = self
            .thread_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!(kind = %self.kind, "mock sensor thread panicked");
            }
        }
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

impl Drop for MockMotionSensor {
    fn drop(&mut self) {
        self.stop();
    }
}
