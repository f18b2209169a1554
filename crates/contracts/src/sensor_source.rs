//! SensorSource trait - Sensor data source abstraction
//!
//! Defines a unified interface for motion sensor data sources, decoupling the
//! ingestion channel from concrete platform sensor services.

use std::sync::Arc;

use crate::{ContractError, Sample, SensorKind};

/// Sensor data callback type
///
/// When a sensor produces a reading, it sends `Sample` through this callback.
/// Uses `Arc` to allow callback sharing across multiple contexts.
pub type SampleCallback = Arc<dyn Fn(Sample) + Send + Sync>;

/// Sensor data source trait
///
/// Abstracts the common behavior of platform sensors and mock/replay sensors.
///
/// # Example
///
/// ```ignore
/// let sensor: Box<dyn SensorSource> = get_sensor_source();
/// sensor.listen(Arc::new(|sample| {
///     println!("Received sample at {}", sample.timestamp);
/// }))?;
/// // ... record ...
/// sensor.stop();
/// ```
pub trait SensorSource: Send + Sync {
    /// Which motion sensor this source delivers
    fn kind(&self) -> SensorKind;

    /// Whether the capability exists on this device
    fn is_supported(&self) -> bool {
        true
    }

    /// Register data callback and start delivery
    ///
    /// If already listening, repeated calls are idempotent (won't register multiple callbacks).
    ///
    /// # Errors
    /// Returns a sensor error when the capability is missing or the subscription fails.
    fn listen(&self, callback: SampleCallback) -> Result<(), ContractError>;

    /// Stop delivery
    ///
    /// Once stopped, the source must drop its callback after any delivery already
    /// in progress returns.
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;
}
