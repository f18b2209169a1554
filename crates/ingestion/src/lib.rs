//! # Ingestion Pipeline
//!
//! Sensor data ingestion module.
//!
//! Responsibilities:
//! - Register accelerometer/gyroscope data sources (Mock, Replay, platform)
//! - Tag readings into `TaggedSample`
//! - Backpressure management on the per-session channel
//! - Stop-time fence: unsubscribe, wait for in-flight callbacks, then drain
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{BackpressureConfig, DeviceClock, IngestionPipeline, MockMotionSensor};
//! use contracts::SensorKind;
//!
//! let clock = DeviceClock::new();
//! let mut pipeline = IngestionPipeline::new(BackpressureConfig::unbounded());
//! for kind in SensorKind::ALL {
//!     pipeline.register_sensor_source(Box::new(MockMotionSensor::with_defaults(kind, clock)));
//! }
//!
//! pipeline.start_all()?;
//! // ... record ...
//! pipeline.stop_and_drain(|tagged| buffers.push(tagged));
//! ```

mod adapter;
mod config;
mod error;
mod generic_adapter;
mod mock;
mod pipeline;
mod replay;

// Re-exports
pub use adapter::SensorAdapter;
pub use config::{BackpressureConfig, IngestionMetrics, MetricsSnapshot};
pub use contracts::TaggedSample;
pub use error::{IngestionError, Result};
pub use generic_adapter::GenericSensorAdapter;
pub use mock::{DeviceClock, MockMotionSensor, MockSensorConfig};
pub use pipeline::IngestionPipeline;
pub use replay::{ReplayConfig, ReplaySensor};
