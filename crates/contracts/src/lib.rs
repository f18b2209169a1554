//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Uses the device sensor clock (microseconds, u64) as the only clock
//! - Accelerometer and gyroscope share that clock but sample independently

mod blueprint;
mod error;
mod record;
mod sample;
mod sensor_source;
mod sink;

pub use blueprint::*;
pub use error::*;
pub use record::*;
pub use sample::*;
pub use sensor_source::{SampleCallback, SensorSource};
pub use sink::*;
