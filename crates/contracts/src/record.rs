//! PairedRecord - Sync Engine output
//!
//! Merged accelerometer + gyroscope record and per-run alignment metadata.

use serde::{Deserialize, Serialize};

use crate::Sample;

/// Integer midpoint of two timestamps (floor), without overflow
#[inline]
pub fn midpoint(a: u64, b: u64) -> u64 {
    a / 2 + b / 2 + (a % 2 + b % 2) / 2
}

/// One accelerometer sample merged with one gyroscope sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairedRecord {
    /// Midpoint of the two contributing timestamps
    pub fused_timestamp: u64,

    /// Accelerometer contribution
    pub accel: Sample,

    /// Gyroscope contribution
    pub gyro: Sample,
}

impl PairedRecord {
    /// Pair two samples, deriving the fused timestamp
    pub fn new(accel: Sample, gyro: Sample) -> Self {
        Self {
            fused_timestamp: midpoint(accel.timestamp, gyro.timestamp),
            accel,
            gyro,
        }
    }

    /// Absolute distance between the two contributing timestamps
    pub fn skew(&self) -> u64 {
        self.accel.timestamp.abs_diff(self.gyro.timestamp)
    }
}

/// Alignment metadata (one aligner run)
///
/// For each side: `pairs + dropped + trailing == len`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// Accelerometer input length
    pub accel_len: usize,

    /// Gyroscope input length
    pub gyro_len: usize,

    /// Emitted paired records
    pub pairs: usize,

    /// Accelerometer samples skipped because they were behind
    pub dropped_accel: usize,

    /// Gyroscope samples skipped because they were behind
    pub dropped_gyro: usize,

    /// Accelerometer samples left over when the gyroscope stream ran out
    pub trailing_accel: usize,

    /// Gyroscope samples left over when the accelerometer stream ran out
    pub trailing_gyro: usize,

    /// Largest timestamp distance inside one pair
    pub max_skew: u64,
}

impl AlignmentReport {
    /// Total samples that did not make it into a pair
    pub fn unpaired(&self) -> usize {
        self.dropped_accel + self.dropped_gyro + self.trailing_accel + self.trailing_gyro
    }
}
