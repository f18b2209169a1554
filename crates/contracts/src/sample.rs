//! Sample - Ingestion output
//!
//! 单个传感器读数结构。

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of axes carried by a motion sample
pub const AXES: usize = 3;

/// Motion sensor kind
///
/// Tags every sample travelling over the shared ingestion channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Accelerometer,
    Gyroscope,
}

impl SensorKind {
    /// Both kinds, accelerometer first
    pub const ALL: [SensorKind; 2] = [SensorKind::Accelerometer, SensorKind::Gyroscope];

    /// Stable lowercase name (used for logging/metrics labels)
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Gyroscope => "gyroscope",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reading accuracy reported by the sensor service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accuracy {
    #[default]
    Undefined,
    Bad,
    Normal,
    Good,
    VeryGood,
}

impl Accuracy {
    /// Raw integer level as delivered by the platform
    pub fn level(&self) -> i32 {
        match self {
            Accuracy::Undefined => -1,
            Accuracy::Bad => 0,
            Accuracy::Normal => 1,
            Accuracy::Good => 2,
            Accuracy::VeryGood => 3,
        }
    }
}

impl From<i32> for Accuracy {
    fn from(level: i32) -> Self {
        match level {
            0 => Accuracy::Bad,
            1 => Accuracy::Normal,
            2 => Accuracy::Good,
            3 => Accuracy::VeryGood,
            _ => Accuracy::Undefined,
        }
    }
}

/// One timestamped 3-axis reading
///
/// Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Device clock timestamp (microseconds)
    pub timestamp: u64,

    /// Reading accuracy
    #[serde(default)]
    pub accuracy: Accuracy,

    /// Axis values (x, y, z)
    pub values: [f32; AXES],
}

impl Sample {
    /// Create a sample with undefined accuracy
    pub fn new(timestamp: u64, values: [f32; AXES]) -> Self {
        Self {
            timestamp,
            accuracy: Accuracy::Undefined,
            values,
        }
    }

    /// Builder-style accuracy override
    pub fn with_accuracy(mut self, accuracy: Accuracy) -> Self {
        self.accuracy = accuracy;
        self
    }
}

/// A sample tagged with the sensor that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaggedSample {
    pub kind: SensorKind,
    pub sample: Sample,
}

impl TaggedSample {
    pub fn new(kind: SensorKind, sample: Sample) -> Self {
        Self { kind, sample }
    }
}
