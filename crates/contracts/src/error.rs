//! Layered error definitions
//!
//! Categorized by source: config / sensor / sink

use thiserror::Error;

use crate::SensorKind;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sensor Errors =====
    /// Sensor capability missing on this device
    #[error("{kind} sensor is not supported")]
    SensorNotSupported { kind: SensorKind },

    /// Sensor subscription failed
    #[error("{kind} sensor subscribe error: {message}")]
    SensorSubscribe { kind: SensorKind, message: String },

    // ===== Sink Errors =====
    /// Sink open error
    #[error("sink '{sink_name}' open error: {message}")]
    SinkOpen { sink_name: String, message: String },

    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sensor subscribe error
    pub fn sensor_subscribe(kind: SensorKind, message: impl Into<String>) -> Self {
        Self::SensorSubscribe {
            kind,
            message: message.into(),
        }
    }

    /// Create sink open error
    pub fn sink_open(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkOpen {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Whether this error means the sensor cannot be used at all
    pub fn is_sensor_unavailable(&self) -> bool {
        matches!(
            self,
            Self::SensorNotSupported { .. } | Self::SensorSubscribe { .. }
        )
    }
}
