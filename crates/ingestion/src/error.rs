//! Ingestion 错误类型

use std::path::PathBuf;

use contracts::{ContractError, SensorKind};
use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 传感器不可用 (不支持或订阅失败)
    #[error("{kind} sensor unavailable: {source}")]
    SensorUnavailable {
        /// 传感器类型
        kind: SensorKind,
        /// 底层错误
        #[source]
        source: ContractError,
    },

    /// 未注册该类型的数据源
    #[error("no source registered for {kind}")]
    MissingSource {
        /// 传感器类型
        kind: SensorKind,
    },

    /// 采集已在进行
    #[error("ingestion already started")]
    AlreadyStarted,

    /// 回放文件读取失败
    #[error("failed to load replay file {}: {message}", path.display())]
    Replay {
        /// 文件路径
        path: PathBuf,
        /// 错误消息
        message: String,
    },
}

impl IngestionError {
    /// Create sensor unavailable error
    pub fn sensor_unavailable(kind: SensorKind, source: ContractError) -> Self {
        Self::SensorUnavailable { kind, source }
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
