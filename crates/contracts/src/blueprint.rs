//! RecorderBlueprint - Config Loader 输出
//!
//! 描述完整的录制配置：传感器、对齐参数、会话策略、通道、输出路径。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::SensorKind;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的录制配置蓝图
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecorderBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 传感器设置
    #[serde(default)]
    pub sensors: SensorsConfig,

    /// 对齐参数
    #[serde(default)]
    pub aligner: AlignerConfig,

    /// 会话策略
    #[serde(default)]
    pub session: SessionConfig,

    /// 采样通道
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// 输出路由
    #[serde(default)]
    pub output: OutputConfig,
}

/// 传感器来源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// 后台线程生成的模拟数据
    #[default]
    Mock,
}

/// 传感器配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorsConfig {
    /// 数据来源
    #[serde(default)]
    pub source: SourceKind,

    /// 加速度计
    #[serde(default)]
    pub accelerometer: SensorConfig,

    /// 陀螺仪
    #[serde(default)]
    pub gyroscope: SensorConfig,
}

impl SensorsConfig {
    /// Per-kind lookup
    pub fn get(&self, kind: SensorKind) -> &SensorConfig {
        match kind {
            SensorKind::Accelerometer => &self.accelerometer,
            SensorKind::Gyroscope => &self.gyroscope,
        }
    }
}

/// 单个传感器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// 采样间隔 (毫秒)，必须 > 0
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    20
}

/// Default alignment bucket width: 1/10 s in device microseconds
pub const DEFAULT_BUCKET_WIDTH: u64 = 100_000;

/// 对齐参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignerConfig {
    /// 时间桶宽度 (设备时钟单位)，必须 > 0
    #[serde(default = "default_bucket_width")]
    pub bucket_width: u64,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            bucket_width: DEFAULT_BUCKET_WIDTH,
        }
    }
}

fn default_bucket_width() -> u64 {
    DEFAULT_BUCKET_WIDTH
}

/// 重复命令处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandPolicy {
    /// 忽略并记录警告
    #[default]
    Ignore,
    /// 返回错误
    Reject,
}

/// 会话策略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// start while recording / stop while idle
    #[serde(default)]
    pub command_policy: CommandPolicy,
}

/// 采样通道配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// 通道容量，0 表示无界
    #[serde(default)]
    pub channel_capacity: usize,
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出目录
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// 文件名前缀 (后接 record_id)
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// 文件扩展名 (不含点)
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            file_prefix: default_file_prefix(),
            file_extension: default_file_extension(),
        }
    }
}

impl OutputConfig {
    /// File name for a given record id
    pub fn file_name(&self, record_id: u64) -> String {
        format!("{}{}.{}", self.file_prefix, record_id, self.file_extension)
    }

    /// Full output path for a given record id
    pub fn record_path(&self, record_id: u64) -> PathBuf {
        self.directory.join(self.file_name(record_id))
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("./records")
}

fn default_file_prefix() -> String {
    "record_".to_string()
}

fn default_file_extension() -> String {
    "txt".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let bp: RecorderBlueprint = serde_json::from_str("{}").unwrap();
        assert_eq!(bp.sensors.accelerometer.interval_ms, 20);
        assert_eq!(bp.sensors.gyroscope.interval_ms, 20);
        assert_eq!(bp.aligner.bucket_width, DEFAULT_BUCKET_WIDTH);
        assert_eq!(bp.session.command_policy, CommandPolicy::Ignore);
        assert_eq!(bp.ingestion.channel_capacity, 0);
    }

    #[test]
    fn test_record_path() {
        let output = OutputConfig {
            directory: PathBuf::from("/tmp/out"),
            ..Default::default()
        };
        assert_eq!(output.file_name(7), "record_7.txt");
        assert_eq!(output.record_path(0), PathBuf::from("/tmp/out/record_0.txt"));
    }

    #[test]
    fn test_policy_snake_case() {
        let session: SessionConfig =
            serde_json::from_str(r#"{"command_policy": "reject"}"#).unwrap();
        assert_eq!(session.command_policy, CommandPolicy::Reject);
    }
}
