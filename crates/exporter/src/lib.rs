//! # Exporter
//!
//! 录制结果导出模块。
//!
//! 负责：
//! - 按顺序把 `PairedRecord` 编码成文本行
//! - 每次录制打开一个 sink (文件 / 日志 / 内存)
//! - 读回导出文件，用于校验与检查

pub mod error;
pub mod exporter;
pub mod format;
pub mod sinks;

pub use contracts::{PairedRecord, RecordSink, SinkProvider};
pub use error::ExportError;
pub use exporter::{ExportSummary, Exporter};
pub use format::{encode_line, parse_line, read_file, ParsedLine};
pub use sinks::{
    FileSink, FileSinkProvider, LogSink, LogSinkProvider, MemorySink, MemorySinkProvider,
};
