//! # Sync Engine
//!
//! 加速度计 / 陀螺仪双流对齐。
//!
//! 负责：
//! - 录制期间按到达顺序缓存样本 (`SampleBuffer`)
//! - 停止后以粗粒度时间桶做双指针归并 (`StreamAligner`)
//! - 输出 `PairedRecord` 序列与 `AlignmentReport`
//!
//! ## 使用示例
//!
//! ```ignore
//! use sync_engine::{SampleBuffer, StreamAligner};
//!
//! let aligner = StreamAligner::new(100_000)?;
//! let alignment = aligner.align(accel.as_slice(), gyro.as_slice());
//! for record in &alignment.records {
//!     // Hand to the exporter
//! }
//! ```

mod aligner;
mod bucket;
mod buffer;

// Re-exports
pub use aligner::{Alignment, StreamAligner};
pub use bucket::TimeBuckets;
pub use buffer::SampleBuffer;

// Re-export contracts types
pub use contracts::{AlignerConfig, AlignmentReport, PairedRecord, Sample};
