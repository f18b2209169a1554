//! 传感器适配器 trait

use std::sync::Arc;

use async_channel::Sender;
use contracts::{SensorKind, TaggedSample};

use crate::config::IngestionMetrics;
use crate::error::Result;

/// 传感器适配器 trait
///
/// 负责：
/// 1. 注册传感器回调
/// 2. 将读数标记为 `TaggedSample`
/// 3. 发送到会话通道（处理背压）
/// 4. 停止时屏障：`stop` 返回后不会再有发送
pub trait SensorAdapter: Send + Sync {
    /// 获取传感器类型
    fn kind(&self) -> SensorKind;

    /// 启动采集
    ///
    /// # Arguments
    /// * `tx` - 会话通道发送端
    /// * `metrics` - 共享的 ingestion 指标
    fn start(&self, tx: Sender<TaggedSample>, metrics: Arc<IngestionMetrics>) -> Result<()>;

    /// 停止采集，并等待正在进行的回调结束
    fn stop(&self);

    /// 检查传感器是否正在监听
    fn is_listening(&self) -> bool;
}
