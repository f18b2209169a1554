//! 录制会话指标收集模块
//!
//! 基于 AlignmentReport 收集和统计每次录制的对齐结果。

use contracts::{AlignmentReport, SensorKind};
use metrics::{counter, gauge, histogram};
use serde::Serialize;

/// 从 AlignmentReport 记录指标
///
/// 每次停止录制、对齐完成后调用。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_alignment;
///
/// let alignment = aligner.align(accel, gyro);
/// record_alignment(&alignment.report);
/// ```
pub fn record_alignment(report: &AlignmentReport) {
    counter!("motion_recorder_alignments_total").increment(1);
    counter!("motion_recorder_pairs_total").increment(report.pairs as u64);
    gauge!("motion_recorder_last_pairs").set(report.pairs as f64);

    // 被跳过的样本 (落后) 与尾部剩余样本
    let unpaired = [
        (SensorKind::Accelerometer, "behind", report.dropped_accel),
        (SensorKind::Gyroscope, "behind", report.dropped_gyro),
        (SensorKind::Accelerometer, "trailing", report.trailing_accel),
        (SensorKind::Gyroscope, "trailing", report.trailing_gyro),
    ];
    for (kind, reason, count) in unpaired {
        if count > 0 {
            counter!(
                "motion_recorder_unpaired_samples_total",
                "sensor" => kind.as_str(),
                "reason" => reason
            )
            .increment(count as u64);
        }
    }

    // 配对内时间差 (微秒)
    histogram!("motion_recorder_pair_max_skew_us").record(report.max_skew as f64);
}

/// 记录录制结束时的缓冲区大小
pub fn record_buffer_depth(kind: SensorKind, depth: usize) {
    gauge!("motion_recorder_buffer_depth", "sensor" => kind.as_str()).set(depth as f64);
}

/// 记录是否处于录制中
pub fn record_recording_state(recording: bool) {
    gauge!("motion_recorder_recording").set(if recording { 1.0 } else { 0.0 });
}

/// 记录一次会话结果
pub fn record_session_outcome(success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!("motion_recorder_sessions_total", "status" => status).increment(1);
}

/// 会话指标聚合器
///
/// 在内存中聚合多次录制的对齐结果，便于 CLI 输出摘要。
#[derive(Debug, Clone, Default)]
pub struct SessionMetricsAggregator {
    /// 完成的会话数
    pub sessions: u64,

    /// 导出失败的会话数
    pub failed_sessions: u64,

    /// 配对总数
    pub total_pairs: u64,

    /// 未配对样本总数
    pub total_unpaired: u64,

    /// 每次会话的配对率 (%)
    pub pair_rate_stats: RunningStats,

    /// 每次会话的最大时间差 (微秒)
    pub skew_stats: RunningStats,
}

impl SessionMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, report: &AlignmentReport) {
        self.sessions += 1;
        self.total_pairs += report.pairs as u64;
        self.total_unpaired += report.unpaired() as u64;

        // 配对率以较短一侧为分母；任一侧为空时没有意义
        let shorter = report.accel_len.min(report.gyro_len);
        if shorter > 0 {
            self.pair_rate_stats
                .push(report.pairs as f64 / shorter as f64 * 100.0);
        }
        if report.pairs > 0 {
            self.skew_stats.push(report.max_skew as f64);
        }
    }

    /// 记录一次导出失败
    pub fn record_failure(&mut self) {
        self.failed_sessions += 1;
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            sessions: self.sessions,
            failed_sessions: self.failed_sessions,
            total_pairs: self.total_pairs,
            total_unpaired: self.total_unpaired,
            pair_rate: StatsSummary::from(&self.pair_rate_stats),
            max_skew_us: StatsSummary::from(&self.skew_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSummary {
    pub sessions: u64,
    pub failed_sessions: u64,
    pub total_pairs: u64,
    pub total_unpaired: u64,
    pub pair_rate: StatsSummary,
    pub max_skew_us: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Recording Summary ===")?;
        writeln!(
            f,
            "Sessions: {} ({} failed)",
            self.sessions, self.failed_sessions
        )?;
        writeln!(f, "Paired records: {}", self.total_pairs)?;
        writeln!(f, "Unpaired samples: {}", self.total_unpaired)?;
        writeln!(f, "Pair rate (%): {}", self.pair_rate)?;
        writeln!(f, "Max skew (us): {}", self.max_skew_us)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.2}, max={:.2}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
