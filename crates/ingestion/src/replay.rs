//! Replay Sensor - 回放预先采集的传感器读数
//!
//! 数据来源可以是内存中的样本列表，或 JSONL 文件 (每行一个 `TaggedSample`)。
//! 回放速度为 0 时在 `listen` 中同步投递全部样本。

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use contracts::{ContractError, Sample, SampleCallback, SensorKind, SensorSource, TaggedSample};
use tracing::{debug, info, warn};

use crate::error::{IngestionError, Result};

/// Replay 配置
#[derive(Debug, Clone, Default)]
pub struct ReplayConfig {
    /// 回放速度倍率 (1.0 = 原速, 0 = 立即投递)
    pub speed_multiplier: f64,
}

/// Replay Sensor
pub struct ReplaySensor {
    kind: SensorKind,
    samples: Arc<Vec<Sample>>,
    config: ReplayConfig,
    listening: Arc<AtomicBool>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ReplaySensor {
    /// 从内存样本创建 (立即投递)
    pub fn new(kind: SensorKind, samples: Vec<Sample>) -> Self {
        Self::with_config(kind, samples, ReplayConfig::default())
    }

    pub fn with_config(kind: SensorKind, samples: Vec<Sample>, config: ReplayConfig) -> Self {
        Self {
            kind,
            samples: Arc::new(samples),
            config,
            listening: Arc::new(AtomicBool::new(false)),
            thread_handle: Mutex::new(None),
        }
    }

    /// 从 JSONL 文件加载指定类型的样本 (保持文件顺序)
    pub fn load_jsonl(path: &Path, kind: SensorKind, config: ReplayConfig) -> Result<Self> {
        let replay_error = |message: String| IngestionError::Replay {
            path: path.to_path_buf(),
            message,
        };

        let file = File::open(path).map_err(|e| replay_error(e.to_string()))?;
        let reader = BufReader::new(file);

        let mut samples = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| replay_error(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }

            let tagged: TaggedSample = serde_json::from_str(&line)
                .map_err(|e| replay_error(format!("line {}: {e}", line_no + 1)))?;

            if tagged.kind == kind {
                samples.push(tagged.sample);
            }
        }

        info!(
            kind = %kind,
            path = %path.display(),
            samples = samples.len(),
            "Loaded replay sensor"
        );

        Ok(Self::with_config(kind, samples, config))
    }

    /// 样本数量
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn paced_delay(&self, from: u64, to: u64) -> Duration {
        let gap_us = to.saturating_sub(from) as f64 / self.config.speed_multiplier;
        Duration::from_micros(gap_us as u64)
    }
}

impl SensorSource for ReplaySensor {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn listen(&self, callback: SampleCallback) -> std::result::Result<(), ContractError> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if self.config.speed_multiplier <= 0.0 {
            for sample in self.samples.iter() {
                callback(*sample);
            }
            debug!(kind = %self.kind, samples = self.samples.len(), "replay delivered");
            return Ok(());
        }

        let samples = self.samples.clone();
        let listening = self.listening.clone();
        let delays: Vec<Duration> = samples
            .windows(2)
            .map(|w| self.paced_delay(w[0].timestamp, w[1].timestamp))
            .collect();
        let kind = self.kind;

        let handle = thread::spawn(move || {
            for (idx, sample) in samples.iter().enumerate() {
                if !listening.load(Ordering::Relaxed) {
                    break;
                }
                callback(*sample);
                if let Some(delay) = delays.get(idx) {
                    thread::sleep(*delay);
                }
            }
            debug!(kind = %kind, "replay finished");
        });

        *self
            .thread_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
        let handle = self
            .thread_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!(kind = %self.kind, "replay thread panicked");
            }
        }
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_immediate_replay_delivers_in_order() {
        let sensor = ReplaySensor::new(
            SensorKind::Accelerometer,
            vec![
                Sample::new(100, [1.0, 0.0, 0.0]),
                Sample::new(300, [1.0, 1.0, 0.0]),
            ],
        );

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        sensor
            .listen(Arc::new(move |s| seen_clone.lock().unwrap().push(s.timestamp)))
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![100, 300]);
    }

    #[test]
    fn test_paced_replay_stops_early() {
        let samples = (0..100).map(|i| Sample::new(i * 10_000, [0.0; 3])).collect();
        let sensor = ReplaySensor::with_config(
            SensorKind::Gyroscope,
            samples,
            ReplayConfig {
                speed_multiplier: 1.0,
            },
        );

        let seen = Arc::new(Mutex::new(0usize));
        let seen_clone = seen.clone();
        sensor
            .listen(Arc::new(move |_| *seen_clone.lock().unwrap() += 1))
            .unwrap();

        thread::sleep(Duration::from_millis(35));
        sensor.stop();

        let delivered = *seen.lock().unwrap();
        assert!(delivered > 0);
        assert!(delivered < 100);
    }

    #[test]
    fn test_stop_survives_panicking_callback() {
        let samples = (0..10).map(|i| Sample::new(i * 1_000, [0.0; 3])).collect();
        let sensor = ReplaySensor::with_config(
            SensorKind::Accelerometer,
            samples,
            ReplayConfig {
                speed_multiplier: 1.0,
            },
        );

        sensor
            .listen(Arc::new(|_| panic!("callback failed")))
            .unwrap();
        thread::sleep(Duration::from_millis(10));

        sensor.stop();
        assert!(!sensor.is_listening());
        assert!(sensor.thread_handle.lock().unwrap().is_none());
    }

    #[test]
    fn test_load_jsonl_filters_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.jsonl");
        let mut file = File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"kind":"accelerometer","sample":{{"timestamp":100,"values":[1.0,0.0,0.0]}}}}"#
        )
        .unwrap();
        writeln!(
            file,
            r#"{{"kind":"gyroscope","sample":{{"timestamp":105,"values":[0.0,0.0,1.0]}}}}"#
        )
        .unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            r#"{{"kind":"accelerometer","sample":{{"timestamp":300,"accuracy":"good","values":[1.0,1.0,0.0]}}}}"#
        )
        .unwrap();

        let accel =
            ReplaySensor::load_jsonl(&path, SensorKind::Accelerometer, ReplayConfig::default())
                .unwrap();
        let gyro =
            ReplaySensor::load_jsonl(&path, SensorKind::Gyroscope, ReplayConfig::default())
                .unwrap();

        assert_eq!(accel.len(), 2);
        assert_eq!(gyro.len(), 1);
    }

    #[test]
    fn test_load_jsonl_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jsonl");
        std::fs::write(&path, "{not json}\n").unwrap();

        let err = ReplaySensor::load_jsonl(&path, SensorKind::Gyroscope, ReplayConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("line 1"));
    }
}
