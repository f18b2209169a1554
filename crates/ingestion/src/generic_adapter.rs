//! 通用传感器适配器
//!
//! 基于 `SensorSource` trait 的统一适配器实现。
//! 发送端存放在互斥槽中：回调持锁发送，`stop` 取走发送端，
//! 取锁这一步即等待正在执行的回调结束（停止屏障）。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_channel::{Sender, TrySendError};
use contracts::{ContractError, SampleCallback, SensorKind, SensorSource, TaggedSample};
use tracing::{debug, trace, warn};

use crate::adapter::SensorAdapter;
use crate::config::IngestionMetrics;
use crate::error::{IngestionError, Result};

type SenderSlot = Arc<Mutex<Option<Sender<TaggedSample>>>>;

fn lock_slot(
    slot: &Mutex<Option<Sender<TaggedSample>>>,
) -> MutexGuard<'_, Option<Sender<TaggedSample>>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Send sample, handling backpressure (a full bounded channel drops the newest)
#[inline]
pub(crate) fn send_sample(
    tx: &Sender<TaggedSample>,
    sample: TaggedSample,
    metrics: &IngestionMetrics,
) {
    match tx.try_send(sample) {
        Ok(()) => {
            trace!(kind = %sample.kind, timestamp = sample.sample.timestamp, "sample sent");
        }
        Err(TrySendError::Full(_)) => {
            metrics.record_dropped(sample.kind);
            trace!(kind = %sample.kind, "sample dropped (channel full)");
        }
        Err(TrySendError::Closed(_)) => {
            warn!(kind = %sample.kind, "channel closed");
        }
    }
}

/// 通用传感器适配器
///
/// 将 `SensorSource` trait 适配为 `SensorAdapter`。
pub struct GenericSensorAdapter {
    source: Box<dyn SensorSource>,
    slot: SenderSlot,
    listening: Arc<AtomicBool>,
}

impl GenericSensorAdapter {
    /// 创建新的通用适配器
    pub fn new(source: Box<dyn SensorSource>) -> Self {
        Self {
            source,
            slot: Arc::new(Mutex::new(None)),
            listening: Arc::new(AtomicBool::new(false)),
        }
    }

    fn fail_start(&self, error: ContractError) -> IngestionError {
        lock_slot(&self.slot).take();
        self.listening.store(false, Ordering::SeqCst);
        IngestionError::sensor_unavailable(self.kind(), error)
    }
}

impl SensorAdapter for GenericSensorAdapter {
    fn kind(&self) -> SensorKind {
        self.source.kind()
    }

    fn start(&self, tx: Sender<TaggedSample>, metrics: Arc<IngestionMetrics>) -> Result<()> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let kind = self.kind();
        if !self.source.is_supported() {
            return Err(self.fail_start(ContractError::SensorNotSupported { kind }));
        }

        *lock_slot(&self.slot) = Some(tx);

        let slot = self.slot.clone();
        let callback: SampleCallback = Arc::new(move |sample| {
            let guard = lock_slot(&slot);
            match guard.as_ref() {
                Some(tx) => {
                    metrics.record_received(kind);
                    send_sample(tx, TaggedSample::new(kind, sample), &metrics);
                }
                None => trace!(kind = %kind, "sample after stop discarded"),
            }
        });

        if let Err(e) = self.source.listen(callback) {
            return Err(self.fail_start(e));
        }

        debug!(kind = %kind, "generic adapter started");
        Ok(())
    }

    fn stop(&self) {
        if self.listening.swap(false, Ordering::SeqCst) {
            debug!(kind = %self.kind(), "stopping generic adapter");
            self.source.stop();
        }
        // Waits for an in-flight callback, then releases the sender.
        lock_slot(&self.slot).take();
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_channel::{bounded, unbounded};
    use contracts::Sample;
    use std::sync::Mutex as StdMutex;

    /// Source that only delivers when the test pushes through the stored callback
    struct ManualSource {
        kind: SensorKind,
        supported: bool,
        callback: StdMutex<Option<SampleCallback>>,
        listening: AtomicBool,
    }

    impl ManualSource {
        fn new(kind: SensorKind, supported: bool) -> Arc<Self> {
            Arc::new(Self {
                kind,
                supported,
                callback: StdMutex::new(None),
                listening: AtomicBool::new(false),
            })
        }

        fn emit(&self, timestamp: u64) {
            let callback = self.callback.lock().unwrap().clone();
            if let Some(cb) = callback {
                cb(Sample::new(timestamp, [0.0, 0.0, 1.0]));
            }
        }
    }

    struct Shared(Arc<ManualSource>);

    impl SensorSource for Shared {
        fn kind(&self) -> SensorKind {
            self.0.kind
        }

        fn is_supported(&self) -> bool {
            self.0.supported
        }

        fn listen(&self, callback: SampleCallback) -> std::result::Result<(), ContractError> {
            *self.0.callback.lock().unwrap() = Some(callback);
            self.0.listening.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn stop(&self) {
            self.0.listening.store(false, Ordering::SeqCst);
        }

        fn is_listening(&self) -> bool {
            self.0.listening.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_generic_adapter_forwards_tagged_samples() {
        let source = ManualSource::new(SensorKind::Gyroscope, true);
        let adapter = GenericSensorAdapter::new(Box::new(Shared(source.clone())));
        let (tx, rx) = unbounded();
        let metrics = Arc::new(IngestionMetrics::new());

        adapter.start(tx, metrics.clone()).unwrap();
        assert!(adapter.is_listening());

        source.emit(10);
        source.emit(20);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.kind, SensorKind::Gyroscope);
        assert_eq!(first.sample.timestamp, 10);
        assert_eq!(rx.try_recv().unwrap().sample.timestamp, 20);
        assert_eq!(metrics.snapshot().gyro_received, 2);
    }

    #[test]
    fn test_stop_releases_sender_and_discards_late_samples() {
        let source = ManualSource::new(SensorKind::Accelerometer, true);
        let adapter = GenericSensorAdapter::new(Box::new(Shared(source.clone())));
        let (tx, rx) = unbounded();
        let metrics = Arc::new(IngestionMetrics::new());

        adapter.start(tx, metrics.clone()).unwrap();
        source.emit(1);
        adapter.stop();
        assert!(!adapter.is_listening());

        // Late delivery from a source that kept its callback
        source.emit(2);

        assert_eq!(rx.try_recv().unwrap().sample.timestamp, 1);
        assert!(rx.try_recv().is_err());
        assert!(rx.is_closed());
        assert_eq!(metrics.snapshot().accel_received, 1);
    }

    #[test]
    fn test_unsupported_source_fails_start() {
        let source = ManualSource::new(SensorKind::Gyroscope, false);
        let adapter = GenericSensorAdapter::new(Box::new(Shared(source)));
        let (tx, rx) = unbounded();

        let err = adapter
            .start(tx, Arc::new(IngestionMetrics::new()))
            .unwrap_err();
        assert!(matches!(
            err,
            IngestionError::SensorUnavailable {
                kind: SensorKind::Gyroscope,
                ..
            }
        ));
        assert!(!adapter.is_listening());
        assert!(rx.is_closed());
    }

    #[test]
    fn test_full_channel_drops_newest() {
        let source = ManualSource::new(SensorKind::Accelerometer, true);
        let adapter = GenericSensorAdapter::new(Box::new(Shared(source.clone())));
        let (tx, rx) = bounded(1);
        let metrics = Arc::new(IngestionMetrics::new());

        adapter.start(tx, metrics.clone()).unwrap();
        source.emit(1);
        source.emit(2);

        assert_eq!(rx.try_recv().unwrap().sample.timestamp, 1);
        assert!(rx.try_recv().is_err());
        assert_eq!(metrics.snapshot().samples_dropped, 1);
    }
}
