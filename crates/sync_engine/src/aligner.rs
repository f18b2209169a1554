//! Stream aligner
//!
//! Two-pointer merge of the accelerometer and gyroscope streams on coarse time
//! buckets. Runs once, after ingestion has been fenced, over snapshots of the
//! two buffers.

use contracts::{AlignerConfig, AlignmentReport, ContractError, PairedRecord, Sample};
use tracing::{debug, instrument};

use crate::bucket::TimeBuckets;

/// Aligner output: records in emission order plus run metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    pub records: Vec<PairedRecord>,
    pub report: AlignmentReport,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Bucket-equality stream aligner
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamAligner {
    buckets: TimeBuckets,
}

impl StreamAligner {
    /// Create an aligner with the given bucket width (device units)
    pub fn new(bucket_width: u64) -> Result<Self, ContractError> {
        Ok(Self {
            buckets: TimeBuckets::new(bucket_width)?,
        })
    }

    pub fn from_config(config: &AlignerConfig) -> Result<Self, ContractError> {
        Self::new(config.bucket_width)
    }

    pub fn bucket_width(&self) -> u64 {
        self.buckets.width()
    }

    /// Merge two streams into paired records
    ///
    /// Each sample is used at most once. Equal buckets pair and advance both
    /// cursors; otherwise the side with the smaller bucket is dropped. Whatever
    /// remains once either stream is exhausted is left unpaired. Input order is
    /// taken as given.
    #[instrument(
        name = "aligner_align",
        skip(self, accel, gyro),
        fields(accel_len = accel.len(), gyro_len = gyro.len())
    )]
    pub fn align(&self, accel: &[Sample], gyro: &[Sample]) -> Alignment {
        let mut records = Vec::with_capacity(accel.len().min(gyro.len()));
        let mut report = AlignmentReport {
            accel_len: accel.len(),
            gyro_len: gyro.len(),
            ..Default::default()
        };

        let (mut i, mut j) = (0, 0);
        while i < accel.len() && j < gyro.len() {
            let a = self.buckets.bucket(accel[i].timestamp);
            let g = self.buckets.bucket(gyro[j].timestamp);

            if a == g {
                let record = PairedRecord::new(accel[i], gyro[j]);
                report.max_skew = report.max_skew.max(record.skew());
                records.push(record);
                i += 1;
                j += 1;
            } else if a > g {
                report.dropped_gyro += 1;
                j += 1;
            } else {
                report.dropped_accel += 1;
                i += 1;
            }
        }

        report.pairs = records.len();
        report.trailing_accel = accel.len() - i;
        report.trailing_gyro = gyro.len() - j;

        debug!(
            pairs = report.pairs,
            dropped_accel = report.dropped_accel,
            dropped_gyro = report.dropped_gyro,
            trailing_accel = report.trailing_accel,
            trailing_gyro = report.trailing_gyro,
            max_skew = report.max_skew,
            "alignment finished"
        );

        Alignment { records, report }
    }
}
