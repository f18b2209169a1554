//! Coarse time buckets
//!
//! 时间戳按固定宽度整数分桶；两个样本同桶即视为同一时刻。

use contracts::{ContractError, DEFAULT_BUCKET_WIDTH};

/// Fixed-width bucketing of device timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBuckets {
    width: u64,
}

impl TimeBuckets {
    /// 宽度必须大于 0
    pub fn new(width: u64) -> Result<Self, ContractError> {
        if width == 0 {
            return Err(ContractError::config_validation(
                "aligner.bucket_width",
                "must be > 0",
            ));
        }
        Ok(Self { width })
    }

    #[inline]
    pub fn width(&self) -> u64 {
        self.width
    }

    /// `floor(timestamp / width)`
    #[inline]
    pub fn bucket(&self, timestamp: u64) -> u64 {
        timestamp / self.width
    }

    #[inline]
    pub fn same_bucket(&self, a: u64, b: u64) -> bool {
        self.bucket(a) == self.bucket(b)
    }
}

impl Default for TimeBuckets {
    fn default() -> Self {
        Self {
            width: DEFAULT_BUCKET_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_width_rejected() {
        let err = TimeBuckets::new(0).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    #[test]
    fn test_bucket_boundaries() {
        let buckets = TimeBuckets::new(100).unwrap();

        assert_eq!(buckets.bucket(0), 0);
        assert_eq!(buckets.bucket(99), 0);
        assert_eq!(buckets.bucket(100), 1);
        assert_eq!(buckets.bucket(u64::MAX), u64::MAX / 100);

        // Close in time but across a boundary
        assert!(!buckets.same_bucket(199, 200));
        assert!(buckets.same_bucket(100, 199));
    }

    #[test]
    fn test_default_width() {
        assert_eq!(TimeBuckets::default().width(), DEFAULT_BUCKET_WIDTH);
    }
}
