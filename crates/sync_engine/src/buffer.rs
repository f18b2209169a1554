//! Per-sensor append-only sample buffer.
//!
//! Insertion order is arrival order. Nothing is evicted or reordered while a
//! session records; the aligner reads it after ingestion is fenced.

use std::fmt;
use std::ops::Index;

use contracts::Sample;

/// Append-only sample buffer for one sensor
#[derive(Clone, Default)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
    out_of_order_count: u64,
}

impl fmt::Debug for SampleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("len", &self.samples.len())
            .field("out_of_order", &self.out_of_order_count)
            .finish()
    }
}

impl SampleBuffer {
    /// Create an empty buffer
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` samples
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            out_of_order_count: 0,
        }
    }

    /// Append a sample, preserving arrival order
    #[inline]
    pub fn push(&mut self, sample: Sample) {
        if let Some(last) = self.samples.last() {
            if sample.timestamp < last.timestamp {
                self.out_of_order_count += 1;
            }
        }
        self.samples.push(sample);
    }

    /// Get the number of samples in the buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Indexed read
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Timestamp of the first arrival
    pub fn first_timestamp(&self) -> Option<u64> {
        self.samples.first().map(|s| s.timestamp)
    }

    /// Timestamp of the latest arrival
    pub fn last_timestamp(&self) -> Option<u64> {
        self.samples.last().map(|s| s.timestamp)
    }

    /// Arrivals whose timestamp went backwards
    #[inline]
    pub fn out_of_order_count(&self) -> u64 {
        self.out_of_order_count
    }
}

impl Index<usize> for SampleBuffer {
    type Output = Sample;

    fn index(&self, index: usize) -> &Sample {
        &self.samples[index]
    }
}

impl<'a> IntoIterator for &'a SampleBuffer {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl Extend<Sample> for SampleBuffer {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, iter: I) {
        for sample in iter {
            self.push(sample);
        }
    }
}

impl FromIterator<Sample> for SampleBuffer {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut buffer = Self::new();
        buffer.extend(iter);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sample(timestamp: u64) -> Sample {
        Sample::new(timestamp, [timestamp as f32, 0.0, 0.0])
    }

    #[test]
    fn test_buffer_push_order() {
        let mut buffer = SampleBuffer::new();

        buffer.push(make_sample(3));
        buffer.push(make_sample(1));
        buffer.push(make_sample(2));

        // Arrival order, not timestamp order
        assert_eq!(buffer[0].timestamp, 3);
        assert_eq!(buffer[1].timestamp, 1);
        assert_eq!(buffer.get(2).unwrap().timestamp, 2);
        assert!(buffer.get(3).is_none());
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_out_of_order_detection() {
        let mut buffer = SampleBuffer::new();

        buffer.push(make_sample(1));
        buffer.push(make_sample(3));
        buffer.push(make_sample(2)); // Out of order
        buffer.push(make_sample(2)); // Equal is fine

        assert_eq!(buffer.out_of_order_count(), 1);
    }

    #[test]
    fn test_first_last_timestamp() {
        let buffer: SampleBuffer = [5, 9, 12].into_iter().map(make_sample).collect();

        assert_eq!(buffer.first_timestamp(), Some(5));
        assert_eq!(buffer.last_timestamp(), Some(12));
        assert!(SampleBuffer::new().first_timestamp().is_none());
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = SampleBuffer::with_capacity(16);
        assert!(buffer.is_empty());
        assert_eq!(buffer.iter().count(), 0);
    }
}
