//! Session value: state, record id and the per-session sample buffers

use std::fmt;

use contracts::{SensorKind, TaggedSample};
use sync_engine::SampleBuffer;

/// Recording lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    /// Transient: buffers are read-only while the aligner and exporter run
    Exporting,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::Exporting => "exporting",
        })
    }
}

/// Accelerometer and gyroscope buffers of one recording
#[derive(Debug, Default)]
pub struct SessionBuffers {
    accel: SampleBuffer,
    gyro: SampleBuffer,
}

impl SessionBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a tagged sample into its buffer
    pub fn push(&mut self, tagged: TaggedSample) {
        match tagged.kind {
            SensorKind::Accelerometer => self.accel.push(tagged.sample),
            SensorKind::Gyroscope => self.gyro.push(tagged.sample),
        }
    }

    pub fn get(&self, kind: SensorKind) -> &SampleBuffer {
        match kind {
            SensorKind::Accelerometer => &self.accel,
            SensorKind::Gyroscope => &self.gyro,
        }
    }

    pub fn accel(&self) -> &SampleBuffer {
        &self.accel
    }

    pub fn gyro(&self) -> &SampleBuffer {
        &self.gyro
    }

    pub fn total_len(&self) -> usize {
        self.accel.len() + self.gyro.len()
    }
}

/// One start-to-stop recording cycle
///
/// Buffers exist only while recording or exporting. `record_id` names the
/// next file to be written and only moves forward after a successful export.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    record_id: u64,
    buffers: Option<SessionBuffers>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start numbering records at `record_id`
    pub fn with_record_id(record_id: u64) -> Self {
        Self {
            record_id,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn record_id(&self) -> u64 {
        self.record_id
    }

    pub fn buffers(&self) -> Option<&SessionBuffers> {
        self.buffers.as_ref()
    }

    /// Idle -> Recording with fresh buffers
    ///
    /// Returns false (and touches nothing) when not idle.
    pub fn begin_recording(&mut self) -> bool {
        if self.state != SessionState::Idle {
            return false;
        }
        self.buffers = Some(SessionBuffers::new());
        self.state = SessionState::Recording;
        true
    }

    /// Append a sample; refused unless recording
    pub fn append(&mut self, tagged: TaggedSample) -> bool {
        match (self.state, self.buffers.as_mut()) {
            (SessionState::Recording, Some(buffers)) => {
                buffers.push(tagged);
                true
            }
            _ => false,
        }
    }

    /// Recording -> Exporting, handing out the frozen buffers
    pub fn begin_export(&mut self) -> Option<&SessionBuffers> {
        if self.state != SessionState::Recording {
            return None;
        }
        self.state = SessionState::Exporting;
        self.buffers.as_ref()
    }

    /// Exporting -> Idle, releasing the buffers
    ///
    /// Returns the record id the export was attempted under.
    pub fn finish(&mut self, exported: bool) -> u64 {
        let record_id = self.record_id;
        self.buffers = None;
        self.state = SessionState::Idle;
        if exported {
            self.record_id += 1;
        }
        record_id
    }
}
