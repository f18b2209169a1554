//! Session controller - start/stop state machine
//!
//! Owns the session, the ingestion pipeline, the aligner and the sink
//! provider. Stop runs the whole tail synchronously: fence and drain
//! ingestion, align the frozen buffers, export, release.

use contracts::{
    AlignmentReport, CommandPolicy, ContractError, RecorderBlueprint, SensorKind, SinkProvider,
};
use exporter::{ExportSummary, Exporter};
use ingestion::{IngestionPipeline, MetricsSnapshot};
use observability::{
    record_alignment, record_buffer_depth, record_recording_state, record_session_outcome,
};
use sync_engine::{Alignment, StreamAligner};
use tracing::{error, info, instrument, warn};

use crate::error::{Command, SessionError};
use crate::session::{Session, SessionState};
use crate::status::Status;

/// Result of a command that may be ignored by policy
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome<T> {
    Applied(T),
    /// Re-entrant command under the `ignore` policy; nothing changed
    Ignored,
}

impl<T> CommandOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied(_))
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, CommandOutcome::Ignored)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            CommandOutcome::Applied(value) => Some(value),
            CommandOutcome::Ignored => None,
        }
    }
}

/// Start/stop controller for one recorder
pub struct SessionController {
    session: Session,
    pipeline: IngestionPipeline,
    aligner: StreamAligner,
    exporter: Exporter,
    sinks: Box<dyn SinkProvider>,
    policy: CommandPolicy,
    status: Status,
    last_report: Option<AlignmentReport>,
}

impl SessionController {
    pub fn new(
        pipeline: IngestionPipeline,
        aligner: StreamAligner,
        sinks: Box<dyn SinkProvider>,
        policy: CommandPolicy,
    ) -> Self {
        Self {
            session: Session::new(),
            pipeline,
            aligner,
            exporter: Exporter::new(),
            sinks,
            policy,
            status: Status::PressStart,
            last_report: None,
        }
    }

    /// Build with the aligner and command policy taken from `blueprint`
    pub fn from_blueprint(
        blueprint: &RecorderBlueprint,
        pipeline: IngestionPipeline,
        sinks: Box<dyn SinkProvider>,
    ) -> Result<Self, ContractError> {
        let aligner = StreamAligner::from_config(&blueprint.aligner)?;
        Ok(Self::new(
            pipeline,
            aligner,
            sinks,
            blueprint.session.command_policy,
        ))
    }

    /// Number the first recording `record_id` instead of 0
    pub fn with_record_id(mut self, record_id: u64) -> Self {
        if self.session.state() == SessionState::Idle {
            self.session = Session::with_record_id(record_id);
        }
        self
    }

    /// Subscribe both sensors and begin buffering
    ///
    /// If either sensor is unavailable the session stays idle without buffers.
    #[instrument(
        name = "session_start_recording",
        skip(self),
        fields(record_id = self.session.record_id())
    )]
    pub fn start_recording(&mut self) -> Result<CommandOutcome<()>, SessionError> {
        if self.session.state() != SessionState::Idle {
            return self.reentrant(Command::Start);
        }

        if let Err(e) = self.pipeline.start_all() {
            warn!(error = %e, "Cannot start recording");
            return Err(SessionError::from(e));
        }

        self.session.begin_recording();
        self.status = Status::Recording;
        record_recording_state(true);
        info!("Recording started");
        Ok(CommandOutcome::Applied(()))
    }

    /// Move samples that already arrived into the session buffers
    ///
    /// Returns how many were moved; zero unless recording.
    pub fn pump(&mut self) -> usize {
        if self.session.state() != SessionState::Recording {
            return 0;
        }
        let session = &mut self.session;
        self.pipeline.drain_pending(|tagged| {
            session.append(tagged);
        })
    }

    /// Fence ingestion, align, export and return to idle
    ///
    /// On export failure the session is still back to idle; the record id is
    /// not consumed and will be reused by the next recording.
    #[instrument(
        name = "session_stop_recording",
        skip(self),
        fields(record_id = self.session.record_id())
    )]
    pub fn stop_recording(&mut self) -> Result<CommandOutcome<ExportSummary>, SessionError> {
        if self.session.state() != SessionState::Recording {
            return self.reentrant(Command::Stop);
        }

        self.status = Status::Saving;

        // Nothing reaches the buffers after this returns
        let session = &mut self.session;
        let drained = self.pipeline.stop_and_drain(|tagged| {
            session.append(tagged);
        });
        record_recording_state(false);

        let record_id = self.session.record_id();
        let alignment = self.align_frozen(drained);
        record_alignment(&alignment.report);
        self.last_report = Some(alignment.report.clone());

        let result = self
            .exporter
            .export_to(self.sinks.as_mut(), record_id, &alignment.records);

        match result {
            Ok(summary) => {
                self.session.finish(true);
                self.status = Status::Saved(record_id);
                record_session_outcome(true);
                info!(
                    lines = summary.lines,
                    next_record_id = self.session.record_id(),
                    "Recording saved"
                );
                Ok(CommandOutcome::Applied(summary))
            }
            Err(source) => {
                self.session.finish(false);
                self.status = Status::SaveFailed;
                record_session_outcome(false);
                error!(error = %source, "Recording could not be saved");
                Err(SessionError::Export { record_id, source })
            }
        }
    }

    fn align_frozen(&mut self, drained: usize) -> Alignment {
        let Some(buffers) = self.session.begin_export() else {
            return Alignment::default();
        };

        for kind in SensorKind::ALL {
            let buffer = buffers.get(kind);
            record_buffer_depth(kind, buffer.len());
            if buffer.out_of_order_count() > 0 {
                warn!(
                    sensor = %kind,
                    out_of_order = buffer.out_of_order_count(),
                    "Timestamps went backwards during recording"
                );
            }
        }
        info!(
            accel = buffers.accel().len(),
            gyro = buffers.gyro().len(),
            drained_at_stop = drained,
            "Recording stopped"
        );

        self.aligner
            .align(buffers.accel().as_slice(), buffers.gyro().as_slice())
    }

    fn reentrant<T>(&self, command: Command) -> Result<CommandOutcome<T>, SessionError> {
        let state = self.session.state();
        match self.policy {
            CommandPolicy::Ignore => {
                warn!(%command, %state, "Command ignored");
                Ok(CommandOutcome::Ignored)
            }
            CommandPolicy::Reject => Err(SessionError::InvalidCommand { command, state }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Id the next successful recording will be saved under
    pub fn record_id(&self) -> u64 {
        self.session.record_id()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// (accelerometer, gyroscope) samples buffered so far
    pub fn buffer_sizes(&self) -> Option<(usize, usize)> {
        self.session
            .buffers()
            .map(|b| (b.accel().len(), b.gyro().len()))
    }

    /// Report of the most recent stop
    pub fn last_report(&self) -> Option<&AlignmentReport> {
        self.last_report.as_ref()
    }

    pub fn ingestion_metrics(&self) -> MetricsSnapshot {
        self.pipeline.metrics().snapshot()
    }
}
