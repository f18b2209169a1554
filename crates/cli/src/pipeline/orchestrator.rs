//! Recorder wiring - builds a session controller from config and CLI options.
//!
//! Sensor sources are either the mock motion sensors (one shared device clock)
//! or a JSONL replay capture. Sinks are files, or the log when dry-running.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{RecorderBlueprint, SensorKind, SinkProvider, SourceKind};
use exporter::{FileSinkProvider, LogSinkProvider};
use ingestion::{
    BackpressureConfig, DeviceClock, IngestionPipeline, MockMotionSensor, MockSensorConfig,
    ReplayConfig, ReplaySensor,
};
use recorder::SessionController;
use tracing::info;

use crate::cli::SessionArgs;
use crate::error::CliError;

/// Everything a recording command needs
pub struct Recorder {
    pub controller: SessionController,
    pub blueprint: RecorderBlueprint,
    pub pump_interval: Duration,
    /// Replay delivered everything on start; nothing more will arrive
    pub replay_immediate: bool,
}

/// Load the blueprint (defaults when no path is given) and apply CLI overrides
pub fn load_blueprint(
    config: Option<&Path>,
    args: Option<&SessionArgs>,
) -> Result<RecorderBlueprint> {
    let mut blueprint = match config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path).into());
            }
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => {
            info!("No configuration file given, using defaults");
            RecorderBlueprint::default()
        }
    };

    if let Some(output) = args.and_then(|a| a.output.as_ref()) {
        info!(output = %output.display(), "Overriding output directory from CLI");
        blueprint.output.directory = output.clone();
    }

    ConfigLoader::validate(&blueprint).context("Configuration is invalid")?;
    Ok(blueprint)
}

/// Build the controller for a recording command
pub fn build_recorder(args: &SessionArgs) -> Result<Recorder> {
    if args.pump_interval_ms == 0 {
        return Err(CliError::invalid_argument("pump-interval-ms", "must be > 0").into());
    }
    if !args.replay_speed.is_finite() || args.replay_speed < 0.0 {
        return Err(
            CliError::invalid_argument("replay-speed", "must be a non-negative number").into(),
        );
    }

    let blueprint = load_blueprint(args.config.as_deref(), Some(args))?;
    let pipeline = build_pipeline(&blueprint, args)?;

    let file_sinks = FileSinkProvider::new(blueprint.output.clone());
    let start_id = match args.start_id {
        Some(id) => id,
        None if args.dry_run => 0,
        None => file_sinks.next_record_id().with_context(|| {
            format!(
                "Failed to scan output directory {}",
                blueprint.output.directory.display()
            )
        })?,
    };

    let sinks: Box<dyn SinkProvider> = if args.dry_run {
        info!("Dry run - paired records are logged, not written");
        Box::new(LogSinkProvider)
    } else {
        Box::new(file_sinks)
    };

    let controller = SessionController::from_blueprint(&blueprint, pipeline, sinks)
        .context("Failed to configure session controller")?
        .with_record_id(start_id);

    info!(
        source = ?blueprint.sensors.source,
        replay = ?args.replay,
        bucket_width = blueprint.aligner.bucket_width,
        policy = ?blueprint.session.command_policy,
        output = %blueprint.output.directory.display(),
        start_id,
        "Recorder configured"
    );

    Ok(Recorder {
        controller,
        pump_interval: Duration::from_millis(args.pump_interval_ms),
        replay_immediate: args.replay.is_some() && args.replay_speed == 0.0,
        blueprint,
    })
}

fn build_pipeline(blueprint: &RecorderBlueprint, args: &SessionArgs) -> Result<IngestionPipeline> {
    let mut pipeline = IngestionPipeline::new(BackpressureConfig::from(&blueprint.ingestion));

    if let Some(path) = &args.replay {
        info!(path = %path.display(), speed = args.replay_speed, "Running in REPLAY mode");
        let config = ReplayConfig {
            speed_multiplier: args.replay_speed,
        };
        for kind in SensorKind::ALL {
            let sensor =
                ReplaySensor::load_jsonl(path, kind, config.clone()).map_err(CliError::from)?;
            pipeline.register_sensor_source(Box::new(sensor));
        }
        return Ok(pipeline);
    }

    match blueprint.sensors.source {
        SourceKind::Mock => {
            info!("Running in MOCK mode (synthetic sensors)");
            let clock = DeviceClock::new();
            for kind in SensorKind::ALL {
                let config = MockSensorConfig::from_sensor_config(blueprint.sensors.get(kind));
                pipeline
                    .register_sensor_source(Box::new(MockMotionSensor::new(kind, config, clock)));
            }
        }
    }

    Ok(pipeline)
}
