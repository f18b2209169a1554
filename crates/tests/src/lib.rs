//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 回放 / 模拟传感器 -> 控制器 -> 文件 的端到端测试
//! - 导出文件回读校验

#[cfg(test)]
mod contract_tests {
    use contracts::{RecorderBlueprint, DEFAULT_BUCKET_WIDTH};

    #[test]
    fn test_default_blueprint_snapshot() {
        let bp = RecorderBlueprint::default();
        assert_eq!(bp.version, contracts::ConfigVersion::V1);
        assert_eq!(bp.aligner.bucket_width, DEFAULT_BUCKET_WIDTH);
        assert_eq!(bp.sensors.accelerometer.interval_ms, 20);
        assert_eq!(bp.output.file_name(3), "record_3.txt");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::Path;
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        OutputConfig, PairedRecord, RecorderBlueprint, Sample, SensorKind, SinkProvider,
    };
    use exporter::{read_file, FileSinkProvider, MemorySinkProvider};
    use ingestion::{
        BackpressureConfig, DeviceClock, IngestionPipeline, MockMotionSensor, MockSensorConfig,
        ReplaySensor,
    };
    use recorder::{SessionController, SessionError, SessionState, Status};
    use sync_engine::StreamAligner;

    fn replay_pipeline(accel: Vec<Sample>, gyro: Vec<Sample>) -> IngestionPipeline {
        let mut pipeline = IngestionPipeline::new(BackpressureConfig::unbounded());
        pipeline.register_sensor_source(Box::new(ReplaySensor::new(
            SensorKind::Accelerometer,
            accel,
        )));
        pipeline.register_sensor_source(Box::new(ReplaySensor::new(
            SensorKind::Gyroscope,
            gyro,
        )));
        pipeline
    }

    fn file_controller(pipeline: IngestionPipeline, dir: &Path) -> SessionController {
        let blueprint = RecorderBlueprint {
            output: OutputConfig {
                directory: dir.to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        };
        let sinks: Box<dyn SinkProvider> =
            Box::new(FileSinkProvider::new(blueprint.output.clone()));
        SessionController::from_blueprint(&blueprint, pipeline, sinks).unwrap()
    }

    /// Two accelerometer and two gyroscope samples around the 100 ms boundary
    ///
    /// a(100000), a(250000) vs g(99000), g(105000): g(99000) sits one bucket
    /// behind and is dropped, a(100000)+g(105000) pair, a(250000) is left over.
    #[test]
    fn test_reference_scenario_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let accel = vec![
            Sample::new(100_000, [1.0, 0.0, 0.0]),
            Sample::new(250_000, [2.0, 0.0, 0.0]),
        ];
        let gyro = vec![
            Sample::new(99_000, [0.0, 0.0, 9.0]),
            Sample::new(105_000, [0.0, 0.0, 1.0]),
        ];

        let mut controller = file_controller(replay_pipeline(accel, gyro), dir.path());
        controller.start_recording().unwrap();
        let summary = controller.stop_recording().unwrap().applied().unwrap();

        assert_eq!(summary.lines, 1);
        assert_eq!(controller.status(), Status::Saved(0));
        assert_eq!(controller.status().to_string(), "Saved. ID:0");

        let report = controller.last_report().unwrap();
        assert_eq!(report.pairs, 1);
        assert_eq!(report.dropped_gyro, 1);
        assert_eq!(report.trailing_accel, 1);
        assert_eq!(report.max_skew, 5_000);

        let path = dir.path().join("record_0.txt");
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{'Gyroscope':[0,0,1], 'Accelerometer':[1,0,0],'Time': 102500}\n"
        );

        let parsed = read_file(&path).unwrap();
        let expected = PairedRecord::new(
            Sample::new(100_000, [1.0, 0.0, 0.0]),
            Sample::new(105_000, [0.0, 0.0, 1.0]),
        );
        assert!(parsed[0].matches(&expected));
    }

    #[test]
    fn test_consecutive_recordings_number_files() {
        let dir = tempfile::tempdir().unwrap();
        let accel: Vec<Sample> = (0..20)
            .map(|i| Sample::new(i * 20_000, [i as f32, 0.5, -0.5]))
            .collect();
        let gyro: Vec<Sample> = (0..20)
            .map(|i| Sample::new(i * 20_000 + 7_000, [0.25, i as f32, 1.5]))
            .collect();

        let mut controller = file_controller(replay_pipeline(accel, gyro), dir.path());
        for expected_id in 0..3u64 {
            controller.start_recording().unwrap();
            let summary = controller.stop_recording().unwrap().applied().unwrap();
            assert_eq!(summary.record_id, expected_id);
            assert_eq!(controller.state(), SessionState::Idle);
        }

        for id in 0..3 {
            let parsed = read_file(&dir.path().join(format!("record_{id}.txt"))).unwrap();
            assert!(!parsed.is_empty());
            assert!(parsed.windows(2).all(|w| w[0].time <= w[1].time));
        }

        // A fresh provider picks up after the highest existing id
        let provider = FileSinkProvider::new(OutputConfig {
            directory: dir.path().to_path_buf(),
            ..Default::default()
        });
        assert_eq!(provider.next_record_id().unwrap(), 3);
    }

    #[test]
    fn test_export_failure_keeps_id_for_next_recording() {
        let samples = vec![Sample::new(10, [0.0; 3])];
        let sinks = MemorySinkProvider::new();
        sinks.set_fail_open(true);

        let aligner = StreamAligner::new(100_000).unwrap();
        let mut controller = SessionController::new(
            replay_pipeline(samples.clone(), samples),
            aligner,
            Box::new(sinks.clone()),
            Default::default(),
        )
        .with_record_id(4);

        controller.start_recording().unwrap();
        let err = controller.stop_recording().unwrap_err();
        assert!(matches!(err, SessionError::Export { record_id: 4, .. }));
        assert_eq!(controller.status(), Status::SaveFailed);

        sinks.set_fail_open(false);
        controller.start_recording().unwrap();
        let summary = controller.stop_recording().unwrap().applied().unwrap();
        assert_eq!(summary.record_id, 4);
        assert_eq!(sinks.lines(4).unwrap().len(), 1);
    }

    #[test]
    fn test_config_drives_controller() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            r#"
[aligner]
bucket_width = 10

[session]
command_policy = "reject"

[output]
directory = "{}"
file_prefix = "walk_"
file_extension = "log"
"#,
            dir.path().display()
        );
        let blueprint = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();

        // 10 us buckets: 100 and 105 fall in the same bucket, 111 does not
        let accel = vec![Sample::new(100, [1.0; 3]), Sample::new(111, [2.0; 3])];
        let gyro = vec![Sample::new(105, [3.0; 3])];
        let sinks = Box::new(FileSinkProvider::new(blueprint.output.clone()));
        let mut controller =
            SessionController::from_blueprint(&blueprint, replay_pipeline(accel, gyro), sinks)
                .unwrap();

        assert!(matches!(
            controller.stop_recording(),
            Err(SessionError::InvalidCommand { .. })
        ));

        controller.start_recording().unwrap();
        assert!(controller.start_recording().is_err());
        controller.stop_recording().unwrap();

        let parsed = read_file(&dir.path().join("walk_0.log")).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].time, 102);
    }

    #[tokio::test]
    async fn test_mock_sensors_live_recording() {
        let dir = tempfile::tempdir().unwrap();
        let clock = DeviceClock::new();
        let config = MockSensorConfig {
            interval_ms: 5,
            ..Default::default()
        };

        let mut pipeline = IngestionPipeline::new(BackpressureConfig::unbounded());
        for kind in SensorKind::ALL {
            pipeline.register_sensor_source(Box::new(MockMotionSensor::new(
                kind,
                config.clone(),
                clock,
            )));
        }

        let mut controller = file_controller(pipeline, dir.path());
        controller.start_recording().unwrap();
        assert_eq!(controller.status().to_string(), "Recording...");

        for _ in 0..6 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            controller.pump();
        }
        let (accel, gyro) = controller.buffer_sizes().unwrap();
        assert!(accel > 0 && gyro > 0);

        let summary = controller.stop_recording().unwrap().applied().unwrap();
        let report = controller.last_report().unwrap();
        assert!(report.accel_len >= accel);
        assert_eq!(
            2 * report.pairs + report.unpaired(),
            report.accel_len + report.gyro_len
        );

        let parsed = read_file(summary.path.as_deref().unwrap()).unwrap();
        assert_eq!(parsed.len(), summary.lines);
        assert_eq!(parsed.len(), report.pairs);

        // Nothing arrives once stopped
        let metrics = controller.ingestion_metrics();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(controller.ingestion_metrics(), metrics);
        assert_eq!(controller.pump(), 0);
    }

    #[test]
    fn test_unsupported_sensor_leaves_session_idle() {
        let dir = tempfile::tempdir().unwrap();
        let clock = DeviceClock::new();

        let mut pipeline = IngestionPipeline::new(BackpressureConfig::unbounded());
        pipeline.register_sensor_source(Box::new(MockMotionSensor::with_defaults(
            SensorKind::Accelerometer,
            clock,
        )));
        pipeline.register_sensor_source(Box::new(MockMotionSensor::new(
            SensorKind::Gyroscope,
            MockSensorConfig {
                supported: false,
                ..Default::default()
            },
            clock,
        )));

        let mut controller = file_controller(pipeline, dir.path());
        let err = controller.start_recording().unwrap_err();
        assert!(matches!(err, SessionError::SensorUnavailable(_)));
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(controller.buffer_sizes().is_none());
        assert!(!dir.path().join("record_0.txt").exists());
    }
}
