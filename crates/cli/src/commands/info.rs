//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{RecorderBlueprint, SensorKind};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::pipeline::load_blueprint;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    source: String,
    sensors: Vec<SensorInfo>,
    aligner: AlignerInfo,
    command_policy: String,
    channel_capacity: Option<usize>,
    output: OutputInfo,
}

#[derive(Serialize)]
struct SensorInfo {
    kind: String,
    interval_ms: u64,
    rate_hz: f64,
}

#[derive(Serialize)]
struct AlignerInfo {
    bucket_width_us: u64,
    bucket_width_ms: f64,
}

#[derive(Serialize)]
struct OutputInfo {
    directory: String,
    first_file: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = ?args.config, "Loading configuration info");

    let blueprint = load_blueprint(args.config.as_deref(), None)?;
    let info = build_config_info(&blueprint);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(blueprint: &RecorderBlueprint) -> ConfigInfo {
    let sensors = SensorKind::ALL
        .into_iter()
        .map(|kind| {
            let interval_ms = blueprint.sensors.get(kind).interval_ms;
            SensorInfo {
                kind: kind.to_string(),
                interval_ms,
                rate_hz: if interval_ms > 0 {
                    1000.0 / interval_ms as f64
                } else {
                    0.0
                },
            }
        })
        .collect();

    let capacity = blueprint.ingestion.channel_capacity;

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        source: format!("{:?}", blueprint.sensors.source),
        sensors,
        aligner: AlignerInfo {
            bucket_width_us: blueprint.aligner.bucket_width,
            bucket_width_ms: blueprint.aligner.bucket_width as f64 / 1000.0,
        },
        command_policy: format!("{:?}", blueprint.session.command_policy),
        channel_capacity: (capacity > 0).then_some(capacity),
        output: OutputInfo {
            directory: blueprint.output.directory.display().to_string(),
            first_file: blueprint.output.file_name(0),
        },
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Motion Recorder Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📡 Sensors ({})", info.source);
    for (i, sensor) in info.sensors.iter().enumerate() {
        let prefix = if i + 1 == info.sensors.len() { "└─" } else { "├─" };
        println!(
            "   {} {}: every {} ms ({:.1} Hz)",
            prefix, sensor.kind, sensor.interval_ms, sensor.rate_hz
        );
    }

    println!("\n⚙️  Alignment");
    println!(
        "   ├─ Bucket width: {} us ({} ms)",
        info.aligner.bucket_width_us, info.aligner.bucket_width_ms
    );
    println!("   ├─ Command policy: {}", info.command_policy);
    match info.channel_capacity {
        Some(capacity) => println!("   └─ Channel capacity: {}", capacity),
        None => println!("   └─ Channel capacity: unbounded"),
    }

    println!("\n📤 Output");
    println!("   ├─ Version: {}", info.version);
    println!("   ├─ Directory: {}", info.output.directory);
    println!("   └─ File names: {} ...", info.output.first_file);

    println!();
}
