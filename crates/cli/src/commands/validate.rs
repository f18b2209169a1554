//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{CommandPolicy, RecorderBlueprint, SensorKind};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    source: String,
    accelerometer_interval_ms: u64,
    gyroscope_interval_ms: u64,
    bucket_width_us: u64,
    command_policy: String,
    output: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    source: format!("{:?}", blueprint.sensors.source),
                    accelerometer_interval_ms: blueprint.sensors.accelerometer.interval_ms,
                    gyroscope_interval_ms: blueprint.sensors.gyroscope.interval_ms,
                    bucket_width_us: blueprint.aligner.bucket_width,
                    command_policy: format!("{:?}", blueprint.session.command_policy),
                    output: blueprint.output.directory.display().to_string(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &RecorderBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();
    let width_ms = blueprint.aligner.bucket_width / 1000;

    // A sensor slower than one bucket leaves most buckets without a partner
    for kind in SensorKind::ALL {
        let interval = blueprint.sensors.get(kind).interval_ms;
        if width_ms > 0 && interval > width_ms {
            warnings.push(format!(
                "{kind} interval ({interval} ms) is longer than the bucket width ({width_ms} ms) - many samples will go unpaired"
            ));
        }
    }

    if blueprint.ingestion.channel_capacity > 0 {
        warnings.push(format!(
            "ingestion.channel_capacity = {} - samples are dropped when the channel is full",
            blueprint.ingestion.channel_capacity
        ));
    }

    if blueprint.session.command_policy == CommandPolicy::Reject {
        warnings.push(
            "session.command_policy = reject - a repeated start or stop is an error".to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Source: {}", summary.source);
            println!(
                "  Intervals: accelerometer {} ms, gyroscope {} ms",
                summary.accelerometer_interval_ms, summary.gyroscope_interval_ms
            );
            println!("  Bucket width: {} us", summary.bucket_width_us);
            println!("  Command policy: {}", summary.command_policy);
            println!("  Output: {}", summary.output);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
