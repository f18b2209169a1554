//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Motion Recorder - paired accelerometer/gyroscope recordings
#[derive(Parser, Debug)]
#[command(
    name = "motion-recorder",
    author,
    version,
    about = "Record, align and export accelerometer/gyroscope streams",
    long_about = "Records accelerometer and gyroscope samples between a start and a stop,\n\
                  pairs them on coarse time buckets, and writes one text file per\n\
                  recording, named by an incrementing record id."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        env = "MOTION_RECORDER_VERBOSE"
    )]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "MOTION_RECORDER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record one session, then align and export it
    Record(RecordArgs),

    /// Interactive start/stop console reading commands from stdin
    Console(ConsoleArgs),

    /// Validate configuration file without recording
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),

    /// Parse an exported record file and summarize it
    Inspect(InspectArgs),
}

/// Options shared by every command that records
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when absent
    #[arg(short, long, env = "MOTION_RECORDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the output directory from configuration
    #[arg(short, long, env = "MOTION_RECORDER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// First record id (default: one past the highest id in the output directory)
    #[arg(long)]
    pub start_id: Option<u64>,

    /// Replay samples from a JSONL capture instead of the mock sensors
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Replay speed multiplier (0 = deliver everything immediately)
    #[arg(long, default_value = "0")]
    pub replay_speed: f64,

    /// Log paired records instead of writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Interval between buffer pumps, in milliseconds
    #[arg(long, default_value = "50", env = "MOTION_RECORDER_PUMP_INTERVAL_MS")]
    pub pump_interval_ms: u64,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "MOTION_RECORDER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `record` command
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Recording duration in seconds (0 = until Ctrl+C)
    #[arg(short, long, default_value = "0", env = "MOTION_RECORDER_DURATION")]
    pub duration: u64,
}

/// Arguments for the `console` command
#[derive(Args, Debug, Clone)]
pub struct ConsoleArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "recorder.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; defaults are shown when absent
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `inspect` command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Exported record file
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also print every parsed line
    #[arg(long)]
    pub lines: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
