//! # Motion Recorder CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 单次录制 (`record`) 与交互式控制台 (`console`)
//! - 配置验证与展示
//! - 导出文件检查

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_console, run_info, run_inspect, run_record, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Motion Recorder CLI starting"
    );

    let result = match &cli.command {
        Commands::Record(args) => run_record(args).await,
        Commands::Console(args) => run_console(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
        Commands::Inspect(args) => run_inspect(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
///
/// Metrics are installed per command, once the port is known.
fn init_logging(cli: &Cli) -> Result<()> {
    observability::init_with_config(ObservabilityConfig::for_verbosity(
        cli.log_format.into(),
        cli.verbose,
        cli.quiet,
    ))
}
