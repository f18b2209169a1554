//! `record` command implementation.

use std::time::{Duration, Instant};

use anyhow::Result;
use recorder::{CommandOutcome, SessionController, SessionError};
use tracing::{info, warn};

use crate::cli::{RecordArgs, SessionArgs};
use crate::error::CliError;
use crate::pipeline::{build_recorder, RecordStats};

/// Execute the `record` command: one recording from start to stop
pub async fn run_record(args: &RecordArgs) -> Result<()> {
    let mut recorder = build_recorder(&args.session)?;
    init_metrics(&args.session)?;

    let started = Instant::now();
    let mut stats = RecordStats::default();

    recorder.controller.start_recording().map_err(CliError::from)?;
    println!("{}", recorder.controller.status());

    if recorder.replay_immediate && args.duration == 0 {
        info!("Replay delivered all samples, stopping");
    } else {
        wait_for_stop(&mut recorder.controller, recorder.pump_interval, args.duration).await;
    }

    let result = stop_and_record(&mut recorder.controller, &mut stats);
    println!("{}", recorder.controller.status());

    stats.ingestion = recorder.controller.ingestion_metrics();
    stats.duration = started.elapsed();
    stats.print_summary();

    result.map_err(CliError::from)?;
    Ok(())
}

/// Pump buffers until the duration elapses or a shutdown signal arrives
async fn wait_for_stop(controller: &mut SessionController, pump_interval: Duration, duration: u64) {
    let mut ticker = tokio::time::interval(pump_interval);
    let deadline = async {
        if duration == 0 {
            std::future::pending::<()>().await;
        } else {
            tokio::time::sleep(Duration::from_secs(duration)).await;
        }
    };
    tokio::pin!(deadline);

    let shutdown = setup_shutdown_signal();
    tokio::pin!(shutdown);

    if duration == 0 {
        info!("Recording until Ctrl+C");
    } else {
        info!(seconds = duration, "Recording for a fixed duration");
    }

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                controller.pump();
            }
            _ = &mut deadline => {
                info!("Recording duration reached");
                break;
            }
            _ = &mut shutdown => {
                warn!("Received shutdown signal, stopping recording...");
                break;
            }
        }
    }
}

/// Stop the controller and fold the outcome into `stats`
pub(crate) fn stop_and_record(
    controller: &mut SessionController,
    stats: &mut RecordStats,
) -> Result<(), SessionError> {
    let result = controller.stop_recording();

    // Only a stop that reached the aligner produced a fresh report
    let aligned = matches!(
        result,
        Ok(CommandOutcome::Applied(_)) | Err(SessionError::Export { .. })
    );
    if let (true, Some(report)) = (aligned, controller.last_report()) {
        stats.sessions.update(report);
    }

    match result {
        Ok(CommandOutcome::Applied(summary)) => {
            stats.exports.push(summary);
            Ok(())
        }
        Ok(CommandOutcome::Ignored) => Ok(()),
        Err(e) => {
            if aligned {
                stats.sessions.record_failure();
            }
            Err(e)
        }
    }
}

pub(crate) fn init_metrics(args: &SessionArgs) -> Result<()> {
    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
pub(crate) async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
