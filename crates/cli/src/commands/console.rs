//! `console` command implementation.
//!
//! Reads `start` / `stop` / `status` / `quit` lines from stdin and drives a
//! single recorder, printing the status line after every command.

use std::time::Instant;

use anyhow::{Context, Result};
use recorder::{CommandOutcome, SessionController};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use super::record::{init_metrics, setup_shutdown_signal, stop_and_record};
use crate::cli::ConsoleArgs;
use crate::pipeline::{build_recorder, RecordStats};

/// A parsed console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleCommand {
    Start,
    Stop,
    Status,
    Help,
    Quit,
}

impl ConsoleCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => Some(Self::Start),
            "stop" | "x" => Some(Self::Stop),
            "status" | "" => Some(Self::Status),
            "help" | "?" => Some(Self::Help),
            "quit" | "exit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Execute the `console` command
pub async fn run_console(args: &ConsoleArgs) -> Result<()> {
    let mut recorder = build_recorder(&args.session)?;
    init_metrics(&args.session)?;

    let controller = &mut recorder.controller;
    let started = Instant::now();
    let mut stats = RecordStats::default();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(recorder.pump_interval);
    let shutdown = setup_shutdown_signal();
    tokio::pin!(shutdown);

    print_help();
    print_status(controller);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                controller.pump();
            }
            _ = &mut shutdown => {
                warn!("Received shutdown signal, leaving console...");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    info!("stdin closed");
                    break;
                };
                match ConsoleCommand::parse(&line) {
                    Some(ConsoleCommand::Quit) => break,
                    Some(command) => handle(controller, command, &mut stats),
                    None => println!("Unknown command: {} (try 'help')", line.trim()),
                }
            }
        }
    }

    // Leaving mid-recording still saves what was captured
    if controller.session().buffers().is_some() {
        if let Err(e) = stop_and_record(controller, &mut stats) {
            println!("Error: {e}");
        }
        print_status(controller);
    }

    stats.ingestion = controller.ingestion_metrics();
    stats.duration = started.elapsed();
    stats.print_summary();
    Ok(())
}

fn handle(controller: &mut SessionController, command: ConsoleCommand, stats: &mut RecordStats) {
    match command {
        ConsoleCommand::Start => match controller.start_recording() {
            Ok(CommandOutcome::Ignored) => println!("Already recording"),
            Ok(CommandOutcome::Applied(())) => {}
            Err(e) => println!("Error: {e}"),
        },
        ConsoleCommand::Stop => {
            if let Err(e) = stop_and_record(controller, stats) {
                println!("Error: {e}");
            }
        }
        ConsoleCommand::Help => print_help(),
        ConsoleCommand::Status | ConsoleCommand::Quit => {}
    }
    print_status(controller);
}

fn print_status(controller: &SessionController) {
    match controller.buffer_sizes() {
        Some((accel, gyro)) => println!(
            "{}  [accelerometer: {accel}, gyroscope: {gyro}]",
            controller.status()
        ),
        None => println!("{}  [next id: {}]", controller.status(), controller.record_id()),
    }
}

fn print_help() {
    println!("Commands: start | stop | status | help | quit");
}
