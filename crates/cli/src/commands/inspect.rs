//! `inspect` command implementation.

use anyhow::{Context, Result};
use exporter::ParsedLine;
use serde::Serialize;
use tracing::info;

use crate::cli::InspectArgs;

/// Summary of one exported record file
#[derive(Debug, Serialize)]
struct FileSummary {
    path: String,
    lines: usize,
    first_time: Option<u64>,
    last_time: Option<u64>,
    span_us: u64,
    /// Lines whose time is earlier than the line before
    out_of_order: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<Vec<ParsedLine>>,
}

/// Execute the `inspect` command
pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    info!(file = %args.file.display(), "Inspecting record file");

    let parsed = exporter::read_file(&args.file)
        .with_context(|| format!("Failed to read record file {}", args.file.display()))?;

    let mut summary = summarize(&args.file.display().to_string(), &parsed);
    if args.lines {
        summary.records = Some(parsed);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize file summary")?;
        println!("{}", json);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn summarize(path: &str, parsed: &[ParsedLine]) -> FileSummary {
    let first_time = parsed.first().map(|l| l.time);
    let last_time = parsed.last().map(|l| l.time);
    let span_us = match (first_time, last_time) {
        (Some(first), Some(last)) => last.saturating_sub(first),
        _ => 0,
    };

    FileSummary {
        path: path.to_string(),
        lines: parsed.len(),
        first_time,
        last_time,
        span_us,
        out_of_order: parsed.windows(2).filter(|w| w[1].time < w[0].time).count(),
        records: None,
    }
}

fn print_summary(summary: &FileSummary) {
    println!("📄 {}", summary.path);
    println!("   ├─ Lines: {}", summary.lines);
    match (summary.first_time, summary.last_time) {
        (Some(first), Some(last)) => {
            println!("   ├─ Time: {} .. {}", first, last);
            println!(
                "   ├─ Span: {} us ({:.3}s)",
                summary.span_us,
                summary.span_us as f64 / 1_000_000.0
            );
        }
        _ => println!("   ├─ Time: (empty)"),
    }
    println!("   └─ Out-of-order lines: {}", summary.out_of_order);

    if let Some(records) = &summary.records {
        println!();
        for record in records {
            println!(
                "{:>16}  gyro={:?}  accel={:?}",
                record.time, record.gyro, record.accel
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(time: u64) -> ParsedLine {
        ParsedLine {
            gyro: [0.0; 3],
            accel: [0.0; 3],
            time,
        }
    }

    #[test]
    fn test_summarize() {
        let summary = summarize("r.txt", &[line(100), line(300), line(250)]);
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.first_time, Some(100));
        assert_eq!(summary.span_us, 150);
        assert_eq!(summary.out_of_order, 1);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize("r.txt", &[]);
        assert_eq!(summary.lines, 0);
        assert_eq!(summary.first_time, None);
        assert_eq!(summary.span_us, 0);
    }

    #[test]
    fn test_inspect_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record_0.txt");
        std::fs::write(
            &path,
            "{'Gyroscope':[0,0,1], 'Accelerometer':[1,0,0],'Time': 102500}\n",
        )
        .unwrap();

        let args = InspectArgs {
            file: path,
            json: true,
            lines: true,
        };
        run_inspect(&args).unwrap();
    }
}
