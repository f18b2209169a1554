//! Recording statistics.

use std::time::Duration;

use exporter::ExportSummary;
use ingestion::MetricsSnapshot;
use observability::SessionMetricsAggregator;

/// Statistics from one CLI run (one or more recordings)
#[derive(Debug, Clone, Default)]
pub struct RecordStats {
    /// Successful exports, in order
    pub exports: Vec<ExportSummary>,

    /// Ingestion counters at the end of the run
    pub ingestion: MetricsSnapshot,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Per-session alignment aggregates
    pub sessions: SessionMetricsAggregator,
}

impl RecordStats {
    pub fn lines_written(&self) -> usize {
        self.exports.iter().map(|e| e.lines).sum()
    }

    /// Samples received per second across both sensors
    pub fn sample_rate(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.ingestion.total_received() as f64 / secs
        } else {
            0.0
        }
    }

    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Recording Statistics                      ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Accelerometer samples: {}", self.ingestion.accel_received);
        println!("   ├─ Gyroscope samples: {}", self.ingestion.gyro_received);
        println!("   ├─ Samples dropped (backpressure): {}", self.ingestion.samples_dropped);
        println!("   ├─ Sample rate: {:.1}/s", self.sample_rate());
        println!("   └─ Lines written: {}", self.lines_written());

        if !self.exports.is_empty() {
            println!("\n📤 Records ({})", self.exports.len());
            for (i, export) in self.exports.iter().enumerate() {
                let prefix = if i + 1 == self.exports.len() { "└─" } else { "├─" };
                let destination = export
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| export.sink.clone());
                println!(
                    "   {} #{} {} lines -> {}",
                    prefix, export.record_id, export.lines, destination
                );
            }
        }

        println!("\n📈 Alignment");
        for line in self.sessions.summary().to_string().lines().skip(1) {
            println!("   {line}");
        }
        println!();
    }
}
