//! Record line codec
//!
//! One line per paired record:
//!
//! ```text
//! {'Gyroscope':[gx,gy,gz], 'Accelerometer':[ax,ay,az],'Time': T}
//! ```
//!
//! Axis values use the shortest representation that parses back to the same
//! `f32`, so a line decodes to exactly the record it was written from.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use contracts::{PairedRecord, AXES};
use serde::Serialize;

use crate::error::ExportError;

const GYRO_PREFIX: &str = "{'Gyroscope':[";
const ACCEL_SEPARATOR: &str = "], 'Accelerometer':[";
const TIME_SEPARATOR: &str = "],'Time': ";
const SUFFIX: &str = "}";

/// The numeric content of one exported line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParsedLine {
    pub gyro: [f32; AXES],
    pub accel: [f32; AXES],
    pub time: u64,
}

impl ParsedLine {
    /// Whether this line carries exactly the values of `record`
    pub fn matches(&self, record: &PairedRecord) -> bool {
        self.time == record.fused_timestamp
            && self.gyro == record.gyro.values
            && self.accel == record.accel.values
    }
}

impl From<&PairedRecord> for ParsedLine {
    fn from(record: &PairedRecord) -> Self {
        Self {
            gyro: record.gyro.values,
            accel: record.accel.values,
            time: record.fused_timestamp,
        }
    }
}

fn push_axes(out: &mut String, values: &[f32; AXES]) {
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        // Writing into a String cannot fail
        let _ = write!(out, "{value}");
    }
}

/// Encode a record as one line, trailing newline included
pub fn encode_line(record: &PairedRecord) -> String {
    let mut line = String::with_capacity(96);
    line.push_str(GYRO_PREFIX);
    push_axes(&mut line, &record.gyro.values);
    line.push_str(ACCEL_SEPARATOR);
    push_axes(&mut line, &record.accel.values);
    line.push_str(TIME_SEPARATOR);
    let _ = write!(line, "{}", record.fused_timestamp);
    line.push_str(SUFFIX);
    line.push('\n');
    line
}

/// Write one encoded record
pub fn write_line<W: Write>(writer: &mut W, record: &PairedRecord) -> io::Result<()> {
    writer.write_all(encode_line(record).as_bytes())
}

fn parse_axes(field: &str, name: &str) -> Result<[f32; AXES], ExportError> {
    let mut values = [0.0f32; AXES];
    let mut parts = field.split(',');

    for (idx, slot) in values.iter_mut().enumerate() {
        let part = parts
            .next()
            .ok_or_else(|| {
                ExportError::malformed(format!("{name}: expected {AXES} values, got {idx}"))
            })?;
        *slot = part
            .trim()
            .parse()
            .map_err(|e| ExportError::malformed(format!("{name}[{idx}] '{part}': {e}")))?;
    }

    if parts.next().is_some() {
        return Err(ExportError::malformed(format!(
            "{name}: more than {AXES} values"
        )));
    }
    Ok(values)
}

/// Parse one line back into its numeric fields
///
/// A trailing newline (`\n` or `\r\n`) is accepted.
pub fn parse_line(line: &str) -> Result<ParsedLine, ExportError> {
    let line = line.trim_end_matches(['\n', '\r']);

    let rest = line
        .strip_prefix(GYRO_PREFIX)
        .ok_or_else(|| ExportError::malformed("missing gyroscope prefix"))?;
    let (gyro, rest) = rest
        .split_once(ACCEL_SEPARATOR)
        .ok_or_else(|| ExportError::malformed("missing accelerometer field"))?;
    let (accel, rest) = rest
        .split_once(TIME_SEPARATOR)
        .ok_or_else(|| ExportError::malformed("missing time field"))?;
    let time = rest
        .strip_suffix(SUFFIX)
        .ok_or_else(|| ExportError::malformed("missing closing brace"))?;

    Ok(ParsedLine {
        gyro: parse_axes(gyro, "Gyroscope")?,
        accel: parse_axes(accel, "Accelerometer")?,
        time: time
            .trim()
            .parse()
            .map_err(|e| ExportError::malformed(format!("Time '{time}': {e}")))?,
    })
}

/// Parse every line of an exported file
pub fn read_file(path: &Path) -> Result<Vec<ParsedLine>, ExportError> {
    let reader = BufReader::new(File::open(path)?);

    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let parsed = parse_line(&line).map_err(|e| ExportError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            message: match e {
                ExportError::Malformed { message } => message,
                other => other.to_string(),
            },
        })?;
        lines.push(parsed);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Sample;

    fn record(accel: [f32; 3], gyro: [f32; 3], a_ts: u64, g_ts: u64) -> PairedRecord {
        PairedRecord::new(Sample::new(a_ts, accel), Sample::new(g_ts, gyro))
    }

    #[test]
    fn test_encode_exact_format() {
        let line = encode_line(&record([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], 100, 105));
        assert_eq!(
            line,
            "{'Gyroscope':[0,0,1], 'Accelerometer':[1,0,0],'Time': 102}\n"
        );
    }

    #[test]
    fn test_parse_recovers_exact_floats() {
        let original = record(
            [0.1 + 0.2, -9.81, f32::MIN_POSITIVE],
            [1.0e-7, 123_456.79, -0.0],
            1_700_000_000_000_001,
            1_700_000_000_000_004,
        );

        let parsed = parse_line(&encode_line(&original)).unwrap();

        assert!(parsed.matches(&original));
        assert_eq!(parsed, ParsedLine::from(&original));
    }

    #[test]
    fn test_parse_accepts_crlf() {
        let parsed =
            parse_line("{'Gyroscope':[0,0,1], 'Accelerometer':[1,0,0],'Time': 102}\r\n").unwrap();
        assert_eq!(parsed.time, 102);
        assert_eq!(parsed.gyro, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let cases = [
            "",
            "{'Accelerometer':[1,0,0], 'Gyroscope':[0,0,1],'Time': 1}",
            "{'Gyroscope':[0,0], 'Accelerometer':[1,0,0],'Time': 1}",
            "{'Gyroscope':[0,0,1,2], 'Accelerometer':[1,0,0],'Time': 1}",
            "{'Gyroscope':[0,x,1], 'Accelerometer':[1,0,0],'Time': 1}",
            "{'Gyroscope':[0,0,1], 'Accelerometer':[1,0,0],'Time': -1}",
            "{'Gyroscope':[0,0,1], 'Accelerometer':[1,0,0],'Time': 1",
        ];
        for case in cases {
            assert!(
                matches!(parse_line(case), Err(ExportError::Malformed { .. })),
                "accepted: {case:?}"
            );
        }
    }

    #[test]
    fn test_read_file_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record_0.txt");
        let mut contents = encode_line(&record([1.0; 3], [2.0; 3], 10, 20));
        contents.push_str("garbage\n");
        std::fs::write(&path, contents).unwrap();

        let err = read_file(&path).unwrap_err();
        match err {
            ExportError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parsed_line_serializes() {
        let parsed = ParsedLine::from(&record([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], 100, 105));
        let json = serde_json::to_value(parsed).unwrap();
        assert_eq!(json["time"], 102);
    }
}
