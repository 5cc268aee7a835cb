//! Split raw log text into LogRecords.
//!
//! A header line looks like `[<timestamp>] <env>.<LEVEL>: <message>`; every
//! other line continues the open record. Continuation lines of the form
//! `#<n> <path>:<line>` are stack frames.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::debug;

use crate::types::{LogRecord, Mode, StackFrame};

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\[(.*?)\]\s+([\w-]+)\.(\w+):\s+(.+)$").expect("header pattern compiles")
});

static FRAME_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*#\d+\s+(.*?):(\d+)").expect("frame pattern compiles"));

/// Timestamp layouts seen in Laravel-style logs.
const TIMESTAMP_FORMATS: [&str; 4] = [
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%dT%H:%M:%S%.f",
];

/// Extract records in encounter order. Never fails: lines that neither open
/// nor continue a record are dropped.
pub fn extract_records(raw: &str, mode: Mode) -> Vec<LogRecord> {
  let mut records = Vec::new();
  let mut current: Option<LogRecord> = None;
  let mut skipped_headers = 0usize;
  let mut dropped_lines = 0usize;

  for line in raw.lines() {
    if let Some(caps) = HEADER_RE.captures(line) {
      if let Some(done) = current.take() {
        records.push(done);
      }

      let level = &caps[3];
      if !mode.retains(level) {
        // Following continuation lines belong to the filtered record.
        skipped_headers += 1;
        continue;
      }

      current = Some(LogRecord::new(&caps[1], &caps[2], level, &caps[4]));
      continue;
    }

    match current.as_mut() {
      Some(record) => append_continuation(record, line),
      None => dropped_lines += 1,
    }
  }

  if let Some(done) = current.take() {
    records.push(done);
  }

  debug!(
    records = records.len(),
    skipped_headers, dropped_lines, "extracted log records"
  );
  records
}

fn append_continuation(record: &mut LogRecord, line: &str) {
  if let Some(frame) = parse_frame(line) {
    if record.source_file.is_none() {
      record.source_file = Some(frame.file.clone());
      record.source_line = Some(frame.line);
    }
    record.stack_frames.push(frame);
    return;
  }

  let trimmed = line.trim();
  if trimmed.is_empty() || trimmed == "[stacktrace]" {
    return;
  }
  if !record.message.is_empty() {
    record.message.push('\n');
  }
  record.message.push_str(trimmed);
}

/// Parse a `#<n> <path>:<line>` stack frame line.
pub fn parse_frame(line: &str) -> Option<StackFrame> {
  let caps = FRAME_RE.captures(line)?;
  let line_no = caps[2].parse::<u32>().ok()?;
  Some(StackFrame {
    file: caps[1].to_string(),
    line: line_no,
    raw: line.to_string(),
  })
}

/// Best-effort parse of a record timestamp; `None` for unrecognized layouts.
pub fn parse_timestamp(ts: &str) -> Option<NaiveDateTime> {
  let ts = ts.trim();
  TIMESTAMP_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
}
