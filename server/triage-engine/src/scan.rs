//! Quick line-level scan of a log window: level/search filtering, inline
//! `.ERROR: <msg> in <file>:<line>` extraction and warning counts.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static INLINE_ERROR_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\.ERROR: (.+?) in (.+?):(\d+)").expect("inline error pattern compiles")
});

/// Lines kept in `ScanReport::recent`.
pub const RECENT_LINES: usize = 20;

/// Errors shown by `render_scan`.
pub const SHOWN_ERRORS: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
  /// Keep lines containing `.<level>:` (case-insensitive).
  pub level: Option<String>,
  /// Keep lines containing this text (case-insensitive).
  pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineError {
  pub message: String,
  pub file: String,
  pub line: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
  pub lines_analyzed: usize,
  pub errors: Vec<InlineError>,
  pub warning_count: usize,
  pub recent: Vec<String>,
}

pub fn scan(raw: &str, filter: &ScanFilter) -> ScanReport {
  let level_needle = filter
    .level
    .as_ref()
    .map(|l| format!(".{}:", l.to_lowercase()));
  let search_needle = filter.search.as_ref().map(|s| s.to_lowercase());

  let kept: Vec<&str> = raw
    .lines()
    .filter(|line| {
      let lower = line.to_lowercase();
      level_needle.as_ref().is_none_or(|n| lower.contains(n.as_str()))
        && search_needle.as_ref().is_none_or(|n| lower.contains(n.as_str()))
    })
    .collect();

  let errors = kept
    .iter()
    .filter_map(|line| {
      let caps = INLINE_ERROR_RE.captures(line)?;
      Some(InlineError {
        message: caps[1].to_string(),
        file: caps[2].to_string(),
        line: caps[3].parse().ok()?,
      })
    })
    .collect();

  let warning_count = kept
    .iter()
    .filter(|line| line.to_lowercase().contains(".warning:"))
    .count();

  let recent = kept[kept.len().saturating_sub(RECENT_LINES)..]
    .iter()
    .map(|l| l.to_string())
    .collect();

  ScanReport {
    lines_analyzed: kept.len(),
    errors,
    warning_count,
    recent,
  }
}

pub fn render_scan(report: &ScanReport, source_name: &str) -> String {
  let mut out = String::from("# Log Analysis\n\n");
  let _ = writeln!(out, "**File:** {}", source_name);
  let _ = writeln!(out, "**Lines analyzed:** {}\n", report.lines_analyzed);

  if !report.errors.is_empty() {
    let _ = writeln!(out, "## Errors found ({})\n", report.errors.len());
    for e in report.errors.iter().take(SHOWN_ERRORS) {
      let _ = writeln!(out, "- **ERROR**: {}", e.message);
      let _ = writeln!(out, "  *File:* {}:{}\n", e.file, e.line);
    }
  }

  if report.warning_count > 0 {
    let _ = writeln!(out, "\n## Warnings ({})\n", report.warning_count);
  }

  out.push_str("\n## Recent logs\n\n```\n");
  out.push_str(&report.recent.join("\n"));
  out.push_str("\n```\n");
  out
}
