//! Core types for the triage engine (extracted records + enriched output).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Scan mode
// ---------------------------------------------------------------------------

/// Controls which levels are allowed to open a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  Recent,
  Critical,
  All,
}

impl Mode {
  /// Levels retained under `Mode::Critical` (lower-cased).
  pub const CRITICAL_LEVELS: [&'static str; 4] = ["emergency", "alert", "critical", "error"];

  /// Whether a header with `level` opens a record in this mode.
  pub fn retains(self, level: &str) -> bool {
    match self {
      Self::Recent | Self::All => true,
      Self::Critical => {
        let level = level.to_ascii_lowercase();
        Self::CRITICAL_LEVELS.contains(&level.as_str())
      }
    }
  }
}

impl FromStr for Mode {
  type Err = EngineError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "recent" => Ok(Self::Recent),
      "critical" => Ok(Self::Critical),
      "all" => Ok(Self::All),
      _ => Err(EngineError::validation("mode", "expected recent|critical|all")),
    }
  }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  Critical,
  High,
  Medium,
  Low,
}

impl Priority {
  /// Priority implied by the log level alone.
  pub fn from_level(level: &str) -> Self {
    match level.to_ascii_lowercase().as_str() {
      "emergency" | "alert" | "critical" => Self::Critical,
      "error" => Self::High,
      "warning" => Self::Medium,
      _ => Self::Low,
    }
  }

  /// Sort weight; lower is more urgent.
  pub fn weight(self) -> u8 {
    match self {
      Self::Critical => 0,
      Self::High => 1,
      Self::Medium => 2,
      Self::Low => 3,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Critical => "critical",
      Self::High => "high",
      Self::Medium => "medium",
      Self::Low => "low",
    }
  }

  pub fn icon(self) -> &'static str {
    match self {
      Self::Critical => "🔴",
      Self::High => "🟠",
      Self::Medium => "🟡",
      Self::Low => "⚪",
    }
  }
}

impl fmt::Display for Priority {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
  #[serde(rename = "Database Error")]
  Database,
  #[serde(rename = "Class Not Found")]
  ClassNotFound,
  #[serde(rename = "Undefined Variable/Property")]
  UndefinedVariable,
  #[serde(rename = "Undefined Method")]
  UndefinedMethod,
  #[serde(rename = "Syntax Error")]
  Syntax,
  #[serde(rename = "Permission Error")]
  Permission,
  #[serde(rename = "Connection Error")]
  Connection,
  #[serde(rename = "Unknown Error")]
  Unknown,
}

impl Category {
  pub fn label(self) -> &'static str {
    match self {
      Self::Database => "Database Error",
      Self::ClassNotFound => "Class Not Found",
      Self::UndefinedVariable => "Undefined Variable/Property",
      Self::UndefinedMethod => "Undefined Method",
      Self::Syntax => "Syntax Error",
      Self::Permission => "Permission Error",
      Self::Connection => "Connection Error",
      Self::Unknown => "Unknown Error",
    }
  }

  /// Missing-symbol categories share the same delegation path.
  pub fn is_missing_symbol(self) -> bool {
    matches!(
      self,
      Self::ClassNotFound | Self::UndefinedVariable | Self::UndefinedMethod
    )
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

// ---------------------------------------------------------------------------
// Extracted records
// ---------------------------------------------------------------------------

/// A `#<n> path:line` location found in a continuation line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrame {
  pub file: String,
  pub line: u32,
  /// The continuation line as it appeared in the log.
  pub raw: String,
}

/// One logical log entry, possibly spanning several physical lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
  pub timestamp: String,
  pub environment: String,
  pub level: String,
  /// Header text only; classification input.
  pub headline: String,
  /// Headline plus non-frame continuation lines, for display.
  pub message: String,
  pub stack_frames: Vec<StackFrame>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub source_file: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub source_line: Option<u32>,
}

impl LogRecord {
  pub fn new(timestamp: &str, environment: &str, level: &str, message: &str) -> Self {
    let headline = message.trim().to_string();
    Self {
      timestamp: timestamp.to_string(),
      environment: environment.to_string(),
      level: level.to_string(),
      message: headline.clone(),
      headline,
      stack_frames: Vec::new(),
      source_file: None,
      source_line: None,
    }
  }

  /// Stack frame lines joined with newlines (empty when there are none).
  pub fn stack_trace(&self) -> String {
    self
      .stack_frames
      .iter()
      .map(|f| f.raw.as_str())
      .collect::<Vec<_>>()
      .join("\n")
  }
}

// ---------------------------------------------------------------------------
// Delegation
// ---------------------------------------------------------------------------

/// Downstream review/analysis tools a suggestion may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegateTool {
  ReviewCode,
  AnalyzeCode,
  DocumentCode,
  OptimizationSuggestions,
  Expert,
}

impl DelegateTool {
  pub fn command_name(self) -> &'static str {
    match self {
      Self::ReviewCode => "ReviewCodeSenior",
      Self::AnalyzeCode => "AnalyzeCode",
      Self::DocumentCode => "DocumentCode",
      Self::OptimizationSuggestions => "OptimizationSuggestions",
      Self::Expert => "LaravelExpert",
    }
  }
}

/// Advisory next step; the engine never executes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
  pub tool: DelegateTool,
  pub title: String,
  pub command: String,
}

impl fmt::Display for Suggestion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "# {}\n{}", self.title, self.command)
  }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A record after classification and enrichment.
#[derive(Debug, Clone, Serialize)]
pub struct TriagedRecord {
  pub incident_id: String,
  #[serde(flatten)]
  pub record: LogRecord,
  pub priority: Priority,
  pub category: Category,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub code_analysis: Vec<String>,
  pub root_cause: String,
  pub suggested_actions: Vec<Suggestion>,
}

/// Count-by-priority header of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrioritySummary {
  pub total: usize,
  pub critical: usize,
  pub high: usize,
  pub medium: usize,
  pub low: usize,
}

impl PrioritySummary {
  pub fn from_records(records: &[TriagedRecord]) -> Self {
    let mut summary = Self {
      total: records.len(),
      ..Self::default()
    };
    for r in records {
      match r.priority {
        Priority::Critical => summary.critical += 1,
        Priority::High => summary.high += 1,
        Priority::Medium => summary.medium += 1,
        Priority::Low => summary.low += 1,
      }
    }
    summary
  }
}

/// JSON envelope for `--format json`.
#[derive(Debug, Clone, Serialize)]
pub struct TriageOutput {
  pub summary: PrioritySummary,
  pub records: Vec<TriagedRecord>,
}

impl TriageOutput {
  pub fn new(records: Vec<TriagedRecord>) -> Self {
    Self {
      summary: PrioritySummary::from_records(&records),
      records,
    }
  }
}

/// Structured error output for `--format json`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mode_parses_case_insensitively() {
    assert_eq!("CRITICAL".parse::<Mode>().unwrap(), Mode::Critical);
    assert_eq!("recent".parse::<Mode>().unwrap(), Mode::Recent);
    let err = "everything".parse::<Mode>().unwrap_err();
    assert!(err.to_string().contains("mode"));
  }

  #[test]
  fn critical_mode_retains_only_severe_levels() {
    assert!(Mode::Critical.retains("ERROR"));
    assert!(Mode::Critical.retains("Emergency"));
    assert!(!Mode::Critical.retains("WARNING"));
    assert!(!Mode::Critical.retains("info"));
    assert!(Mode::All.retains("debug"));
    assert!(Mode::Recent.retains("notice"));
  }

  #[test]
  fn level_priority_mapping() {
    assert_eq!(Priority::from_level("ALERT"), Priority::Critical);
    assert_eq!(Priority::from_level("error"), Priority::High);
    assert_eq!(Priority::from_level("Warning"), Priority::Medium);
    assert_eq!(Priority::from_level("notice"), Priority::Low);
  }

  #[test]
  fn category_serializes_as_label() {
    let json = serde_json::to_string(&Category::UndefinedVariable).unwrap();
    assert_eq!(json, "\"Undefined Variable/Property\"");
  }

  #[test]
  fn validation_error_output_names_field() {
    let err = EngineError::validation("top", "must be at least 1");
    let out = match &err {
      EngineError::Validation { field, reason } => {
        ErrorOutput::new(reason.clone()).with_field(field.clone())
      }
      _ => ErrorOutput::new(err.to_string()),
    };
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["error"], true);
    assert_eq!(json["field"], "top");
    assert_eq!(json["message"], "must be at least 1");
  }

  #[test]
  fn suggestion_display_has_title_then_command() {
    let s = Suggestion {
      tool: DelegateTool::Expert,
      title: "Escalate".into(),
      command: "LaravelExpert context='bugfix'".into(),
    };
    assert_eq!(s.to_string(), "# Escalate\nLaravelExpert context='bugfix'");
  }
}
