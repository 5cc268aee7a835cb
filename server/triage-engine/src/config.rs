//! Engine configuration with sane defaults.

use chrono::NaiveDateTime;

use crate::error::EngineError;
use crate::types::Mode;

/// Tunables for one triage run.
#[derive(Debug, Clone)]
pub struct Config {
  /// Which levels may open a record.
  pub mode: Mode,
  /// Max records kept by the single-shot diagnose variant.
  pub top_n: usize,
  /// Drop records stamped before this instant (unparseable stamps are kept).
  pub since: Option<NaiveDateTime>,
  /// Lines of code on each side of the referenced line scanned for context.
  pub context_radius: usize,
  /// Message width in the diagnose summary table.
  pub summary_width: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      mode: Mode::Critical,
      top_n: 5,
      since: None,
      context_radius: 5,
      summary_width: 60,
    }
  }
}

impl Config {
  /// Reject settings that would silently hide records.
  pub fn validate(&self) -> Result<(), EngineError> {
    if self.top_n == 0 {
      return Err(EngineError::validation("top", "must be at least 1"));
    }
    if self.summary_width == 0 {
      return Err(EngineError::validation("summary_width", "must be at least 1"));
    }
    Ok(())
  }
}
