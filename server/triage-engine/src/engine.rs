//! Core engine: extract → classify → enrich → rank.

use tracing::info;

use crate::classify;
use crate::config::Config;
use crate::context::{self, FsReader, SourceReader};
use crate::delegate;
use crate::extract;
use crate::fingerprint;
use crate::rank;
use crate::types::*;

/// The log triage engine. Holds configuration and the source reader only;
/// every call is independent of the previous one.
pub struct Engine {
  config: Config,
  reader: Box<dyn SourceReader>,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self::with_reader(config, FsReader)
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  /// Build an engine whose source-context lookups go through `reader`.
  pub fn with_reader(config: Config, reader: impl SourceReader + 'static) -> Self {
    Self {
      config,
      reader: Box::new(reader),
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Extract records under the configured mode and time window.
  pub fn extract(&self, raw: &str) -> Vec<LogRecord> {
    let mut records = extract::extract_records(raw, self.config.mode);
    if let Some(since) = self.config.since {
      records.retain(|r| match extract::parse_timestamp(&r.timestamp) {
        Some(ts) => ts >= since,
        None => true,
      });
    }
    records
  }

  /// Classify and enrich one record.
  pub fn enrich(&self, record: LogRecord) -> TriagedRecord {
    let (priority, category) = classify::classify(&record.level, &record.headline);

    let code_analysis = match (record.source_file.as_deref(), record.source_line) {
      (Some(file), Some(line)) => context::analyze_context(
        self.reader.as_ref(),
        file,
        line,
        &record.headline,
        self.config.context_radius,
      ),
      _ => Vec::new(),
    };
    let root_cause = context::root_cause(category, &code_analysis);
    let suggested_actions =
      delegate::suggest_delegation(category, record.source_file.as_deref(), priority);
    let incident_id = fingerprint::incident_id(&record, category);

    TriagedRecord {
      incident_id,
      record,
      priority,
      category,
      code_analysis,
      root_cause,
      suggested_actions,
    }
  }

  /// Reporting variant: every retained record, ranked.
  pub fn triage(&self, raw: &str) -> Vec<TriagedRecord> {
    let enriched: Vec<_> = self
      .extract(raw)
      .into_iter()
      .map(|r| self.enrich(r))
      .collect();
    let ranked = rank::rank(enriched);
    info!(records = ranked.len(), mode = ?self.config.mode, "triage complete");
    ranked
  }

  /// Single-shot variant: the `top_n` most urgent records.
  pub fn diagnose(&self, raw: &str) -> Vec<TriagedRecord> {
    let enriched: Vec<_> = self
      .extract(raw)
      .into_iter()
      .map(|r| self.enrich(r))
      .collect();
    let found = enriched.len();
    let top = rank::rank_top(enriched, self.config.top_n);
    info!(found, kept = top.len(), mode = ?self.config.mode, "diagnosis complete");
    top
  }
}
