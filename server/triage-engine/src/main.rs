//! Binary entrypoint: read a log tail, triage it, write the report to stdout.
//!
//! Subcommands:
//! - `diagnose` — single-shot: the most urgent records as a compact table.
//! - `monitor`  — full report with root causes and delegation suggestions.
//! - `scan`     — quick line-level scan with level/search filters.
//!
//! Diagnostics go to stderr through tracing (`RUST_LOG` overrides the filter).

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use triage_engine::report::{self, DiagnoseView};
use triage_engine::scan::{self, ScanFilter};
use triage_engine::types::{ErrorOutput, TriageOutput};
use triage_engine::{extract, tail, Config, Engine, EngineError, Mode};

/// Rule-based triage of application log tails
#[derive(Parser, Debug)]
#[command(name = "triage-engine", version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show the most urgent errors as a compact summary
  Diagnose {
    #[command(flatten)]
    window: Window,

    /// Which levels open a record: recent, critical, all
    #[arg(long, default_value = "critical")]
    mode: Mode,

    /// Max records to show
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Add a per-error breakdown
    #[arg(long)]
    detailed: bool,

    /// List the first suggested fix per error (nothing is changed)
    #[arg(long)]
    fix: bool,

    #[arg(long, value_enum, default_value_t = Format::Markdown)]
    format: Format,
  },

  /// Full triage report with root causes and delegation suggestions
  Monitor {
    #[command(flatten)]
    window: Window,

    /// Which levels open a record: recent, critical, all
    #[arg(long, default_value = "recent")]
    mode: Mode,

    /// Note that errors are prepared for correction
    #[arg(long)]
    auto_fix: bool,

    #[arg(long, value_enum, default_value_t = Format::Markdown)]
    format: Format,
  },

  /// Line-level scan: inline error locations, warning count, recent lines
  Scan {
    /// Log file to read
    #[arg(long, default_value = "storage/logs/laravel.log")]
    log: PathBuf,

    /// Lines to read from the end of the file
    #[arg(long, default_value_t = 100)]
    lines: usize,

    /// Keep only lines of this level (error, warning, info, debug)
    #[arg(long)]
    level: Option<String>,

    /// Keep only lines containing this text
    #[arg(long)]
    search: Option<String>,
  },
}

#[derive(Args, Debug)]
struct Window {
  /// Log file to read
  #[arg(long, default_value = "storage/logs/laravel.log")]
  log: PathBuf,

  /// Lines to read from the end of the file
  #[arg(long, default_value_t = 500)]
  lines: usize,

  /// Ignore records stamped before this time (e.g. "2024-01-01 00:00:00")
  #[arg(long, value_parser = parse_since)]
  since: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
  Markdown,
  Json,
}

fn parse_since(s: &str) -> Result<NaiveDateTime, EngineError> {
  extract::parse_timestamp(s)
    .ok_or_else(|| EngineError::validation("since", "expected YYYY-MM-DD HH:MM:SS"))
}

fn init_logging() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "triage_engine=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .init();
}

fn main() -> ExitCode {
  init_logging();
  let cli = Cli::parse();

  let json = matches!(
    cli.command,
    Command::Diagnose { format: Format::Json, .. } | Command::Monitor { format: Format::Json, .. }
  );

  match run(cli.command) {
    Ok(text) => {
      let mut out = io::stdout().lock();
      let _ = writeln!(out, "{}", text);
      let _ = out.flush();
      ExitCode::SUCCESS
    }
    Err(e) => {
      error!(error = %e, "triage failed");
      if json {
        let err = match &e {
          EngineError::Validation { field, reason } => {
            ErrorOutput::new(reason.clone()).with_field(field.clone())
          }
          _ => ErrorOutput::new(e.to_string()),
        };
        if let Ok(line) = serde_json::to_string(&err) {
          println!("{}", line);
        }
      }
      ExitCode::FAILURE
    }
  }
}

fn run(command: Command) -> Result<String, EngineError> {
  match command {
    Command::Diagnose {
      window,
      mode,
      top,
      detailed,
      fix,
      format,
    } => {
      let config = Config {
        mode,
        top_n: top,
        since: window.since,
        ..Config::default()
      };
      config.validate()?;
      let Some(raw) = tail::read_tail(&window.log, window.lines)? else {
        return Ok(missing_log(format));
      };
      let engine = Engine::new(config);
      let records = engine.diagnose(&raw);
      match format {
        Format::Json => Ok(serde_json::to_string_pretty(&TriageOutput::new(records))?),
        Format::Markdown => {
          let view = DiagnoseView {
            detailed,
            fix,
            message_width: engine.config().summary_width,
          };
          Ok(report::render_diagnosis(&records, view))
        }
      }
    }

    Command::Monitor {
      window,
      mode,
      auto_fix,
      format,
    } => {
      let config = Config {
        mode,
        since: window.since,
        ..Config::default()
      };
      let Some(raw) = tail::read_tail(&window.log, window.lines)? else {
        return Ok(missing_log(format));
      };
      let records = Engine::new(config).triage(&raw);
      match format {
        Format::Json => Ok(serde_json::to_string_pretty(&TriageOutput::new(records))?),
        Format::Markdown => {
          let mut text = report::build_report(&records);
          if auto_fix && !records.is_empty() {
            text.push_str("\n\n");
            text.push_str(report::AUTO_FIX_NOTE);
          }
          Ok(text)
        }
      }
    }

    Command::Scan {
      log,
      lines,
      level,
      search,
    } => {
      let Some(raw) = tail::read_tail(&log, lines)? else {
        return Ok(format!("Log file '{}' does not exist.", log.display()));
      };
      let filter = ScanFilter { level, search };
      let name = log
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| log.display().to_string());
      Ok(scan::render_scan(&scan::scan(&raw, &filter), &name))
    }
  }
}

fn missing_log(format: Format) -> String {
  match format {
    Format::Json => {
      serde_json::to_string_pretty(&TriageOutput::new(Vec::new())).unwrap_or_default()
    }
    Format::Markdown => report::NO_LOGS_MESSAGE.to_string(),
  }
}
