//! Log Triage Engine — deterministic, rule-based.
//!
//! Extracts records from the tail of an application log, classifies them by
//! priority and category, enriches them with a root cause and delegation
//! suggestions, ranks them, and renders a markdown report.
//!
//! No AI, no DB, no network; the log is read-only input.

pub mod classify;
pub mod config;
pub mod context;
pub mod delegate;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fingerprint;
pub mod rank;
pub mod report;
pub mod scan;
pub mod tail;
pub mod types;

pub use config::Config;
pub use context::{FsReader, SourceReader};
pub use engine::Engine;
pub use error::EngineError;
pub use types::{LogRecord, Mode, Priority, TriagedRecord};
