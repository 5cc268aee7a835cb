//! Stable incident ids for triaged records.

use crate::types::{Category, LogRecord};

/// Compute a stable incident id from a record.
///
/// Key components: category + source location + headline.
/// The timestamp is left out so repeats of the same failure share an id.
pub fn incident_id(record: &LogRecord, category: Category) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(category.label().as_bytes());
  hasher.update(b"|");
  hasher.update(record.source_file.as_deref().unwrap_or("").as_bytes());
  hasher.update(b":");
  hasher.update(record.source_line.unwrap_or(0).to_string().as_bytes());
  hasher.update(b"|");
  hasher.update(record.headline.as_bytes());

  let hex = hasher.finalize().to_hex();
  format!("inc-{}", &hex[..16])
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(ts: &str, msg: &str) -> LogRecord {
    LogRecord::new(ts, "local", "ERROR", msg)
  }

  #[test]
  fn same_failure_same_id() {
    let a = record("2024-01-01 10:00:00", "Undefined variable $foo");
    let b = record("2024-01-02 11:30:00", "Undefined variable $foo");
    assert_eq!(
      incident_id(&a, Category::UndefinedVariable),
      incident_id(&b, Category::UndefinedVariable)
    );
  }

  #[test]
  fn different_category_different_id() {
    let r = record("2024-01-01 10:00:00", "boom");
    assert_ne!(
      incident_id(&r, Category::Unknown),
      incident_id(&r, Category::Connection)
    );
  }

  #[test]
  fn id_shape() {
    let id = incident_id(&record("t", "boom"), Category::Unknown);
    assert!(id.starts_with("inc-"));
    assert_eq!(id.len(), 4 + 16);
  }
}
