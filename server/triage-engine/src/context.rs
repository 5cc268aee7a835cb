//! Source-context enrichment: optional notes from the referenced code and the
//! root-cause explanation built on top of them.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::Category;

static NULL_ASSIGN_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\$\w+\s*=\s*null").expect("null-assign pattern compiles"));

/// Read access to the source files referenced by stack frames.
///
/// Returning `None` means "not reachable"; enrichment is then skipped.
pub trait SourceReader: Send + Sync {
  fn read_source(&self, path: &str) -> Option<String>;
}

/// Reads sources from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
  fn read_source(&self, path: &str) -> Option<String> {
    match std::fs::read(path) {
      Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
      Err(e) => {
        debug!(path, error = %e, "source not readable, skipping context");
        None
      }
    }
  }
}

impl<F> SourceReader for F
where
  F: Fn(&str) -> Option<String> + Send + Sync,
{
  fn read_source(&self, path: &str) -> Option<String> {
    self(path)
  }
}

/// Notes about the code around `file:line`. Empty when the file can't be read.
pub fn analyze_context(
  reader: &dyn SourceReader,
  file: &str,
  line: u32,
  message: &str,
  radius: usize,
) -> Vec<String> {
  let Some(content) = reader.read_source(file) else {
    return Vec::new();
  };

  let mut notes = Vec::new();

  if message.contains("Undefined variable") {
    notes.push("Variable used before it was initialized".to_string());
    notes.push("Check the assignment logic and conditional branches".to_string());
  }
  if message.contains("Call to undefined method") {
    notes.push("Method does not exist on the class".to_string());
    notes.push("Check traits, inheritance, or a typo in the method name".to_string());
  }
  if message.contains("SQLSTATE") {
    notes.push("Database error".to_string());
    if message.contains("23000") {
      notes.push("Constraint violation (unique, foreign key, etc.)".to_string());
    }
  }

  let snippet = snippet_around(&content, line as usize, radius);
  if snippet.contains("DB::raw") || snippet.contains("whereRaw") {
    notes.push("Raw queries in use; verify the SQL syntax".to_string());
  }
  if NULL_ASSIGN_RE.is_match(&snippet) {
    notes.push("Variable initialized to null; verify the assignment logic".to_string());
  }

  notes
}

/// Zero-based line window `[line - radius, line + radius)` of `content`.
fn snippet_around(content: &str, line: usize, radius: usize) -> String {
  let lines: Vec<&str> = content.lines().collect();
  let start = line.saturating_sub(radius).min(lines.len());
  let end = (line + radius).min(lines.len());
  lines[start..end].join("\n")
}

/// Fixed explanation per category, with any code-analysis notes appended.
pub fn root_cause(category: Category, code_analysis: &[String]) -> String {
  let base = match category {
    Category::Database => {
      "Database operation failed. Likely a constraint violation, a lost connection, or a malformed query."
    }
    Category::ClassNotFound => {
      "Class does not exist or is not imported. Check the namespace, use statements, and the autoloader."
    }
    Category::UndefinedVariable => {
      "Variable or property used without being initialized. Check the assignment logic and execution flow."
    }
    Category::UndefinedMethod => {
      "Method does not exist on the class. Check for a typo, traits, inheritance, or a missing implementation."
    }
    Category::Syntax => {
      "Syntax error: the code cannot be parsed. Check parentheses, braces, and quotes."
    }
    Category::Permission => {
      "Insufficient permissions to access a file or directory. Check ownership and mode bits."
    }
    Category::Connection => {
      "Cannot reach an external service. Check the network, configuration, and service availability."
    }
    Category::Unknown => "General error. Review the message and stack trace for details.",
  };

  if code_analysis.is_empty() {
    base.to_string()
  } else {
    format!(
      "{}\n\n**Additional analysis:** {}.",
      base,
      code_analysis.join(". ")
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn stub(content: &'static str) -> impl Fn(&str) -> Option<String> + Send + Sync {
    move |_path: &str| Some(content.to_string())
  }

  fn unreachable_source(_path: &str) -> Option<String> {
    None
  }

  #[test]
  fn unreadable_source_yields_no_notes() {
    let notes = analyze_context(&unreachable_source, "/app/Foo.php", 10, "Undefined variable $x", 5);
    assert!(notes.is_empty());
  }

  #[test]
  fn message_based_notes_need_a_readable_source() {
    let reader = stub("<?php\necho 1;\n");
    let notes = analyze_context(&reader, "/app/Foo.php", 2, "Undefined variable $x", 5);
    assert_eq!(notes.len(), 2);
    assert!(notes[0].contains("initialized"));
  }

  #[test]
  fn constraint_violation_note() {
    let reader = stub("<?php\n");
    let notes = analyze_context(
      &reader,
      "/app/Repo.php",
      1,
      "SQLSTATE[23000]: Integrity constraint violation",
      5,
    );
    assert!(notes.iter().any(|n| n.contains("Constraint violation")));
  }

  #[test]
  fn snippet_patterns_are_detected_near_the_line() {
    let mut src = String::from("<?php\n");
    for _ in 0..20 {
      src.push_str("// filler\n");
    }
    src.push_str("$user = null;\n");
    src.push_str("$rows = DB::raw('select 1');\n");
    let reader = move |_: &str| Some(src.clone());

    let near = analyze_context(&reader, "/app/X.php", 22, "boom", 5);
    assert!(near.iter().any(|n| n.contains("Raw queries")));
    assert!(near.iter().any(|n| n.contains("initialized to null")));

    let far = analyze_context(&reader, "/app/X.php", 2, "boom", 5);
    assert!(far.is_empty());
  }

  #[test]
  fn root_cause_appends_analysis() {
    let plain = root_cause(Category::Permission, &[]);
    assert!(plain.starts_with("Insufficient permissions"));
    assert!(!plain.contains("Additional analysis"));

    let notes = vec!["Database error".to_string(), "Constraint violation".to_string()];
    let enriched = root_cause(Category::Database, &notes);
    assert!(enriched.ends_with("**Additional analysis:** Database error. Constraint violation."));
  }
}
