//! Markdown rendering of triaged records.
//!
//! Pure formatting: the only decisions made here are which optional
//! sub-sections (location, trace, code analysis) to include.

use std::fmt::Write;

use crate::types::{Priority, PrioritySummary, TriagedRecord};

/// Rendered instead of a report when nothing was found.
pub const HEALTHY_MESSAGE: &str =
  "✅ **System healthy**\n\nNo errors were detected in the analyzed log window.";

/// Rendered when the log file does not exist at all.
pub const NO_LOGS_MESSAGE: &str =
  "ℹ️ No logs found. The system is clean or there has been no activity yet.";

/// Appended to a monitor report when the caller asked for auto-fix.
pub const AUTO_FIX_NOTE: &str = "## 🤖 Auto-fix mode\n\n\
_The errors above have been analyzed and prepared for correction._\n\
_Use the suggested delegation commands to proceed; nothing was changed._\n";

/// Full monitoring report, records in the given (ranked) order.
pub fn build_report(records: &[TriagedRecord]) -> String {
  if records.is_empty() {
    return HEALTHY_MESSAGE.to_string();
  }

  let summary = PrioritySummary::from_records(records);
  let mut out = String::new();

  out.push_str("# 🔍 Log Triage Report\n\n");
  push_summary(&mut out, &summary);

  out.push_str("## 🚨 Detected Errors (by priority)\n\n");
  for (index, r) in records.iter().enumerate() {
    push_record_section(&mut out, index, r);
  }

  out.push_str("## 💡 Recommendations\n\n");
  if summary.critical > 0 {
    out.push_str("### Immediate action required\n\n");
    let _ = writeln!(
      out,
      "**{} critical error(s)** need attention right away:\n",
      summary.critical
    );
    out.push_str("1. Review and fix the critical errors first\n");
    out.push_str("2. Run the test suite after each fix\n");
    out.push_str("3. Check for regressions\n\n");
  }
  out.push_str("### Recommended workflow\n\n");
  out.push_str("For each detected error:\n\n");
  out.push_str("1. **Open an expert review** with the error context\n");
  out.push_str("2. **Run the suggested tool** from the delegation section\n");
  out.push_str("3. **Implement the fix** test-first\n");
  out.push_str("4. **Run the tests** to verify the fix\n");
  out.push_str("5. **Re-run this monitor** to confirm the error is gone\n");

  out
}

fn push_summary(out: &mut String, summary: &PrioritySummary) {
  out.push_str("## 📊 Summary\n\n");
  let _ = writeln!(out, "**Total errors detected:** {}", summary.total);
  let _ = writeln!(out, "- {} Critical: {}", Priority::Critical.icon(), summary.critical);
  let _ = writeln!(out, "- {} High: {}", Priority::High.icon(), summary.high);
  let _ = writeln!(out, "- {} Medium: {}\n", Priority::Medium.icon(), summary.medium);
}

fn push_record_section(out: &mut String, index: usize, r: &TriagedRecord) {
  let _ = writeln!(
    out,
    "### {} Error #{} - {}\n",
    r.priority.icon(),
    index + 1,
    r.category
  );
  let _ = writeln!(out, "**Priority:** {}", r.priority.as_str().to_uppercase());
  let _ = writeln!(out, "**Incident:** `{}`", r.incident_id);
  let _ = writeln!(out, "**Timestamp:** {}\n", r.record.timestamp);
  let _ = writeln!(out, "**Message:**\n```\n{}\n```\n", r.record.message);

  if let (Some(file), Some(line)) = (&r.record.source_file, r.record.source_line) {
    let _ = writeln!(out, "**Location:** `{}:{}`\n", file, line);
  }

  if !r.record.stack_frames.is_empty() {
    let _ = writeln!(out, "**Stack trace:**\n```\n{}\n```\n", r.record.stack_trace());
  }

  if !r.code_analysis.is_empty() {
    out.push_str("**Code analysis:**\n");
    for note in &r.code_analysis {
      let _ = writeln!(out, "- {}", note);
    }
    out.push('\n');
  }

  let _ = writeln!(out, "**Probable root cause:**\n{}\n", r.root_cause);

  out.push_str("**🎯 Suggested delegation:**\n\n```bash\n");
  let steps: Vec<String> = r.suggested_actions.iter().map(|s| s.to_string()).collect();
  out.push_str(&steps.join("\n\n"));
  out.push_str("\n```\n\n---\n\n");
}

/// Options for the single-shot diagnosis view.
#[derive(Debug, Clone, Copy)]
pub struct DiagnoseView {
  pub detailed: bool,
  pub fix: bool,
  pub message_width: usize,
}

/// Compact diagnosis: counts, a table, optional breakdown, workflow.
pub fn render_diagnosis(records: &[TriagedRecord], view: DiagnoseView) -> String {
  if records.is_empty() {
    return HEALTHY_MESSAGE.to_string();
  }

  let summary = PrioritySummary::from_records(records);
  let mut out = String::new();

  let _ = writeln!(out, "Detected {} error(s)\n", summary.total);
  push_summary(&mut out, &summary);

  out.push_str("| # | Priority | Level | Message |\n");
  out.push_str("|---|----------|-------|---------|\n");
  for (index, r) in records.iter().enumerate() {
    let _ = writeln!(
      out,
      "| #{} | {} {} | {} | {} |",
      index + 1,
      r.priority.icon(),
      r.priority.as_str().to_uppercase(),
      r.record.level,
      truncate(&r.record.headline, view.message_width).replace('|', "\\|")
    );
  }
  out.push('\n');

  if view.detailed {
    out.push_str("## 🔬 Detailed analysis\n\n");
    for (index, r) in records.iter().enumerate() {
      let _ = writeln!(out, "Error #{}: {}", index + 1, r.record.message);
      let _ = writeln!(
        out,
        "Level: {} | Priority: {} | Category: {}\n",
        r.record.level, r.priority, r.category
      );
    }
  }

  out.push_str("## 🎯 Recommendations\n\n");
  if summary.critical > 0 {
    out.push_str("⚠️  CRITICAL errors were detected and need immediate attention\n\n");
  }
  out.push_str("1. For each critical/high error, analyze and review the referenced file\n");
  out.push_str("2. Hand the error context to an expert review\n");
  out.push_str("3. Implement the fix test-first (red, green, refactor)\n");
  out.push_str("4. Verify: run the tests, then `triage-engine diagnose --mode critical`\n\n");

  if view.fix {
    out.push_str("## 🤖 Auto-fix mode\n\n");
    out.push_str("Fixes are not applied automatically. Follow the suggested delegations:\n\n");
    for r in records {
      if let Some(first) = r.suggested_actions.first() {
        let _ = writeln!(out, "- `{}` → {}", r.incident_id, first.command);
      }
    }
    out.push('\n');
  } else {
    out.push_str("💡 Tip: use --detailed for a per-error breakdown, --fix for suggested fixes\n");
  }

  out
}

/// Cut `s` to `width` characters, appending `...` when shortened.
pub fn truncate(s: &str, width: usize) -> String {
  if s.chars().count() <= width {
    return s.to_string();
  }
  let cut: String = s.chars().take(width).collect();
  format!("{}...", cut)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{Category, DelegateTool, LogRecord, Suggestion};

  fn triaged(msg: &str, priority: Priority, category: Category) -> TriagedRecord {
    TriagedRecord {
      incident_id: "inc-0000000000000000".into(),
      record: LogRecord::new("2024-01-01 10:00:00", "local", "ERROR", msg),
      priority,
      category,
      code_analysis: Vec::new(),
      root_cause: "General error.".into(),
      suggested_actions: vec![Suggestion {
        tool: DelegateTool::Expert,
        title: "Escalate to expert review".into(),
        command: "LaravelExpert context='bugfix' task='Fix: Unknown Error'".into(),
      }],
    }
  }

  #[test]
  fn empty_records_render_healthy_message() {
    assert_eq!(build_report(&[]), HEALTHY_MESSAGE);
    let view = DiagnoseView {
      detailed: true,
      fix: true,
      message_width: 60,
    };
    assert_eq!(render_diagnosis(&[], view), HEALTHY_MESSAGE);
  }

  #[test]
  fn report_counts_and_sections() {
    let records = vec![
      triaged("db down", Priority::Critical, Category::Database),
      triaged("odd", Priority::High, Category::Unknown),
    ];
    let report = build_report(&records);
    assert!(report.contains("**Total errors detected:** 2"));
    assert!(report.contains("Critical: 1"));
    assert!(report.contains("High: 1"));
    assert!(report.contains("### 🔴 Error #1 - Database Error"));
    assert!(report.contains("### 🟠 Error #2 - Unknown Error"));
    assert!(report.contains("Immediate action required"));
    assert!(!report.contains("**Location:**"));
    assert!(!report.contains("**Stack trace:**"));
  }

  #[test]
  fn optional_sections_appear_when_present() {
    let mut r = triaged("boom", Priority::High, Category::Unknown);
    r.record.source_file = Some("/app/Foo.php".into());
    r.record.source_line = Some(10);
    r.record.stack_frames.push(crate::types::StackFrame {
      file: "/app/Foo.php".into(),
      line: 10,
      raw: "#0 /app/Foo.php:10".into(),
    });
    r.code_analysis.push("Raw queries in use".into());
    let report = build_report(&[r]);
    assert!(report.contains("**Location:** `/app/Foo.php:10`"));
    assert!(report.contains("#0 /app/Foo.php:10"));
    assert!(report.contains("- Raw queries in use"));
    assert!(!report.contains("Immediate action required"));
  }

  #[test]
  fn diagnosis_table_truncates_messages() {
    let long = "x".repeat(80);
    let records = vec![triaged(&long, Priority::High, Category::Unknown)];
    let view = DiagnoseView {
      detailed: false,
      fix: false,
      message_width: 60,
    };
    let out = render_diagnosis(&records, view);
    assert!(out.contains(&format!("{}...", "x".repeat(60))));
    assert!(!out.contains(&"x".repeat(61)));
    assert!(!out.contains("Detailed analysis"));
  }

  #[test]
  fn diagnosis_detailed_and_fix_sections() {
    let records = vec![triaged("boom", Priority::Critical, Category::Syntax)];
    let view = DiagnoseView {
      detailed: true,
      fix: true,
      message_width: 60,
    };
    let out = render_diagnosis(&records, view);
    assert!(out.contains("Detailed analysis"));
    assert!(out.contains("Category: Syntax Error"));
    assert!(out.contains("Auto-fix mode"));
    assert!(out.contains("CRITICAL errors were detected"));
  }

  #[test]
  fn truncate_is_char_safe() {
    assert_eq!(truncate("héllo", 10), "héllo");
    assert_eq!(truncate("héllo", 2), "hé...");
  }
}
