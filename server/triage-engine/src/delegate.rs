//! Delegation suggestions: which review/analysis tool should look at a record.

use crate::types::{Category, DelegateTool, Priority, Suggestion};

/// Ordered, advisory next steps for a record.
///
/// Critical records with a known file start with a security review; the last
/// entry always escalates to an expert review carrying the category.
pub fn suggest_delegation(
  category: Category,
  source_file: Option<&str>,
  priority: Priority,
) -> Vec<Suggestion> {
  let mut out = Vec::new();

  if let (Priority::Critical, Some(file)) = (priority, source_file) {
    out.push(suggestion(
      DelegateTool::ReviewCode,
      "Senior code review (critical)",
      format!("file='{}' focus='security'", file),
    ));
  }

  if category == Category::Database {
    out.push(suggestion(
      DelegateTool::AnalyzeCode,
      "Analyze related file",
      with_file(source_file, "type='security'"),
    ));
    out.push(suggestion(
      DelegateTool::OptimizationSuggestions,
      "Optimize queries",
      "category='database'".to_string(),
    ));
  } else if category.is_missing_symbol() {
    out.push(suggestion(
      DelegateTool::DocumentCode,
      "Document and verify code",
      with_file(source_file, ""),
    ));
    out.push(suggestion(
      DelegateTool::ReviewCode,
      "Full review",
      with_file(source_file, "focus='all'"),
    ));
  } else {
    out.push(suggestion(
      DelegateTool::AnalyzeCode,
      "General analysis",
      with_file(source_file, "type='full'"),
    ));
  }

  out.push(suggestion(
    DelegateTool::Expert,
    "Escalate to expert review",
    format!("context='bugfix' task='Fix: {}'", category),
  ));

  out
}

fn suggestion(tool: DelegateTool, title: &str, args: String) -> Suggestion {
  let command = if args.is_empty() {
    tool.command_name().to_string()
  } else {
    format!("{} {}", tool.command_name(), args)
  };
  Suggestion {
    tool,
    title: title.to_string(),
    command,
  }
}

fn with_file(source_file: Option<&str>, rest: &str) -> String {
  match (source_file, rest.is_empty()) {
    (Some(file), true) => format!("file='{}'", file),
    (Some(file), false) => format!("file='{}' {}", file, rest),
    (None, _) => rest.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn critical_with_file_starts_with_security_review() {
    let s = suggest_delegation(Category::Database, Some("/app/Repo.php"), Priority::Critical);
    assert_eq!(s[0].tool, DelegateTool::ReviewCode);
    assert_eq!(s[0].command, "ReviewCodeSenior file='/app/Repo.php' focus='security'");
    assert_eq!(s[1].command, "AnalyzeCode file='/app/Repo.php' type='security'");
    assert_eq!(s[2].command, "OptimizationSuggestions category='database'");
    assert_eq!(s.len(), 4);
    assert_eq!(
      s.last().unwrap().command,
      "LaravelExpert context='bugfix' task='Fix: Database Error'"
    );
  }

  #[test]
  fn critical_without_file_has_no_security_review() {
    let s = suggest_delegation(Category::Database, None, Priority::Critical);
    assert_eq!(s[0].tool, DelegateTool::AnalyzeCode);
    assert_eq!(s[0].command, "AnalyzeCode type='security'");
    assert_eq!(s.last().unwrap().tool, DelegateTool::Expert);
  }

  #[test]
  fn missing_symbol_suggests_docs_and_full_review() {
    let s = suggest_delegation(Category::UndefinedMethod, Some("/app/Task.php"), Priority::High);
    let cmds: Vec<&str> = s.iter().map(|x| x.command.as_str()).collect();
    assert_eq!(
      cmds,
      vec![
        "DocumentCode file='/app/Task.php'",
        "ReviewCodeSenior file='/app/Task.php' focus='all'",
        "LaravelExpert context='bugfix' task='Fix: Undefined Method'",
      ]
    );
  }

  #[test]
  fn other_categories_get_general_analysis() {
    let s = suggest_delegation(Category::Permission, None, Priority::Medium);
    assert_eq!(s.len(), 2);
    assert_eq!(s[0].command, "AnalyzeCode type='full'");
    assert_eq!(
      s[1].command,
      "LaravelExpert context='bugfix' task='Fix: Permission Error'"
    );
  }
}
