//! Priority and category from level + message, via an ordered rule table.

use crate::types::{Category, Priority};

/// One classification rule. The first rule whose predicate matches wins.
pub struct Rule {
  pub category: Category,
  /// `None` keeps the level-derived priority.
  pub priority: Option<Priority>,
  pub matches: fn(&str) -> bool,
}

/// Database and syntax markers come first so they override every other rule
/// and the level mapping.
pub const RULES: &[Rule] = &[
  Rule {
    category: Category::Database,
    priority: Some(Priority::Critical),
    matches: is_database,
  },
  Rule {
    category: Category::Syntax,
    priority: Some(Priority::Critical),
    matches: is_syntax,
  },
  Rule {
    category: Category::ClassNotFound,
    priority: Some(Priority::High),
    matches: is_class_not_found,
  },
  Rule {
    category: Category::UndefinedVariable,
    priority: Some(Priority::High),
    matches: is_undefined_symbol,
  },
  Rule {
    category: Category::UndefinedMethod,
    priority: Some(Priority::High),
    matches: is_undefined_call,
  },
  Rule {
    category: Category::Permission,
    priority: Some(Priority::Medium),
    matches: is_permission,
  },
  Rule {
    category: Category::Connection,
    priority: Some(Priority::High),
    matches: is_connection,
  },
];

fn is_database(m: &str) -> bool {
  m.contains("SQLSTATE")
}

fn is_syntax(m: &str) -> bool {
  m.contains("syntax error")
}

fn is_class_not_found(m: &str) -> bool {
  m.contains("Class") && m.contains("not found")
}

fn is_undefined_symbol(m: &str) -> bool {
  m.contains("Undefined")
}

fn is_undefined_call(m: &str) -> bool {
  m.contains("Call to undefined")
}

fn is_permission(m: &str) -> bool {
  m.contains("Permission denied")
}

fn is_connection(m: &str) -> bool {
  m.contains("Connection refused") || m.contains("timeout")
}

/// Classify one record. Pure: identical input always gives identical output.
pub fn classify(level: &str, message: &str) -> (Priority, Category) {
  let base = Priority::from_level(level);
  RULES
    .iter()
    .find(|rule| (rule.matches)(message))
    .map(|rule| (rule.priority.unwrap_or(base), rule.category))
    .unwrap_or((base, Category::Unknown))
}
