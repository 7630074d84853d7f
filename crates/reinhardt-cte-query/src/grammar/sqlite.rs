//! SQLite grammar

use crate::query::Statement;
use crate::types::Dialect;

use super::Grammar;

/// Grammar for SQLite.
///
/// SQLite rejects parenthesized compound-select arms, so each union arm is
/// wrapped as a derived table instead.
#[derive(Debug, Clone, Default)]
pub struct SqliteGrammar {
	table_prefix: String,
}

impl SqliteGrammar {
	/// Create a grammar without table prefix
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a grammar prepending `prefix` to table names
	pub fn with_table_prefix(prefix: impl Into<String>) -> Self {
		Self {
			table_prefix: prefix.into(),
		}
	}
}

impl Grammar for SqliteGrammar {
	fn dialect(&self) -> Dialect {
		Dialect::Sqlite
	}

	fn table_prefix(&self) -> &str {
		&self.table_prefix
	}

	fn wrap_value(&self, value: &str) -> String {
		if value == "*" {
			return value.to_string();
		}
		format!("\"{}\"", value.replace('"', "\"\""))
	}

	fn compile_limit(&self, stmt: &Statement) -> String {
		match (stmt.limit, stmt.offset) {
			(Some(limit), _) => format!("LIMIT {}", limit),
			// OFFSET requires a LIMIT; -1 means unbounded
			(None, Some(_)) => "LIMIT -1".to_string(),
			(None, None) => String::new(),
		}
	}

	fn wrap_union(&self, sql: &str) -> String {
		format!("SELECT * FROM ({})", sql)
	}
}
