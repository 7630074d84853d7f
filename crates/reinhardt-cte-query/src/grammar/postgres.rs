//! PostgreSQL grammar

use crate::types::Dialect;

use super::Grammar;

/// Grammar for PostgreSQL.
///
/// Uses the standard compiler with double-quoted identifiers. Placeholders
/// stay `?`; the driver numbers them before execution.
#[derive(Debug, Clone, Default)]
pub struct PostgresGrammar {
	table_prefix: String,
}

impl PostgresGrammar {
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

impl Grammar for PostgresGrammar {
	fn dialect(&self) -> Dialect {
		Dialect::Postgres
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
}
