//! MySQL grammar

use crate::error::Result;
use crate::query::Statement;
use crate::types::Dialect;

use super::{Grammar, join_non_empty};

/// Grammar for MySQL and MariaDB.
///
/// Identifiers are quoted with backticks. MySQL only accepts the `WITH`
/// clause of an `INSERT ... SELECT` in front of the `SELECT`, so
/// [`compile_insert_using`](Grammar::compile_insert_using) places it after
/// the column list.
///
/// ```rust
/// use reinhardt_cte_query::grammar::{Grammar, MySqlGrammar};
///
/// let grammar = MySqlGrammar::with_table_prefix("app_");
/// assert_eq!(grammar.wrap_table("users"), "`app_users`");
/// assert_eq!(grammar.wrap_value("we`ird"), "`we``ird`");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MySqlGrammar {
	table_prefix: String,
}

impl MySqlGrammar {
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

impl Grammar for MySqlGrammar {
	fn dialect(&self) -> Dialect {
		Dialect::MySql
	}

	fn table_prefix(&self) -> &str {
		&self.table_prefix
	}

	fn wrap_value(&self, value: &str) -> String {
		if value == "*" {
			return value.to_string();
		}
		format!("`{}`", value.replace('`', "``"))
	}

	fn compile_limit(&self, stmt: &Statement) -> String {
		match (stmt.limit, stmt.offset) {
			(Some(limit), _) => format!("LIMIT {}", limit),
			// OFFSET is only valid after LIMIT
			(None, Some(_)) => format!("LIMIT {}", u64::MAX),
			(None, None) => String::new(),
		}
	}

	fn compile_insert_using(
		&self,
		stmt: &Statement,
		columns: &[String],
		sql: &str,
	) -> Result<String> {
		let insert = self.compile_insert_target(stmt, columns)?;
		Ok(join_non_empty(&[
			insert,
			self.compile_expressions(stmt),
			sql.to_string(),
		]))
	}
}
