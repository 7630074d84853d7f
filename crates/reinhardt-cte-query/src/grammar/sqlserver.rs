//! SQL Server grammar

use tracing::warn;

use crate::query::{BindingBucket, CommonTableExpression, Statement};
use crate::types::Dialect;
use crate::value::Values;

use super::{Grammar, join_non_empty};

/// Binding order once ORDER BY moves into the `ROW_NUMBER()` column
const OFFSET_BINDING_ORDER: [BindingBucket; 9] = [
	BindingBucket::Expressions,
	BindingBucket::Select,
	BindingBucket::Order,
	BindingBucket::From,
	BindingBucket::Join,
	BindingBucket::Where,
	BindingBucket::GroupBy,
	BindingBucket::Having,
	BindingBucket::Union,
];

/// Grammar for Microsoft SQL Server.
///
/// - `LIMIT` alone renders as `SELECT TOP n`.
/// - An offset turns the statement into a `ROW_NUMBER()` paginated subquery;
///   the `WITH` clause is emitted in front of the wrapper, never inside it.
/// - `WITH` never carries `RECURSIVE`; recursive bodies work without it.
/// - The recursion limit renders as `OPTION (MAXRECURSION n)` at the very end.
///
/// ```rust
/// use reinhardt_cte_query::{Dialect, Statement};
///
/// let mut stmt = Statement::for_dialect(Dialect::SqlServer);
/// stmt.from("users").limit(10);
/// assert_eq!(stmt.to_sql(), "SELECT TOP 10 * FROM [users]");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlServerGrammar {
	table_prefix: String,
}

impl SqlServerGrammar {
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

	/// Wrap a numbered body into the pagination filter
	fn compile_table_expression(&self, body: &str, stmt: &Statement) -> String {
		let row_num = self.wrap_value("row_num");
		format!(
			"SELECT * FROM ({}) AS {} WHERE {} {} ORDER BY {}",
			body,
			self.wrap_value("temp_table"),
			row_num,
			self.compile_row_constraint(stmt),
			row_num
		)
	}

	/// `BETWEEN start AND finish`, or `>= start` without a limit
	fn compile_row_constraint(&self, stmt: &Statement) -> String {
		let offset = stmt.offset.unwrap_or_default();
		let start = offset.saturating_add(1);
		match stmt.limit {
			Some(limit) => format!("BETWEEN {} AND {}", start, offset.saturating_add(limit)),
			None => format!(">= {}", start),
		}
	}

	/// Paginated SELECT built on `ROW_NUMBER()`
	fn compile_ansi_offset(&self, stmt: &Statement) -> String {
		let hidden = stmt.without_expressions();
		let mut components = self.compile_components(&hidden);

		let orders = std::mem::take(&mut components.orders);
		let over = if orders.is_empty() {
			"ORDER BY (SELECT 0)".to_string()
		} else {
			orders
		};
		components.columns.push_str(&format!(
			", ROW_NUMBER() OVER ({}) AS {}",
			over,
			self.wrap_value("row_num")
		));

		let mut sql = self.compile_table_expression(&self.concatenate(&components), stmt);
		if !stmt.unions.is_empty() {
			sql = format!("{} {}", self.wrap_union(&sql), self.compile_unions(stmt));
		}

		join_non_empty(&[
			self.compile_expressions(stmt),
			sql,
			self.compile_recursion_limit(stmt),
		])
	}
}

impl Grammar for SqlServerGrammar {
	fn dialect(&self) -> Dialect {
		Dialect::SqlServer
	}

	fn table_prefix(&self) -> &str {
		&self.table_prefix
	}

	fn wrap_value(&self, value: &str) -> String {
		if value == "*" {
			return value.to_string();
		}
		format!("[{}]", value.replace(']', "]]"))
	}

	fn compile_select(&self, stmt: &Statement) -> String {
		if stmt.offset.is_none() {
			return self.compile_standard_select(stmt);
		}
		self.compile_ansi_offset(stmt)
	}

	fn recursive_keyword(&self, _expressions: &[CommonTableExpression]) -> &'static str {
		""
	}

	fn compile_recursion_limit(&self, stmt: &Statement) -> String {
		match stmt.recursion_limit {
			Some(limit) if limit >= 0 => format!("OPTION (MAXRECURSION {})", limit),
			Some(limit) => {
				warn!(limit, "negative recursion limit is not valid, omitting");
				String::new()
			}
			None => String::new(),
		}
	}

	fn compile_columns(&self, stmt: &Statement) -> String {
		let mut sql = String::from("SELECT ");
		if stmt.distinct {
			sql.push_str("DISTINCT ");
		}
		if let (Some(limit), None) = (stmt.limit, stmt.offset) {
			sql.push_str(&format!("TOP {} ", limit));
		}
		sql.push_str(&self.compile_column_list(stmt));
		sql
	}

	fn compile_limit(&self, _stmt: &Statement) -> String {
		String::new()
	}

	fn compile_offset(&self, _stmt: &Statement) -> String {
		String::new()
	}

	fn wrap_union(&self, sql: &str) -> String {
		format!("SELECT * FROM ({}) AS {}", sql, self.wrap_value("temp_table"))
	}

	fn prepare_bindings(&self, stmt: &Statement) -> Values {
		if stmt.offset.is_some() {
			return stmt.bindings.flatten(&OFFSET_BINDING_ORDER);
		}
		stmt.bindings.flatten(&BindingBucket::ORDERED)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{Operator, Order};
	use crate::value::Value;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn statement() -> Statement {
		Statement::for_dialect(Dialect::SqlServer)
	}

	#[rstest]
	#[case(Some(10), "BETWEEN 21 AND 30")]
	#[case(None, ">= 21")]
	fn test_row_constraint(#[case] limit: Option<u64>, #[case] expected: &str) {
		// Arrange
		let mut stmt = statement();
		stmt.offset(20);
		if let Some(limit) = limit {
			stmt.limit(limit);
		}

		// Act
		let constraint = SqlServerGrammar::new().compile_row_constraint(&stmt);

		// Assert
		assert_eq!(constraint, expected);
	}

	#[rstest]
	fn test_offset_without_order_uses_constant_order() {
		// Arrange
		let mut stmt = statement();
		stmt.from("users").offset(5);

		// Act
		let sql = stmt.to_sql();

		// Assert
		assert_eq!(
			sql,
			"SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY (SELECT 0)) AS [row_num] FROM [users]) AS [temp_table] WHERE [row_num] >= 6 ORDER BY [row_num]"
		);
	}

	#[rstest]
	fn test_order_bindings_move_after_select_with_offset() {
		// Arrange
		let mut stmt = statement();
		stmt.from("users")
			.select_raw("? AS [tag]", ["t"].into_iter().collect())
			.and_where("id", Operator::GreaterThan, 1i32)
			.order_by_raw("CASE WHEN [id] = ? THEN 0 ELSE 1 END", [7i32].into_iter().collect())
			.order_by("id", Order::Asc)
			.limit(2)
			.offset(4);

		// Act
		let sql = stmt.to_sql();
		let bindings = stmt.get_bindings();

		// Assert
		assert_eq!(
			sql,
			"SELECT * FROM (SELECT ? AS [tag], ROW_NUMBER() OVER (ORDER BY CASE WHEN [id] = ? THEN 0 ELSE 1 END, [id] ASC) AS [row_num] FROM [users] WHERE [id] > ?) AS [temp_table] WHERE [row_num] BETWEEN 5 AND 6 ORDER BY [row_num]"
		);
		assert_eq!(
			bindings.into_inner(),
			vec![Value::from("t"), Value::from(7i32), Value::from(1i32)]
		);
	}

	#[rstest]
	#[case(0, "SELECT * FROM [t] OPTION (MAXRECURSION 0)")]
	#[case(-1, "SELECT * FROM [t]")]
	#[case(32767, "SELECT * FROM [t] OPTION (MAXRECURSION 32767)")]
	fn test_recursion_limit(#[case] limit: i64, #[case] expected: &str) {
		let mut stmt = statement();
		stmt.from("t").recursion_limit(limit);
		assert_eq!(stmt.to_sql(), expected);
	}

	#[rstest]
	fn test_with_has_no_recursive_keyword() {
		// Arrange
		let mut stmt = statement();
		stmt.with_recursive_expression(
			"numbers",
			"select 1 union all select number + 1 from numbers where number < 3",
			["number"],
		)
		.unwrap()
		.from("numbers");

		// Act
		let sql = stmt.to_sql();

		// Assert
		assert_eq!(
			sql,
			"WITH [numbers] ([number]) AS (select 1 union all select number + 1 from numbers where number < 3) SELECT * FROM [numbers]"
		);
	}
}
