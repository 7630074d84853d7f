//! Common Table Expression registry.
//!
//! CTEs are stored on the statement in definition order, which is also the
//! order of the `WITH` clause. Names are not checked for duplicates and no
//! dependency reordering happens: a CTE referring to another one must be
//! registered after it.

use tracing::trace;

use crate::error::Result;

use super::bindings::BindingBucket;
use super::statement::Statement;
use super::subquery::Subquery;

/// A compiled CTE definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonTableExpression {
	pub(crate) name: String,
	pub(crate) sql: String,
	pub(crate) columns: Option<Vec<String>>,
	pub(crate) recursive: bool,
}

impl CommonTableExpression {
	/// CTE name, case-sensitive
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Compiled body
	pub fn sql(&self) -> &str {
		&self.sql
	}

	/// Explicit column list
	pub fn columns(&self) -> Option<&[String]> {
		self.columns.as_deref()
	}

	/// Whether the body refers to itself
	pub fn is_recursive(&self) -> bool {
		self.recursive
	}
}

impl Statement {
	/// Register a CTE.
	///
	/// The body is normalized into SQL right away and its bindings are
	/// appended to the [`BindingBucket::Expressions`] bucket. An empty
	/// column list is stored as absent.
	///
	/// Returns [`QueryError::InvalidArgument`](crate::QueryError::InvalidArgument)
	/// when the body cannot serve as a CTE.
	pub fn add_expression<'a, I, S>(
		&mut self,
		name: impl Into<String>,
		query: impl Into<Subquery<'a>>,
		columns: I,
		recursive: bool,
	) -> Result<&mut Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let (sql, bindings) = query.into().normalize(self)?;
		let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
		let name = name.into();

		trace!(
			name = %name,
			recursive,
			bindings = bindings.len(),
			"registered common table expression"
		);

		self.expressions.push(CommonTableExpression {
			name,
			sql,
			columns: (!columns.is_empty()).then_some(columns),
			recursive,
		});
		self.bindings.add(bindings, BindingBucket::Expressions);
		Ok(self)
	}

	/// Register a non-recursive CTE without a column list.
	///
	/// ```rust
	/// use reinhardt_cte_query::{Dialect, Statement, Subquery};
	///
	/// let mut stmt = Statement::for_dialect(Dialect::Postgres);
	/// stmt.with_expression("t", Subquery::callback(|q| {
	///     q.from("x");
	/// }))
	/// .unwrap()
	/// .from("t")
	/// .select(["*"]);
	///
	/// assert_eq!(
	///     stmt.to_sql(),
	///     r#"WITH "t" AS (SELECT * FROM "x") SELECT * FROM "t""#
	/// );
	/// assert!(stmt.get_bindings().is_empty());
	/// ```
	pub fn with_expression<'a>(
		&mut self,
		name: impl Into<String>,
		query: impl Into<Subquery<'a>>,
	) -> Result<&mut Self> {
		self.add_expression(name, query, Vec::<String>::new(), false)
	}

	/// Register a non-recursive CTE with an explicit column list
	pub fn with_expression_columns<'a, I, S>(
		&mut self,
		name: impl Into<String>,
		query: impl Into<Subquery<'a>>,
		columns: I,
	) -> Result<&mut Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.add_expression(name, query, columns, false)
	}

	/// Register a recursive CTE. An empty column list means none.
	///
	/// ```rust
	/// use reinhardt_cte_query::{Dialect, Statement};
	///
	/// let mut stmt = Statement::for_dialect(Dialect::MySql);
	/// stmt.with_recursive_expression(
	///     "numbers",
	///     "select 1 union all select number + 1 from numbers where number < 10",
	///     ["number"],
	/// )
	/// .unwrap()
	/// .from("numbers");
	///
	/// assert!(stmt.to_sql().starts_with("WITH RECURSIVE `numbers` (`number`) AS (select 1"));
	/// ```
	pub fn with_recursive_expression<'a, I, S>(
		&mut self,
		name: impl Into<String>,
		query: impl Into<Subquery<'a>>,
		columns: I,
	) -> Result<&mut Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.add_expression(name, query, columns, true)
	}

	/// Set the maximum recursion depth.
	///
	/// Only rendered by dialects with native syntax. Others drop it silently.
	pub fn recursion_limit(&mut self, value: i64) -> &mut Self {
		self.recursion_limit = Some(value);
		self
	}

	/// Copy of this statement with the CTE list hidden.
	///
	/// Bindings are kept untouched; only the `WITH` clause disappears from the
	/// compiled text.
	pub fn without_expressions(&self) -> Statement {
		let mut hidden = self.clone();
		hidden.expressions.clear();
		hidden
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{Dialect, Operator};
	use crate::value::Value;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	#[rstest]
	fn test_expressions_keep_registration_order() {
		// Arrange
		let mut stmt = Statement::for_dialect(Dialect::Sqlite);

		// Act
		stmt.with_expression("b", "select 1")
			.unwrap()
			.with_expression("a", "select 2")
			.unwrap()
			.with_expression("b", "select 3")
			.unwrap();

		// Assert
		let names: Vec<&str> = stmt.expressions().iter().map(|e| e.name()).collect();
		assert_eq!(names, vec!["b", "a", "b"]);
	}

	#[rstest]
	fn test_empty_column_list_is_absent() {
		// Arrange
		let mut stmt = Statement::for_dialect(Dialect::Postgres);

		// Act
		stmt.with_recursive_expression("t", "select 1", Vec::<String>::new())
			.unwrap();

		// Assert
		assert_eq!(stmt.expressions()[0].columns(), None);
		assert!(stmt.expressions()[0].is_recursive());
	}

	#[rstest]
	fn test_expression_bindings_go_to_expressions_bucket() {
		// Arrange
		let mut stmt = Statement::for_dialect(Dialect::MySql);
		let mut first = stmt.new_query();
		first.from("posts").and_where("id", Operator::Equal, 1i32);

		// Act
		stmt.and_where("x", Operator::Equal, 9i32)
			.with_expression("p", first)
			.unwrap()
			.with_expression(
				"q",
				Subquery::callback(|q| {
					q.from("posts").and_where("id", Operator::Equal, 2i32);
				}),
			)
			.unwrap();

		// Assert
		assert_eq!(
			stmt.bindings().bucket(BindingBucket::Expressions),
			&[Value::from(1i32), Value::from(2i32)]
		);
		assert_eq!(
			stmt.bindings().bucket(BindingBucket::Where),
			&[Value::from(9i32)]
		);
	}

	#[rstest]
	fn test_blank_raw_body_is_rejected_and_not_registered() {
		// Arrange
		let mut stmt = Statement::for_dialect(Dialect::Sqlite);

		// Act
		let result = stmt.with_expression("t", "  ").map(|_| ());

		// Assert
		assert!(matches!(
			result,
			Err(crate::QueryError::InvalidArgument(_))
		));
		assert!(stmt.expressions().is_empty());
		assert!(stmt.bindings().bucket(BindingBucket::Expressions).is_empty());
	}

	#[rstest]
	fn test_without_expressions_keeps_everything_else() {
		// Arrange
		let mut stmt = Statement::for_dialect(Dialect::SqlServer);
		stmt.with_expression("t", "select 1")
			.unwrap()
			.from("t")
			.recursion_limit(10);

		// Act
		let hidden = stmt.without_expressions();

		// Assert
		assert!(hidden.expressions().is_empty());
		assert_eq!(stmt.expressions().len(), 1);
		assert_eq!(hidden.table(), Some("t"));
		assert_eq!(hidden.get_recursion_limit(), Some(10));
	}
}
