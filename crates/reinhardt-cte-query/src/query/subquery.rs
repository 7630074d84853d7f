//! Subquery normalization.
//!
//! A CTE body or union arm can be given as a callback building a fresh
//! statement, as an already built query object, or as raw SQL. All three are
//! normalized into a `(sql, bindings)` pair before they are stored.

use std::fmt;

use crate::error::{QueryError, Result};
use crate::types::Dialect;
use crate::value::Values;

use super::statement::Statement;

/// Anything that compiles to SQL text plus ordered bindings.
///
/// Implemented by [`Statement`] and by model-bound wrappers around it.
pub trait QueryStatement {
	/// Dialect the statement is compiled for
	fn dialect(&self) -> Dialect;

	/// Compiled SQL text
	fn to_sql(&self) -> String;

	/// Bindings in placeholder order
	fn get_bindings(&self) -> Values;
}

impl QueryStatement for Statement {
	fn dialect(&self) -> Dialect {
		Statement::dialect(self)
	}

	fn to_sql(&self) -> String {
		Statement::to_sql(self)
	}

	fn get_bindings(&self) -> Values {
		Statement::get_bindings(self)
	}
}

/// Body of a CTE or a union arm.
///
/// ```rust
/// use reinhardt_cte_query::{Dialect, Statement, Subquery};
///
/// let mut inner = Statement::for_dialect(Dialect::Sqlite);
/// inner.from("users");
///
/// let _from_builder: Subquery = inner.into();
/// let _from_sql: Subquery = "select 1".into();
/// let _from_callback = Subquery::callback(|q| {
///     q.from("users");
/// });
/// ```
pub enum Subquery<'a> {
	/// Receives an empty statement sharing the outer grammar
	Callback(Box<dyn FnOnce(&mut Statement) + 'a>),
	/// Already built query object
	Builder(Box<dyn QueryStatement + 'a>),
	/// Literal SQL without bindings; blank text is rejected by
	/// [`normalize`](Subquery::normalize)
	Raw(String),
}

impl<'a> Subquery<'a> {
	/// Wrap a closure building the subquery
	pub fn callback<F>(callback: F) -> Self
	where
		F: FnOnce(&mut Statement) + 'a,
	{
		Subquery::Callback(Box::new(callback))
	}

	/// Wrap a query object
	pub fn builder<Q>(query: Q) -> Self
	where
		Q: QueryStatement + 'a,
	{
		Subquery::Builder(Box::new(query))
	}

	/// Wrap literal SQL. The text is checked when the subquery is
	/// normalized, not here.
	pub fn raw(sql: impl Into<String>) -> Self {
		Subquery::Raw(sql.into())
	}

	/// Compile into SQL text and bindings.
	///
	/// `parent` supplies the grammar for callbacks and the dialect a nested
	/// query object must match.
	///
	/// # Errors
	///
	/// [`QueryError::InvalidArgument`] when a query object was built for
	/// another dialect, or when raw SQL is empty or whitespace only.
	pub fn normalize(self, parent: &Statement) -> Result<(String, Values)> {
		match self {
			Subquery::Callback(callback) => {
				let mut query = parent.new_query();
				callback(&mut query);
				Ok((query.to_sql(), query.get_bindings()))
			}
			Subquery::Builder(query) => {
				if query.dialect() != parent.dialect() {
					return Err(QueryError::InvalidArgument(format!(
						"subquery compiled for {} cannot be embedded in a {} statement",
						query.dialect(),
						parent.dialect()
					)));
				}
				Ok((query.to_sql(), query.get_bindings()))
			}
			Subquery::Raw(sql) => {
				if sql.trim().is_empty() {
					return Err(QueryError::InvalidArgument(
						"subquery SQL must not be empty".to_string(),
					));
				}
				Ok((sql, Values::new()))
			}
		}
	}
}

impl fmt::Debug for Subquery<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Subquery::Callback(_) => f.write_str("Callback(..)"),
			Subquery::Builder(query) => f.debug_tuple("Builder").field(&query.to_sql()).finish(),
			Subquery::Raw(sql) => f.debug_tuple("Raw").field(sql).finish(),
		}
	}
}

impl From<Statement> for Subquery<'_> {
	fn from(query: Statement) -> Self {
		Subquery::Builder(Box::new(query))
	}
}

impl<'a> From<&'a Statement> for Subquery<'a> {
	fn from(query: &'a Statement) -> Self {
		Subquery::Builder(Box::new(query.clone()))
	}
}

impl From<&str> for Subquery<'_> {
	fn from(sql: &str) -> Self {
		Subquery::Raw(sql.to_string())
	}
}

impl From<String> for Subquery<'_> {
	fn from(sql: String) -> Self {
		Subquery::Raw(sql)
	}
}
