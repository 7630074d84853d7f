//! Model-bound queries
//!
//! A [`Model`] names its table. [`Model::query`] returns a [`ModelQuery`],
//! a statement that already selects from that table and can be used anywhere
//! a [`Statement`] or a [`Subquery`] is accepted, including as a CTE body.
//!
//! ```rust
//! use reinhardt_cte_db::orm::Model;
//! use reinhardt_cte_query::{Dialect, Operator, Statement, Subquery};
//!
//! struct Post;
//!
//! impl Model for Post {
//!     const TABLE: &'static str = "posts";
//! }
//!
//! let mut recent = Post::query_for(Dialect::Postgres);
//! recent.and_where("year", Operator::Equal, 2024i32);
//!
//! let mut stmt = Statement::for_dialect(Dialect::Postgres);
//! stmt.with_expression("recent", recent).unwrap().from("recent");
//!
//! assert_eq!(
//!     stmt.to_sql(),
//!     r#"WITH "recent" AS (SELECT * FROM "posts" WHERE "year" = ?) SELECT * FROM "recent""#
//! );
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use reinhardt_cte_query::{Dialect, QueryStatement, Statement, Subquery, Values};

use crate::backend::Row;
use crate::connection::Connection;
use crate::error::Result;

/// A type stored in one table
pub trait Model: Sized {
	/// Unprefixed table name
	const TABLE: &'static str;

	/// Query over the model's table on `conn`
	fn query(conn: &Connection) -> ModelQuery<Self> {
		ModelQuery::new(conn.table(Self::TABLE))
	}

	/// Query over the model's table for a dialect, without a connection
	fn query_for(dialect: Dialect) -> ModelQuery<Self> {
		let mut statement = Statement::for_dialect(dialect);
		statement.from(Self::TABLE);
		ModelQuery::new(statement)
	}
}

/// Statement over a model's table
pub struct ModelQuery<M: Model> {
	statement: Statement,
	_marker: PhantomData<fn() -> M>,
}

impl<M: Model> ModelQuery<M> {
	pub fn new(statement: Statement) -> Self {
		Self {
			statement,
			_marker: PhantomData,
		}
	}

	/// Table the model is stored in
	pub fn model_table(&self) -> &'static str {
		M::TABLE
	}

	pub fn into_statement(self) -> Statement {
		self.statement
	}

	/// Run the query on `conn`
	pub async fn get(&self, conn: &Connection) -> Result<Vec<Row>> {
		conn.select(&self.statement).await
	}
}

impl<M: Model> Clone for ModelQuery<M> {
	fn clone(&self) -> Self {
		Self::new(self.statement.clone())
	}
}

impl<M: Model> fmt::Debug for ModelQuery<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModelQuery")
			.field("table", &M::TABLE)
			.field("statement", &self.statement)
			.finish()
	}
}

impl<M: Model> Deref for ModelQuery<M> {
	type Target = Statement;

	fn deref(&self) -> &Statement {
		&self.statement
	}
}

impl<M: Model> DerefMut for ModelQuery<M> {
	fn deref_mut(&mut self) -> &mut Statement {
		&mut self.statement
	}
}

impl<M: Model> QueryStatement for ModelQuery<M> {
	fn dialect(&self) -> Dialect {
		self.statement.dialect()
	}

	fn to_sql(&self) -> String {
		self.statement.to_sql()
	}

	fn get_bindings(&self) -> Values {
		self.statement.get_bindings()
	}
}

impl<'a, M: Model + 'a> From<ModelQuery<M>> for Subquery<'a> {
	fn from(query: ModelQuery<M>) -> Self {
		Subquery::builder(query)
	}
}
