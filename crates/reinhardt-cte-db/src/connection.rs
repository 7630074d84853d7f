//! Database connection management

use std::fmt;
use std::sync::Arc;

use reinhardt_cte_query::{Dialect, Grammar, QueryError, Statement, Subquery, Values};

use crate::backend::{DatabaseBackend, Row};
use crate::error::Result;

/// A named backend paired with the grammar its statements compile with
#[derive(Clone)]
pub struct Connection {
	name: String,
	backend: Arc<dyn DatabaseBackend>,
	grammar: Arc<dyn Grammar>,
}

impl Connection {
	pub fn new(
		name: impl Into<String>,
		backend: Arc<dyn DatabaseBackend>,
		grammar: Arc<dyn Grammar>,
	) -> Self {
		Self {
			name: name.into(),
			backend,
			grammar,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn backend(&self) -> Arc<dyn DatabaseBackend> {
		self.backend.clone()
	}

	pub fn grammar(&self) -> &Arc<dyn Grammar> {
		&self.grammar
	}

	pub fn dialect(&self) -> Dialect {
		self.grammar.dialect()
	}

	/// Empty statement bound to this connection's grammar
	pub fn query(&self) -> Statement {
		Statement::new(self.grammar.clone())
	}

	/// Statement selecting from `table`
	pub fn table(&self, table: impl Into<String>) -> Statement {
		let mut stmt = self.query();
		stmt.from(table);
		stmt
	}

	/// Run a SELECT statement and return its rows
	pub async fn select(&self, stmt: &Statement) -> Result<Vec<Row>> {
		self.ensure_dialect(stmt)?;
		self.backend
			.fetch_all(&stmt.to_sql(), stmt.get_bindings())
			.await
	}

	/// Compile and run `INSERT INTO <stmt's table> (columns) <query>`
	///
	/// Returns the number of inserted rows.
	pub async fn insert_using<'a, I, S>(
		&self,
		stmt: &Statement,
		columns: I,
		query: impl Into<Subquery<'a>>,
	) -> Result<u64>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.ensure_dialect(stmt)?;
		let (sql, bindings) = stmt.insert_using(columns, query)?;
		self.backend.execute(&sql, bindings).await
	}

	/// Run raw SQL with `?` placeholders
	pub async fn statement(&self, sql: &str, values: Values) -> Result<u64> {
		self.backend.execute(sql, values).await
	}

	fn ensure_dialect(&self, stmt: &Statement) -> Result<()> {
		if stmt.dialect() != self.dialect() {
			return Err(QueryError::InvalidArgument(format!(
				"statement compiled for {} cannot run on connection '{}' ({})",
				stmt.dialect(),
				self.name,
				self.dialect()
			))
			.into());
		}
		Ok(())
	}
}

impl fmt::Debug for Connection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Connection")
			.field("name", &self.name)
			.field("dialect", &self.dialect())
			.field("table_prefix", &self.grammar.table_prefix())
			.finish()
	}
}
