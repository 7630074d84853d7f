//! Statement compilation.
//!
//! [`Statement::to_sql`] delegates to the grammar, except when the statement
//! has both CTEs and set operations. Compiling such a statement naively puts
//! the `WITH` clause inside the first union arm. The repair compiles the
//! union with the CTE list hidden and then prepends the `WITH` clause once.

use tracing::trace;

use crate::error::Result;
use crate::value::Values;

use super::bindings::BindingBucket;
use super::clause::UnionClause;
use super::statement::Statement;
use super::subquery::Subquery;

impl Statement {
	/// Compile to SQL text with `?` placeholders
	pub fn to_sql(&self) -> String {
		if !self.expressions.is_empty() && !self.unions.is_empty() {
			trace!(
				dialect = %self.dialect(),
				expressions = self.expressions.len(),
				unions = self.unions.len(),
				"hoisting WITH clause above union"
			);
			let body = self.grammar.compile_select(&self.without_expressions());
			let expressions = self.grammar.compile_expressions(self);
			return format!("{} {}", expressions, body);
		}
		self.grammar.compile_select(self)
	}

	/// Bindings in the order of the placeholders of [`to_sql`](Self::to_sql)
	pub fn get_bindings(&self) -> Values {
		self.grammar.prepare_bindings(self)
	}

	/// SQL with the bindings inlined as literals.
	///
	/// Meant for logs and debugging only.
	///
	/// ```rust
	/// use reinhardt_cte_query::{Dialect, Operator, Statement};
	///
	/// let mut stmt = Statement::for_dialect(Dialect::Sqlite);
	/// stmt.from("users").and_where("name", Operator::Equal, "o'hara");
	///
	/// assert_eq!(
	///     stmt.to_raw_sql(),
	///     r#"SELECT * FROM "users" WHERE "name" = 'o''hara'"#
	/// );
	/// ```
	pub fn to_raw_sql(&self) -> String {
		inline_bindings(&self.to_sql(), &self.get_bindings())
	}

	fn push_union<'a>(&mut self, query: impl Into<Subquery<'a>>, all: bool) -> Result<&mut Self> {
		let (sql, bindings) = query.into().normalize(self)?;
		self.unions.push(UnionClause { sql, all });
		self.bindings.add(bindings, BindingBucket::Union);
		Ok(self)
	}

	/// Append a `UNION` arm
	pub fn union<'a>(&mut self, query: impl Into<Subquery<'a>>) -> Result<&mut Self> {
		self.push_union(query, false)
	}

	/// Append a `UNION ALL` arm
	pub fn union_all<'a>(&mut self, query: impl Into<Subquery<'a>>) -> Result<&mut Self> {
		self.push_union(query, true)
	}

	/// Compile `INSERT INTO <from> (columns) <query>` with this statement's
	/// CTEs attached.
	///
	/// The statement's FROM table is the insert target. Bindings are the CTE
	/// bindings followed by the bindings of `query`.
	///
	/// ```rust
	/// use reinhardt_cte_query::{Dialect, Statement};
	///
	/// let mut stmt = Statement::for_dialect(Dialect::Postgres);
	/// stmt.from("archive")
	///     .with_expression("old", "select id from posts")
	///     .unwrap();
	///
	/// let (sql, bindings) = stmt.insert_using(["id"], "select id from old").unwrap();
	/// assert_eq!(
	///     sql,
	///     r#"WITH "old" AS (select id from posts) INSERT INTO "archive" ("id") select id from old"#
	/// );
	/// assert!(bindings.is_empty());
	/// ```
	pub fn insert_using<'a, I, S>(
		&self,
		columns: I,
		query: impl Into<Subquery<'a>>,
	) -> Result<(String, Values)>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
		let (sql, query_bindings) = query.into().normalize(self)?;
		let compiled = self.grammar.compile_insert_using(self, &columns, &sql)?;

		let mut bindings = self.bindings.flatten(&[BindingBucket::Expressions]);
		bindings.extend(query_bindings);
		Ok((compiled, bindings))
	}
}

/// Replace each `?` outside quoted text with the matching literal
fn inline_bindings(sql: &str, values: &Values) -> String {
	let mut out = String::with_capacity(sql.len());
	let mut values = values.iter();
	let mut quote: Option<char> = None;

	for ch in sql.chars() {
		match quote {
			Some(close) => {
				if ch == close {
					quote = None;
				}
				out.push(ch);
			}
			None => match ch {
				'\'' | '"' | '`' => {
					quote = Some(ch);
					out.push(ch);
				}
				'[' => {
					quote = Some(']');
					out.push(ch);
				}
				'?' => match values.next() {
					Some(value) => out.push_str(&value.to_sql_literal()),
					None => out.push(ch),
				},
				_ => out.push(ch),
			},
		}
	}
	out
}
