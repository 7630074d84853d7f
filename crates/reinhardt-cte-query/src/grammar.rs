//! Dialect grammars.
//!
//! A [`Grammar`] turns a [`Statement`] into SQL text for one database. The
//! trait carries the standard compiler as provided methods; each dialect
//! overrides identifier quoting and the pieces where its SQL differs.
//!
//! | Grammar | Quoting | Union arm | Recursion limit |
//! |---------|---------|-----------|-----------------|
//! | [`MySqlGrammar`] | `` `name` `` | `(sql)` | - |
//! | [`PostgresGrammar`] | `"name"` | `(sql)` | - |
//! | [`SqliteGrammar`] | `"name"` | `SELECT * FROM (sql)` | - |
//! | [`SqlServerGrammar`] | `[name]` | `SELECT * FROM (sql) AS [temp_table]` | `OPTION (MAXRECURSION n)` |
//!
//! Every grammar emits `?` placeholders.

mod mysql;
mod postgres;
mod registry;
mod sql_writer;
mod sqlite;
mod sqlserver;

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{QueryError, Result};
use crate::query::{
	BindingBucket, Column, CommonTableExpression, FromClause, HavingClause, OrderClause,
	Statement, WhereClause,
};
use crate::types::Dialect;
use crate::value::Values;

pub use mysql::MySqlGrammar;
pub use postgres::PostgresGrammar;
pub use registry::{GrammarFactory, GrammarRegistry};
pub use sql_writer::SqlWriter;
pub use sqlite::SqliteGrammar;
pub use sqlserver::SqlServerGrammar;

/// Compiled clause fragments of a SELECT, in textual order.
///
/// Empty strings stand for absent clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectComponents {
	/// `WITH ...`
	pub expressions: String,
	/// `SELECT ...`
	pub columns: String,
	/// `FROM ...`
	pub from: String,
	/// `... JOIN ...`
	pub joins: String,
	/// `WHERE ...`
	pub wheres: String,
	/// `GROUP BY ...`
	pub groups: String,
	/// `HAVING ...`
	pub havings: String,
	/// `ORDER BY ...`
	pub orders: String,
	/// `LIMIT n`
	pub limit: String,
	/// `OFFSET n`
	pub offset: String,
}

impl SelectComponents {
	/// Fragments in textual order
	pub fn parts(&self) -> [&str; 10] {
		[
			self.expressions.as_str(),
			self.columns.as_str(),
			self.from.as_str(),
			self.joins.as_str(),
			self.wheres.as_str(),
			self.groups.as_str(),
			self.havings.as_str(),
			self.orders.as_str(),
			self.limit.as_str(),
			self.offset.as_str(),
		]
	}
}

/// SQL compiler for one dialect.
///
/// Only [`dialect`](Grammar::dialect), [`table_prefix`](Grammar::table_prefix)
/// and [`wrap_value`](Grammar::wrap_value) are required. The provided methods
/// implement the standard compiler and are public so that callers can compose
/// clause fragments themselves.
pub trait Grammar: Send + Sync + fmt::Debug {
	/// Dialect this grammar targets
	fn dialect(&self) -> Dialect;

	/// Prefix prepended to table and CTE names
	fn table_prefix(&self) -> &str;

	/// Quote a single identifier segment
	fn wrap_value(&self, value: &str) -> String;

	/// Quote a possibly qualified or aliased identifier.
	///
	/// `"users.id"` quotes each segment and prefixes the table segment;
	/// `"id as key"` becomes `<id> AS <key>`; `*` is kept as is.
	fn wrap(&self, value: &str) -> String {
		if let Some((expr, alias)) = split_alias(value) {
			return format!("{} AS {}", self.wrap(expr), self.wrap_value(alias));
		}
		let segments: Vec<&str> = value.split('.').collect();
		let last = segments.len() - 1;
		segments
			.iter()
			.enumerate()
			.map(|(i, segment)| {
				if *segment == "*" {
					"*".to_string()
				} else if i == 0 && last > 0 {
					self.wrap_table(segment)
				} else {
					self.wrap_value(segment)
				}
			})
			.collect::<Vec<_>>()
			.join(".")
	}

	/// Quote a table name with the table prefix applied
	fn wrap_table(&self, table: &str) -> String {
		if let Some((table, alias)) = split_alias(table) {
			return format!(
				"{} AS {}",
				self.wrap_table(table),
				self.wrap_value(&format!("{}{}", self.table_prefix(), alias))
			);
		}
		format!("{}{}", self.table_prefix(), table)
			.split('.')
			.map(|segment| self.wrap_value(segment))
			.collect::<Vec<_>>()
			.join(".")
	}

	/// Quote and comma-join a column list
	fn columnize(&self, columns: &[String]) -> String {
		columns
			.iter()
			.map(|column| self.wrap(column))
			.collect::<Vec<_>>()
			.join(", ")
	}

	/// Compile every clause of `stmt` into its fragment
	fn compile_components(&self, stmt: &Statement) -> SelectComponents {
		SelectComponents {
			expressions: self.compile_expressions(stmt),
			columns: self.compile_columns(stmt),
			from: self.compile_from(stmt),
			joins: self.compile_joins(stmt),
			wheres: self.compile_wheres(stmt),
			groups: self.compile_groups(stmt),
			havings: self.compile_havings(stmt),
			orders: self.compile_orders(stmt),
			limit: self.compile_limit(stmt),
			offset: self.compile_offset(stmt),
		}
	}

	/// Join the non-empty fragments with single spaces
	fn concatenate(&self, components: &SelectComponents) -> String {
		components
			.parts()
			.into_iter()
			.filter(|part| !part.is_empty())
			.collect::<Vec<_>>()
			.join(" ")
	}

	/// Compile a full SELECT. Dialects restructuring the statement override
	/// this and fall back to [`compile_standard_select`](Grammar::compile_standard_select).
	fn compile_select(&self, stmt: &Statement) -> String {
		self.compile_standard_select(stmt)
	}

	/// Components, then union arms, then the recursion limit
	fn compile_standard_select(&self, stmt: &Statement) -> String {
		let components = self.compile_components(stmt);
		let mut sql = self.concatenate(&components);

		if !stmt.unions.is_empty() {
			sql = format!("{} {}", self.wrap_union(&sql), self.compile_unions(stmt));
		}

		let limit = self.compile_recursion_limit(stmt);
		if !limit.is_empty() {
			sql.push(' ');
			sql.push_str(&limit);
		}
		sql
	}

	/// `WITH [RECURSIVE] name [(cols)] AS (sql), ...`, or empty
	fn compile_expressions(&self, stmt: &Statement) -> String {
		if stmt.expressions.is_empty() {
			return String::new();
		}
		let mut writer = SqlWriter::new();
		writer.push("WITH ");
		writer.push(self.recursive_keyword(&stmt.expressions));
		writer.push_list(&stmt.expressions, ", ", |w, expression| {
			w.push_identifier(&expression.name, |name| self.wrap_table(name));
			if let Some(columns) = &expression.columns {
				w.push(" (");
				w.push(&self.columnize(columns));
				w.push(")");
			}
			w.push(" AS (");
			w.push(&expression.sql);
			w.push(")");
		});
		writer.into_string()
	}

	/// `RECURSIVE ` when any expression is recursive
	fn recursive_keyword(&self, expressions: &[CommonTableExpression]) -> &'static str {
		if expressions.iter().any(|e| e.recursive) {
			"RECURSIVE "
		} else {
			""
		}
	}

	/// Recursion limit clause; dialects without syntax return an empty string
	fn compile_recursion_limit(&self, stmt: &Statement) -> String {
		if let Some(limit) = stmt.recursion_limit {
			trace!(
				dialect = %self.dialect(),
				limit,
				"recursion limit has no syntax in this dialect, omitting"
			);
		}
		String::new()
	}

	/// `SELECT [DISTINCT] cols`
	fn compile_columns(&self, stmt: &Statement) -> String {
		let mut writer = SqlWriter::new();
		writer.push("SELECT ");
		if stmt.distinct {
			writer.push("DISTINCT ");
		}
		writer.push(&self.compile_column_list(stmt));
		writer.into_string()
	}

	/// Select list without the keyword, `*` when empty
	fn compile_column_list(&self, stmt: &Statement) -> String {
		if stmt.columns.is_empty() {
			return "*".to_string();
		}
		stmt.columns
			.iter()
			.map(|column| match column {
				Column::Named(name) => self.wrap(name),
				Column::Raw(sql) => sql.clone(),
			})
			.collect::<Vec<_>>()
			.join(", ")
	}

	/// `FROM table`
	fn compile_from(&self, stmt: &Statement) -> String {
		match &stmt.from {
			Some(FromClause::Table(table)) => format!("FROM {}", self.wrap_table(table)),
			Some(FromClause::Raw(sql)) => format!("FROM {}", sql),
			None => String::new(),
		}
	}

	/// `... JOIN table ON a = b`
	fn compile_joins(&self, stmt: &Statement) -> String {
		let mut writer = SqlWriter::new();
		for join in &stmt.joins {
			writer.push_keyword(join.kind.as_str());
			writer.push(" ");
			writer.push(&self.wrap_table(&join.table));
			if let Some((first, operator, second)) = &join.on {
				writer.push(" ON ");
				writer.push(&self.wrap(first));
				writer.push(" ");
				writer.push(operator.as_str());
				writer.push(" ");
				writer.push(&self.wrap(second));
			}
		}
		writer.into_string()
	}

	/// `WHERE ...`
	fn compile_wheres(&self, stmt: &Statement) -> String {
		if stmt.wheres.is_empty() {
			return String::new();
		}
		format!("WHERE {}", self.compile_where_list(&stmt.wheres))
	}

	/// Predicates joined by their connectives, without the keyword
	fn compile_where_list(&self, wheres: &[WhereClause]) -> String {
		let mut writer = SqlWriter::new();
		for (i, clause) in wheres.iter().enumerate() {
			if i > 0 {
				writer.push_keyword(clause.boolean().as_str());
				writer.push(" ");
			}
			match clause {
				WhereClause::Basic {
					column, operator, ..
				} => {
					writer.push(&self.wrap(column));
					writer.push(" ");
					writer.push(operator.as_str());
					writer.push(" ");
					writer.push_placeholder();
				}
				WhereClause::Column {
					first,
					operator,
					second,
					..
				} => {
					writer.push(&self.wrap(first));
					writer.push(" ");
					writer.push(operator.as_str());
					writer.push(" ");
					writer.push(&self.wrap(second));
				}
				WhereClause::In {
					column, count, not, ..
				} => {
					if *count == 0 {
						writer.push(if *not { "1 = 1" } else { "0 = 1" });
					} else {
						writer.push(&self.wrap(column));
						writer.push(if *not { " NOT IN (" } else { " IN (" });
						writer.push_placeholders(*count);
						writer.push(")");
					}
				}
				WhereClause::Null { column, not, .. } => {
					writer.push(&self.wrap(column));
					writer.push(if *not { " IS NOT NULL" } else { " IS NULL" });
				}
				WhereClause::Raw { sql, .. } => writer.push(sql),
				WhereClause::Nested { query, .. } => {
					writer.push("(");
					writer.push(&self.compile_where_list(&query.wheres));
					writer.push(")");
				}
			}
		}
		writer.into_string()
	}

	/// `GROUP BY ...`
	fn compile_groups(&self, stmt: &Statement) -> String {
		if stmt.groups.is_empty() {
			return String::new();
		}
		format!("GROUP BY {}", self.columnize(&stmt.groups))
	}

	/// `HAVING ...`
	fn compile_havings(&self, stmt: &Statement) -> String {
		if stmt.havings.is_empty() {
			return String::new();
		}
		let mut writer = SqlWriter::new();
		writer.push("HAVING ");
		for (i, having) in stmt.havings.iter().enumerate() {
			match having {
				HavingClause::Basic {
					boolean,
					column,
					operator,
				} => {
					if i > 0 {
						writer.push_keyword(boolean.as_str());
						writer.push(" ");
					}
					writer.push(&self.wrap(column));
					writer.push(" ");
					writer.push(operator.as_str());
					writer.push(" ");
					writer.push_placeholder();
				}
				HavingClause::Raw { boolean, sql } => {
					if i > 0 {
						writer.push_keyword(boolean.as_str());
						writer.push(" ");
					}
					writer.push(sql);
				}
			}
		}
		writer.into_string()
	}

	/// `ORDER BY ...`
	fn compile_orders(&self, stmt: &Statement) -> String {
		if stmt.orders.is_empty() {
			return String::new();
		}
		let mut writer = SqlWriter::new();
		writer.push("ORDER BY ");
		writer.push_list(&stmt.orders, ", ", |w, order| match order {
			OrderClause::Column { column, order } => {
				w.push(&self.wrap(column));
				w.push(" ");
				w.push(order.as_str());
			}
			OrderClause::Raw(sql) => w.push(sql),
		});
		writer.into_string()
	}

	/// `LIMIT n`
	fn compile_limit(&self, stmt: &Statement) -> String {
		stmt.limit
			.map(|limit| format!("LIMIT {}", limit))
			.unwrap_or_default()
	}

	/// `OFFSET n`
	fn compile_offset(&self, stmt: &Statement) -> String {
		stmt.offset
			.map(|offset| format!("OFFSET {}", offset))
			.unwrap_or_default()
	}

	/// `UNION [ALL] <arm> ...`
	fn compile_unions(&self, stmt: &Statement) -> String {
		let mut writer = SqlWriter::new();
		writer.push_list(&stmt.unions, " ", |w, union| {
			w.push(if union.all { "UNION ALL " } else { "UNION " });
			w.push(&self.wrap_union(&union.sql));
		});
		writer.into_string()
	}

	/// Wrap one union arm
	fn wrap_union(&self, sql: &str) -> String {
		format!("({})", sql)
	}

	/// `[WITH ...] INSERT INTO table (cols) sql`
	///
	/// The CTE clause opens the statement; MySQL overrides this to place it
	/// after the column list.
	fn compile_insert_using(
		&self,
		stmt: &Statement,
		columns: &[String],
		sql: &str,
	) -> Result<String> {
		let insert = self.compile_insert_target(stmt, columns)?;
		let compiled = [
			self.compile_expressions(stmt),
			insert,
			sql.to_string(),
			self.compile_recursion_limit(stmt),
		];
		Ok(join_non_empty(&compiled))
	}

	/// `INSERT INTO table [(cols)]`
	fn compile_insert_target(&self, stmt: &Statement, columns: &[String]) -> Result<String> {
		let table = stmt.table().ok_or_else(|| {
			QueryError::InvalidArgument("insert target table is not set".to_string())
		})?;
		let mut insert = format!("INSERT INTO {}", self.wrap_table(table));
		if !columns.is_empty() {
			insert.push_str(&format!(" ({})", self.columnize(columns)));
		}
		Ok(insert)
	}

	/// Flatten the binding buckets in placeholder order
	fn prepare_bindings(&self, stmt: &Statement) -> Values {
		stmt.bindings.flatten(&BindingBucket::ORDERED)
	}
}

/// Split `"expr as alias"` (case-insensitive `as`)
pub(crate) fn split_alias(value: &str) -> Option<(&str, &str)> {
	let lower = value.to_ascii_lowercase();
	let index = lower.find(" as ")?;
	let expr = value[..index].trim();
	let alias = value[index + 4..].trim();
	Some((expr, alias))
}

/// Join non-empty fragments with single spaces
pub(crate) fn join_non_empty(parts: &[String]) -> String {
	parts
		.iter()
		.filter(|part| !part.is_empty())
		.map(String::as_str)
		.collect::<Vec<_>>()
		.join(" ")
}

/// Shared grammar for one of the built-in dialects
pub fn for_dialect(dialect: Dialect) -> Arc<dyn Grammar> {
	for_dialect_with_prefix(dialect, "")
}

/// Shared grammar for a built-in dialect with a table prefix
pub fn for_dialect_with_prefix(dialect: Dialect, prefix: &str) -> Arc<dyn Grammar> {
	match dialect {
		Dialect::MySql => Arc::new(MySqlGrammar::with_table_prefix(prefix)),
		Dialect::Postgres => Arc::new(PostgresGrammar::with_table_prefix(prefix)),
		Dialect::Sqlite => Arc::new(SqliteGrammar::with_table_prefix(prefix)),
		Dialect::SqlServer => Arc::new(SqlServerGrammar::with_table_prefix(prefix)),
	}
}
