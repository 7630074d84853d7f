//! Statement builder.
//!
//! [`Statement`] accumulates SELECT clauses the way a fluent query builder
//! does. Every method takes `&mut self` and returns `&mut Self` so calls can
//! be chained. Compilation lives in [`compiler`](super::compiler) and CTE
//! registration in [`expression`](super::expression).

use std::sync::Arc;

use crate::error::Result;
use crate::grammar::{self, Grammar, GrammarRegistry};
use crate::types::{Dialect, JoinType, Operator, Order};
use crate::value::{IntoValue, Values};

use super::bindings::{BindingBucket, Bindings};
use super::clause::{
	Boolean, Column, FromClause, HavingClause, Join, OrderClause, UnionClause, WhereClause,
};
use super::expression::CommonTableExpression;

/// A SELECT statement with CTE support, bound to one [`Grammar`].
///
/// # Examples
///
/// ```rust
/// use reinhardt_cte_query::{Dialect, Operator, Statement};
///
/// let mut stmt = Statement::for_dialect(Dialect::Postgres);
/// stmt.from("users")
///     .select(["id", "name"])
///     .and_where("active", Operator::Equal, true);
///
/// assert_eq!(
///     stmt.to_sql(),
///     r#"SELECT "id", "name" FROM "users" WHERE "active" = ?"#
/// );
/// assert_eq!(stmt.get_bindings().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Statement {
	pub(crate) grammar: Arc<dyn Grammar>,
	pub(crate) columns: Vec<Column>,
	pub(crate) distinct: bool,
	pub(crate) from: Option<FromClause>,
	pub(crate) joins: Vec<Join>,
	pub(crate) wheres: Vec<WhereClause>,
	pub(crate) groups: Vec<String>,
	pub(crate) havings: Vec<HavingClause>,
	pub(crate) orders: Vec<OrderClause>,
	pub(crate) limit: Option<u64>,
	pub(crate) offset: Option<u64>,
	pub(crate) unions: Vec<UnionClause>,
	pub(crate) expressions: Vec<CommonTableExpression>,
	pub(crate) recursion_limit: Option<i64>,
	pub(crate) bindings: Bindings,
}

impl Statement {
	/// Create an empty statement compiled by `grammar`
	pub fn new(grammar: Arc<dyn Grammar>) -> Self {
		Self {
			grammar,
			columns: Vec::new(),
			distinct: false,
			from: None,
			joins: Vec::new(),
			wheres: Vec::new(),
			groups: Vec::new(),
			havings: Vec::new(),
			orders: Vec::new(),
			limit: None,
			offset: None,
			unions: Vec::new(),
			expressions: Vec::new(),
			recursion_limit: None,
			bindings: Bindings::new(),
		}
	}

	/// Create an empty statement for one of the built-in dialects
	pub fn for_dialect(dialect: Dialect) -> Self {
		Self::new(grammar::for_dialect(dialect))
	}

	/// Create an empty statement from a driver name such as `pgsql`.
	///
	/// Returns [`QueryError::UnsupportedDialect`](crate::QueryError::UnsupportedDialect)
	/// when no grammar is registered under `driver`.
	pub fn for_driver(driver: &str) -> Result<Self> {
		let grammar = GrammarRegistry::default().resolve(driver, "")?;
		Ok(Self::new(grammar))
	}

	/// Create a fresh, empty statement sharing this statement's grammar
	pub fn new_query(&self) -> Self {
		Self::new(Arc::clone(&self.grammar))
	}

	/// Grammar compiling this statement
	pub fn grammar(&self) -> &Arc<dyn Grammar> {
		&self.grammar
	}

	/// Dialect of the grammar
	pub fn dialect(&self) -> Dialect {
		self.grammar.dialect()
	}

	/// Replace the select list, dropping the bindings of earlier raw columns
	pub fn select<I, S>(&mut self, columns: I) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.bindings.clear(BindingBucket::Select);
		self.columns = columns
			.into_iter()
			.map(|c| Column::Named(c.into()))
			.collect();
		self
	}

	/// Append one column to the select list
	pub fn add_select(&mut self, column: impl Into<String>) -> &mut Self {
		self.columns.push(Column::Named(column.into()));
		self
	}

	/// Append a raw select expression with its bindings
	pub fn select_raw(&mut self, sql: impl Into<String>, values: Values) -> &mut Self {
		self.columns.push(Column::Raw(sql.into()));
		self.bindings.add(values, BindingBucket::Select);
		self
	}

	/// Select distinct rows
	pub fn distinct(&mut self) -> &mut Self {
		self.distinct = true;
		self
	}

	/// Set the FROM table. Accepts `"table as alias"`.
	pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
		self.bindings.clear(BindingBucket::From);
		self.from = Some(FromClause::Table(table.into()));
		self
	}

	/// Set a raw FROM source with its bindings, replacing any earlier source
	pub fn from_raw(&mut self, sql: impl Into<String>, values: Values) -> &mut Self {
		self.from = Some(FromClause::Raw(sql.into()));
		self.bindings.clear(BindingBucket::From);
		self.bindings.add(values, BindingBucket::From);
		self
	}

	/// Table name of the FROM clause, if it is a plain table
	pub fn table(&self) -> Option<&str> {
		match &self.from {
			Some(FromClause::Table(table)) => Some(table),
			_ => None,
		}
	}

	fn push_join(
		&mut self,
		kind: JoinType,
		table: impl Into<String>,
		on: Option<(String, Operator, String)>,
	) -> &mut Self {
		self.joins.push(Join {
			kind,
			table: table.into(),
			on,
		});
		self
	}

	/// `INNER JOIN table ON first <op> second`
	pub fn join(
		&mut self,
		table: impl Into<String>,
		first: impl Into<String>,
		operator: Operator,
		second: impl Into<String>,
	) -> &mut Self {
		self.push_join(
			JoinType::Inner,
			table,
			Some((first.into(), operator, second.into())),
		)
	}

	/// `LEFT JOIN table ON first <op> second`
	pub fn left_join(
		&mut self,
		table: impl Into<String>,
		first: impl Into<String>,
		operator: Operator,
		second: impl Into<String>,
	) -> &mut Self {
		self.push_join(
			JoinType::Left,
			table,
			Some((first.into(), operator, second.into())),
		)
	}

	/// `RIGHT JOIN table ON first <op> second`
	pub fn right_join(
		&mut self,
		table: impl Into<String>,
		first: impl Into<String>,
		operator: Operator,
		second: impl Into<String>,
	) -> &mut Self {
		self.push_join(
			JoinType::Right,
			table,
			Some((first.into(), operator, second.into())),
		)
	}

	/// `CROSS JOIN table`
	pub fn cross_join(&mut self, table: impl Into<String>) -> &mut Self {
		self.push_join(JoinType::Cross, table, None)
	}

	fn push_where(
		&mut self,
		boolean: Boolean,
		column: impl Into<String>,
		operator: Operator,
		value: impl IntoValue,
	) -> &mut Self {
		self.wheres.push(WhereClause::Basic {
			boolean,
			column: column.into(),
			operator,
		});
		self.bindings
			.push(value.into_value(), BindingBucket::Where);
		self
	}

	/// `AND column <op> ?`
	pub fn and_where(
		&mut self,
		column: impl Into<String>,
		operator: Operator,
		value: impl IntoValue,
	) -> &mut Self {
		self.push_where(Boolean::And, column, operator, value)
	}

	/// `OR column <op> ?`
	pub fn or_where(
		&mut self,
		column: impl Into<String>,
		operator: Operator,
		value: impl IntoValue,
	) -> &mut Self {
		self.push_where(Boolean::Or, column, operator, value)
	}

	/// Compare two columns
	pub fn where_column(
		&mut self,
		first: impl Into<String>,
		operator: Operator,
		second: impl Into<String>,
	) -> &mut Self {
		self.wheres.push(WhereClause::Column {
			boolean: Boolean::And,
			first: first.into(),
			operator,
			second: second.into(),
		});
		self
	}

	fn push_where_in<I, V>(&mut self, column: impl Into<String>, values: I, not: bool) -> &mut Self
	where
		I: IntoIterator<Item = V>,
		V: IntoValue,
	{
		let values: Values = values.into_iter().collect();
		self.wheres.push(WhereClause::In {
			boolean: Boolean::And,
			column: column.into(),
			count: values.len(),
			not,
		});
		self.bindings.add(values, BindingBucket::Where);
		self
	}

	/// `column IN (?, ...)`. An empty list never matches.
	pub fn where_in<I, V>(&mut self, column: impl Into<String>, values: I) -> &mut Self
	where
		I: IntoIterator<Item = V>,
		V: IntoValue,
	{
		self.push_where_in(column, values, false)
	}

	/// `column NOT IN (?, ...)`. An empty list always matches.
	pub fn where_not_in<I, V>(&mut self, column: impl Into<String>, values: I) -> &mut Self
	where
		I: IntoIterator<Item = V>,
		V: IntoValue,
	{
		self.push_where_in(column, values, true)
	}

	/// `column IS NULL`
	pub fn where_null(&mut self, column: impl Into<String>) -> &mut Self {
		self.wheres.push(WhereClause::Null {
			boolean: Boolean::And,
			column: column.into(),
			not: false,
		});
		self
	}

	/// `column IS NOT NULL`
	pub fn where_not_null(&mut self, column: impl Into<String>) -> &mut Self {
		self.wheres.push(WhereClause::Null {
			boolean: Boolean::And,
			column: column.into(),
			not: true,
		});
		self
	}

	/// Raw WHERE fragment with its bindings
	pub fn where_raw(&mut self, sql: impl Into<String>, values: Values) -> &mut Self {
		self.wheres.push(WhereClause::Raw {
			boolean: Boolean::And,
			sql: sql.into(),
		});
		self.bindings.add(values, BindingBucket::Where);
		self
	}

	/// Parenthesized group of predicates.
	///
	/// The callback receives an empty statement; only its WHERE clauses are
	/// used. An empty group is ignored.
	///
	/// ```rust
	/// use reinhardt_cte_query::{Dialect, Operator, Statement};
	///
	/// let mut stmt = Statement::for_dialect(Dialect::MySql);
	/// stmt.from("users")
	///     .and_where("active", Operator::Equal, true)
	///     .where_nested(|q| {
	///         q.and_where("role", Operator::Equal, "admin")
	///             .or_where("role", Operator::Equal, "owner");
	///     });
	///
	/// assert_eq!(
	///     stmt.to_sql(),
	///     "SELECT * FROM `users` WHERE `active` = ? AND (`role` = ? OR `role` = ?)"
	/// );
	/// ```
	pub fn where_nested<F>(&mut self, callback: F) -> &mut Self
	where
		F: FnOnce(&mut Statement),
	{
		let mut nested = self.new_query();
		callback(&mut nested);
		if nested.wheres.is_empty() {
			return self;
		}
		let values = Values(nested.bindings.bucket(BindingBucket::Where).to_vec());
		self.bindings.add(values, BindingBucket::Where);
		self.wheres.push(WhereClause::Nested {
			boolean: Boolean::And,
			query: Box::new(nested),
		});
		self
	}

	/// Replace the GROUP BY list
	pub fn group_by<I, S>(&mut self, columns: I) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.groups = columns.into_iter().map(Into::into).collect();
		self
	}

	/// `HAVING column <op> ?`
	pub fn having(
		&mut self,
		column: impl Into<String>,
		operator: Operator,
		value: impl IntoValue,
	) -> &mut Self {
		self.havings.push(HavingClause::Basic {
			boolean: Boolean::And,
			column: column.into(),
			operator,
		});
		self.bindings
			.push(value.into_value(), BindingBucket::Having);
		self
	}

	/// Raw HAVING fragment with its bindings
	pub fn having_raw(&mut self, sql: impl Into<String>, values: Values) -> &mut Self {
		self.havings.push(HavingClause::Raw {
			boolean: Boolean::And,
			sql: sql.into(),
		});
		self.bindings.add(values, BindingBucket::Having);
		self
	}

	/// Append an ORDER BY column
	pub fn order_by(&mut self, column: impl Into<String>, order: Order) -> &mut Self {
		self.orders.push(OrderClause::Column {
			column: column.into(),
			order,
		});
		self
	}

	/// Append a raw ORDER BY expression with its bindings
	pub fn order_by_raw(&mut self, sql: impl Into<String>, values: Values) -> &mut Self {
		self.orders.push(OrderClause::Raw(sql.into()));
		self.bindings.add(values, BindingBucket::Order);
		self
	}

	/// Maximum number of rows
	pub fn limit(&mut self, limit: u64) -> &mut Self {
		self.limit = Some(limit);
		self
	}

	/// Number of rows to skip
	pub fn offset(&mut self, offset: u64) -> &mut Self {
		self.offset = Some(offset);
		self
	}

	/// Append values to a binding bucket.
	///
	/// Use this when a raw fragment was added through a clause field and its
	/// values must be placed in the matching bucket.
	pub fn add_binding(&mut self, values: Values, bucket: BindingBucket) -> &mut Self {
		self.bindings.add(values, bucket);
		self
	}

	/// Raw access to the binding buckets
	pub fn bindings(&self) -> &Bindings {
		&self.bindings
	}

	/// Registered CTEs in definition order
	pub fn expressions(&self) -> &[CommonTableExpression] {
		&self.expressions
	}

	/// Set-operation arms in call order
	pub fn unions(&self) -> &[UnionClause] {
		&self.unions
	}

	/// Recursion limit, if one was set
	pub fn get_recursion_limit(&self) -> Option<i64> {
		self.recursion_limit
	}

	/// Row limit, if one was set
	pub fn get_limit(&self) -> Option<u64> {
		self.limit
	}

	/// Row offset, if one was set
	pub fn get_offset(&self) -> Option<u64> {
		self.offset
	}
}
