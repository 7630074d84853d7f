//! Clause representations held by [`Statement`](super::Statement).
//!
//! Clauses keep identifiers and placeholder counts only. The bound values
//! themselves live in the statement's [`Bindings`](super::Bindings).

use crate::types::{JoinType, Operator, Order};

use super::Statement;

/// Logical connective joining a WHERE predicate to the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boolean {
	/// `AND`
	And,
	/// `OR`
	Or,
}

impl Boolean {
	/// SQL keyword
	pub fn as_str(&self) -> &'static str {
		match self {
			Boolean::And => "AND",
			Boolean::Or => "OR",
		}
	}
}

/// Select list entry
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
	/// Identifier, optionally `table.column` or `column as alias`
	Named(String),
	/// Raw SQL fragment
	Raw(String),
}

/// FROM source
#[derive(Debug, Clone, PartialEq)]
pub enum FromClause {
	/// Table name, optionally `table as alias`
	Table(String),
	/// Raw SQL fragment
	Raw(String),
}

/// JOIN clause
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
	pub(crate) kind: JoinType,
	pub(crate) table: String,
	pub(crate) on: Option<(String, Operator, String)>,
}

/// WHERE predicate
#[derive(Debug, Clone)]
pub enum WhereClause {
	/// `column <op> ?`
	Basic {
		boolean: Boolean,
		column: String,
		operator: Operator,
	},
	/// `first <op> second`
	Column {
		boolean: Boolean,
		first: String,
		operator: Operator,
		second: String,
	},
	/// `column [NOT] IN (?, ...)`
	In {
		boolean: Boolean,
		column: String,
		count: usize,
		not: bool,
	},
	/// `column IS [NOT] NULL`
	Null {
		boolean: Boolean,
		column: String,
		not: bool,
	},
	/// Raw SQL fragment
	Raw { boolean: Boolean, sql: String },
	/// Parenthesized group built on a nested statement
	Nested {
		boolean: Boolean,
		query: Box<Statement>,
	},
}

impl WhereClause {
	/// Connective of this predicate
	pub fn boolean(&self) -> Boolean {
		match self {
			WhereClause::Basic { boolean, .. }
			| WhereClause::Column { boolean, .. }
			| WhereClause::In { boolean, .. }
			| WhereClause::Null { boolean, .. }
			| WhereClause::Raw { boolean, .. }
			| WhereClause::Nested { boolean, .. } => *boolean,
		}
	}
}

/// HAVING predicate
#[derive(Debug, Clone, PartialEq)]
pub enum HavingClause {
	/// `column <op> ?`
	Basic {
		boolean: Boolean,
		column: String,
		operator: Operator,
	},
	/// Raw SQL fragment
	Raw { boolean: Boolean, sql: String },
}

/// ORDER BY entry
#[derive(Debug, Clone, PartialEq)]
pub enum OrderClause {
	/// Column with direction
	Column { column: String, order: Order },
	/// Raw SQL fragment
	Raw(String),
}

/// Set-operation arm, stored pre-compiled
#[derive(Debug, Clone, PartialEq)]
pub struct UnionClause {
	pub(crate) sql: String,
	pub(crate) all: bool,
}

impl UnionClause {
	/// Compiled SQL of the arm
	pub fn sql(&self) -> &str {
		&self.sql
	}

	/// Whether this is a `UNION ALL`
	pub fn is_all(&self) -> bool {
		self.all
	}
}
