//! # reinhardt-cte-query
//!
//! A SQL statement builder with Common Table Expression support for the
//! Reinhardt framework.
//!
//! This crate builds SELECT statements, attaches `WITH` / `WITH RECURSIVE`
//! clauses to them and compiles them for MySQL, PostgreSQL, SQLite and SQL
//! Server. Compilation yields SQL text with `?` placeholders and the bound
//! values in placeholder order.
//!
//! ## Features
//!
//! - **CTE registry** - Non-recursive and recursive CTEs with optional column lists
//! - **Flexible bodies** - A CTE body can be a callback, a built statement or raw SQL
//! - **Union repair** - Statements with CTEs and `UNION` arms get exactly one leading `WITH`
//! - **Recursion limit** - `OPTION (MAXRECURSION n)` on SQL Server, silently dropped elsewhere
//! - **INSERT ... SELECT** - CTEs placed where each dialect accepts them
//! - **Ordered bindings** - CTE bindings first, then each clause in textual order
//!
//! ## Architecture
//!
//! - [`value`]: Typed parameter values
//! - [`types`]: Dialects, operators, sort directions, join kinds
//! - [`query`]: The [`Statement`] builder, CTE registry and subquery normalizer
//! - [`grammar`]: The [`Grammar`] trait, one implementation per dialect, and the
//!   [`GrammarRegistry`] keyed by driver name
//!
//! ## Quick Start
//!
//! ```rust
//! use reinhardt_cte_query::prelude::*;
//!
//! let mut stmt = Statement::for_dialect(Dialect::Postgres);
//! stmt.with_expression(
//!     "recent",
//!     Subquery::callback(|q| {
//!         q.from("posts").and_where("year", Operator::GreaterThanOrEqual, 2024i32);
//!     }),
//! )
//! .unwrap()
//! .from("recent")
//! .select(["id", "title"])
//! .order_by("id", Order::Desc)
//! .limit(10);
//!
//! assert_eq!(
//!     stmt.to_sql(),
//!     r#"WITH "recent" AS (SELECT * FROM "posts" WHERE "year" >= ?) SELECT "id", "title" FROM "recent" ORDER BY "id" DESC LIMIT 10"#
//! );
//! assert_eq!(stmt.get_bindings().len(), 1);
//! ```
//!
//! ## Unions
//!
//! ```rust
//! use reinhardt_cte_query::prelude::*;
//!
//! let mut stmt = Statement::for_dialect(Dialect::MySql);
//! stmt.with_expression("t", "select 1 as id").unwrap()
//!     .from("t")
//!     .union_all(Subquery::callback(|q| {
//!         q.from("t");
//!     }))
//!     .unwrap();
//!
//! assert_eq!(
//!     stmt.to_sql(),
//!     "WITH `t` AS (select 1 as id) (SELECT * FROM `t`) UNION ALL (SELECT * FROM `t`)"
//! );
//! ```
//!
//! ## Dialect Differences
//!
//! | Feature | PostgreSQL | MySQL | SQLite | SQL Server |
//! |---------|-----------|-------|--------|------------|
//! | Identifier quoting | `"name"` | `` `name` `` | `"name"` | `[name]` |
//! | `RECURSIVE` keyword | ✅ | ✅ | ✅ | ❌ (implicit) |
//! | Recursion limit | ❌ | ❌ | ❌ | `OPTION (MAXRECURSION n)` |
//! | `WITH` in `INSERT ... SELECT` | before `INSERT` | before `SELECT` | before `INSERT` | before `INSERT` |
//! | Pagination | `LIMIT/OFFSET` | `LIMIT/OFFSET` | `LIMIT/OFFSET` | `TOP` / `ROW_NUMBER()` |
//!
//! ## Feature Flags
//!
//! - `with-chrono`: Enable chrono date/time types in `Value`
//! - `with-uuid`: Enable UUID type in `Value`
//! - `with-json`: Enable JSON type in `Value`
//! - `full`: Enable all optional features

pub mod error;
pub mod grammar;
pub mod query;
pub mod types;
pub mod value;

/// Prelude module for convenient imports.
///
/// ```rust
/// use reinhardt_cte_query::prelude::*;
/// ```
pub mod prelude {
	// Errors
	pub use crate::error::QueryError;
	// Grammars
	pub use crate::grammar::{
		Grammar, GrammarRegistry, MySqlGrammar, PostgresGrammar, SelectComponents,
		SqlServerGrammar, SqliteGrammar,
	};
	// Statement builder
	pub use crate::query::{
		BindingBucket, Bindings, CommonTableExpression, QueryStatement, Statement, Subquery,
	};
	// Type system
	pub use crate::types::{Dialect, JoinType, Operator, Order};
	// Value system
	pub use crate::value::{IntoValue, Value, Values};
}

// Re-export commonly used types at crate root
pub use prelude::*;
