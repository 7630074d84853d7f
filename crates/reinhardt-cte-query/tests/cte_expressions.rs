//! CTE rendering tests
//!
//! Tests for WITH clause generation across all dialects:
//! - Single CTE from a callback body
//! - Multiple CTEs keep definition order
//! - RECURSIVE keyword covers the whole clause
//! - Column lists
//! - Table prefix applied to CTE names
//! - CTE bindings precede statement bindings

use pretty_assertions::assert_eq;
use rstest::rstest;

use reinhardt_cte_query::grammar;
use reinhardt_cte_query::prelude::*;

fn users_cte(dialect: Dialect) -> Statement {
	let mut stmt = Statement::for_dialect(dialect);
	stmt.with_expression(
		"t",
		Subquery::callback(|q| {
			q.from("x");
		}),
	)
	.unwrap()
	.from("t")
	.select(["*"]);
	stmt
}

/// A callback CTE over a plain table renders the same shape on every dialect
#[rstest]
#[case::mysql(Dialect::MySql, "WITH `t` AS (SELECT * FROM `x`) SELECT * FROM `t`")]
#[case::postgres(Dialect::Postgres, r#"WITH "t" AS (SELECT * FROM "x") SELECT * FROM "t""#)]
#[case::sqlite(Dialect::Sqlite, r#"WITH "t" AS (SELECT * FROM "x") SELECT * FROM "t""#)]
#[case::sqlserver(Dialect::SqlServer, "WITH [t] AS (SELECT * FROM [x]) SELECT * FROM [t]")]
fn test_single_cte(#[case] dialect: Dialect, #[case] expected: &str) {
	// Arrange
	let stmt = users_cte(dialect);

	// Act
	let sql = stmt.to_sql();

	// Assert
	assert_eq!(sql, expected);
	assert!(stmt.get_bindings().is_empty());
}

/// CTEs are emitted in registration order, comma separated
#[rstest]
fn test_multiple_ctes_keep_order() {
	// Arrange
	let mut stmt = Statement::for_dialect(Dialect::Postgres);
	stmt.with_expression("b", "select 2")
		.unwrap()
		.with_expression_columns("a", "select 1, 2", ["x", "y"])
		.unwrap()
		.from("a")
		.cross_join("b");

	// Act
	let sql = stmt.to_sql();

	// Assert
	assert_eq!(
		sql,
		r#"WITH "b" AS (select 2), "a" ("x", "y") AS (select 1, 2) SELECT * FROM "a" CROSS JOIN "b""#
	);
}

/// One recursive CTE makes the whole clause RECURSIVE
#[rstest]
#[case::mysql(Dialect::MySql, "WITH RECURSIVE ")]
#[case::postgres(Dialect::Postgres, "WITH RECURSIVE ")]
#[case::sqlite(Dialect::Sqlite, "WITH RECURSIVE ")]
#[case::sqlserver(Dialect::SqlServer, "WITH [")]
fn test_recursive_keyword(#[case] dialect: Dialect, #[case] prefix: &str) {
	// Arrange
	let mut stmt = Statement::for_dialect(dialect);
	stmt.with_expression("plain", "select 1")
		.unwrap()
		.with_recursive_expression(
			"tree",
			"select id, parent_id from categories union all select c.id, c.parent_id from categories c join tree on tree.id = c.parent_id",
			["id", "parent_id"],
		)
		.unwrap()
		.from("tree");

	// Act
	let sql = stmt.to_sql();

	// Assert
	assert!(sql.starts_with(prefix), "{}", sql);
	assert_eq!(sql.matches("WITH").count(), 1);
	assert_eq!(sql.matches("RECURSIVE").count(), usize::from(prefix.contains("RECURSIVE")));
}

/// Non-recursive CTEs never get the keyword
#[rstest]
fn test_non_recursive_has_no_keyword() {
	let mut stmt = Statement::for_dialect(Dialect::Sqlite);
	stmt.with_expression("t", "select 1").unwrap().from("t");
	assert_eq!(stmt.to_sql(), r#"WITH "t" AS (select 1) SELECT * FROM "t""#);
}

/// The table prefix applies to CTE names like table names
#[rstest]
fn test_table_prefix_applies_to_cte_names() {
	// Arrange
	let mut stmt = Statement::new(grammar::for_dialect_with_prefix(Dialect::MySql, "app_"));
	stmt.with_expression(
		"recent",
		Subquery::callback(|q| {
			q.from("posts");
		}),
	)
	.unwrap()
	.from("recent");

	// Act
	let sql = stmt.to_sql();

	// Assert
	assert_eq!(
		sql,
		"WITH `app_recent` AS (SELECT * FROM `app_posts`) SELECT * FROM `app_recent`"
	);
}

/// Bindings of all CTE bodies come before the statement's own bindings
#[rstest]
fn test_cte_bindings_come_first() {
	// Arrange
	let mut stmt = Statement::for_dialect(Dialect::Postgres);
	stmt.from("recent")
		.and_where("author_id", Operator::Equal, 7i64)
		.with_expression(
			"recent",
			Subquery::callback(|q| {
				q.from("posts")
					.and_where("year", Operator::GreaterThan, 2020i32)
					.where_in("status", ["draft", "published"]);
			}),
		)
		.unwrap()
		.with_expression(
			"authors",
			Subquery::callback(|q| {
				q.from("users").and_where("active", Operator::Equal, true);
			}),
		)
		.unwrap();

	// Act
	let sql = stmt.to_sql();
	let bindings = stmt.get_bindings();

	// Assert
	assert_eq!(
		sql,
		r#"WITH "recent" AS (SELECT * FROM "posts" WHERE "year" > ? AND "status" IN (?, ?)), "authors" AS (SELECT * FROM "users" WHERE "active" = ?) SELECT * FROM "recent" WHERE "author_id" = ?"#
	);
	assert_eq!(
		bindings.into_inner(),
		vec![
			Value::from(2020i32),
			Value::from("draft"),
			Value::from("published"),
			Value::from(true),
			Value::from(7i64),
		]
	);
}

/// Nested builders keep their own CTEs inside the body
#[rstest]
fn test_nested_builder_with_its_own_cte() {
	// Arrange
	let mut inner = Statement::for_dialect(Dialect::Sqlite);
	inner
		.with_expression("base", "select 1 as n")
		.unwrap()
		.from("base");
	let mut stmt = Statement::for_dialect(Dialect::Sqlite);

	// Act
	stmt.with_expression("outer_t", inner).unwrap().from("outer_t");

	// Assert
	assert_eq!(
		stmt.to_sql(),
		r#"WITH "outer_t" AS (WITH "base" AS (select 1 as n) SELECT * FROM "base") SELECT * FROM "outer_t""#
	);
}

/// A recursion limit on a dialect without syntax is dropped without error
#[rstest]
#[case(Dialect::MySql)]
#[case(Dialect::Postgres)]
#[case(Dialect::Sqlite)]
fn test_recursion_limit_dropped_without_syntax(#[case] dialect: Dialect) {
	// Arrange
	let mut stmt = users_cte(dialect);
	let before = stmt.to_sql();

	// Act
	stmt.recursion_limit(50);

	// Assert
	assert_eq!(stmt.to_sql(), before);
	assert!(!stmt.to_sql().contains("50"));
}

/// Invalid bodies are rejected and leave the statement untouched
#[rstest]
fn test_invalid_body_leaves_statement_untouched() {
	// Arrange
	let mut stmt = Statement::for_dialect(Dialect::Postgres);
	stmt.from("t");
	let mysql = Statement::for_dialect(Dialect::MySql);

	// Act
	let blank = stmt.with_expression("a", "  ").map(|_| ());
	let foreign = stmt.with_expression("b", mysql).map(|_| ());

	// Assert
	assert!(matches!(blank, Err(QueryError::InvalidArgument(_))));
	assert!(matches!(foreign, Err(QueryError::InvalidArgument(_))));
	assert!(stmt.expressions().is_empty());
	assert_eq!(stmt.to_sql(), r#"SELECT * FROM "t""#);
}
