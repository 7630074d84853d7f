//! INSERT ... SELECT with CTEs
//!
//! MySQL accepts the WITH clause only in front of the SELECT; the other
//! dialects take it in front of the INSERT.

use pretty_assertions::assert_eq;
use rstest::rstest;

use reinhardt_cte_query::prelude::*;

fn archive_statement(dialect: Dialect) -> Statement {
	let mut stmt = Statement::for_dialect(dialect);
	stmt.from("archive")
		.with_expression(
			"old",
			Subquery::callback(|q| {
				q.from("posts")
					.select(["id", "title"])
					.and_where("year", Operator::SmallerThan, 2000i32);
			}),
		)
		.unwrap();
	stmt
}

#[rstest]
#[case::mysql(
	Dialect::MySql,
	"INSERT INTO `archive` (`id`, `title`) WITH `old` AS (SELECT `id`, `title` FROM `posts` WHERE `year` < ?) SELECT `id`, `title` FROM `old` WHERE `id` > ?"
)]
#[case::postgres(
	Dialect::Postgres,
	r#"WITH "old" AS (SELECT "id", "title" FROM "posts" WHERE "year" < ?) INSERT INTO "archive" ("id", "title") SELECT "id", "title" FROM "old" WHERE "id" > ?"#
)]
#[case::sqlite(
	Dialect::Sqlite,
	r#"WITH "old" AS (SELECT "id", "title" FROM "posts" WHERE "year" < ?) INSERT INTO "archive" ("id", "title") SELECT "id", "title" FROM "old" WHERE "id" > ?"#
)]
#[case::sqlserver(
	Dialect::SqlServer,
	"WITH [old] AS (SELECT [id], [title] FROM [posts] WHERE [year] < ?) INSERT INTO [archive] ([id], [title]) SELECT [id], [title] FROM [old] WHERE [id] > ?"
)]
fn test_insert_using_clause_order(#[case] dialect: Dialect, #[case] expected: &str) {
	// Arrange
	let stmt = archive_statement(dialect);

	// Act
	let (sql, bindings) = stmt
		.insert_using(
			["id", "title"],
			Subquery::callback(|q| {
				q.from("old")
					.select(["id", "title"])
					.and_where("id", Operator::GreaterThan, 5i32);
			}),
		)
		.unwrap();

	// Assert
	assert_eq!(sql, expected);
	assert_eq!(
		bindings.into_inner(),
		vec![Value::from(2000i32), Value::from(5i32)]
	);
}

/// SQL Server appends the recursion limit to the insert
#[rstest]
fn test_sqlserver_insert_using_recursion_limit() {
	// Arrange
	let mut stmt = Statement::for_dialect(Dialect::SqlServer);
	stmt.from("numbers_copy")
		.with_recursive_expression(
			"numbers",
			"select 1 as n union all select n + 1 from numbers where n < 200",
			["n"],
		)
		.unwrap()
		.recursion_limit(300);

	// Act
	let (sql, _) = stmt
		.insert_using(["n"], "select n from numbers")
		.unwrap();

	// Assert
	assert_eq!(
		sql,
		"WITH [numbers] ([n]) AS (select 1 as n union all select n + 1 from numbers where n < 200) INSERT INTO [numbers_copy] ([n]) select n from numbers OPTION (MAXRECURSION 300)"
	);
}

/// Without CTEs the insert is a plain INSERT ... SELECT
#[rstest]
fn test_insert_using_without_cte() {
	// Arrange
	let mut stmt = Statement::for_dialect(Dialect::Postgres);
	stmt.from("archive");

	// Act
	let (sql, bindings) = stmt.insert_using(["id"], "select id from posts").unwrap();

	// Assert
	assert_eq!(sql, r#"INSERT INTO "archive" ("id") select id from posts"#);
	assert!(bindings.is_empty());
}

/// A raw FROM source is not an insert target
#[rstest]
fn test_insert_using_rejects_raw_target() {
	// Arrange
	let mut stmt = Statement::for_dialect(Dialect::MySql);
	stmt.from_raw("(select 1) as t", Values::new());

	// Act
	let result = stmt.insert_using(["id"], "select 1");

	// Assert
	assert!(matches!(result, Err(QueryError::InvalidArgument(_))));
}
