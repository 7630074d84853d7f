//! Shared enums used by statements and grammars.
//!
//! - [`Dialect`]: the database engine a grammar targets
//! - [`Operator`]: comparison operators for WHERE / HAVING / JOIN clauses
//! - [`Order`]: sort direction
//! - [`JoinType`]: join kind

use std::{fmt, str::FromStr};

use crate::error::QueryError;

/// Database dialect targeted by a grammar.
///
/// Driver names follow the usual connection configuration keys:
///
/// | Dialect | Driver names |
/// |---------|--------------|
/// | MySQL | `mysql`, `mariadb` |
/// | PostgreSQL | `pgsql`, `postgres`, `postgresql` |
/// | SQLite | `sqlite` |
/// | SQL Server | `sqlsrv`, `mssql` |
///
/// ```rust
/// use reinhardt_cte_query::Dialect;
///
/// let dialect: Dialect = "pgsql".parse().unwrap();
/// assert_eq!(dialect, Dialect::Postgres);
/// assert!("oracle".parse::<Dialect>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
	/// MySQL / MariaDB
	MySql,
	/// PostgreSQL
	Postgres,
	/// SQLite
	Sqlite,
	/// Microsoft SQL Server
	SqlServer,
}

impl Dialect {
	/// All supported dialects
	pub const ALL: [Dialect; 4] = [
		Dialect::MySql,
		Dialect::Postgres,
		Dialect::Sqlite,
		Dialect::SqlServer,
	];

	/// Canonical driver name
	pub fn driver_name(&self) -> &'static str {
		match self {
			Dialect::MySql => "mysql",
			Dialect::Postgres => "pgsql",
			Dialect::Sqlite => "sqlite",
			Dialect::SqlServer => "sqlsrv",
		}
	}

	/// Whether the dialect has per-statement recursion limit syntax
	pub fn supports_recursion_limit(&self) -> bool {
		matches!(self, Dialect::SqlServer)
	}
}

impl FromStr for Dialect {
	type Err = QueryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"mysql" | "mariadb" => Ok(Dialect::MySql),
			"pgsql" | "postgres" | "postgresql" => Ok(Dialect::Postgres),
			"sqlite" => Ok(Dialect::Sqlite),
			"sqlsrv" | "mssql" => Ok(Dialect::SqlServer),
			_ => Err(QueryError::UnsupportedDialect(s.to_string())),
		}
	}
}

impl fmt::Display for Dialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.driver_name())
	}
}

/// Comparison operator.
///
/// Operators are typed so that caller input never lands in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
	/// `=`
	Equal,
	/// `<>`
	NotEqual,
	/// `<`
	SmallerThan,
	/// `<=`
	SmallerThanOrEqual,
	/// `>`
	GreaterThan,
	/// `>=`
	GreaterThanOrEqual,
	/// `LIKE`
	Like,
	/// `NOT LIKE`
	NotLike,
}

impl Operator {
	/// SQL text of the operator
	pub fn as_str(&self) -> &'static str {
		match self {
			Operator::Equal => "=",
			Operator::NotEqual => "<>",
			Operator::SmallerThan => "<",
			Operator::SmallerThanOrEqual => "<=",
			Operator::GreaterThan => ">",
			Operator::GreaterThanOrEqual => ">=",
			Operator::Like => "LIKE",
			Operator::NotLike => "NOT LIKE",
		}
	}
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
	/// Ascending
	#[default]
	Asc,
	/// Descending
	Desc,
}

impl Order {
	/// SQL keyword
	pub fn as_str(&self) -> &'static str {
		match self {
			Order::Asc => "ASC",
			Order::Desc => "DESC",
		}
	}
}

/// Join kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
	/// `INNER JOIN`
	Inner,
	/// `LEFT JOIN`
	Left,
	/// `RIGHT JOIN`
	Right,
	/// `CROSS JOIN`
	Cross,
}

impl JoinType {
	/// SQL keyword
	pub fn as_str(&self) -> &'static str {
		match self {
			JoinType::Inner => "INNER JOIN",
			JoinType::Left => "LEFT JOIN",
			JoinType::Right => "RIGHT JOIN",
			JoinType::Cross => "CROSS JOIN",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("mysql", Dialect::MySql)]
	#[case("MariaDB", Dialect::MySql)]
	#[case("pgsql", Dialect::Postgres)]
	#[case("postgresql", Dialect::Postgres)]
	#[case("sqlite", Dialect::Sqlite)]
	#[case("sqlsrv", Dialect::SqlServer)]
	#[case("mssql", Dialect::SqlServer)]
	fn test_dialect_from_driver_name(#[case] name: &str, #[case] expected: Dialect) {
		assert_eq!(name.parse::<Dialect>().unwrap(), expected);
	}

	#[rstest]
	fn test_unknown_driver_is_unsupported() {
		let err = "oracle".parse::<Dialect>().unwrap_err();
		assert_eq!(err, QueryError::UnsupportedDialect("oracle".to_string()));
	}

	#[rstest]
	fn test_driver_name_round_trip() {
		for dialect in Dialect::ALL {
			assert_eq!(dialect.driver_name().parse::<Dialect>().unwrap(), dialect);
		}
	}

	#[rstest]
	fn test_only_sql_server_supports_recursion_limit() {
		let supported: Vec<Dialect> = Dialect::ALL
			.into_iter()
			.filter(Dialect::supports_recursion_limit)
			.collect();
		assert_eq!(supported, vec![Dialect::SqlServer]);
	}
}
