//! SQLite driver

use async_trait::async_trait;
use sqlx::sqlite::{SqliteArguments, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as SqlxRow, Sqlite, SqlitePool, TypeInfo, ValueRef};
use tracing::debug;

use reinhardt_cte_query::{Dialect, Value, Values};

use crate::backend::{DatabaseBackend, Row};
use crate::config::ConnectionConfig;
use crate::error::Result;

use super::clamp_unsigned;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// SQLite database backend
#[derive(Debug, Clone)]
pub struct SqliteBackend {
	pool: SqlitePool,
}

impl SqliteBackend {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Open a pool for `config.url`
	pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
		let pool = SqlitePoolOptions::new()
			.max_connections(config.max_connections)
			.connect(&config.url)
			.await?;
		Ok(Self::new(pool))
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	fn bind_value<'q>(query: SqliteQuery<'q>, value: Value) -> SqliteQuery<'q> {
		match value {
			Value::Bool(v) => query.bind(v),
			Value::SmallInt(v) => query.bind(v),
			Value::Int(v) => query.bind(v),
			Value::BigInt(v) => query.bind(v),
			Value::BigUnsigned(v) => query.bind(clamp_unsigned(v)),
			Value::Float(v) => query.bind(v),
			Value::Double(v) => query.bind(v),
			Value::String(v) => query.bind(v.map(|s| *s)),
			Value::Bytes(v) => query.bind(v.map(|b| *b)),
			Value::ChronoDate(v) => query.bind(v.map(|d| *d)),
			Value::ChronoDateTime(v) => query.bind(v.map(|d| *d)),
			Value::ChronoDateTimeUtc(v) => query.bind(v.map(|d| *d)),
			Value::Uuid(v) => query.bind(v.map(|u| *u)),
			Value::Json(v) => query.bind(v.map(|j| sqlx::types::Json(*j))),
		}
	}

	fn convert_row(sqlite_row: SqliteRow) -> Result<Row> {
		let mut row = Row::new();
		for column in sqlite_row.columns() {
			let index = column.ordinal();
			let raw = sqlite_row.try_get_raw(index)?;

			if raw.is_null() {
				row.insert(column.name(), Value::String(None));
				continue;
			}

			// SQLite stores booleans as integers; only the declared type tells them apart
			let declared = column.type_info().name().to_uppercase();
			let storage = raw.type_info().name().to_uppercase();

			let value = if declared.contains("BOOL") {
				Value::Bool(Some(sqlite_row.try_get::<i64, _>(index)? != 0))
			} else if storage.contains("INT") {
				Value::BigInt(Some(sqlite_row.try_get(index)?))
			} else if storage == "REAL" {
				Value::Double(Some(sqlite_row.try_get(index)?))
			} else if storage == "BLOB" {
				Value::Bytes(Some(Box::new(sqlite_row.try_get(index)?)))
			} else {
				Value::String(Some(Box::new(sqlite_row.try_get(index)?)))
			};
			row.insert(column.name(), value);
		}
		Ok(row)
	}
}

#[async_trait]
impl DatabaseBackend for SqliteBackend {
	fn dialect(&self) -> Dialect {
		Dialect::Sqlite
	}

	async fn execute(&self, sql: &str, values: Values) -> Result<u64> {
		debug!(sql, bindings = values.len(), "executing statement");
		let mut query = sqlx::query(sql);
		for value in values {
			query = Self::bind_value(query, value);
		}
		let result = query.execute(&self.pool).await?;
		Ok(result.rows_affected())
	}

	async fn fetch_all(&self, sql: &str, values: Values) -> Result<Vec<Row>> {
		debug!(sql, bindings = values.len(), "fetching rows");
		let mut query = sqlx::query(sql);
		for value in values {
			query = Self::bind_value(query, value);
		}
		let rows = query.fetch_all(&self.pool).await?;
		rows.into_iter().map(Self::convert_row).collect()
	}
}
