//! PostgreSQL driver

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::{Column, PgPool, Postgres, Row as SqlxRow, ValueRef};
use tracing::debug;

use reinhardt_cte_query::{Dialect, Value, Values};

use crate::backend::{DatabaseBackend, Row};
use crate::config::ConnectionConfig;
use crate::error::Result;

use super::clamp_unsigned;

type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// Rewrite `?` placeholders to `$1, $2, ...`.
///
/// Question marks inside string literals, quoted identifiers and comments are
/// left alone, as is the `??` escape which becomes a literal `?`.
///
/// ```rust
/// use reinhardt_cte_db::drivers::postgres::numbered_placeholders;
///
/// assert_eq!(
///     numbered_placeholders(r#"SELECT '?' FROM "t?" WHERE a = ? AND b = ?"#),
///     r#"SELECT '?' FROM "t?" WHERE a = $1 AND b = $2"#
/// );
/// ```
pub fn numbered_placeholders(sql: &str) -> String {
	let mut out = String::with_capacity(sql.len() + 8);
	let mut index = 0usize;
	let mut chars = sql.chars().peekable();

	while let Some(ch) = chars.next() {
		match ch {
			'\'' | '"' => {
				out.push(ch);
				for inner in chars.by_ref() {
					out.push(inner);
					if inner == ch {
						break;
					}
				}
			}
			'-' if chars.peek() == Some(&'-') => {
				out.push(ch);
				for inner in chars.by_ref() {
					out.push(inner);
					if inner == '\n' {
						break;
					}
				}
			}
			'?' if chars.peek() == Some(&'?') => {
				chars.next();
				out.push('?');
			}
			'?' => {
				index += 1;
				out.push('$');
				out.push_str(&index.to_string());
			}
			_ => out.push(ch),
		}
	}
	out
}

/// PostgreSQL database backend
#[derive(Debug, Clone)]
pub struct PostgresBackend {
	pool: PgPool,
}

impl PostgresBackend {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}

	/// Open a pool for `config.url`
	pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(config.max_connections)
			.connect(&config.url)
			.await?;
		Ok(Self::new(pool))
	}

	pub fn pool(&self) -> &PgPool {
		&self.pool
	}

	fn bind_value<'q>(query: PgQuery<'q>, value: Value) -> PgQuery<'q> {
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

	fn convert_row(pg_row: PgRow) -> Result<Row> {
		let mut row = Row::new();
		for column in pg_row.columns() {
			let index = column.ordinal();
			if pg_row.try_get_raw(index)?.is_null() {
				row.insert(column.name(), Value::String(None));
				continue;
			}

			let value = if let Ok(v) = pg_row.try_get::<bool, _>(index) {
				Value::Bool(Some(v))
			} else if let Ok(v) = pg_row.try_get::<i64, _>(index) {
				Value::BigInt(Some(v))
			} else if let Ok(v) = pg_row.try_get::<i32, _>(index) {
				Value::Int(Some(v))
			} else if let Ok(v) = pg_row.try_get::<i16, _>(index) {
				Value::SmallInt(Some(v))
			} else if let Ok(v) = pg_row.try_get::<f64, _>(index) {
				Value::Double(Some(v))
			} else if let Ok(v) = pg_row.try_get::<f32, _>(index) {
				Value::Float(Some(v))
			} else if let Ok(v) = pg_row.try_get::<String, _>(index) {
				Value::String(Some(Box::new(v)))
			} else if let Ok(v) = pg_row.try_get::<Vec<u8>, _>(index) {
				Value::Bytes(Some(Box::new(v)))
			} else if let Ok(v) = pg_row.try_get::<uuid::Uuid, _>(index) {
				Value::Uuid(Some(Box::new(v)))
			} else if let Ok(v) = pg_row.try_get::<chrono::NaiveDate, _>(index) {
				Value::ChronoDate(Some(Box::new(v)))
			} else if let Ok(v) = pg_row.try_get::<chrono::NaiveDateTime, _>(index) {
				Value::ChronoDateTime(Some(Box::new(v)))
			} else if let Ok(v) = pg_row.try_get::<chrono::DateTime<chrono::Utc>, _>(index) {
				Value::ChronoDateTimeUtc(Some(Box::new(v)))
			} else if let Ok(v) = pg_row.try_get::<serde_json::Value, _>(index) {
				Value::Json(Some(Box::new(v)))
			} else {
				// Unsupported column type
				Value::String(None)
			};
			row.insert(column.name(), value);
		}
		Ok(row)
	}
}

#[async_trait]
impl DatabaseBackend for PostgresBackend {
	fn dialect(&self) -> Dialect {
		Dialect::Postgres
	}

	async fn execute(&self, sql: &str, values: Values) -> Result<u64> {
		let sql = numbered_placeholders(sql);
		debug!(sql = %sql, bindings = values.len(), "executing statement");
		let mut query = sqlx::query(&sql);
		for value in values {
			query = Self::bind_value(query, value);
		}
		let result = query.execute(&self.pool).await?;
		Ok(result.rows_affected())
	}

	async fn fetch_all(&self, sql: &str, values: Values) -> Result<Vec<Row>> {
		let sql = numbered_placeholders(sql);
		debug!(sql = %sql, bindings = values.len(), "fetching rows");
		let mut query = sqlx::query(&sql);
		for value in values {
			query = Self::bind_value(query, value);
		}
		let rows = query.fetch_all(&self.pool).await?;
		rows.into_iter().map(Self::convert_row).collect()
	}
}
