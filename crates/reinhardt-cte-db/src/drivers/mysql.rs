//! MySQL driver

use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, MySql, MySqlPool, Row as SqlxRow, ValueRef};
use tracing::debug;

use reinhardt_cte_query::{Dialect, Value, Values};

use crate::backend::{DatabaseBackend, Row};
use crate::config::ConnectionConfig;
use crate::error::Result;

type MySqlQuery<'q> = sqlx::query::Query<'q, MySql, MySqlArguments>;

/// MySQL / MariaDB database backend
#[derive(Debug, Clone)]
pub struct MySqlBackend {
	pool: MySqlPool,
}

impl MySqlBackend {
	pub fn new(pool: MySqlPool) -> Self {
		Self { pool }
	}

	/// Open a pool for `config.url`
	pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
		let pool = MySqlPoolOptions::new()
			.max_connections(config.max_connections)
			.connect(&config.url)
			.await?;
		Ok(Self::new(pool))
	}

	pub fn pool(&self) -> &MySqlPool {
		&self.pool
	}

	fn bind_value<'q>(query: MySqlQuery<'q>, value: Value) -> MySqlQuery<'q> {
		match value {
			Value::Bool(v) => query.bind(v),
			Value::SmallInt(v) => query.bind(v),
			Value::Int(v) => query.bind(v),
			Value::BigInt(v) => query.bind(v),
			Value::BigUnsigned(v) => query.bind(v),
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

	fn convert_row(mysql_row: MySqlRow) -> Result<Row> {
		let mut row = Row::new();
		for column in mysql_row.columns() {
			let index = column.ordinal();
			if mysql_row.try_get_raw(index)?.is_null() {
				row.insert(column.name(), Value::String(None));
				continue;
			}

			let value = if let Ok(v) = mysql_row.try_get::<bool, _>(index) {
				Value::Bool(Some(v))
			} else if let Ok(v) = mysql_row.try_get::<i64, _>(index) {
				Value::BigInt(Some(v))
			} else if let Ok(v) = mysql_row.try_get::<i32, _>(index) {
				Value::Int(Some(v))
			} else if let Ok(v) = mysql_row.try_get::<u64, _>(index) {
				Value::BigUnsigned(Some(v))
			} else if let Ok(v) = mysql_row.try_get::<f64, _>(index) {
				Value::Double(Some(v))
			} else if let Ok(v) = mysql_row.try_get::<String, _>(index) {
				Value::String(Some(Box::new(v)))
			} else if let Ok(v) = mysql_row.try_get::<Vec<u8>, _>(index) {
				Value::Bytes(Some(Box::new(v)))
			} else if let Ok(v) = mysql_row.try_get::<chrono::NaiveDate, _>(index) {
				Value::ChronoDate(Some(Box::new(v)))
			} else if let Ok(v) = mysql_row.try_get::<chrono::NaiveDateTime, _>(index) {
				// MySQL TIMESTAMP/DATETIME without timezone
				Value::ChronoDateTime(Some(Box::new(v)))
			} else if let Ok(v) = mysql_row.try_get::<serde_json::Value, _>(index) {
				Value::Json(Some(Box::new(v)))
			} else {
				Value::String(None)
			};
			row.insert(column.name(), value);
		}
		Ok(row)
	}
}

#[async_trait]
impl DatabaseBackend for MySqlBackend {
	fn dialect(&self) -> Dialect {
		Dialect::MySql
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
