//! sqlx-backed drivers
//!
//! Each driver owns a sqlx pool, binds [`Values`](reinhardt_cte_query::Values)
//! in placeholder order and converts result rows into [`Row`](crate::Row)s.

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "mysql")]
pub use mysql::MySqlBackend;
#[cfg(feature = "postgres")]
pub use postgres::PostgresBackend;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;

/// Narrow a `u64` binding for drivers without unsigned 64-bit support
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub(crate) fn clamp_unsigned(value: Option<u64>) -> Option<i64> {
	value.map(|v| {
		i64::try_from(v).unwrap_or_else(|_| {
			tracing::warn!(
				value = v,
				"BigUnsigned value {} exceeds i64::MAX, clamping to i64::MAX",
				v
			);
			i64::MAX
		})
	})
}
