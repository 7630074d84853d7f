//! # reinhardt-cte-db
//!
//! Executes statements built with `reinhardt-cte-query` through sqlx.
//!
//! ## Architecture
//!
//! - [`config`]: [`ConnectionConfig`], deserializable connection settings
//! - [`backend`]: the [`DatabaseBackend`] trait and result [`Row`]s
//! - [`drivers`]: sqlx backends for SQLite, PostgreSQL and MySQL
//! - [`connection`]: [`Connection`], a backend paired with its grammar
//! - [`factory`]: [`ConnectionFactory`], the driver selector
//! - [`orm`]: [`Model`] and [`ModelQuery`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reinhardt_cte_db::prelude::*;
//! use reinhardt_cte_query::Operator;
//!
//! # async fn example() -> Result<(), DatabaseError> {
//! let conn = ConnectionFactory::new()
//!     .make(ConnectionConfig::from_url("sqlite::memory:")?)
//!     .await?;
//!
//! let mut stmt = conn.query();
//! stmt.with_recursive_expression(
//!     "numbers",
//!     "select 1 union all select n + 1 from numbers where n < 10",
//!     ["n"],
//! )?
//! .from("numbers")
//! .and_where("n", Operator::GreaterThan, 5i32);
//!
//! let rows = conn.select(&stmt).await?;
//! assert_eq!(rows.len(), 5);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `sqlite` (default): SQLite driver
//! - `postgres` (default): PostgreSQL driver
//! - `mysql` (default): MySQL / MariaDB driver
//!
//! SQL Server has a grammar but no bundled driver. Register a
//! [`BackendResolver`] for [`Dialect::SqlServer`](reinhardt_cte_query::Dialect::SqlServer)
//! to connect to it.

pub mod backend;
pub mod config;
pub mod connection;
pub mod drivers;
pub mod error;
pub mod factory;
pub mod orm;

/// Prelude module for convenient imports.
pub mod prelude {
	pub use crate::backend::{DatabaseBackend, FromValue, Row};
	pub use crate::config::ConnectionConfig;
	pub use crate::connection::Connection;
	pub use crate::error::DatabaseError;
	pub use crate::factory::{BackendResolver, ConnectionFactory};
	pub use crate::orm::{Model, ModelQuery};
}

pub use prelude::*;
