//! Connection factory
//!
//! Turns a [`ConnectionConfig`] into a [`Connection`]: the driver name picks
//! the grammar through a [`GrammarRegistry`] and the backend through either a
//! registered [`BackendResolver`] or one of the built-in sqlx drivers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reinhardt_cte_query::{Dialect, GrammarRegistry};
use tracing::debug;

use crate::backend::DatabaseBackend;
use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::error::{DatabaseError, Result};

/// Opens backends for one driver name.
///
/// Register a resolver to serve a driver with no built-in backend (SQL
/// Server, or a custom driver name) or to replace a built-in one.
#[async_trait]
pub trait BackendResolver: Send + Sync {
	async fn resolve(&self, config: &ConnectionConfig) -> Result<Arc<dyn DatabaseBackend>>;
}

/// Builds connections from configuration
#[derive(Clone, Default)]
pub struct ConnectionFactory {
	grammars: GrammarRegistry,
	resolvers: HashMap<String, Arc<dyn BackendResolver>>,
}

impl ConnectionFactory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Use a custom grammar registry
	pub fn with_grammars(mut self, grammars: GrammarRegistry) -> Self {
		self.grammars = grammars;
		self
	}

	pub fn grammars_mut(&mut self) -> &mut GrammarRegistry {
		&mut self.grammars
	}

	/// Serve the driver named `driver` with `resolver`, replacing any
	/// previous registration. Names are matched case-insensitively; aliases
	/// such as `mssql` and `sqlsrv` are registered separately.
	pub fn register_resolver(
		&mut self,
		driver: impl Into<String>,
		resolver: impl BackendResolver + 'static,
	) -> &mut Self {
		self.resolvers
			.insert(driver.into().to_ascii_lowercase(), Arc::new(resolver));
		self
	}

	/// Build a connection for `config`
	///
	/// # Errors
	///
	/// - [`QueryError::UnsupportedDialect`](reinhardt_cte_query::QueryError::UnsupportedDialect)
	///   when the grammar registry knows no such driver
	/// - [`DatabaseError::Config`] when the configuration is invalid
	/// - [`DatabaseError::MissingDriver`] when no resolver is registered and no
	///   built-in driver is compiled in for the dialect
	pub async fn make(&self, config: ConnectionConfig) -> Result<Connection> {
		config.validate()?;
		let grammar = self.grammars.resolve(&config.driver, &config.prefix)?;
		let dialect = grammar.dialect();

		let backend = match self.resolvers.get(&config.driver.to_ascii_lowercase()) {
			Some(resolver) => resolver.resolve(&config).await?,
			None => Self::builtin_backend(dialect, &config).await?,
		};

		if backend.dialect() != grammar.dialect() {
			return Err(DatabaseError::Config(format!(
				"backend for '{}' speaks {} but the grammar is {}",
				config.name,
				backend.dialect(),
				grammar.dialect()
			)));
		}

		debug!(
			name = %config.name,
			driver = %config.driver,
			dialect = %dialect,
			prefix = %config.prefix,
			"created database connection"
		);
		Ok(Connection::new(config.name, backend, grammar))
	}

	#[cfg_attr(
		not(any(feature = "sqlite", feature = "postgres", feature = "mysql")),
		allow(unused_variables)
	)]
	async fn builtin_backend(
		dialect: Dialect,
		config: &ConnectionConfig,
	) -> Result<Arc<dyn DatabaseBackend>> {
		match dialect {
			#[cfg(feature = "sqlite")]
			Dialect::Sqlite => Ok(Arc::new(
				crate::drivers::SqliteBackend::connect(config).await?,
			)),
			#[cfg(feature = "postgres")]
			Dialect::Postgres => Ok(Arc::new(
				crate::drivers::PostgresBackend::connect(config).await?,
			)),
			#[cfg(feature = "mysql")]
			Dialect::MySql => Ok(Arc::new(crate::drivers::MySqlBackend::connect(config).await?)),
			_ => Err(DatabaseError::MissingDriver(dialect.to_string())),
		}
	}
}

impl fmt::Debug for ConnectionFactory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConnectionFactory")
			.field("grammars", &self.grammars)
			.field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
			.finish()
	}
}
