//! Grammar registry keyed by driver name

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{QueryError, Result};
use crate::types::Dialect;

use super::{Grammar, for_dialect_with_prefix};

/// Constructor of a grammar from a table prefix
pub type GrammarFactory = Arc<dyn Fn(&str) -> Arc<dyn Grammar> + Send + Sync>;

/// Maps driver names to grammar constructors.
///
/// The default registry knows every built-in dialect under its driver names
/// and aliases. Custom grammars can be added or built-ins replaced with
/// [`register`](GrammarRegistry::register).
///
/// ```rust
/// use reinhardt_cte_query::{Dialect, GrammarRegistry};
///
/// let registry = GrammarRegistry::default();
/// let grammar = registry.resolve("postgres", "app_").unwrap();
/// assert_eq!(grammar.dialect(), Dialect::Postgres);
/// assert_eq!(grammar.table_prefix(), "app_");
/// assert!(registry.resolve("oracle", "").is_err());
/// ```
#[derive(Clone)]
pub struct GrammarRegistry {
	factories: HashMap<String, GrammarFactory>,
}

impl GrammarRegistry {
	/// Create an empty registry
	pub fn empty() -> Self {
		Self {
			factories: HashMap::new(),
		}
	}

	/// Register a constructor under a driver name, replacing any previous one
	pub fn register<F>(&mut self, driver: impl Into<String>, factory: F) -> &mut Self
	where
		F: Fn(&str) -> Arc<dyn Grammar> + Send + Sync + 'static,
	{
		self.factories
			.insert(driver.into().to_ascii_lowercase(), Arc::new(factory));
		self
	}

	/// Whether a constructor is registered for `driver`
	pub fn contains(&self, driver: &str) -> bool {
		self.factories.contains_key(&driver.to_ascii_lowercase())
	}

	/// Build the grammar registered for `driver`
	pub fn resolve(&self, driver: &str, prefix: &str) -> Result<Arc<dyn Grammar>> {
		self.factories
			.get(&driver.to_ascii_lowercase())
			.map(|factory| factory(prefix))
			.ok_or_else(|| QueryError::UnsupportedDialect(driver.to_string()))
	}
}

impl Default for GrammarRegistry {
	fn default() -> Self {
		let mut registry = Self::empty();
		let aliases: [(&str, Dialect); 8] = [
			("mysql", Dialect::MySql),
			("mariadb", Dialect::MySql),
			("pgsql", Dialect::Postgres),
			("postgres", Dialect::Postgres),
			("postgresql", Dialect::Postgres),
			("sqlite", Dialect::Sqlite),
			("sqlsrv", Dialect::SqlServer),
			("mssql", Dialect::SqlServer),
		];
		for (driver, dialect) in aliases {
			registry.register(driver, move |prefix| for_dialect_with_prefix(dialect, prefix));
		}
		registry
	}
}

impl fmt::Debug for GrammarRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut drivers: Vec<&String> = self.factories.keys().collect();
		drivers.sort();
		f.debug_struct("GrammarRegistry")
			.field("drivers", &drivers)
			.finish()
	}
}
