//! Connection configuration

use serde::{Deserialize, Serialize};

use reinhardt_cte_query::Dialect;

use crate::error::{DatabaseError, Result};

/// Settings of one named connection.
///
/// Deserializes from settings files; missing fields take their defaults.
///
/// ```rust
/// use reinhardt_cte_db::ConnectionConfig;
///
/// let config: ConnectionConfig = serde_json::from_str(
///     r#"{"driver": "sqlite", "url": "sqlite::memory:", "prefix": "app_"}"#,
/// ).unwrap();
/// assert_eq!(config.name, "default");
/// assert_eq!(config.max_connections, 5);
/// assert!(config.validate().is_ok());
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
	/// Connection name
	pub name: String,
	/// Driver name, e.g. `sqlite`, `pgsql`, `mysql`, `sqlsrv`, or any name
	/// registered with the factory's grammar registry
	pub driver: String,
	/// Database URL handed to the driver
	pub url: String,
	/// Prefix for table and CTE names
	pub prefix: String,
	/// Pool size
	pub max_connections: u32,
}

impl Default for ConnectionConfig {
	fn default() -> Self {
		Self {
			name: "default".to_string(),
			driver: String::new(),
			url: String::new(),
			prefix: String::new(),
			max_connections: 5,
		}
	}
}

impl ConnectionConfig {
	/// Create a configuration for `driver` at `url`
	pub fn new(driver: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			driver: driver.into(),
			url: url.into(),
			..Self::default()
		}
	}

	/// Infer the driver from the URL scheme.
	///
	/// Schemes of the built-in dialects map to their canonical driver name;
	/// any other scheme is kept, lowercased, as the driver.
	///
	/// ```rust
	/// use reinhardt_cte_db::ConnectionConfig;
	///
	/// let config = ConnectionConfig::from_url("postgres://localhost/app").unwrap();
	/// assert_eq!(config.driver, "pgsql");
	/// ```
	pub fn from_url(url: impl Into<String>) -> Result<Self> {
		let url = url.into();
		let scheme = url
			.split_once(':')
			.map(|(scheme, _)| scheme)
			.filter(|scheme| !scheme.is_empty())
			.ok_or_else(|| DatabaseError::Config(format!("URL has no scheme: {}", url)))?;
		let driver = match scheme.parse::<Dialect>() {
			Ok(dialect) => dialect.driver_name().to_string(),
			Err(_) => scheme.to_ascii_lowercase(),
		};
		Ok(Self::new(driver, url))
	}

	/// Set the connection name
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	/// Set the table prefix
	pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	/// Set the pool size
	pub fn max_connections(mut self, max_connections: u32) -> Self {
		self.max_connections = max_connections;
		self
	}

	/// Built-in dialect named by the driver
	///
	/// Drivers registered only with a factory's grammar registry are not
	/// known here; the factory takes their dialect from the grammar.
	pub fn dialect(&self) -> Result<Dialect> {
		Ok(self.driver.parse()?)
	}

	/// Check the configuration before connecting
	///
	/// Whether the driver is known is up to the factory's registry.
	pub fn validate(&self) -> Result<()> {
		if self.driver.trim().is_empty() {
			return Err(DatabaseError::Config("driver must not be empty".to_string()));
		}
		if self.max_connections == 0 {
			return Err(DatabaseError::Config(
				"max_connections must be greater than 0".to_string(),
			));
		}
		Ok(())
	}
}
