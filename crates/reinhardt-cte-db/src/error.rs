//! Error types for connections and statement execution.

use reinhardt_cte_query::QueryError;

/// Errors raised by connections, drivers and the connection factory
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
	/// Statement building or compilation failed
	#[error("Query error: {0}")]
	Query(#[from] QueryError),

	/// The driver reported an error
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	/// The connection configuration is invalid
	#[error("Configuration error: {0}")]
	Config(String),

	/// The dialect is known but no backend can serve it
	#[error("No driver available for dialect: {0}")]
	MissingDriver(String),

	/// A row has no column with the requested name
	#[error("Column not found: {0}")]
	ColumnNotFound(String),

	/// A column value cannot be converted to the requested type
	#[error("Type error: {0}")]
	TypeError(String),
}

/// Result type for database operations
pub type Result<T> = std::result::Result<T, DatabaseError>;
