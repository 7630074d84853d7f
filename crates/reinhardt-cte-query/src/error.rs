//! Error types for statement building and compilation.

/// Errors raised while building or compiling a statement.
///
/// Compilation itself is infallible once a statement is built. Errors surface
/// when a subquery is normalized (CTE bodies, union arms, insert sources) or
/// when a statement is requested for a driver with no grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
	/// A subquery or statement argument cannot be used where it was passed
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// No grammar is registered for the requested driver name
	#[error("Unsupported dialect: {0}")]
	UnsupportedDialect(String),
}

/// Result type for query building operations
pub type Result<T> = std::result::Result<T, QueryError>;
