//! Backend abstraction and result rows.

use std::collections::HashMap;

use async_trait::async_trait;
use reinhardt_cte_query::{Dialect, Value, Values};

use crate::error::{DatabaseError, Result};

/// Executes compiled SQL against one database.
///
/// SQL arrives with `?` placeholders and values in placeholder order.
/// Backends translate placeholders if their driver needs another syntax.
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
	/// Dialect the backend speaks
	fn dialect(&self) -> Dialect;

	/// Run a statement, returning the number of affected rows
	async fn execute(&self, sql: &str, values: Values) -> Result<u64>;

	/// Run a query, returning every row
	async fn fetch_all(&self, sql: &str, values: Values) -> Result<Vec<Row>>;
}

/// Row from query result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
	data: HashMap<String, Value>,
}

impl Row {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, key: impl Into<String>, value: Value) {
		self.data.insert(key.into(), value);
	}

	/// Raw column value
	pub fn value(&self, key: &str) -> Option<&Value> {
		self.data.get(key)
	}

	/// Typed column value
	///
	/// ```rust
	/// use reinhardt_cte_db::Row;
	/// use reinhardt_cte_query::Value;
	///
	/// let mut row = Row::new();
	/// row.insert("id", Value::BigInt(Some(7)));
	/// row.insert("name", Value::String(None));
	///
	/// assert_eq!(row.get::<i64>("id").unwrap(), 7);
	/// assert_eq!(row.get::<Option<String>>("name").unwrap(), None);
	/// assert!(row.get::<i64>("missing").is_err());
	/// ```
	pub fn get<T: FromValue>(&self, key: &str) -> Result<T> {
		let value = self
			.data
			.get(key)
			.ok_or_else(|| DatabaseError::ColumnNotFound(key.to_string()))?;
		T::from_value(value)
	}

	/// Column names in arbitrary order
	pub fn columns(&self) -> impl Iterator<Item = &str> {
		self.data.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

/// Conversion from a column value
pub trait FromValue: Sized {
	fn from_value(value: &Value) -> Result<Self>;
}

fn type_error(value: &Value, target: &str) -> DatabaseError {
	DatabaseError::TypeError(format!("Cannot convert {:?} to {}", value, target))
}

impl FromValue for i64 {
	fn from_value(value: &Value) -> Result<Self> {
		match value {
			Value::SmallInt(Some(v)) => Ok(i64::from(*v)),
			Value::Int(Some(v)) => Ok(i64::from(*v)),
			Value::BigInt(Some(v)) => Ok(*v),
			Value::BigUnsigned(Some(v)) => i64::try_from(*v).map_err(|_| type_error(value, "i64")),
			_ => Err(type_error(value, "i64")),
		}
	}
}

impl FromValue for f64 {
	fn from_value(value: &Value) -> Result<Self> {
		match value {
			Value::Float(Some(v)) => Ok(f64::from(*v)),
			Value::Double(Some(v)) => Ok(*v),
			_ => i64::from_value(value)
				.map(|v| v as f64)
				.map_err(|_| type_error(value, "f64")),
		}
	}
}

impl FromValue for bool {
	fn from_value(value: &Value) -> Result<Self> {
		match value {
			Value::Bool(Some(v)) => Ok(*v),
			// SQLite and MySQL store booleans as integers
			_ => i64::from_value(value)
				.map(|v| v != 0)
				.map_err(|_| type_error(value, "bool")),
		}
	}
}

impl FromValue for String {
	fn from_value(value: &Value) -> Result<Self> {
		match value {
			Value::String(Some(v)) => Ok(v.as_ref().clone()),
			_ => Err(type_error(value, "String")),
		}
	}
}

impl FromValue for Vec<u8> {
	fn from_value(value: &Value) -> Result<Self> {
		match value {
			Value::Bytes(Some(v)) => Ok(v.as_ref().clone()),
			Value::String(Some(v)) => Ok(v.as_bytes().to_vec()),
			_ => Err(type_error(value, "Vec<u8>")),
		}
	}
}

impl FromValue for Value {
	fn from_value(value: &Value) -> Result<Self> {
		Ok(value.clone())
	}
}

impl<T: FromValue> FromValue for Option<T> {
	fn from_value(value: &Value) -> Result<Self> {
		if value.is_null() {
			return Ok(None);
		}
		T::from_value(value).map(Some)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	#[rstest]
	#[case(Value::Int(Some(3)), 3)]
	#[case(Value::BigUnsigned(Some(9)), 9)]
	#[case(Value::SmallInt(Some(-2)), -2)]
	fn test_integer_widening(#[case] value: Value, #[case] expected: i64) {
		assert_eq!(i64::from_value(&value).unwrap(), expected);
	}

	#[rstest]
	fn test_bool_from_integer() {
		assert!(bool::from_value(&Value::BigInt(Some(1))).unwrap());
		assert!(!bool::from_value(&Value::BigInt(Some(0))).unwrap());
	}

	#[rstest]
	fn test_null_into_non_optional_is_type_error() {
		// Arrange
		let mut row = Row::new();
		row.insert("n", Value::BigInt(None));

		// Act
		let result = row.get::<i64>("n");

		// Assert
		assert!(matches!(result, Err(DatabaseError::TypeError(_))));
		assert_eq!(row.get::<Option<i64>>("n").unwrap(), None);
	}

	#[rstest]
	fn test_missing_column() {
		let row = Row::new();
		assert!(matches!(
			row.get::<String>("x"),
			Err(DatabaseError::ColumnNotFound(_))
		));
	}
}
