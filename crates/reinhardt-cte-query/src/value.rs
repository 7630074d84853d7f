//! SQL parameter values.
//!
//! - [`Value`]: a single typed parameter (nullable)
//! - [`Values`]: an ordered list of parameters, matching placeholder order
//! - [`IntoValue`]: conversion from Rust types

mod core;

pub use self::core::Value;

/// Ordered collection of bound parameter values.
///
/// The order always matches the left-to-right order of `?` placeholders in
/// the SQL text the values belong to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values(pub Vec<Value>);

impl Values {
	/// Create an empty collection
	pub fn new() -> Self {
		Self(Vec::new())
	}

	/// Append a value
	pub fn push(&mut self, value: Value) {
		self.0.push(value);
	}

	/// Append every value of `other`, keeping their order
	pub fn extend(&mut self, other: Values) {
		self.0.extend(other.0);
	}

	/// Number of values
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the collection is empty
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterate over the values in order
	pub fn iter(&self) -> std::slice::Iter<'_, Value> {
		self.0.iter()
	}

	/// Consume into the underlying vector
	pub fn into_inner(self) -> Vec<Value> {
		self.0
	}
}

impl IntoIterator for Values {
	type Item = Value;
	type IntoIter = std::vec::IntoIter<Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a Values {
	type Item = &'a Value;
	type IntoIter = std::slice::Iter<'a, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl<V: IntoValue> FromIterator<V> for Values {
	fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
		Self(iter.into_iter().map(IntoValue::into_value).collect())
	}
}

/// Conversion trait for SQL parameter values.
pub trait IntoValue {
	/// Convert into a [`Value`]
	fn into_value(self) -> Value;
}

impl IntoValue for Value {
	fn into_value(self) -> Value {
		self
	}
}

macro_rules! impl_into_value {
	($ty:ty, $variant:ident) => {
		impl IntoValue for $ty {
			fn into_value(self) -> Value {
				Value::$variant(Some(self))
			}
		}

		impl IntoValue for Option<$ty> {
			fn into_value(self) -> Value {
				Value::$variant(self)
			}
		}

		impl From<$ty> for Value {
			fn from(v: $ty) -> Self {
				v.into_value()
			}
		}
	};
}

macro_rules! impl_into_boxed_value {
	($ty:ty, $variant:ident) => {
		impl IntoValue for $ty {
			fn into_value(self) -> Value {
				Value::$variant(Some(Box::new(self)))
			}
		}

		impl IntoValue for Option<$ty> {
			fn into_value(self) -> Value {
				Value::$variant(self.map(Box::new))
			}
		}

		impl From<$ty> for Value {
			fn from(v: $ty) -> Self {
				v.into_value()
			}
		}
	};
}

// Lossless widening into the next variant the drivers bind
macro_rules! impl_widening_value {
	($ty:ty => $wide:ty, $variant:ident) => {
		impl IntoValue for $ty {
			fn into_value(self) -> Value {
				Value::$variant(Some(<$wide>::from(self)))
			}
		}

		impl IntoValue for Option<$ty> {
			fn into_value(self) -> Value {
				Value::$variant(self.map(<$wide>::from))
			}
		}

		impl From<$ty> for Value {
			fn from(v: $ty) -> Self {
				v.into_value()
			}
		}
	};
}

impl_into_value!(bool, Bool);
impl_into_value!(i16, SmallInt);
impl_into_value!(i32, Int);
impl_into_value!(i64, BigInt);
impl_into_value!(u64, BigUnsigned);
impl_into_value!(f32, Float);
impl_into_value!(f64, Double);
impl_widening_value!(i8 => i16, SmallInt);
impl_widening_value!(u8 => i16, SmallInt);
impl_widening_value!(u16 => i32, Int);
impl_widening_value!(u32 => i64, BigInt);
impl_into_boxed_value!(String, String);
impl_into_boxed_value!(Vec<u8>, Bytes);

#[cfg(feature = "with-chrono")]
impl_into_boxed_value!(chrono::NaiveDate, ChronoDate);
#[cfg(feature = "with-chrono")]
impl_into_boxed_value!(chrono::NaiveDateTime, ChronoDateTime);
#[cfg(feature = "with-chrono")]
impl_into_boxed_value!(chrono::DateTime<chrono::Utc>, ChronoDateTimeUtc);
#[cfg(feature = "with-uuid")]
impl_into_boxed_value!(uuid::Uuid, Uuid);
#[cfg(feature = "with-json")]
impl_into_boxed_value!(serde_json::Value, Json);

impl IntoValue for &str {
	fn into_value(self) -> Value {
		Value::String(Some(Box::new(self.to_string())))
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		v.into_value()
	}
}

impl IntoValue for char {
	fn into_value(self) -> Value {
		Value::String(Some(Box::new(self.to_string())))
	}
}

impl From<char> for Value {
	fn from(v: char) -> Self {
		v.into_value()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ::core;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	#[rstest]
	#[case::i8(-42i8, Value::SmallInt(Some(-42)))]
	#[case::u8(200u8, Value::SmallInt(Some(200)))]
	#[case::i16(42i16, Value::SmallInt(Some(42)))]
	#[case::u16(65_535u16, Value::Int(Some(65_535)))]
	#[case::i32(42i32, Value::Int(Some(42)))]
	#[case::u32(u32::MAX, Value::BigInt(Some(4_294_967_295)))]
	#[case::i64(42i64, Value::BigInt(Some(42)))]
	#[case::u64(42u64, Value::BigUnsigned(Some(42)))]
	fn test_int_into_value(#[case] input: impl IntoValue, #[case] expected: Value) {
		assert_eq!(input.into_value(), expected);
	}

	#[rstest]
	fn test_option_into_value_is_typed_null() {
		assert_eq!(Option::<i32>::None.into_value(), Value::Int(None));
		assert_eq!(Option::<String>::None.into_value(), Value::String(None));
		assert_eq!(Option::<u16>::None.into_value(), Value::Int(None));
		assert!(Option::<u8>::None.into_value().is_null());
	}

	#[rstest]
	fn test_values_collect_keeps_order() {
		// Arrange
		let values: Values = [1i32, 2, 3].into_iter().collect();

		// Act
		let rendered: Vec<String> = values.iter().map(Value::to_sql_literal).collect();

		// Assert
		assert_eq!(rendered, vec!["1", "2", "3"]);
	}

	#[rstest]
	#[case::bool(Value::Bool(Some(true)), "TRUE")]
	#[case::null(Value::BigInt(None), "NULL")]
	#[case::char_quote(Value::from('\''), "''''")]
	#[case::null_bytes(Value::Bytes(None), "NULL")]
	#[case::bytes(Value::Bytes(Some(Box::new(vec![0xde, 0xad]))), "X'DEAD'")]
	fn test_to_sql_literal(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(value.to_sql_literal(), expected);
	}

	#[rstest]
	fn test_values_extend() {
		// Arrange
		let mut values: Values = ["a"].into_iter().collect();
		let other: Values = ["b", "c"].into_iter().collect();

		// Act
		values.extend(other);

		// Assert
		assert_eq!(values.len(), 3);
		assert_eq!(values.0[2], Value::from("c"));
	}
}
