//! The [`Value`] enum bound to `?` placeholders.

/// One bound parameter.
///
/// Variants follow the widths the sqlx drivers bind and decode; narrower
/// Rust integers widen on conversion (`i8`/`u8` to [`SmallInt`](Self::SmallInt),
/// `u16` to [`Int`](Self::Int), `u32` to [`BigInt`](Self::BigInt)) and `char`
/// becomes a one-character [`String`](Self::String). `None` is a typed NULL.
///
/// ```rust
/// use reinhardt_cte_query::Value;
///
/// assert_eq!(Value::from(7u8), Value::SmallInt(Some(7)));
/// assert_eq!(Value::from('x'), Value::from("x"));
/// assert!(Value::from(Option::<i64>::None).is_null());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	Bool(Option<bool>),
	SmallInt(Option<i16>),
	Int(Option<i32>),
	BigInt(Option<i64>),
	/// Bound natively by MySQL; SQLite and PostgreSQL clamp it to `i64`
	BigUnsigned(Option<u64>),
	Float(Option<f32>),
	Double(Option<f64>),
	String(Option<Box<String>>),
	Bytes(Option<Box<Vec<u8>>>),
	#[cfg(feature = "with-chrono")]
	ChronoDate(Option<Box<chrono::NaiveDate>>),
	#[cfg(feature = "with-chrono")]
	ChronoDateTime(Option<Box<chrono::NaiveDateTime>>),
	#[cfg(feature = "with-chrono")]
	ChronoDateTimeUtc(Option<Box<chrono::DateTime<chrono::Utc>>>),
	#[cfg(feature = "with-uuid")]
	Uuid(Option<Box<uuid::Uuid>>),
	#[cfg(feature = "with-json")]
	Json(Option<Box<serde_json::Value>>),
}

impl Value {
	/// Whether this is a typed NULL
	#[must_use]
	pub fn is_null(&self) -> bool {
		self.literal().is_none()
	}

	/// Inline SQL literal for [`Statement::to_raw_sql`](crate::Statement::to_raw_sql).
	///
	/// Meant for logs and debugging only; bound values never travel this way.
	///
	/// ```rust
	/// use reinhardt_cte_query::Value;
	///
	/// assert_eq!(Value::Int(Some(42)).to_sql_literal(), "42");
	/// assert_eq!(Value::Int(None).to_sql_literal(), "NULL");
	/// assert_eq!(Value::from("it's").to_sql_literal(), "'it''s'");
	/// ```
	#[must_use]
	pub fn to_sql_literal(&self) -> String {
		self.literal().unwrap_or_else(|| "NULL".to_string())
	}

	fn literal(&self) -> Option<String> {
		match self {
			Self::Bool(v) => v.map(|b| if b { "TRUE" } else { "FALSE" }.to_string()),
			Self::SmallInt(v) => v.map(|n| n.to_string()),
			Self::Int(v) => v.map(|n| n.to_string()),
			Self::BigInt(v) => v.map(|n| n.to_string()),
			Self::BigUnsigned(v) => v.map(|n| n.to_string()),
			Self::Float(v) => v.map(|n| n.to_string()),
			Self::Double(v) => v.map(|n| n.to_string()),
			Self::String(v) => v.as_deref().map(|s| quote(s)),
			Self::Bytes(v) => v.as_deref().map(|bytes| {
				let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
				format!("X'{}'", hex)
			}),
			#[cfg(feature = "with-chrono")]
			Self::ChronoDate(v) => v.as_deref().map(|d| format!("'{}'", d)),
			#[cfg(feature = "with-chrono")]
			Self::ChronoDateTime(v) => v.as_deref().map(|d| format!("'{}'", d)),
			#[cfg(feature = "with-chrono")]
			Self::ChronoDateTimeUtc(v) => v.as_deref().map(|d| format!("'{}'", d.to_rfc3339())),
			#[cfg(feature = "with-uuid")]
			Self::Uuid(v) => v.as_deref().map(|u| format!("'{}'", u)),
			#[cfg(feature = "with-json")]
			Self::Json(v) => v.as_deref().map(|j| quote(&j.to_string())),
		}
	}
}

fn quote(s: &str) -> String {
	format!("'{}'", s.replace('\'', "''"))
}

/// NULL of unknown type, decoded from a NULL column
impl Default for Value {
	fn default() -> Self {
		Self::String(None)
	}
}
