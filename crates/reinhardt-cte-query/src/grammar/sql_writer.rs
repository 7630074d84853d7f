//! SQL Writer helper for constructing SQL strings
//!
//! Grammars emit `?` placeholders only; values stay in the statement's
//! binding buckets, so the writer only tracks text.

/// SQL Writer for constructing clause fragments
///
/// # Examples
///
/// ```rust
/// use reinhardt_cte_query::grammar::SqlWriter;
///
/// let mut writer = SqlWriter::new();
/// writer.push_keyword("SELECT");
/// writer.push_keyword("");
/// writer.push_list(["id", "name"], ", ", |w, c| {
///     w.push_identifier(c, |s| format!("\"{}\"", s))
/// });
/// writer.push_keyword("WHERE");
/// writer.push_keyword("\"id\" IN (");
/// writer.push_placeholders(2);
/// writer.push(")");
///
/// assert_eq!(writer.into_string(), "SELECT \"id\", \"name\" WHERE \"id\" IN (?, ?)");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlWriter {
	sql: String,
}

impl SqlWriter {
	/// Create an empty writer
	pub fn new() -> Self {
		Self::default()
	}

	/// Push a string as is
	pub fn push(&mut self, s: &str) {
		self.sql.push_str(s);
	}

	/// Push a space unless the text is empty or already ends with one
	pub fn push_space(&mut self) {
		if !self.sql.is_empty() && !self.sql.ends_with(' ') {
			self.sql.push(' ');
		}
	}

	/// Push a keyword (with automatic spacing)
	pub fn push_keyword(&mut self, keyword: &str) {
		self.push_space();
		self.sql.push_str(keyword);
	}

	/// Push an identifier through the grammar's quoting function
	pub fn push_identifier<F>(&mut self, ident: &str, escape_fn: F)
	where
		F: FnOnce(&str) -> String,
	{
		self.sql.push_str(&escape_fn(ident));
	}

	/// Push one `?` placeholder
	pub fn push_placeholder(&mut self) {
		self.sql.push('?');
	}

	/// Push `count` comma-separated placeholders
	pub fn push_placeholders(&mut self, count: usize) {
		for i in 0..count {
			if i > 0 {
				self.sql.push_str(", ");
			}
			self.push_placeholder();
		}
	}

	/// Push a list of items with a separator
	pub fn push_list<I, T, F>(&mut self, items: I, separator: &str, mut f: F)
	where
		I: IntoIterator<Item = T>,
		F: FnMut(&mut Self, T),
	{
		let mut first = true;
		for item in items {
			if !first {
				self.sql.push_str(separator);
			}
			f(self, item);
			first = false;
		}
	}

	/// Check if SQL is empty
	pub fn is_empty(&self) -> bool {
		self.sql.is_empty()
	}

	/// Convert to string (consuming self).
	pub fn into_string(self) -> String {
		self.sql
	}
}
