//! Binding buckets
//!
//! Statement parameters are kept per clause so that the final list can be
//! assembled in the order the clauses appear in the SQL text. The
//! `Expressions` bucket is reserved for CTE subqueries and always comes first
//! because the `WITH` clause opens the statement.

use crate::value::{Value, Values};

/// Clause a bound value belongs to.
///
/// Variants are declared in textual order of a standard SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingBucket {
	/// CTE subqueries of the `WITH` clause
	Expressions,
	/// Raw select columns
	Select,
	/// Raw FROM source
	From,
	/// JOIN clauses
	Join,
	/// WHERE clause
	Where,
	/// GROUP BY clause
	GroupBy,
	/// HAVING clause
	Having,
	/// ORDER BY clause
	Order,
	/// Set-operation arms
	Union,
}

impl BindingBucket {
	/// All buckets in standard textual order
	pub const ORDERED: [BindingBucket; 9] = [
		BindingBucket::Expressions,
		BindingBucket::Select,
		BindingBucket::From,
		BindingBucket::Join,
		BindingBucket::Where,
		BindingBucket::GroupBy,
		BindingBucket::Having,
		BindingBucket::Order,
		BindingBucket::Union,
	];
}

/// Per-clause parameter storage of a statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
	expressions: Vec<Value>,
	select: Vec<Value>,
	from: Vec<Value>,
	join: Vec<Value>,
	r#where: Vec<Value>,
	group_by: Vec<Value>,
	having: Vec<Value>,
	order: Vec<Value>,
	union: Vec<Value>,
}

impl Bindings {
	/// Create empty buckets
	pub fn new() -> Self {
		Self::default()
	}

	/// Values of one bucket
	pub fn bucket(&self, bucket: BindingBucket) -> &[Value] {
		match bucket {
			BindingBucket::Expressions => &self.expressions,
			BindingBucket::Select => &self.select,
			BindingBucket::From => &self.from,
			BindingBucket::Join => &self.join,
			BindingBucket::Where => &self.r#where,
			BindingBucket::GroupBy => &self.group_by,
			BindingBucket::Having => &self.having,
			BindingBucket::Order => &self.order,
			BindingBucket::Union => &self.union,
		}
	}

	fn bucket_mut(&mut self, bucket: BindingBucket) -> &mut Vec<Value> {
		match bucket {
			BindingBucket::Expressions => &mut self.expressions,
			BindingBucket::Select => &mut self.select,
			BindingBucket::From => &mut self.from,
			BindingBucket::Join => &mut self.join,
			BindingBucket::Where => &mut self.r#where,
			BindingBucket::GroupBy => &mut self.group_by,
			BindingBucket::Having => &mut self.having,
			BindingBucket::Order => &mut self.order,
			BindingBucket::Union => &mut self.union,
		}
	}

	/// Append values to a bucket, keeping their order
	pub fn add(&mut self, values: Values, bucket: BindingBucket) {
		self.bucket_mut(bucket).extend(values);
	}

	/// Append a single value to a bucket
	pub fn push(&mut self, value: Value, bucket: BindingBucket) {
		self.bucket_mut(bucket).push(value);
	}

	/// Drop every value of a bucket
	pub(crate) fn clear(&mut self, bucket: BindingBucket) {
		self.bucket_mut(bucket).clear();
	}

	/// Flatten the buckets in the given order
	pub fn flatten(&self, order: &[BindingBucket]) -> Values {
		let mut values = Values::new();
		for bucket in order {
			for value in self.bucket(*bucket) {
				values.push(value.clone());
			}
		}
		values
	}

	/// Total number of values across all buckets
	pub fn len(&self) -> usize {
		BindingBucket::ORDERED
			.iter()
			.map(|bucket| self.bucket(*bucket).len())
			.sum()
	}

	/// Whether every bucket is empty
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
