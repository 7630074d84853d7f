//! Statement builder with Common Table Expression support
//!
//! - [`Statement`]: the fluent SELECT builder
//! - [`CommonTableExpression`]: a registered `WITH` entry
//! - [`Subquery`]: callback, query object or raw SQL used as a CTE body or union arm
//! - [`Bindings`]: per-clause parameter buckets

mod bindings;
pub mod clause;
mod compiler;
mod expression;
mod statement;
mod subquery;

pub use bindings::{BindingBucket, Bindings};
pub use clause::{
	Boolean, Column, FromClause, HavingClause, Join, OrderClause, UnionClause, WhereClause,
};
pub use expression::CommonTableExpression;
pub use statement::Statement;
pub use subquery::{QueryStatement, Subquery};
