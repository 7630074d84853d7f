//! # Reinhardt CTE
//!
//! Common Table Expressions for the Reinhardt query builder.
//!
//! This facade re-exports the workspace crates:
//!
//! - [`query`] (`reinhardt-cte-query`): the statement builder, the CTE
//!   registry and one grammar per dialect
//! - [`db`] (`reinhardt-cte-db`, feature `db`): connections, sqlx drivers,
//!   the connection factory and model queries
//!
//! ## Feature Flags
//!
//! - `db`: connections and model queries without drivers
//! - `db-sqlite`, `db-postgres`, `db-mysql` (default): sqlx drivers
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_cte::prelude::*;
//!
//! let mut stmt = Statement::for_dialect(Dialect::SqlServer);
//! stmt.with_recursive_expression(
//!     "tree",
//!     "select id, parent_id from nodes where parent_id is null \
//!      union all select n.id, n.parent_id from nodes n join tree t on n.parent_id = t.id",
//!     ["id", "parent_id"],
//! )
//! .unwrap()
//! .from("tree")
//! .recursion_limit(500);
//!
//! assert!(stmt.to_sql().starts_with("WITH [tree] ([id], [parent_id]) AS ("));
//! assert!(stmt.to_sql().ends_with("SELECT * FROM [tree] OPTION (MAXRECURSION 500)"));
//! ```

pub use reinhardt_cte_query as query;

#[cfg(feature = "db")]
pub use reinhardt_cte_db as db;

pub mod prelude {
	pub use reinhardt_cte_query::prelude::*;

	#[cfg(feature = "db")]
	pub use reinhardt_cte_db::prelude::*;
}
