//! Property-based tests for compiled statements
//!
//! - Placeholder count equals binding count
//! - Each binding lands on its own placeholder, left to right
//! - Exactly one WITH clause whatever the number of CTEs and union arms
//! - `to_sql` is idempotent

use proptest::prelude::*;

use reinhardt_cte_query::prelude::*;

fn dialect_strategy() -> impl Strategy<Value = Dialect> {
	prop_oneof![
		Just(Dialect::MySql),
		Just(Dialect::Postgres),
		Just(Dialect::Sqlite),
		Just(Dialect::SqlServer),
	]
}

/// Build a statement with `ctes` CTEs (each with `per_cte` bindings), one
/// where binding per entry of `wheres`, and `arms` union arms.
fn build(dialect: Dialect, ctes: usize, per_cte: usize, wheres: &[i32], arms: usize) -> Statement {
	let mut stmt = Statement::for_dialect(dialect);
	for i in 0..ctes {
		stmt.with_expression(
			format!("cte_{}", i),
			Subquery::callback(|q| {
				q.from("source").where_in("id", 0..per_cte as i64);
			}),
		)
		.unwrap();
	}
	stmt.from("cte_0");
	for value in wheres {
		stmt.and_where("value", Operator::Equal, *value);
	}
	for i in 0..arms {
		stmt.union(Subquery::callback(|q| {
			q.from("source").and_where("arm", Operator::Equal, i as i64);
		}))
		.unwrap();
	}
	stmt
}

fn placeholders(sql: &str) -> usize {
	sql.matches('?').count()
}

/// Clause mix for the positional binding property
#[derive(Debug, Clone)]
struct Shape {
	ctes: usize,
	raw_select: bool,
	reselect: bool,
	raw_from: bool,
	refrom: bool,
	wheres: usize,
	in_values: usize,
	havings: usize,
	orders: usize,
	arms: usize,
	offset: Option<u64>,
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
	(
		0usize..3,
		any::<bool>(),
		any::<bool>(),
		any::<bool>(),
		any::<bool>(),
		0usize..3,
		0usize..3,
		0usize..3,
		0usize..3,
		0usize..3,
		proptest::option::of(0u64..20),
	)
		.prop_map(
			|(ctes, raw_select, reselect, raw_from, refrom, wheres, in_values, havings, orders, arms, offset)| Shape {
				ctes,
				raw_select,
				reselect,
				raw_from,
				refrom,
				wheres,
				in_values,
				havings,
				orders,
				arms,
				offset,
			},
		)
}

/// `'label' = ?` bound to the label itself, so an inlined statement shows
/// `'label' = 'label'` only when the binding sits on its own placeholder
fn tagged(label: &str) -> (String, Values) {
	(format!("'{}' = ?", label), [label].into_iter().collect())
}

fn paired(label: &str) -> String {
	format!("'{}' = '{}'", label, label)
}

/// Build a statement whose every binding is a distinct label.
///
/// Returns the statement, the fragments the inlined SQL must contain and the
/// labels of clauses that were replaced before compiling.
fn build_labeled(dialect: Dialect, shape: &Shape) -> (Statement, Vec<String>, Vec<String>) {
	let mut stmt = Statement::for_dialect(dialect);
	let mut expected = Vec::new();
	let mut dropped = Vec::new();

	for i in 0..shape.ctes {
		let label = format!("cte{}", i);
		let (sql, values) = tagged(&label);
		stmt.with_expression(
			format!("cte_{}", i),
			Subquery::callback(move |q| {
				q.from("source").where_raw(sql, values);
			}),
		)
		.unwrap();
		expected.push(paired(&label));
	}

	if shape.raw_select {
		let (sql, values) = tagged("sel");
		stmt.select_raw(sql, values);
		if shape.reselect {
			stmt.select(["id"]);
			dropped.push("sel".to_string());
		} else {
			expected.push(paired("sel"));
		}
	}

	if shape.raw_from {
		let (sql, values) = tagged("src");
		stmt.from_raw(sql, values);
		if shape.refrom {
			stmt.from("source");
			dropped.push("src".to_string());
		} else {
			expected.push(paired("src"));
		}
	} else {
		stmt.from("source");
	}

	for i in 0..shape.wheres {
		let label = format!("w{}", i);
		stmt.and_where(label.clone(), Operator::Equal, label.clone());
		expected.push(format!("{} = '{}'", stmt.grammar().wrap(&label), label));
	}

	if shape.in_values > 0 {
		let labels: Vec<String> = (0..shape.in_values).map(|i| format!("in{}", i)).collect();
		stmt.where_in("tags", labels.clone());
		let quoted: Vec<String> = labels.iter().map(|l| format!("'{}'", l)).collect();
		expected.push(format!(
			"{} IN ({})",
			stmt.grammar().wrap("tags"),
			quoted.join(", ")
		));
	}

	if shape.havings > 0 {
		stmt.group_by(["id"]);
		for i in 0..shape.havings {
			let label = format!("hav{}", i);
			let (sql, values) = tagged(&label);
			stmt.having_raw(sql, values);
			expected.push(paired(&label));
		}
	}

	for i in 0..shape.orders {
		let label = format!("ord{}", i);
		let (sql, values) = tagged(&label);
		stmt.order_by_raw(sql, values);
		expected.push(paired(&label));
	}

	for i in 0..shape.arms {
		let label = format!("arm{}", i);
		let (sql, values) = tagged(&label);
		stmt.union(Subquery::callback(move |q| {
			q.from("source").where_raw(sql, values);
		}))
		.unwrap();
		expected.push(paired(&label));
	}

	if let Some(offset) = shape.offset {
		stmt.offset(offset);
	}

	(stmt, expected, dropped)
}

proptest! {
	/// Test: placeholders and bindings line up
	///
	/// Category: Property
	/// Verifies that every `?` has exactly one binding.
	#[test]
	fn prop_placeholder_count_matches_bindings(
		dialect in dialect_strategy(),
		ctes in 0usize..4,
		per_cte in 0usize..4,
		wheres in prop::collection::vec(any::<i32>(), 0..5),
		arms in 0usize..3,
	) {
		let stmt = build(dialect, ctes, per_cte, &wheres, arms);

		let sql = stmt.to_sql();
		let bindings = stmt.get_bindings();

		prop_assert_eq!(placeholders(&sql), bindings.len());
		prop_assert_eq!(bindings.len(), ctes * per_cte + wheres.len() + arms);
	}

	/// Test: bindings follow placeholder order
	///
	/// Category: Property
	/// Verifies that inlining the bindings puts every value on the placeholder
	/// written for it, including after select and from are replaced.
	#[test]
	fn prop_bindings_follow_placeholder_order(
		dialect in dialect_strategy(),
		shape in shape_strategy(),
	) {
		let (stmt, expected, dropped) = build_labeled(dialect, &shape);

		let sql = stmt.to_sql();
		let bindings = stmt.get_bindings();
		let raw = stmt.to_raw_sql();

		prop_assert_eq!(placeholders(&sql), bindings.len());
		prop_assert!(!raw.contains('?'), "unbound placeholder in {}", raw);
		for fragment in &expected {
			prop_assert!(raw.contains(fragment.as_str()), "missing {} in {}", fragment, raw);
		}
		for label in &dropped {
			prop_assert!(!raw.contains(&format!("'{}'", label)), "stale {} in {}", label, raw);
			prop_assert!(!bindings.iter().any(|v| *v == Value::from(label.as_str())));
		}
	}

	/// Test: single WITH clause
	///
	/// Category: Property
	/// Verifies that CTEs combined with union arms give exactly one WITH.
	#[test]
	fn prop_single_with_clause(
		dialect in dialect_strategy(),
		ctes in 1usize..4,
		arms in 0usize..4,
	) {
		let stmt = build(dialect, ctes, 1, &[], arms);

		let sql = stmt.to_sql();

		prop_assert!(sql.starts_with("WITH "));
		prop_assert_eq!(sql.matches("WITH ").count(), 1);
	}

	/// Test: no WITH without CTEs
	///
	/// Category: Property
	/// Verifies that a statement without CTEs never starts with WITH.
	#[test]
	fn prop_no_with_without_ctes(dialect in dialect_strategy(), arms in 0usize..3) {
		let stmt = build(dialect, 0, 0, &[1], arms);

		prop_assert!(!stmt.to_sql().contains("WITH"));
	}

	/// Test: compilation is idempotent
	///
	/// Category: Property
	/// Verifies that compiling twice without mutation gives identical output.
	#[test]
	fn prop_to_sql_is_idempotent(
		dialect in dialect_strategy(),
		ctes in 0usize..3,
		arms in 0usize..3,
		offset in proptest::option::of(0u64..50),
	) {
		let mut stmt = build(dialect, ctes, 2, &[7], arms);
		if let Some(offset) = offset {
			stmt.offset(offset);
		}

		prop_assert_eq!(stmt.to_sql(), stmt.to_sql());
		prop_assert_eq!(stmt.get_bindings(), stmt.get_bindings());
	}
}
