//! Property-based tests for the path algebra and the flat payload codec
//!
//! Uses proptest to verify:
//! 1. Every derived path resolves to a shape (path soundness)
//! 2. Resolving instantiated paths against conforming values never panics
//! 3. Encoding a conforming value and validating the flat payload gives
//!    the value back

use formwright_schema::shape::{self, ShapeExt};
use formwright_schema::{
	DEFAULT_MAX_DEPTH, FieldPath, FormData, PathSegment, Schema, Shape, resolve_path_type,
	resolve_path_value,
};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

fn organization() -> Schema {
	let employee = shape::object()
		.field("name", shape::string().min(1, "Enter a name"))
		.field("email", shape::string().email("Invalid email"))
		.field("age", shape::number().int("Whole years").min(18.0, "Adults only"));
	let department = shape::object()
		.field("name", shape::string().min(1, "Enter a department name"))
		.field("budget", shape::number().non_negative("No negative budgets"))
		.field("rating", shape::number())
		.field("employees", shape::array(employee).min(1, "Add an employee"));
	Schema::new(
		shape::object()
			.field("name", shape::string().min(1, "Enter a name"))
			.field("founded", shape::date())
			.field("active", shape::boolean())
			.field("departments", shape::array(department).min(1, "Add a department")),
	)
	.unwrap()
}

fn tree() -> Arc<Shape> {
	fn node() -> Shape {
		shape::object()
			.field("label", shape::string())
			.field("meta", shape::record(shape::any()).optional())
			.field("children", shape::array(shape::lazy(node)).optional())
			.into_shape()
	}
	Arc::new(node())
}

fn text() -> impl Strategy<Value = String> {
	"[A-Za-z][A-Za-z0-9 ]{0,11}"
}

fn employee() -> impl Strategy<Value = Value> {
	(text(), "[a-z]{1,8}", 18u32..65).prop_map(|(name, user, age)| {
		json!({"name": name, "email": format!("{}@example.com", user), "age": age})
	})
}

fn department() -> impl Strategy<Value = Value> {
	(
		text(),
		0u64..1_000_000,
		(0u32..5, 1u32..100),
		prop::collection::vec(employee(), 1..4),
	)
		.prop_map(|(name, budget, (whole, cents), employees)| {
			let rating = f64::from(whole * 100 + cents) / 100.0;
			json!({"name": name, "budget": budget, "rating": rating, "employees": employees})
		})
}

fn organization_value() -> impl Strategy<Value = Value> {
	(
		text(),
		(1950i32..2020, 1u32..13, 1u32..29),
		any::<bool>(),
		prop::collection::vec(department(), 1..4),
	)
		.prop_map(|(name, (y, m, d), active, departments)| {
			json!({
				"name": name,
				"founded": format!("{:04}-{:02}-{:02}", y, m, d),
				"active": active,
				"departments": departments,
			})
		})
}

/// Replace every placeholder with a concrete index
fn instantiate(path: &FieldPath, index: usize) -> FieldPath {
	FieldPath::from_segments(
		path.segments()
			.iter()
			.map(|segment| match segment {
				PathSegment::AnyIndex => PathSegment::Index(index),
				other => other.clone(),
			})
			.collect(),
	)
}

#[test]
fn test_every_derived_path_resolves() {
	let schema = organization();
	for path in schema.paths() {
		assert!(schema.contains(path), "{path} does not resolve");
	}

	let tree = tree();
	for depth in 1..=DEFAULT_MAX_DEPTH {
		for path in formwright_schema::derive_paths(&tree, depth) {
			assert!(path.len() <= depth);
			assert!(resolve_path_type(&tree, &path).is_some(), "{path}");
		}
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	/// Property: instantiated paths resolve against conforming values without panicking,
	/// and index 0 of every non-empty list is found
	#[test]
	fn test_resolve_path_value_on_conforming_values(value in organization_value(), index in 0usize..5) {
		let schema = organization();
		for path in schema.paths() {
			let concrete = instantiate(path, index);
			let _ = resolve_path_value(&value, &concrete);
			let first = instantiate(path, 0);
			prop_assert!(resolve_path_value(&value, &first).is_some(), "{}", first);
		}
	}

	/// Property: encode → validate reproduces the value exactly
	#[test]
	fn test_flat_encoding_round_trip(value in organization_value()) {
		let schema = organization();
		let data = FormData::encode(&value);
		let submission = schema.validate_form_data(&data);
		prop_assert_eq!(submission.value(), Some(&value));
	}

	/// Property: urlencoding the flat payload is lossless
	#[test]
	fn test_urlencoded_round_trip(value in organization_value()) {
		let data = FormData::encode(&value);
		let body = data.to_urlencoded().unwrap();
		prop_assert_eq!(FormData::from_urlencoded(&body).unwrap(), data);
	}
}
