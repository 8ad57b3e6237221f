//! Default value derivation

use crate::shape::Shape;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Default for a single field: the declared default, else the zero value
/// when the field may be absent. Lists default to `[]` and objects to the
/// object of their children's defaults.
pub(crate) fn default_for(shape: &Arc<Shape>) -> Option<Value> {
	if let Some(declared) = shape.declared_default() {
		return Some(declared.clone());
	}
	let inner = shape.unwrapped();
	match inner.as_ref() {
		Shape::Array(_) => Some(Value::Array(Vec::new())),
		Shape::Object(object) => {
			let mut out = Map::new();
			for (name, child) in object.fields() {
				if let Some(value) = default_for(child) {
					out.insert(name.to_string(), value);
				}
			}
			Some(Value::Object(out))
		}
		_ if shape.is_optional() => Some(zero_value(&inner)),
		_ => None,
	}
}

fn zero_value(shape: &Shape) -> Value {
	match shape {
		Shape::String(_) | Shape::Date(_) | Shape::Enum(_) => Value::String(String::new()),
		Shape::Number(_) => Value::from(0),
		Shape::Boolean(_) => Value::Bool(false),
		Shape::Record(_) | Shape::Object(_) => Value::Object(Map::new()),
		Shape::Array(_) => Value::Array(Vec::new()),
		_ => Value::Null,
	}
}

/// Value tree a form starts from.
///
/// Holds declared defaults, required nested objects and required lists.
/// Scalars without a declared default stay absent, so an untouched field
/// submits nothing.
pub(crate) fn initial_for(shape: &Arc<Shape>) -> Option<Value> {
	if let Some(declared) = shape.declared_default() {
		return Some(declared.clone());
	}
	if shape.is_optional() {
		return None;
	}
	let inner = shape.unwrapped();
	match inner.as_ref() {
		Shape::Object(object) => {
			let mut out = Map::new();
			for (name, child) in object.fields() {
				if let Some(value) = initial_for(child) {
					out.insert(name.to_string(), value);
				}
			}
			Some(Value::Object(out))
		}
		Shape::Array(_) => Some(Value::Array(Vec::new())),
		Shape::Union(union) => union.variants().first().and_then(initial_for),
		Shape::DiscriminatedUnion(union) => union
			.variants()
			.first()
			.and_then(|variant| initial_for(&Arc::new(Shape::Object(variant.clone())))),
		_ => None,
	}
}
