//! HTML-level input hints derived from a shape
//!
//! Only what a shape states statically is reported. Refinements, custom
//! checks and exclusive bounds (`positive`) have no attribute equivalent
//! and are left out.

use crate::formats;
use crate::shape::{Shape, StringShape};
use regex::escape;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inclusive bound for `min`/`max` attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
	Number(f64),
	/// `YYYY-MM-DD`
	Date(String),
}

/// Input attribute hints for one path
///
/// # Examples
///
/// ```
/// use formwright_schema::Constraint;
///
/// let hint = Constraint {
///     required: true,
///     min_length: Some(1),
///     ..Default::default()
/// };
/// assert_eq!(
///     serde_json::to_value(&hint).unwrap(),
///     serde_json::json!({"required": true, "minLength": 1})
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub required: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_length: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_length: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min: Option<Bound>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max: Option<Bound>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub step: Option<f64>,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub multiple: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pattern: Option<String>,
}

impl Constraint {
	pub fn is_empty(&self) -> bool {
		*self == Constraint::default()
	}
}

/// Hints for the value described by `shape`
pub(crate) fn constraint_for(shape: &Arc<Shape>) -> Constraint {
	let mut constraint = Constraint {
		required: !shape.is_optional(),
		..Default::default()
	};

	let inner = shape.unwrapped();
	match inner.as_ref() {
		Shape::String(string) => apply_string(&mut constraint, string),
		Shape::Number(number) => {
			constraint.min = number.lower_bound().map(Bound::Number);
			constraint.max = number.upper_bound().map(Bound::Number);
			constraint.step = number.step();
		}
		Shape::Date(date) => {
			constraint.min = date.min_date().map(|d| Bound::Date(formats::format_date(d)));
			constraint.max = date.max_date().map(|d| Bound::Date(formats::format_date(d)));
		}
		Shape::Enum(options) => {
			let alternatives: Vec<String> = options.options().iter().map(|o| escape(o)).collect();
			constraint.pattern = Some(alternatives.join("|"));
		}
		Shape::Array(array) => {
			constraint.multiple = true;
			// An empty list submits nothing, so only a lower bound makes it required
			constraint.required = constraint.required && array.min_items().is_some_and(|n| n >= 1);
		}
		_ => {}
	}
	constraint
}

fn apply_string(constraint: &mut Constraint, string: &StringShape) {
	constraint.min_length = string.min_length();
	constraint.max_length = string.max_length();
	constraint.pattern = string.pattern().map(str::to_string);
}
