//! Boolean, date, enumeration and record shapes

use super::{FieldCheck, Predicate, Shape};
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct BooleanShape {
	pub(crate) checks: Vec<FieldCheck>,
	pub(crate) type_message: Option<String>,
}

impl BooleanShape {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn type_message(mut self, message: impl Into<String>) -> Self {
		self.type_message = Some(message.into());
		self
	}

	/// Custom check, e.g. "terms must be accepted"
	pub fn refine<F>(mut self, predicate: F, message: impl Into<String>) -> Self
	where
		F: Fn(bool) -> bool + Send + Sync + 'static,
	{
		self.checks.push(FieldCheck {
			predicate: Predicate::new(move |value: &Value| value.as_bool().is_some_and(&predicate)),
			message: message.into(),
		});
		self
	}
}

impl From<BooleanShape> for Shape {
	fn from(shape: BooleanShape) -> Self {
		Shape::Boolean(shape)
	}
}

/// Calendar date. Values travel as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default)]
pub struct DateShape {
	pub(crate) min: Option<(NaiveDate, String)>,
	pub(crate) max: Option<(NaiveDate, String)>,
	pub(crate) type_message: Option<String>,
}

impl DateShape {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn type_message(mut self, message: impl Into<String>) -> Self {
		self.type_message = Some(message.into());
		self
	}

	/// Earliest accepted date, inclusive
	pub fn min(mut self, date: NaiveDate, message: impl Into<String>) -> Self {
		self.min = Some((date, message.into()));
		self
	}

	/// Latest accepted date, inclusive
	pub fn max(mut self, date: NaiveDate, message: impl Into<String>) -> Self {
		self.max = Some((date, message.into()));
		self
	}

	pub fn min_date(&self) -> Option<NaiveDate> {
		self.min.as_ref().map(|(date, _)| *date)
	}

	pub fn max_date(&self) -> Option<NaiveDate> {
		self.max.as_ref().map(|(date, _)| *date)
	}
}

impl From<DateShape> for Shape {
	fn from(shape: DateShape) -> Self {
		Shape::Date(shape)
	}
}

/// Closed set of string options
///
/// # Examples
///
/// ```
/// use formwright_schema::shape;
///
/// let priority = shape::enumeration(["low", "normal", "high"]);
/// assert!(priority.contains("normal"));
/// assert!(!priority.contains("urgent"));
/// ```
#[derive(Debug, Clone)]
pub struct EnumShape {
	pub(crate) options: Vec<String>,
	pub(crate) message: Option<String>,
}

impl EnumShape {
	pub fn new<I, S>(options: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			options: options.into_iter().map(Into::into).collect(),
			message: None,
		}
	}

	/// Message for both a missing value and a value outside the set
	pub fn message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn options(&self) -> &[String] {
		&self.options
	}

	pub fn contains(&self, value: &str) -> bool {
		self.options.iter().any(|option| option == value)
	}
}

impl From<EnumShape> for Shape {
	fn from(shape: EnumShape) -> Self {
		Shape::Enum(shape)
	}
}

/// String-keyed map. Paths stop at a record: its keys are data, not
/// structure.
#[derive(Debug, Clone)]
pub struct RecordShape {
	pub(crate) value: Arc<Shape>,
}

impl RecordShape {
	pub fn new(value: impl Into<Shape>) -> Self {
		Self {
			value: Arc::new(value.into()),
		}
	}

	pub fn value_shape(&self) -> &Arc<Shape> {
		&self.value
	}
}

impl From<RecordShape> for Shape {
	fn from(shape: RecordShape) -> Self {
		Shape::Record(shape)
	}
}
