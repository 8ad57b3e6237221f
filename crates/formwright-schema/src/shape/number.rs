//! Number shape

use super::{FieldCheck, Predicate};
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum NumberCheck {
	Int { message: String },
	Positive { message: String },
	NonNegative { message: String },
	Min { value: f64, message: String },
	Max { value: f64, message: String },
	MultipleOf { step: f64, message: String },
	Refine(FieldCheck),
}

/// Number field description. Checks run in declaration order and all of
/// them report.
#[derive(Debug, Clone, Default)]
pub struct NumberShape {
	pub(crate) checks: Vec<NumberCheck>,
	pub(crate) type_message: Option<String>,
}

impl NumberShape {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn checks(&self) -> &[NumberCheck] {
		&self.checks
	}

	pub fn type_message(mut self, message: impl Into<String>) -> Self {
		self.type_message = Some(message.into());
		self
	}

	pub fn int(mut self, message: impl Into<String>) -> Self {
		self.checks.push(NumberCheck::Int {
			message: message.into(),
		});
		self
	}

	/// Strictly greater than zero
	pub fn positive(mut self, message: impl Into<String>) -> Self {
		self.checks.push(NumberCheck::Positive {
			message: message.into(),
		});
		self
	}

	pub fn non_negative(mut self, message: impl Into<String>) -> Self {
		self.checks.push(NumberCheck::NonNegative {
			message: message.into(),
		});
		self
	}

	/// Inclusive lower bound
	pub fn min(mut self, value: f64, message: impl Into<String>) -> Self {
		self.checks.push(NumberCheck::Min {
			value,
			message: message.into(),
		});
		self
	}

	/// Inclusive upper bound
	pub fn max(mut self, value: f64, message: impl Into<String>) -> Self {
		self.checks.push(NumberCheck::Max {
			value,
			message: message.into(),
		});
		self
	}

	/// The value must be an integral multiple of `step`
	///
	/// # Examples
	///
	/// ```
	/// use formwright_schema::shape;
	///
	/// let price = shape::number().positive("Price must be positive").multiple_of(0.01, "At most two decimals");
	/// assert_eq!(price.checks().len(), 2);
	/// ```
	pub fn multiple_of(mut self, step: f64, message: impl Into<String>) -> Self {
		self.checks.push(NumberCheck::MultipleOf {
			step,
			message: message.into(),
		});
		self
	}

	pub fn refine<F>(mut self, predicate: F, message: impl Into<String>) -> Self
	where
		F: Fn(f64) -> bool + Send + Sync + 'static,
	{
		self.checks.push(NumberCheck::Refine(FieldCheck {
			predicate: Predicate::new(move |value: &Value| value.as_f64().is_some_and(&predicate)),
			message: message.into(),
		}));
		self
	}

	/// Tightest inclusive lower bound declared with `min`/`non_negative`
	pub(crate) fn lower_bound(&self) -> Option<f64> {
		self.checks
			.iter()
			.filter_map(|check| match check {
				NumberCheck::Min { value, .. } => Some(*value),
				NumberCheck::NonNegative { .. } => Some(0.0),
				_ => None,
			})
			.reduce(f64::max)
	}

	pub(crate) fn upper_bound(&self) -> Option<f64> {
		self.checks
			.iter()
			.filter_map(|check| match check {
				NumberCheck::Max { value, .. } => Some(*value),
				_ => None,
			})
			.reduce(f64::min)
	}

	/// Step attribute: `multiple_of` wins, `int` implies 1
	pub(crate) fn step(&self) -> Option<f64> {
		let multiple = self.checks.iter().find_map(|check| match check {
			NumberCheck::MultipleOf { step, .. } => Some(*step),
			_ => None,
		});
		multiple.or_else(|| {
			self.checks
				.iter()
				.any(|check| matches!(check, NumberCheck::Int { .. }))
				.then_some(1.0)
		})
	}
}

impl From<NumberShape> for super::Shape {
	fn from(shape: NumberShape) -> Self {
		super::Shape::Number(shape)
	}
}

/// `value` is a multiple of `step`, tolerating binary rounding.
///
/// `0.1 + 0.2` style drift must not reject prices like `19.99` against a
/// step of `0.01`.
pub(crate) fn is_multiple_of(value: f64, step: f64) -> bool {
	if step == 0.0 {
		return true;
	}
	let quotient = value / step;
	(quotient - quotient.round()).abs() < 1e-8
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(19.99, 0.01, true)]
	#[case(0.3, 0.1, true)]
	#[case(10.005, 0.01, false)]
	#[case(15.0, 5.0, true)]
	#[case(7.0, 0.0, true)]
	fn test_is_multiple_of(#[case] value: f64, #[case] step: f64, #[case] expected: bool) {
		assert_eq!(is_multiple_of(value, step), expected);
	}

	#[rstest]
	fn test_bounds() {
		let shape = NumberShape::new()
			.non_negative("n")
			.min(5.0, "a")
			.max(100.0, "b")
			.max(50.0, "c");
		assert_eq!(shape.lower_bound(), Some(5.0));
		assert_eq!(shape.upper_bound(), Some(50.0));
		assert_eq!(shape.step(), None);
	}

	#[rstest]
	fn test_step_prefers_multiple_of() {
		assert_eq!(NumberShape::new().int("i").step(), Some(1.0));
		assert_eq!(
			NumberShape::new().int("i").multiple_of(5.0, "m").step(),
			Some(5.0)
		);
	}
}
