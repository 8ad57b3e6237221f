//! String shape: checks and transforms applied in declaration order

use super::{FieldCheck, Predicate};
use regex::Regex;
use serde_json::Value;

/// One step of a string pipeline.
///
/// Checks observe the value as transformed by the steps before them, which
/// is why `min(1, ..).trim()` accepts `" "` but `trim().min(1, ..)` does not.
#[derive(Debug, Clone)]
pub enum StringStep {
	MinLength { length: usize, message: String },
	MaxLength { length: usize, message: String },
	Length { length: usize, message: String },
	Pattern { regex: Regex, message: String },
	Email { message: String },
	Url { message: String },
	Trim,
	ToLowerCase,
	ToUpperCase,
	Refine(FieldCheck),
}

impl StringStep {
	pub fn is_transform(&self) -> bool {
		matches!(
			self,
			StringStep::Trim | StringStep::ToLowerCase | StringStep::ToUpperCase
		)
	}
}

/// String field description
#[derive(Debug, Clone, Default)]
pub struct StringShape {
	pub(crate) steps: Vec<StringStep>,
	pub(crate) type_message: Option<String>,
}

impl StringShape {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn steps(&self) -> &[StringStep] {
		&self.steps
	}

	/// Message used when the value is missing or not a string
	pub fn type_message(mut self, message: impl Into<String>) -> Self {
		self.type_message = Some(message.into());
		self
	}

	/// Minimum length in characters
	///
	/// # Examples
	///
	/// ```
	/// use formwright_schema::shape;
	///
	/// let name = shape::string().min(1, "Enter your name");
	/// assert_eq!(name.steps().len(), 1);
	/// ```
	pub fn min(mut self, length: usize, message: impl Into<String>) -> Self {
		self.steps.push(StringStep::MinLength {
			length,
			message: message.into(),
		});
		self
	}

	/// Maximum length in characters
	pub fn max(mut self, length: usize, message: impl Into<String>) -> Self {
		self.steps.push(StringStep::MaxLength {
			length,
			message: message.into(),
		});
		self
	}

	/// Exact length in characters
	pub fn length(mut self, length: usize, message: impl Into<String>) -> Self {
		self.steps.push(StringStep::Length {
			length,
			message: message.into(),
		});
		self
	}

	/// Shorthand for `min(1, message)`
	pub fn non_empty(self, message: impl Into<String>) -> Self {
		self.min(1, message)
	}

	pub fn regex(mut self, regex: Regex, message: impl Into<String>) -> Self {
		self.steps.push(StringStep::Pattern {
			regex,
			message: message.into(),
		});
		self
	}

	/// Like [`regex`](Self::regex), compiling the pattern first
	///
	/// # Examples
	///
	/// ```
	/// use formwright_schema::shape;
	///
	/// assert!(shape::string().try_pattern(r"^[A-Z0-9_-]+$", "Invalid SKU").is_ok());
	/// assert!(shape::string().try_pattern(r"^[A-Z", "Invalid SKU").is_err());
	/// ```
	pub fn try_pattern(
		self,
		pattern: &str,
		message: impl Into<String>,
	) -> crate::SchemaResult<Self> {
		let regex = Regex::new(pattern).map_err(|e| crate::SchemaError::InvalidPattern {
			pattern: pattern.to_string(),
			reason: e.to_string(),
		})?;
		Ok(self.regex(regex, message))
	}

	pub fn email(mut self, message: impl Into<String>) -> Self {
		self.steps.push(StringStep::Email {
			message: message.into(),
		});
		self
	}

	pub fn url(mut self, message: impl Into<String>) -> Self {
		self.steps.push(StringStep::Url {
			message: message.into(),
		});
		self
	}

	pub fn trim(mut self) -> Self {
		self.steps.push(StringStep::Trim);
		self
	}

	pub fn to_lower_case(mut self) -> Self {
		self.steps.push(StringStep::ToLowerCase);
		self
	}

	pub fn to_upper_case(mut self) -> Self {
		self.steps.push(StringStep::ToUpperCase);
		self
	}

	/// Custom check on the string value
	pub fn refine<F>(mut self, predicate: F, message: impl Into<String>) -> Self
	where
		F: Fn(&str) -> bool + Send + Sync + 'static,
	{
		self.steps.push(StringStep::Refine(FieldCheck {
			predicate: Predicate::new(move |value: &Value| value.as_str().is_some_and(&predicate)),
			message: message.into(),
		}));
		self
	}

	pub(crate) fn min_length(&self) -> Option<usize> {
		self.steps
			.iter()
			.filter_map(|step| match step {
				StringStep::MinLength { length, .. } | StringStep::Length { length, .. } => {
					Some(*length)
				}
				_ => None,
			})
			.max()
	}

	pub(crate) fn max_length(&self) -> Option<usize> {
		self.steps
			.iter()
			.filter_map(|step| match step {
				StringStep::MaxLength { length, .. } | StringStep::Length { length, .. } => {
					Some(*length)
				}
				_ => None,
			})
			.min()
	}

	pub(crate) fn pattern(&self) -> Option<&str> {
		self.steps.iter().find_map(|step| match step {
			StringStep::Pattern { regex, .. } => Some(regex.as_str()),
			_ => None,
		})
	}
}

impl From<StringShape> for super::Shape {
	fn from(shape: StringShape) -> Self {
		super::Shape::String(shape)
	}
}
