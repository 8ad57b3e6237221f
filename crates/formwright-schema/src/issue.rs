//! Validation issues and message overrides

use crate::path::FieldPath;
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;

/// Which string format check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
	Email,
	Url,
	Regex,
}

/// Machine-readable reason for an [`Issue`]
#[derive(Debug, Clone, PartialEq)]
pub enum IssueCode {
	/// Value absent for a field that is not optional
	Required,
	/// Value present with the wrong JSON type
	InvalidType { expected: &'static str },
	TooShort { minimum: usize },
	TooLong { maximum: usize },
	/// Exact string length mismatch
	WrongLength { length: usize },
	TooFewItems { minimum: usize },
	TooManyItems { maximum: usize },
	TooSmall { minimum: f64, inclusive: bool },
	TooBig { maximum: f64 },
	NotInteger,
	NotMultipleOf { step: f64 },
	InvalidString { format: StringFormat },
	InvalidEnum { options: Vec<String> },
	InvalidDate,
	DateTooEarly { minimum: NaiveDate },
	DateTooLate { maximum: NaiveDate },
	InvalidDiscriminator { options: Vec<String> },
	InvalidUnion,
	/// A `refine` check, field-level or cross-field
	Custom,
}

impl IssueCode {
	/// English fallback message
	pub fn default_message(&self) -> String {
		match self {
			IssueCode::Required => "Required".to_string(),
			IssueCode::InvalidType { expected } => format!("Expected {}", expected),
			IssueCode::TooShort { minimum } => {
				format!("Must contain at least {} character(s)", minimum)
			}
			IssueCode::TooLong { maximum } => {
				format!("Must contain at most {} character(s)", maximum)
			}
			IssueCode::WrongLength { length } => {
				format!("Must contain exactly {} character(s)", length)
			}
			IssueCode::TooFewItems { minimum } => format!("Must contain at least {} item(s)", minimum),
			IssueCode::TooManyItems { maximum } => format!("Must contain at most {} item(s)", maximum),
			IssueCode::TooSmall {
				minimum,
				inclusive: true,
			} => format!("Must be greater than or equal to {}", minimum),
			IssueCode::TooSmall { minimum, .. } => format!("Must be greater than {}", minimum),
			IssueCode::TooBig { maximum } => format!("Must be less than or equal to {}", maximum),
			IssueCode::NotInteger => "Expected integer".to_string(),
			IssueCode::NotMultipleOf { step } => format!("Must be a multiple of {}", step),
			IssueCode::InvalidString { format } => match format {
				StringFormat::Email => "Invalid email address".to_string(),
				StringFormat::Url => "Invalid URL".to_string(),
				StringFormat::Regex => "Invalid format".to_string(),
			},
			IssueCode::InvalidEnum { options } | IssueCode::InvalidDiscriminator { options } => {
				format!("Expected one of: {}", options.join(", "))
			}
			IssueCode::InvalidDate => "Invalid date".to_string(),
			IssueCode::DateTooEarly { minimum } => format!("Date must be on or after {}", minimum),
			IssueCode::DateTooLate { maximum } => format!("Date must be on or before {}", maximum),
			IssueCode::InvalidUnion => "Invalid input".to_string(),
			IssueCode::Custom => "Invalid input".to_string(),
		}
	}
}

/// One validation failure, attributed to a path
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
	pub path: FieldPath,
	pub code: IssueCode,
	pub message: String,
}

impl fmt::Display for Issue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.path.is_root() {
			write!(f, "{}", self.message)
		} else {
			write!(f, "{}: {}", self.path, self.message)
		}
	}
}

/// Message override hook for issues raised without an explicit message
/// (missing values, wrong types, unknown enum options).
///
/// Returning `None` falls through to the default message.
///
/// # Examples
///
/// ```
/// use formwright_schema::{ErrorMap, IssueCode};
///
/// let map = ErrorMap::new(|code, _path| match code {
///     IssueCode::Required => Some("必須項目です".to_string()),
///     _ => None,
/// });
/// assert_eq!(map.message_for(&IssueCode::Required, &Default::default()), "必須項目です");
/// assert_eq!(map.message_for(&IssueCode::InvalidDate, &Default::default()), "Invalid date");
/// ```
#[derive(Clone)]
pub struct ErrorMap(Arc<dyn Fn(&IssueCode, &FieldPath) -> Option<String> + Send + Sync>);

impl ErrorMap {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&IssueCode, &FieldPath) -> Option<String> + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	pub fn message_for(&self, code: &IssueCode, path: &FieldPath) -> String {
		(self.0)(code, path).unwrap_or_else(|| code.default_message())
	}
}

impl fmt::Debug for ErrorMap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("ErrorMap(..)")
	}
}
