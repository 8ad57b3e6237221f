//! Payload validation engine
//!
//! Input is a nested value tree as produced by [`FormData::parse`] or held
//! by a form store. Validation never fails fast: every problem becomes an
//! [`Issue`] and the engine keeps producing a best-effort output so that
//! cross-field refinements still run on partially invalid objects.
//!
//! Per path, issues come out in this order:
//!
//! ```text
//! 1. structural checks of the field, in declaration order
//! 2. field-level refine checks, in declaration order
//! 3. object refinements targeting the path, inner objects before outer
//! ```
//!
//! [`FormData::parse`]: crate::FormData::parse

use crate::formats;
use crate::issue::{ErrorMap, Issue, IssueCode, StringFormat};
use crate::path::FieldPath;
use crate::shape::{
	ArrayShape, DateShape, DiscriminatedUnionShape, NumberCheck, NumberShape, ObjectShape, Shape,
	StringShape, StringStep, UnionShape,
};
use crate::shape::is_multiple_of;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Outcome of validating a whole payload
///
/// # Examples
///
/// ```
/// use formwright_schema::Submission;
/// use serde_json::json;
///
/// let ok = Submission::Success { value: json!({"name": "Ada"}) };
/// assert_eq!(
///     serde_json::to_value(&ok).unwrap(),
///     json!({"status": "success", "value": {"name": "Ada"}})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Submission {
	Success {
		value: Value,
	},
	#[serde(rename_all = "camelCase")]
	Error {
		field_errors: IndexMap<String, Vec<String>>,
		form_errors: Vec<String>,
	},
}

impl Submission {
	pub fn is_success(&self) -> bool {
		matches!(self, Submission::Success { .. })
	}

	pub fn value(&self) -> Option<&Value> {
		match self {
			Submission::Success { value } => Some(value),
			Submission::Error { .. } => None,
		}
	}

	/// Messages recorded for one path, empty on success
	pub fn errors_at(&self, path: &str) -> &[String] {
		match self {
			Submission::Error { field_errors, .. } => {
				field_errors.get(path).map(Vec::as_slice).unwrap_or(&[])
			}
			Submission::Success { .. } => &[],
		}
	}

	pub fn form_errors(&self) -> &[String] {
		match self {
			Submission::Error { form_errors, .. } => form_errors,
			Submission::Success { .. } => &[],
		}
	}
}

/// Raw engine result: the coerced output and every issue found
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
	pub value: Option<Value>,
	pub issues: Vec<Issue>,
}

impl Validation {
	pub fn is_valid(&self) -> bool {
		self.issues.is_empty()
	}

	/// Group issues by path. Root-level issues are form errors.
	pub fn into_submission(self) -> Submission {
		if self.issues.is_empty() {
			return Submission::Success {
				value: self.value.unwrap_or(Value::Null),
			};
		}
		let mut field_errors: IndexMap<String, Vec<String>> = IndexMap::new();
		let mut form_errors = Vec::new();
		for issue in self.issues {
			if issue.path.is_root() {
				form_errors.push(issue.message);
			} else {
				field_errors
					.entry(issue.path.to_string())
					.or_default()
					.push(issue.message);
			}
		}
		Submission::Error {
			field_errors,
			form_errors,
		}
	}
}

/// Result of revalidating one changed path.
///
/// Errors under `path` replace that whole subtree; errors at each of
/// `targets` (cross-field rules that read `path`) replace exactly that
/// entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathValidation {
	pub path: FieldPath,
	pub targets: Vec<FieldPath>,
	pub errors: IndexMap<FieldPath, Vec<String>>,
}

impl PathValidation {
	pub fn errors_at(&self, path: &FieldPath) -> &[String] {
		self.errors.get(path).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Whether an existing error entry at `key` is superseded
	pub fn covers(&self, key: &FieldPath) -> bool {
		key.starts_with(&self.path) || self.targets.contains(key)
	}
}

/// Empty strings and `null` count as "no value", as a native form
/// submission cannot tell them apart from a missing entry.
pub(crate) fn is_absent(input: Option<&Value>) -> bool {
	match input {
		None | Some(Value::Null) => true,
		Some(Value::String(s)) => s.is_empty(),
		Some(_) => false,
	}
}

/// Integral values become JSON integers so typed models with integer
/// fields deserialize.
pub(crate) fn number_value(value: f64) -> Value {
	const MAX_SAFE: f64 = 9_007_199_254_740_992.0;
	if value.fract() == 0.0 && value.abs() < MAX_SAFE {
		Value::from(value as i64)
	} else {
		serde_json::Number::from_f64(value)
			.map(Value::Number)
			.unwrap_or(Value::Null)
	}
}

pub(crate) struct Engine<'a> {
	error_map: Option<&'a ErrorMap>,
}

impl<'a> Engine<'a> {
	pub(crate) fn new(error_map: Option<&'a ErrorMap>) -> Self {
		Self { error_map }
	}

	pub(crate) fn run(&self, shape: &Arc<Shape>, input: Option<&Value>, path: &FieldPath) -> Validation {
		let mut issues = Vec::new();
		let value = self.parse(shape, input, path, &mut issues);
		Validation { value, issues }
	}

	fn fallback_message(&self, code: &IssueCode, path: &FieldPath) -> String {
		match self.error_map {
			Some(map) => map.message_for(code, path),
			None => code.default_message(),
		}
	}

	/// Issue without a check-specific message
	fn type_issue(&self, shape: &Shape, path: &FieldPath, code: IssueCode) -> Issue {
		let message = match shape.type_message() {
			Some(message) => message.to_string(),
			None => self.fallback_message(&code, path),
		};
		Issue {
			path: path.clone(),
			code,
			message,
		}
	}

	fn parse(
		&self,
		shape: &Arc<Shape>,
		input: Option<&Value>,
		path: &FieldPath,
		issues: &mut Vec<Issue>,
	) -> Option<Value> {
		match shape.as_ref() {
			Shape::Optional(inner) => {
				if is_absent(input) {
					None
				} else {
					self.parse(inner, input, path, issues)
				}
			}
			Shape::Default(inner, default) => {
				if is_absent(input) {
					Some(default.clone())
				} else {
					self.parse(inner, input, path, issues)
				}
			}
			Shape::Lazy(lazy) => self.parse(&lazy.resolve(), input, path, issues),
			Shape::Any => input.filter(|v| !v.is_null()).cloned(),
			Shape::Object(object) => self.parse_object(object, input, path, issues),
			Shape::Array(array) => Some(self.parse_array(array, input, path, issues)),
			Shape::Union(union) => self.parse_union(shape, union, input, path, issues),
			Shape::DiscriminatedUnion(union) => self.parse_tagged(union, input, path, issues),
			leaf => {
				let Some(input) = input.filter(|_| !is_absent(input)) else {
					issues.push(self.type_issue(leaf, path, IssueCode::Required));
					return None;
				};
				self.parse_leaf(leaf, input, path, issues)
			}
		}
	}

	fn parse_leaf(
		&self,
		shape: &Shape,
		input: &Value,
		path: &FieldPath,
		issues: &mut Vec<Issue>,
	) -> Option<Value> {
		match shape {
			Shape::String(string) => self.parse_string(shape, string, input, path, issues),
			Shape::Number(number) => self.parse_number(shape, number, input, path, issues),
			Shape::Boolean(boolean) => {
				let value = match input {
					Value::Bool(b) => *b,
					Value::String(s) if s == "on" || s == "true" => true,
					Value::String(s) if s == "off" || s == "false" => false,
					_ => {
						let code = IssueCode::InvalidType { expected: "boolean" };
						issues.push(self.type_issue(shape, path, code));
						return None;
					}
				};
				let as_value = Value::Bool(value);
				for check in &boolean.checks {
					if !check.predicate.test(&as_value) {
						issues.push(check_issue(path, IssueCode::Custom, &check.message));
					}
				}
				Some(as_value)
			}
			Shape::Date(date) => self.parse_date(shape, date, input, path, issues),
			Shape::Enum(options) => match input.as_str() {
				Some(value) if options.contains(value) => Some(Value::String(value.to_string())),
				_ => {
					let code = IssueCode::InvalidEnum {
						options: options.options().to_vec(),
					};
					issues.push(self.type_issue(shape, path, code));
					None
				}
			},
			Shape::Record(record) => {
				let Value::Object(entries) = input else {
					let code = IssueCode::InvalidType { expected: "object" };
					issues.push(self.type_issue(shape, path, code));
					return None;
				};
				let mut out = Map::new();
				for (key, value) in entries {
					let child = path.key(key.as_str());
					if let Some(parsed) = self.parse(record.value_shape(), Some(value), &child, issues) {
						out.insert(key.clone(), parsed);
					}
				}
				Some(Value::Object(out))
			}
			_ => None,
		}
	}

	fn parse_string(
		&self,
		shape: &Shape,
		string: &StringShape,
		input: &Value,
		path: &FieldPath,
		issues: &mut Vec<Issue>,
	) -> Option<Value> {
		let Value::String(raw) = input else {
			let code = IssueCode::InvalidType { expected: "string" };
			issues.push(self.type_issue(shape, path, code));
			return None;
		};

		let mut current = raw.clone();
		let mut refined = Vec::new();
		for step in string.steps() {
			let failed = match step {
				StringStep::MinLength { length, message } => (current.chars().count() < *length)
					.then(|| check_issue(path, IssueCode::TooShort { minimum: *length }, message)),
				StringStep::MaxLength { length, message } => (current.chars().count() > *length)
					.then(|| check_issue(path, IssueCode::TooLong { maximum: *length }, message)),
				StringStep::Length { length, message } => (current.chars().count() != *length)
					.then(|| check_issue(path, IssueCode::WrongLength { length: *length }, message)),
				StringStep::Pattern { regex, message } => (!regex.is_match(&current)).then(|| {
					let code = IssueCode::InvalidString {
						format: StringFormat::Regex,
					};
					check_issue(path, code, message)
				}),
				StringStep::Email { message } => (!formats::is_email(&current)).then(|| {
					let code = IssueCode::InvalidString {
						format: StringFormat::Email,
					};
					check_issue(path, code, message)
				}),
				StringStep::Url { message } => (!formats::is_url(&current)).then(|| {
					let code = IssueCode::InvalidString {
						format: StringFormat::Url,
					};
					check_issue(path, code, message)
				}),
				StringStep::Trim => {
					current = current.trim().to_string();
					None
				}
				StringStep::ToLowerCase => {
					current = current.to_lowercase();
					None
				}
				StringStep::ToUpperCase => {
					current = current.to_uppercase();
					None
				}
				StringStep::Refine(check) => {
					if !check.predicate.test(&Value::String(current.clone())) {
						refined.push(check_issue(path, IssueCode::Custom, &check.message));
					}
					None
				}
			};
			issues.extend(failed);
		}
		issues.extend(refined);
		Some(Value::String(current))
	}

	fn parse_number(
		&self,
		shape: &Shape,
		number: &NumberShape,
		input: &Value,
		path: &FieldPath,
		issues: &mut Vec<Issue>,
	) -> Option<Value> {
		let coerced = match input {
			Value::Number(n) => n.as_f64(),
			Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
			_ => None,
		};
		let Some(value) = coerced else {
			let code = IssueCode::InvalidType { expected: "number" };
			issues.push(self.type_issue(shape, path, code));
			return None;
		};

		let mut refined = Vec::new();
		for check in number.checks() {
			let failed = match check {
				NumberCheck::Int { message } => {
					(value.fract() != 0.0).then(|| check_issue(path, IssueCode::NotInteger, message))
				}
				NumberCheck::Positive { message } => (value <= 0.0).then(|| {
					let code = IssueCode::TooSmall {
						minimum: 0.0,
						inclusive: false,
					};
					check_issue(path, code, message)
				}),
				NumberCheck::NonNegative { message } => (value < 0.0).then(|| {
					let code = IssueCode::TooSmall {
						minimum: 0.0,
						inclusive: true,
					};
					check_issue(path, code, message)
				}),
				NumberCheck::Min { value: min, message } => (value < *min).then(|| {
					let code = IssueCode::TooSmall {
						minimum: *min,
						inclusive: true,
					};
					check_issue(path, code, message)
				}),
				NumberCheck::Max { value: max, message } => (value > *max)
					.then(|| check_issue(path, IssueCode::TooBig { maximum: *max }, message)),
				NumberCheck::MultipleOf { step, message } => (!is_multiple_of(value, *step))
					.then(|| check_issue(path, IssueCode::NotMultipleOf { step: *step }, message)),
				NumberCheck::Refine(check) => {
					if !check.predicate.test(&number_value(value)) {
						refined.push(check_issue(path, IssueCode::Custom, &check.message));
					}
					None
				}
			};
			issues.extend(failed);
		}
		issues.extend(refined);
		Some(number_value(value))
	}

	fn parse_date(
		&self,
		shape: &Shape,
		date: &DateShape,
		input: &Value,
		path: &FieldPath,
		issues: &mut Vec<Issue>,
	) -> Option<Value> {
		let Some(parsed) = input.as_str().and_then(formats::parse_date) else {
			issues.push(self.type_issue(shape, path, IssueCode::InvalidDate));
			return None;
		};
		if let Some((minimum, message)) = &date.min
			&& parsed < *minimum
		{
			let code = IssueCode::DateTooEarly { minimum: *minimum };
			issues.push(check_issue(path, code, message));
		}
		if let Some((maximum, message)) = &date.max
			&& parsed > *maximum
		{
			let code = IssueCode::DateTooLate { maximum: *maximum };
			issues.push(check_issue(path, code, message));
		}
		Some(Value::String(formats::format_date(parsed)))
	}

	pub(crate) fn parse_object(
		&self,
		object: &ObjectShape,
		input: Option<&Value>,
		path: &FieldPath,
		issues: &mut Vec<Issue>,
	) -> Option<Value> {
		let empty = Map::new();
		let entries = match input {
			Some(Value::Object(entries)) => entries,
			_ if is_absent(input) => &empty,
			_ => {
				let code = IssueCode::InvalidType { expected: "object" };
				let message = self.fallback_message(&code, path);
				issues.push(Issue {
					path: path.clone(),
					code,
					message,
				});
				return None;
			}
		};

		let mut out = Map::new();
		for (name, child) in object.fields() {
			let child_path = path.key(name);
			if let Some(value) = self.parse(child, entries.get(name), &child_path, issues) {
				out.insert(name.to_string(), value);
			}
		}
		let out = Value::Object(out);

		for rule in object.refinements() {
			if !rule.holds(&out) {
				issues.push(check_issue(
					&path.join(&rule.target_path()),
					IssueCode::Custom,
					rule.message(),
				));
			}
		}
		Some(out)
	}

	fn parse_array(
		&self,
		array: &ArrayShape,
		input: Option<&Value>,
		path: &FieldPath,
		issues: &mut Vec<Issue>,
	) -> Value {
		let items: Vec<&Value> = match input {
			Some(Value::Array(items)) => items.iter().collect(),
			_ if is_absent(input) => Vec::new(),
			// A lone value posted for a list field is a one-item list
			Some(single) => vec![single],
			None => Vec::new(),
		};

		if let Some((minimum, message)) = &array.min
			&& items.len() < *minimum
		{
			issues.push(check_issue(path, IssueCode::TooFewItems { minimum: *minimum }, message));
		}
		if let Some((maximum, message)) = &array.max
			&& items.len() > *maximum
		{
			issues.push(check_issue(path, IssueCode::TooManyItems { maximum: *maximum }, message));
		}

		let out = items
			.into_iter()
			.enumerate()
			.map(|(index, item)| {
				self.parse(array.element(), Some(item), &path.index(index), issues)
					.unwrap_or(Value::Null)
			})
			.collect();
		Value::Array(out)
	}

	fn parse_union(
		&self,
		shape: &Shape,
		union: &UnionShape,
		input: Option<&Value>,
		path: &FieldPath,
		issues: &mut Vec<Issue>,
	) -> Option<Value> {
		let mut closest: Option<(Option<Value>, Vec<Issue>)> = None;
		for variant in union.variants() {
			let mut local = Vec::new();
			let out = self.parse(variant, input, path, &mut local);
			if local.is_empty() {
				return out;
			}
			if closest.as_ref().is_none_or(|(_, best)| local.len() < best.len()) {
				closest = Some((out, local));
			}
		}
		match closest {
			Some((out, local)) => {
				issues.extend(local);
				out
			}
			None => {
				issues.push(self.type_issue(shape, path, IssueCode::InvalidUnion));
				None
			}
		}
	}

	fn parse_tagged(
		&self,
		union: &DiscriminatedUnionShape,
		input: Option<&Value>,
		path: &FieldPath,
		issues: &mut Vec<Issue>,
	) -> Option<Value> {
		let tag = input
			.and_then(|value| value.get(union.discriminator()))
			.and_then(Value::as_str);
		if let Some(variant) = tag.and_then(|tag| union.variant_for(tag)) {
			return self.parse_object(variant, input, path, issues);
		}

		let options = union
			.variants()
			.iter()
			.flat_map(|variant| union.tags(variant))
			.collect();
		let tag_path = path.key(union.discriminator());
		let code = IssueCode::InvalidDiscriminator { options };
		let message = self.fallback_message(&code, &tag_path);
		issues.push(Issue {
			path: tag_path,
			code,
			message,
		});
		None
	}
}

fn check_issue(path: &FieldPath, code: IssueCode, message: &str) -> Issue {
	Issue {
		path: path.clone(),
		code,
		message: message.to_string(),
	}
}
