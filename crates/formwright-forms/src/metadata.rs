//! Whole-form view for summaries and list controls

use crate::intent::{Intent, IntentButton};
use crate::status::FormStatus;
use crate::store::FormInstance;
use formwright_schema::Constraint;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Snapshot of one form instance plus builders for intent controls.
///
/// The list operations do not mutate anything: they return the attributes
/// of a submit control that, when pressed, asks the form root to apply
/// the change. Direct mutation goes through [`FormInstance`] or field
/// handles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMetadata {
	pub id: String,
	pub status: FormStatus,
	pub value: Value,
	/// Field errors keyed by path string
	pub errors: IndexMap<String, Vec<String>>,
	pub form_errors: Vec<String>,
	pub dirty: bool,
	pub valid: bool,
	/// Input hints for every derived path
	pub constraints: IndexMap<String, Constraint>,
}

impl FormMetadata {
	pub(crate) fn capture<T>(form: &FormInstance<T>) -> Self {
		let snapshot = form.snapshot();
		let schema = form.schema();
		let constraints = schema
			.paths_with_depth(form.options().max_path_depth)
			.into_iter()
			.map(|path| (path.to_string(), schema.constraint(&path)))
			.collect();
		let mut errors = snapshot.errors;
		let form_errors = errors.shift_remove("").unwrap_or_default();
		Self {
			id: form.id(),
			status: snapshot.status,
			valid: errors.is_empty() && form_errors.is_empty(),
			value: snapshot.value,
			errors,
			form_errors,
			dirty: snapshot.dirty,
			constraints,
		}
	}

	/// Every message to show in an error summary, form errors first
	pub fn all_errors(&self) -> Vec<&str> {
		self.form_errors
			.iter()
			.chain(self.errors.values().flatten())
			.map(String::as_str)
			.collect()
	}

	pub fn insert(&self, name: &str, index: Option<usize>, default_value: Option<Value>) -> IntentButton {
		self.button(Intent::Insert {
			name: name.to_string(),
			index,
			default_value,
		})
	}

	pub fn remove(&self, name: &str, index: usize) -> IntentButton {
		self.button(Intent::Remove {
			name: name.to_string(),
			index,
		})
	}

	pub fn reorder(&self, name: &str, from: usize, to: usize) -> IntentButton {
		self.button(Intent::Reorder {
			name: name.to_string(),
			from,
			to,
		})
	}

	pub fn validate(&self, name: &str) -> IntentButton {
		self.button(Intent::Validate {
			name: name.to_string(),
		})
	}

	pub fn update(&self, name: &str, value: Option<Value>) -> IntentButton {
		self.button(Intent::Update {
			name: name.to_string(),
			value,
		})
	}

	/// Reset one field, or the whole form with `None`
	pub fn reset(&self, name: Option<&str>) -> IntentButton {
		self.button(Intent::Reset {
			name: name.map(str::to_string),
		})
	}

	fn button(&self, intent: Intent) -> IntentButton {
		IntentButton::new(self.id.as_str(), &intent)
	}
}
