//! Intents: state changes requested through a native form submission
//!
//! A plain submit button can carry an intent in the `__intent__` field.
//! The form root applies it instead of running a full submit, which lets
//! "add row" and "remove row" controls work without client-side handlers.
//!
//! ```text
//! <button name="__intent__" value='{"type":"insert","payload":{"name":"tags"}}'>
//! ```

use crate::error::{FormError, FormResult};
use crate::store::FormInstance;
use formwright_schema::{
	FieldPath, Schema, remove_path_value, resolve_path_value, resolve_path_value_mut,
	set_path_value,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Name of the payload field carrying an encoded intent
pub const INTENT_FIELD: &str = "__intent__";

/// A requested state change. Names are field paths with concrete indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
	tag = "type",
	content = "payload",
	rename_all = "snake_case",
	rename_all_fields = "camelCase"
)]
pub enum Intent {
	Validate {
		name: String,
	},
	Update {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value: Option<Value>,
	},
	/// Reset one field, or the whole form when `name` is absent
	Reset {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		name: Option<String>,
	},
	Insert {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		index: Option<usize>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		default_value: Option<Value>,
	},
	Remove {
		name: String,
		index: usize,
	},
	Reorder {
		name: String,
		from: usize,
		to: usize,
	},
}

impl Intent {
	/// Decode the value of an intent field
	///
	/// # Examples
	///
	/// ```
	/// use formwright_forms::Intent;
	///
	/// let intent = Intent::parse(r#"{"type":"remove","payload":{"name":"tags","index":1}}"#).unwrap();
	/// assert_eq!(intent, Intent::Remove { name: "tags".into(), index: 1 });
	/// assert_eq!(Intent::parse(&intent.to_string()).unwrap(), intent);
	/// ```
	pub fn parse(raw: &str) -> FormResult<Self> {
		serde_json::from_str(raw).map_err(|e| FormError::MalformedIntent(e.to_string()))
	}

	/// Path string the intent targets; `None` for a whole-form reset
	pub fn name(&self) -> Option<&str> {
		match self {
			Intent::Validate { name }
			| Intent::Update { name, .. }
			| Intent::Insert { name, .. }
			| Intent::Remove { name, .. }
			| Intent::Reorder { name, .. } => Some(name),
			Intent::Reset { name } => name.as_deref(),
		}
	}

	pub fn path(&self) -> FormResult<Option<FieldPath>> {
		Ok(self.name().map(FieldPath::parse).transpose()?)
	}

	/// Apply the intent to a bare value tree.
	///
	/// This is the stateless variant used when each interaction is its own
	/// request: there are no item keys or stored errors to maintain. Resets
	/// restore the schema's initial value and inserts without a value use
	/// the element default.
	///
	/// # Examples
	///
	/// ```
	/// use formwright_forms::Intent;
	/// use formwright_schema::{Schema, shape};
	/// use serde_json::json;
	///
	/// let schema = Schema::new(shape::object().field("tags", shape::array(shape::string()))).unwrap();
	/// let mut value = json!({"tags": ["a", "c"]});
	/// Intent::Insert { name: "tags".into(), index: Some(1), default_value: Some(json!("b")) }
	///     .apply(&schema, &mut value)
	///     .unwrap();
	/// assert_eq!(value, json!({"tags": ["a", "b", "c"]}));
	/// ```
	pub fn apply(&self, schema: &Schema, value: &mut Value) -> FormResult<()> {
		let path = self.path()?.unwrap_or_default();
		match self {
			Intent::Validate { .. } => {}
			Intent::Update { value: update, .. } => match update {
				Some(update) => set_path_value(value, &path, update.clone())?,
				None => {
					remove_path_value(value, &path);
				}
			},
			Intent::Reset { .. } => {
				let initial = schema.initial_value();
				match resolve_path_value(&initial, &path) {
					Some(restored) => set_path_value(value, &path, restored.clone())?,
					None => {
						remove_path_value(value, &path);
					}
				}
			}
			Intent::Insert {
				index,
				default_value,
				..
			} => {
				if resolve_path_value(value, &path).is_none_or(Value::is_null) {
					set_path_value(value, &path, Value::Array(Vec::new()))?;
				}
				if let Some(Value::Array(items)) = resolve_path_value_mut(value, &path) {
					let at = index.unwrap_or(items.len()).min(items.len());
					let item = default_value
						.clone()
						.or_else(|| schema.default_value(&path.index(at)))
						.unwrap_or(Value::Null);
					items.insert(at, item);
				}
			}
			Intent::Remove { index, .. } => {
				if let Some(Value::Array(items)) = resolve_path_value_mut(value, &path)
					&& *index < items.len()
				{
					items.remove(*index);
				}
			}
			Intent::Reorder { from, to, .. } => {
				if let Some(Value::Array(items)) = resolve_path_value_mut(value, &path)
					&& *from < items.len()
					&& *to < items.len()
				{
					let item = items.remove(*from);
					items.insert(*to, item);
				}
			}
		}
		Ok(())
	}
}

impl fmt::Display for Intent {
	/// The JSON encoding carried in the intent field
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let encoded = serde_json::to_string(self).map_err(|_| fmt::Error)?;
		f.write_str(&encoded)
	}
}

/// Attributes for a submit control that triggers an intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentButton {
	pub name: &'static str,
	pub value: String,
	/// Id of the form the control submits
	pub form: String,
}

impl IntentButton {
	pub fn new(form: impl Into<String>, intent: &Intent) -> Self {
		Self {
			name: INTENT_FIELD,
			value: intent.to_string(),
			form: form.into(),
		}
	}
}

impl<T> FormInstance<T> {
	/// Apply an intent with full bookkeeping (keys, errors, validated flags)
	pub fn dispatch(&self, intent: &Intent) -> FormResult<()> {
		let path = intent.path()?;
		tracing::debug!(form = %self.id(), intent = ?intent, "Dispatching intent");
		match (intent, path) {
			(Intent::Reset { .. }, None) => self.reset(),
			(Intent::Reset { .. }, Some(path)) => self.reset_field(&path),
			(_, None) => {}
			(Intent::Validate { .. }, Some(path)) => self.validate(&path),
			(Intent::Update { value, .. }, Some(path)) => self.update(&path, value.clone()),
			(
				Intent::Insert {
					index,
					default_value,
					..
				},
				Some(path),
			) => {
				self.insert_list_item(&path, *index, default_value.clone());
			}
			(Intent::Remove { index, .. }, Some(path)) => {
				self.remove_list_item(&path, *index);
			}
			(Intent::Reorder { from, to, .. }, Some(path)) => {
				self.reorder_list_item(&path, *from, *to);
			}
		}
		Ok(())
	}
}
