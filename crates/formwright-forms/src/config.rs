//! Per-instance form options
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```toml
//! id = "signup"
//! validate_on = "onBlur"
//! revalidate_on = "onInput"
//! max_path_depth = 6
//!
//! [default_value]
//! plan = "free"
//! ```

use crate::error::{FormError, FormResult};
use formwright_schema::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Event that runs incremental validation for a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationTrigger {
	/// Only a submit validates
	#[default]
	OnSubmit,
	/// Leaving a field validates it
	OnBlur,
	/// Every change validates the field; so does leaving it
	OnInput,
}

/// Field interaction reported to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
	Input,
	Blur,
}

impl ValidationTrigger {
	pub fn fires_on(&self, event: FieldEvent) -> bool {
		match self {
			ValidationTrigger::OnSubmit => false,
			ValidationTrigger::OnBlur => event == FieldEvent::Blur,
			ValidationTrigger::OnInput => true,
		}
	}
}

/// Options for one form instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormOptions {
	/// DOM scope id; the factory's form name when unset
	pub id: Option<String>,
	pub validate_on: ValidationTrigger,
	/// Trigger for fields validated at least once; `validate_on` when unset
	pub revalidate_on: Option<ValidationTrigger>,
	/// Initial value tree used instead of the schema defaults
	pub default_value: Option<Value>,
	/// Depth bound of the constraint map in [`FormMetadata`](crate::FormMetadata).
	/// Schema paths and [`FormKit::paths`](crate::FormKit::paths) keep the
	/// schema's own bound.
	pub max_path_depth: usize,
}

impl Default for FormOptions {
	fn default() -> Self {
		Self {
			id: None,
			validate_on: ValidationTrigger::OnSubmit,
			revalidate_on: None,
			default_value: None,
			max_path_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl FormOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse options from a TOML document
	///
	/// # Examples
	///
	/// ```
	/// use formwright_forms::{FormOptions, ValidationTrigger};
	///
	/// let options = FormOptions::from_toml_str(r#"validate_on = "onBlur""#).unwrap();
	/// assert_eq!(options.validate_on, ValidationTrigger::OnBlur);
	/// assert_eq!(options.revalidation_trigger(), ValidationTrigger::OnBlur);
	///
	/// assert!(FormOptions::from_toml_str("validate = true").is_err());
	/// ```
	pub fn from_toml_str(source: &str) -> FormResult<Self> {
		toml::from_str(source)
			.map_err(|e| FormError::OptionsParse(format!("TOML parse error: {}", e)))
	}

	/// Load options from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> FormResult<Self> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|e| {
			FormError::OptionsFile(format!("Failed to read {}: {}", path.display(), e))
		})?;
		Self::from_toml_str(&source)
	}

	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	pub fn validate_on(mut self, trigger: ValidationTrigger) -> Self {
		self.validate_on = trigger;
		self
	}

	pub fn revalidate_on(mut self, trigger: ValidationTrigger) -> Self {
		self.revalidate_on = Some(trigger);
		self
	}

	pub fn with_default_value(mut self, value: Value) -> Self {
		self.default_value = Some(value);
		self
	}

	pub fn with_max_path_depth(mut self, depth: usize) -> Self {
		self.max_path_depth = depth;
		self
	}

	pub fn revalidation_trigger(&self) -> ValidationTrigger {
		self.revalidate_on.unwrap_or(self.validate_on)
	}
}
