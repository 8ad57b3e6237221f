//! Error types for the forms layer

use formwright_schema::{FormDataError, PathError, SchemaError};

/// Setup-time misuse of the forms API.
///
/// User input never produces one of these: invalid submissions become
/// error state on the form instance, and unknown paths passed to runtime
/// operations are logged and ignored.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Invalid form name '{name}': {reason}")]
	InvalidName { name: String, reason: &'static str },

	#[error("Path '{path}' is not part of the {form} form")]
	UnknownPath { form: String, path: String },

	#[error("Options file error: {0}")]
	OptionsFile(String),

	#[error("Options parse error: {0}")]
	OptionsParse(String),

	#[error("Malformed intent: {0}")]
	MalformedIntent(String),

	#[error(transparent)]
	Path(#[from] PathError),

	#[error(transparent)]
	Schema(#[from] SchemaError),

	#[error(transparent)]
	FormData(#[from] FormDataError),
}

pub type FormResult<T> = Result<T, FormError>;
