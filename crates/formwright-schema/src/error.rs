//! Error types for schema construction and path handling

/// Errors raised while parsing or applying a field path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
	#[error("Empty segment in path '{path}'")]
	EmptySegment { path: String },
	#[error("Unterminated index bracket in path '{path}'")]
	UnterminatedIndex { path: String },
	#[error("Invalid index '{index}' in path '{path}'")]
	InvalidIndex { path: String, index: String },
	#[error("Cannot descend into a non-container value at '{path}'")]
	NotAContainer { path: String },
	#[error("Path '{path}' contains the '[number]' placeholder and cannot address a value")]
	Placeholder { path: String },
}

/// Setup-time schema misuse.
///
/// These are programming errors in the schema author's code and are raised
/// when the schema is built, never while a user interacts with a form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
	#[error("Form schemas must be an object, a union of objects or a discriminated union, got {kind}")]
	InvalidRoot { kind: &'static str },
	#[error("Invalid regex pattern '{pattern}': {reason}")]
	InvalidPattern { pattern: String, reason: String },
	#[error("Discriminated union variant {variant} has no literal '{discriminator}' field")]
	MissingDiscriminator { discriminator: String, variant: usize },
	#[error("Discriminator value '{value}' is used by more than one variant")]
	DuplicateDiscriminator { value: String },
	#[error("Refinement target '{target}' does not resolve in the schema")]
	UnknownRefinementTarget { target: String },
	#[error("Unknown field '{field}'")]
	UnknownField { field: String },
	#[error(transparent)]
	Path(#[from] PathError),
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while decoding or encoding a flat form payload
#[derive(Debug, thiserror::Error)]
pub enum FormDataError {
	#[error("Malformed urlencoded body: {0}")]
	Decode(#[from] serde_urlencoded::de::Error),
	#[error("Failed to encode form payload: {0}")]
	Encode(#[from] serde_urlencoded::ser::Error),
}
