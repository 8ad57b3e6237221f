//! Schema model and path algebra for formwright
//!
//! This crate provides the data side of a form:
//! - Runtime shape descriptors (objects, lists, unions, leaves with checks)
//! - Path parsing, derivation and value resolution
//! - Payload validation with cross-field refinements
//! - Constraint and default value extraction
//! - Flat form payload decoding and encoding

pub mod constraint;
mod defaults;
pub mod error;
pub mod form_data;
pub mod formats;
pub mod issue;
pub mod path;
pub mod paths;
pub mod schema;
pub mod shape;
pub mod validate;

pub use constraint::{Bound, Constraint};
pub use error::{FormDataError, PathError, SchemaError, SchemaResult};
pub use form_data::FormData;
pub use issue::{ErrorMap, Issue, IssueCode, StringFormat};
pub use path::{
	ANY_INDEX, FieldPath, PathSegment, remove_path_value, resolve_path_value,
	resolve_path_value_mut, set_path_value,
};
pub use paths::{DEFAULT_MAX_DEPTH, derive_paths, resolve_path_type};
pub use schema::Schema;
pub use shape::{Shape, ShapeExt};
pub use validate::{PathValidation, Submission, Validation};
