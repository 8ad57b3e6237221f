//! Runtime schema descriptors
//!
//! A [`Shape`] describes a value the way a structural validation library
//! would: primitives, enumerations, nested objects, lists, unions and the
//! `optional`/`default` modifiers. Shapes are immutable once built and are
//! shared through `Arc`, so one schema can back any number of forms.
//!
//! ## Example
//!
//! ```
//! use formwright_schema::shape::{self, ShapeExt};
//!
//! let employee = shape::object()
//!     .field("name", shape::string().min(1, "Name is required"))
//!     .field("email", shape::string().email("Invalid email"))
//!     .field("projects", shape::array(shape::string()).max(5, "At most five projects"));
//!
//! let department = shape::object()
//!     .field("name", shape::string().min(1, "Department name is required"))
//!     .field("employees", shape::array(employee).min(1, "Add at least one employee"))
//!     .field("budget", shape::number().positive("Budget must be positive").optional());
//! # let _ = department;
//! ```

mod composite;
mod number;
mod object;
mod scalar;
mod string;

pub use composite::{ArrayShape, DiscriminatedUnionShape, LazyShape, UnionShape};
pub use number::{NumberCheck, NumberShape};
pub use object::{ObjectShape, Refinement};
pub use scalar::{BooleanShape, DateShape, EnumShape, RecordShape};
pub use string::{StringShape, StringStep};

pub(crate) use number::is_multiple_of;

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A value predicate used by `refine` checks.
///
/// The predicate receives the (coerced, transformed) value of the field or
/// object it is attached to.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl Predicate {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&Value) -> bool + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	pub fn test(&self, value: &Value) -> bool {
		(self.0)(value)
	}
}

impl fmt::Debug for Predicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Predicate(..)")
	}
}

/// A field-level custom check (`refine` on a single field)
#[derive(Debug, Clone)]
pub struct FieldCheck {
	pub predicate: Predicate,
	pub message: String,
}

/// Structural description of a value
#[derive(Debug, Clone)]
pub enum Shape {
	String(StringShape),
	Number(NumberShape),
	Boolean(BooleanShape),
	Date(DateShape),
	Enum(EnumShape),
	Record(RecordShape),
	Any,
	Object(ObjectShape),
	Array(ArrayShape),
	Union(UnionShape),
	DiscriminatedUnion(DiscriminatedUnionShape),
	/// Input may be absent
	Optional(Arc<Shape>),
	/// Input may be absent; the given value is substituted
	Default(Arc<Shape>, Value),
	/// Deferred shape, for self-referential schemas
	Lazy(LazyShape),
}

impl Shape {
	/// Short name of the variant, used in error messages
	pub fn kind(&self) -> &'static str {
		match self {
			Shape::String(_) => "string",
			Shape::Number(_) => "number",
			Shape::Boolean(_) => "boolean",
			Shape::Date(_) => "date",
			Shape::Enum(_) => "enum",
			Shape::Record(_) => "record",
			Shape::Any => "any",
			Shape::Object(_) => "object",
			Shape::Array(_) => "array",
			Shape::Union(_) => "union",
			Shape::DiscriminatedUnion(_) => "discriminated union",
			Shape::Optional(_) => "optional",
			Shape::Default(..) => "default",
			Shape::Lazy(_) => "lazy",
		}
	}

	/// Whether the input for this shape may be absent
	pub fn is_optional(&self) -> bool {
		match self {
			Shape::Optional(_) | Shape::Default(..) => true,
			Shape::Lazy(lazy) => lazy.resolve().is_optional(),
			_ => false,
		}
	}

	/// Declared default value, looking through `optional`
	pub fn declared_default(&self) -> Option<&Value> {
		match self {
			Shape::Default(_, value) => Some(value),
			Shape::Optional(inner) => inner.declared_default(),
			_ => None,
		}
	}

	/// Strip `optional`/`default` wrappers and resolve lazy shapes
	pub fn unwrapped(self: &Arc<Self>) -> Arc<Shape> {
		let mut current = Arc::clone(self);
		loop {
			let next = match current.as_ref() {
				Shape::Optional(inner) | Shape::Default(inner, _) => Arc::clone(inner),
				Shape::Lazy(lazy) => lazy.resolve(),
				_ => return current,
			};
			current = next;
		}
	}

	/// Whether the path algebra treats this shape as an opaque leaf
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			Shape::String(_)
				| Shape::Number(_)
				| Shape::Boolean(_)
				| Shape::Date(_)
				| Shape::Enum(_)
				| Shape::Record(_)
				| Shape::Any
		)
	}

	/// Message configured for every issue raised by this shape, if any
	pub(crate) fn type_message(&self) -> Option<&str> {
		match self {
			Shape::String(s) => s.type_message.as_deref(),
			Shape::Number(n) => n.type_message.as_deref(),
			Shape::Boolean(b) => b.type_message.as_deref(),
			Shape::Date(d) => d.type_message.as_deref(),
			Shape::Enum(e) => e.message.as_deref(),
			_ => None,
		}
	}
}

/// Modifiers available on every shape builder
pub trait ShapeExt: Into<Shape> + Sized {
	/// Allow the value to be absent
	fn optional(self) -> Shape {
		Shape::Optional(Arc::new(self.into()))
	}

	/// Substitute `value` when the input is absent
	fn with_default(self, value: impl Into<Value>) -> Shape {
		Shape::Default(Arc::new(self.into()), value.into())
	}

	fn into_shape(self) -> Shape {
		self.into()
	}
}

impl<T: Into<Shape>> ShapeExt for T {}

pub fn string() -> StringShape {
	StringShape::new()
}

pub fn number() -> NumberShape {
	NumberShape::new()
}

pub fn boolean() -> BooleanShape {
	BooleanShape::new()
}

pub fn date() -> DateShape {
	DateShape::new()
}

/// String enumeration with a fixed option set
pub fn enumeration<I, S>(options: I) -> EnumShape
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	EnumShape::new(options)
}

/// String-keyed map whose values share one shape
pub fn record(value: impl Into<Shape>) -> RecordShape {
	RecordShape::new(value)
}

pub fn any() -> Shape {
	Shape::Any
}

pub fn object() -> ObjectShape {
	ObjectShape::new()
}

pub fn array(element: impl Into<Shape>) -> ArrayShape {
	ArrayShape::new(element)
}

pub fn union<I, S>(variants: I) -> UnionShape
where
	I: IntoIterator<Item = S>,
	S: Into<Shape>,
{
	UnionShape::new(variants)
}

/// Union of objects selected by the value of a shared literal field
pub fn discriminated_union<I>(discriminator: impl Into<String>, variants: I) -> DiscriminatedUnionShape
where
	I: IntoIterator<Item = ObjectShape>,
{
	DiscriminatedUnionShape::new(discriminator, variants)
}

/// Deferred shape; `f` runs once, on first use
pub fn lazy<F>(f: F) -> LazyShape
where
	F: Fn() -> Shape + Send + Sync + 'static,
{
	LazyShape::new(f)
}
