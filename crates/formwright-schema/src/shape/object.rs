//! Object shape and cross-field refinements

use super::{Predicate, Shape};
use crate::error::{SchemaError, SchemaResult};
use crate::path::{FieldPath, PathSegment};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// A rule over a whole object whose failure is reported at one path.
///
/// The target and dependencies are relative to the object the refinement
/// is attached to. An empty target reports the message as a form-level
/// error.
///
/// # Examples
///
/// ```
/// use formwright_schema::shape::Refinement;
///
/// let rule = Refinement::new("Passwords do not match", |data| {
///     data.get("password") == data.get("confirmPassword")
/// })
/// .at("confirmPassword")
/// .depends_on(["password", "confirmPassword"]);
///
/// assert_eq!(rule.target(), "confirmPassword");
/// assert_eq!(rule.dependencies().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Refinement {
	pub(crate) message: String,
	pub(crate) predicate: Predicate,
	pub(crate) target: String,
	pub(crate) depends_on: Vec<String>,
}

impl Refinement {
	pub fn new<F>(message: impl Into<String>, predicate: F) -> Self
	where
		F: Fn(&Value) -> bool + Send + Sync + 'static,
	{
		Self {
			message: message.into(),
			predicate: Predicate::new(predicate),
			target: String::new(),
			depends_on: Vec::new(),
		}
	}

	/// Path that receives the message when the rule fails
	pub fn at(mut self, target: impl Into<String>) -> Self {
		self.target = target.into();
		self
	}

	/// Fields the rule reads.
	///
	/// Incremental validation re-runs the rule only when one of these paths
	/// (or the target) changes. Without declared dependencies the rule runs
	/// on every change inside the object.
	pub fn depends_on<I, S>(mut self, paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.depends_on = paths.into_iter().map(Into::into).collect();
		self
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn target(&self) -> &str {
		&self.target
	}

	pub fn dependencies(&self) -> &[String] {
		&self.depends_on
	}

	pub(crate) fn target_path(&self) -> FieldPath {
		FieldPath::parse(&self.target).unwrap_or_default()
	}

	pub(crate) fn dependency_paths(&self) -> impl Iterator<Item = FieldPath> + '_ {
		self.depends_on
			.iter()
			.filter_map(|raw| FieldPath::parse(raw).ok())
	}

	pub(crate) fn holds(&self, value: &Value) -> bool {
		self.predicate.test(value)
	}

	/// First-level field names the rule touches, `None` if it reads the
	/// whole object
	fn top_level_fields(&self) -> Option<Vec<String>> {
		if self.depends_on.is_empty() {
			return None;
		}
		let mut names = Vec::new();
		let paths = std::iter::once(self.target_path()).chain(self.dependency_paths());
		for path in paths {
			if let Some(PathSegment::Key(name)) = path.segments().first() {
				names.push(name.clone());
			}
		}
		Some(names)
	}
}

/// Ordered record of named fields
#[derive(Debug, Clone, Default)]
pub struct ObjectShape {
	pub(crate) fields: IndexMap<String, Arc<Shape>>,
	pub(crate) refinements: Vec<Refinement>,
}

impl ObjectShape {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declare a field. Redeclaring a name replaces the earlier shape but
	/// keeps its position.
	pub fn field(mut self, name: impl Into<String>, shape: impl Into<Shape>) -> Self {
		self.fields.insert(name.into(), Arc::new(shape.into()));
		self
	}

	pub fn refine(mut self, refinement: Refinement) -> Self {
		self.refinements.push(refinement);
		self
	}

	pub fn fields(&self) -> impl Iterator<Item = (&str, &Arc<Shape>)> {
		self.fields.iter().map(|(name, shape)| (name.as_str(), shape))
	}

	pub fn get(&self, name: &str) -> Option<&Arc<Shape>> {
		self.fields.get(name)
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn refinements(&self) -> &[Refinement] {
		&self.refinements
	}

	/// Make every field optional
	pub fn partial(mut self) -> Self {
		for shape in self.fields.values_mut() {
			*shape = make_optional(shape);
		}
		self
	}

	/// Make the named fields optional
	///
	/// # Examples
	///
	/// ```
	/// use formwright_schema::shape;
	///
	/// let draft = shape::object()
	///     .field("name", shape::string())
	///     .field("price", shape::number())
	///     .partial_fields(["name"])
	///     .unwrap();
	/// assert!(draft.get("name").unwrap().is_optional());
	/// assert!(!draft.get("price").unwrap().is_optional());
	/// ```
	pub fn partial_fields<I, S>(mut self, names: I) -> SchemaResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for name in names {
			let name = name.as_ref();
			let shape = self
				.fields
				.get_mut(name)
				.ok_or_else(|| SchemaError::UnknownField {
					field: name.to_string(),
				})?;
			*shape = make_optional(shape);
		}
		Ok(self)
	}

	/// Keep only the named fields, in declaration order
	pub fn pick<I, S>(self, names: I) -> SchemaResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut keep = Vec::new();
		for name in names {
			let name = name.as_ref();
			if !self.fields.contains_key(name) {
				return Err(SchemaError::UnknownField {
					field: name.to_string(),
				});
			}
			keep.push(name.to_string());
		}
		Ok(self.retain_fields(|name| keep.iter().any(|k| k == name)))
	}

	/// Drop the named fields
	pub fn omit<I, S>(self, names: I) -> SchemaResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut drop = Vec::new();
		for name in names {
			let name = name.as_ref();
			if !self.fields.contains_key(name) {
				return Err(SchemaError::UnknownField {
					field: name.to_string(),
				});
			}
			drop.push(name.to_string());
		}
		Ok(self.retain_fields(|name| !drop.iter().any(|d| d == name)))
	}

	/// Add the fields and refinements of `other`; its fields win on
	/// name clashes
	pub fn extend(mut self, other: ObjectShape) -> Self {
		for (name, shape) in other.fields {
			self.fields.insert(name, shape);
		}
		self.refinements.extend(other.refinements);
		self
	}

	fn retain_fields(mut self, keep: impl Fn(&str) -> bool) -> Self {
		self.fields.retain(|name, _| keep(name));
		let fields = &self.fields;
		self.refinements.retain(|rule| match rule.top_level_fields() {
			Some(names) => names.iter().all(|name| fields.contains_key(name)),
			None => false,
		});
		self
	}
}

fn make_optional(shape: &Arc<Shape>) -> Arc<Shape> {
	if shape.is_optional() {
		Arc::clone(shape)
	} else {
		Arc::new(Shape::Optional(Arc::clone(shape)))
	}
}

impl From<ObjectShape> for Shape {
	fn from(shape: ObjectShape) -> Self {
		Shape::Object(shape)
	}
}
