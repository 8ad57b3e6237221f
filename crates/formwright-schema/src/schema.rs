//! The schema adapter: one immutable root shape plus the operations forms
//! need from it

use crate::constraint::{Constraint, constraint_for};
use crate::defaults::{default_for, initial_for};
use crate::error::{SchemaError, SchemaResult};
use crate::form_data::FormData;
use crate::issue::ErrorMap;
use crate::path::{FieldPath, resolve_path_value};
use crate::paths::{DEFAULT_MAX_DEPTH, derive_paths, resolve_path_type};
use crate::shape::{DiscriminatedUnionShape, ObjectShape, Refinement, Shape};
use crate::validate::{Engine, PathValidation, Submission, Validation};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct SchemaInner {
	root: Arc<Shape>,
	error_map: Option<ErrorMap>,
	paths: Vec<FieldPath>,
}

/// A validated, shareable form schema.
///
/// Cloning is cheap; clones share the same shape tree. A schema never
/// changes after construction, so any number of form instances can use it
/// at once.
///
/// # Examples
///
/// ```
/// use formwright_schema::{Schema, ShapeExt, shape};
/// use serde_json::json;
///
/// let schema = Schema::new(
///     shape::object()
///         .field("name", shape::string().min(1, "Enter a name"))
///         .field("age", shape::number().int("Whole years only").optional()),
/// )
/// .unwrap();
///
/// assert!(schema.validate(&json!({"name": "Ada", "age": "36"})).is_success());
/// assert_eq!(
///     schema.validate(&json!({"age": 3.5})).errors_at("age"),
///     ["Whole years only".to_string()]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
	inner: Arc<SchemaInner>,
}

impl Schema {
	/// Check the shape and derive its paths.
	///
	/// The root must be an object, a union of objects or a discriminated
	/// union. Discriminated unions need an enumeration discriminator in
	/// every variant with no tag shared between variants, and refinement
	/// targets and dependencies must resolve inside their object.
	pub fn new(shape: impl Into<Shape>) -> SchemaResult<Self> {
		let root = Arc::new(shape.into());
		check_root(&root)?;
		let mut visited = HashSet::new();
		check_shape(&root, DEFAULT_MAX_DEPTH, &mut visited)?;
		let paths = derive_paths(&root, DEFAULT_MAX_DEPTH);
		tracing::debug!(paths = paths.len(), "Schema built");
		Ok(Self {
			inner: Arc::new(SchemaInner {
				root,
				error_map: None,
				paths,
			}),
		})
	}

	/// Attach a message override hook
	pub fn with_error_map(self, error_map: ErrorMap) -> Self {
		let mut inner = (*self.inner).clone();
		inner.error_map = Some(error_map);
		Self {
			inner: Arc::new(inner),
		}
	}

	pub fn shape(&self) -> &Arc<Shape> {
		&self.inner.root
	}

	pub fn error_map(&self) -> Option<&ErrorMap> {
		self.inner.error_map.as_ref()
	}

	/// Every path derived with the default depth bound
	pub fn paths(&self) -> &[FieldPath] {
		&self.inner.paths
	}

	pub fn paths_with_depth(&self, max_depth: usize) -> Vec<FieldPath> {
		derive_paths(&self.inner.root, max_depth)
	}

	/// Shape at a path; concrete indices are accepted
	pub fn resolve(&self, path: &FieldPath) -> Option<Arc<Shape>> {
		resolve_path_type(&self.inner.root, path)
	}

	pub fn contains(&self, path: &FieldPath) -> bool {
		self.resolve(path).is_some()
	}

	/// Whether the path addresses a list field
	pub fn is_list(&self, path: &FieldPath) -> bool {
		self.resolve(path)
			.is_some_and(|shape| matches!(shape.unwrapped().as_ref(), Shape::Array(_)))
	}

	/// Validate a whole value tree, returning the coerced output and all issues
	pub fn safe_parse(&self, value: &Value) -> Validation {
		self.engine().run(&self.inner.root, Some(value), &FieldPath::root())
	}

	pub fn validate(&self, value: &Value) -> Submission {
		self.safe_parse(value).into_submission()
	}

	pub fn validate_form_data(&self, data: &FormData) -> Submission {
		self.validate(&data.parse())
	}

	/// Revalidate after a change at `path`.
	///
	/// Reports the errors under `path` together with the errors of every
	/// path targeted by a refinement that reads `path`. A path outside the
	/// schema yields an empty result.
	///
	/// # Examples
	///
	/// ```
	/// use formwright_schema::{FieldPath, Schema, shape, shape::Refinement};
	/// use serde_json::json;
	///
	/// let schema = Schema::new(
	///     shape::object()
	///         .field("password", shape::string().min(8, "Too short"))
	///         .field("confirm", shape::string())
	///         .field("nickname", shape::string())
	///         .refine(
	///             Refinement::new("Passwords differ", |v| v.get("password") == v.get("confirm"))
	///                 .at("confirm")
	///                 .depends_on(["password", "confirm"]),
	///         ),
	/// )
	/// .unwrap();
	///
	/// let value = json!({"password": "short", "confirm": "other"});
	/// let result = schema.validate_path(&value, &FieldPath::parse("password").unwrap());
	/// assert_eq!(result.errors_at(&FieldPath::parse("password").unwrap()), ["Too short".to_string()]);
	/// assert_eq!(result.errors_at(&FieldPath::parse("confirm").unwrap()), ["Passwords differ".to_string()]);
	/// // untouched fields are not reported
	/// assert!(result.errors_at(&FieldPath::parse("nickname").unwrap()).is_empty());
	/// ```
	pub fn validate_path(&self, value: &Value, path: &FieldPath) -> PathValidation {
		if !self.contains(path) {
			return PathValidation::default();
		}

		let mut targets: Vec<FieldPath> = Vec::new();
		let mut top = path.clone();
		let mut ancestor = path.parent();
		while let Some(prefix) = ancestor {
			for rule in self.refinements_at(value, &prefix) {
				let target = prefix.join(&rule.target_path());
				let reads_path = rule.dependencies().is_empty()
					|| related(&target, path)
					|| rule
						.dependency_paths()
						.any(|dependency| related(&prefix.join(&dependency), path));
				if !reads_path {
					continue;
				}
				top = prefix.clone();
				if !target.starts_with(path) && !targets.contains(&target) {
					targets.push(target);
				}
			}
			ancestor = prefix.parent();
		}

		let Some(shape) = self.resolve(&top) else {
			return PathValidation::default();
		};
		let input = resolve_path_value(value, &top);
		let validation = self.engine().run(&shape, input, &top);

		let mut errors: IndexMap<FieldPath, Vec<String>> = IndexMap::new();
		for issue in validation.issues {
			if issue.path.starts_with(path) || targets.contains(&issue.path) {
				errors.entry(issue.path).or_default().push(issue.message);
			}
		}
		PathValidation {
			path: path.clone(),
			targets,
			errors,
		}
	}

	/// Input hints for one path. Concrete indices are normalized to the
	/// `[number]` placeholder; unknown paths yield an empty constraint.
	pub fn constraint(&self, path: &FieldPath) -> Constraint {
		self.resolve(&path.normalized())
			.map(|shape| constraint_for(&shape))
			.unwrap_or_default()
	}

	/// Input hints for every derived path, keyed by path string
	pub fn constraints(&self) -> IndexMap<String, Constraint> {
		self.paths()
			.iter()
			.filter_map(|path| {
				let shape = self.resolve(path)?;
				Some((path.to_string(), constraint_for(&shape)))
			})
			.collect()
	}

	/// Declared default at a path, or the zero value if the path is optional
	pub fn default_value(&self, path: &FieldPath) -> Option<Value> {
		self.resolve(path).and_then(|shape| default_for(&shape))
	}

	/// Value tree a new or reset form starts from
	pub fn initial_value(&self) -> Value {
		initial_for(&self.inner.root).unwrap_or_else(|| Value::Object(Default::default()))
	}

	/// Whether two handles share the same shape tree
	pub fn ptr_eq(a: &Schema, b: &Schema) -> bool {
		Arc::ptr_eq(&a.inner, &b.inner)
	}

	fn engine(&self) -> Engine<'_> {
		Engine::new(self.inner.error_map.as_ref())
	}

	/// Refinements of the object found at `prefix`, choosing union
	/// variants by the current value
	fn refinements_at(&self, value: &Value, prefix: &FieldPath) -> Vec<Refinement> {
		let Some(shape) = self.resolve(prefix) else {
			return Vec::new();
		};
		let here = resolve_path_value(value, prefix);
		let shape = shape.unwrapped();
		match shape.as_ref() {
			Shape::Object(object) => object.refinements().to_vec(),
			Shape::DiscriminatedUnion(union) => here
				.and_then(|v| v.get(union.discriminator()))
				.and_then(Value::as_str)
				.and_then(|tag| union.variant_for(tag))
				.map(|variant| variant.refinements().to_vec())
				.unwrap_or_default(),
			Shape::Union(union) => union
				.variants()
				.iter()
				.filter_map(|variant| match variant.unwrapped().as_ref() {
					Shape::Object(object) => Some(object.refinements().to_vec()),
					_ => None,
				})
				.flatten()
				.collect(),
			_ => Vec::new(),
		}
	}
}

fn related(a: &FieldPath, b: &FieldPath) -> bool {
	a.starts_with(b) || b.starts_with(a)
}

fn check_root(root: &Arc<Shape>) -> SchemaResult<()> {
	let inner = root.unwrapped();
	match inner.as_ref() {
		Shape::Object(_) | Shape::DiscriminatedUnion(_) => Ok(()),
		Shape::Union(union) => {
			for variant in union.variants() {
				let variant = variant.unwrapped();
				if !matches!(variant.as_ref(), Shape::Object(_)) {
					return Err(SchemaError::InvalidRoot {
						kind: variant.kind(),
					});
				}
			}
			Ok(())
		}
		other => Err(SchemaError::InvalidRoot { kind: other.kind() }),
	}
}

/// Structural checks over the whole tree. Lazy shapes are expanded at
/// most `depth` levels deep and each distinct shape node once.
fn check_shape(
	shape: &Arc<Shape>,
	depth: usize,
	visited: &mut HashSet<*const Shape>,
) -> SchemaResult<()> {
	if depth == 0 || !visited.insert(Arc::as_ptr(shape)) {
		return Ok(());
	}
	match shape.as_ref() {
		Shape::Optional(inner) | Shape::Default(inner, _) => check_shape(inner, depth, visited),
		Shape::Lazy(lazy) => check_shape(&lazy.resolve(), depth - 1, visited),
		Shape::Object(object) => check_object(object, depth, visited),
		Shape::Array(array) => check_shape(array.element(), depth - 1, visited),
		Shape::Record(record) => check_shape(record.value_shape(), depth - 1, visited),
		Shape::Union(union) => {
			for variant in union.variants() {
				check_shape(variant, depth, visited)?;
			}
			Ok(())
		}
		Shape::DiscriminatedUnion(union) => {
			check_discriminators(union)?;
			for variant in union.variants() {
				check_object(variant, depth, visited)?;
			}
			Ok(())
		}
		_ => Ok(()),
	}
}

fn check_object(
	object: &ObjectShape,
	depth: usize,
	visited: &mut HashSet<*const Shape>,
) -> SchemaResult<()> {
	let as_shape = Arc::new(Shape::Object(object.clone()));
	for rule in object.refinements() {
		let raw_paths = std::iter::once(rule.target()).chain(rule.dependencies().iter().map(String::as_str));
		for raw in raw_paths {
			let path = FieldPath::parse(raw)?;
			if resolve_path_type(&as_shape, &path).is_none() {
				return Err(SchemaError::UnknownRefinementTarget {
					target: raw.to_string(),
				});
			}
		}
	}
	for (_, child) in object.fields() {
		check_shape(child, depth - 1, visited)?;
	}
	Ok(())
}

fn check_discriminators(union: &DiscriminatedUnionShape) -> SchemaResult<()> {
	let mut seen = HashSet::new();
	for (index, variant) in union.variants().iter().enumerate() {
		let tags = union.tags(variant);
		if tags.is_empty() {
			return Err(SchemaError::MissingDiscriminator {
				discriminator: union.discriminator().to_string(),
				variant: index,
			});
		}
		for tag in tags {
			if !seen.insert(tag.clone()) {
				return Err(SchemaError::DuplicateDiscriminator { value: tag });
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::shape::{self, ShapeExt};
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn contact() -> Schema {
		Schema::new(
			shape::object()
				.field("email", shape::string().email("Invalid email"))
				.field("phoneNumber", shape::string().optional())
				.field(
					"preferredContactMethod",
					shape::enumeration(["email", "phone"]).with_default("email"),
				)
				.field("nickname", shape::string().min(2, "Too short").optional())
				.refine(
					Refinement::new("Phone number required", |v| {
						v.get("preferredContactMethod") != Some(&json!("phone"))
							|| v.get("phoneNumber").is_some()
					})
					.at("phoneNumber")
					.depends_on(["preferredContactMethod", "phoneNumber"]),
				),
		)
		.unwrap()
	}

	fn path(raw: &str) -> FieldPath {
		FieldPath::parse(raw).unwrap()
	}

	#[rstest]
	#[case(shape::string().into_shape(), "string")]
	#[case(shape::array(shape::object()).into_shape(), "array")]
	#[case(shape::union([shape::object().into_shape(), shape::number().into_shape()]).into_shape(), "number")]
	fn test_rejects_non_object_roots(#[case] root: Shape, #[case] kind: &'static str) {
		assert_eq!(Schema::new(root).unwrap_err(), SchemaError::InvalidRoot { kind });
	}

	#[rstest]
	fn test_rejects_unknown_refinement_target() {
		let err = Schema::new(
			shape::object()
				.field("a", shape::string())
				.refine(Refinement::new("x", |_| true).at("b")),
		)
		.unwrap_err();
		assert_eq!(
			err,
			SchemaError::UnknownRefinementTarget {
				target: "b".to_string()
			}
		);
	}

	#[rstest]
	fn test_rejects_bad_discriminators() {
		let missing = shape::discriminated_union(
			"kind",
			[shape::object().field("kind", shape::string())],
		);
		assert!(matches!(
			Schema::new(missing),
			Err(SchemaError::MissingDiscriminator { variant: 0, .. })
		));

		let duplicated = shape::discriminated_union(
			"kind",
			[
				shape::object().field("kind", shape::enumeration(["a"])),
				shape::object().field("kind", shape::enumeration(["b", "a"])),
			],
		);
		assert_eq!(
			Schema::new(duplicated).unwrap_err(),
			SchemaError::DuplicateDiscriminator {
				value: "a".to_string()
			}
		);
	}

	#[rstest]
	fn test_self_referential_schema_builds() {
		fn category() -> Shape {
			shape::object()
				.field("name", shape::string())
				.field("children", shape::array(shape::lazy(category)))
				.into_shape()
		}
		let schema = Schema::new(category()).unwrap();
		assert!(schema.contains(&path("children[0].children[1].name")));
		assert!(schema.paths().iter().all(|p| p.len() <= DEFAULT_MAX_DEPTH));
	}

	#[rstest]
	fn test_validate_path_reruns_dependent_refinement(contact: Schema) {
		let value = json!({"email": "taro@example.com", "preferredContactMethod": "phone"});
		let result = contact.validate_path(&value, &path("preferredContactMethod"));
		assert_eq!(result.targets, vec![path("phoneNumber")]);
		assert_eq!(
			result.errors_at(&path("phoneNumber")),
			["Phone number required".to_string()]
		);
		assert!(result.covers(&path("phoneNumber")));
		assert!(!result.covers(&path("email")));
	}

	#[rstest]
	fn test_validate_path_ignores_unrelated_refinements(contact: Schema) {
		let value = json!({"preferredContactMethod": "phone", "nickname": "x"});
		let result = contact.validate_path(&value, &path("nickname"));
		assert!(result.targets.is_empty());
		assert_eq!(result.errors.len(), 1);
		assert_eq!(result.errors_at(&path("nickname")), ["Too short".to_string()]);
	}

	#[rstest]
	fn test_validate_path_outside_schema_is_empty(contact: Schema) {
		let result = contact.validate_path(&json!({}), &path("nope"));
		assert_eq!(result, PathValidation::default());
	}

	#[rstest]
	fn test_constraint_normalizes_indices() {
		let schema = Schema::new(
			shape::object().field(
				"tags",
				shape::array(shape::string().max(20, "Too long")).max(10, "Too many"),
			),
		)
		.unwrap();
		assert_eq!(schema.constraint(&path("tags[3]")).max_length, Some(20));
		assert!(schema.constraint(&path("missing")).is_empty());
		assert_eq!(
			schema.constraints().keys().collect::<Vec<_>>(),
			vec!["tags", "tags[number]"]
		);
	}

	#[rstest]
	fn test_defaults(contact: Schema) {
		assert_eq!(
			contact.default_value(&path("preferredContactMethod")),
			Some(json!("email"))
		);
		assert_eq!(contact.default_value(&path("phoneNumber")), Some(json!("")));
		assert_eq!(contact.default_value(&path("email")), None);
		assert_eq!(
			contact.initial_value(),
			json!({"preferredContactMethod": "email"})
		);
	}

	#[rstest]
	fn test_with_error_map_does_not_touch_original(contact: Schema) {
		let mapped = contact
			.clone()
			.with_error_map(ErrorMap::new(|_, _| Some("必須".to_string())));
		assert!(!Schema::ptr_eq(&contact, &mapped));
		assert_eq!(mapped.validate(&json!({})).errors_at("email"), ["必須".to_string()]);
		assert_eq!(contact.validate(&json!({})).errors_at("email"), ["Required".to_string()]);
	}
}
