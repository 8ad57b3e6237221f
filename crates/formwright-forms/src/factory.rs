//! The form factory
//!
//! [`create_form`] binds one schema to one form name and hands back a
//! [`FormKit`]: the set of entry points a concrete form is built from.
//!
//! ```text
//! create_form::<Contact>(schema, "Contact")
//!   ├─ use_form(options)        → FormInstance<Contact>      (useContactForm)
//!   ├─ use_field(&form, &path)  → FieldHandle<Contact>       (useContactField)
//!   ├─ use_form_metadata(&form) → FormMetadata               (useContactFormMetadata)
//!   └─ form_root(&form)         → FormRoot<Contact>          (ContactForm)
//! ```
//!
//! Accessors take the owning instance explicitly, so two instances of the
//! same kit, or instances of different kits, never see each other's state.

use crate::config::FormOptions;
use crate::error::{FormError, FormResult};
use crate::field::FieldHandle;
use crate::metadata::FormMetadata;
use crate::root::FormRoot;
use crate::store::FormInstance;
use formwright_schema::{FieldPath, PathSegment, Schema};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Names of the four bindings a kit provides
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingNames {
	pub use_form: String,
	pub use_field: String,
	pub form_root: String,
	pub use_form_metadata: String,
}

impl BindingNames {
	fn for_form(name: &str) -> Self {
		Self {
			use_form: format!("use{}Form", name),
			use_field: format!("use{}Field", name),
			form_root: format!("{}Form", name),
			use_form_metadata: format!("use{}FormMetadata", name),
		}
	}
}

/// A field path checked against the schema of the form modelled by `T`.
///
/// Only [`FormKit::path`] and [`FormKit::paths`] create these. The type
/// parameter ties a path to the model type, not to one kit: a
/// `SchemaPath<Contact>` is rejected by accessors of other models, while
/// two kits built over the same `T` accept each other's paths.
pub struct SchemaPath<T> {
	path: FieldPath,
	_model: PhantomData<fn() -> T>,
}

impl<T> SchemaPath<T> {
	fn new(path: FieldPath) -> Self {
		Self {
			path,
			_model: PhantomData,
		}
	}

	pub fn as_path(&self) -> &FieldPath {
		&self.path
	}

	pub fn has_placeholder(&self) -> bool {
		self.path.has_placeholder()
	}

	/// Fill the `[number]` placeholders left to right with `indices`.
	///
	/// Extra indices are ignored; placeholders without an index stay.
	///
	/// # Examples
	///
	/// ```
	/// use formwright_forms::create_form;
	/// use formwright_schema::{Schema, shape};
	/// use serde_json::Value;
	///
	/// let member = shape::object().field("email", shape::string());
	/// let team = shape::object().field("members", shape::array(member));
	/// let schema = Schema::new(shape::object().field("teams", shape::array(team))).unwrap();
	/// let kit = create_form::<Value>(schema, "Org").unwrap();
	///
	/// let pattern = kit.path("teams[number].members[number].email").unwrap();
	/// assert_eq!(pattern.at(&[2, 0]).to_string(), "teams[2].members[0].email");
	/// ```
	pub fn at(&self, indices: &[usize]) -> Self {
		let mut remaining = indices.iter();
		let segments = self
			.path
			.segments()
			.iter()
			.map(|segment| match segment {
				PathSegment::AnyIndex => remaining
					.next()
					.map(|index| PathSegment::Index(*index))
					.unwrap_or(PathSegment::AnyIndex),
				other => other.clone(),
			})
			.collect();
		Self::new(FieldPath::from_segments(segments))
	}
}

impl<T> Clone for SchemaPath<T> {
	fn clone(&self) -> Self {
		Self::new(self.path.clone())
	}
}

impl<T> PartialEq for SchemaPath<T> {
	fn eq(&self, other: &Self) -> bool {
		self.path == other.path
	}
}

impl<T> Eq for SchemaPath<T> {}

impl<T> Hash for SchemaPath<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.path.hash(state);
	}
}

impl<T> fmt::Debug for SchemaPath<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SchemaPath").field(&self.path.to_string()).finish()
	}
}

impl<T> fmt::Display for SchemaPath<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.path, f)
	}
}

impl<T> AsRef<FieldPath> for SchemaPath<T> {
	fn as_ref(&self) -> &FieldPath {
		&self.path
	}
}

/// Everything needed to build forms of one schema under one name
pub struct FormKit<T> {
	name: String,
	schema: Schema,
	bindings: BindingNames,
	_model: PhantomData<fn() -> T>,
}

impl<T> Clone for FormKit<T> {
	fn clone(&self) -> Self {
		Self {
			name: self.name.clone(),
			schema: self.schema.clone(),
			bindings: self.bindings.clone(),
			_model: PhantomData,
		}
	}
}

impl<T> fmt::Debug for FormKit<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormKit")
			.field("name", &self.name)
			.field("paths", &self.schema.paths().len())
			.finish()
	}
}

/// Bind `schema` to the form name `name`.
///
/// The name must be a non-empty ASCII identifier starting with an
/// uppercase letter, since it becomes part of the binding names.
///
/// # Examples
///
/// ```
/// use formwright_forms::create_form;
/// use formwright_schema::{Schema, shape};
/// use serde_json::Value;
///
/// let schema = Schema::new(shape::object().field("email", shape::string())).unwrap();
/// let kit = create_form::<Value>(schema.clone(), "Contact").unwrap();
/// assert_eq!(kit.binding_names().use_field, "useContactField");
///
/// assert!(create_form::<Value>(schema.clone(), "contact").is_err());
/// assert!(create_form::<Value>(schema, "Contact Form").is_err());
/// ```
pub fn create_form<T>(schema: Schema, name: &str) -> FormResult<FormKit<T>> {
	check_name(name)?;
	tracing::debug!(form = name, paths = schema.paths().len(), "Form kit created");
	Ok(FormKit {
		name: name.to_string(),
		bindings: BindingNames::for_form(name),
		schema,
		_model: PhantomData,
	})
}

fn check_name(name: &str) -> FormResult<()> {
	let invalid = |reason| {
		Err(FormError::InvalidName {
			name: name.to_string(),
			reason,
		})
	};
	let Some(first) = name.chars().next() else {
		return invalid("name is empty");
	};
	if !first.is_ascii_uppercase() {
		return invalid("name must start with an uppercase ASCII letter");
	}
	if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
		return invalid("name may only contain ASCII letters, digits and underscores");
	}
	Ok(())
}

impl<T> FormKit<T> {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn binding_names(&self) -> &BindingNames {
		&self.bindings
	}

	/// Check a path against the schema. Concrete indices and `[number]`
	/// placeholders are both accepted.
	pub fn path(&self, path: &str) -> FormResult<SchemaPath<T>> {
		let parsed = FieldPath::parse(path)?;
		if !self.schema.contains(&parsed) {
			return Err(FormError::UnknownPath {
				form: self.name.clone(),
				path: path.to_string(),
			});
		}
		Ok(SchemaPath::new(parsed))
	}

	/// Every derived path of the schema
	pub fn paths(&self) -> Vec<SchemaPath<T>> {
		self.schema
			.paths()
			.iter()
			.cloned()
			.map(SchemaPath::new)
			.collect()
	}

	/// Create a form instance. Its DOM id is `options.id`, else the kit name.
	pub fn use_form(&self, options: FormOptions) -> FormInstance<T> {
		let id = options.id.clone().unwrap_or_else(|| self.name.clone());
		FormInstance::new(self.schema.clone(), id, options)
	}

	/// Handle for a checked path. Paths with placeholders read as empty
	/// until instantiated with [`SchemaPath::at`].
	pub fn use_field(&self, form: &FormInstance<T>, path: &SchemaPath<T>) -> FieldHandle<T> {
		self.assert_owner(form);
		FieldHandle::new(form.clone(), path.path.clone())
	}

	/// Handle for an unchecked path string.
	///
	/// Unknown or unparsable paths never panic: reads come back empty and
	/// writes are logged and ignored.
	pub fn use_field_dynamic(&self, form: &FormInstance<T>, path: &str) -> FieldHandle<T> {
		self.assert_owner(form);
		FieldHandle::dynamic(form.clone(), path)
	}

	pub fn use_form_metadata(&self, form: &FormInstance<T>) -> FormMetadata {
		self.assert_owner(form);
		FormMetadata::capture(form)
	}

	pub fn form_root(&self, form: &FormInstance<T>) -> FormRoot<T> {
		self.assert_owner(form);
		FormRoot::new(form.clone())
	}

	fn assert_owner(&self, form: &FormInstance<T>) {
		if !Schema::ptr_eq(&self.schema, &form.schema()) {
			tracing::warn!(
				form = %form.id(),
				kit = %self.name,
				"Form instance was not created by this kit"
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use formwright_schema::shape;
	use rstest::{fixture, rstest};
	use serde::Deserialize;
	use serde_json::json;
	use std::cell::RefCell;
	use std::rc::Rc;

	#[derive(Debug, Deserialize, PartialEq)]
	struct Team {
		name: String,
		members: Vec<Member>,
	}

	#[derive(Debug, Deserialize, PartialEq)]
	struct Member {
		email: String,
	}

	#[fixture]
	fn kit() -> FormKit<Team> {
		let member = shape::object().field("email", shape::string().email("Invalid email"));
		let schema = Schema::new(
			shape::object()
				.field("name", shape::string().min(1, "Enter a name"))
				.field("members", shape::array(member)),
		)
		.unwrap();
		create_form(schema, "Team").unwrap()
	}

	#[rstest]
	#[case("", "name is empty")]
	#[case("team", "name must start with an uppercase ASCII letter")]
	#[case("Täm", "name may only contain ASCII letters, digits and underscores")]
	#[case("Team-Form", "name may only contain ASCII letters, digits and underscores")]
	fn test_invalid_names(kit: FormKit<Team>, #[case] name: &str, #[case] expected: &str) {
		match create_form::<Team>(kit.schema().clone(), name) {
			Err(FormError::InvalidName { reason, .. }) => assert_eq!(reason, expected),
			other => panic!("unexpected result: {:?}", other.map(|kit| kit.name().to_string())),
		}
	}

	#[rstest]
	fn test_binding_names_are_scoped_by_name(kit: FormKit<Team>) {
		let other = create_form::<Team>(kit.schema().clone(), "Invite").unwrap();
		assert_eq!(
			kit.binding_names(),
			&BindingNames {
				use_form: "useTeamForm".into(),
				use_field: "useTeamField".into(),
				form_root: "TeamForm".into(),
				use_form_metadata: "useTeamFormMetadata".into(),
			}
		);
		assert_ne!(kit.binding_names().use_form, other.binding_names().use_form);
	}

	#[rstest]
	fn test_paths_are_shared_by_kits_of_one_model(kit: FormKit<Team>) {
		let other = create_form::<Team>(kit.schema().clone(), "Invite").unwrap();
		let form = other.use_form(FormOptions::default());
		let name = kit.path("name").unwrap();
		other.use_field(&form, &name).on_change("Rustaceans");
		assert_eq!(form.value()["name"], json!("Rustaceans"));
	}

	#[rstest]
	fn test_checked_paths(kit: FormKit<Team>) {
		assert!(kit.path("members[number].email").is_ok());
		assert!(kit.path("members[3].email").is_ok());
		assert!(matches!(kit.path("members.email"), Err(FormError::UnknownPath { .. })));
		assert!(matches!(kit.path("members[x]"), Err(FormError::Path(_))));
		let listed: Vec<String> = kit.paths().iter().map(ToString::to_string).collect();
		assert_eq!(listed, ["name", "members", "members[number]", "members[number].email"]);
	}

	#[rstest]
	fn test_instances_of_one_kit_are_isolated(kit: FormKit<Team>) {
		let first = kit.use_form(FormOptions::default());
		let second = kit.use_form(FormOptions::new().with_id("team-2"));
		let name = kit.path("name").unwrap();
		kit.use_field(&first, &name).on_change("Core");
		assert_eq!(kit.use_field(&first, &name).value(), Some(json!("Core")));
		assert_eq!(kit.use_field(&second, &name).value(), None);
		assert_eq!(kit.use_field(&first, &name).id(), "Team-name");
		assert_eq!(kit.use_field(&second, &name).id(), "team-2-name");
	}

	#[rstest]
	fn test_typed_submit(kit: FormKit<Team>) {
		let form = kit.use_form(FormOptions::default());
		let received = Rc::new(RefCell::new(None));
		let sink = Rc::clone(&received);
		form.on_submit(move |team: Team| *sink.borrow_mut() = Some(team));

		let members = kit.use_field(&form, &kit.path("members").unwrap());
		members.append(Some(json!({"email": "ada@example.com"})));
		kit.use_field(&form, &kit.path("name").unwrap()).on_change("Core");
		form.submit();

		assert_eq!(
			received.borrow_mut().take(),
			Some(Team {
				name: "Core".into(),
				members: vec![Member {
					email: "ada@example.com".into()
				}],
			})
		);
	}

	#[rstest]
	fn test_dynamic_escape_hatch(kit: FormKit<Team>) {
		let form = kit.use_form(FormOptions::default());
		let field = kit.use_field_dynamic(&form, "members[0].email");
		field.on_change("x@y.io");
		assert_eq!(form.value(), json!({"members": [{"email": "x@y.io"}]}));

		let unknown = kit.use_field_dynamic(&form, "nickname");
		unknown.on_change("ignored");
		assert_eq!(unknown.value(), None);
	}

	#[rstest]
	fn test_placeholder_paths_instantiate(kit: FormKit<Team>) {
		let pattern = kit.path("members[number].email").unwrap();
		assert!(pattern.has_placeholder());
		let concrete = pattern.at(&[1]);
		assert_eq!(concrete, kit.path("members[1].email").unwrap());
		assert!(!concrete.has_placeholder());
	}
}
