//! Form state store
//!
//! One [`FormInstance`] owns the mutable state of one in-progress form:
//! the value tree, the path-keyed error map, list identity keys and the
//! submission status. Field handles and the metadata view are cheap views
//! over it.
//!
//! ## Lifecycle
//!
//! ```text
//! set_value / touch ──► incremental validation (per trigger policy)
//! insert / remove / reorder ──► value + keys + errors shift together
//! submit ──► validating ──► success (callback) | error (all errors stored)
//! reset ──► initial value, no errors, idle
//! ```

use crate::config::{FieldEvent, FormOptions};
use crate::status::{FormStatus, SubmitOutcome};
use formwright_schema::{
	FieldPath, PathSegment, PathValidation, Schema, Submission, remove_path_value,
	resolve_path_value, resolve_path_value_mut, set_path_value,
};
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

/// Stable identity of one list item.
///
/// Keys are issued from a per-instance counter and never reused, so an
/// item keeps its key while its index shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemKey(u64);

impl ItemKey {
	pub fn get(&self) -> u64 {
		self.0
	}
}

impl fmt::Display for ItemKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "k{}", self.0)
	}
}

/// Point-in-time copy of the observable state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSnapshot {
	pub status: FormStatus,
	pub value: Value,
	pub errors: IndexMap<String, Vec<String>>,
	pub dirty: bool,
}

#[derive(Debug)]
struct FormState {
	id: String,
	schema: Schema,
	options: FormOptions,
	initial: Value,
	value: Value,
	/// Messages per path; the root path holds form-level errors
	errors: IndexMap<FieldPath, Vec<String>>,
	validated: BTreeSet<FieldPath>,
	submitted: bool,
	status: FormStatus,
	list_keys: HashMap<FieldPath, Vec<ItemKey>>,
	next_key: u64,
}

/// Where an error, validated flag or key entry lands after a list shift
enum Remap {
	Keep,
	Drop,
	Move(FieldPath),
}

impl FormState {
	fn new(schema: Schema, id: String, options: FormOptions) -> Self {
		let initial = options
			.default_value
			.clone()
			.unwrap_or_else(|| schema.initial_value());
		Self {
			id,
			schema,
			options,
			value: initial.clone(),
			initial,
			errors: IndexMap::new(),
			validated: BTreeSet::new(),
			submitted: false,
			status: FormStatus::Idle,
			list_keys: HashMap::new(),
			next_key: 0,
		}
	}

	fn set_status(&mut self, status: FormStatus) {
		if self.status != status {
			tracing::debug!(form = %self.id, from = %self.status, to = %status, "Form status changed");
			self.status = status;
		}
	}

	/// Concrete paths inside the schema pass; anything else is logged
	fn accepts(&self, path: &FieldPath, operation: &'static str) -> bool {
		if path.has_placeholder() || !self.schema.contains(path) {
			tracing::warn!(
				form = %self.id,
				path = %path,
				operation,
				"Ignoring operation on a path outside the form schema"
			);
			return false;
		}
		true
	}

	fn accepts_list(&self, path: &FieldPath, operation: &'static str) -> bool {
		if !self.accepts(path, operation) {
			return false;
		}
		if !self.schema.is_list(path) {
			tracing::warn!(form = %self.id, path = %path, operation, "Path is not a list field");
			return false;
		}
		true
	}

	fn write(&mut self, path: &FieldPath, value: Option<Value>) -> bool {
		let written = match value {
			Some(value) => set_path_value(&mut self.value, path, value),
			None => {
				remove_path_value(&mut self.value, path);
				Ok(())
			}
		};
		if let Err(err) = written {
			tracing::warn!(form = %self.id, path = %path, error = %err, "Failed to write field value");
			return false;
		}
		// Replacing a list wholesale issues fresh keys for it
		self.list_keys.retain(|list, _| !list.starts_with(path));
		true
	}

	fn set_value(&mut self, path: &FieldPath, value: Value, event: Option<FieldEvent>) {
		if !self.accepts(path, "set_value") || !self.write(path, Some(value)) {
			return;
		}
		if let Some(event) = event {
			self.field_event(path, event);
		}
	}

	fn field_event(&mut self, path: &FieldPath, event: FieldEvent) {
		let trigger = if self.is_validated(path) {
			self.options.revalidation_trigger()
		} else {
			self.options.validate_on
		};
		if trigger.fires_on(event) {
			self.validate_path(path);
		}
	}

	fn is_validated(&self, path: &FieldPath) -> bool {
		self.submitted || self.validated.iter().any(|done| path.starts_with(done))
	}

	fn validate_path(&mut self, path: &FieldPath) {
		if !self.accepts(path, "validate") {
			return;
		}
		let result = self.schema.validate_path(&self.value, path);
		tracing::trace!(form = %self.id, path = %path, errors = result.errors.len(), "Field validated");
		self.apply(result);
		self.validated.insert(path.clone());
	}

	fn apply(&mut self, result: PathValidation) {
		self.errors.retain(|key, _| !result.covers(key));
		for (path, messages) in result.errors {
			if !messages.is_empty() {
				self.errors.insert(path, messages);
			}
		}
	}

	fn reset_field(&mut self, path: &FieldPath) {
		if !self.accepts(path, "reset_field") {
			return;
		}
		let initial = resolve_path_value(&self.initial, path).cloned();
		if !self.write(path, initial) {
			return;
		}
		self.errors.retain(|key, _| !key.starts_with(path));
		self.validated.retain(|done| !done.starts_with(path));
		tracing::debug!(form = %self.id, path = %path, "Field reset");
	}

	fn reset(&mut self) {
		self.value = self.initial.clone();
		self.errors.clear();
		self.validated.clear();
		self.submitted = false;
		self.list_keys.clear();
		self.set_status(FormStatus::Idle);
		tracing::debug!(form = %self.id, "Form reset");
	}

	/// Keys for the list at `path`, issued or retired to match its length
	fn keys(&mut self, path: &FieldPath) -> Vec<ItemKey> {
		let len = resolve_path_value(&self.value, path)
			.and_then(Value::as_array)
			.map_or(0, Vec::len);
		let keys = self.list_keys.entry(path.clone()).or_default();
		while keys.len() < len {
			let key = ItemKey(self.next_key);
			self.next_key += 1;
			tracing::trace!(form = %self.id, path = %path, key = %key, "Issued list key");
			keys.push(key);
		}
		keys.truncate(len);
		keys.clone()
	}

	fn list_mut(&mut self, path: &FieldPath) -> Option<&mut Vec<Value>> {
		if resolve_path_value(&self.value, path).is_none_or(Value::is_null)
			&& let Err(err) = set_path_value(&mut self.value, path, Value::Array(Vec::new()))
		{
			tracing::warn!(form = %self.id, path = %path, error = %err, "Cannot create list");
			return None;
		}
		match resolve_path_value_mut(&mut self.value, path) {
			Some(Value::Array(items)) => Some(items),
			_ => {
				tracing::warn!(form = %self.id, path = %path, "List field holds a non-list value");
				None
			}
		}
	}

	fn insert_list_item(
		&mut self,
		path: &FieldPath,
		index: Option<usize>,
		value: Option<Value>,
	) -> Option<ItemKey> {
		if !self.accepts_list(path, "insert") {
			return None;
		}
		let len = self.keys(path).len();
		let at = index.unwrap_or(len).min(len);
		let item = value
			.or_else(|| self.schema.default_value(&path.index(at)))
			.unwrap_or(Value::Null);
		self.list_mut(path)?.insert(at, item);

		self.shift(path, |i| Some(if i >= at { i + 1 } else { i }));
		let key = ItemKey(self.next_key);
		self.next_key += 1;
		self.list_keys.entry(path.clone()).or_default().insert(at, key);
		tracing::debug!(form = %self.id, path = %path, index = at, key = %key, "List item inserted");
		Some(key)
	}

	fn remove_list_item(&mut self, path: &FieldPath, index: usize) -> Option<ItemKey> {
		if !self.accepts_list(path, "remove") {
			return None;
		}
		let len = self.keys(path).len();
		if index >= len {
			tracing::warn!(form = %self.id, path = %path, index, len, "List index out of bounds");
			return None;
		}
		self.list_mut(path)?.remove(index);

		self.shift(path, |i| match i.cmp(&index) {
			std::cmp::Ordering::Less => Some(i),
			std::cmp::Ordering::Equal => None,
			std::cmp::Ordering::Greater => Some(i - 1),
		});
		let key = self.list_keys.get_mut(path).map(|keys| keys.remove(index))?;
		tracing::debug!(form = %self.id, path = %path, index, key = %key, "List item removed");
		Some(key)
	}

	fn reorder_list_item(&mut self, path: &FieldPath, from: usize, to: usize) -> bool {
		if !self.accepts_list(path, "reorder") {
			return false;
		}
		let len = self.keys(path).len();
		if from >= len || to >= len {
			tracing::warn!(form = %self.id, path = %path, from, to, len, "List index out of bounds");
			return false;
		}
		if from == to {
			return true;
		}
		let Some(items) = self.list_mut(path) else {
			return false;
		};
		let item = items.remove(from);
		items.insert(to, item);

		self.shift(path, |i| {
			Some(if i == from {
				to
			} else if from < to && i > from && i <= to {
				i - 1
			} else if to < from && i >= to && i < from {
				i + 1
			} else {
				i
			})
		});
		if let Some(keys) = self.list_keys.get_mut(path) {
			let key = keys.remove(from);
			keys.insert(to, key);
		}
		tracing::debug!(form = %self.id, path = %path, from, to, "List item moved");
		true
	}

	/// Re-home errors, validated flags and nested list keys stored under
	/// items of the list at `list`. `map` gives each old index its new
	/// index, or `None` for a removed item.
	fn shift(&mut self, list: &FieldPath, map: impl Fn(usize) -> Option<usize>) {
		let remap = |path: &FieldPath| -> Remap {
			let Some(rest) = path.strip_prefix(list) else {
				return Remap::Keep;
			};
			let Some(PathSegment::Index(old)) = rest.segments().first() else {
				return Remap::Keep;
			};
			match map(*old) {
				None => Remap::Drop,
				Some(new) if new == *old => Remap::Keep,
				Some(new) => {
					let mut segments = list.segments().to_vec();
					segments.push(PathSegment::Index(new));
					segments.extend_from_slice(&rest.segments()[1..]);
					Remap::Move(FieldPath::from_segments(segments))
				}
			}
		};

		self.errors = std::mem::take(&mut self.errors)
			.into_iter()
			.filter_map(|(path, messages)| match remap(&path) {
				Remap::Keep => Some((path, messages)),
				Remap::Drop => None,
				Remap::Move(moved) => Some((moved, messages)),
			})
			.collect();
		self.validated = std::mem::take(&mut self.validated)
			.into_iter()
			.filter_map(|path| match remap(&path) {
				Remap::Keep => Some(path),
				Remap::Drop => None,
				Remap::Move(moved) => Some(moved),
			})
			.collect();
		self.list_keys = std::mem::take(&mut self.list_keys)
			.into_iter()
			.filter_map(|(path, keys)| match remap(&path) {
				Remap::Keep => Some((path, keys)),
				Remap::Drop => None,
				Remap::Move(moved) => Some((moved, keys)),
			})
			.collect();
	}

	/// Full validation. `None` when a pass is already running.
	fn run_submit(&mut self) -> Option<Submission> {
		if self.status == FormStatus::Validating {
			tracing::debug!(form = %self.id, "Submit ignored while validating");
			return None;
		}
		self.set_status(FormStatus::Validating);
		let submission = self.schema.validate(&self.value);
		self.submitted = true;
		self.errors.clear();
		match &submission {
			Submission::Success { .. } => self.set_status(FormStatus::Success),
			Submission::Error {
				field_errors,
				form_errors,
			} => {
				if !form_errors.is_empty() {
					self.errors.insert(FieldPath::root(), form_errors.clone());
				}
				for (name, messages) in field_errors {
					if let Ok(path) = FieldPath::parse(name) {
						self.errors.insert(path, messages.clone());
					}
				}
				self.set_status(FormStatus::Error);
			}
		}
		Some(submission)
	}

	fn errors_by_name(&self) -> IndexMap<String, Vec<String>> {
		self.errors
			.iter()
			.map(|(path, messages)| (path.to_string(), messages.clone()))
			.collect()
	}
}

type SubmitHandler<T> = Box<dyn FnMut(T)>;

/// Handle to one form instance.
///
/// Clones share the same state; the instance lives as long as any clone.
/// Operations run synchronously on the calling thread and never fail for
/// user-driven input: paths outside the schema are logged and ignored.
///
/// # Examples
///
/// ```
/// use formwright_forms::{FormInstance, FormOptions, FormStatus, SubmitOutcome};
/// use formwright_schema::{FieldPath, Schema, shape};
/// use serde_json::{Value, json};
///
/// let schema = Schema::new(
///     shape::object().field("email", shape::string().email("Enter a valid email")),
/// )
/// .unwrap();
/// let form: FormInstance<Value> = FormInstance::new(schema, "signup", FormOptions::default());
/// let email = FieldPath::parse("email").unwrap();
///
/// form.set_value(&email, json!("not-an-email"));
/// assert_eq!(form.submit(), SubmitOutcome::Error);
/// assert_eq!(form.errors_at(&email), ["Enter a valid email".to_string()]);
///
/// form.set_value(&email, json!("ada@example.com"));
/// assert_eq!(form.submit(), SubmitOutcome::Success);
/// assert_eq!(form.status(), FormStatus::Success);
/// ```
pub struct FormInstance<T> {
	state: Rc<RefCell<FormState>>,
	on_submit: Rc<RefCell<Option<SubmitHandler<T>>>>,
}

impl<T> Clone for FormInstance<T> {
	fn clone(&self) -> Self {
		Self {
			state: Rc::clone(&self.state),
			on_submit: Rc::clone(&self.on_submit),
		}
	}
}

impl<T> fmt::Debug for FormInstance<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.borrow();
		f.debug_struct("FormInstance")
			.field("id", &state.id)
			.field("status", &state.status)
			.field("errors", &state.errors.len())
			.finish()
	}
}

impl<T> FormInstance<T> {
	pub fn new(schema: Schema, id: impl Into<String>, options: FormOptions) -> Self {
		let state = FormState::new(schema, id.into(), options);
		tracing::debug!(form = %state.id, "Form instance created");
		Self {
			state: Rc::new(RefCell::new(state)),
			on_submit: Rc::new(RefCell::new(None)),
		}
	}

	pub fn id(&self) -> String {
		self.state.borrow().id.clone()
	}

	pub fn schema(&self) -> Schema {
		self.state.borrow().schema.clone()
	}

	pub fn options(&self) -> FormOptions {
		self.state.borrow().options.clone()
	}

	pub fn status(&self) -> FormStatus {
		self.state.borrow().status
	}

	/// Whether two handles share one instance
	pub fn same_instance(&self, other: &FormInstance<T>) -> bool {
		Rc::ptr_eq(&self.state, &other.state)
	}

	pub fn value(&self) -> Value {
		self.state.borrow().value.clone()
	}

	pub fn value_at(&self, path: &FieldPath) -> Option<Value> {
		resolve_path_value(&self.state.borrow().value, path).cloned()
	}

	pub fn initial_value(&self) -> Value {
		self.state.borrow().initial.clone()
	}

	/// Every stored error, keyed by path string; `""` holds form errors
	pub fn errors(&self) -> IndexMap<String, Vec<String>> {
		self.state.borrow().errors_by_name()
	}

	pub fn errors_at(&self, path: &FieldPath) -> Vec<String> {
		self.state
			.borrow()
			.errors
			.get(path)
			.cloned()
			.unwrap_or_default()
	}

	pub fn form_errors(&self) -> Vec<String> {
		self.errors_at(&FieldPath::root())
	}

	pub fn is_valid(&self) -> bool {
		self.state.borrow().errors.is_empty()
	}

	pub fn is_dirty(&self) -> bool {
		let state = self.state.borrow();
		state.value != state.initial
	}

	pub fn is_field_dirty(&self, path: &FieldPath) -> bool {
		let state = self.state.borrow();
		resolve_path_value(&state.value, path) != resolve_path_value(&state.initial, path)
	}

	/// Whether the field has been validated, directly or by a submit
	pub fn is_validated(&self, path: &FieldPath) -> bool {
		self.state.borrow().is_validated(path)
	}

	pub fn snapshot(&self) -> FormSnapshot {
		let state = self.state.borrow();
		FormSnapshot {
			status: state.status,
			value: state.value.clone(),
			errors: state.errors_by_name(),
			dirty: state.value != state.initial,
		}
	}

	/// Change a field as the user would, validating it when the
	/// instance's input trigger says so
	pub fn set_value(&self, path: &FieldPath, value: impl Into<Value>) {
		self.state
			.borrow_mut()
			.set_value(path, value.into(), Some(FieldEvent::Input));
	}

	/// Report that the user left a field
	pub fn touch(&self, path: &FieldPath) {
		let mut state = self.state.borrow_mut();
		if state.accepts(path, "touch") {
			state.field_event(path, FieldEvent::Blur);
		}
	}

	/// Write a value without triggering validation; `None` removes it
	pub fn update(&self, path: &FieldPath, value: Option<Value>) {
		let mut state = self.state.borrow_mut();
		if state.accepts(path, "update") {
			state.write(path, value);
		}
	}

	/// Replace the whole value tree, e.g. with a decoded submission payload
	pub fn load(&self, value: Value) {
		let mut state = self.state.borrow_mut();
		state.value = value;
		tracing::trace!(form = %state.id, "Value tree replaced");
	}

	/// Validate one field now, along with the cross-field rules that read it
	pub fn validate(&self, path: &FieldPath) {
		self.state.borrow_mut().validate_path(path);
	}

	/// Restore one field to its initial value and clear its errors
	pub fn reset_field(&self, path: &FieldPath) {
		self.state.borrow_mut().reset_field(path);
	}

	/// Restore the initial value tree, clear all errors and go idle
	pub fn reset(&self) {
		self.state.borrow_mut().reset();
	}

	/// Current identity keys of a list, in index order
	pub fn list_keys(&self, path: &FieldPath) -> Vec<ItemKey> {
		self.state.borrow_mut().keys(path)
	}

	/// Insert an item at `index` (append when `None` or past the end).
	///
	/// Without a value the element's schema default is used. Returns the
	/// new item's key, or `None` if `path` is not a list of this form.
	pub fn insert_list_item(
		&self,
		path: &FieldPath,
		index: Option<usize>,
		value: Option<Value>,
	) -> Option<ItemKey> {
		self.state.borrow_mut().insert_list_item(path, index, value)
	}

	/// Remove an item and everything stored under it, returning its key
	pub fn remove_list_item(&self, path: &FieldPath, index: usize) -> Option<ItemKey> {
		self.state.borrow_mut().remove_list_item(path, index)
	}

	pub fn reorder_list_item(&self, path: &FieldPath, from: usize, to: usize) -> bool {
		self.state.borrow_mut().reorder_list_item(path, from, to)
	}

	#[cfg(test)]
	pub(crate) fn force_status(&self, status: FormStatus) {
		self.state.borrow_mut().status = status;
	}

	/// Register the callback receiving the typed value of a successful submit
	pub fn on_submit(&self, handler: impl FnMut(T) + 'static) {
		*self.on_submit.borrow_mut() = Some(Box::new(handler));
	}
}

impl<T: DeserializeOwned> FormInstance<T> {
	/// Validate the whole form.
	///
	/// On success the registered callback receives the validated value;
	/// on failure every error is stored and the callback does not run.
	pub fn submit(&self) -> SubmitOutcome {
		let submission = match self.state.try_borrow_mut() {
			Ok(mut state) => state.run_submit(),
			Err(_) => {
				tracing::debug!("Submit ignored while the form is busy");
				None
			}
		};
		match submission {
			None => SubmitOutcome::Ignored,
			Some(Submission::Success { value }) => {
				self.deliver(value);
				SubmitOutcome::Success
			}
			Some(Submission::Error { .. }) => SubmitOutcome::Error,
		}
	}

	fn deliver(&self, value: Value) {
		// Taken out so the callback may use this form, or replace itself
		let Some(mut handler) = self.on_submit.borrow_mut().take() else {
			return;
		};
		match serde_json::from_value::<T>(value) {
			Ok(model) => handler(model),
			Err(err) => {
				tracing::warn!(form = %self.id(), error = %err, "Validated value does not decode into the form model");
			}
		}
		let mut slot = self.on_submit.borrow_mut();
		if slot.is_none() {
			*slot = Some(handler);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::ValidationTrigger;
	use formwright_schema::shape::{self, Refinement, ShapeExt};
	use rstest::{fixture, rstest};
	use serde_json::json;

	fn path(input: &str) -> FieldPath {
		FieldPath::parse(input).unwrap()
	}

	#[fixture]
	fn schema() -> Schema {
		let employee = shape::object()
			.field("name", shape::string().min(1, "Enter a name"))
			.field("email", shape::string().email("Invalid email"));
		let department = shape::object()
			.field("name", shape::string().min(1, "Enter a department name"))
			.field("employees", shape::array(employee));
		Schema::new(
			shape::object()
				.field("title", shape::string().min(3, "Too short"))
				.field("password", shape::string().min(8, "Use 8 characters"))
				.field("confirm", shape::string())
				.field("departments", shape::array(department).min(1, "Add a department"))
				.field("tags", shape::array(shape::string()).optional())
				.refine(
					Refinement::new("Passwords differ", |v| v.get("password") == v.get("confirm"))
						.at("confirm")
						.depends_on(["password", "confirm"]),
				),
		)
		.unwrap()
	}

	fn form(schema: Schema, options: FormOptions) -> FormInstance<Value> {
		FormInstance::new(schema, "test", options)
	}

	#[rstest]
	fn test_starts_from_schema_initial_value(schema: Schema) {
		let form = form(schema, FormOptions::default());
		assert_eq!(form.value(), json!({"departments": []}));
		assert_eq!(form.status(), FormStatus::Idle);
		assert!(!form.is_dirty());
	}

	#[rstest]
	fn test_explicit_default_value_wins(schema: Schema) {
		let options = FormOptions::new().with_default_value(json!({"title": "Draft"}));
		let form = form(schema, options);
		assert_eq!(form.value(), json!({"title": "Draft"}));
	}

	#[rstest]
	fn test_unknown_path_is_a_no_op(schema: Schema) {
		let form = form(schema, FormOptions::default());
		form.set_value(&path("nope"), json!(1));
		form.set_value(&path("departments[number].name"), json!("x"));
		form.touch(&path("title.deeper"));
		assert_eq!(form.value(), json!({"departments": []}));
		assert!(form.insert_list_item(&path("title"), None, None).is_none());
	}

	#[rstest]
	fn test_submit_only_policy_does_not_validate_on_events(schema: Schema) {
		let form = form(schema, FormOptions::default());
		form.set_value(&path("title"), "ab");
		form.touch(&path("title"));
		assert!(form.errors().is_empty());
	}

	#[rstest]
	fn test_blur_policy_validates_on_touch_only(schema: Schema) {
		let form = form(schema, FormOptions::new().validate_on(ValidationTrigger::OnBlur));
		let title = path("title");
		form.set_value(&title, "ab");
		assert!(form.errors_at(&title).is_empty());
		form.touch(&title);
		assert_eq!(form.errors_at(&title), ["Too short".to_string()]);
		// unrelated fields stay untouched
		assert!(form.errors_at(&path("password")).is_empty());
	}

	#[rstest]
	fn test_revalidation_trigger_applies_after_first_validation(schema: Schema) {
		let options = FormOptions::new()
			.validate_on(ValidationTrigger::OnBlur)
			.revalidate_on(ValidationTrigger::OnInput);
		let form = form(schema, options);
		let title = path("title");
		form.set_value(&title, "ab");
		form.touch(&title);
		assert!(!form.errors_at(&title).is_empty());
		form.set_value(&title, "abc");
		assert!(form.errors_at(&title).is_empty());
	}

	#[rstest]
	fn test_incremental_validation_reaches_refinement_targets(schema: Schema) {
		let form = form(schema, FormOptions::new().validate_on(ValidationTrigger::OnInput));
		form.set_value(&path("confirm"), "secret-password");
		form.set_value(&path("password"), "secret-passw0rd");
		assert_eq!(form.errors_at(&path("confirm")), ["Passwords differ".to_string()]);
		form.set_value(&path("password"), "secret-password");
		assert!(form.errors_at(&path("confirm")).is_empty());
	}

	#[rstest]
	fn test_submit_stores_every_error(schema: Schema) {
		let form = form(schema, FormOptions::default());
		form.set_value(&path("password"), "short");
		assert_eq!(form.submit(), SubmitOutcome::Error);
		assert_eq!(form.status(), FormStatus::Error);
		let errors = form.errors();
		assert!(errors.contains_key("title"));
		assert!(errors.contains_key("confirm"));
		assert_eq!(errors["departments"], vec!["Add a department".to_string()]);
		// after a submit every field revalidates on blur
		assert!(form.is_validated(&path("title")));
	}

	#[rstest]
	fn test_submit_runs_callback_with_typed_value(schema: Schema) {
		let form = form(schema, FormOptions::default());
		let received = Rc::new(RefCell::new(None));
		let sink = Rc::clone(&received);
		form.on_submit(move |value| *sink.borrow_mut() = Some(value));

		form.load(json!({
			"title": "Quarterly",
			"password": "long-enough",
			"confirm": "long-enough",
			"departments": [{"name": "Sales", "employees": []}],
		}));
		assert_eq!(form.submit(), SubmitOutcome::Success);
		assert_eq!(received.borrow().as_ref().unwrap()["title"], json!("Quarterly"));
		assert!(form.errors().is_empty());
	}

	#[rstest]
	fn test_callback_may_reset_the_form(schema: Schema) {
		let form = form(schema, FormOptions::default());
		let inner = form.clone();
		form.on_submit(move |_| inner.reset());
		form.load(json!({
			"title": "Quarterly",
			"password": "long-enough",
			"confirm": "long-enough",
			"departments": [{"name": "Sales"}],
		}));
		assert_eq!(form.submit(), SubmitOutcome::Success);
		assert_eq!(form.status(), FormStatus::Idle);
		assert_eq!(form.value(), json!({"departments": []}));
	}

	#[rstest]
	fn test_submit_while_validating_is_ignored(schema: Schema) {
		let form = form(schema, FormOptions::default());
		form.state.borrow_mut().status = FormStatus::Validating;
		assert_eq!(form.submit(), SubmitOutcome::Ignored);
		assert!(form.errors().is_empty());
	}

	#[rstest]
	fn test_list_keys_stay_with_their_items(schema: Schema) {
		let form = form(schema, FormOptions::default());
		let list = path("departments");
		for name in ["a", "b", "c"] {
			form.insert_list_item(&list, None, Some(json!({"name": name})));
		}
		let keys = form.list_keys(&list);
		assert_eq!(keys.iter().map(ToString::to_string).collect::<Vec<_>>(), ["k0", "k1", "k2"]);

		assert_eq!(form.remove_list_item(&list, 1), Some(keys[1]));
		assert_eq!(form.list_keys(&list), vec![keys[0], keys[2]]);

		let fresh = form.insert_list_item(&list, Some(1), None).unwrap();
		assert!(!keys.contains(&fresh));
		assert_eq!(form.list_keys(&list), vec![keys[0], fresh, keys[2]]);
		assert_eq!(form.value_at(&path("departments[1]")), Some(json!({"employees": []})));
	}

	#[rstest]
	fn test_remove_shifts_errors_and_nested_keys(schema: Schema) {
		let form = form(schema, FormOptions::default());
		form.load(json!({
			"departments": [
				{"name": "", "employees": [{"name": "a", "email": "bad"}]},
				{"name": "", "employees": [{"name": "b", "email": "bad"}, {"name": "c", "email": "c@x.io"}]},
			],
		}));
		let nested = path("departments[1].employees");
		let nested_keys = form.list_keys(&nested);
		assert_eq!(form.submit(), SubmitOutcome::Error);
		assert!(form.errors().contains_key("departments[0].employees[0].email"));
		assert!(form.errors().contains_key("departments[1].employees[0].email"));

		form.remove_list_item(&path("departments"), 0);
		let errors = form.errors();
		assert!(errors.contains_key("departments[0].name"));
		assert!(errors.contains_key("departments[0].employees[0].email"));
		assert!(!errors.keys().any(|key| key.starts_with("departments[1]")));
		assert_eq!(form.list_keys(&path("departments[0].employees")), nested_keys);
	}

	#[rstest]
	fn test_reorder_moves_value_key_and_errors(schema: Schema) {
		let form = form(schema, FormOptions::new().validate_on(ValidationTrigger::OnInput));
		let list = path("departments");
		for name in ["a", "", "c"] {
			form.insert_list_item(&list, None, Some(json!({"name": name})));
		}
		form.validate(&path("departments[1].name"));
		let keys = form.list_keys(&list);

		assert!(form.reorder_list_item(&list, 1, 2));
		assert_eq!(form.list_keys(&list), vec![keys[0], keys[2], keys[1]]);
		assert_eq!(form.value_at(&path("departments[2].name")), Some(json!("")));
		assert!(form.errors().contains_key("departments[2].name"));
		assert!(!form.errors().contains_key("departments[1].name"));
		assert!(!form.reorder_list_item(&list, 0, 3));
	}

	#[rstest]
	fn test_insert_creates_missing_optional_list(schema: Schema) {
		let form = form(schema, FormOptions::default());
		let tags = path("tags");
		assert!(form.insert_list_item(&tags, Some(9), Some(json!("red"))).is_some());
		assert_eq!(form.value_at(&tags), Some(json!(["red"])));
	}

	#[rstest]
	fn test_reset_field_restores_initial_and_clears_errors(schema: Schema) {
		let options = FormOptions::new()
			.with_default_value(json!({"title": "Draft", "departments": []}))
			.validate_on(ValidationTrigger::OnInput);
		let form = form(schema, options);
		let title = path("title");
		form.set_value(&title, "x");
		assert!(form.is_field_dirty(&title));
		assert!(!form.errors_at(&title).is_empty());

		form.reset_field(&title);
		assert_eq!(form.value_at(&title), Some(json!("Draft")));
		assert!(form.errors_at(&title).is_empty());
		assert!(!form.is_validated(&title));
	}

	#[rstest]
	fn test_update_does_not_validate(schema: Schema) {
		let form = form(schema, FormOptions::new().validate_on(ValidationTrigger::OnInput));
		form.update(&path("title"), Some(json!("x")));
		assert!(form.errors().is_empty());
		form.update(&path("title"), None);
		assert_eq!(form.value_at(&path("title")), None);
	}

	#[rstest]
	fn test_reset_is_idempotent(schema: Schema) {
		let form = form(schema, FormOptions::default());
		form.set_value(&path("title"), "x");
		form.insert_list_item(&path("departments"), None, None);
		form.submit();

		form.reset();
		let once = form.snapshot();
		form.reset();
		assert_eq!(form.snapshot(), once);
		assert_eq!(once.status, FormStatus::Idle);
		assert!(once.errors.is_empty());
		assert!(!once.dirty);
	}

	#[rstest]
	fn test_instances_do_not_share_state(schema: Schema) {
		let first = form(schema.clone(), FormOptions::default());
		let second = form(schema, FormOptions::default());
		first.set_value(&path("title"), "first");
		assert_eq!(second.value_at(&path("title")), None);
		assert!(!first.same_instance(&second));
		assert!(first.same_instance(&first.clone()));
	}

	#[rstest]
	fn test_undecodable_value_skips_callback() {
		let schema = Schema::new(shape::object().field("n", shape::number())).unwrap();
		let form: FormInstance<String> = FormInstance::new(schema, "typed", FormOptions::default());
		let called = Rc::new(RefCell::new(false));
		let flag = Rc::clone(&called);
		form.on_submit(move |_| *flag.borrow_mut() = true);
		form.set_value(&path("n"), 3);
		assert_eq!(form.submit(), SubmitOutcome::Success);
		assert!(!*called.borrow());
	}
}
