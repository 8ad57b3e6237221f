//! Field handles: per-path views over a form instance

use crate::store::{FormInstance, ItemKey};
use formwright_schema::{Constraint, FieldPath};
use serde_json::Value;
use std::fmt;

/// Read/write view of one field.
///
/// A handle is a lookup, not a resource: it holds a clone of the instance
/// handle and a path, and every read goes through to the store. Handles
/// built from an unparsable dynamic path read as empty and ignore writes.
pub struct FieldHandle<T> {
	form: FormInstance<T>,
	name: String,
	path: Option<FieldPath>,
}

impl<T> Clone for FieldHandle<T> {
	fn clone(&self) -> Self {
		Self {
			form: self.form.clone(),
			name: self.name.clone(),
			path: self.path.clone(),
		}
	}
}

impl<T> fmt::Debug for FieldHandle<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldHandle")
			.field("form", &self.form.id())
			.field("name", &self.name)
			.finish()
	}
}

impl<T> FieldHandle<T> {
	pub(crate) fn new(form: FormInstance<T>, path: FieldPath) -> Self {
		Self {
			form,
			name: path.to_string(),
			path: Some(path),
		}
	}

	pub(crate) fn dynamic(form: FormInstance<T>, name: &str) -> Self {
		let path = match FieldPath::parse(name) {
			Ok(path) => Some(path),
			Err(err) => {
				tracing::warn!(form = %form.id(), name, error = %err, "Field handle for an unparsable path");
				None
			}
		};
		Self {
			form,
			name: name.to_string(),
			path,
		}
	}

	/// Submission name of the control
	pub fn name(&self) -> &str {
		&self.name
	}

	/// DOM id, unique across forms on one page
	pub fn id(&self) -> String {
		format!("{}-{}", self.form.id(), self.name)
	}

	/// Id for the element describing this field's errors
	pub fn error_id(&self) -> String {
		format!("{}-error", self.id())
	}

	pub fn path(&self) -> Option<&FieldPath> {
		self.path.as_ref()
	}

	pub fn form(&self) -> &FormInstance<T> {
		&self.form
	}

	pub fn value(&self) -> Option<Value> {
		self.path.as_ref().and_then(|path| self.form.value_at(path))
	}

	pub fn initial_value(&self) -> Option<Value> {
		let path = self.path.as_ref()?;
		formwright_schema::resolve_path_value(&self.form.initial_value(), path).cloned()
	}

	pub fn errors(&self) -> Vec<String> {
		self.path
			.as_ref()
			.map(|path| self.form.errors_at(path))
			.unwrap_or_default()
	}

	/// The message to display: the first one recorded
	pub fn error(&self) -> Option<String> {
		self.errors().into_iter().next()
	}

	pub fn is_valid(&self) -> bool {
		self.errors().is_empty()
	}

	pub fn is_dirty(&self) -> bool {
		self.path
			.as_ref()
			.is_some_and(|path| self.form.is_field_dirty(path))
	}

	/// Input hints for the control
	pub fn constraint(&self) -> Constraint {
		self.path
			.as_ref()
			.map(|path| self.form.schema().constraint(path))
			.unwrap_or_default()
	}

	pub fn is_list(&self) -> bool {
		self.path
			.as_ref()
			.is_some_and(|path| self.form.schema().is_list(path))
	}

	pub fn on_change(&self, value: impl Into<Value>) {
		match &self.path {
			Some(path) => self.form.set_value(path, value),
			None => tracing::warn!(name = %self.name, "Ignoring change on an unparsable path"),
		}
	}

	pub fn on_blur(&self) {
		if let Some(path) = &self.path {
			self.form.touch(path);
		}
	}

	/// Handle for a member of this object field
	pub fn field(&self, key: &str) -> FieldHandle<T> {
		match &self.path {
			Some(path) => FieldHandle::new(self.form.clone(), path.key(key)),
			None => FieldHandle::dynamic(self.form.clone(), &format!("{}.{}", self.name, key)),
		}
	}

	/// Items of a list field with their stable keys; empty for other fields
	pub fn get_list(&self) -> Vec<ListItemHandle<T>> {
		let Some(path) = self.path.as_ref().filter(|_| self.is_list()) else {
			return Vec::new();
		};
		self.form
			.list_keys(path)
			.into_iter()
			.enumerate()
			.map(|(index, key)| ListItemHandle {
				key,
				index,
				field: FieldHandle::new(self.form.clone(), path.index(index)),
			})
			.collect()
	}

	/// Append an item, returning its key
	pub fn append(&self, value: Option<Value>) -> Option<ItemKey> {
		let path = self.path.as_ref()?;
		self.form.insert_list_item(path, None, value)
	}

	pub fn insert(&self, index: usize, value: Option<Value>) -> Option<ItemKey> {
		let path = self.path.as_ref()?;
		self.form.insert_list_item(path, Some(index), value)
	}

	pub fn remove(&self, index: usize) -> Option<ItemKey> {
		let path = self.path.as_ref()?;
		self.form.remove_list_item(path, index)
	}

	pub fn reorder(&self, from: usize, to: usize) -> bool {
		self.path
			.as_ref()
			.is_some_and(|path| self.form.reorder_list_item(path, from, to))
	}
}

/// One element of a list field
pub struct ListItemHandle<T> {
	key: ItemKey,
	index: usize,
	field: FieldHandle<T>,
}

impl<T> fmt::Debug for ListItemHandle<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ListItemHandle")
			.field("key", &self.key)
			.field("index", &self.index)
			.field("name", &self.field.name)
			.finish()
	}
}

impl<T> ListItemHandle<T> {
	/// Identity that survives inserts and removals around this item
	pub fn key(&self) -> ItemKey {
		self.key
	}

	pub fn index(&self) -> usize {
		self.index
	}

	/// Handle for the item itself
	pub fn handle(&self) -> &FieldHandle<T> {
		&self.field
	}

	/// Handle for a member of an object item
	pub fn field(&self, key: &str) -> FieldHandle<T> {
		self.field.field(key)
	}
}
