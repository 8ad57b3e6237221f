//! Field paths: parsing, formatting and runtime value resolution
//!
//! A path addresses a location in a nested value tree using `.member` for
//! object descent and `[index]` for list descent:
//!
//! ```text
//! departments[0].employees[1].email
//! └─ Key ──┘└Ix┘└─ Key ──┘└Ix┘└Key┘
//! ```
//!
//! The placeholder `[number]` stands for "any index" and is what the path
//! algebra emits for list elements, since concrete indices of a dynamic
//! list are not known ahead of time.

use crate::error::PathError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Literal used for the "any index" placeholder.
pub const ANY_INDEX: &str = "number";

/// One step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
	/// Object member descent (`.name`)
	Key(String),
	/// Concrete list element descent (`[3]`)
	Index(usize),
	/// Placeholder matching any list element (`[number]`)
	AnyIndex,
}

impl PathSegment {
	pub fn is_index(&self) -> bool {
		matches!(self, PathSegment::Index(_) | PathSegment::AnyIndex)
	}
}

/// A parsed path into a nested record/list value.
///
/// The empty path addresses the root value.
///
/// # Examples
///
/// ```
/// use formwright_schema::FieldPath;
///
/// let path: FieldPath = "departments[0].employees[1].email".parse().unwrap();
/// assert_eq!(path.len(), 5);
/// assert_eq!(path.to_string(), "departments[0].employees[1].email");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
	segments: Vec<PathSegment>,
}

impl FieldPath {
	/// The root path
	pub fn root() -> Self {
		Self::default()
	}

	pub fn from_segments(segments: Vec<PathSegment>) -> Self {
		Self { segments }
	}

	/// Parse a path string.
	///
	/// # Examples
	///
	/// ```
	/// use formwright_schema::{FieldPath, PathSegment};
	///
	/// let path = FieldPath::parse("images[number]").unwrap();
	/// assert_eq!(path.segments()[1], PathSegment::AnyIndex);
	/// assert!(FieldPath::parse("a..b").is_err());
	/// ```
	pub fn parse(input: &str) -> Result<Self, PathError> {
		let mut segments = Vec::new();
		if input.is_empty() {
			return Ok(Self { segments });
		}

		let bytes = input.as_bytes();
		let mut pos = 0;
		let mut expect_key = true;

		while pos < bytes.len() {
			match bytes[pos] {
				b'[' => {
					let close = input[pos..]
						.find(']')
						.map(|offset| pos + offset)
						.ok_or_else(|| PathError::UnterminatedIndex {
							path: input.to_string(),
						})?;
					let raw = &input[pos + 1..close];
					let segment = if raw == ANY_INDEX {
						PathSegment::AnyIndex
					} else {
						let invalid = || PathError::InvalidIndex {
							path: input.to_string(),
							index: raw.to_string(),
						};
						if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
							return Err(invalid());
						}
						let index = raw.parse::<usize>().map_err(|_| invalid())?;
						PathSegment::Index(index)
					};
					segments.push(segment);
					pos = close + 1;
					expect_key = false;
				}
				b'.' => {
					if expect_key {
						return Err(PathError::EmptySegment {
							path: input.to_string(),
						});
					}
					pos += 1;
					expect_key = true;
					if pos == bytes.len() {
						return Err(PathError::EmptySegment {
							path: input.to_string(),
						});
					}
				}
				_ => {
					if !expect_key {
						// `a[0]b` is missing the dot between index and key
						return Err(PathError::EmptySegment {
							path: input.to_string(),
						});
					}
					let end = input[pos..]
						.find(['.', '['])
						.map(|offset| pos + offset)
						.unwrap_or(bytes.len());
					let key = &input[pos..end];
					if key.contains(']') {
						return Err(PathError::InvalidIndex {
							path: input.to_string(),
							index: key.to_string(),
						});
					}
					segments.push(PathSegment::Key(key.to_string()));
					pos = end;
					expect_key = false;
				}
			}
		}

		Ok(Self { segments })
	}

	pub fn segments(&self) -> &[PathSegment] {
		&self.segments
	}

	pub fn len(&self) -> usize {
		self.segments.len()
	}

	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	pub fn is_root(&self) -> bool {
		self.segments.is_empty()
	}

	/// Whether the path contains the `[number]` placeholder
	pub fn has_placeholder(&self) -> bool {
		self.segments.iter().any(|s| matches!(s, PathSegment::AnyIndex))
	}

	/// Append a member segment
	pub fn key(&self, name: impl Into<String>) -> Self {
		let mut segments = self.segments.clone();
		segments.push(PathSegment::Key(name.into()));
		Self { segments }
	}

	/// Append a concrete index segment
	pub fn index(&self, index: usize) -> Self {
		let mut segments = self.segments.clone();
		segments.push(PathSegment::Index(index));
		Self { segments }
	}

	/// Append the `[number]` placeholder
	pub fn any_index(&self) -> Self {
		let mut segments = self.segments.clone();
		segments.push(PathSegment::AnyIndex);
		Self { segments }
	}

	/// Concatenate two paths
	pub fn join(&self, other: &FieldPath) -> Self {
		let mut segments = self.segments.clone();
		segments.extend(other.segments.iter().cloned());
		Self { segments }
	}

	pub fn push(&mut self, segment: PathSegment) {
		self.segments.push(segment);
	}

	pub fn pop(&mut self) -> Option<PathSegment> {
		self.segments.pop()
	}

	pub fn parent(&self) -> Option<Self> {
		if self.segments.is_empty() {
			return None;
		}
		Some(Self {
			segments: self.segments[..self.segments.len() - 1].to_vec(),
		})
	}

	pub fn last(&self) -> Option<&PathSegment> {
		self.segments.last()
	}

	/// Whether `self` equals `other` or lies beneath it
	///
	/// # Examples
	///
	/// ```
	/// use formwright_schema::FieldPath;
	///
	/// let list = FieldPath::parse("departments[0]").unwrap();
	/// let leaf = FieldPath::parse("departments[0].employees[2].name").unwrap();
	/// assert!(leaf.starts_with(&list));
	/// assert!(!list.starts_with(&leaf));
	/// ```
	pub fn starts_with(&self, other: &FieldPath) -> bool {
		self.segments.len() >= other.segments.len()
			&& self.segments[..other.segments.len()] == other.segments[..]
	}

	/// Strip `prefix` from the front of the path
	pub fn strip_prefix(&self, prefix: &FieldPath) -> Option<Self> {
		if !self.starts_with(prefix) {
			return None;
		}
		Some(Self {
			segments: self.segments[prefix.segments.len()..].to_vec(),
		})
	}

	/// Replace every concrete index with the `[number]` placeholder
	///
	/// # Examples
	///
	/// ```
	/// use formwright_schema::FieldPath;
	///
	/// let path = FieldPath::parse("departments[1].employees[0].email").unwrap();
	/// assert_eq!(
	///     path.normalized().to_string(),
	///     "departments[number].employees[number].email"
	/// );
	/// ```
	pub fn normalized(&self) -> Self {
		Self {
			segments: self
				.segments
				.iter()
				.map(|s| match s {
					PathSegment::Index(_) => PathSegment::AnyIndex,
					other => other.clone(),
				})
				.collect(),
		}
	}

	/// Whether a concrete path is an instance of a (possibly placeholder) pattern
	pub fn matches_pattern(&self, pattern: &FieldPath) -> bool {
		self.segments.len() == pattern.segments.len()
			&& self
				.segments
				.iter()
				.zip(pattern.segments.iter())
				.all(|(actual, expected)| match (actual, expected) {
					(PathSegment::Index(_), PathSegment::AnyIndex) => true,
					(a, b) => a == b,
				})
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, segment) in self.segments.iter().enumerate() {
			match segment {
				PathSegment::Key(key) => {
					if i > 0 {
						f.write_str(".")?;
					}
					f.write_str(key)?;
				}
				PathSegment::Index(index) => write!(f, "[{}]", index)?,
				PathSegment::AnyIndex => write!(f, "[{}]", ANY_INDEX)?,
			}
		}
		Ok(())
	}
}

impl FromStr for FieldPath {
	type Err = PathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<&str> for FieldPath {
	type Error = PathError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

impl Serialize for FieldPath {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for FieldPath {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		FieldPath::parse(&raw).map_err(serde::de::Error::custom)
	}
}

/// Walk `root` along `path` and return the value found there.
///
/// Returns `None` when any segment is absent, when the path runs past a
/// scalar or past the end of a list, and for the `[number]` placeholder,
/// which never names a concrete element.
///
/// # Examples
///
/// ```
/// use formwright_schema::{FieldPath, resolve_path_value};
/// use serde_json::json;
///
/// let value = json!({"a": {"c": [1, 2, 3]}});
/// let path = FieldPath::parse("a.c[1]").unwrap();
/// assert_eq!(resolve_path_value(&value, &path), Some(&json!(2)));
///
/// let past_end = FieldPath::parse("a.c[9].x").unwrap();
/// assert_eq!(resolve_path_value(&value, &past_end), None);
/// ```
pub fn resolve_path_value<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
	let mut current = root;
	for segment in path.segments() {
		current = match (segment, current) {
			(PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
			(PathSegment::Index(index), Value::Array(items)) => items.get(*index)?,
			_ => return None,
		};
	}
	Some(current)
}

/// Mutable counterpart of [`resolve_path_value`]
pub fn resolve_path_value_mut<'a>(root: &'a mut Value, path: &FieldPath) -> Option<&'a mut Value> {
	let mut current = root;
	for segment in path.segments() {
		current = match (segment, current) {
			(PathSegment::Key(key), Value::Object(map)) => map.get_mut(key)?,
			(PathSegment::Index(index), Value::Array(items)) => items.get_mut(*index)?,
			_ => return None,
		};
	}
	Some(current)
}

/// Write `value` at `path`, creating intermediate objects and lists.
///
/// Missing list slots before the target index are filled with `null`.
/// `null` containers on the way are replaced; other scalars are an error.
///
/// # Examples
///
/// ```
/// use formwright_schema::{FieldPath, set_path_value};
/// use serde_json::json;
///
/// let mut value = json!({});
/// set_path_value(&mut value, &FieldPath::parse("a.b[1].c").unwrap(), json!("x")).unwrap();
/// assert_eq!(value, json!({"a": {"b": [null, {"c": "x"}]}}));
/// ```
pub fn set_path_value(root: &mut Value, path: &FieldPath, value: Value) -> Result<(), PathError> {
	if path.has_placeholder() {
		return Err(PathError::Placeholder {
			path: path.to_string(),
		});
	}

	let mut current = root;
	for (i, segment) in path.segments().iter().enumerate() {
		let is_last = i + 1 == path.len();
		match segment {
			PathSegment::Key(key) => {
				if current.is_null() {
					*current = Value::Object(Map::new());
				}
				let map = current.as_object_mut().ok_or_else(|| PathError::NotAContainer {
					path: path.to_string(),
				})?;
				if is_last {
					map.insert(key.clone(), value);
					return Ok(());
				}
				current = map.entry(key.clone()).or_insert(Value::Null);
			}
			PathSegment::Index(index) => {
				if current.is_null() {
					*current = Value::Array(Vec::new());
				}
				let items = current.as_array_mut().ok_or_else(|| PathError::NotAContainer {
					path: path.to_string(),
				})?;
				if items.len() <= *index {
					items.resize(*index + 1, Value::Null);
				}
				if is_last {
					items[*index] = value;
					return Ok(());
				}
				current = &mut items[*index];
			}
			PathSegment::AnyIndex => unreachable!("placeholder rejected above"),
		}
	}

	// Empty path replaces the root
	*current = value;
	Ok(())
}

/// Remove the value at `path`, returning it.
///
/// Removing a list element shifts the following elements down by one.
pub fn remove_path_value(root: &mut Value, path: &FieldPath) -> Option<Value> {
	let parent = path.parent()?;
	let container = resolve_path_value_mut(root, &parent)?;
	match (path.last()?, container) {
		(PathSegment::Key(key), Value::Object(map)) => map.shift_remove(key),
		(PathSegment::Index(index), Value::Array(items)) if *index < items.len() => {
			Some(items.remove(*index))
		}
		_ => None,
	}
}
