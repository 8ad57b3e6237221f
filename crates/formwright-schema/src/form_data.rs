//! Flat form payloads
//!
//! A native form submission is an ordered list of text entries whose names
//! encode structure:
//!
//! ```text
//! name=Acme
//! departments[0].name=Sales
//! departments[0].employees[0].email=a@acme.test
//! tags=red
//! tags=blue            (repeated names collect into a list)
//! ```

use crate::error::FormDataError;
use crate::path::{FieldPath, resolve_path_value_mut, set_path_value};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered `(name, value)` text entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
	entries: Vec<(String, String)>,
}

impl FormData {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_entries<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			entries: entries
				.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		}
	}

	/// Decode an `application/x-www-form-urlencoded` body
	///
	/// # Examples
	///
	/// ```
	/// use formwright_schema::FormData;
	///
	/// let data = FormData::from_urlencoded("name=Acme+Inc&tags=a&tags=b").unwrap();
	/// assert_eq!(data.get("name"), Some("Acme Inc"));
	/// assert_eq!(data.get_all("tags"), vec!["a", "b"]);
	/// ```
	pub fn from_urlencoded(body: &str) -> Result<Self, FormDataError> {
		let entries: Vec<(String, String)> = serde_urlencoded::from_str(body)?;
		Ok(Self { entries })
	}

	pub fn to_urlencoded(&self) -> Result<String, FormDataError> {
		Ok(serde_urlencoded::to_string(&self.entries)?)
	}

	pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.entries.push((name.into(), value.into()));
	}

	/// First value submitted under `name`
	pub fn get(&self, name: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	pub fn get_all(&self, name: &str) -> Vec<&str> {
		self.entries
			.iter()
			.filter(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
			.collect()
	}

	/// Remove every entry named `name`, returning the values
	pub fn remove(&mut self, name: &str) -> Vec<String> {
		let mut removed = Vec::new();
		self.entries.retain(|(key, value)| {
			if key == name {
				removed.push(value.clone());
				false
			} else {
				true
			}
		});
		removed
	}

	pub fn entries(&self) -> &[(String, String)] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Rebuild the nested value tree.
	///
	/// Every leaf stays text; typing is the validator's job. Entries with a
	/// malformed name, or whose name conflicts with an earlier entry, are
	/// skipped.
	///
	/// # Examples
	///
	/// ```
	/// use formwright_schema::FormData;
	/// use serde_json::json;
	///
	/// let data = FormData::from_entries([
	///     ("departments[0].name", "Sales"),
	///     ("departments[1].name", "R&D"),
	///     ("tags", "a"),
	///     ("tags", "b"),
	/// ]);
	/// assert_eq!(
	///     data.parse(),
	///     json!({"departments": [{"name": "Sales"}, {"name": "R&D"}], "tags": ["a", "b"]})
	/// );
	/// ```
	pub fn parse(&self) -> Value {
		let mut root = Value::Object(Map::new());
		for (name, raw) in &self.entries {
			let path = match FieldPath::parse(name) {
				Ok(path) if !path.is_root() && !path.has_placeholder() => path,
				_ => {
					tracing::warn!(name = %name, "Skipping form entry with malformed name");
					continue;
				}
			};
			let value = Value::String(raw.clone());
			match resolve_path_value_mut(&mut root, &path) {
				Some(Value::Array(items)) => items.push(value),
				Some(slot) if slot.is_null() => *slot = value,
				Some(slot) if slot.is_string() => {
					let first = slot.take();
					*slot = Value::Array(vec![first, value]);
				}
				Some(_) => {
					tracing::warn!(name = %name, "Skipping form entry that conflicts with a nested field");
				}
				None => {
					if let Err(err) = set_path_value(&mut root, &path, value) {
						tracing::warn!(name = %name, error = %err, "Skipping form entry");
					}
				}
			}
		}
		root
	}

	/// Flatten a value tree into entries; inverse of [`parse`](Self::parse)
	/// for trees without `null` leaves or empty containers.
	///
	/// # Examples
	///
	/// ```
	/// use formwright_schema::FormData;
	/// use serde_json::json;
	///
	/// let data = FormData::encode(&json!({"price": 19.99, "tags": ["a"], "featured": true}));
	/// assert_eq!(data.get("price"), Some("19.99"));
	/// assert_eq!(data.get("tags[0]"), Some("a"));
	/// assert_eq!(data.get("featured"), Some("true"));
	/// ```
	pub fn encode(value: &Value) -> Self {
		let mut data = Self::new();
		encode_into(&mut data, &FieldPath::root(), value);
		data
	}
}

fn encode_into(data: &mut FormData, path: &FieldPath, value: &Value) {
	match value {
		Value::Object(map) => {
			for (key, child) in map {
				encode_into(data, &path.key(key.as_str()), child);
			}
		}
		Value::Array(items) => {
			for (index, child) in items.iter().enumerate() {
				encode_into(data, &path.index(index), child);
			}
		}
		Value::String(text) => data.append(path.to_string(), text.clone()),
		Value::Number(number) => data.append(path.to_string(), number.to_string()),
		Value::Bool(flag) => data.append(path.to_string(), flag.to_string()),
		Value::Null => {}
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self::from_entries(iter)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_sparse_indices_fill_with_null() {
		let data = FormData::from_entries([("items[2].name", "c")]);
		assert_eq!(data.parse(), json!({"items": [null, null, {"name": "c"}]}));
	}

	#[rstest]
	fn test_malformed_and_conflicting_names_are_skipped() {
		let data = FormData::from_entries([
			("a..b", "x"),
			("items[number]", "y"),
			("address.city", "Tokyo"),
			("address", "flat"),
			("title", "ok"),
		]);
		assert_eq!(data.parse(), json!({"address": {"city": "Tokyo"}, "title": "ok"}));
	}

	#[rstest]
	fn test_remove_returns_values() {
		let mut data = FormData::from_entries([("__intent__", "{}"), ("name", "a")]);
		assert_eq!(data.remove("__intent__"), vec!["{}".to_string()]);
		assert_eq!(data.len(), 1);
	}

	#[rstest]
	fn test_encode_then_parse_nested_lists() {
		let value = json!({
			"name": "Acme",
			"departments": [
				{"name": "Sales", "employees": [{"email": "a@acme.test", "age": 30}]},
				{"name": "R&D", "employees": []},
			],
		});
		let parsed = FormData::encode(&value).parse();
		assert_eq!(
			parsed,
			json!({
				"name": "Acme",
				"departments": [
					{"name": "Sales", "employees": [{"email": "a@acme.test", "age": "30"}]},
					{"name": "R&D"},
				],
			})
		);
	}

	#[rstest]
	fn test_urlencoded_round_trip() {
		let data = FormData::from_entries([("a[0].b", "x y"), ("c", "ü")]);
		let body = data.to_urlencoded().unwrap();
		assert_eq!(FormData::from_urlencoded(&body).unwrap(), data);
	}
}
