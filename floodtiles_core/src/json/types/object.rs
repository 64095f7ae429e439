//! JSON object type backed by a `BTreeMap`, so serialization order is stable.

use crate::json::*;
use std::{
	collections::BTreeMap,
	fmt::{Debug, Display},
};

/// A JSON object backed by a `BTreeMap<String, JsonValue>`.
#[derive(Clone, Default, PartialEq)]
pub struct JsonObject(pub BTreeMap<String, JsonValue>);

impl JsonObject {
	/// Create a new, empty `JsonObject`.
	#[must_use]
	pub fn new() -> Self {
		Self(BTreeMap::new())
	}

	/// Get a reference to the raw `JsonValue` for the specified key, if present.
	#[must_use]
	pub fn get(&self, key: &str) -> Option<&JsonValue> {
		self.0.get(key)
	}

	/// Set the specified key to the given value, converting it into a `JsonValue`.
	pub fn set<T>(&mut self, key: &str, value: T)
	where
		JsonValue: From<T>,
	{
		self.0.insert(key.to_owned(), JsonValue::from(value));
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Serialize into a compact JSON string without extra whitespace.
	#[must_use]
	pub fn stringify(&self) -> String {
		let items = self
			.0
			.iter()
			.map(|(key, value)| format!("\"{}\":{}", escape_json_string(key), stringify(value)))
			.collect::<Vec<_>>();
		format!("{{{}}}", items.join(","))
	}

	/// Serialize into a multi-line JSON string with two-space indentation.
	#[must_use]
	pub fn stringify_pretty(&self, depth: usize) -> String {
		if self.0.is_empty() {
			return String::from("{}");
		}
		let indent = "  ".repeat(depth);
		let items = self
			.0
			.iter()
			.map(|(key, value)| {
				format!(
					"{indent}  \"{}\": {}",
					escape_json_string(key),
					stringify_pretty_indented(value, depth + 1)
				)
			})
			.collect::<Vec<_>>();
		format!("{{\n{}\n{indent}}}", items.join(",\n"))
	}
}

impl<K: Display, V> From<Vec<(K, V)>> for JsonObject
where
	JsonValue: From<V>,
{
	fn from(input: Vec<(K, V)>) -> Self {
		Self(
			input
				.into_iter()
				.map(|(key, value)| (key.to_string(), JsonValue::from(value)))
				.collect(),
		)
	}
}

impl Debug for JsonObject {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_set_and_get() {
		let mut obj = JsonObject::new();
		obj.set("name", "value");
		obj.set("number", 5);
		assert_eq!(obj.get("name"), Some(&JsonValue::from("value")));
		assert_eq!(obj.get("number"), Some(&JsonValue::from(5.0)));
		assert_eq!(obj.get("missing"), None);
		assert_eq!(obj.len(), 2);
	}

	#[test]
	fn test_stringify_sorts_keys() {
		let obj = JsonObject::from(vec![("b", 2), ("a", 1)]);
		assert_eq!(obj.stringify(), "{\"a\":1,\"b\":2}");
	}

	#[test]
	fn test_stringify_pretty() {
		let obj = JsonObject::from(vec![("a", 1), ("bb", 2)]);
		assert_eq!(obj.stringify_pretty(0), "{\n  \"a\": 1,\n  \"bb\": 2\n}");
	}

	#[test]
	fn test_stringify_pretty_empty() {
		assert_eq!(JsonObject::new().stringify_pretty(0), "{}");
		assert!(JsonObject::new().is_empty());
	}
}
