//! JSON array type.

use crate::json::*;
use std::fmt::Debug;

/// A JSON array, backed by a `Vec<JsonValue>`.
#[derive(Clone, Default, PartialEq)]
pub struct JsonArray(pub Vec<JsonValue>);

impl JsonArray {
	/// Serialize the JSON array to a compact string without extra whitespace.
	pub fn stringify(&self) -> String {
		let items = self.0.iter().map(stringify).collect::<Vec<_>>();
		format!("[{}]", items.join(","))
	}

	/// Serialize the array to a multi-line, pretty-printed string with
	/// two-space indentation.
	pub fn stringify_pretty(&self, depth: usize) -> String {
		if self.0.is_empty() {
			return String::from("[]");
		}
		let indent = "  ".repeat(depth);
		let items = self
			.0
			.iter()
			.map(|value| format!("{indent}  {}", stringify_pretty_indented(value, depth + 1)))
			.collect::<Vec<_>>();
		format!("[\n{}\n{indent}]", items.join(",\n"))
	}

	pub fn as_vec(&self) -> &Vec<JsonValue> {
		&self.0
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}
}

impl Debug for JsonArray {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.0)
	}
}

impl<T> From<Vec<T>> for JsonArray
where
	JsonValue: From<T>,
{
	fn from(input: Vec<T>) -> Self {
		Self(input.into_iter().map(JsonValue::from).collect())
	}
}
