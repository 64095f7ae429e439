//! JSON value enum and conversions from common Rust types.

use crate::json::*;

/// Represents JSON data: arrays, objects, numbers, strings and booleans.
///
/// `null` has no variant — the pipeline never emits it.
#[derive(Clone, Debug, PartialEq)]
pub enum JsonValue {
	Array(JsonArray),
	Boolean(bool),
	Number(f64),
	Object(JsonObject),
	String(String),
}

impl JsonValue {
	/// Serialize to a compact JSON string without unnecessary whitespace.
	#[must_use]
	pub fn stringify(&self) -> String {
		stringify(self)
	}

	/// Serialize to a multi-line JSON string with two-space indentation.
	#[must_use]
	pub fn stringify_pretty(&self) -> String {
		stringify_pretty(self)
	}
}

impl From<&str> for JsonValue {
	fn from(input: &str) -> Self {
		JsonValue::String(input.to_string())
	}
}

impl From<String> for JsonValue {
	fn from(input: String) -> Self {
		JsonValue::String(input)
	}
}

impl From<&String> for JsonValue {
	fn from(input: &String) -> Self {
		JsonValue::String(input.to_string())
	}
}

impl From<bool> for JsonValue {
	fn from(input: bool) -> Self {
		JsonValue::Boolean(input)
	}
}

impl From<f64> for JsonValue {
	fn from(input: f64) -> Self {
		JsonValue::Number(input)
	}
}

impl From<i32> for JsonValue {
	fn from(input: i32) -> Self {
		JsonValue::Number(f64::from(input))
	}
}

impl From<i64> for JsonValue {
	fn from(input: i64) -> Self {
		JsonValue::Number(input as f64)
	}
}

impl From<usize> for JsonValue {
	fn from(input: usize) -> Self {
		JsonValue::Number(input as f64)
	}
}

impl From<JsonObject> for JsonValue {
	fn from(input: JsonObject) -> Self {
		JsonValue::Object(input)
	}
}

impl<I> From<I> for JsonValue
where
	JsonArray: From<I>,
{
	fn from(input: I) -> Self {
		JsonValue::Array(input.into())
	}
}
