use super::JsonValue;

/// Serialize a `JsonValue` to a compact string without any whitespace.
pub fn stringify(json: &JsonValue) -> String {
	match json {
		JsonValue::String(s) => format!("\"{}\"", escape_json_string(s)),
		JsonValue::Number(n) => n.to_string(),
		JsonValue::Boolean(b) => b.to_string(),
		JsonValue::Array(arr) => arr.stringify(),
		JsonValue::Object(obj) => obj.stringify(),
	}
}

/// Serialize a `JsonValue` to a multi-line string with two-space indentation.
///
/// Containers are always broken across lines; scalars render as in
/// [`stringify`].
pub fn stringify_pretty(json: &JsonValue) -> String {
	stringify_pretty_indented(json, 0)
}

pub(super) fn stringify_pretty_indented(json: &JsonValue, depth: usize) -> String {
	match json {
		JsonValue::Array(arr) => arr.stringify_pretty(depth),
		JsonValue::Object(obj) => obj.stringify_pretty(depth),
		_ => stringify(json),
	}
}

pub fn escape_json_string(input: &str) -> String {
	input
		.chars()
		.map(|c| match c {
			'"' => "\\\"".to_string(),
			'\\' => "\\\\".to_string(),
			'\n' => "\\n".to_string(),
			'\r' => "\\r".to_string(),
			'\t' => "\\t".to_string(),
			'\u{08}' => "\\b".to_string(),
			'\u{0c}' => "\\f".to_string(),
			c if c.is_control() => format!("\\u{:04x}", c as u32),
			c => c.to_string(),
		})
		.collect()
}
