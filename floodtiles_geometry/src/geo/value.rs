use floodtiles_core::json::JsonValue;

/// A property value attached to a feature.
#[derive(Clone, Debug, PartialEq)]
pub enum GeoValue {
	Bool(bool),
	Float(f64),
	Int(i64),
	String(String),
}

impl GeoValue {
	pub fn to_json(&self) -> JsonValue {
		match self {
			GeoValue::Bool(v) => JsonValue::from(*v),
			GeoValue::Float(v) => JsonValue::from(*v),
			GeoValue::Int(v) => JsonValue::from(*v),
			GeoValue::String(v) => JsonValue::from(v),
		}
	}
}

impl From<&str> for GeoValue {
	fn from(value: &str) -> Self {
		GeoValue::String(value.to_string())
	}
}

impl From<String> for GeoValue {
	fn from(value: String) -> Self {
		GeoValue::String(value)
	}
}

impl From<bool> for GeoValue {
	fn from(value: bool) -> Self {
		GeoValue::Bool(value)
	}
}

impl From<f64> for GeoValue {
	fn from(value: f64) -> Self {
		GeoValue::Float(value)
	}
}

impl From<i32> for GeoValue {
	fn from(value: i32) -> Self {
		GeoValue::Int(i64::from(value))
	}
}

impl From<i64> for GeoValue {
	fn from(value: i64) -> Self {
		GeoValue::Int(value)
	}
}
