use super::GeoValue;
use floodtiles_core::json::JsonObject;
use std::collections::BTreeMap;

/// The property map of a feature, keyed by property name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoProperties(pub BTreeMap<String, GeoValue>);

impl GeoProperties {
	#[must_use]
	pub fn new() -> Self {
		Self(BTreeMap::new())
	}

	pub fn insert<T>(&mut self, key: &str, value: T)
	where
		GeoValue: From<T>,
	{
		self.0.insert(key.to_string(), GeoValue::from(value));
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&GeoValue> {
		self.0.get(key)
	}

	pub fn to_json(&self) -> JsonObject {
		let mut obj = JsonObject::new();
		for (key, value) in &self.0 {
			obj.set(key, value.to_json());
		}
		obj
	}
}

impl<T> From<Vec<(&str, T)>> for GeoProperties
where
	GeoValue: From<T>,
{
	fn from(input: Vec<(&str, T)>) -> Self {
		Self(
			input
				.into_iter()
				.map(|(key, value)| (key.to_string(), GeoValue::from(value)))
				.collect(),
		)
	}
}
