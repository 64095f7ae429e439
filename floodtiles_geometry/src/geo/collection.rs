//! The `GeoCollection` struct, a container for multiple `GeoFeature`
//! instances. It serializes as a GeoJSON FeatureCollection.

use super::GeoFeature;
use floodtiles_core::json::{JsonObject, JsonValue};

/// A GeoJSON FeatureCollection.
#[derive(Clone, Debug, Default)]
pub struct GeoCollection {
	pub features: Vec<GeoFeature>,
}

impl GeoCollection {
	#[must_use]
	pub fn from(features: Vec<GeoFeature>) -> Self {
		Self { features }
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.features.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.features.is_empty()
	}

	/// Serialize as a GeoJSON FeatureCollection object. Coordinates are
	/// rounded to `precision` fractional digits when given.
	pub fn to_json(&self, precision: Option<u8>) -> JsonObject {
		let mut obj = JsonObject::new();
		obj.set("type", "FeatureCollection");
		let features_json = JsonValue::from(
			self
				.features
				.iter()
				.map(|f| JsonValue::from(f.to_json(precision)))
				.collect::<Vec<_>>(),
		);
		obj.set("features", features_json);
		obj
	}
}
