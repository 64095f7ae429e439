use super::{GeoProperties, GeoValue, PolygonGeometry};
use floodtiles_core::json::JsonObject;

/// A GeoJSON feature wrapping a polygon geometry.
#[derive(Clone, Debug)]
pub struct GeoFeature {
	pub geometry: PolygonGeometry,
	pub properties: GeoProperties,
}

impl GeoFeature {
	pub fn new(geometry: PolygonGeometry) -> Self {
		Self {
			geometry,
			properties: GeoProperties::new(),
		}
	}

	pub fn set_properties(&mut self, properties: GeoProperties) {
		self.properties = properties;
	}

	pub fn set_property<T>(&mut self, key: &str, value: T)
	where
		GeoValue: From<T>,
	{
		self.properties.insert(key, value);
	}

	/// Serialize as a GeoJSON `Feature` object. Coordinates are rounded to
	/// `precision` fractional digits when given.
	pub fn to_json(&self, precision: Option<u8>) -> JsonObject {
		let mut geometry = JsonObject::new();
		geometry.set("type", "Polygon");
		geometry.set("coordinates", self.geometry.to_coord_json(precision));

		let mut obj = JsonObject::new();
		obj.set("type", "Feature");
		obj.set("properties", self.properties.to_json());
		obj.set("geometry", geometry);
		obj
	}
}

impl From<&geo::Polygon<f64>> for GeoFeature {
	fn from(polygon: &geo::Polygon<f64>) -> Self {
		Self::new(PolygonGeometry::from(polygon))
	}
}
