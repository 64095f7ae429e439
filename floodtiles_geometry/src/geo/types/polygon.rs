use super::RingGeometry;
use anyhow::{Result, ensure};
use floodtiles_core::json::JsonValue;
use std::fmt::Debug;

/// A polygon: one exterior ring followed by zero or more interior rings
/// (holes).
#[derive(Clone, PartialEq)]
pub struct PolygonGeometry(pub Vec<RingGeometry>);

impl PolygonGeometry {
	#[must_use]
	pub fn new(rings: Vec<RingGeometry>) -> Self {
		Self(rings)
	}

	#[must_use]
	pub fn exterior(&self) -> Option<&RingGeometry> {
		self.0.first()
	}

	/// Verifies that the polygon has an exterior ring and that every ring is
	/// closed and non-degenerate.
	pub fn verify(&self) -> Result<()> {
		ensure!(!self.0.is_empty(), "polygon must have an exterior ring");
		for ring in &self.0 {
			ring.verify()?;
		}
		Ok(())
	}

	/// Returns the polygon as a GeoJSON coordinates array
	/// `[exterior, hole, ...]`.
	pub fn to_coord_json(&self, precision: Option<u8>) -> JsonValue {
		JsonValue::from(self.0.iter().map(|ring| ring.to_coord_json(precision)).collect::<Vec<_>>())
	}
}

impl From<&geo::Polygon<f64>> for PolygonGeometry {
	fn from(polygon: &geo::Polygon<f64>) -> Self {
		let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
		rings.push(RingGeometry::from(polygon.exterior()));
		rings.extend(polygon.interiors().iter().map(RingGeometry::from));
		Self(rings)
	}
}

impl Debug for PolygonGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}
