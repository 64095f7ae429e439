use super::Coordinates;
use anyhow::{Result, ensure};
use floodtiles_core::json::JsonValue;
use std::fmt::Debug;

/// A closed ring of coordinates, the building block of polygons.
/// The first and last points must be identical to form a closed shape.
#[derive(Clone, PartialEq)]
pub struct RingGeometry(pub Vec<Coordinates>);

impl RingGeometry {
	/// Computes the signed area of the ring using the shoelace formula.
	/// Positive for counterclockwise winding in a y-up coordinate system.
	pub fn signed_area(&self) -> f64 {
		let mut sum = 0f64;
		if let Some(mut p2) = self.0.last() {
			for p1 in &self.0 {
				sum += (p2.x() - p1.x()) * (p1.y() + p2.y());
				p2 = p1;
			}
		}
		sum / 2.0
	}

	/// Verifies that the ring is closed and has at least 4 coordinates
	/// (3 unique points plus the closing point).
	pub fn verify(&self) -> Result<()> {
		ensure!(self.0.len() >= 4, "ring must have at least 4 points");
		ensure!(self.0.first() == self.0.last(), "ring must be closed");
		Ok(())
	}

	/// Returns the coordinates of the ring as a JSON array.
	/// If a precision is specified, coordinates are rounded accordingly.
	pub fn to_coord_json(&self, precision: Option<u8>) -> JsonValue {
		JsonValue::from(self.0.iter().map(|coord| coord.to_json(precision)).collect::<Vec<_>>())
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<&geo::LineString<f64>> for RingGeometry {
	fn from(geometry: &geo::LineString<f64>) -> Self {
		RingGeometry(geometry.coords().copied().map(Coordinates::from).collect())
	}
}

impl<T: Copy> From<&[T]> for RingGeometry
where
	Coordinates: From<T>,
{
	fn from(coords: &[T]) -> Self {
		RingGeometry(coords.iter().copied().map(Coordinates::from).collect())
	}
}

impl Debug for RingGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn square() -> RingGeometry {
		RingGeometry::from(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]][..])
	}

	#[test]
	fn test_area_ccw_positive() {
		assert_eq!(square().signed_area(), 100.0);
	}

	#[test]
	fn test_area_cw_negative() {
		let ring = RingGeometry::from(&[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0], [0.0, 0.0]][..]);
		assert_eq!(ring.signed_area(), -100.0);
	}

	#[test]
	fn test_area_empty() {
		assert_eq!(RingGeometry(Vec::new()).signed_area(), 0.0);
	}

	#[test]
	fn test_verify_valid() {
		assert!(square().verify().is_ok());
	}

	#[test]
	fn test_verify_too_few_points() {
		let ring = RingGeometry::from(&[[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]][..]);
		assert!(ring.verify().is_err());
	}

	#[test]
	fn test_verify_not_closed() {
		let ring = RingGeometry::from(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]][..]);
		assert!(ring.verify().is_err());
	}

	#[test]
	fn test_to_coord_json() {
		let ring = RingGeometry::from(&[[1.0, 2.0], [3.0, 4.0], [1.0, 2.0]][..]);
		assert_eq!(ring.to_coord_json(None).stringify(), "[[1,2],[3,4],[1,2]]");
	}

	#[test]
	fn test_from_geo_linestring() {
		let ls = geo::LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]);
		let ring = RingGeometry::from(&ls);
		assert_eq!(ring.len(), 2);
	}
}
