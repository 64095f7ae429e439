use floodtiles_core::json::JsonValue;
use floodtiles_core::round_to_digits;
use std::fmt::Debug;

/// A single `[x, y]` coordinate pair.
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinates(pub [f64; 2]);

impl Coordinates {
	#[must_use]
	pub fn new(x: f64, y: f64) -> Self {
		Self([x, y])
	}

	#[must_use]
	pub fn x(&self) -> f64 {
		self.0[0]
	}

	#[must_use]
	pub fn y(&self) -> f64 {
		self.0[1]
	}

	/// Returns the coordinate pair as a JSON array `[x, y]`.
	/// If a precision is specified, values are rounded to that many
	/// fractional digits.
	pub fn to_json(&self, precision: Option<u8>) -> JsonValue {
		let [x, y] = match precision {
			Some(digits) => [round_to_digits(self.0[0], digits), round_to_digits(self.0[1], digits)],
			None => self.0,
		};
		JsonValue::from(vec![JsonValue::from(x), JsonValue::from(y)])
	}
}

impl From<(f64, f64)> for Coordinates {
	fn from(value: (f64, f64)) -> Self {
		Self([value.0, value.1])
	}
}

impl From<[f64; 2]> for Coordinates {
	fn from(value: [f64; 2]) -> Self {
		Self(value)
	}
}

impl From<geo::Coord<f64>> for Coordinates {
	fn from(value: geo::Coord<f64>) -> Self {
		Self([value.x, value.y])
	}
}

impl Debug for Coordinates {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{:?}, {:?}]", self.0[0], self.0[1])
	}
}
