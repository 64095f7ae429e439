//! Serialization of layer files and the lookup table.

use crate::projections::ProjectionTable;
use anyhow::{Context, Result};
use floodtiles_geometry::geo::GeoCollection;
use std::fs;
use std::path::Path;

/// Coordinate precision of emitted GeoJSON, in fractional degrees digits.
/// Six digits is about 0.1 m at these latitudes, well below the pixel size.
const COORD_PRECISION: u8 = 6;

/// Write one sea-level layer as a compact GeoJSON FeatureCollection.
/// Returns the number of bytes written.
pub fn write_layer(path: &Path, collection: &GeoCollection) -> Result<u64> {
	let json = collection.to_json(Some(COORD_PRECISION)).stringify();
	fs::write(path, &json).with_context(|| format!("failed to write layer {path:?}"))?;
	Ok(json.len() as u64)
}

/// Write the `(scenario, year)` lookup table, pretty-printed for the
/// consumers downstream.
pub fn write_lookup(path: &Path, table: &ProjectionTable) -> Result<()> {
	let json = table.to_json().stringify_pretty(0);
	fs::write(path, &json).with_context(|| format!("failed to write lookup table {path:?}"))?;
	Ok(())
}
