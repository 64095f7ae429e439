//! Pipeline configuration.

use std::path::PathBuf;

/// Configuration of one pipeline run, threaded from the CLI into the driver
/// and its workers. Defaults match the reference deployment around Roskilde
/// Fjord.
#[derive(Debug, Clone)]
pub struct FloodConfig {
	/// Directory of elevation raster tiles.
	pub elevation_folder: PathBuf,
	/// Path to the sea-level projection table.
	pub projections_csv: PathBuf,
	/// Destination directory for layer files and the lookup table.
	pub output_folder: PathBuf,
	/// Elevation below this is treated as existing water and excluded from
	/// newly flooded land. In meters.
	pub water_threshold_m: f64,
	/// Douglas-Peucker tolerance in the tile CRS, in meters.
	pub simplify_tolerance_m: f64,
	/// Minimum polygon area retained, in square meters. Applied after
	/// vectorization and again before serialization.
	pub min_polygon_area_m2: f64,
	/// Sea-level quantization step, in centimeters.
	pub rounding_step_cm: i32,
	/// Raster downsample factor (>= 1).
	pub downsample: usize,
	/// Whether aggregation unions all polygons of a sea level.
	pub dissolve: bool,
	/// Process only the first 3 unique sea levels.
	pub test_mode: bool,
	/// Region label stamped on every feature.
	pub region_name: String,
	/// EPSG code of the tile CRS (planar, meter units).
	pub source_epsg: u32,
}

impl Default for FloodConfig {
	fn default() -> Self {
		Self {
			elevation_folder: PathBuf::from("elevation_data_RF"),
			projections_csv: PathBuf::from("sea_rise_projections/roskilde_fjord_projections.csv"),
			output_folder: PathBuf::from("flood_geojsons"),
			water_threshold_m: 0.1,
			simplify_tolerance_m: 3.0,
			min_polygon_area_m2: 2000.0,
			rounding_step_cm: 5,
			downsample: 2,
			dissolve: false,
			test_mode: false,
			region_name: String::from("Roskilde Fjord"),
			source_epsg: 25832,
		}
	}
}
