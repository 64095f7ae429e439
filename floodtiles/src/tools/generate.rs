use anyhow::Result;
use floodtiles_pipeline::{FloodConfig, driver};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true)]
pub struct Subcommand {
	/// directory of elevation raster tiles
	#[arg(long, value_name = "dir", default_value = "elevation_data_RF", display_order = 1)]
	elevation_folder: PathBuf,

	/// sea-level projection table (CSV with scenario, year, sea_level_cm)
	#[arg(
		long,
		value_name = "file",
		default_value = "sea_rise_projections/roskilde_fjord_projections.csv",
		display_order = 1
	)]
	projections_csv: PathBuf,

	/// destination directory for layer files and the lookup table
	#[arg(long, value_name = "dir", default_value = "flood_geojsons", display_order = 1)]
	output_folder: PathBuf,

	/// elevation below this is treated as existing water (meters)
	#[arg(long, value_name = "meters", default_value_t = 0.1, display_order = 2)]
	water_threshold: f64,

	/// polygon simplification tolerance in the tile CRS (meters)
	#[arg(long, value_name = "meters", default_value_t = 3.0, display_order = 2)]
	simplify_tolerance: f64,

	/// minimum polygon area retained (square meters)
	#[arg(long, value_name = "sqm", default_value_t = 2000.0, display_order = 2)]
	min_polygon_area: f64,

	/// sea-level quantization step (centimeters)
	#[arg(long, value_name = "cm", default_value_t = 5, display_order = 2)]
	rounding_step: i32,

	/// raster downsample factor, 2 cuts per-tile memory by 4x
	#[arg(long, value_name = "factor", default_value_t = 2, display_order = 3)]
	downsample: usize,

	/// union all polygons of a sea level into one dissolved layer
	#[arg(long, display_order = 3)]
	dissolve: bool,

	/// process only the first 3 unique sea levels
	#[arg(long = "test", display_order = 3)]
	test_mode: bool,

	/// region label stamped on every feature
	#[arg(long, value_name = "name", default_value = "Roskilde Fjord", display_order = 4)]
	region_name: String,

	/// EPSG code of the tile CRS (planar, meter units)
	#[arg(long, value_name = "code", default_value_t = 25832, display_order = 4)]
	source_epsg: u32,
}

impl Subcommand {
	pub fn config(&self) -> FloodConfig {
		FloodConfig {
			elevation_folder: self.elevation_folder.clone(),
			projections_csv: self.projections_csv.clone(),
			output_folder: self.output_folder.clone(),
			water_threshold_m: self.water_threshold,
			simplify_tolerance_m: self.simplify_tolerance,
			min_polygon_area_m2: self.min_polygon_area,
			rounding_step_cm: self.rounding_step,
			downsample: self.downsample.max(1),
			dissolve: self.dissolve,
			test_mode: self.test_mode,
			region_name: self.region_name.clone(),
			source_epsg: self.source_epsg,
		}
	}
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let summary = driver::run(Arc::new(arguments.config())).await?;

	log::info!(
		"{} layers written ({} features) from {} tiles",
		summary.layers_written,
		summary.features_total,
		summary.tiles_total
	);
	Ok(())
}
