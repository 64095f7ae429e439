//! The pipeline driver.
//!
//! Orchestrates the two strictly sequential phases: parallel per-tile
//! extraction into per-sea-level polygon pools, then parallel per-sea-level
//! aggregation and output. Failures of single tiles or single sea levels are
//! logged and isolated; input errors and an unwritable lookup table abort
//! the run.

use crate::aggregate::{AggregateJob, aggregate_sea_level};
use crate::config::FloodConfig;
use crate::extract::{ExtractParams, extract_tile};
use crate::inventory::list_elevation_tiles;
use crate::projections::{ProjectionTable, SeaLevel};
use crate::writer::write_lookup;
use anyhow::{Context, Result};
use floodtiles_core::ConcurrencyLimits;
use futures::{StreamExt, stream};
use geo::Polygon;
use log::{error, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Counters of a finished run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
	pub tiles_total: usize,
	pub tiles_failed: usize,
	pub tiles_flooded: usize,
	pub layers_written: usize,
	pub layers_failed: usize,
	pub features_total: usize,
}

/// Run the full pipeline described by `config`.
pub async fn run(config: Arc<FloodConfig>) -> Result<RunSummary> {
	let start = Instant::now();

	let table = ProjectionTable::from_csv_path(&config.projections_csv, config.rounding_step_cm)?;
	info!(
		"loaded {} projections, {} unique sea levels after rounding to {}cm steps",
		table.len(),
		table.sea_levels().len(),
		config.rounding_step_cm
	);

	let mut sea_levels = table.sea_levels().to_vec();
	if config.test_mode {
		sea_levels.truncate(3);
		info!("test mode: limited to {} sea levels", sea_levels.len());
	}

	let tiles = list_elevation_tiles(&config.elevation_folder)?;
	info!("found {} elevation tiles in {:?}", tiles.len(), config.elevation_folder);

	std::fs::create_dir_all(&config.output_folder)
		.with_context(|| format!("failed to create output folder {:?}", config.output_folder))?;

	let limits = ConcurrencyLimits::default();
	let mut summary = RunSummary {
		tiles_total: tiles.len(),
		..RunSummary::default()
	};

	let pools = extract_phase(&tiles, &sea_levels, &config, &limits, &mut summary).await;
	info!("tile phase complete in {:.1}s", start.elapsed().as_secs_f64());

	// aggregation needs the global polygon set of every level, so it only
	// starts once the tile phase has fully drained
	aggregate_phase(pools, &sea_levels, &config, &limits, &mut summary).await;

	let lookup_path = config.output_folder.join("lookup.json");
	write_lookup(&lookup_path, &table)?;
	info!("saved lookup table {lookup_path:?}");

	info!("finished in {:.1}s", start.elapsed().as_secs_f64());
	Ok(summary)
}

/// Phase 1: extract every tile in parallel, pooling polygons per sea level.
async fn extract_phase(
	tiles: &[PathBuf],
	sea_levels: &[SeaLevel],
	config: &Arc<FloodConfig>,
	limits: &ConcurrencyLimits,
	summary: &mut RunSummary,
) -> BTreeMap<SeaLevel, Vec<Polygon<f64>>> {
	let params = Arc::new(ExtractParams {
		sea_levels: sea_levels.to_vec(),
		water_threshold_m: config.water_threshold_m,
		simplify_tolerance_m: config.simplify_tolerance_m,
		min_polygon_area_m2: config.min_polygon_area_m2,
		downsample: config.downsample,
	});

	let total = tiles.len();
	let mut pools: BTreeMap<SeaLevel, Vec<Polygon<f64>>> = BTreeMap::new();
	let mut completed = 0usize;

	let mut tasks = stream::iter(tiles.to_vec())
		.map(|path| {
			let params = Arc::clone(&params);
			tokio::task::spawn_blocking(move || {
				let result = extract_tile(&path, &params);
				(path, result)
			})
		})
		.buffer_unordered(limits.cpu_bound);

	while let Some(joined) = tasks.next().await {
		let (path, result) = match joined {
			Ok(output) => output,
			Err(e) => panic!("extraction task panicked: {e}"),
		};
		completed += 1;
		let name = display_name(&path);
		match result {
			Ok(flood_map) if flood_map.is_empty() => {
				info!("[{completed}/{total}] {name}: no flooding");
			}
			Ok(flood_map) => {
				summary.tiles_flooded += 1;
				info!("[{completed}/{total}] {name}: flooding at {} levels", flood_map.len());
				for (level, polygons) in flood_map {
					pools.entry(level).or_default().extend(polygons);
				}
			}
			Err(e) => {
				summary.tiles_failed += 1;
				error!("[{completed}/{total}] {name}: {e:#}");
			}
		}
	}
	pools
}

/// Phase 2: aggregate every non-empty pool in parallel. Each job owns its
/// pool and releases it on completion.
async fn aggregate_phase(
	mut pools: BTreeMap<SeaLevel, Vec<Polygon<f64>>>,
	sea_levels: &[SeaLevel],
	config: &Arc<FloodConfig>,
	limits: &ConcurrencyLimits,
	summary: &mut RunSummary,
) {
	let mut jobs = Vec::new();
	for &level in sea_levels {
		match pools.remove(&level) {
			Some(polygons) if !polygons.is_empty() => {
				info!("sea level {level}: {} polygons to aggregate", polygons.len());
				jobs.push(AggregateJob { level, polygons });
			}
			_ => info!("no flooding at {level}, skipping"),
		}
	}

	let mut tasks = stream::iter(jobs)
		.map(|job| {
			let config = Arc::clone(config);
			tokio::task::spawn_blocking(move || (job.level, aggregate_sea_level(job, &config)))
		})
		.buffer_unordered(limits.cpu_bound);

	while let Some(joined) = tasks.next().await {
		let (level, result) = match joined {
			Ok(output) => output,
			Err(e) => panic!("aggregation task panicked: {e}"),
		};
		match result {
			Ok(s) => {
				summary.layers_written += 1;
				summary.features_total += s.feats_out;
				info!(
					"{level}: {} polygons -> {} features (skipped {} small, {:.1} KB)",
					s.polys_in,
					s.feats_out,
					s.skipped_small,
					s.bytes_written as f64 / 1024.0
				);
			}
			Err(e) => {
				summary.layers_failed += 1;
				error!("failed to aggregate {level}: {e:#}");
			}
		}
	}
}

fn display_name(path: &Path) -> String {
	path
		.file_name()
		.map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::raster::get_spatial_ref;
	use gdal::DriverManager;
	use gdal::raster::Buffer;
	use std::fs;
	use tempfile::TempDir;

	/// Write a square GeoTIFF tile in EPSG:25832 with 10 m pixels.
	fn write_tile(path: &Path, size: usize, origin: (f64, f64), elevation: impl Fn(usize, usize) -> f32) {
		let driver = DriverManager::get_driver_by_name("GTiff").expect("GTiff driver");
		let path_str = path.to_string_lossy();
		let mut dataset = driver
			.create_with_band_type::<f32, _>(path_str.as_ref(), size, size, 1)
			.expect("create GTiff dataset");
		dataset.set_spatial_ref(&get_spatial_ref(25832).unwrap()).unwrap();
		dataset
			.set_geo_transform(&[origin.0, 10.0, 0.0, origin.1, 0.0, -10.0])
			.unwrap();
		let data: Vec<f32> = (0..size * size).map(|i| elevation(i % size, i / size)).collect();
		let mut buffer = Buffer::new((size, size), data);
		dataset.rasterband(1).unwrap().write((0, 0), (size, size), &mut buffer).unwrap();
	}

	struct Scenario {
		dir: TempDir,
		config: Arc<FloodConfig>,
	}

	impl Scenario {
		fn new(projections_csv: &str) -> Self {
			let dir = TempDir::new().unwrap();
			let elevation_folder = dir.path().join("elevation");
			fs::create_dir(&elevation_folder).unwrap();
			let projections_path = dir.path().join("projections.csv");
			fs::write(&projections_path, projections_csv).unwrap();
			let config = Arc::new(FloodConfig {
				elevation_folder,
				projections_csv: projections_path,
				output_folder: dir.path().join("output"),
				min_polygon_area_m2: 0.0,
				simplify_tolerance_m: 0.0,
				downsample: 1,
				..FloodConfig::default()
			});
			Scenario { dir, config }
		}

		fn tile_path(&self, name: &str) -> PathBuf {
			self.config.elevation_folder.join(name)
		}

		fn output(&self, name: &str) -> PathBuf {
			self.config.output_folder.join(name)
		}

		fn layer_count(&self) -> usize {
			fs::read_dir(&self.config.output_folder)
				.unwrap()
				.filter(|entry| {
					entry
						.as_ref()
						.unwrap()
						.path()
						.extension()
						.is_some_and(|ext| ext == "geojson")
				})
				.count()
		}
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_empty_projection_table() {
		let scenario = Scenario::new("scenario,year,sea_level_cm\n");
		write_tile(&scenario.tile_path("tile.tif"), 4, (694000.0, 6176000.0), |_, _| 0.2);

		let summary = run(Arc::clone(&scenario.config)).await.unwrap();
		assert_eq!(summary.layers_written, 0);
		assert_eq!(scenario.layer_count(), 0);
		assert_eq!(fs::read_to_string(scenario.output("lookup.json")).unwrap(), "{}");
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_single_projection_single_tile() {
		let scenario = Scenario::new("scenario,year,sea_level_cm\nlow,2050,50.0\n");
		write_tile(&scenario.tile_path("tile.tif"), 10, (694000.0, 6176000.0), |_, _| 0.2);

		let summary = run(Arc::clone(&scenario.config)).await.unwrap();
		assert_eq!(summary.tiles_total, 1);
		assert_eq!(summary.tiles_flooded, 1);
		assert_eq!(summary.layers_written, 1);
		assert_eq!(summary.features_total, 1);

		let layer = fs::read_to_string(scenario.output("flood_50cm.geojson")).unwrap();
		assert_eq!(layer.matches("\"type\":\"Feature\"").count(), 1);
		assert!(layer.contains("\"sea_level_rise_m\":0.5"));
		assert!(layer.contains("\"name\":\"Roskilde Fjord\""));

		let lookup = fs::read_to_string(scenario.output("lookup.json")).unwrap();
		assert!(lookup.contains("\"low_2050\""));
		assert!(lookup.contains("\"geojson_file\": \"flood_50cm.geojson\""));
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_projections_rounding_to_same_level_share_one_layer() {
		let scenario = Scenario::new("scenario,year,sea_level_cm\nlow,2050,47.5\nmedium,2060,52.5\n");
		write_tile(&scenario.tile_path("tile.tif"), 10, (694000.0, 6176000.0), |_, _| 0.2);

		let summary = run(Arc::clone(&scenario.config)).await.unwrap();
		assert_eq!(summary.layers_written, 1);
		assert_eq!(scenario.layer_count(), 1);
		assert!(scenario.output("flood_50cm.geojson").exists());

		let lookup = fs::read_to_string(scenario.output("lookup.json")).unwrap();
		assert_eq!(lookup.matches("\"geojson_file\": \"flood_50cm.geojson\"").count(), 2);
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_tile_below_threshold_produces_no_layer() {
		let scenario = Scenario::new("scenario,year,sea_level_cm\nlow,2100,100.0\n");
		write_tile(&scenario.tile_path("tile.tif"), 10, (694000.0, 6176000.0), |_, _| 0.0);

		let summary = run(Arc::clone(&scenario.config)).await.unwrap();
		assert_eq!(summary.tiles_flooded, 0);
		assert_eq!(summary.layers_written, 0);
		assert!(!scenario.output("flood_100cm.geojson").exists());
		assert!(scenario.output("lookup.json").exists());
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_small_islands_are_filtered_by_area() {
		let scenario = Scenario::new("scenario,year,sea_level_cm\nlow,2100,100.0\n");
		// a 1-pixel island (100 m2) and a 3x3 island (900 m2) in open water
		write_tile(&scenario.tile_path("tile.tif"), 10, (694000.0, 6176000.0), |col, row| {
			let small = col == 1 && row == 1;
			let large = (4..7).contains(&col) && (4..7).contains(&row);
			if small || large { 0.2 } else { 0.0 }
		});
		let mut config = (*scenario.config).clone();
		config.min_polygon_area_m2 = 500.0;

		let summary = run(Arc::new(config)).await.unwrap();
		assert_eq!(summary.features_total, 1);
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_adjacent_tiles_with_and_without_dissolve() {
		let csv = "scenario,year,sea_level_cm\nlow,2100,100.0\n";

		// two 4x4 tiles sharing an edge at x = 694040
		let passthrough = Scenario::new(csv);
		write_tile(&passthrough.tile_path("a.tif"), 4, (694000.0, 6176000.0), |_, _| 0.2);
		write_tile(&passthrough.tile_path("b.tif"), 4, (694040.0, 6176000.0), |_, _| 0.2);
		let summary = run(Arc::clone(&passthrough.config)).await.unwrap();
		assert_eq!(summary.features_total, 2);

		let dissolved = Scenario::new(csv);
		write_tile(&dissolved.tile_path("a.tif"), 4, (694000.0, 6176000.0), |_, _| 0.2);
		write_tile(&dissolved.tile_path("b.tif"), 4, (694040.0, 6176000.0), |_, _| 0.2);
		let mut config = (*dissolved.config).clone();
		config.dissolve = true;
		let summary = run(Arc::new(config)).await.unwrap();
		assert_eq!(summary.features_total, 1);
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_unreadable_tile_is_isolated() {
		let scenario = Scenario::new("scenario,year,sea_level_cm\nlow,2050,50.0\n");
		write_tile(&scenario.tile_path("good.tif"), 10, (694000.0, 6176000.0), |_, _| 0.2);
		fs::write(scenario.tile_path("broken.tif"), b"not a raster").unwrap();

		let summary = run(Arc::clone(&scenario.config)).await.unwrap();
		assert_eq!(summary.tiles_total, 2);
		assert_eq!(summary.tiles_failed, 1);
		assert_eq!(summary.layers_written, 1);
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_missing_projection_table_is_fatal() {
		let scenario = Scenario::new("scenario,year,sea_level_cm\n");
		let mut config = (*scenario.config).clone();
		config.projections_csv = scenario.dir.path().join("missing.csv");
		assert!(run(Arc::new(config)).await.is_err());
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_test_mode_limits_levels() {
		let csv = "scenario,year,sea_level_cm\na,2050,10\nb,2060,20\nc,2070,30\nd,2080,40\ne,2090,50\n";
		let scenario = Scenario::new(csv);
		write_tile(&scenario.tile_path("tile.tif"), 10, (694000.0, 6176000.0), |_, _| 0.05);
		let mut config = (*scenario.config).clone();
		config.test_mode = true;
		config.water_threshold_m = 0.01;

		let summary = run(Arc::new(config)).await.unwrap();
		// only the first three unique levels are evaluated
		assert_eq!(summary.layers_written, 3);
		assert!(scenario.output("flood_30cm.geojson").exists());
		assert!(!scenario.output("flood_40cm.geojson").exists());
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_reruns_are_idempotent() {
		let scenario = Scenario::new("scenario,year,sea_level_cm\nlow,2050,50.0\n");
		write_tile(&scenario.tile_path("tile.tif"), 10, (694000.0, 6176000.0), |col, row| {
			if col >= row { 0.2 } else { 0.0 }
		});

		run(Arc::clone(&scenario.config)).await.unwrap();
		let first = fs::read_to_string(scenario.output("flood_50cm.geojson")).unwrap();
		run(Arc::clone(&scenario.config)).await.unwrap();
		let second = fs::read_to_string(scenario.output("flood_50cm.geojson")).unwrap();
		assert_eq!(first, second);
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_coordinates_are_geographic() {
		let scenario = Scenario::new("scenario,year,sea_level_cm\nlow,2050,50.0\n");
		write_tile(&scenario.tile_path("tile.tif"), 4, (694000.0, 6176000.0), |_, _| 0.2);

		run(Arc::clone(&scenario.config)).await.unwrap();
		let layer = fs::read_to_string(scenario.output("flood_50cm.geojson")).unwrap();
		// the tile sits in UTM zone 32N near Roskilde Fjord
		assert!(layer.contains("[12."));
		assert!(layer.contains(",55.6"));
	}
}
