//! Per-sea-level aggregation.
//!
//! Collects the polygons of one sea level from all tiles, optionally
//! dissolves them into their union, drops the ones under the area threshold,
//! reprojects the survivors to geographic coordinates and writes the layer
//! file.

use crate::config::FloodConfig;
use crate::projections::SeaLevel;
use crate::raster::get_spatial_ref;
use crate::writer::write_layer;
use anyhow::{Context, Result};
use floodtiles_geometry::geo::{Coordinates, GeoCollection, GeoFeature, PolygonGeometry, RingGeometry};
use gdal::spatial_ref::CoordTransform;
use geo::{Area, Polygon, unary_union};

/// Geographic output CRS (longitude/latitude).
const TARGET_EPSG: u32 = 4326;

/// Upper bound on polygons per union batch; larger pools are merged as a
/// tree of partial unions.
const UNION_BATCH_SIZE: usize = 500;

/// All polygons collected for one sea level, in the tile CRS. The job owns
/// its pool; it is released when the worker finishes.
pub struct AggregateJob {
	pub level: SeaLevel,
	pub polygons: Vec<Polygon<f64>>,
}

/// Counters reported back to the driver for progress output.
#[derive(Debug, Clone, Copy)]
pub struct AggregateSummary {
	pub level: SeaLevel,
	pub polys_in: usize,
	pub feats_out: usize,
	pub skipped_small: usize,
	pub bytes_written: u64,
}

/// Merge overlapping or touching polygons into their union, flattened back
/// into individual polygons.
pub fn dissolve_polygons(polygons: Vec<Polygon<f64>>) -> Vec<Polygon<f64>> {
	if polygons.len() <= UNION_BATCH_SIZE {
		return unary_union(&polygons).0;
	}
	let partials: Vec<Polygon<f64>> = polygons
		.chunks(UNION_BATCH_SIZE)
		.flat_map(|batch| unary_union(batch).0)
		.collect();
	unary_union(&partials).0
}

/// Process one sea level and write its layer file. Returns the counters for
/// progress reporting.
pub fn aggregate_sea_level(job: AggregateJob, config: &FloodConfig) -> Result<AggregateSummary> {
	let polys_in = job.polygons.len();
	let level = job.level;

	// transformers are created per worker, they must not cross threads
	let transform = CoordTransform::new(&get_spatial_ref(config.source_epsg)?, &get_spatial_ref(TARGET_EPSG)?)
		.context("failed to create coordinate transform")?;

	let polygons = if config.dissolve {
		dissolve_polygons(job.polygons)
	} else {
		job.polygons
	};

	let mut features = Vec::new();
	let mut skipped_small = 0usize;
	for polygon in &polygons {
		if polygon.unsigned_area() < config.min_polygon_area_m2 {
			skipped_small += 1;
			continue;
		}
		let geometry = reproject_polygon(polygon, &transform)?;
		let mut feature = GeoFeature::new(geometry);
		feature.set_property("name", config.region_name.as_str());
		feature.set_property("sea_level_rise_m", level.meters());
		features.push(feature);
	}

	let feats_out = features.len();
	let path = config.output_folder.join(level.file_name());
	let bytes_written = write_layer(&path, &GeoCollection::from(features))?;

	Ok(AggregateSummary {
		level,
		polys_in,
		feats_out,
		skipped_small,
		bytes_written,
	})
}

/// Reproject every ring of a polygon from the tile CRS to the target CRS.
fn reproject_polygon(polygon: &Polygon<f64>, transform: &CoordTransform) -> Result<PolygonGeometry> {
	let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
	rings.push(reproject_ring(polygon.exterior(), transform)?);
	for interior in polygon.interiors() {
		rings.push(reproject_ring(interior, transform)?);
	}
	Ok(PolygonGeometry::new(rings))
}

fn reproject_ring(ring: &geo::LineString<f64>, transform: &CoordTransform) -> Result<RingGeometry> {
	let mut xs: Vec<f64> = ring.coords().map(|c| c.x).collect();
	let mut ys: Vec<f64> = ring.coords().map(|c| c.y).collect();
	let mut zs = vec![0.0; xs.len()];
	transform
		.transform_coords(&mut xs, &mut ys, &mut zs)
		.context("failed to reproject ring")?;
	Ok(RingGeometry(
		xs.into_iter().zip(ys).map(|(x, y)| Coordinates::new(x, y)).collect(),
	))
}
