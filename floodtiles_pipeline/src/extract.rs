//! Per-tile flood extraction.
//!
//! For one elevation tile and the full ascending list of sea levels, this
//! produces the simplified flood polygons per level, in the tile CRS. The
//! flood model is a bathtub: every land pixel below a level floods,
//! regardless of hydrological connection to the sea.

use crate::projections::SeaLevel;
use crate::raster::ElevationTile;
use anyhow::Result;
use floodtiles_geometry::mask::MaskGrid;
use floodtiles_geometry::vectorize::trace_polygons;
use geo::{Area, Polygon, Simplify, Validation};
use std::collections::BTreeMap;
use std::path::Path;

/// Parameters of the per-tile extraction, shared by all tile workers.
#[derive(Debug, Clone)]
pub struct ExtractParams {
	/// Sea levels to evaluate, ascending.
	pub sea_levels: Vec<SeaLevel>,
	pub water_threshold_m: f64,
	pub simplify_tolerance_m: f64,
	pub min_polygon_area_m2: f64,
	pub downsample: usize,
}

/// Flood polygons of one tile, keyed by sea level. Levels where the flood
/// mask was empty have no entry.
pub type TileFloodMap = BTreeMap<SeaLevel, Vec<Polygon<f64>>>;

/// Open one tile and extract its flood polygons for every sea level.
pub fn extract_tile(path: &Path, params: &ExtractParams) -> Result<TileFloodMap> {
	let tile = ElevationTile::open(path)?.downsample(params.downsample);
	Ok(extract_from_tile(&tile, params))
}

pub fn extract_from_tile(tile: &ElevationTile, params: &ExtractParams) -> TileFloodMap {
	let mut results = TileFloodMap::new();

	let Some((min_elev, max_elev)) = tile.min_max() else {
		return results; // nothing but nodata
	};
	let (min_elev, max_elev) = (f64::from(min_elev), f64::from(max_elev));

	// below the water threshold everywhere: no land that could newly flood
	if max_elev < params.water_threshold_m {
		return results;
	}

	// the land mask excludes existing water, so its expansion under rising
	// seas is not reported as newly flooded
	let above_water = tile.mask_where(|v| f64::from(v) >= params.water_threshold_m);

	// every level above max_elev floods the whole land mask, so those
	// polygons are computed once and shared
	let mut full_flood: Option<Vec<Polygon<f64>>> = None;

	for &level in &params.sea_levels {
		let level_m = level.meters();
		if min_elev >= level_m {
			continue; // the lowest point already exceeds this level
		}

		let polygons = if max_elev < level_m {
			full_flood
				.get_or_insert_with(|| polygons_from_mask(&above_water, tile, params))
				.clone()
		} else {
			let flood_mask = tile.mask_where(|v| {
				let v = f64::from(v);
				v >= params.water_threshold_m && v < level_m
			});
			if !flood_mask.any() {
				continue;
			}
			polygons_from_mask(&flood_mask, tile, params)
		};

		if !polygons.is_empty() {
			results.insert(level, polygons);
		}
	}
	results
}

/// Vectorize a flood mask, drop polygons under the area threshold and
/// simplify the survivors. Polygons that degenerate or turn invalid during
/// simplification are dropped.
fn polygons_from_mask(mask: &MaskGrid, tile: &ElevationTile, params: &ExtractParams) -> Vec<Polygon<f64>> {
	trace_polygons(mask, tile.transform())
		.into_iter()
		.filter(|polygon| polygon.unsigned_area() >= params.min_polygon_area_m2)
		.filter_map(|polygon| simplify_polygon(polygon, params.simplify_tolerance_m))
		.collect()
}

fn simplify_polygon(polygon: Polygon<f64>, tolerance_m: f64) -> Option<Polygon<f64>> {
	if tolerance_m <= 0.0 {
		return Some(polygon);
	}
	let simplified = polygon.simplify(&tolerance_m);
	if simplified.exterior().0.len() < 4 {
		log::debug!("dropping polygon degenerated by simplification");
		return None;
	}
	// holes can collapse independently of the exterior
	let holes: Vec<geo::LineString<f64>> = simplified
		.interiors()
		.iter()
		.filter(|ring| ring.0.len() >= 4)
		.cloned()
		.collect();
	let simplified = Polygon::new(simplified.exterior().clone(), holes);
	// Douglas-Peucker can fold a concave ring into a bowtie
	if !simplified.is_valid() {
		log::debug!("dropping polygon made self-intersecting by simplification");
		return None;
	}
	Some(simplified)
}

#[cfg(test)]
mod tests {
	use super::*;
	use floodtiles_geometry::mask::PixelTransform;

	/// 10 m pixels, origin in the north-west corner, y growing southwards.
	fn test_transform() -> PixelTransform {
		PixelTransform::new([0.0, 10.0, 0.0, 1000.0, 0.0, -10.0])
	}

	fn tile_from_elevations(width: usize, height: usize, data: Vec<f32>) -> ElevationTile {
		ElevationTile::from_parts(data, width, height, test_transform(), None)
	}

	fn params(levels_cm: &[i32]) -> ExtractParams {
		ExtractParams {
			sea_levels: levels_cm.iter().map(|&cm| SeaLevel(cm)).collect(),
			water_threshold_m: 0.1,
			simplify_tolerance_m: 0.0,
			min_polygon_area_m2: 0.0,
			downsample: 1,
		}
	}

	#[test]
	fn test_uniform_tile_floods_completely() {
		let tile = tile_from_elevations(4, 4, vec![0.2; 16]);
		let result = extract_from_tile(&tile, &params(&[50]));
		assert_eq!(result.len(), 1);
		let polygons = &result[&SeaLevel(50)];
		assert_eq!(polygons.len(), 1);
		assert_eq!(polygons[0].unsigned_area(), 1600.0);
	}

	#[test]
	fn test_tile_below_threshold_never_floods() {
		let tile = tile_from_elevations(4, 4, vec![0.0; 16]);
		let result = extract_from_tile(&tile, &params(&[100]));
		assert!(result.is_empty());
	}

	#[test]
	fn test_tile_above_all_levels_never_floods() {
		let tile = tile_from_elevations(4, 4, vec![5.0; 16]);
		let result = extract_from_tile(&tile, &params(&[25, 50, 100]));
		assert!(result.is_empty());
	}

	#[test]
	fn test_existing_water_is_excluded() {
		// left half existing water (0.0), right half low-lying land (0.2)
		let data: Vec<f32> = (0..16).map(|i| if i % 4 < 2 { 0.0 } else { 0.2 }).collect();
		let tile = tile_from_elevations(4, 4, data);
		let result = extract_from_tile(&tile, &params(&[100]));
		let polygons = &result[&SeaLevel(100)];
		assert_eq!(polygons.len(), 1);
		// only the two land columns flood
		assert_eq!(polygons[0].unsigned_area(), 800.0);
	}

	#[test]
	fn test_levels_between_min_and_max_flood_partially() {
		// elevations rise along the row: 0.2, 0.4, 0.6, 0.8
		let data: Vec<f32> = (0..16).map(|i| 0.2 + (i % 4) as f32 * 0.2).collect();
		let tile = tile_from_elevations(4, 4, data);
		let result = extract_from_tile(&tile, &params(&[50, 70, 200]));
		// 0.5 m floods the first two columns, 0.7 m the first three,
		// 2.0 m everything
		assert_eq!(result[&SeaLevel(50)][0].unsigned_area(), 800.0);
		assert_eq!(result[&SeaLevel(70)][0].unsigned_area(), 1200.0);
		assert_eq!(result[&SeaLevel(200)][0].unsigned_area(), 1600.0);
	}

	#[test]
	fn test_full_flood_levels_share_polygons() {
		let tile = tile_from_elevations(4, 4, vec![0.2; 16]);
		let result = extract_from_tile(&tile, &params(&[100, 200, 300]));
		assert_eq!(result.len(), 3);
		assert_eq!(result[&SeaLevel(100)], result[&SeaLevel(200)]);
		assert_eq!(result[&SeaLevel(200)], result[&SeaLevel(300)]);
	}

	#[test]
	fn test_flood_masks_grow_monotonically() {
		let data: Vec<f32> = (0..64).map(|i| (i as f32) * 0.05).collect();
		let tile = tile_from_elevations(8, 8, data);
		let threshold = 0.1;
		let low = tile.mask_where(|v| f64::from(v) >= threshold && f64::from(v) < 1.0);
		let high = tile.mask_where(|v| f64::from(v) >= threshold && f64::from(v) < 2.0);
		assert!(low.count_set() > 0);
		assert!(low.is_subset_of(&high));
	}

	#[test]
	fn test_min_area_filter_drops_small_islands() {
		// one 1-pixel island (100 m2) and one 2x2 island (400 m2)
		let mut data = vec![0.0f32; 36];
		data[7] = 0.2; // (1,1)
		for (col, row) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
			data[row * 6 + col] = 0.2;
		}
		let tile = tile_from_elevations(6, 6, data);
		let mut p = params(&[100]);
		p.min_polygon_area_m2 = 200.0;
		let result = extract_from_tile(&tile, &p);
		let polygons = &result[&SeaLevel(100)];
		assert_eq!(polygons.len(), 1);
		assert_eq!(polygons[0].unsigned_area(), 400.0);
	}

	#[test]
	fn test_simplification_straightens_staircases() {
		// a diagonal staircase of flooded pixels simplifies to fewer vertices
		let tile = tile_from_elevations(
			6,
			6,
			(0..36)
				.map(|i| if (i % 6) <= i / 6 { 0.2f32 } else { 9.0 })
				.collect(),
		);
		let mut p = params(&[100]);
		let unsimplified = extract_from_tile(&tile, &p);
		p.simplify_tolerance_m = 15.0;
		let simplified = extract_from_tile(&tile, &p);
		let count = |map: &TileFloodMap| map[&SeaLevel(100)][0].exterior().0.len();
		assert!(count(&simplified) < count(&unsimplified));
	}

	#[test]
	fn test_simplification_drops_self_intersecting_polygons() {
		// a bowtie ring is self-intersecting and stays so through
		// simplification, so the gate has to reject it
		let bowtie = geo::Polygon::new(
			geo::LineString::from(vec![
				(0.0, 0.0),
				(100.0, 100.0),
				(100.0, 0.0),
				(0.0, 100.0),
				(0.0, 0.0),
			]),
			vec![],
		);
		assert!(!bowtie.is_valid());
		assert!(simplify_polygon(bowtie, 1.0).is_none());
	}

	#[test]
	fn test_simplification_keeps_valid_polygons() {
		let square = geo::Polygon::new(
			geo::LineString::from(vec![
				(0.0, 0.0),
				(100.0, 0.0),
				(100.0, 100.0),
				(0.0, 100.0),
				(0.0, 0.0),
			]),
			vec![],
		);
		let simplified = simplify_polygon(square, 3.0).unwrap();
		assert!(simplified.is_valid());
	}

	#[test]
	fn test_simplified_output_is_valid() {
		// concave staircase shapes are where Douglas-Peucker folds rings
		let data: Vec<f32> = (0..36)
			.map(|i| if (i % 6) <= i / 6 { 0.2f32 } else { 9.0 })
			.collect();
		let tile = tile_from_elevations(6, 6, data);
		let mut p = params(&[100]);
		p.simplify_tolerance_m = 15.0;
		let result = extract_from_tile(&tile, &p);
		for polygon in &result[&SeaLevel(100)] {
			assert!(polygon.is_valid());
		}
	}

	#[test]
	fn test_negative_sea_level_produces_nothing() {
		let tile = tile_from_elevations(4, 4, vec![0.2; 16]);
		let result = extract_from_tile(&tile, &params(&[-10]));
		assert!(result.is_empty());
	}

	#[test]
	fn test_levels_without_entry_are_absent() {
		let data: Vec<f32> = (0..16).map(|i| 0.2 + (i % 4) as f32 * 0.2).collect();
		let tile = tile_from_elevations(4, 4, data);
		// 0.15 m is above the threshold but below the lowest land pixel
		let result = extract_from_tile(&tile, &params(&[15, 50]));
		assert!(!result.contains_key(&SeaLevel(15)));
		assert!(result.contains_key(&SeaLevel(50)));
	}
}
