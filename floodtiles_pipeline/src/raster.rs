//! Elevation raster access.
//!
//! Tiles are read fully into memory as single-precision elevations in
//! meters, together with the affine pixel-to-world transform. Memory-heavy
//! rasters can be downsampled by an integer factor with area averaging; a
//! factor of 2 cuts per-tile memory by 4x.

use anyhow::{Context, Result, ensure};
use floodtiles_geometry::mask::{MaskGrid, PixelTransform};
use gdal::Dataset;
use gdal::spatial_ref::{AxisMappingStrategy, SpatialRef};
use std::path::Path;

/// Spatial reference for an EPSG code, forced to traditional GIS axis order
/// (x = easting / longitude) regardless of the authority definition.
pub fn get_spatial_ref(epsg: u32) -> Result<SpatialRef> {
	let mut srs = SpatialRef::from_epsg(epsg)
		.with_context(|| format!("failed to create spatial reference for EPSG:{epsg}"))?;
	srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
	Ok(srs)
}

/// One elevation tile: band 1 of a raster file, in meters above baseline.
pub struct ElevationTile {
	data: Vec<f32>,
	width: usize,
	height: usize,
	transform: PixelTransform,
	nodata: Option<f64>,
	crs: Option<String>,
}

impl ElevationTile {
	pub fn open(path: &Path) -> Result<Self> {
		let dataset = Dataset::open(path).with_context(|| format!("failed to open raster {path:?}"))?;
		Self::from_dataset(&dataset).with_context(|| format!("failed to read raster {path:?}"))
	}

	/// Read band 1, the geotransform and the nodata marker from an open
	/// dataset.
	pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
		let (width, height) = dataset.raster_size();
		ensure!(width > 0 && height > 0, "raster has no pixels");

		let geo_transform = dataset.geo_transform().context("raster has no geotransform")?;

		let band = dataset.rasterband(1).context("raster has no band 1")?;
		let nodata = band.no_data_value();
		let buffer = band.read_band_as::<f32>().context("failed to read elevation band")?;
		let data = buffer.data().to_vec();
		ensure!(
			data.len() == width * height,
			"band data length mismatch: expected {} but got {}",
			width * height,
			data.len()
		);

		let crs = dataset.spatial_ref().ok().and_then(|srs| {
			match (srs.auth_name(), srs.auth_code()) {
				(Ok(name), Ok(code)) => Some(format!("{name}:{code}")),
				_ => None,
			}
		});

		Ok(Self {
			data,
			width,
			height,
			transform: PixelTransform::new(geo_transform),
			nodata,
			crs,
		})
	}

	#[must_use]
	pub fn width(&self) -> usize {
		self.width
	}

	#[must_use]
	pub fn height(&self) -> usize {
		self.height
	}

	#[must_use]
	pub fn transform(&self) -> &PixelTransform {
		&self.transform
	}

	/// Authority label of the tile CRS (for example `EPSG:25832`), if the
	/// raster carries one.
	#[must_use]
	pub fn crs(&self) -> Option<&str> {
		self.crs.as_deref()
	}

	#[must_use]
	pub fn data(&self) -> &[f32] {
		&self.data
	}

	/// True for real elevation samples (not nodata, not NaN).
	#[must_use]
	pub fn is_valid(&self, value: f32) -> bool {
		if value.is_nan() {
			return false;
		}
		match self.nodata {
			Some(nodata) => f64::from(value) != nodata,
			None => true,
		}
	}

	/// Minimum and maximum over valid samples; `None` if the tile has none.
	#[must_use]
	pub fn min_max(&self) -> Option<(f32, f32)> {
		let mut result: Option<(f32, f32)> = None;
		for &value in &self.data {
			if !self.is_valid(value) {
				continue;
			}
			result = Some(match result {
				Some((low, high)) => (low.min(value), high.max(value)),
				None => (value, value),
			});
		}
		result
	}

	/// Build a mask over the valid samples satisfying `predicate`.
	pub fn mask_where(&self, predicate: impl Fn(f32) -> bool) -> MaskGrid {
		MaskGrid::from_fn(self.width, self.height, |col, row| {
			let value = self.data[row * self.width + col];
			self.is_valid(value) && predicate(value)
		})
	}

	/// Downsample by an integer factor using area averaging over the valid
	/// samples of each block. Blocks without any valid sample become nodata.
	/// The transform is rescaled so pixel positions keep mapping to the same
	/// projected coordinates. A factor of 1 (or 0) returns the tile
	/// unchanged.
	#[must_use]
	pub fn downsample(self, factor: usize) -> Self {
		if factor <= 1 {
			return self;
		}
		let out_width = self.width.div_ceil(factor);
		let out_height = self.height.div_ceil(factor);
		// marker for empty blocks; NaN when the source has no nodata value
		let fill = self.nodata.map_or(f32::NAN, |nodata| nodata as f32);
		let mut data = vec![fill; out_width * out_height];

		for out_row in 0..out_height {
			for out_col in 0..out_width {
				let mut sum = 0f64;
				let mut count = 0u32;
				for row in (out_row * factor)..((out_row + 1) * factor).min(self.height) {
					for col in (out_col * factor)..((out_col + 1) * factor).min(self.width) {
						let value = self.data[row * self.width + col];
						if self.is_valid(value) {
							sum += f64::from(value);
							count += 1;
						}
					}
				}
				if count > 0 {
					data[out_row * out_width + out_col] = (sum / f64::from(count)) as f32;
				}
			}
		}

		Self {
			data,
			width: out_width,
			height: out_height,
			transform: self.transform.scaled(factor as f64),
			nodata: self.nodata,
			crs: self.crs,
		}
	}
}

#[cfg(test)]
impl ElevationTile {
	/// Assemble a tile directly from parts, bypassing GDAL.
	pub fn from_parts(data: Vec<f32>, width: usize, height: usize, transform: PixelTransform, nodata: Option<f64>) -> Self {
		assert_eq!(data.len(), width * height);
		Self {
			data,
			width,
			height,
			transform,
			nodata,
			crs: None,
		}
	}
}
