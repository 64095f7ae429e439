//! Elevation tile inventory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// List the elevation raster files (`*.tif` / `*.tiff`, case-insensitive) in
/// a directory, sorted by filename. The stable order keeps progress reports
/// and pool accumulation reproducible across runs.
pub fn list_elevation_tiles(folder: &Path) -> Result<Vec<PathBuf>> {
	let entries =
		std::fs::read_dir(folder).with_context(|| format!("failed to read elevation folder {folder:?}"))?;

	let mut tiles = Vec::new();
	for entry in entries {
		let path = entry
			.with_context(|| format!("failed to read directory entry in {folder:?}"))?
			.path();
		if path.is_file() && has_tiff_extension(&path) {
			tiles.push(path);
		}
	}
	tiles.sort();
	Ok(tiles)
}

fn has_tiff_extension(path: &Path) -> bool {
	path
		.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff"))
}
