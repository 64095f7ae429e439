//! Geometric data structures and raster-to-vector utilities for floodtiles.
//!
//! It includes modules for:
//! - `geo`: the GeoJSON-facing feature model (features, collections,
//!   properties) with precision-rounded serialization.
//! - `mask`: binary pixel masks and the affine pixel-to-world transform.
//! - `vectorize`: extraction of polygons (with holes) from a pixel mask
//!   under 4-connectivity.
//!
//! These modules form the geometric backbone between the raster side of the
//! pipeline and its GeoJSON output.

pub mod geo;
pub mod mask;
pub mod vectorize;
