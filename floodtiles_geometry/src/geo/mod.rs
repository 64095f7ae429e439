//! The GeoJSON-facing feature model.
//!
//! `GeoFeature` wraps a polygon geometry with free-form properties;
//! `GeoCollection` is the corresponding FeatureCollection container. Both
//! serialize through the JSON model in `floodtiles_core`, with optional
//! coordinate rounding applied at serialization time.

mod collection;
mod feature;
mod properties;
mod types;
mod value;

pub use collection::*;
pub use feature::*;
pub use properties::*;
pub use types::*;
pub use value::*;
