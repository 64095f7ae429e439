//! Foundation crate of the floodtiles workspace.
//!
//! Contains the pieces every other crate leans on: a small JSON value model
//! with compact and pretty serialization, concurrency limits for the worker
//! pools, and numeric helpers shared by the pipeline.

pub mod concurrency;
pub use concurrency::*;
pub mod json;
pub mod utils;
pub use utils::*;
