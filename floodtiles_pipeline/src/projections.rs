//! Loading of the sea-level projection table and construction of the
//! `(scenario, year)` lookup.
//!
//! Projected rises are quantized to the configured centimeter step, so
//! projections that differ by trivial amounts share one expensive layer.

use anyhow::{Context, Result};
use floodtiles_core::json::JsonObject;
use floodtiles_core::round_to_step;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// One row of the sea-level projection table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectionRecord {
	pub scenario: String,
	pub year: i32,
	pub sea_level_cm: f64,
}

/// A sea level quantized to whole centimeters.
///
/// All projections that round to the same value share one output layer.
/// Negative values are representable; they simply never produce geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeaLevel(pub i32);

impl SeaLevel {
	#[must_use]
	pub fn from_cm(value_cm: f64, step_cm: i32) -> Self {
		Self(round_to_step(value_cm, step_cm))
	}

	#[must_use]
	pub fn cm(&self) -> i32 {
		self.0
	}

	#[must_use]
	pub fn meters(&self) -> f64 {
		f64::from(self.0) / 100.0
	}

	/// Name of the layer file shared by every projection rounding here.
	#[must_use]
	pub fn file_name(&self) -> String {
		format!("flood_{}cm.geojson", self.0)
	}
}

impl fmt::Display for SeaLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}m", self.meters())
	}
}

/// One entry of the lookup table, keyed by `"{scenario}_{year}"`.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupEntry {
	pub scenario: String,
	pub year: i32,
	pub exact_cm: f64,
	pub rounded_cm: i32,
	pub geojson_file: String,
}

impl LookupEntry {
	fn to_json(&self) -> JsonObject {
		let mut obj = JsonObject::new();
		obj.set("scenario", &self.scenario);
		obj.set("year", self.year);
		obj.set("exact_cm", self.exact_cm);
		obj.set("rounded_cm", self.rounded_cm);
		obj.set("geojson_file", &self.geojson_file);
		obj
	}
}

/// The loaded projection table: the lookup plus the deduplicated, ascending
/// sequence of sea levels.
#[derive(Debug, Clone, Default)]
pub struct ProjectionTable {
	lookup: BTreeMap<String, LookupEntry>,
	sea_levels: Vec<SeaLevel>,
}

impl ProjectionTable {
	/// Read the projection table from a CSV file with the columns
	/// `scenario`, `year`, `sea_level_cm`. Any malformed row is an error.
	pub fn from_csv_path(path: &Path, rounding_step_cm: i32) -> Result<Self> {
		let reader = csv::Reader::from_path(path)
			.with_context(|| format!("failed to open projection table {path:?}"))?;
		Self::from_csv_reader(reader, rounding_step_cm).with_context(|| format!("failed to parse projection table {path:?}"))
	}

	pub fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>, rounding_step_cm: i32) -> Result<Self> {
		let mut records = Vec::new();
		for (index, record) in reader.deserialize().enumerate() {
			let record: ProjectionRecord = record.with_context(|| format!("malformed projection row {}", index + 1))?;
			records.push(record);
		}
		Ok(Self::from_records(records, rounding_step_cm))
	}

	pub fn from_records(records: Vec<ProjectionRecord>, rounding_step_cm: i32) -> Self {
		let mut lookup = BTreeMap::new();
		let mut unique = BTreeSet::new();
		for record in records {
			let level = SeaLevel::from_cm(record.sea_level_cm, rounding_step_cm);
			// duplicate (scenario, year) keys overwrite; the last row wins
			lookup.insert(
				format!("{}_{}", record.scenario, record.year),
				LookupEntry {
					scenario: record.scenario,
					year: record.year,
					exact_cm: record.sea_level_cm,
					rounded_cm: level.cm(),
					geojson_file: level.file_name(),
				},
			);
			unique.insert(level);
		}
		Self {
			lookup,
			sea_levels: unique.into_iter().collect(),
		}
	}

	/// Number of lookup entries.
	#[must_use]
	pub fn len(&self) -> usize {
		self.lookup.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.lookup.is_empty()
	}

	/// The deduplicated sea levels, ascending.
	#[must_use]
	pub fn sea_levels(&self) -> &[SeaLevel] {
		&self.sea_levels
	}

	#[must_use]
	pub fn lookup(&self) -> &BTreeMap<String, LookupEntry> {
		&self.lookup
	}

	pub fn to_json(&self) -> JsonObject {
		let mut obj = JsonObject::new();
		for (key, entry) in &self.lookup {
			obj.set(key, entry.to_json());
		}
		obj
	}
}
