use anyhow::Result;
use floodtiles_pipeline::raster::ElevationTile;
use std::collections::HashMap;
use std::path::PathBuf;

/// Elevation bands of the height distribution report, in meters.
const BANDS: [(f64, f64); 11] = [
	(-1.0, 0.0),
	(0.0, 0.1),
	(0.1, 0.2),
	(0.2, 0.3),
	(0.3, 0.4),
	(0.4, 0.5),
	(0.5, 1.0),
	(1.0, 2.0),
	(2.0, 5.0),
	(5.0, 10.0),
	(10.0, 25.0),
];

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// elevation raster to inspect
	#[arg()]
	file: PathBuf,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let tile = ElevationTile::open(&arguments.file)?;

	println!(
		"{} ({}x{} pixels, {})",
		arguments.file.display(),
		tile.width(),
		tile.height(),
		tile.crs().unwrap_or("unknown CRS")
	);

	let Some((min, max)) = tile.min_max() else {
		println!("tile contains no valid samples");
		return Ok(());
	};
	println!("elevation range: {min:.2}m to {max:.2}m");

	let valid: Vec<f64> = tile
		.data()
		.iter()
		.filter(|v| tile.is_valid(**v))
		.map(|v| f64::from(*v))
		.collect();
	let total = valid.len();

	println!();
	println!("=== Height distribution ===");
	for (&(low, high), count) in BANDS.iter().zip(band_counts(&valid)) {
		let pct = percentage(count, total);
		println!("  {low:6.1}m to {high:5.1}m : {count:>8} pixels ({pct:5.1}%) {}", bar(pct));
	}
	println!();
	println!("  Total pixels: {total}");

	println!();
	println!("=== 10 most common heights (rounded to 0.1m) ===");
	for (height, count) in most_common_heights(&valid, 10) {
		println!("  {:6.1}m : {count:>8} pixels", height as f64 / 10.0);
	}

	Ok(())
}

/// Pixel counts per elevation band. Bands are half-open `[low, high)`;
/// samples outside every band are not counted.
fn band_counts(values: &[f64]) -> Vec<usize> {
	BANDS
		.iter()
		.map(|(low, high)| values.iter().filter(|v| **v >= *low && **v < *high).count())
		.collect()
}

fn percentage(count: usize, total: usize) -> f64 {
	if total == 0 {
		return 0.0;
	}
	100.0 * count as f64 / total as f64
}

fn bar(pct: f64) -> String {
	"#".repeat(pct as usize)
}

/// The most common heights rounded to 0.1 m, as `(decimeters, count)`,
/// most frequent first; equal counts order by ascending height.
fn most_common_heights(values: &[f64], limit: usize) -> Vec<(i64, usize)> {
	let mut counts: HashMap<i64, usize> = HashMap::new();
	for value in values {
		*counts.entry((value * 10.0).round() as i64).or_default() += 1;
	}
	let mut sorted: Vec<(i64, usize)> = counts.into_iter().collect();
	sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
	sorted.truncate(limit);
	sorted
}
