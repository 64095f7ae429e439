//! Raster-to-vector extraction of binary masks.
//!
//! [`trace_polygons`] converts a pixel mask into polygons (with holes) in the
//! raster's projected coordinate system. Foreground pixels are connected
//! under 4-connectivity: diagonally touching pixels belong to different
//! polygons.
//!
//! The algorithm labels connected components, collects the directed boundary
//! edges of every foreground pixel (interior kept on the right-hand side),
//! and links them into closed rings, always preferring the right turn so
//! that diagonally touching components stay separate. Ring orientation on
//! the pixel lattice distinguishes outer boundaries from holes; component
//! labels group each hole with its enclosing boundary.

use crate::mask::{MaskGrid, PixelTransform};
use geo::{LineString, Polygon, Winding};
use std::collections::HashMap;

/// A vertex on the pixel-corner lattice, `(column, row)`.
type Corner = (u32, u32);

/// Edge directions on the corner lattice, in clockwise order (east, south,
/// west, north) so that the right turn is `(dir + 1) % 4`.
const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

const EAST: usize = 0;
const SOUTH: usize = 1;
const WEST: usize = 2;
const NORTH: usize = 3;

/// Outer boundary and holes of one connected component, on the pixel lattice.
#[derive(Default)]
struct ComponentRings {
	exterior: Option<Vec<Corner>>,
	holes: Vec<Vec<Corner>>,
}

/// Extract all polygons from `mask`, mapped to projected coordinates through
/// `transform`. Exterior rings are returned counterclockwise, holes
/// clockwise. The result is ordered by the raster-scan position of each
/// component's first pixel, so repeated runs produce identical output.
pub fn trace_polygons(mask: &MaskGrid, transform: &PixelTransform) -> Vec<Polygon<f64>> {
	let (labels, component_count) = label_components(mask);
	if component_count == 0 {
		return Vec::new();
	}

	let (starts, mut edges) = collect_boundary_edges(mask, &labels);

	let mut components: Vec<ComponentRings> = Vec::with_capacity(component_count);
	components.resize_with(component_count, ComponentRings::default);

	for (corner, dir) in starts {
		let Some(label) = edges.get(&corner).and_then(|slots| slots[dir]) else {
			continue; // already consumed by an earlier ring
		};
		let Some(ring) = follow_ring(corner, dir, label, &mut edges) else {
			continue;
		};
		let component = &mut components[(label - 1) as usize];
		let area2 = doubled_signed_area(&ring);
		if area2 > 0 {
			// positive on the y-down lattice means this is an outer boundary
			component.exterior.get_or_insert(ring);
		} else if area2 < 0 {
			component.holes.push(ring);
		}
	}

	components
		.into_iter()
		.filter_map(|component| {
			let mut exterior = ring_to_world(&component.exterior?, transform);
			exterior.make_ccw_winding();
			let holes = component
				.holes
				.iter()
				.map(|hole| {
					let mut ring = ring_to_world(hole, transform);
					ring.make_cw_winding();
					ring
				})
				.collect();
			Some(Polygon::new(exterior, holes))
		})
		.collect()
}

/// Label 4-connected foreground components, returning one label per cell
/// (0 for background) and the number of components. Labels are assigned in
/// raster-scan order starting at 1.
fn label_components(mask: &MaskGrid) -> (Vec<u32>, usize) {
	let (w, h) = (mask.width(), mask.height());
	let mut labels = vec![0u32; w * h];
	let mut count = 0u32;
	let mut stack = Vec::new();

	for start in 0..labels.len() {
		if labels[start] != 0 || !mask.get(start % w, start / w) {
			continue;
		}
		count += 1;
		labels[start] = count;
		stack.push(start);
		while let Some(idx) = stack.pop() {
			let (col, row) = (idx % w, idx / w);
			if col > 0 && mask.get(col - 1, row) && labels[idx - 1] == 0 {
				labels[idx - 1] = count;
				stack.push(idx - 1);
			}
			if col + 1 < w && mask.get(col + 1, row) && labels[idx + 1] == 0 {
				labels[idx + 1] = count;
				stack.push(idx + 1);
			}
			if row > 0 && mask.get(col, row - 1) && labels[idx - w] == 0 {
				labels[idx - w] = count;
				stack.push(idx - w);
			}
			if row + 1 < h && mask.get(col, row + 1) && labels[idx + w] == 0 {
				labels[idx + w] = count;
				stack.push(idx + w);
			}
		}
	}
	(labels, count as usize)
}

/// Collect every directed boundary edge. Edges run along pixel sides with the
/// owning pixel on their right-hand side, so each `(corner, direction)` pair
/// is emitted by at most one pixel. Start candidates are returned in
/// raster-scan order.
fn collect_boundary_edges(
	mask: &MaskGrid,
	labels: &[u32],
) -> (Vec<(Corner, usize)>, HashMap<Corner, [Option<u32>; 4]>) {
	let mut starts = Vec::new();
	let mut edges: HashMap<Corner, [Option<u32>; 4]> = HashMap::new();

	for row in 0..mask.height() {
		for col in 0..mask.width() {
			if !mask.get(col, row) {
				continue;
			}
			let label = labels[row * mask.width() + col];
			let (c, r) = (col as u32, row as u32);
			let mut add = |corner: Corner, dir: usize| {
				edges.entry(corner).or_insert([None; 4])[dir] = Some(label);
				starts.push((corner, dir));
			};
			if row == 0 || !mask.get(col, row - 1) {
				add((c, r), EAST);
			}
			if !mask.get(col + 1, row) {
				add((c + 1, r), SOUTH);
			}
			if !mask.get(col, row + 1) {
				add((c + 1, r + 1), WEST);
			}
			if col == 0 || !mask.get(col - 1, row) {
				add((c, r + 1), NORTH);
			}
		}
	}
	(starts, edges)
}

/// Walk one closed ring starting from `(start, dir)`, consuming edges of the
/// given component label. At corners shared by two edges the right turn is
/// taken first, which keeps diagonally touching regions in separate rings.
/// Collinear steps are merged. Returns `None` if the walk cannot be closed
/// (a malformed edge set), in which case the partial ring is discarded.
fn follow_ring(
	start: Corner,
	start_dir: usize,
	label: u32,
	edges: &mut HashMap<Corner, [Option<u32>; 4]>,
) -> Option<Vec<Corner>> {
	let mut ring = vec![start];
	let mut pos = start;
	let mut dir = start_dir;
	let mut prev_dir = usize::MAX;

	loop {
		if let Some(slots) = edges.get_mut(&pos) {
			slots[dir] = None;
		}
		let (dx, dy) = DIRECTIONS[dir];
		let next = ((i64::from(pos.0) + dx) as u32, (i64::from(pos.1) + dy) as u32);
		if dir == prev_dir {
			*ring.last_mut()? = next;
		} else {
			ring.push(next);
		}
		prev_dir = dir;
		if next == start {
			return Some(ring);
		}
		pos = next;
		let slots = edges.get(&pos)?;
		dir = [(dir + 1) % 4, dir, (dir + 3) % 4, (dir + 2) % 4]
			.into_iter()
			.find(|d| slots[*d] == Some(label))?;
	}
}

/// Twice the signed area of a closed lattice ring (shoelace). Positive for
/// outer boundaries as traced here, negative for holes.
fn doubled_signed_area(ring: &[Corner]) -> i64 {
	let mut sum = 0i64;
	for pair in ring.windows(2) {
		let (x1, y1) = (i64::from(pair[0].0), i64::from(pair[0].1));
		let (x2, y2) = (i64::from(pair[1].0), i64::from(pair[1].1));
		sum += x1 * y2 - x2 * y1;
	}
	sum
}

fn ring_to_world(ring: &[Corner], transform: &PixelTransform) -> LineString<f64> {
	LineString::from(
		ring
			.iter()
			.map(|&(x, y)| transform.apply(f64::from(x), f64::from(y)))
			.collect::<Vec<(f64, f64)>>(),
	)
}
