//! Concurrency limit tuning for the pipeline worker pools.
//!
//! Both pipeline phases (tile extraction, sea-level aggregation) are
//! CPU-bound, so workers are limited to one per logical CPU to avoid
//! context-switching overhead.

/// Concurrency limits for the pipeline worker pools.
#[derive(Debug, Clone, Copy)]
pub struct ConcurrencyLimits {
	/// Concurrency for CPU-bound operations (mask construction,
	/// polygonization, union, reprojection).
	pub cpu_bound: usize,
}

impl ConcurrencyLimits {
	/// Create concurrency limits with a custom worker count.
	pub fn new(cpu_bound: usize) -> Self {
		Self {
			cpu_bound: cpu_bound.max(1),
		}
	}

	/// Get the number of logical CPUs available.
	pub fn cpu_count() -> usize {
		num_cpus::get()
	}
}

impl Default for ConcurrencyLimits {
	/// One CPU-bound worker per logical CPU.
	fn default() -> Self {
		Self {
			cpu_bound: num_cpus::get().max(1),
		}
	}
}
