//! Small numeric helpers shared across the pipeline.

/// Round a centimeter value to the nearest multiple of `step_cm`.
///
/// Ties round half-to-even, so projections sitting exactly between two steps
/// on either side collapse onto the same shared layer (47.5 and 52.5 both
/// round to 50 with a 5 cm step). A non-positive step is treated as 1.
pub fn round_to_step(value_cm: f64, step_cm: i32) -> i32 {
	let step = step_cm.max(1);
	(value_cm / f64::from(step)).round_ties_even() as i32 * step
}

/// Round a value to `digits` fractional digits.
pub fn round_to_digits(value: f64, digits: u8) -> f64 {
	let factor = 10f64.powi(i32::from(digits));
	(value * factor).round() / factor
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(25.0, 5, 25)]
	#[case(47.5, 5, 50)]
	#[case(52.5, 5, 50)]
	#[case(82.5, 5, 80)]
	#[case(82.6, 5, 85)]
	#[case(0.0, 5, 0)]
	#[case(-12.5, 5, -10)]
	#[case(210.0, 5, 210)]
	#[case(33.0, 10, 30)]
	fn test_round_to_step(#[case] value: f64, #[case] step: i32, #[case] expected: i32) {
		assert_eq!(round_to_step(value, step), expected);
	}

	#[test]
	fn test_round_to_step_guards_zero_step() {
		assert_eq!(round_to_step(12.4, 0), 12);
	}

	#[rstest]
	#[case(12.3456789, 6, 12.345679)]
	#[case(12.3456789, 2, 12.35)]
	#[case(-0.0000004, 6, -0.0)]
	#[case(9.0, 6, 9.0)]
	fn test_round_to_digits(#[case] value: f64, #[case] digits: u8, #[case] expected: f64) {
		assert_eq!(round_to_digits(value, digits), expected);
	}
}
