//! Distortion curves mapping a normalized distance in `[0, 1]` to `[0, 1]`.
//!
//! Two families live here:
//!
//! - [`FisheyeCurve`]: the exponential lens profile shared by the cartesian
//!   and polar filters. Shaped by `center_height`, the curve's value at the
//!   midpoint; `0.5` is the identity line.
//! - [`LogisticFalloff`]: the size/opacity falloff used by proximity scaling,
//!   normalized so that distance `0` maps to `1` and distance `1` maps to `0`.

use super::error::{LensError, LensResult, ensure_finite};

/// Center height that turns the fisheye curve into the identity.
pub const IDENTITY_CENTER_HEIGHT: f64 = 0.5;

/// Exponential lens profile `(b^d - 1) / (b - 1)` with
/// `b = (1 / center_height - 1)^2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FisheyeCurve {
	center_height: f64,
	shape: f64,
}

impl FisheyeCurve {
	/// The identity curve (`center_height = 0.5`, `b = 1`).
	pub const IDENTITY: Self = Self {
		center_height: IDENTITY_CENTER_HEIGHT,
		shape: 1.0,
	};

	/// Build a curve from its midpoint value. Must lie strictly inside `(0, 1)`.
	pub fn new(center_height: f64) -> LensResult<Self> {
		let center_height = ensure_finite("centerHeight", center_height)?;
		if center_height <= 0.0 || center_height >= 1.0 {
			return Err(LensError::invalid(
				"centerHeight",
				center_height,
				"must lie in (0, 1)",
			));
		}
		let inv = 1.0 / center_height - 1.0;
		Ok(Self {
			center_height,
			shape: inv * inv,
		})
	}

	pub fn center_height(&self) -> f64 {
		self.center_height
	}

	/// The exponent base `b`.
	pub fn shape(&self) -> f64 {
		self.shape
	}

	/// Exact check for the identity configuration. Callers use this to skip a
	/// full-screen pass, so it compares the configured value, not the output.
	pub fn is_identity(&self) -> bool {
		self.center_height == IDENTITY_CENTER_HEIGHT
	}

	/// Distort a fractional distance. Endpoints `0` and `1` are fixed points.
	pub fn distort(&self, d: f64) -> f64 {
		let b = self.shape;
		if b == 1.0 {
			return d;
		}
		(b.powf(d) - 1.0) / (b - 1.0)
	}
}

impl Default for FisheyeCurve {
	fn default() -> Self {
		Self::IDENTITY
	}
}

/// One-shot form of [`FisheyeCurve::distort`].
pub fn distort_distance(d: f64, center_height: f64) -> LensResult<f64> {
	Ok(FisheyeCurve::new(center_height)?.distort(d))
}

/// Logistic falloff `1 / (1 + exp(-steepness * (midpoint - x)))`, rescaled so
/// the curve spans exactly `[0, 1]` over the input range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogisticFalloff {
	midpoint: f64,
	steepness: f64,
}

impl LogisticFalloff {
	/// A falloff with `steepness = 0`: every object keeps its original scale.
	pub const DISABLED: Self = Self {
		midpoint: 0.5,
		steepness: 0.0,
	};

	pub fn new(midpoint: f64, steepness: f64) -> LensResult<Self> {
		let midpoint = ensure_finite("midpoint", midpoint)?;
		let steepness = ensure_finite("steepness", steepness)?;
		if !(0.0..=1.0).contains(&midpoint) {
			return Err(LensError::invalid(
				"midpoint",
				midpoint,
				"must lie in [0, 1]",
			));
		}
		if steepness < 0.0 {
			return Err(LensError::invalid("steepness", steepness, "must be >= 0"));
		}
		Ok(Self {
			midpoint,
			steepness,
		})
	}

	pub fn midpoint(&self) -> f64 {
		self.midpoint
	}

	pub fn steepness(&self) -> f64 {
		self.steepness
	}

	/// `steepness == 0` switches proximity scaling off.
	pub fn is_disabled(&self) -> bool {
		self.steepness == 0.0
	}

	fn logistic(&self, x: f64) -> f64 {
		1.0 / (1.0 + (-self.steepness * (self.midpoint - x)).exp())
	}

	/// Map a normalized distance to a distortion factor.
	///
	/// `distance` is clamped to `[0, 1]`; `distort(0) == 1` and
	/// `distort(1) == 0` hold exactly for any enabled falloff.
	pub fn distort(&self, distance: f64) -> f64 {
		if self.is_disabled() {
			return 1.0;
		}
		let near = self.logistic(0.0);
		let far = self.logistic(1.0);
		let span = near - far;
		// Saturated or vanishing curves collapse the span; treat as no scaling.
		if span == 0.0 || !span.is_finite() {
			return 1.0;
		}
		let d = if distance.is_nan() {
			0.0
		} else {
			distance.clamp(0.0, 1.0)
		};
		(self.logistic(d) - far) / span
	}
}

impl Default for LogisticFalloff {
	fn default() -> Self {
		Self::DISABLED
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	const EPS: f64 = 1e-9;

	#[test]
	fn identity_shape_is_exactly_one() {
		let curve = FisheyeCurve::new(0.5).unwrap();
		assert_eq!(curve.shape(), 1.0);
		assert!(curve.is_identity());
		assert_eq!(curve.distort(0.37), 0.37);
	}

	#[test]
	fn rejects_center_height_outside_open_interval() {
		for bad in [0.0, 1.0, -0.2, 1.5, f64::NAN, f64::INFINITY] {
			assert!(
				matches!(
					FisheyeCurve::new(bad),
					Err(LensError::InvalidParameter { name: "centerHeight", .. })
				),
				"accepted {bad}"
			);
		}
		assert!(distort_distance(0.5, 1.0).is_err());
	}

	#[test]
	fn high_center_height_bulges_above_identity() {
		// b = 0.0625 for 0.8; the midpoint lands at 0.8 by construction.
		let curve = FisheyeCurve::new(0.8).unwrap();
		assert!((curve.shape() - 0.0625).abs() < EPS);
		assert!((curve.distort(0.5) - 0.8).abs() < EPS);
	}

	#[test]
	fn logistic_disabled_is_constant_one() {
		let falloff = LogisticFalloff::new(0.3, 0.0).unwrap();
		assert!(falloff.is_disabled());
		for d in [0.0, 0.25, 1.0, 7.0] {
			assert_eq!(falloff.distort(d), 1.0);
		}
	}

	#[test]
	fn logistic_clamps_input() {
		let falloff = LogisticFalloff::new(0.4, 12.0).unwrap();
		assert_eq!(falloff.distort(-3.0), 1.0);
		assert_eq!(falloff.distort(4.0), 0.0);
	}

	#[test]
	fn logistic_rejects_bad_parameters() {
		assert!(LogisticFalloff::new(1.2, 5.0).is_err());
		assert!(LogisticFalloff::new(0.5, -1.0).is_err());
		assert!(LogisticFalloff::new(f64::NAN, 1.0).is_err());
	}

	proptest! {
		#[test]
		fn identity_curve_for_half_height(d in 0.0f64..=1.0) {
			let out = distort_distance(d, 0.5).unwrap();
			prop_assert!((out - d).abs() < EPS);
		}

		#[test]
		fn fisheye_endpoints_fixed(h in 0.001f64..0.999) {
			let curve = FisheyeCurve::new(h).unwrap();
			prop_assert!(curve.distort(0.0).abs() < EPS);
			prop_assert!((curve.distort(1.0) - 1.0).abs() < EPS);
		}

		#[test]
		fn fisheye_stays_in_unit_range(h in 0.01f64..0.99, d in 0.0f64..=1.0) {
			let out = FisheyeCurve::new(h).unwrap().distort(d);
			prop_assert!((-EPS..=1.0 + EPS).contains(&out));
		}

		#[test]
		fn logistic_endpoints_exact(m in 0.01f64..0.99, s in 0.01f64..50.0) {
			let falloff = LogisticFalloff::new(m, s).unwrap();
			prop_assert_eq!(falloff.distort(0.0), 1.0);
			prop_assert_eq!(falloff.distort(1.0), 0.0);
		}

		#[test]
		fn logistic_is_monotone_decreasing(
			m in 0.01f64..0.99,
			s in 0.1f64..30.0,
			a in 0.0f64..=1.0,
			b in 0.0f64..=1.0,
		) {
			let falloff = LogisticFalloff::new(m, s).unwrap();
			let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
			prop_assert!(falloff.distort(lo) + EPS >= falloff.distort(hi));
		}
	}
}
