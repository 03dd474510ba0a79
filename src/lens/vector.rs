//! Immutable 2D vector used for positions, foci and scale pairs.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::error::{LensError, LensResult};

/// An `(x, y)` pair. All operations return new values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
	pub x: f64,
	pub y: f64,
}

impl Vector2 {
	/// The origin.
	pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Both components set to `v`.
	pub const fn splat(v: f64) -> Self {
		Self { x: v, y: v }
	}

	pub fn length(self) -> f64 {
		self.x.hypot(self.y)
	}

	pub fn distance(self, other: Self) -> f64 {
		(self - other).length()
	}

	/// Unit vector in the same direction.
	///
	/// Fails with [`LensError::DegenerateGeometry`] for a zero-length (or
	/// non-finite) vector, which has no direction.
	pub fn try_normalize(self) -> LensResult<Self> {
		let len = self.length();
		if len > 0.0 && len.is_finite() {
			Ok(self * (1.0 / len))
		} else {
			Err(LensError::DegenerateGeometry("normalize of a zero-length vector"))
		}
	}

	/// Counter-clockwise rotation by `angle` radians.
	pub fn rotate(self, angle: f64) -> Self {
		let (sin, cos) = angle.sin_cos();
		Self {
			x: self.x * cos - self.y * sin,
			y: self.x * sin + self.y * cos,
		}
	}

	/// Component-wise product.
	pub fn scale_by(self, other: Self) -> Self {
		Self {
			x: self.x * other.x,
			y: self.y * other.y,
		}
	}

	/// Component-wise quotient.
	pub fn div_by(self, other: Self) -> Self {
		Self {
			x: self.x / other.x,
			y: self.y / other.y,
		}
	}

	pub fn clamp(self, min: Self, max: Self) -> Self {
		Self {
			x: self.x.clamp(min.x, max.x),
			y: self.y.clamp(min.y, max.y),
		}
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

impl Add for Vector2 {
	type Output = Self;

	fn add(self, rhs: Self) -> Self {
		Self::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Vector2 {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self {
		Self::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Vector2 {
	type Output = Self;

	fn mul(self, rhs: f64) -> Self {
		Self::new(self.x * rhs, self.y * rhs)
	}
}

impl Neg for Vector2 {
	type Output = Self;

	fn neg(self) -> Self {
		Self::new(-self.x, -self.y)
	}
}

impl From<(f64, f64)> for Vector2 {
	fn from((x, y): (f64, f64)) -> Self {
		Self { x, y }
	}
}
