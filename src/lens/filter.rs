//! Fisheye lens filters evaluated in normalized `[0, 1] x [0, 1]` viewport space.
//!
//! A filter is a small `Copy` value: focus plus curve parameters. The frame
//! loop owns the current value, replaces its focus once per frame, and hands
//! it to the renderer as a [`LensFilter`] for a full-screen post-process pass.
//! The renderer calls [`LensFilter::evaluate`] per output pixel to find the
//! source coordinate to sample.

use super::curve::FisheyeCurve;
use super::error::{LensError, LensResult, ensure_finite};
use super::vector::Vector2;

/// Validates a focus point: finite and inside the unit square.
fn check_focus(focus: Vector2) -> LensResult<Vector2> {
	let x = ensure_finite("focus.x", focus.x)?;
	let y = ensure_finite("focus.y", focus.y)?;
	if !(0.0..=1.0).contains(&x) {
		return Err(LensError::invalid("focus.x", x, "must lie in [0, 1]"));
	}
	if !(0.0..=1.0).contains(&y) {
		return Err(LensError::invalid("focus.y", y, "must lie in [0, 1]"));
	}
	Ok(focus)
}

/// Distort one axis around `focus`, treating `0` and `1` as fixed edges.
fn distort_axis(v: f64, focus: f64, curve: &FisheyeCurve) -> f64 {
	let edge = if v < focus { 0.0 } else { 1.0 };
	let span = edge - focus;
	// Focus sitting on the edge it would stretch towards: nothing to distort.
	if span == 0.0 {
		return v;
	}
	let d = (v - focus) / span;
	focus + curve.distort(d) * span
}

/// Per-axis fisheye: x and y are distorted independently.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianFisheye {
	focus: Vector2,
	curve_x: FisheyeCurve,
	curve_y: FisheyeCurve,
}

impl CartesianFisheye {
	/// Same center height on both axes.
	pub fn new(center_height: f64) -> LensResult<Self> {
		Self::with_axes(center_height, center_height)
	}

	pub fn with_axes(center_height_x: f64, center_height_y: f64) -> LensResult<Self> {
		Ok(Self {
			focus: Vector2::splat(0.5),
			curve_x: FisheyeCurve::new(center_height_x)?,
			curve_y: FisheyeCurve::new(center_height_y)?,
		})
	}

	pub fn focus(&self) -> Vector2 {
		self.focus
	}

	pub fn set_focus(&mut self, focus: Vector2) -> LensResult<()> {
		self.focus = check_focus(focus)?;
		Ok(())
	}

	/// Copy of this filter centered on `focus`.
	pub fn with_focus(mut self, focus: Vector2) -> LensResult<Self> {
		self.set_focus(focus)?;
		Ok(self)
	}

	/// Per-axis center heights as `(x, y)`.
	pub fn center_height(&self) -> Vector2 {
		Vector2::new(self.curve_x.center_height(), self.curve_y.center_height())
	}

	/// Set both axes at once. Leaves the filter untouched on error.
	pub fn set_center_height(&mut self, center_height: f64) -> LensResult<()> {
		self.set_center_height_xy(center_height, center_height)
	}

	pub fn set_center_height_xy(&mut self, x: f64, y: f64) -> LensResult<()> {
		let curve_x = FisheyeCurve::new(x)?;
		let curve_y = FisheyeCurve::new(y)?;
		self.curve_x = curve_x;
		self.curve_y = curve_y;
		Ok(())
	}

	/// Both axes configured at exactly `0.5`.
	pub fn is_identity(&self) -> bool {
		self.curve_x.is_identity() && self.curve_y.is_identity()
	}

	pub fn distort(&self, v: Vector2) -> Vector2 {
		Vector2::new(
			distort_axis(v.x, self.focus.x, &self.curve_x),
			distort_axis(v.y, self.focus.y, &self.curve_y),
		)
	}
}

/// Radial fisheye limited to a disc of `radius` around the focus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarFisheye {
	focus: Vector2,
	curve: FisheyeCurve,
	radius: f64,
}

impl PolarFisheye {
	pub fn new(center_height: f64, radius: f64) -> LensResult<Self> {
		Ok(Self {
			focus: Vector2::splat(0.5),
			curve: FisheyeCurve::new(center_height)?,
			radius: check_radius(radius)?,
		})
	}

	pub fn focus(&self) -> Vector2 {
		self.focus
	}

	pub fn set_focus(&mut self, focus: Vector2) -> LensResult<()> {
		self.focus = check_focus(focus)?;
		Ok(())
	}

	/// Copy of this filter centered on `focus`.
	pub fn with_focus(mut self, focus: Vector2) -> LensResult<Self> {
		self.set_focus(focus)?;
		Ok(self)
	}

	pub fn center_height(&self) -> f64 {
		self.curve.center_height()
	}

	pub fn set_center_height(&mut self, center_height: f64) -> LensResult<()> {
		self.curve = FisheyeCurve::new(center_height)?;
		Ok(())
	}

	pub fn radius(&self) -> f64 {
		self.radius
	}

	pub fn set_radius(&mut self, radius: f64) -> LensResult<()> {
		self.radius = check_radius(radius)?;
		Ok(())
	}

	pub fn is_identity(&self) -> bool {
		self.curve.is_identity()
	}

	/// Points outside the radius, and the focus itself, are returned unchanged.
	pub fn distort(&self, v: Vector2) -> Vector2 {
		let offset = v - self.focus;
		let dist = offset.length();
		if dist > self.radius {
			return v;
		}
		match offset.try_normalize() {
			Ok(dir) => self.focus + dir * (self.curve.distort(dist / self.radius) * self.radius),
			// At the focus there is no ray to follow.
			Err(_) => v,
		}
	}
}

fn check_radius(radius: f64) -> LensResult<f64> {
	let radius = ensure_finite("radius", radius)?;
	if radius <= 0.0 {
		return Err(LensError::invalid("radius", radius, "must be > 0"));
	}
	Ok(radius)
}

/// The closed set of post-process passes the renderer knows how to apply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LensFilter {
	Cartesian(CartesianFisheye),
	Polar(PolarFisheye),
}

impl LensFilter {
	/// Source coordinate to sample for normalized output coordinate `v`.
	pub fn evaluate(&self, v: Vector2) -> Vector2 {
		match self {
			LensFilter::Cartesian(f) => f.distort(v),
			LensFilter::Polar(f) => f.distort(v),
		}
	}

	/// Identity filters are skipped instead of run as a wasted pass.
	pub fn is_identity(&self) -> bool {
		match self {
			LensFilter::Cartesian(f) => f.is_identity(),
			LensFilter::Polar(f) => f.is_identity(),
		}
	}

	pub fn focus(&self) -> Vector2 {
		match self {
			LensFilter::Cartesian(f) => f.focus(),
			LensFilter::Polar(f) => f.focus(),
		}
	}

	pub fn set_focus(&mut self, focus: Vector2) -> LensResult<()> {
		match self {
			LensFilter::Cartesian(f) => f.set_focus(focus),
			LensFilter::Polar(f) => f.set_focus(focus),
		}
	}
}

impl From<CartesianFisheye> for LensFilter {
	fn from(f: CartesianFisheye) -> Self {
		LensFilter::Cartesian(f)
	}
}

impl From<PolarFisheye> for LensFilter {
	fn from(f: PolarFisheye) -> Self {
		LensFilter::Polar(f)
	}
}
