//! Pan and zoom state of the canvas, with cursor-anchored zoom.
//!
//! Screen space is canvas pixels. Local space is the zoomed container the
//! scene lives in: `screen = local * zoom + pan`.

use log::debug;

use super::error::{LensError, LensResult, ensure_finite};
use super::vector::Vector2;

/// Relative slack on each bound before a zoom step is rejected.
const BOUND_TOLERANCE: f64 = 0.01;

/// Wheel/zoom direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
	In,
	Out,
}

impl ZoomDirection {
	/// Positive wheel delta (scrolling down) zooms out.
	pub fn from_wheel_delta(delta_y: f64) -> Self {
		if delta_y > 0.0 {
			ZoomDirection::Out
		} else {
			ZoomDirection::In
		}
	}

	fn exponent(self) -> f64 {
		match self {
			ZoomDirection::In => 1.0,
			ZoomDirection::Out => -1.0,
		}
	}
}

/// Per-axis zoom limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
	pub min: Vector2,
	pub max: Vector2,
}

impl ZoomBounds {
	pub fn new(min: Vector2, max: Vector2) -> LensResult<Self> {
		for (name, v) in [
			("minScaleX", min.x),
			("minScaleY", min.y),
			("maxScaleX", max.x),
			("maxScaleY", max.y),
		] {
			if ensure_finite(name, v)? <= 0.0 {
				return Err(LensError::invalid(name, v, "must be > 0"));
			}
		}
		if min.x > max.x {
			return Err(LensError::invalid("minScaleX", min.x, "must not exceed maxScaleX"));
		}
		if min.y > max.y {
			return Err(LensError::invalid("minScaleY", min.y, "must not exceed maxScaleY"));
		}
		Ok(Self { min, max })
	}

	/// Same limits on both axes.
	pub fn uniform(min: f64, max: f64) -> LensResult<Self> {
		Self::new(Vector2::splat(min), Vector2::splat(max))
	}

	/// Whether `scale` lies within the bounds widened by the tolerance.
	pub fn admits(&self, scale: Vector2) -> bool {
		let lo = self.min * (1.0 - BOUND_TOLERANCE);
		let hi = self.max * (1.0 + BOUND_TOLERANCE);
		(lo.x..=hi.x).contains(&scale.x) && (lo.y..=hi.y).contains(&scale.y)
	}

	/// Whether `scale` lies within the exact bounds.
	pub fn contains(&self, scale: Vector2) -> bool {
		(self.min.x..=self.max.x).contains(&scale.x) && (self.min.y..=self.max.y).contains(&scale.y)
	}
}

impl Default for ZoomBounds {
	fn default() -> Self {
		Self {
			min: Vector2::splat(0.1),
			max: Vector2::splat(10.0),
		}
	}
}

/// Pointer-drag state of the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PanState {
	#[default]
	Idle,
	/// A button is held over the canvas; `last` is the previous pointer sample.
	Panning { last: Vector2 },
}

/// Snapshot of the pan/zoom transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
	pub pan_offset: Vector2,
	pub zoom_scale: Vector2,
}

impl Default for ViewportState {
	fn default() -> Self {
		Self {
			pan_offset: Vector2::ZERO,
			zoom_scale: Vector2::splat(1.0),
		}
	}
}

/// Owns pan offset and zoom scale. `bounds.min <= zoom_scale <= bounds.max`
/// holds after every mutation.
#[derive(Clone, Debug, Default)]
pub struct ViewportController {
	state: ViewportState,
	bounds: ZoomBounds,
	pan: PanState,
}

impl ViewportController {
	pub fn new(bounds: ZoomBounds, initial_scale: Vector2) -> LensResult<Self> {
		ensure_finite("initialScale", initial_scale.x)?;
		ensure_finite("initialScale", initial_scale.y)?;
		if !bounds.contains(initial_scale) {
			return Err(LensError::invalid(
				"initialScale",
				initial_scale.x,
				"must lie within the zoom bounds",
			));
		}
		Ok(Self {
			state: ViewportState {
				pan_offset: Vector2::ZERO,
				zoom_scale: initial_scale,
			},
			bounds,
			pan: PanState::Idle,
		})
	}

	pub fn state(&self) -> ViewportState {
		self.state
	}

	pub fn pan_offset(&self) -> Vector2 {
		self.state.pan_offset
	}

	pub fn zoom_scale(&self) -> Vector2 {
		self.state.zoom_scale
	}

	pub fn bounds(&self) -> ZoomBounds {
		self.bounds
	}

	pub fn pan_state(&self) -> PanState {
		self.pan
	}

	pub fn is_panning(&self) -> bool {
		matches!(self.pan, PanState::Panning { .. })
	}

	pub fn set_pan_offset(&mut self, offset: Vector2) -> LensResult<()> {
		ensure_finite("panOffset.x", offset.x)?;
		ensure_finite("panOffset.y", offset.y)?;
		self.state.pan_offset = offset;
		Ok(())
	}

	/// Shift the stage by a screen-space delta, 1:1 regardless of zoom.
	pub fn pan(&mut self, delta: Vector2) -> LensResult<()> {
		ensure_finite("pan.x", delta.x)?;
		ensure_finite("pan.y", delta.y)?;
		self.state.pan_offset = self.state.pan_offset + delta;
		Ok(())
	}

	/// Button pressed over the canvas: Idle -> Panning.
	pub fn pointer_down(&mut self, pos: Vector2) {
		if pos.is_finite() {
			self.pan = PanState::Panning { last: pos };
		}
	}

	/// Pans by the pointer delta while a button is held. Returns whether the
	/// stage moved.
	pub fn pointer_move(&mut self, pos: Vector2) -> bool {
		let PanState::Panning { last } = self.pan else {
			return false;
		};
		if !pos.is_finite() {
			return false;
		}
		self.state.pan_offset = self.state.pan_offset + (pos - last);
		self.pan = PanState::Panning { last: pos };
		true
	}

	/// Button released: Panning -> Idle.
	pub fn pointer_up(&mut self) {
		self.pan = PanState::Idle;
	}

	/// Pointer left the canvas: Panning -> Idle.
	pub fn pointer_leave(&mut self) {
		self.pan = PanState::Idle;
	}

	pub fn screen_to_local(&self, screen: Vector2) -> Vector2 {
		(screen - self.state.pan_offset).div_by(self.state.zoom_scale)
	}

	pub fn local_to_screen(&self, local: Vector2) -> Vector2 {
		local.scale_by(self.state.zoom_scale) + self.state.pan_offset
	}

	/// Zoom by `factor` in `direction`, keeping the local point under `anchor`
	/// fixed on screen.
	///
	/// Returns `Ok(false)` and leaves the state untouched when the new scale
	/// falls outside the tolerated bounds. An admitted step is applied as
	/// computed, never clamped.
	pub fn zoom(&mut self, direction: ZoomDirection, factor: f64, anchor: Vector2) -> LensResult<bool> {
		let factor = ensure_finite("zoomFactor", factor)?;
		if factor <= 0.0 {
			return Err(LensError::invalid("zoomFactor", factor, "must be > 0"));
		}
		ensure_finite("anchor.x", anchor.x)?;
		ensure_finite("anchor.y", anchor.y)?;

		let step = factor.powf(direction.exponent());
		let proposed = self.state.zoom_scale * step;
		if !self.bounds.admits(proposed) {
			debug!("viewport: zoom to {proposed:?} rejected by {:?}", self.bounds);
			return Ok(false);
		}

		let anchor_local = self.screen_to_local(anchor);
		self.state.zoom_scale = proposed;
		self.state.pan_offset = anchor - anchor_local.scale_by(proposed);
		Ok(true)
	}
}
