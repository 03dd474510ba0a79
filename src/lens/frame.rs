//! Per-frame lens update and the animation-loop bookkeeping around it.
//!
//! One pointer sample per frame feeds both the proximity scaler and the filter
//! foci, in that order. Geometric degeneracies inside a frame are logged and
//! absorbed here so the loop keeps running.

use log::{debug, warn};

use super::config::LensSettings;
use super::curve::LogisticFalloff;
use super::error::{LensError, LensResult};
use super::filter::{CartesianFisheye, LensFilter, PolarFisheye};
use super::proximity::{ProximityScaler, TrackedScene};
use super::scene::{Scene, Size};
use super::vector::Vector2;
use super::viewport::ViewportController;

/// Whether the animation loop wants frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
	#[default]
	Stopped,
	Running,
}

/// Tracks the loop state and whether a frame request is outstanding, so
/// restarting never queues a second callback chain.
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
	state: LoopState,
	pending: bool,
	frames: u64,
}

impl FrameScheduler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `true` when the caller must request the first frame.
	pub fn start(&mut self) -> bool {
		self.state = LoopState::Running;
		if self.pending {
			return false;
		}
		self.pending = true;
		true
	}

	/// No further frames are requested; an outstanding one still fires and
	/// sees the stopped state.
	pub fn stop(&mut self) {
		self.state = LoopState::Stopped;
	}

	pub fn state(&self) -> LoopState {
		self.state
	}

	pub fn is_running(&self) -> bool {
		self.state == LoopState::Running
	}

	/// Frames run since creation.
	pub fn frames(&self) -> u64 {
		self.frames
	}

	/// Call at the top of the frame callback. Returns whether to run the frame.
	pub fn begin_frame(&mut self) -> bool {
		self.pending = false;
		if self.is_running() {
			self.frames += 1;
			true
		} else {
			false
		}
	}

	/// Call at the end of the frame callback. Returns `true` when the caller
	/// must request the next frame.
	pub fn end_frame(&mut self) -> bool {
		if self.is_running() && !self.pending {
			self.pending = true;
			true
		} else {
			false
		}
	}
}

/// Pointer in screen pixels to the unit square.
pub fn normalize_pointer(pointer: Vector2, size: Size) -> LensResult<Vector2> {
	if size.is_empty() {
		return Err(LensError::DegenerateGeometry("viewport has no area"));
	}
	if !pointer.is_finite() {
		return Err(LensError::DegenerateGeometry("pointer is not finite"));
	}
	Ok(pointer
		.div_by(size.as_vector())
		.clamp(Vector2::ZERO, Vector2::splat(1.0)))
}

/// What a single tick observed and did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSample {
	/// Pointer in screen pixels.
	pub pointer: Vector2,
	/// Pointer in the zoomed container's local space.
	pub local_pointer: Vector2,
	/// New filter focus, `None` when the frame kept the previous one.
	pub focus: Option<Vector2>,
	/// Post-process passes requested.
	pub passes: usize,
}

/// Lens state owned by the frame loop.
#[derive(Clone, Debug)]
pub struct LensView<H> {
	viewport: ViewportController,
	cartesian: Option<CartesianFisheye>,
	polar: Option<PolarFisheye>,
	scaler: ProximityScaler,
	tracked: TrackedScene<H>,
	zoom_factor: f64,
}

impl<H: Copy> LensView<H> {
	pub fn new(settings: &LensSettings, tracked: TrackedScene<H>) -> LensResult<Self> {
		Ok(Self {
			viewport: ViewportController::new(settings.bounds, settings.initial_scale)?,
			cartesian: settings.cartesian,
			polar: settings.polar,
			scaler: ProximityScaler::from_falloff(settings.falloff),
			tracked,
			zoom_factor: settings.zoom_factor,
		})
	}

	pub fn viewport(&self) -> &ViewportController {
		&self.viewport
	}

	pub fn viewport_mut(&mut self) -> &mut ViewportController {
		&mut self.viewport
	}

	/// Wheel step configured for this view.
	pub fn zoom_factor(&self) -> f64 {
		self.zoom_factor
	}

	pub fn cartesian(&self) -> Option<&CartesianFisheye> {
		self.cartesian.as_ref()
	}

	pub fn set_cartesian(&mut self, filter: Option<CartesianFisheye>) {
		self.cartesian = filter;
	}

	pub fn polar(&self) -> Option<&PolarFisheye> {
		self.polar.as_ref()
	}

	pub fn set_polar(&mut self, filter: Option<PolarFisheye>) {
		self.polar = filter;
	}

	pub fn scaler(&self) -> &ProximityScaler {
		&self.scaler
	}

	pub fn set_falloff(&mut self, falloff: LogisticFalloff) {
		self.scaler.set_falloff(falloff);
	}

	pub fn tracked(&self) -> &TrackedScene<H> {
		&self.tracked
	}

	/// Replace the tracked objects, e.g. after the graph was rebuilt.
	pub fn set_tracked(&mut self, tracked: TrackedScene<H>) {
		self.tracked = tracked;
	}

	/// Configured filters that actually distort, cartesian first.
	pub fn active_filters(&self) -> impl Iterator<Item = LensFilter> + '_ {
		let cartesian = self.cartesian.map(LensFilter::Cartesian);
		let polar = self.polar.map(LensFilter::Polar);
		cartesian
			.into_iter()
			.chain(polar)
			.filter(|f| !f.is_identity())
	}

	/// Run one animation frame against `scene`.
	pub fn tick<S: Scene<Handle = H>>(&mut self, scene: &mut S) -> FrameSample {
		let pointer = scene.pointer_position();
		let local_pointer = self.viewport.screen_to_local(pointer);

		self.scaler.apply(
			scene,
			&self.tracked,
			local_pointer,
			self.viewport.zoom_scale(),
		);

		let focus = match normalize_pointer(pointer, scene.viewport_size()) {
			Ok(focus) => {
				self.update_focus(focus);
				Some(focus)
			}
			Err(e) => {
				debug!("lens: keeping previous focus: {e}");
				None
			}
		};

		let mut passes = 0;
		for filter in self.active_filters() {
			scene.apply_post_process_pass(&filter);
			passes += 1;
		}

		FrameSample {
			pointer,
			local_pointer,
			focus,
			passes,
		}
	}

	fn update_focus(&mut self, focus: Vector2) {
		if let Some(f) = self.cartesian.as_mut() {
			if let Err(e) = f.set_focus(focus) {
				warn!("lens: cartesian focus rejected: {e}");
			}
		}
		if let Some(f) = self.polar.as_mut() {
			if let Err(e) = f.set_focus(focus) {
				warn!("lens: polar focus rejected: {e}");
			}
		}
	}
}
