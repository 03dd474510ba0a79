//! Contract between the lens core and whatever draws the scene.
//!
//! The core never draws. It reads positions and the pointer, writes scale and
//! opacity, and asks for post-process passes through this trait.

use super::filter::LensFilter;
use super::vector::Vector2;

/// Viewport extent in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn diagonal(&self) -> f64 {
		self.width.hypot(self.height)
	}

	pub fn is_empty(&self) -> bool {
		!(self.width > 0.0 && self.height > 0.0)
	}

	pub fn as_vector(&self) -> Vector2 {
		Vector2::new(self.width, self.height)
	}
}

/// Operations the lens core needs from the rendering layer.
pub trait Scene {
	/// Opaque reference to a positioned, scalable primitive.
	type Handle: Copy;

	/// Position of the object in the zoomed container's local space.
	fn object_position(&self, obj: Self::Handle) -> Vector2;

	fn set_object_scale(&mut self, obj: Self::Handle, x: f64, y: f64);

	fn set_object_opacity(&mut self, obj: Self::Handle, alpha: f64);

	/// Pointer in screen pixels, already clamped to the visible viewport.
	fn pointer_position(&self) -> Vector2;

	fn viewport_size(&self) -> Size;

	/// Queue a full-layer distortion pass for the frame being built.
	fn apply_post_process_pass(&mut self, filter: &LensFilter);
}
