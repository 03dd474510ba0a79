//! Proximity scaling: shrink and fade objects by their distance to the pointer.
//!
//! Every frame recomputes scale from each object's stored original scale, so
//! distortion never compounds across frames. Edges take the brightest of their
//! salient parts as line opacity.

use log::debug;

use super::curve::LogisticFalloff;
use super::error::{LensError, LensResult, ensure_finite};
use super::scene::{Scene, Size};
use super::vector::Vector2;

/// An object whose scale is driven by proximity, with its undistorted baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedObject<H> {
	pub handle: H,
	/// Captured once at creation; the baseline for every frame.
	pub original_scale: Vector2,
}

impl<H> TrackedObject<H> {
	/// Rejects a baseline scale that is non-finite or negative on either axis.
	pub fn new(handle: H, original_scale: Vector2) -> LensResult<Self> {
		for (name, v) in [
			("originalScale.x", original_scale.x),
			("originalScale.y", original_scale.y),
		] {
			if ensure_finite(name, v)? < 0.0 {
				return Err(LensError::invalid(name, v, "must be >= 0"));
			}
		}
		Ok(Self {
			handle,
			original_scale,
		})
	}
}

/// An edge and its scalable parts. `source`/`target` index into
/// [`TrackedScene::nodes`].
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedEdge<H> {
	/// The line whose opacity follows the edge's nearest part.
	pub line: H,
	pub arrow: Option<TrackedObject<H>>,
	pub decal: Option<TrackedObject<H>>,
	pub source: usize,
	pub target: usize,
}

/// Everything the scaler touches each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedScene<H> {
	pub nodes: Vec<TrackedObject<H>>,
	pub edges: Vec<TrackedEdge<H>>,
}

impl<H> Default for TrackedScene<H> {
	fn default() -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
		}
	}
}

/// Scalar zoom used for distances: geometric mean of the two axes.
pub fn uniform_zoom(zoom: Vector2) -> f64 {
	(zoom.x * zoom.y).sqrt()
}

/// Viewport diagonal expressed in local (zoomed container) units.
pub fn maximum_distance(viewport: Size, zoom: f64) -> f64 {
	viewport.diagonal() / zoom
}

/// Scale to apply this frame, compensating for the container zoom.
pub fn applied_scale(original: Vector2, distortion: f64, zoom: Vector2) -> Vector2 {
	Vector2::new(
		original.x * distortion / zoom.x,
		original.y * distortion / zoom.y,
	)
}

/// An edge is as visible as its most visible part.
pub fn edge_opacity(arrow: Option<f64>, decal: Option<f64>, source: f64, target: f64) -> f64 {
	[arrow, decal]
		.into_iter()
		.flatten()
		.fold(source.max(target), f64::max)
}

/// Per-frame proximity scaler.
#[derive(Clone, Debug, Default)]
pub struct ProximityScaler {
	falloff: LogisticFalloff,
	node_distortion: Vec<f64>,
}

impl ProximityScaler {
	pub fn new(midpoint: f64, steepness: f64) -> LensResult<Self> {
		Ok(Self::from_falloff(LogisticFalloff::new(midpoint, steepness)?))
	}

	pub fn from_falloff(falloff: LogisticFalloff) -> Self {
		Self {
			falloff,
			node_distortion: Vec::new(),
		}
	}

	pub fn falloff(&self) -> LogisticFalloff {
		self.falloff
	}

	pub fn set_falloff(&mut self, falloff: LogisticFalloff) {
		self.falloff = falloff;
	}

	pub fn is_disabled(&self) -> bool {
		self.falloff.is_disabled()
	}

	/// Distortion for an object at `position` given the pointer, both in
	/// local units. A non-positive `max_distance` counts every object as near.
	/// An object whose distance cannot be measured counts as farthest.
	pub fn object_distortion(&self, pointer: Vector2, position: Vector2, max_distance: f64) -> f64 {
		let distance = match measure(pointer, position, max_distance) {
			Ok(distance) => distance,
			Err(e) => {
				debug!("proximity: {e}, treating object as far");
				1.0
			}
		};
		self.falloff.distort(distance)
	}

	/// Rescale every tracked object and set every edge line's opacity.
	///
	/// `pointer` is in the same local space as [`Scene::object_position`].
	/// Positions are never written.
	pub fn apply<S: Scene>(
		&mut self,
		scene: &mut S,
		tracked: &TrackedScene<S::Handle>,
		pointer: Vector2,
		zoom: Vector2,
	) {
		if self.falloff.is_disabled() {
			restore(scene, tracked);
			return;
		}

		let viewport = scene.viewport_size();
		let mut max_distance = maximum_distance(viewport, uniform_zoom(zoom));
		if !(max_distance > 0.0 && max_distance.is_finite()) {
			debug!("proximity: degenerate viewport {viewport:?}, scaling as if near");
			max_distance = 0.0;
		}

		self.node_distortion.clear();
		for node in &tracked.nodes {
			let pos = scene.object_position(node.handle);
			let distortion = self.object_distortion(pointer, pos, max_distance);
			let s = applied_scale(node.original_scale, distortion, zoom);
			scene.set_object_scale(node.handle, s.x, s.y);
			self.node_distortion.push(distortion);
		}

		for edge in &tracked.edges {
			let arrow = edge
				.arrow
				.map(|part| self.scale_part(scene, part, pointer, max_distance, zoom));
			let decal = edge
				.decal
				.map(|part| self.scale_part(scene, part, pointer, max_distance, zoom));
			let source = self.node_distortion.get(edge.source).copied().unwrap_or(0.0);
			let target = self.node_distortion.get(edge.target).copied().unwrap_or(0.0);
			scene.set_object_opacity(edge.line, edge_opacity(arrow, decal, source, target));
		}
	}

	fn scale_part<S: Scene>(
		&self,
		scene: &mut S,
		part: TrackedObject<S::Handle>,
		pointer: Vector2,
		max_distance: f64,
		zoom: Vector2,
	) -> f64 {
		let pos = scene.object_position(part.handle);
		let distortion = self.object_distortion(pointer, pos, max_distance);
		let s = applied_scale(part.original_scale, distortion, zoom);
		scene.set_object_scale(part.handle, s.x, s.y);
		distortion
	}
}

/// Normalized pointer distance, or `DegenerateGeometry` when either point is
/// not finite.
fn measure(pointer: Vector2, position: Vector2, max_distance: f64) -> LensResult<f64> {
	if !pointer.is_finite() || !position.is_finite() {
		return Err(LensError::DegenerateGeometry("object or pointer position is not finite"));
	}
	if max_distance > 0.0 && max_distance.is_finite() {
		Ok(pointer.distance(position) / max_distance)
	} else {
		Ok(0.0)
	}
}

/// Disabled path: original scales and fully opaque lines.
fn restore<S: Scene>(scene: &mut S, tracked: &TrackedScene<S::Handle>) {
	for node in &tracked.nodes {
		scene.set_object_scale(node.handle, node.original_scale.x, node.original_scale.y);
	}
	for edge in &tracked.edges {
		for part in [edge.arrow, edge.decal].into_iter().flatten() {
			scene.set_object_scale(part.handle, part.original_scale.x, part.original_scale.y);
		}
		scene.set_object_opacity(edge.line, 1.0);
	}
}
