//! Scene graph bookkeeping for the canvas renderer.
//!
//! Every drawable part (node glyph, edge line, arrow, decal) is a [`Glyph`]
//! addressed by [`GlyphId`]. The lens core writes scale and opacity through the
//! [`Scene`] impl; the renderer reads them back when drawing.

use std::collections::HashMap;

use log::{debug, warn};

use super::theme::Theme;
use super::types::GraphData;
use crate::lens::{
	LensFilter, LensResult, Scene, Size, TrackedEdge, TrackedObject, TrackedScene, Vector2,
};

/// Index of a glyph in its [`GraphScene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphId(usize);

/// A positioned, scalable primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
	/// Local position. Fixed after build.
	pub position: Vector2,
	pub scale: Vector2,
	pub opacity: f64,
}

/// Per-node display data.
#[derive(Clone, Debug)]
pub struct NodeVisual {
	pub glyph: GlyphId,
	pub label: Option<String>,
	pub color: String,
	/// Size multiplier (1.0 = normal, >1.0 = larger/more important)
	pub size: f64,
}

/// Per-edge display data. `source`/`target` index into [`GraphScene::nodes`].
#[derive(Clone, Debug)]
pub struct EdgeVisual {
	pub source: usize,
	pub target: usize,
	pub line: GlyphId,
	pub arrow: Option<GlyphId>,
	pub decal: Option<(GlyphId, String)>,
	pub directed: bool,
}

/// All drawable state plus the pointer sample and queued lens passes.
#[derive(Clone, Debug, Default)]
pub struct GraphScene {
	glyphs: Vec<Glyph>,
	nodes: Vec<NodeVisual>,
	edges: Vec<EdgeVisual>,
	pointer: Vector2,
	size: Size,
	passes: Vec<LensFilter>,
}

/// Size from label and degree, as in the default importance heuristic.
fn importance(has_label: bool, degree: usize, max_degree: usize) -> f64 {
	let edge_factor = (degree as f64 / max_degree as f64).sqrt();
	if has_label {
		1.4 + 0.6 * edge_factor
	} else {
		0.7 + 0.5 * edge_factor
	}
}

impl GraphScene {
	/// Build glyphs for `data` at `positions` (one per node, input order) and
	/// the tracked set the proximity scaler drives.
	pub fn build(
		data: &GraphData,
		positions: &[Vector2],
		theme: &Theme,
		size: Size,
	) -> LensResult<(Self, TrackedScene<GlyphId>)> {
		let mut scene = Self {
			size,
			pointer: Vector2::new(size.width / 2.0, size.height / 2.0),
			..Self::default()
		};
		let mut tracked = TrackedScene::default();

		let mut degree: HashMap<&str, usize> = HashMap::new();
		for link in &data.links {
			*degree.entry(link.source.as_str()).or_insert(0) += 1;
			*degree.entry(link.target.as_str()).or_insert(0) += 1;
		}
		let max_degree = degree.values().copied().max().unwrap_or(1).max(1);

		let mut id_to_idx = HashMap::new();
		for (i, node) in data.nodes.iter().enumerate() {
			let position = positions.get(i).copied().unwrap_or_default();
			let node_size = node
				.size
				.filter(|s| s.is_finite() && *s > 0.0)
				.unwrap_or_else(|| {
					let d = degree.get(node.id.as_str()).copied().unwrap_or(0);
					importance(node.label.is_some(), d, max_degree)
				});
			let color = node
				.color
				.clone()
				.unwrap_or_else(|| theme.palette.get(i).to_css());
			let original = Vector2::splat(node_size);
			let glyph = scene.push_glyph(position, original);
			tracked.nodes.push(TrackedObject::new(glyph, original)?);
			scene.nodes.push(NodeVisual {
				glyph,
				label: node.label.clone(),
				color,
				size: node_size,
			});
			id_to_idx.insert(node.id.as_str(), i);
		}

		for link in &data.links {
			let (Some(&source), Some(&target)) = (
				id_to_idx.get(link.source.as_str()),
				id_to_idx.get(link.target.as_str()),
			) else {
				warn!(
					"lens-graph: dropping link {} -> {}: unknown endpoint",
					link.source, link.target
				);
				continue;
			};
			let from = scene.glyph(scene.nodes[source].glyph).position;
			let to = scene.glyph(scene.nodes[target].glyph).position;
			let mid = (from + to) * 0.5;

			let line = scene.push_glyph(mid, Vector2::splat(1.0));

			let arrow = if link.directed {
				match (to - from).try_normalize() {
					Ok(dir) => {
						let inset = theme.node.radius * scene.nodes[target].size;
						let id = scene.push_glyph(to - dir * inset, Vector2::splat(1.0));
						Some(TrackedObject::new(id, Vector2::splat(1.0))?)
					}
					Err(e) => {
						debug!("lens-graph: no arrow for {} -> {}: {e}", link.source, link.target);
						None
					}
				}
			} else {
				None
			};

			let decal = match &link.label {
				Some(text) => {
					let id = scene.push_glyph(mid, Vector2::splat(1.0));
					Some((TrackedObject::new(id, Vector2::splat(1.0))?, text.clone()))
				}
				None => None,
			};

			tracked.edges.push(TrackedEdge {
				line,
				arrow,
				decal: decal.as_ref().map(|(obj, _)| *obj),
				source,
				target,
			});
			scene.edges.push(EdgeVisual {
				source,
				target,
				line,
				arrow: arrow.map(|a| a.handle),
				decal: decal.map(|(obj, text)| (obj.handle, text)),
				directed: link.directed,
			});
		}

		Ok((scene, tracked))
	}

	fn push_glyph(&mut self, position: Vector2, scale: Vector2) -> GlyphId {
		self.glyphs.push(Glyph {
			position,
			scale,
			opacity: 1.0,
		});
		GlyphId(self.glyphs.len() - 1)
	}

	pub fn glyph(&self, id: GlyphId) -> &Glyph {
		&self.glyphs[id.0]
	}

	pub fn nodes(&self) -> &[NodeVisual] {
		&self.nodes
	}

	pub fn edges(&self) -> &[EdgeVisual] {
		&self.edges
	}

	pub fn size(&self) -> Size {
		self.size
	}

	/// Record a pointer sample, clamped to the canvas.
	pub fn set_pointer(&mut self, pos: Vector2) {
		if !pos.is_finite() {
			return;
		}
		self.pointer = pos.clamp(Vector2::ZERO, self.size.as_vector());
	}

	pub fn resize(&mut self, size: Size) {
		self.size = size;
		self.set_pointer(self.pointer);
	}

	/// Lens passes queued during the last tick, emptying the queue.
	pub fn take_passes(&mut self) -> Vec<LensFilter> {
		std::mem::take(&mut self.passes)
	}
}

impl Scene for GraphScene {
	type Handle = GlyphId;

	fn object_position(&self, obj: GlyphId) -> Vector2 {
		self.glyphs[obj.0].position
	}

	fn set_object_scale(&mut self, obj: GlyphId, x: f64, y: f64) {
		self.glyphs[obj.0].scale = Vector2::new(x, y);
	}

	fn set_object_opacity(&mut self, obj: GlyphId, alpha: f64) {
		self.glyphs[obj.0].opacity = alpha;
	}

	fn pointer_position(&self) -> Vector2 {
		self.pointer
	}

	fn viewport_size(&self) -> Size {
		self.size
	}

	fn apply_post_process_pass(&mut self, filter: &LensFilter) {
		self.passes.push(*filter);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::lens_graph::types::{GraphLink, GraphNode};

	fn sample() -> GraphData {
		let node = |id: &str, label: Option<&str>| GraphNode {
			id: id.into(),
			label: label.map(Into::into),
			color: None,
			x: None,
			y: None,
			size: None,
		};
		let link = |s: &str, t: &str, label: Option<&str>, directed: bool| GraphLink {
			source: s.into(),
			target: t.into(),
			label: label.map(Into::into),
			directed,
		};
		GraphData {
			nodes: vec![node("a", Some("A")), node("b", None), node("c", None)],
			links: vec![
				link("a", "b", Some("calls"), true),
				link("b", "c", None, false),
				link("a", "missing", None, true),
				link("c", "c", None, true),
			],
		}
	}

	fn positions() -> Vec<Vector2> {
		vec![
			Vector2::new(0.0, 0.0),
			Vector2::new(100.0, 0.0),
			Vector2::new(100.0, 100.0),
		]
	}

	#[test]
	fn builds_glyphs_and_tracking() {
		let theme = Theme::default();
		let (scene, tracked) =
			GraphScene::build(&sample(), &positions(), &theme, Size::new(400.0, 300.0)).unwrap();

		assert_eq!(scene.nodes().len(), 3);
		// Unknown endpoint dropped, self-loop kept without an arrow.
		assert_eq!(scene.edges().len(), 3);
		assert_eq!(tracked.nodes.len(), 3);
		assert_eq!(tracked.edges.len(), 3);

		let first = &tracked.edges[0];
		assert!(first.arrow.is_some());
		assert!(first.decal.is_some());
		assert!(tracked.edges[1].arrow.is_none());
		assert!(tracked.edges[2].arrow.is_none());

		// Labeled node with the highest degree gets the largest glyph.
		assert!(scene.nodes()[0].size > scene.nodes()[1].size);
		assert_eq!(
			tracked.nodes[0].original_scale,
			Vector2::splat(scene.nodes()[0].size)
		);
	}

	#[test]
	fn arrow_sits_at_target_rim() {
		let theme = Theme::default();
		let (scene, tracked) =
			GraphScene::build(&sample(), &positions(), &theme, Size::new(400.0, 300.0)).unwrap();
		let arrow = tracked.edges[0].arrow.unwrap().handle;
		let inset = theme.node.radius * scene.nodes()[1].size;
		let pos = scene.object_position(arrow);
		assert!((pos.x - (100.0 - inset)).abs() < 1e-9);
		assert_eq!(pos.y, 0.0);
	}

	#[test]
	fn pointer_is_clamped_and_passes_drain() {
		let (mut scene, _) = GraphScene::build(
			&GraphData::default(),
			&[],
			&Theme::default(),
			Size::new(200.0, 100.0),
		)
		.unwrap();
		scene.set_pointer(Vector2::new(-10.0, 500.0));
		assert_eq!(scene.pointer_position(), Vector2::new(0.0, 100.0));
		scene.resize(Size::new(50.0, 50.0));
		assert_eq!(scene.pointer_position(), Vector2::new(0.0, 50.0));

		let filter = LensFilter::from(crate::lens::PolarFisheye::new(0.7, 0.2).unwrap());
		scene.apply_post_process_pass(&filter);
		assert_eq!(scene.take_passes(), vec![filter]);
		assert!(scene.take_passes().is_empty());
	}
}
