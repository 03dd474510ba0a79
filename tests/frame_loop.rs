//! Drives `LensView::tick` against in-memory scenes.

#![allow(unused_crate_dependencies)]

use graph_lens::components::lens_graph::{GraphData, GraphScene, Theme};
use graph_lens::lens::{
	CartesianFisheye, LensFilter, LensSettings, LensView, LogisticFalloff, PolarFisheye, Scene,
	Size, TrackedEdge, TrackedObject, TrackedScene, Vector2,
};

const EPS: f64 = 1e-9;

/// Flat scene: handles index straight into the vectors.
struct Board {
	positions: Vec<Vector2>,
	scales: Vec<Vector2>,
	opacity: Vec<f64>,
	pointer: Vector2,
	size: Size,
	passes: Vec<LensFilter>,
}

impl Board {
	fn new(positions: Vec<Vector2>, size: Size) -> Self {
		let n = positions.len();
		Self {
			positions,
			scales: vec![Vector2::splat(-1.0); n],
			opacity: vec![-1.0; n],
			pointer: Vector2::ZERO,
			size,
			passes: Vec::new(),
		}
	}
}

impl Scene for Board {
	type Handle = usize;

	fn object_position(&self, obj: usize) -> Vector2 {
		self.positions[obj]
	}

	fn set_object_scale(&mut self, obj: usize, x: f64, y: f64) {
		self.scales[obj] = Vector2::new(x, y);
	}

	fn set_object_opacity(&mut self, obj: usize, alpha: f64) {
		self.opacity[obj] = alpha;
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

fn unit(handle: usize) -> TrackedObject<usize> {
	TrackedObject::new(handle, Vector2::splat(1.0)).unwrap()
}

/// Nodes 0 (top-left) and 1 (bottom-right), edge line 2, arrow 3 beside node 0.
fn corner_graph() -> (Board, TrackedScene<usize>) {
	let board = Board::new(
		vec![
			Vector2::new(0.0, 0.0),
			Vector2::new(300.0, 400.0),
			Vector2::new(150.0, 200.0),
			Vector2::new(0.0, 0.0),
		],
		Size::new(300.0, 400.0),
	);
	let tracked = TrackedScene {
		nodes: vec![unit(0), unit(1)],
		edges: vec![TrackedEdge {
			line: 2,
			arrow: Some(unit(3)),
			decal: None,
			source: 1,
			target: 1,
		}],
	};
	(board, tracked)
}

fn scaling_settings() -> LensSettings {
	LensSettings {
		falloff: LogisticFalloff::new(0.35, 12.0).unwrap(),
		..LensSettings::default()
	}
}

#[test]
fn near_objects_keep_their_size_and_far_ones_vanish() {
	let (mut board, tracked) = corner_graph();
	let mut lens = LensView::new(&scaling_settings(), tracked).unwrap();

	let sample = lens.tick(&mut board);

	assert_eq!(sample.local_pointer, Vector2::ZERO);
	assert!((board.scales[0].x - 1.0).abs() < EPS);
	// The far corner sits a full viewport diagonal away.
	assert!(board.scales[1].x.abs() < EPS);
	// Positions are never touched.
	assert_eq!(board.positions[1], Vector2::new(300.0, 400.0));
}

#[test]
fn edge_is_as_visible_as_its_nearest_part() {
	let (mut board, tracked) = corner_graph();
	let mut lens = LensView::new(&scaling_settings(), tracked).unwrap();

	lens.tick(&mut board);

	// Both endpoints are the far node; only the arrow is under the pointer.
	assert!((board.opacity[2] - board.scales[3].x).abs() < EPS);
	assert!((board.opacity[2] - 1.0).abs() < EPS);

	board.pointer = Vector2::new(150.0, 200.0);
	lens.tick(&mut board);
	let expected = board.scales[1].x.max(board.scales[3].x);
	assert!((board.opacity[2] - expected).abs() < EPS);
	assert!(board.opacity[2] < 1.0);
}

#[test]
fn zoom_is_compensated_and_pointer_mapped_to_local_space() {
	let (mut board, tracked) = corner_graph();
	let settings = LensSettings {
		initial_scale: Vector2::splat(2.0),
		..scaling_settings()
	};
	let mut lens = LensView::new(&settings, tracked).unwrap();
	lens.viewport_mut().set_pan_offset(Vector2::new(10.0, 20.0)).unwrap();
	board.pointer = Vector2::new(10.0, 20.0);

	let sample = lens.tick(&mut board);

	assert_eq!(sample.local_pointer, Vector2::ZERO);
	// Full distortion at the pointer, halved to cancel the 2x container zoom.
	assert!((board.scales[0].x - 0.5).abs() < EPS);
	assert!((board.scales[0].y - 0.5).abs() < EPS);
}

#[test]
fn zero_steepness_restores_originals() {
	let (mut board, mut tracked) = corner_graph();
	tracked.nodes[1].original_scale = Vector2::new(1.5, 2.5);
	let mut lens = LensView::new(&scaling_settings(), tracked).unwrap();
	lens.tick(&mut board);
	assert!(board.scales[1].x < 1.5);

	lens.set_falloff(LogisticFalloff::new(0.35, 0.0).unwrap());
	board.pointer = Vector2::new(150.0, 200.0);
	lens.tick(&mut board);

	assert_eq!(board.scales[1], Vector2::new(1.5, 2.5));
	assert_eq!(board.scales[3], Vector2::splat(1.0));
	assert_eq!(board.opacity[2], 1.0);
}

#[test]
fn identity_filters_request_no_pass() {
	let (mut board, tracked) = corner_graph();
	let settings = LensSettings {
		cartesian: Some(CartesianFisheye::new(0.5).unwrap()),
		polar: Some(PolarFisheye::new(0.75, 0.2).unwrap()),
		..LensSettings::default()
	};
	let mut lens = LensView::new(&settings, tracked).unwrap();
	board.pointer = Vector2::new(75.0, 100.0);

	let sample = lens.tick(&mut board);

	assert_eq!(sample.passes, 1);
	assert_eq!(board.passes.len(), 1);
	assert!(matches!(board.passes[0], LensFilter::Polar(_)));
	assert_eq!(board.passes[0].focus(), Vector2::new(0.25, 0.25));
	// The identity filter still tracks the pointer.
	assert_eq!(
		lens.cartesian().map(|c| c.focus()),
		Some(Vector2::new(0.25, 0.25))
	);
}

#[test]
fn empty_viewport_keeps_previous_focus() {
	let (mut board, tracked) = corner_graph();
	let settings = LensSettings {
		polar: Some(PolarFisheye::new(0.75, 0.2).unwrap()),
		..scaling_settings()
	};
	let mut lens = LensView::new(&settings, tracked).unwrap();
	board.pointer = Vector2::new(150.0, 100.0);
	let first = lens.tick(&mut board);
	assert_eq!(first.focus, Some(Vector2::new(0.5, 0.25)));

	board.size = Size::new(0.0, 0.0);
	board.pointer = Vector2::new(30.0, 30.0);
	let second = lens.tick(&mut board);

	assert_eq!(second.focus, None);
	assert_eq!(
		lens.polar().map(|p| p.focus()),
		Some(Vector2::new(0.5, 0.25))
	);
	// Scaling still ran, treating everything as near.
	assert!((board.scales[1].x - 1.0).abs() < EPS);
}

#[test]
fn graph_scene_round_trip_through_the_lens() {
	let data: GraphData = serde_json::from_str(
		r#"{
			"nodes": [
				{ "id": "a", "label": "Alpha", "x": 100.0, "y": 100.0 },
				{ "id": "b", "x": 700.0, "y": 500.0 }
			],
			"links": [
				{ "source": "a", "target": "b", "label": "knows" }
			]
		}"#,
	)
	.unwrap();
	let size = Size::new(800.0, 600.0);
	let positions: Vec<Vector2> = data
		.nodes
		.iter()
		.map(|n| Vector2::new(n.x.unwrap(), n.y.unwrap()))
		.collect();
	let (mut scene, tracked) =
		GraphScene::build(&data, &positions, &Theme::default(), size).unwrap();
	let settings = LensSettings {
		polar: Some(PolarFisheye::new(0.75, 0.2).unwrap()),
		..scaling_settings()
	};
	let mut lens = LensView::new(&settings, tracked).unwrap();
	scene.set_pointer(Vector2::new(100.0, 100.0));

	let sample = lens.tick(&mut scene);

	assert_eq!(sample.passes, 1);
	assert_eq!(scene.take_passes().len(), 1);
	assert!(scene.take_passes().is_empty());

	let near = scene.glyph(scene.nodes()[0].glyph).scale;
	let far = scene.glyph(scene.nodes()[1].glyph).scale;
	assert!(near.x > far.x);
	let line = scene.glyph(scene.edges()[0].line).opacity;
	assert!(line > 0.0 && line <= 1.0);
}
