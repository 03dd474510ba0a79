//! Node placement.
//!
//! Positions normally come with the graph data. Nodes without one are placed
//! by settling the `force_graph` simulation for a fixed number of steps, with
//! the positioned nodes pinned as anchors. The result is frozen: nothing moves
//! nodes after load.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::info;

use super::types::GraphData;
use crate::lens::Vector2;

/// Simulation steps run when some nodes lack coordinates.
const SETTLE_STEPS: usize = 400;
const SETTLE_DT: f32 = 0.016;
/// Radius of the seed circle unpositioned nodes start on.
const SEED_RADIUS: f64 = 100.0;

/// Resolve a position for every node, in input order.
pub fn resolve_positions(data: &GraphData, width: f64, height: f64) -> Vec<Vector2> {
	let given: Vec<Option<Vector2>> = data
		.nodes
		.iter()
		.map(|n| n.position().map(Vector2::from))
		.collect();
	if given.iter().all(Option::is_some) {
		return given.into_iter().flatten().collect();
	}

	let missing = given.iter().filter(|p| p.is_none()).count();
	info!(
		"lens-graph: settling layout for {missing} of {} nodes",
		data.nodes.len()
	);

	let mut graph: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});
	let center = Vector2::new(width / 2.0, height / 2.0);
	let mut id_to_idx = HashMap::new();

	for (i, (node, pos)) in data.nodes.iter().zip(&given).enumerate() {
		let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
		let seed = center + Vector2::new(SEED_RADIUS, 0.0).rotate(angle);
		let p = pos.unwrap_or(seed);
		let idx = graph.add_node(NodeData {
			x: p.x as f32,
			y: p.y as f32,
			mass: 10.0,
			is_anchor: pos.is_some(),
			user_data: i,
		});
		id_to_idx.insert(node.id.as_str(), idx);
	}

	for link in &data.links {
		if let (Some(&src), Some(&tgt)) = (
			id_to_idx.get(link.source.as_str()),
			id_to_idx.get(link.target.as_str()),
		) {
			graph.add_edge(src, tgt, EdgeData::default());
		}
	}

	for _ in 0..SETTLE_STEPS {
		graph.update(SETTLE_DT);
	}

	let mut positions = vec![Vector2::ZERO; data.nodes.len()];
	graph.visit_nodes(|node| {
		let i = node.data.user_data;
		positions[i] = given[i].unwrap_or(Vector2::new(node.x() as f64, node.y() as f64));
	});
	positions
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::lens_graph::types::{GraphLink, GraphNode};

	fn node(id: &str, pos: Option<(f64, f64)>) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: None,
			color: None,
			x: pos.map(|p| p.0),
			y: pos.map(|p| p.1),
			size: None,
		}
	}

	#[test]
	fn supplied_layout_is_used_verbatim() {
		let data = GraphData {
			nodes: vec![node("a", Some((1.0, 2.0))), node("b", Some((-3.0, 4.0)))],
			links: vec![],
		};
		assert_eq!(
			resolve_positions(&data, 800.0, 600.0),
			vec![Vector2::new(1.0, 2.0), Vector2::new(-3.0, 4.0)]
		);
	}

	#[test]
	fn missing_positions_are_settled_and_anchors_kept() {
		let data = GraphData {
			nodes: vec![node("a", Some((10.0, 20.0))), node("b", None), node("c", None)],
			links: vec![
				GraphLink {
					source: "a".into(),
					target: "b".into(),
					label: None,
					directed: true,
				},
				GraphLink {
					source: "b".into(),
					target: "c".into(),
					label: None,
					directed: true,
				},
			],
		};
		let positions = resolve_positions(&data, 800.0, 600.0);
		assert_eq!(positions.len(), 3);
		assert_eq!(positions[0], Vector2::new(10.0, 20.0));
		assert!(positions.iter().all(|p| p.is_finite()));
		assert_ne!(positions[1], positions[2]);
	}
}
