//! Graph data structures for input to the lens graph component.

use serde::Deserialize;

/// A node in the graph.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Optional display label drawn beside the glyph.
	pub label: Option<String>,
	/// Optional CSS color override (e.g., "#ff0000" or "rgb(255, 0, 0)").
	/// If not set, color is taken from the theme palette.
	pub color: Option<String>,
	/// Layout position. Nodes missing either coordinate get a computed one.
	pub x: Option<f64>,
	pub y: Option<f64>,
	/// Glyph size multiplier. Derived from label and degree when absent.
	pub size: Option<f64>,
}

impl GraphNode {
	pub fn position(&self) -> Option<(f64, f64)> {
		Some((self.x?, self.y?)).filter(|(x, y)| x.is_finite() && y.is_finite())
	}
}

/// An edge between two nodes.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Optional decal text drawn at the middle of the edge.
	pub label: Option<String>,
	/// Directed edges carry an arrow; undirected ones are drawn dashed.
	#[serde(default = "directed_default")]
	pub directed: bool,
}

fn directed_default() -> bool {
	true
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_minimal_and_full_links() {
		let data: GraphData = serde_json::from_str(
			r#"{
				"nodes": [{ "id": "a", "x": 1.0, "y": 2.0 }, { "id": "b", "label": "B" }],
				"links": [
					{ "source": "a", "target": "b" },
					{ "source": "b", "target": "a", "label": "uses", "directed": false }
				]
			}"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0].position(), Some((1.0, 2.0)));
		assert_eq!(data.nodes[1].position(), None);
		assert!(data.links[0].directed);
		assert!(!data.links[1].directed);
		assert_eq!(data.links[1].label.as_deref(), Some("uses"));
	}
}
