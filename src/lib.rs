//! graph-lens: interactive node-edge graph viewer with a fisheye lens.
//!
//! The [`lens`] module holds the renderer-agnostic core (distortion curves,
//! fisheye filters, proximity scaling, pan/zoom). [`components`] wraps it in a
//! WASM canvas component.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, error, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod lens;

pub use components::lens_graph::{GraphData, GraphLink, GraphNode, LensGraphCanvas};
pub use lens::{LensConfig, LensError, LensSettings};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-lens: logging initialized");
}

/// Text content of the `<script>` element with the given id.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let json_text = script_text("graph-data")?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"graph-lens: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("graph-lens: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Load and validate the lens configuration from id="lens-config".
/// A missing element means defaults; a present one must parse and validate.
fn load_lens_settings() -> Result<LensSettings, LensError> {
	let config = match script_text("lens-config") {
		Some(text) => LensConfig::from_json(&text)?,
		None => {
			info!("graph-lens: no lens-config element, using defaults");
			LensConfig::default()
		}
	};
	config.validate()
}

/// Main application component.
/// Loads graph data and lens configuration from the DOM and renders the view.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());

	let body = match load_lens_settings() {
		Ok(settings) => view! {
			<LensGraphCanvas data=graph_signal settings=settings fullscreen=true />
			<div class="graph-overlay">
				<h1>"Graph Lens"</h1>
				<p class="subtitle">"Move to focus the lens. Scroll to zoom. Drag to pan."</p>
			</div>
		}
		.into_any(),
		Err(e) => {
			error!("graph-lens: {e}");
			view! {
				<div class="graph-error">
					<h1>"Invalid lens configuration"</h1>
					<p>{e.to_string()}</p>
				</div>
			}
			.into_any()
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Graph Lens" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">{body}</div>
	}
}
