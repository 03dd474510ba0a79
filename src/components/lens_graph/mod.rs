//! Lens graph visualization component.
//!
//! Renders an interactive node-edge graph on an HTML canvas with:
//! - Externally supplied layout, with a force-settled fallback for
//!   unpositioned nodes
//! - Pan and cursor-anchored zoom
//! - Proximity scaling: glyphs shrink and edges fade away from the pointer
//! - Cartesian and polar fisheye lenses as canvas post-process passes
//!
//! # Example
//!
//! ```ignore
//! use graph_lens::{GraphData, LensConfig, LensGraphCanvas};
//!
//! let settings = LensConfig::default().validate()?;
//! view! { <LensGraphCanvas data=data.into() settings=settings fullscreen=true /> }
//! ```

mod component;
mod layout;
mod render;
pub mod scene;
pub mod theme;
mod types;

pub use component::LensGraphCanvas;
pub use scene::{GlyphId, GraphScene};
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode};
