//! Renderer-agnostic lens core: distortion curves, fisheye filters, proximity
//! scaling and pan/zoom.
//!
//! Nothing here touches the DOM. The browser component implements [`Scene`]
//! and drives [`LensView::tick`] once per animation frame.

pub mod config;
pub mod curve;
pub mod error;
pub mod filter;
pub mod frame;
pub mod proximity;
pub mod scene;
pub mod vector;
pub mod viewport;

pub use config::{LensConfig, LensSettings};
pub use curve::{FisheyeCurve, LogisticFalloff, distort_distance};
pub use error::{LensError, LensResult};
pub use filter::{CartesianFisheye, LensFilter, PolarFisheye};
pub use frame::{FrameSample, FrameScheduler, LensView};
pub use proximity::{ProximityScaler, TrackedEdge, TrackedObject, TrackedScene};
pub use scene::{Scene, Size};
pub use vector::Vector2;
pub use viewport::{ViewportController, ViewportState, ZoomBounds, ZoomDirection};
