//! Lens configuration as read from the page, and its validated form.
//!
//! [`LensConfig`] is plain serde data (camelCase JSON). [`LensConfig::validate`]
//! turns it into [`LensSettings`], built from the checked constructors, so an
//! out-of-domain value fails setup instead of being clamped.

use serde::{Deserialize, Serialize};

use super::curve::LogisticFalloff;
use super::error::{LensError, LensResult, ensure_finite};
use super::filter::{CartesianFisheye, PolarFisheye};
use super::vector::Vector2;
use super::viewport::ZoomBounds;

/// Per-axis fisheye parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CartesianConfig {
	pub center_height_x: f64,
	pub center_height_y: f64,
}

impl Default for CartesianConfig {
	fn default() -> Self {
		Self {
			center_height_x: 0.5,
			center_height_y: 0.5,
		}
	}
}

/// Radial fisheye parameters. `radius` is in normalized viewport units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolarConfig {
	pub center_height: f64,
	pub radius: f64,
}

impl Default for PolarConfig {
	fn default() -> Self {
		Self {
			center_height: 0.75,
			radius: 0.2,
		}
	}
}

/// Proximity falloff. `steepness = 0` disables scaling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScalingConfig {
	pub midpoint: f64,
	pub steepness: f64,
}

impl Default for ScalingConfig {
	fn default() -> Self {
		Self {
			midpoint: 0.35,
			steepness: 12.0,
		}
	}
}

/// Zoom limits and wheel step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
	pub min_scale_x: f64,
	pub max_scale_x: f64,
	pub min_scale_y: f64,
	pub max_scale_y: f64,
	/// Multiplier applied per wheel notch.
	pub zoom_factor: f64,
	pub initial_scale: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			min_scale_x: 0.1,
			max_scale_x: 10.0,
			min_scale_y: 0.1,
			max_scale_y: 10.0,
			zoom_factor: 1.1,
			initial_scale: 1.0,
		}
	}
}

/// Complete lens configuration. A `null` filter disables that filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LensConfig {
	pub cartesian: Option<CartesianConfig>,
	pub polar: Option<PolarConfig>,
	pub scaling: ScalingConfig,
	pub viewport: ViewportConfig,
}

impl Default for LensConfig {
	fn default() -> Self {
		Self {
			cartesian: None,
			polar: Some(PolarConfig::default()),
			scaling: ScalingConfig::default(),
			viewport: ViewportConfig::default(),
		}
	}
}

/// Validated settings the frame loop is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct LensSettings {
	pub cartesian: Option<CartesianFisheye>,
	pub polar: Option<PolarFisheye>,
	pub falloff: LogisticFalloff,
	pub bounds: ZoomBounds,
	pub initial_scale: Vector2,
	pub zoom_factor: f64,
}

impl Default for LensSettings {
	fn default() -> Self {
		Self {
			cartesian: None,
			polar: None,
			falloff: LogisticFalloff::DISABLED,
			bounds: ZoomBounds::default(),
			initial_scale: Vector2::splat(1.0),
			zoom_factor: 1.1,
		}
	}
}

impl LensConfig {
	pub fn from_json(text: &str) -> LensResult<Self> {
		serde_json::from_str(text).map_err(|e| LensError::MalformedConfig(e.to_string()))
	}

	/// Check every field, returning the first out-of-domain value.
	pub fn validate(&self) -> LensResult<LensSettings> {
		let cartesian = self
			.cartesian
			.as_ref()
			.map(|c| CartesianFisheye::with_axes(c.center_height_x, c.center_height_y))
			.transpose()?;
		let polar = self
			.polar
			.as_ref()
			.map(|p| PolarFisheye::new(p.center_height, p.radius))
			.transpose()?;
		let falloff = LogisticFalloff::new(self.scaling.midpoint, self.scaling.steepness)?;

		let vp = &self.viewport;
		let bounds = ZoomBounds::new(
			Vector2::new(vp.min_scale_x, vp.min_scale_y),
			Vector2::new(vp.max_scale_x, vp.max_scale_y),
		)?;
		let initial = ensure_finite("initialScale", vp.initial_scale)?;
		let initial_scale = Vector2::splat(initial);
		if !bounds.contains(initial_scale) {
			return Err(LensError::invalid(
				"initialScale",
				initial,
				"must lie within the zoom bounds",
			));
		}
		if ensure_finite("zoomFactor", vp.zoom_factor)? <= 1.0 {
			return Err(LensError::invalid("zoomFactor", vp.zoom_factor, "must be > 1"));
		}

		Ok(LensSettings {
			cartesian,
			polar,
			falloff,
			bounds,
			initial_scale,
			zoom_factor: vp.zoom_factor,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_validate() {
		let settings = LensConfig::default().validate().unwrap();
		assert!(settings.cartesian.is_none());
		assert!(settings.polar.is_some());
		assert!(!settings.falloff.is_disabled());
	}

	#[test]
	fn partial_json_fills_defaults() {
		let config =
			LensConfig::from_json(r#"{ "cartesian": { "centerHeightX": 0.7 }, "polar": null }"#)
				.unwrap();
		let cart = config.cartesian.as_ref().unwrap();
		assert_eq!(cart.center_height_x, 0.7);
		assert_eq!(cart.center_height_y, 0.5);
		assert!(config.polar.is_none());
		assert_eq!(config.scaling, ScalingConfig::default());
	}

	#[test]
	fn malformed_json_is_reported() {
		assert!(matches!(
			LensConfig::from_json("{ not json"),
			Err(LensError::MalformedConfig(_))
		));
	}

	#[test]
	fn out_of_domain_values_fail_validation() {
		let mut config = LensConfig::default();
		config.polar = Some(PolarConfig {
			center_height: 1.0,
			radius: 0.2,
		});
		assert!(matches!(
			config.validate(),
			Err(LensError::InvalidParameter { name: "centerHeight", .. })
		));

		let mut config = LensConfig::default();
		config.viewport.initial_scale = 20.0;
		assert!(config.validate().is_err());

		let mut config = LensConfig::default();
		config.viewport.zoom_factor = 1.0;
		assert!(config.validate().is_err());

		let mut config = LensConfig::default();
		config.scaling.steepness = -2.0;
		assert!(config.validate().is_err());
	}
}
