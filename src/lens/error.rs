//! Error taxonomy for the lens core.
//!
//! Configuration errors propagate to the caller. Geometric degeneracies are
//! expected at runtime and are recovered by the per-frame code that hits them.

use thiserror::Error;

/// Errors raised by the lens core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LensError {
	/// A visual parameter is outside its domain. Never clamped silently.
	#[error("invalid parameter `{name}` = {value}: {reason}")]
	InvalidParameter {
		/// Parameter name as it appears in configuration.
		name: &'static str,
		/// The rejected value.
		value: f64,
		/// Domain the value must satisfy.
		reason: &'static str,
	},

	/// A direction was required from a zero-length vector or empty extent.
	#[error("degenerate geometry: {0}")]
	DegenerateGeometry(&'static str),

	/// The embedded configuration document could not be parsed.
	#[error("malformed lens configuration: {0}")]
	MalformedConfig(String),
}

/// Result alias used throughout the lens core.
pub type LensResult<T> = Result<T, LensError>;

impl LensError {
	pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
		Self::InvalidParameter {
			name,
			value,
			reason,
		}
	}
}

/// Rejects NaN and infinities.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> LensResult<f64> {
	if value.is_finite() {
		Ok(value)
	} else {
		Err(LensError::invalid(name, value, "must be finite"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invalid_parameter_message_names_the_field() {
		let err = LensError::invalid("radius", -1.0, "must be > 0");
		assert_eq!(
			err.to_string(),
			"invalid parameter `radius` = -1: must be > 0"
		);
	}

	#[test]
	fn non_finite_values_are_rejected() {
		assert!(ensure_finite("x", f64::NAN).is_err());
		assert!(ensure_finite("x", f64::INFINITY).is_err());
		assert_eq!(ensure_finite("x", 2.5), Ok(2.5));
	}
}
