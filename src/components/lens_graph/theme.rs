//! Visual theming for the lens graph.
//!
//! Colors and base glyph sizes. Sizes are local units at zoom 1; the proximity
//! scaler's per-glyph scale multiplies them each frame.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#RRGGBB` or `rgb()`/`rgba()` notation. Unknown input yields gray.
	pub fn parse(color_str: &str) -> Self {
		let gray = Color::rgb(128, 128, 128);
		if let Some(hex) = color_str.strip_prefix('#') {
			if hex.len() != 6 || !hex.is_ascii() {
				return gray;
			}
			let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(128);
			return Color::rgb(channel(0), channel(2), channel(4));
		}
		if !color_str.starts_with("rgb") {
			return gray;
		}
		let nums: Vec<&str> = color_str
			.trim_start_matches("rgba(")
			.trim_start_matches("rgb(")
			.trim_end_matches(')')
			.split(',')
			.map(str::trim)
			.collect();
		let channel = |i: usize| nums.get(i).and_then(|s| s.parse().ok()).unwrap_or(128);
		let a = nums.get(3).and_then(|s| s.parse().ok()).unwrap_or(1.0);
		Color::rgba(channel(0), channel(1), channel(2), a)
	}
}

/// A curated color palette for nodes without an explicit color.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted, harmonious palette - slate blues and teals (default)
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(129, 161, 193), // Light steel
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(136, 160, 175), // Cadet blue
				Color::rgb(108, 142, 173), // Air force blue
				Color::rgb(119, 158, 165), // Desaturated cyan
				Color::rgb(143, 163, 180), // Cool gray
				Color::rgb(122, 153, 168), // Dusty blue
			],
		}
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Secondary color for the radial gradient
	pub color_secondary: Color,
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong), drawn after lens passes
	pub vignette: f64,
}

/// Edge, arrow and decal style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	/// Line width in screen pixels
	pub line_width: f64,
	/// Dash pattern (dash, gap) in screen pixels for undirected edges
	pub dash_pattern: (f64, f64),
	/// Arrow length at scale 1
	pub arrow_size: f64,
	/// Decal label font size at scale 1
	pub decal_size: f64,
	pub decal_color: Color,
}

/// Node glyph style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Glyph radius at scale 1
	pub radius: f64,
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Border/stroke width in screen pixels (0 = no border)
	pub border_width: f64,
	pub border_color: Color,
	/// Label font size at scale 1
	pub label_size: f64,
	pub label_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub palette: NodePalette,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
				vignette: 0.15,
			},
			edge: EdgeStyle {
				color: Color::rgba(140, 160, 180, 0.6),
				line_width: 1.5,
				dash_pattern: (6.0, 4.0),
				arrow_size: 7.0,
				decal_size: 10.0,
				decal_color: Color::rgba(200, 210, 220, 0.9),
			},
			node: NodeStyle {
				radius: 6.0,
				use_gradient: true,
				border_width: 1.0,
				border_color: Color::rgba(255, 255, 255, 0.25),
				label_size: 11.0,
				label_color: Color::rgba(255, 255, 255, 0.85),
			},
			palette: NodePalette::slate(),
		}
	}
}
