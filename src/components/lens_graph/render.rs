//! Canvas rendering for the lens graph.
//!
//! Rendering uses passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edge lines, arrows and decals, then nodes and labels (local space)
//! 3. Lens post-process passes over the whole canvas
//! 4. Vignette (screen space, undistorted)

use std::f64::consts::PI;

use wasm_bindgen::{Clamped, JsValue};
use web_sys::{CanvasRenderingContext2d, ImageData};

use super::scene::{EdgeVisual, GraphScene, NodeVisual};
use super::theme::{Color, Theme};
use crate::lens::proximity::uniform_zoom;
use crate::lens::{LensFilter, Scene, Size, Vector2, ViewportState};

/// Glyphs smaller than this many screen pixels are not drawn.
const CULL_SCREEN_PX: f64 = 0.35;
/// Decal and label text below this screen size is skipped.
const MIN_TEXT_PX: f64 = 4.0;

/// Renders the complete scene to the canvas, then applies `passes`.
pub fn render(
	scene: &GraphScene,
	view: ViewportState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	passes: &[LensFilter],
) {
	let size = scene.size();
	let k = uniform_zoom(view.zoom_scale);

	draw_background(size, ctx, theme);

	ctx.save();
	let _ = ctx.translate(view.pan_offset.x, view.pan_offset.y);
	let _ = ctx.scale(view.zoom_scale.x, view.zoom_scale.y);

	for edge in scene.edges() {
		draw_edge(scene, ctx, theme, edge, k);
	}
	for node in scene.nodes() {
		draw_node(scene, ctx, theme, node, k);
	}

	ctx.restore();

	for filter in passes {
		if let Err(e) = apply_lens_pass(ctx, size, filter) {
			log::warn!("lens-graph: post-process pass failed: {e:?}");
		}
	}

	if theme.background.vignette > 0.0 {
		draw_vignette(size, ctx, theme);
	}
}

fn draw_background(size: Size, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (size.width, size.height);
	let gradient = theme
		.background
		.use_gradient
		.then(|| ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) * 0.8))
		.and_then(Result::ok);

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_vignette(size: Size, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (size.width, size.height);
	let Ok(gradient) = ctx.create_radial_gradient(
		w / 2.0,
		h / 2.0,
		w.min(h) * 0.3,
		w / 2.0,
		h / 2.0,
		w.max(h) * 0.7,
	) else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&format!("rgba(0, 0, 0, {})", theme.background.vignette),
	);

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, w, h);
}

/// Local-space radii of a node glyph this frame.
fn node_radii(scene: &GraphScene, theme: &Theme, node: &NodeVisual) -> Vector2 {
	scene.glyph(node.glyph).scale * theme.node.radius
}

fn rgba(color: Color, alpha: f64) -> String {
	format!(
		"rgba({}, {}, {}, {})",
		color.r,
		color.g,
		color.b,
		(alpha * color.a).clamp(0.0, 1.0)
	)
}

fn draw_edge(
	scene: &GraphScene,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	edge: &EdgeVisual,
	k: f64,
) {
	let (src, tgt) = (&scene.nodes()[edge.source], &scene.nodes()[edge.target]);
	let from = scene.object_position(src.glyph);
	let to = scene.object_position(tgt.glyph);
	let Ok(dir) = (to - from).try_normalize() else {
		return;
	};

	let alpha = scene.glyph(edge.line).opacity;
	if alpha <= 0.01 {
		return;
	}
	let style = &theme.edge;

	let src_r = node_radii(scene, theme, src).x;
	let tgt_r = node_radii(scene, theme, tgt).x;
	let arrow_len = edge
		.arrow
		.map(|a| style.arrow_size * scene.glyph(a).scale.x)
		.unwrap_or(0.0);

	let start = from + dir * src_r;
	let end = to - dir * (tgt_r + arrow_len);

	ctx.set_stroke_style_str(&rgba(style.color, alpha));
	ctx.set_line_width(style.line_width / k);
	if edge.directed {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(style.dash_pattern.0 / k),
			&JsValue::from_f64(style.dash_pattern.1 / k),
		));
	}
	ctx.begin_path();
	ctx.move_to(start.x, start.y);
	ctx.line_to(end.x, end.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	if arrow_len * k > CULL_SCREEN_PX {
		ctx.set_fill_style_str(&rgba(style.color, alpha));
		let tip = to - dir * tgt_r;
		let back = tip - dir * arrow_len;
		let side = Vector2::new(-dir.y, dir.x) * (arrow_len * 0.5);
		ctx.begin_path();
		ctx.move_to(tip.x, tip.y);
		ctx.line_to(back.x + side.x, back.y + side.y);
		ctx.line_to(back.x - side.x, back.y - side.y);
		ctx.close_path();
		ctx.fill();
	}

	if let Some((decal, text)) = &edge.decal {
		let glyph = scene.glyph(*decal);
		let font = style.decal_size * glyph.scale.y;
		if font * k >= MIN_TEXT_PX {
			ctx.set_fill_style_str(&rgba(style.decal_color, alpha));
			ctx.set_font(&format!("{font}px sans-serif"));
			ctx.set_text_align("center");
			let _ = ctx.fill_text(text, glyph.position.x, glyph.position.y - font * 0.3);
			ctx.set_text_align("start");
		}
	}
}

fn draw_node(
	scene: &GraphScene,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	node: &NodeVisual,
	k: f64,
) {
	let glyph = scene.glyph(node.glyph);
	let radii = node_radii(scene, theme, node);
	if radii.x.max(radii.y) * k < CULL_SCREEN_PX {
		return;
	}
	let p = glyph.position;
	let base = Color::parse(&node.color);

	ctx.begin_path();
	let _ = ctx.ellipse(p.x, p.y, radii.x, radii.y, 0.0, 0.0, 2.0 * PI);
	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			let r = radii.x.max(radii.y);
			ctx.create_radial_gradient(p.x - r * 0.3, p.y - r * 0.3, 0.0, p.x, p.y, r)
		})
		.and_then(Result::ok);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&node.color),
	}
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / k);
		ctx.stroke();
	}

	if let Some(label) = &node.label {
		let font = theme.node.label_size * glyph.scale.y;
		if font * k >= MIN_TEXT_PX {
			ctx.set_fill_style_str(&theme.node.label_color.to_css());
			ctx.set_font(&format!("{font}px sans-serif"));
			let _ = ctx.fill_text(label, p.x + radii.x + 4.0 / k, p.y + font * 0.3);
		}
	}
}

/// Pixel rectangle `(x0, y0, x1, y1)` a filter can change.
fn affected_region(filter: &LensFilter, w: usize, h: usize) -> (usize, usize, usize, usize) {
	match filter {
		LensFilter::Cartesian(_) => (0, 0, w, h),
		LensFilter::Polar(polar) => {
			let f = polar.focus();
			let r = polar.radius();
			let span = |lo: f64, hi: f64, n: usize| {
				let n_f = n as f64;
				let a = (lo * n_f).floor().clamp(0.0, n_f) as usize;
				let b = (hi * n_f).ceil().clamp(0.0, n_f) as usize;
				(a, b)
			};
			let (x0, x1) = span(f.x - r, f.x + r, w);
			let (y0, y1) = span(f.y - r, f.y + r, h);
			(x0, y0, x1, y1)
		}
	}
}

/// Inverse-sample the canvas through `filter`: each output pixel copies the
/// source pixel at `filter.evaluate(uv)`.
fn apply_lens_pass(
	ctx: &CanvasRenderingContext2d,
	size: Size,
	filter: &LensFilter,
) -> Result<(), JsValue> {
	let (w, h) = (size.width as usize, size.height as usize);
	if w == 0 || h == 0 {
		return Ok(());
	}
	let source = ctx.get_image_data(0.0, 0.0, w as f64, h as f64)?.data().0;
	let mut out = source.clone();

	let (wf, hf) = (w as f64, h as f64);
	let (x0, y0, x1, y1) = affected_region(filter, w, h);
	for py in y0..y1 {
		for px in x0..x1 {
			let uv = Vector2::new((px as f64 + 0.5) / wf, (py as f64 + 0.5) / hf);
			let s = filter.evaluate(uv);
			let sx = ((s.x * wf) as isize).clamp(0, w as isize - 1) as usize;
			let sy = ((s.y * hf) as isize).clamp(0, h as isize - 1) as usize;
			let (dst, src) = ((py * w + px) * 4, (sy * w + sx) * 4);
			out[dst..dst + 4].copy_from_slice(&source[src..src + 4]);
		}
	}

	let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(out.as_slice()), w as u32, h as u32)?;
	ctx.put_image_data(&image, 0.0, 0.0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lens::{CartesianFisheye, PolarFisheye};

	fn polar(focus: Vector2, radius: f64) -> LensFilter {
		PolarFisheye::new(0.75, radius)
			.unwrap()
			.with_focus(focus)
			.unwrap()
			.into()
	}

	#[test]
	fn cartesian_pass_covers_the_whole_canvas() {
		let filter = LensFilter::from(CartesianFisheye::new(0.3).unwrap());
		assert_eq!(affected_region(&filter, 256, 128), (0, 0, 256, 128));
	}

	#[test]
	fn polar_region_near_origin_corner_is_clipped_at_zero() {
		let filter = polar(Vector2::new(0.0625, 0.125), 0.25);
		// x: [-0.1875, 0.3125] * 256, y: [-0.125, 0.375] * 128
		assert_eq!(affected_region(&filter, 256, 128), (0, 0, 80, 48));
	}

	#[test]
	fn polar_region_at_far_corner_is_clipped_at_extent() {
		let filter = polar(Vector2::new(1.0, 1.0), 0.25);
		assert_eq!(affected_region(&filter, 256, 128), (192, 96, 256, 128));
	}

	#[test]
	fn radius_wider_than_canvas_covers_everything() {
		let filter = polar(Vector2::new(0.5, 0.5), 2.0);
		assert_eq!(affected_region(&filter, 300, 200), (0, 0, 300, 200));
	}

	#[test]
	fn region_on_an_empty_canvas_is_empty() {
		let filter = polar(Vector2::new(0.5, 0.5), 0.25);
		assert_eq!(affected_region(&filter, 0, 0), (0, 0, 0, 0));
	}
}
