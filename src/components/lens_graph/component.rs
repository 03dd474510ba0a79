//! Leptos component wrapping the lens graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse, touch and
//! wheel handlers for panning and cursor-anchored zoom. An animation loop runs
//! via `requestAnimationFrame`; each frame ticks the lens (proximity scaling,
//! filter focus) and renders the scene.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent, Window,
};

use super::layout;
use super::render;
use super::scene::{GlyphId, GraphScene};
use super::theme::Theme;
use super::types::GraphData;
use crate::lens::{FrameScheduler, LensSettings, LensView, Size, Vector2, ZoomDirection};

/// Bundles the drawable scene with the lens state and canvas context.
struct GraphContext {
	scene: GraphScene,
	lens: LensView<GlyphId>,
	theme: Theme,
	ctx: CanvasRenderingContext2d,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(cb: &FrameCallback) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Some(ref cb) = *cb.borrow() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

fn window_size(window: &Window) -> Option<Size> {
	Some(Size::new(
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vector2 {
	let rect = canvas.get_bounding_client_rect();
	Vector2::new(
		client_x as f64 - rect.left(),
		client_y as f64 - rect.top(),
	)
}

/// Renders an interactive graph with a fisheye lens on a canvas element.
///
/// Pass graph data via the reactive `data` signal and validated lens
/// `settings`. The component sizes itself to its parent container by default;
/// set `fullscreen = true` to fill the viewport and resize automatically with
/// the window. Explicit `width`/`height` override automatic sizing.
#[component]
pub fn LensGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	settings: LensSettings,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let scheduler = Rc::new(RefCell::new(FrameScheduler::new()));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let (context_init, scheduler_init, animate_init, resize_cb_init) = (
		context.clone(),
		scheduler.clone(),
		animate.clone(),
		resize_cb.clone(),
	);

	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let size = if fullscreen {
			window_size(&window).unwrap_or(Size::new(800.0, 600.0))
		} else {
			let parent = canvas.parent_element();
			Size::new(
				width.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(size.width as u32);
		canvas.set_height(size.height as u32);

		let theme = Theme::default();
		let positions = layout::resolve_positions(&graph, size.width, size.height);
		let (scene, tracked) = match GraphScene::build(&graph, &positions, &theme, size) {
			Ok(built) => built,
			Err(e) => {
				error!("lens-graph: cannot build scene: {e}");
				return;
			}
		};
		info!(
			"lens-graph: scene built with {} nodes, {} edges",
			scene.nodes().len(),
			scene.edges().len()
		);

		{
			let mut slot = context_init.borrow_mut();
			match slot.as_mut() {
				// Data changed: keep pan/zoom, swap the scene.
				Some(c) => {
					c.scene = scene;
					c.lens.set_tracked(tracked);
				}
				None => {
					let ctx = match canvas.get_context("2d") {
						Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok(),
						_ => None,
					};
					let Some(ctx) = ctx else {
						error!("lens-graph: canvas has no 2d context");
						return;
					};
					let lens = match LensView::new(&settings, tracked) {
						Ok(lens) => lens,
						Err(e) => {
							error!("lens-graph: invalid lens settings: {e}");
							return;
						}
					};
					*slot = Some(GraphContext {
						scene,
						lens,
						theme,
						ctx,
					});
				}
			}
		}

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(size) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(size.width as u32);
				canvas_resize.set_height(size.height as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.scene.resize(size);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if animate_init.borrow().is_none() {
			let (context_anim, scheduler_anim, animate_inner) = (
				context_init.clone(),
				scheduler_init.clone(),
				animate_init.clone(),
			);
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				if scheduler_anim.borrow_mut().begin_frame() {
					if let Some(ref mut c) = *context_anim.borrow_mut() {
						c.lens.tick(&mut c.scene);
						let passes = c.scene.take_passes();
						render::render(&c.scene, c.lens.viewport().state(), &c.ctx, &c.theme, &passes);
					}
				}
				if scheduler_anim.borrow_mut().end_frame() {
					request_frame(&animate_inner);
				}
			}));
		}

		if scheduler_init.borrow_mut().start() {
			request_frame(&animate_init);
		}
	});

	// An in-flight frame still fires after unmount and sees the stopped state.
	let (context_cleanup, scheduler_cleanup, resize_cleanup) = (
		SendWrapper::new(context.clone()),
		SendWrapper::new(scheduler.clone()),
		SendWrapper::new(resize_cb.clone()),
	);
	on_cleanup(move || {
		scheduler_cleanup.borrow_mut().stop();
		if let (Some(window), Some(cb)) = (web_sys::window(), resize_cleanup.borrow_mut().take()) {
			let _ =
				window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		context_cleanup.borrow_mut().take();
		info!("lens-graph: frame loop stopped");
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let pos = canvas_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.lens.viewport_mut().pointer_down(pos);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let pos = canvas_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.scene.set_pointer(pos);
			c.lens.viewport_mut().pointer_move(pos);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.lens.viewport_mut().pointer_up();
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.lens.viewport_mut().pointer_leave();
		}
	};

	let context_ts = context.clone();
	let on_touchstart = move |ev: TouchEvent| {
		let (Some(canvas), Some(touch)) = (canvas_ref.get(), ev.touches().get(0)) else {
			return;
		};
		let pos = canvas_point(&canvas, touch.client_x(), touch.client_y());
		if let Some(ref mut c) = *context_ts.borrow_mut() {
			c.scene.set_pointer(pos);
			c.lens.viewport_mut().pointer_down(pos);
		}
	};

	let context_tm = context.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let (Some(canvas), Some(touch)) = (canvas_ref.get(), ev.touches().get(0)) else {
			return;
		};
		let pos = canvas_point(&canvas, touch.client_x(), touch.client_y());
		if let Some(ref mut c) = *context_tm.borrow_mut() {
			c.scene.set_pointer(pos);
			c.lens.viewport_mut().pointer_move(pos);
		}
	};

	let context_te = context.clone();
	let on_touchend = move |_: TouchEvent| {
		if let Some(ref mut c) = *context_te.borrow_mut() {
			c.lens.viewport_mut().pointer_up();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let anchor = canvas_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let direction = ZoomDirection::from_wheel_delta(ev.delta_y());
			let factor = c.lens.zoom_factor();
			if let Err(e) = c.lens.viewport_mut().zoom(direction, factor, anchor) {
				warn!("lens-graph: zoom failed: {e}");
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="lens-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:wheel=on_wheel
			style="display: block; cursor: crosshair; touch-action: none;"
		/>
	}
}
