use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::listeners::{Listener, Listeners};
use super::render;
use super::state::ForceGraphState;
use super::types::{GraphData, SelectionMode};
use crate::highlight::{FilterCriteria, GraphStore, HighlightConfig, HighlightSession};

fn window_size(window: &Window) -> (f64, f64) {
	let read = |value: Result<JsValue, JsValue>, fallback: f64| {
		value.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(
		read(window.inner_width(), 800.0),
		read(window.inner_height(), 600.0),
	)
}

fn size_canvas(canvas: &HtmlCanvasElement, width: f64, height: f64, ratio: f64) {
	canvas.set_width((width * ratio) as u32);
	canvas.set_height((height * ratio) as u32);
	let style = web_sys::HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{width}px"));
	let _ = style.set_property("height", &format!("{height}px"));
}

/// Force-directed graph on a canvas. Clicking a node highlights it, clicking
/// empty space clears the highlight.
#[component]
pub fn ForceGraphCanvas(
	/// Graph document; a new value rebuilds the store and resets highlights.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Size the canvas to the window and follow resizes.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed width; defaults to the parent's width.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height; defaults to the parent's height.
	#[prop(default = None)]
	height: Option<f64>,
	/// Profile, palette and caching for the highlight session.
	#[prop(default = HighlightConfig::default())]
	config: HighlightConfig,
	/// What a click does.
	#[prop(default = SelectionMode::default())]
	mode: SelectionMode,
	/// Attribute filter to apply; `None` clears any active filter.
	#[prop(into, default = Signal::derive(|| None))]
	filter: Signal<Option<FilterCriteria>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let profile = config.profile;
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let session = Rc::new(RefCell::new(HighlightSession::new(config)));
	let animate: Rc<RefCell<Option<Listener>>> = Rc::new(RefCell::new(None));
	let listeners: Rc<RefCell<Listeners>> = Rc::new(RefCell::new(Listeners::default()));
	let (state_init, session_init, animate_init, listeners_init) = (
		state.clone(),
		session.clone(),
		animate.clone(),
		listeners.clone(),
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
		let ratio = profile.pixel_ratio(window.device_pixel_ratio());

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		size_canvas(&canvas, w, h, ratio);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("canvas has no 2d context");
			return;
		};

		let store = graph.to_store().unwrap_or_else(|err| {
			warn!("graph data rejected: {err}");
			GraphStore::default()
		});
		info!(
			"loaded graph with {} node(s), physics {}",
			store.node_count(),
			if profile.physics_at_start() { "on" } else { "off" }
		);

		// Stop the previous mount's callbacks before their closures are dropped.
		let mut listeners = listeners_init.borrow_mut();
		listeners.detach_all();

		let mut fresh = ForceGraphState::new(store, w, h, ratio, profile.physics_at_start());
		fresh.adopt_session(&mut session_init.borrow_mut(), filter.get_untracked().as_ref());
		*state_init.borrow_mut() = Some(fresh);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			let apply: Listener = Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					size_canvas(&canvas_resize, nw, nh, s.pixel_ratio);
					s.resize(nw, nh);
				}
			});
			let on_resize = match profile.resize_debounce_ms() {
				None => apply,
				Some(delay) => {
					let apply_fn: js_sys::Function = apply.as_ref().unchecked_ref::<js_sys::Function>().clone();
					listeners.retain(apply);
					let pending = listeners.timeout_slot();
					Closure::new(move || {
						let Some(win) = web_sys::window() else {
							return;
						};
						if let Some(handle) = pending.take() {
							win.clear_timeout_with_handle(handle);
						}
						if let Ok(handle) =
							win.set_timeout_with_callback_and_timeout_and_arguments_0(&apply_fn, delay)
						{
							pending.set(Some(handle));
						}
					})
				}
			};
			listeners.attach(&window, "resize", on_resize);
		}

		if let Some(document) = window.document() {
			let state_vis = state_init.clone();
			let on_visibility: Listener = Closure::new(move || {
				let hidden = web_sys::window()
					.and_then(|w| w.document())
					.is_some_and(|d| d.hidden());
				if let Some(running) = profile.physics_on_visibility(hidden) {
					if let Some(ref mut s) = *state_vis.borrow_mut() {
						debug!("document hidden={hidden}, physics {running}");
						s.animation_running = running;
					}
				}
			});
			listeners.attach(&document, "visibilitychange", on_visibility);
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let (frame, frame_inner) = (listeners.frame_slot(), listeners.frame_slot());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			frame_inner.set(None);
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			frame.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let (state_filter, session_filter) = (state.clone(), session.clone());
	Effect::new(move |_| {
		let criteria = filter.get();
		let mut state = state_filter.borrow_mut();
		let Some(s) = state.as_mut() else {
			return;
		};
		let ids = s.apply_filter(&mut session_filter.borrow_mut(), criteria.as_ref());
		if let Some(criteria) = &criteria {
			info!("filter on {:?} kept {} node(s)", criteria.property, ids.len());
		}
	});

	let (state_click, session_click) = (state.clone(), session.clone());
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		let mut state = state_click.borrow_mut();
		let Some(s) = state.as_mut() else {
			return;
		};
		let ids = s.click(&mut session_click.borrow_mut(), mode, x, y);
		debug!("{mode:?} selection: {ids:?}");
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:click=on_click
			style="display: block; cursor: pointer;"
		/>
	}
}
