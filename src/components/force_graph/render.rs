use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, NODE_RADIUS};

const SELECTED_RING: &str = "rgba(255, 255, 255, 0.9)";

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let ratio = state.pixel_ratio;
	let _ = ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (dash, gap, arrow_size) = (8.0, 4.0, 8.0);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);

	ctx.set_stroke_style_str("rgba(100, 180, 255, 0.6)");
	ctx.set_fill_style_str("rgba(100, 180, 255, 0.8)");
	ctx.set_line_width(1.5);

	state.graph.visit_edges(|n1, n2, _| {
		let visible = |id| state.store.node(id).is_some_and(|record| !record.hidden);
		if !visible(&n1.data.user_data) || !visible(&n2.data.user_data) {
			return;
		}
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}

		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_font("10px sans-serif");

	state.graph.visit_nodes(|node| {
		let Some(record) = state.store.node(&node.data.user_data) else {
			return;
		};
		if record.hidden {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);

		ctx.begin_path();
		let _ = ctx.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(record.color.fill());
		ctx.fill();
		if let Some(border) = record.color.border() {
			ctx.set_stroke_style_str(border);
			ctx.set_line_width(1.0);
			ctx.stroke();
		}

		if state.store.is_selected(&record.id) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, NODE_RADIUS + 2.5, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(SELECTED_RING);
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		if let Some(label) = &record.label {
			ctx.set_fill_style_str("white");
			let _ = ctx.fill_text(label, x + NODE_RADIUS + 3.0, y + 3.0);
		}
	});
}
