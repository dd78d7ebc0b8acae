use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::{
	ArrowMarker, BADGE_FONT_PX, BADGE_OFFSET, BADGE_RADIUS, BADGE_TEXT_OFFSET_Y, LABEL_COLOR,
	LABEL_FONT_PX, LABEL_OFFSET_Y, LinkLine, NODE_STROKE_WIDTH, NodeGlyph,
};
use super::state::GraphView;

pub fn render(view: &GraphView, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, view.width, view.height);
	if view.scene().is_empty() {
		return;
	}
	ctx.save();
	let _ = ctx.translate(view.transform.x, view.transform.y);
	let _ = ctx.scale(view.transform.k, view.transform.k);
	for line in &view.scene().links {
		let marker = view.markers().iter().find(|m| m.kind == line.marker);
		draw_link(ctx, line, marker);
	}
	for glyph in &view.scene().nodes {
		draw_node(ctx, glyph);
	}
	ctx.restore();
}

fn draw_link(ctx: &CanvasRenderingContext2d, line: &LinkLine, marker: Option<&ArrowMarker>) {
	let (dx, dy) = (line.x2 - line.x1, line.y2 - line.y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	ctx.set_global_alpha(line.stroke_opacity);
	ctx.set_stroke_style_str(line.stroke);
	ctx.set_line_width(line.stroke_width);
	ctx.begin_path();
	ctx.move_to(line.x1, line.y1);
	ctx.line_to(line.x2, line.y2);
	ctx.stroke();

	// Marker units scale with the stroke: the 10-unit box spans
	// `size` stroke widths and `ref_x` sits on the line's end point.
	if let Some(marker) = marker {
		let unit = marker.size * line.stroke_width / 10.0;
		let (ux, uy) = (dx / dist, dy / dist);
		let (px, py) = (-uy, ux);
		let (base_x, base_y) = (
			line.x2 - ux * marker.ref_x * unit,
			line.y2 - uy * marker.ref_x * unit,
		);
		let tip = (base_x + ux * 10.0 * unit, base_y + uy * 10.0 * unit);
		ctx.set_fill_style_str(marker.color);
		ctx.begin_path();
		ctx.move_to(base_x + px * 5.0 * unit, base_y + py * 5.0 * unit);
		ctx.line_to(tip.0, tip.1);
		ctx.line_to(base_x - px * 5.0 * unit, base_y - py * 5.0 * unit);
		ctx.close_path();
		ctx.fill();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_node(ctx: &CanvasRenderingContext2d, glyph: &NodeGlyph) {
	let (x, y) = (glyph.x, glyph.y);

	ctx.begin_path();
	let _ = ctx.arc(x, y, glyph.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&glyph.fill.to_string());
	ctx.fill();
	ctx.set_stroke_style_str("#fff");
	ctx.set_line_width(NODE_STROKE_WIDTH);
	ctx.stroke();

	ctx.set_text_align("center");
	ctx.set_fill_style_str(LABEL_COLOR);
	ctx.set_font(&format!("{}px sans-serif", LABEL_FONT_PX));
	let _ = ctx.fill_text(&glyph.label, x, y + LABEL_OFFSET_Y);

	let (bx, by) = (x + BADGE_OFFSET.0, y + BADGE_OFFSET.1);
	ctx.begin_path();
	let _ = ctx.arc(bx, by, BADGE_RADIUS, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&glyph.badge.fill.to_string());
	ctx.fill();
	ctx.set_stroke_style_str("#fff");
	ctx.set_line_width(1.0);
	ctx.stroke();

	ctx.set_fill_style_str("#fff");
	ctx.set_font(&format!("{}px sans-serif", BADGE_FONT_PX));
	let _ = ctx.fill_text(&glyph.badge.text, bx, by + BADGE_TEXT_OFFSET_Y);
}
