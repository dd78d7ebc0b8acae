use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::controller::EvidenceGraphController;
use super::render;
use super::tooltip::TooltipOverlay;

type FrameCallback = Closure<dyn FnMut()>;

/// Owns the self-rescheduling animation callback. The callback reaches
/// itself only through [`FrameSlot::handle`], so dropping the slot frees it.
struct FrameSlot<C>(Rc<RefCell<Option<C>>>);

impl<C> FrameSlot<C> {
	fn new() -> Self {
		Self(Rc::new(RefCell::new(None)))
	}

	fn handle(&self) -> Weak<RefCell<Option<C>>> {
		Rc::downgrade(&self.0)
	}

	fn set(&self, callback: C) {
		*self.0.borrow_mut() = Some(callback);
	}
}

fn request_frame(slot: &RefCell<Option<FrameCallback>>, frame: &AtomicI32) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let callback = slot.borrow();
	if let Some(cb) = callback.as_ref() {
		if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			frame.store(id, Ordering::Relaxed);
		}
	}
}

fn cancel_frame(frame: &AtomicI32) {
	if let Some(window) = web_sys::window() {
		let _ = window.cancel_animation_frame(frame.load(Ordering::Relaxed));
	}
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

#[component]
pub fn EvidenceGraphCanvas(controller: EvidenceGraphController) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	// Disposed with the component, which drops the callback.
	let frames = StoredValue::new_local(FrameSlot::<FrameCallback>::new());
	let alive = Arc::new(AtomicBool::new(true));
	let frame = Arc::new(AtomicI32::new(0));
	let tooltip = controller.tooltip;

	let (ctl_init, alive_init, frame_init) = (controller.clone(), alive.clone(), frame.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let container_width = canvas
			.parent_element()
			.map(|p| p.client_width() as f64)
			.unwrap_or(800.0);
		let (w, h) = (
			ctl_init.options.width_or(container_width),
			ctl_init.options.height(),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		ctl_init.view.borrow_mut().resize(w, h);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("Canvas 2d context unavailable");
				return;
			}
		};

		cancel_frame(&frame_init);
		let (view_anim, alive_anim, frame_anim, slot) = (
			ctl_init.view.clone(),
			alive_init.clone(),
			frame_init.clone(),
			frames.with_value(FrameSlot::handle),
		);
		let callback = Closure::new(move || {
			if !alive_anim.load(Ordering::Relaxed) {
				return;
			}
			{
				let mut view = view_anim.borrow_mut();
				view.tick();
				render::render(&view, &ctx);
			}
			if let Some(slot) = slot.upgrade() {
				request_frame(&slot, &frame_anim);
			}
		});
		frames.with_value(|slot| {
			slot.set(callback);
			request_frame(&slot.0, &frame_init);
		});
	});

	on_cleanup(move || {
		alive.store(false, Ordering::Relaxed);
		cancel_frame(&frame);
	});

	let ctl_md = controller.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		ctl_md.view.borrow_mut().pointer_down(x, y);
	};

	let ctl_mm = controller.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		ctl_mm.view.borrow_mut().pointer_move(x, y);
		ctl_mm.sync_tooltip();
	};

	let ctl_mu = controller.clone();
	let on_mouseup = move |_: MouseEvent| {
		ctl_mu.view.borrow_mut().pointer_up();
	};

	let ctl_ml = controller.clone();
	let on_mouseleave = move |_: MouseEvent| {
		{
			let mut view = ctl_ml.view.borrow_mut();
			view.pointer_up();
			view.hover(None, 0.0, 0.0);
		}
		ctl_ml.sync_tooltip();
	};

	let ctl_wh = controller.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		ctl_wh.view.borrow_mut().zoom_at(x, y, factor);
	};

	view! {
		<div class="evidence-graph" style="position: relative;">
			<canvas
				node_ref=canvas_ref
				class="evidence-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			{move || tooltip.get().map(|tooltip| view! { <TooltipOverlay tooltip=tooltip /> })}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dropping_the_slot_frees_a_self_referencing_callback() {
		let slot: FrameSlot<Box<dyn Fn() -> bool>> = FrameSlot::new();
		let captured = Rc::new(());
		let (handle, held) = (slot.handle(), captured.clone());
		slot.set(Box::new(move || {
			let _ = &held;
			handle.upgrade().is_some()
		}));
		assert_eq!(Rc::strong_count(&captured), 2);
		assert!(slot.0.borrow().as_ref().is_some_and(|cb| cb()));

		drop(slot);
		assert_eq!(Rc::strong_count(&captured), 1);
	}
}
