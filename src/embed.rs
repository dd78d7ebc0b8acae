//! Entry points for host pages that embed the graph from JavaScript.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlElement;

use crate::components::evidence_graph::{EvidenceGraphCanvas, EvidenceGraphController, GraphOptions};
use crate::error::GraphError;

/// A mounted evidence graph, as seen from JavaScript.
#[wasm_bindgen]
pub struct EvidenceGraphHandle {
	controller: EvidenceGraphController,
}

/// Mounts a graph view inside the element with id `container_id`.
///
/// `options` may carry `width`, `height` (default 600) and `endpoint`.
#[wasm_bindgen(js_name = mountEvidenceGraph)]
pub fn mount_evidence_graph(
	container_id: &str,
	options: JsValue,
) -> Result<EvidenceGraphHandle, JsValue> {
	let options = GraphOptions::from_js(options)?;
	let container: HtmlElement = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(container_id))
		.and_then(|el| el.dyn_into().ok())
		.ok_or_else(|| GraphError::ContainerNotFound(container_id.to_string()))?;

	let controller = EvidenceGraphController::new(options);
	let mounted = controller.clone();
	leptos::mount::mount_to(container, move || {
		view! { <EvidenceGraphCanvas controller=mounted /> }
	})
	.forget();

	Ok(EvidenceGraphHandle { controller })
}

#[wasm_bindgen]
impl EvidenceGraphHandle {
	/// Loads and draws an investigation. Rejects on fetch or decode errors.
	#[wasm_bindgen(js_name = loadData)]
	pub fn load_data(&self, investigation_id: String) -> js_sys::Promise {
		let controller = self.controller.clone();
		future_to_promise(async move {
			controller.load_data(&investigation_id).await?;
			Ok(JsValue::UNDEFINED)
		})
	}

	/// Redraws the current snapshot.
	pub fn render(&self) -> Result<(), JsValue> {
		Ok(self.controller.render()?)
	}

	/// Reserved for audience-weighted filtering.
	#[wasm_bindgen(js_name = filterByAudience)]
	pub fn filter_by_audience(&self, audience_type: &str) {
		self.controller.filter_by_audience(audience_type);
	}

	/// Reserved for navigation-path highlighting.
	#[wasm_bindgen(js_name = highlightPath)]
	pub fn highlight_path(&self, path_nodes: Vec<String>) {
		self.controller.highlight_path(&path_nodes);
	}
}
