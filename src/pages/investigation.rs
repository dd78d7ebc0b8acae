use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;
use log::error;

use crate::components::evidence_graph::{EvidenceGraphCanvas, EvidenceGraphController, GraphOptions};

/// Graph of one investigation, keyed by the `:id` route parameter.
#[component]
pub fn Investigation() -> impl IntoView {
	let params = use_params_map();
	let investigation_id = move || params.read().get("id").unwrap_or_default();

	let controller = EvidenceGraphController::new(GraphOptions::default());
	let (loading, load_error) = (controller.loading, controller.load_error);

	let ctl_load = controller.clone();
	Effect::new(move |_| {
		let id = investigation_id();
		let ctl = ctl_load.clone();
		spawn_local(async move {
			if let Err(e) = ctl.load_data(&id).await {
				error!("Loading investigation {id} failed: {e}");
			}
		});
	});

	view! {
		<div class="investigation-graph">
			<div class="graph-overlay">
				<h1>{move || format!("Investigation {}", investigation_id())}</h1>
				<Show when=move || loading.get()>
					<p class="subtitle">"Loading graph..."</p>
				</Show>
				{move || {
					load_error
						.get()
						.map(|e| view! { <p class="error">{format!("Error: {}", e)}</p> })
				}}
			</div>
			<EvidenceGraphCanvas controller=controller />
		</div>
	}
}
