use leptos::prelude::*;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<div class="landing">
			<h1>"Evidence Graph"</h1>
			<p class="subtitle">
				"Open "<code>"/investigations/<id>"</code>" to explore the claims and evidence of an investigation."
			</p>
			<p>"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
		</div>
	}
}
