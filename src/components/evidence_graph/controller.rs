use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::info;

use crate::api::GraphQlClient;
use crate::error::GraphError;

use super::options::GraphOptions;
use super::state::{GraphView, LoadTicket};
use super::tooltip::Tooltip;
use super::types::GraphSnapshot;

/// Fallback width until the canvas is mounted and can measure its
/// container.
const UNMOUNTED_WIDTH: f64 = 800.0;

/// Shared handle to one graph view, used by the canvas component and by
/// whoever drives loading (a page or the host script).
#[derive(Clone)]
pub struct EvidenceGraphController {
	pub(crate) view: Rc<RefCell<GraphView>>,
	pub(crate) options: GraphOptions,
	pub(crate) tooltip: RwSignal<Option<Tooltip>>,
	/// Set while the most recently started load is in flight.
	pub(crate) loading: RwSignal<bool>,
	/// Failure of the most recently started load, if any.
	pub(crate) load_error: RwSignal<Option<String>>,
	client: GraphQlClient,
}

impl EvidenceGraphController {
	pub fn new(options: GraphOptions) -> Self {
		let view = GraphView::new(options.width_or(UNMOUNTED_WIDTH), options.height());
		Self {
			view: Rc::new(RefCell::new(view)),
			client: GraphQlClient::new(options.endpoint()),
			tooltip: RwSignal::new(None),
			loading: RwSignal::new(false),
			load_error: RwSignal::new(None),
			options,
		}
	}

	/// Fetches the investigation, rebuilds the snapshot and renders it.
	///
	/// When loads overlap, only the most recently started one is drawn or
	/// updates `loading` and `load_error`.
	pub async fn load_data(&self, investigation_id: &str) -> Result<(), GraphError> {
		let ticket = self.view.borrow_mut().begin_load();
		self.loading.set(true);
		self.load_error.set(None);
		info!("Loading investigation {investigation_id}");

		let result = self.fetch_and_install(ticket, investigation_id).await;
		if self.view.borrow().is_latest_load(ticket) {
			if let Err(e) = &result {
				self.load_error.set(Some(e.to_string()));
			}
			self.loading.set(false);
		}
		result
	}

	async fn fetch_and_install(
		&self,
		ticket: LoadTicket,
		investigation_id: &str,
	) -> Result<(), GraphError> {
		let data = self.client.fetch_investigation(investigation_id).await?;
		let snapshot = GraphSnapshot::from_investigation(data);
		let links = self
			.client
			.load_relationships(investigation_id, &snapshot.claim_ids())
			.await?;
		let snapshot = snapshot.with_links(links);

		let mut view = self.view.borrow_mut();
		if view.finish_load(ticket, snapshot) {
			view.render()?;
			self.tooltip.set(None);
		}
		Ok(())
	}

	pub fn render(&self) -> Result<(), GraphError> {
		self.view.borrow_mut().render()?;
		self.tooltip.set(None);
		Ok(())
	}

	pub fn filter_by_audience(&self, audience: &str) {
		self.view.borrow_mut().filter_by_audience(audience);
	}

	pub fn highlight_path(&self, path_nodes: &[String]) {
		self.view.borrow_mut().highlight_path(path_nodes);
	}

	/// Pushes the view's tooltip into the reactive overlay.
	pub(crate) fn sync_tooltip(&self) {
		let current = self.view.borrow().tooltip().cloned();
		if self.tooltip.get_untracked() != current {
			self.tooltip.set(current);
		}
	}
}
