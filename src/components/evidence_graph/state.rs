use log::{debug, error, info, warn};

use crate::error::GraphError;

use super::layout::Simulation;
use super::scene::{ArrowMarker, Scene, default_markers};
use super::tooltip::Tooltip;
use super::types::GraphSnapshot;

pub const DEFAULT_HEIGHT: f64 = 600.0;
pub const SCALE_EXTENT: (f64, f64) = (0.5, 5.0);
/// Alpha target held while a node is being dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<usize>,
	pub active: usize,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Identifies one `loadData` call; only the most recently issued one may
/// install its snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct GraphView {
	pub width: f64,
	pub height: f64,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	markers: Vec<ArrowMarker>,
	snapshot: Option<GraphSnapshot>,
	simulation: Option<Simulation>,
	scene: Scene,
	hover: Option<usize>,
	tooltip: Option<Tooltip>,
	latest_load: u64,
}

impl GraphView {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			markers: default_markers(),
			snapshot: None,
			simulation: None,
			scene: Scene::default(),
			hover: None,
			tooltip: None,
			latest_load: 0,
		}
	}

	pub fn markers(&self) -> &[ArrowMarker] {
		&self.markers
	}

	#[cfg(test)]
	pub fn snapshot(&self) -> Option<&GraphSnapshot> {
		self.snapshot.as_ref()
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	#[cfg(test)]
	pub fn simulation(&self) -> Option<&Simulation> {
		self.simulation.as_ref()
	}

	pub fn tooltip(&self) -> Option<&Tooltip> {
		self.tooltip.as_ref()
	}

	pub fn begin_load(&mut self) -> LoadTicket {
		self.latest_load += 1;
		LoadTicket(self.latest_load)
	}

	/// Whether no load was issued after `ticket`.
	pub fn is_latest_load(&self, ticket: LoadTicket) -> bool {
		ticket.0 == self.latest_load
	}

	/// Installs `snapshot` unless a newer load was issued after `ticket`.
	pub fn finish_load(&mut self, ticket: LoadTicket, snapshot: GraphSnapshot) -> bool {
		if !self.is_latest_load(ticket) {
			warn!(
				"Discarding stale graph load {} (latest is {})",
				ticket.0, self.latest_load
			);
			return false;
		}
		info!(
			"Loaded graph with {} nodes and {} links",
			snapshot.nodes().len(),
			snapshot.links.len()
		);
		self.snapshot = Some(snapshot);
		true
	}

	/// Rebuilds the scene and restarts the layout for the current snapshot.
	///
	/// Any layout from a previous render is dropped first, so at most one
	/// simulation is ever ticking.
	pub fn render(&mut self) -> Result<(), GraphError> {
		let Some(snapshot) = self.snapshot.as_ref() else {
			error!("No data to render");
			return Ok(());
		};

		self.simulation = None;
		self.scene = Scene::default();
		self.drag = DragState::default();
		self.hover = None;
		self.tooltip = None;

		if snapshot.is_empty() {
			debug!("Snapshot is empty, nothing to draw");
			return Ok(());
		}

		let simulation = Simulation::new(snapshot, self.width, self.height)?;
		let mut scene = Scene::build(snapshot, &simulation.edges());
		scene.sync_positions(&simulation);
		self.scene = scene;
		self.simulation = Some(simulation);
		Ok(())
	}

	/// Advances the layout by one frame. Returns whether anything moved.
	pub fn tick(&mut self) -> bool {
		let Some(sim) = self.simulation.as_mut() else {
			return false;
		};
		if !sim.is_running() {
			return false;
		}
		if !sim.step() {
			debug!("Layout settled");
		}
		self.scene.sync_positions(sim);
		true
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node whose circle contains the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.scene.nodes.iter().rposition(|glyph| {
			let (dx, dy) = (glyph.x - gx, glyph.y - gy);
			(dx * dx + dy * dy).sqrt() <= glyph.radius
		})
	}

	/// Zooms by `factor` keeping the screen point (`x`, `y`) fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(SCALE_EXTENT.0, SCALE_EXTENT.1);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			let (gx, gy) = self.screen_to_graph(x, y);
			self.drag_start(idx, gx, gy);
		} else {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	/// Drags, pans, or updates the hover tooltip. Hover is only tracked
	/// while neither a drag nor a pan is in progress.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if self.drag.node_idx.is_some() {
			let (gx, gy) = self.screen_to_graph(x, y);
			self.drag_move(gx, gy);
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		} else {
			let node = self.node_at_position(x, y);
			self.hover(node, x, y);
		}
	}

	pub fn pointer_up(&mut self) {
		self.drag_end();
		self.pan.active = false;
	}

	/// Pins `idx` under the pointer. A drag already in progress is released
	/// first, since there is only one pointer.
	pub fn drag_start(&mut self, idx: usize, gx: f64, gy: f64) {
		self.drag_end();
		let Some(sim) = self.simulation.as_mut() else {
			return;
		};
		if self.drag.active == 0 {
			sim.set_alpha_target(DRAG_ALPHA_TARGET);
			sim.restart();
		}
		sim.pin(idx, gx, gy);
		self.drag.active += 1;
		self.drag.node_idx = Some(idx);
	}

	pub fn drag_move(&mut self, gx: f64, gy: f64) {
		if let (Some(idx), Some(sim)) = (self.drag.node_idx, self.simulation.as_mut()) {
			sim.pin(idx, gx, gy);
		}
	}

	pub fn drag_end(&mut self) {
		let Some(idx) = self.drag.node_idx.take() else {
			return;
		};
		self.drag.active = self.drag.active.saturating_sub(1);
		if let Some(sim) = self.simulation.as_mut() {
			if self.drag.active == 0 {
				sim.set_alpha_target(0.0);
			}
			sim.unpin(idx);
		}
	}

	#[cfg(test)]
	pub fn is_dragging(&self) -> bool {
		self.drag.node_idx.is_some()
	}

	/// Shows the tooltip for `node` at the pointer, or removes it.
	pub fn hover(&mut self, node: Option<usize>, x: f64, y: f64) {
		if node == self.hover {
			return;
		}
		self.hover = node;
		self.tooltip = match (node, self.snapshot.as_ref()) {
			(Some(idx), Some(snapshot)) => snapshot
				.nodes()
				.get(idx)
				.map(|n| Tooltip::for_node(n, x, y)),
			_ => None,
		};
	}

	/// Audience-weighted filtering is not implemented yet.
	pub fn filter_by_audience(&mut self, audience: &str) {
		debug!("filter_by_audience({audience}) is not implemented");
	}

	/// Path highlighting is not implemented yet.
	pub fn highlight_path(&mut self, path_nodes: &[String]) {
		debug!("highlight_path({} nodes) is not implemented", path_nodes.len());
	}
}
