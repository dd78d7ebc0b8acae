use super::layout::Simulation;
use super::scale::{Rgba, node_color, relationship_color, score_to_color};
use super::types::{GraphSnapshot, NodeKind, RelationshipKind};

pub const CLAIM_RADIUS: f64 = 20.0;
pub const EVIDENCE_RADIUS: f64 = 15.0;
pub const NODE_STROKE_WIDTH: f64 = 2.0;
pub const LABEL_OFFSET_Y: f64 = -25.0;
pub const LABEL_FONT_PX: f64 = 10.0;
pub const LABEL_COLOR: &str = "#333";
pub const BADGE_RADIUS: f64 = 8.0;
pub const BADGE_OFFSET: (f64, f64) = (15.0, -15.0);
pub const BADGE_TEXT_OFFSET_Y: f64 = 3.0;
pub const BADGE_FONT_PX: f64 = 8.0;
pub const STROKE_PER_WEIGHT: f64 = 3.0;

/// Arrowhead drawn at the target end of a link, in marker units.
///
/// The triangle `M0,-5L10,0L0,5` spans 10 units and is drawn `size` stroke
/// widths wide; `ref_x` is the unit placed on the link endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowMarker {
	pub kind: RelationshipKind,
	pub color: &'static str,
	pub ref_x: f64,
	pub size: f64,
}

impl ArrowMarker {
	pub fn for_kind(kind: RelationshipKind) -> Self {
		Self {
			kind,
			color: relationship_color(kind.as_str()),
			ref_x: 20.0,
			size: 6.0,
		}
	}
}

pub fn default_markers() -> Vec<ArrowMarker> {
	RelationshipKind::ALL
		.iter()
		.map(|&kind| ArrowMarker::for_kind(kind))
		.collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Badge {
	pub text: String,
	pub fill: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeGlyph {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub fill: Rgba,
	pub label: String,
	pub badge: Badge,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkLine {
	pub source: usize,
	pub target: usize,
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub stroke: &'static str,
	pub stroke_width: f64,
	pub stroke_opacity: f64,
	pub marker: RelationshipKind,
}

/// Everything drawn for one snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub nodes: Vec<NodeGlyph>,
	pub links: Vec<LinkLine>,
}

impl Scene {
	/// `edges` holds the resolved `(source, target)` indices of
	/// `snapshot.links`, in the same order.
	pub fn build(snapshot: &GraphSnapshot, edges: &[(usize, usize)]) -> Self {
		let links = snapshot
			.links
			.iter()
			.zip(edges)
			.map(|(link, &(source, target))| LinkLine {
				source,
				target,
				x1: 0.0,
				y1: 0.0,
				x2: 0.0,
				y2: 0.0,
				stroke: relationship_color(link.relationship.as_str()),
				stroke_width: link.weight.abs() * STROKE_PER_WEIGHT,
				stroke_opacity: link.confidence,
				marker: link.relationship,
			})
			.collect();

		let nodes = snapshot
			.nodes()
			.iter()
			.map(|node| NodeGlyph {
				x: 0.0,
				y: 0.0,
				radius: match node.kind() {
					NodeKind::Claim => CLAIM_RADIUS,
					NodeKind::Evidence => EVIDENCE_RADIUS,
				},
				fill: node_color(node),
				label: node.label.clone(),
				badge: Badge {
					text: format!("{}", node.prompt_score.round() as i64),
					fill: score_to_color(node.prompt_score, 1.0),
				},
			})
			.collect();

		Self { nodes, links }
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty()
	}

	/// Copies layout positions onto the glyphs and link endpoints.
	pub fn sync_positions(&mut self, sim: &Simulation) {
		for (i, glyph) in self.nodes.iter_mut().enumerate() {
			if let Some((x, y)) = sim.position(i) {
				glyph.x = x;
				glyph.y = y;
			}
		}
		for line in &mut self.links {
			let (s, t) = (&self.nodes[line.source], &self.nodes[line.target]);
			line.x1 = s.x;
			line.y1 = s.y;
			line.x2 = t.x;
			line.y2 = t.y;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::layout::resolve_links;
	use super::super::scale::EVIDENCE_OPACITY;
	use super::super::types::fixtures::scored_snapshot;
	use super::*;

	fn scored_scene() -> Scene {
		let snapshot = scored_snapshot();
		let edges = resolve_links(&snapshot).unwrap();
		Scene::build(&snapshot, &edges)
	}

	#[test]
	fn one_marker_per_relationship_kind() {
		let markers = default_markers();
		let kinds: Vec<_> = markers.iter().map(|m| m.kind).collect();
		assert_eq!(kinds, RelationshipKind::ALL);
		assert_eq!(markers[1].color, "#dc3545");
		assert!(markers.iter().all(|m| m.ref_x == 20.0 && m.size == 6.0));
	}

	#[test]
	fn links_take_style_from_weight_and_confidence() {
		let scene = scored_scene();
		assert_eq!(scene.links.len(), 1);
		let line = &scene.links[0];
		assert!((line.stroke_width - 1.5).abs() < 1e-12);
		assert_eq!(line.stroke_opacity, 0.8);
		assert_eq!(line.stroke, "#28a745");
		assert_eq!(line.marker, RelationshipKind::Supports);
	}

	#[test]
	fn glyphs_reflect_kind_and_score() {
		let scene = scored_scene();
		assert_eq!(scene.nodes.len(), 3);
		let badges: Vec<_> = scene.nodes.iter().map(|n| n.badge.text.as_str()).collect();
		assert_eq!(badges, ["10", "90", "50"]);

		let (claim, evidence) = (&scene.nodes[0], &scene.nodes[2]);
		assert_eq!(claim.radius, CLAIM_RADIUS);
		assert_eq!(claim.fill.a, 1.0);
		assert_eq!(evidence.radius, EVIDENCE_RADIUS);
		assert_eq!(evidence.fill.a, EVIDENCE_OPACITY);
		assert_eq!(evidence.badge.fill.a, 1.0);
	}

	#[test]
	fn positions_follow_the_layout() {
		let snapshot = scored_snapshot();
		let edges = resolve_links(&snapshot).unwrap();
		let mut scene = Scene::build(&snapshot, &edges);
		let mut sim = Simulation::new(&snapshot, 800.0, 600.0).unwrap();
		sim.tick();
		scene.sync_positions(&sim);

		let (x, y) = sim.position(1).unwrap();
		assert_eq!((scene.nodes[1].x, scene.nodes[1].y), (x, y));
		let line = &scene.links[0];
		assert_eq!((line.x1, line.y1), sim.position(0).unwrap());
		assert_eq!((line.x2, line.y2), (x, y));
	}
}
