//! Force-directed layout for a graph snapshot.
//!
//! Velocity-based integration with a cooling `alpha`, driven one tick per
//! animation frame. Forces: link springs with a rest distance, pairwise
//! many-body charge, recentering, and collision between node disks.

use std::f64::consts::PI;

use crate::error::GraphError;

use super::types::GraphSnapshot;

pub const LINK_DISTANCE: f64 = 100.0;
pub const CHARGE_STRENGTH: f64 = -300.0;
pub const COLLIDE_RADIUS: f64 = 40.0;

const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.4;
const INITIAL_RADIUS: f64 = 10.0;
const DISTANCE_MIN2: f64 = 1.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

#[derive(Clone, Debug)]
struct Spring {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Deterministic generator for breaking ties between coincident nodes.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	fn next(&mut self) -> f64 {
		self.0 = (1664525 * self.0 + 1013904223) % 4294967296;
		self.0 as f64 / 4294967296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// Resolves every link endpoint to a node index.
pub fn resolve_links(snapshot: &GraphSnapshot) -> Result<Vec<(usize, usize)>, GraphError> {
	snapshot
		.links
		.iter()
		.map(|link| {
			match (
				snapshot.index_of(&link.source),
				snapshot.index_of(&link.target),
			) {
				(Some(s), Some(t)) => Ok((s, t)),
				_ => Err(GraphError::UnresolvedLink {
					source_id: link.source.clone(),
					target_id: link.target.clone(),
				}),
			}
		})
		.collect()
}

#[derive(Clone, Debug)]
pub struct Simulation {
	bodies: Vec<Body>,
	springs: Vec<Spring>,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	running: bool,
	random: Lcg,
}

impl Simulation {
	pub fn new(snapshot: &GraphSnapshot, width: f64, height: f64) -> Result<Self, GraphError> {
		let edges = resolve_links(snapshot)?;
		Ok(Self::with_edges(snapshot.nodes().len(), &edges, width, height))
	}

	fn with_edges(count: usize, edges: &[(usize, usize)], width: f64, height: f64) -> Self {
		let center = (width / 2.0, height / 2.0);
		let golden = PI * (3.0 - 5f64.sqrt());
		let bodies = (0..count)
			.map(|i| {
				let (radius, angle) = (INITIAL_RADIUS * (0.5 + i as f64).sqrt(), i as f64 * golden);
				Body {
					x: center.0 + radius * angle.cos(),
					y: center.1 + radius * angle.sin(),
					..Body::default()
				}
			})
			.collect();

		let mut degree = vec![0usize; count];
		for &(s, t) in edges {
			degree[s] += 1;
			degree[t] += 1;
		}
		let springs = edges
			.iter()
			.map(|&(source, target)| Spring {
				source,
				target,
				strength: 1.0 / degree[source].min(degree[target]) as f64,
				bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
			})
			.collect();

		Self {
			bodies,
			springs,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
			running: count > 0,
			random: Lcg(1),
		}
	}

	#[cfg(test)]
	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	/// Resolved `(source, target)` index pairs, in link order.
	pub fn edges(&self) -> Vec<(usize, usize)> {
		self.springs.iter().map(|s| (s.source, s.target)).collect()
	}

	pub fn position(&self, idx: usize) -> Option<(f64, f64)> {
		self.bodies.get(idx).map(|b| (b.x, b.y))
	}

	#[cfg(test)]
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	#[cfg(test)]
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	pub fn restart(&mut self) {
		self.running = !self.bodies.is_empty();
	}

	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = Some(x);
			body.fy = Some(y);
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = None;
			body.fy = None;
		}
	}

	/// Advances one frame. Returns `false` once the layout has cooled.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < ALPHA_MIN {
			self.running = false;
		}
		self.running
	}

	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collide();

		for body in &mut self.bodies {
			match body.fx {
				Some(fx) => {
					body.x = fx;
					body.vx = 0.0;
				}
				None => {
					body.vx *= 1.0 - VELOCITY_DECAY;
					body.x += body.vx;
				}
			}
			match body.fy {
				Some(fy) => {
					body.y = fy;
					body.vy = 0.0;
				}
				None => {
					body.vy *= 1.0 - VELOCITY_DECAY;
					body.y += body.vy;
				}
			}
		}
	}

	fn apply_links(&mut self) {
		for spring in &self.springs {
			let (s, t) = (&self.bodies[spring.source], &self.bodies[spring.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = self.random.jiggle();
			}
			if y == 0.0 {
				y = self.random.jiggle();
			}
			let l = (x * x + y * y).sqrt();
			let l = (l - LINK_DISTANCE) / l * self.alpha * spring.strength;
			let (x, y) = (x * l, y * l);

			let t = &mut self.bodies[spring.target];
			t.vx -= x * spring.bias;
			t.vy -= y * spring.bias;
			let s = &mut self.bodies[spring.source];
			s.vx += x * (1.0 - spring.bias);
			s.vy += y * (1.0 - spring.bias);
		}
	}

	fn apply_charge(&mut self) {
		let n = self.bodies.len();
		for i in 0..n {
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut dx = self.bodies[j].x - self.bodies[i].x;
				let mut dy = self.bodies[j].y - self.bodies[i].y;
				let mut l = dx * dx + dy * dy;
				if dx == 0.0 {
					dx = self.random.jiggle();
					l += dx * dx;
				}
				if dy == 0.0 {
					dy = self.random.jiggle();
					l += dy * dy;
				}
				if l < DISTANCE_MIN2 {
					l = (DISTANCE_MIN2 * l).sqrt();
				}
				dvx += dx * CHARGE_STRENGTH * self.alpha / l;
				dvy += dy * CHARGE_STRENGTH * self.alpha / l;
			}
			self.bodies[i].vx += dvx;
			self.bodies[i].vy += dvy;
		}
	}

	fn apply_center(&mut self) {
		let n = self.bodies.len();
		if n == 0 {
			return;
		}
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let (dx, dy) = (sx / n as f64 - self.center.0, sy / n as f64 - self.center.1);
		for body in &mut self.bodies {
			body.x -= dx;
			body.y -= dy;
		}
	}

	fn apply_collide(&mut self) {
		let n = self.bodies.len();
		let r = COLLIDE_RADIUS * 2.0;
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (&self.bodies[i], &self.bodies[j]);
				let mut x = (a.x + a.vx) - (b.x + b.vx);
				let mut y = (a.y + a.vy) - (b.y + b.vy);
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.random.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.random.jiggle();
					l += y * y;
				}
				let d = l.sqrt();
				let k = (r - d) / d;
				// Equal radii split the correction evenly.
				let (x, y) = (x * k * 0.5, y * k * 0.5);
				self.bodies[i].vx += x;
				self.bodies[i].vy += y;
				self.bodies[j].vx -= x;
				self.bodies[j].vy -= y;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::fixtures::scored_snapshot;
	use super::super::types::{GraphLink, RelationshipKind};
	use super::*;

	fn distance(sim: &Simulation, a: usize, b: usize) -> f64 {
		let ((ax, ay), (bx, by)) = (sim.position(a).unwrap(), sim.position(b).unwrap());
		((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
	}

	fn settle(sim: &mut Simulation) -> usize {
		let mut frames = 0;
		while sim.step() {
			frames += 1;
			assert!(frames < 1000, "layout never cooled");
		}
		frames
	}

	#[test]
	fn unknown_endpoint_fails_loudly() {
		let mut snapshot = scored_snapshot();
		snapshot.links.push(GraphLink {
			source: "claim1".into(),
			target: "ghost".into(),
			relationship: RelationshipKind::Contradicts,
			weight: -1.0,
			confidence: 1.0,
		});
		let err = Simulation::new(&snapshot, 800.0, 600.0).unwrap_err();
		assert_eq!(
			err,
			GraphError::UnresolvedLink {
				source_id: "claim1".into(),
				target_id: "ghost".into(),
			}
		);
	}

	#[test]
	fn cools_down_within_a_few_hundred_frames() {
		let mut sim = Simulation::new(&scored_snapshot(), 800.0, 600.0).unwrap();
		let frames = settle(&mut sim);
		assert!((250..=320).contains(&frames), "took {frames} frames");
		assert!(!sim.is_running());
	}

	#[test]
	fn settled_layout_is_centered_and_non_overlapping() {
		let mut sim = Simulation::new(&scored_snapshot(), 800.0, 600.0).unwrap();
		settle(&mut sim);

		let n = sim.bodies().len() as f64;
		let cx = sim.bodies().iter().map(|b| b.x).sum::<f64>() / n;
		let cy = sim.bodies().iter().map(|b| b.y).sum::<f64>() / n;
		assert!((cx - 400.0).abs() < 1.0 && (cy - 300.0).abs() < 1.0);

		for a in 0..3 {
			for b in (a + 1)..3 {
				assert!(distance(&sim, a, b) > COLLIDE_RADIUS, "{a} and {b} overlap");
			}
		}
	}

	#[test]
	fn pinned_bodies_stay_put() {
		let mut sim = Simulation::new(&scored_snapshot(), 800.0, 600.0).unwrap();
		sim.pin(2, 10.0, 20.0);
		for _ in 0..50 {
			sim.tick();
		}
		assert_eq!(sim.position(2), Some((10.0, 20.0)));
		sim.unpin(2);
		sim.tick();
		assert_ne!(sim.position(2), Some((10.0, 20.0)));
	}

	#[test]
	fn alpha_target_keeps_layout_warm() {
		let mut sim = Simulation::new(&scored_snapshot(), 800.0, 600.0).unwrap();
		settle(&mut sim);
		sim.set_alpha_target(0.3);
		sim.restart();
		for _ in 0..2000 {
			assert!(sim.step());
		}
		assert!((sim.alpha() - 0.3).abs() < 0.01);
		sim.set_alpha_target(0.0);
		settle(&mut sim);
	}

	#[test]
	fn edges_follow_link_order() {
		let sim = Simulation::new(&scored_snapshot(), 800.0, 600.0).unwrap();
		assert_eq!(sim.edges(), resolve_links(&scored_snapshot()).unwrap());
	}

	#[test]
	fn empty_graph_never_runs() {
		let mut sim = Simulation::with_edges(0, &[], 800.0, 600.0);
		assert!(!sim.is_running());
		assert!(!sim.step());
		sim.restart();
		assert!(!sim.is_running());
	}
}
