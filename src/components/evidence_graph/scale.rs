//! Color scales for PROMPT scores and relationship kinds.

use std::fmt;

use super::types::{EvidenceNode, NodeKind};

/// Opacity applied to evidence nodes so they read lighter than claims.
pub const EVIDENCE_OPACITY: f64 = 0.7;

/// Red → yellow → green diverging scheme, 11 stops.
const RD_YL_GN: [[f64; 3]; 11] = [
	[165.0, 0.0, 38.0],
	[215.0, 48.0, 39.0],
	[244.0, 109.0, 67.0],
	[253.0, 174.0, 97.0],
	[254.0, 224.0, 139.0],
	[255.0, 255.0, 191.0],
	[217.0, 239.0, 139.0],
	[166.0, 217.0, 106.0],
	[102.0, 189.0, 99.0],
	[26.0, 152.0, 80.0],
	[0.0, 104.0, 55.0],
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Rgba {
	/// Hue in degrees within (-180, 180], so the red end of the scale sits
	/// just below zero instead of wrapping to 360.
	#[cfg(test)]
	pub fn hue(&self) -> f64 {
		let (r, g, b) = (self.r as f64, self.g as f64, self.b as f64);
		let (max, min) = (r.max(g).max(b), r.min(g).min(b));
		if max == min {
			return 0.0;
		}
		let d = max - min;
		if max == r {
			60.0 * ((g - b) / d)
		} else if max == g {
			60.0 * (2.0 + (b - r) / d)
		} else {
			60.0 * (4.0 + (r - g) / d)
		}
	}
}

impl fmt::Display for Rgba {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
	let (t2, t3) = (t1 * t1, t1 * t1 * t1);
	((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
		+ (4.0 - 6.0 * t2 + 3.0 * t3) * v1
		+ (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
		+ t3 * v3)
		/ 6.0
}

/// Uniform B-spline through `values`, sampled at `t` in [0, 1].
fn interpolate_basis(values: &[f64], t: f64) -> f64 {
	let n = values.len() - 1;
	let (t, i) = if t <= 0.0 {
		(0.0, 0)
	} else if t >= 1.0 {
		(1.0, n - 1)
	} else {
		(t, (t * n as f64).floor() as usize)
	};
	let (v1, v2) = (values[i], values[i + 1]);
	let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
	let v3 = if i < n - 1 { values[i + 2] } else { 2.0 * v2 - v1 };
	basis((t - i as f64 / n as f64) * n as f64, v0, v1, v2, v3)
}

fn channel(index: usize, t: f64) -> u8 {
	let values: Vec<f64> = RD_YL_GN.iter().map(|c| c[index]).collect();
	interpolate_basis(&values, t).round().clamp(0.0, 255.0) as u8
}

/// Maps a PROMPT score in [0, 100] onto the red-yellow-green scale.
///
/// Scores outside the domain are clamped; NaN maps to the red end.
pub fn score_to_color(score: f64, opacity: f64) -> Rgba {
	let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) };
	let t = score / 100.0;
	Rgba {
		r: channel(0, t),
		g: channel(1, t),
		b: channel(2, t),
		a: opacity,
	}
}

pub fn node_color(node: &EvidenceNode) -> Rgba {
	match node.kind() {
		NodeKind::Claim => score_to_color(node.prompt_score, 1.0),
		NodeKind::Evidence => score_to_color(node.prompt_score, EVIDENCE_OPACITY),
	}
}

pub fn relationship_color(kind: &str) -> &'static str {
	match kind {
		"supports" => "#28a745",
		"contradicts" => "#dc3545",
		"contextualizes" => "#6c757d",
		_ => "#999",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scale_endpoints_match_scheme() {
		let low = score_to_color(0.0, 1.0);
		assert_eq!((low.r, low.g, low.b), (165, 0, 38));
		let high = score_to_color(100.0, 1.0);
		assert_eq!((high.r, high.g, high.b), (0, 104, 55));
		let mid = score_to_color(50.0, 1.0);
		assert!(mid.r > 240 && mid.g > 240, "midpoint should be yellow: {mid}");
	}

	#[test]
	fn greener_as_score_rises() {
		let mut prev = f64::MIN;
		for score in 0..=100 {
			let hue = score_to_color(score as f64, 1.0).hue();
			assert!(hue >= prev, "hue fell at score {score}: {hue} < {prev}");
			prev = hue;
		}
	}

	#[test]
	fn opacity_is_passed_through_exactly() {
		for &opacity in &[0.0, 0.25, 0.7, 1.0] {
			assert_eq!(score_to_color(42.0, opacity).a, opacity);
		}
	}

	#[test]
	fn out_of_range_scores_are_clamped() {
		assert_eq!(score_to_color(-20.0, 1.0), score_to_color(0.0, 1.0));
		assert_eq!(score_to_color(140.0, 1.0), score_to_color(100.0, 1.0));
		assert_eq!(score_to_color(f64::NAN, 1.0), score_to_color(0.0, 1.0));
	}

	#[test]
	fn css_form() {
		assert_eq!(score_to_color(0.0, 0.7).to_string(), "rgba(165, 0, 38, 0.7)");
	}

	#[test]
	fn relationship_palette() {
		assert_eq!(relationship_color("supports"), "#28a745");
		assert_eq!(relationship_color("contradicts"), "#dc3545");
		assert_eq!(relationship_color("contextualizes"), "#6c757d");
		assert_eq!(relationship_color("refutes"), "#999");
		assert_eq!(relationship_color(""), "#999");
	}
}
