use leptos::prelude::*;

use super::types::{EvidenceNode, NodeDetail};

/// Offset from the pointer to the tooltip's top-left corner.
pub const POINTER_OFFSET: (f64, f64) = (10.0, -10.0);

#[derive(Clone, Debug, PartialEq)]
pub enum TooltipContent {
	Claim {
		text: String,
		score: i64,
		provenance: Option<f64>,
		methodology: Option<f64>,
	},
	Evidence {
		evidence_type: Option<String>,
		title: String,
		score: i64,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub node_id: String,
	pub left: f64,
	pub top: f64,
	pub content: TooltipContent,
}

impl Tooltip {
	/// Builds the tooltip for `node` with the pointer at (`x`, `y`).
	pub fn for_node(node: &EvidenceNode, x: f64, y: f64) -> Self {
		let score = node.prompt_score.round() as i64;
		let content = match &node.detail {
			NodeDetail::Claim { text, .. } => TooltipContent::Claim {
				text: text.clone(),
				score,
				provenance: node.scores.provenance,
				methodology: node.scores.methodology,
			},
			NodeDetail::Evidence {
				title,
				evidence_type,
			} => TooltipContent::Evidence {
				evidence_type: evidence_type.clone(),
				title: title.clone(),
				score,
			},
		};
		Self {
			node_id: node.id.clone(),
			left: x + POINTER_OFFSET.0,
			top: y + POINTER_OFFSET.1,
			content,
		}
	}
}

fn sub_score(value: Option<f64>) -> String {
	value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".into())
}

/// Floating, non-interactive box describing the hovered node.
#[component]
pub fn TooltipOverlay(tooltip: Tooltip) -> impl IntoView {
	let style = format!(
		"position: absolute; left: {}px; top: {}px; background: rgba(0,0,0,0.8); color: #fff; \
		 padding: 10px; border-radius: 5px; pointer-events: none; z-index: 1000;",
		tooltip.left, tooltip.top
	);

	let body = match tooltip.content {
		TooltipContent::Claim {
			text,
			score,
			provenance,
			methodology,
		} => view! {
			<strong>"Claim"</strong>
			<br />
			{text}
			<br />
			<br />
			<strong>"PROMPT Score:"</strong>
			{format!(" {}/100", score)}
			<br />
			{format!("Provenance: {}", sub_score(provenance))}
			<br />
			{format!("Methodology: {}", sub_score(methodology))}
		}
		.into_any(),
		TooltipContent::Evidence {
			evidence_type,
			title,
			score,
		} => view! {
			<strong>"Evidence:"</strong>
			{format!(" {}", evidence_type.unwrap_or_else(|| "unknown".into()))}
			<br />
			{title}
			<br />
			<br />
			<strong>"PROMPT Score:"</strong>
			{format!(" {}/100", score)}
		}
		.into_any(),
	};

	view! {
		<div class="graph-tooltip" style=style>
			{body}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::fixtures::scored_snapshot;
	use super::*;

	#[test]
	fn claim_tooltip_carries_full_text_and_sub_scores() {
		let snapshot = scored_snapshot();
		let tip = Tooltip::for_node(snapshot.node("claim2").unwrap(), 100.0, 50.0);
		assert_eq!((tip.left, tip.top), (110.0, 40.0));
		assert_eq!(
			tip.content,
			TooltipContent::Claim {
				text: "Hospitalisation fell in 2021".into(),
				score: 90,
				provenance: Some(88.0),
				methodology: Some(91.0),
			}
		);
	}

	#[test]
	fn evidence_tooltip_shows_type_and_title() {
		let snapshot = scored_snapshot();
		let tip = Tooltip::for_node(snapshot.node("ev1").unwrap(), 0.0, 0.0);
		assert_eq!(
			tip.content,
			TooltipContent::Evidence {
				evidence_type: Some("dataset".into()),
				title: "Regional admissions dataset".into(),
				score: 50,
			}
		);
	}

	#[test]
	fn missing_sub_scores_render_as_na() {
		assert_eq!(sub_score(None), "n/a");
		assert_eq!(sub_score(Some(72.0)), "72");
	}
}
