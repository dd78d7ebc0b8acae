use std::collections::HashMap;

use serde::Deserialize;

const LABEL_MAX_CHARS: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	Claim,
	Evidence,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PromptScores {
	#[serde(default)]
	pub overall: f64,
	#[serde(default)]
	pub provenance: Option<f64>,
	#[serde(default)]
	pub methodology: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeDetail {
	Claim {
		text: String,
		claim_type: Option<String>,
	},
	Evidence {
		title: String,
		evidence_type: Option<String>,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvidenceNode {
	pub id: String,
	pub label: String,
	pub prompt_score: f64,
	pub scores: PromptScores,
	pub detail: NodeDetail,
}

impl EvidenceNode {
	pub fn kind(&self) -> NodeKind {
		match self.detail {
			NodeDetail::Claim { .. } => NodeKind::Claim,
			NodeDetail::Evidence { .. } => NodeKind::Evidence,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
	Supports,
	Contradicts,
	Contextualizes,
	#[serde(other)]
	Unknown,
}

impl RelationshipKind {
	pub const ALL: [RelationshipKind; 3] = [
		RelationshipKind::Supports,
		RelationshipKind::Contradicts,
		RelationshipKind::Contextualizes,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			RelationshipKind::Supports => "supports",
			RelationshipKind::Contradicts => "contradicts",
			RelationshipKind::Contextualizes => "contextualizes",
			RelationshipKind::Unknown => "unknown",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	#[serde(alias = "relationshipType")]
	pub relationship: RelationshipKind,
	pub weight: f64,
	pub confidence: f64,
}

/// Raw claim record as returned by the query service.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
	pub id: String,
	pub text: String,
	#[serde(default)]
	pub claim_type: Option<String>,
	#[serde(default)]
	pub prompt_scores: PromptScores,
}

/// Raw evidence record as returned by the query service.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
	pub id: String,
	pub title: String,
	#[serde(default)]
	pub evidence_type: Option<String>,
	#[serde(default)]
	pub prompt_scores: PromptScores,
}

/// The `data` payload of the investigation query.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationData {
	#[serde(default)]
	pub claims: Vec<ClaimRecord>,
	#[serde(default)]
	pub evidence_list: Vec<EvidenceRecord>,
}

/// All nodes of one investigation plus the ordered links between them.
///
/// Node ids are unique; a record repeating an id replaces the earlier node
/// in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
	nodes: Vec<EvidenceNode>,
	index: HashMap<String, usize>,
	pub links: Vec<GraphLink>,
}

impl GraphSnapshot {
	pub fn from_investigation(data: InvestigationData) -> Self {
		let mut snapshot = Self::default();
		for claim in data.claims {
			snapshot.insert(EvidenceNode {
				label: truncate_label(&claim.text),
				prompt_score: claim.prompt_scores.overall,
				id: claim.id,
				scores: claim.prompt_scores,
				detail: NodeDetail::Claim {
					text: claim.text,
					claim_type: claim.claim_type,
				},
			});
		}
		for evidence in data.evidence_list {
			snapshot.insert(EvidenceNode {
				label: truncate_label(&evidence.title),
				prompt_score: evidence.prompt_scores.overall,
				id: evidence.id,
				scores: evidence.prompt_scores,
				detail: NodeDetail::Evidence {
					title: evidence.title,
					evidence_type: evidence.evidence_type,
				},
			});
		}
		snapshot
	}

	pub fn insert(&mut self, node: EvidenceNode) {
		match self.index.get(&node.id) {
			Some(&i) => self.nodes[i] = node,
			None => {
				self.index.insert(node.id.clone(), self.nodes.len());
				self.nodes.push(node);
			}
		}
	}

	pub fn with_links(mut self, links: Vec<GraphLink>) -> Self {
		self.links = links;
		self
	}

	pub fn nodes(&self) -> &[EvidenceNode] {
		&self.nodes
	}

	#[cfg(test)]
	pub fn node(&self, id: &str) -> Option<&EvidenceNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn claim_ids(&self) -> Vec<String> {
		self.nodes
			.iter()
			.filter(|n| n.kind() == NodeKind::Claim)
			.map(|n| n.id.clone())
			.collect()
	}
}

/// Shortens source text to a node label, marking truncation with `...`.
pub fn truncate_label(text: &str) -> String {
	match text.char_indices().nth(LABEL_MAX_CHARS) {
		Some((cut, _)) => format!("{}...", &text[..cut]),
		None => text.to_string(),
	}
}
