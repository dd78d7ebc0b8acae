//! Error type shared by the query client, layout and host entry point.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures surfaced by the evidence graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
	/// The host asked to mount into an element id that does not exist.
	#[error("container element `{0}` not found")]
	ContainerNotFound(String),

	/// The request could not be issued or the body could not be read.
	#[error("fetch failed: {0}")]
	Fetch(String),

	/// The query endpoint answered with a non-success status.
	#[error("query endpoint returned HTTP {0}")]
	Http(u16),

	/// The response body did not match the expected shape.
	#[error("malformed response: {0}")]
	Decode(String),

	/// The query service reported errors instead of data.
	#[error("query failed: {}", .0.join("; "))]
	Query(Vec<String>),

	/// A link refers to a node id that is not part of the snapshot.
	#[error("link {source_id} -> {target_id} references a node not in the graph")]
	UnresolvedLink {
		/// Source id as given by the link.
		source_id: String,
		/// Target id as given by the link.
		target_id: String,
	},

	/// Host-supplied options could not be decoded.
	#[error("invalid options: {0}")]
	Options(String),
}

impl From<serde_json::Error> for GraphError {
	fn from(e: serde_json::Error) -> Self {
		GraphError::Decode(e.to_string())
	}
}

impl From<GraphError> for JsValue {
	fn from(e: GraphError) -> Self {
		js_sys::Error::new(&e.to_string()).into()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_errors_are_joined() {
		let err = GraphError::Query(vec!["bad id".into(), "timeout".into()]);
		assert_eq!(err.to_string(), "query failed: bad id; timeout");
	}

	#[test]
	fn unresolved_link_names_both_ends() {
		let err = GraphError::UnresolvedLink {
			source_id: "c1".into(),
			target_id: "missing".into(),
		};
		assert_eq!(
			err.to_string(),
			"link c1 -> missing references a node not in the graph"
		);
	}
}
