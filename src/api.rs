//! GraphQL client for investigation claims and evidence.
//!
//! Requests go out through the browser's `fetch`; responses are decoded
//! with serde.

use log::debug;
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::components::evidence_graph::{GraphLink, InvestigationData};
use crate::error::GraphError;

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
	message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
	data: Option<T>,
	#[serde(default)]
	errors: Vec<GraphQlErrorEntry>,
}

#[derive(Clone, Debug)]
pub struct GraphQlClient {
	endpoint: String,
}

impl GraphQlClient {
	pub fn new(endpoint: &str) -> Self {
		Self {
			endpoint: endpoint.to_string(),
		}
	}

	/// Claims and evidence of one investigation, each with PROMPT scores.
	pub fn investigation_query(investigation_id: &str) -> String {
		// A JSON string literal is also a valid GraphQL string literal.
		let id = serde_json::Value::String(investigation_id.to_string()).to_string();
		format!(
			r#"query {{
  claims(investigationId: {id}) {{
    id
    text
    claimType
    promptScores {{ overall provenance methodology }}
  }}
  evidenceList(investigationId: {id}) {{
    id
    title
    evidenceType
    promptScores {{ overall provenance methodology }}
  }}
}}"#
		)
	}

	pub fn request_body(investigation_id: &str) -> String {
		serde_json::json!({ "query": Self::investigation_query(investigation_id) }).to_string()
	}

	pub async fn fetch_investigation(
		&self,
		investigation_id: &str,
	) -> Result<InvestigationData, GraphError> {
		let body = self.post(&Self::request_body(investigation_id)).await?;
		decode_response(&body)
	}

	/// Relationship retrieval lives in a separate service that is not
	/// wired up yet, so every investigation currently has no links.
	pub async fn load_relationships(
		&self,
		investigation_id: &str,
		claim_ids: &[String],
	) -> Result<Vec<GraphLink>, GraphError> {
		debug!(
			"No relationship source for investigation {investigation_id} ({} claims)",
			claim_ids.len()
		);
		Ok(Vec::new())
	}

	async fn post(&self, body: &str) -> Result<String, GraphError> {
		let fetch_err = |e: JsValue| GraphError::Fetch(format!("{:?}", e));

		let headers = Headers::new().map_err(fetch_err)?;
		headers
			.set("Content-Type", "application/json")
			.map_err(fetch_err)?;

		let opts = RequestInit::new();
		opts.set_method("POST");
		opts.set_headers(&headers);
		opts.set_body(&JsValue::from_str(body));

		let request = Request::new_with_str_and_init(&self.endpoint, &opts).map_err(fetch_err)?;
		let window = web_sys::window().ok_or_else(|| GraphError::Fetch("no window".into()))?;
		let resp: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(fetch_err)?
			.dyn_into()
			.map_err(|_| GraphError::Fetch("response is not a Response".into()))?;

		if !resp.ok() {
			return Err(GraphError::Http(resp.status()));
		}

		let text = JsFuture::from(resp.text().map_err(fetch_err)?)
			.await
			.map_err(fetch_err)?;
		text.as_string()
			.ok_or_else(|| GraphError::Decode("response body is not text".into()))
	}
}

/// Decodes a `{data: {claims, evidenceList}}` body.
pub fn decode_response(body: &str) -> Result<InvestigationData, GraphError> {
	let response: GraphQlResponse<InvestigationData> = serde_json::from_str(body)?;
	if !response.errors.is_empty() {
		return Err(GraphError::Query(
			response.errors.into_iter().map(|e| e.message).collect(),
		));
	}
	response
		.data
		.ok_or_else(|| GraphError::Decode("response carried no data".into()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_embeds_an_escaped_id_in_both_fields() {
		let query = GraphQlClient::investigation_query(r#"inv "7""#);
		assert_eq!(query.matches(r#"investigationId: "inv \"7\"""#).count(), 2);
		assert!(query.contains("promptScores { overall provenance methodology }"));
	}

	#[test]
	fn body_wraps_query() {
		let body: serde_json::Value =
			serde_json::from_str(&GraphQlClient::request_body("inv-1")).unwrap();
		let query = body["query"].as_str().unwrap();
		assert!(query.contains(r#"claims(investigationId: "inv-1")"#));
	}

	#[test]
	fn decodes_claims_and_evidence() {
		let body = r#"{"data": {
			"claims": [{"id": "c1", "text": "t", "claimType": "causal",
			            "promptScores": {"overall": 71.5, "provenance": 60, "methodology": null}}],
			"evidenceList": [{"id": "e1", "title": "Survey", "evidenceType": "study",
			                  "promptScores": {"overall": 40}}]
		}}"#;
		let data = decode_response(body).unwrap();
		assert_eq!(data.claims.len(), 1);
		assert_eq!(data.claims[0].prompt_scores.overall, 71.5);
		assert_eq!(data.claims[0].prompt_scores.methodology, None);
		assert_eq!(data.evidence_list[0].evidence_type.as_deref(), Some("study"));
	}

	#[test]
	fn empty_lists_decode() {
		let data = decode_response(r#"{"data": {"claims": [], "evidenceList": []}}"#).unwrap();
		assert!(data.claims.is_empty() && data.evidence_list.is_empty());
	}

	#[test]
	fn service_errors_are_reported() {
		let err = decode_response(r#"{"data": null, "errors": [{"message": "unknown investigation"}]}"#)
			.unwrap_err();
		assert_eq!(err, GraphError::Query(vec!["unknown investigation".into()]));
	}

	#[test]
	fn missing_data_and_bad_json_fail() {
		assert!(matches!(decode_response("{}"), Err(GraphError::Decode(_))));
		assert!(matches!(decode_response("<html>"), Err(GraphError::Decode(_))));
	}
}
