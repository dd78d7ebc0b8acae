use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::GraphError;

use super::state::DEFAULT_HEIGHT;

pub const DEFAULT_ENDPOINT: &str = "/api/graphql";

/// Options recognised when constructing a graph view.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphOptions {
	/// Surface width in pixels; the container's width when absent.
	pub width: Option<f64>,
	/// Surface height in pixels.
	pub height: Option<f64>,
	/// Query endpoint URL.
	pub endpoint: Option<String>,
}

impl GraphOptions {
	/// Decodes a host-supplied options object; `undefined`/`null` give
	/// the defaults.
	pub fn from_js(value: JsValue) -> Result<Self, GraphError> {
		if value.is_undefined() || value.is_null() {
			return Ok(Self::default());
		}
		serde_wasm_bindgen::from_value(value).map_err(|e| GraphError::Options(e.to_string()))
	}

	pub fn width_or(&self, container_width: f64) -> f64 {
		self.width.unwrap_or(container_width)
	}

	pub fn height(&self) -> f64 {
		self.height.unwrap_or(DEFAULT_HEIGHT)
	}

	pub fn endpoint(&self) -> &str {
		self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn defaults_apply_when_fields_are_missing() {
		let options: GraphOptions = serde_json::from_value(json!({})).unwrap();
		assert_eq!(options.width_or(1024.0), 1024.0);
		assert_eq!(options.height(), 600.0);
		assert_eq!(options.endpoint(), "/api/graphql");
	}

	#[test]
	fn explicit_values_win() {
		let options: GraphOptions = serde_json::from_value(json!({
			"width": 640, "height": 480, "endpoint": "https://example.test/graphql"
		}))
		.unwrap();
		assert_eq!(options.width_or(1024.0), 640.0);
		assert_eq!(options.height(), 480.0);
		assert_eq!(options.endpoint(), "https://example.test/graphql");
	}
}
