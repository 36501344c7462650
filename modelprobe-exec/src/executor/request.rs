use modelprobe_core::TargetSpec;

use crate::http::HttpRequestParts;

/// The POST sent for every attempt against `spec`.
pub fn build_request(spec: &TargetSpec) -> Result<HttpRequestParts, serde_json::Error> {
    Ok(HttpRequestParts {
        method: "POST".to_string(),
        url: spec.endpoint.clone(),
        headers: spec.request_headers(),
        body: serde_json::to_vec(&spec.body)?,
    })
}
