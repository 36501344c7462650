//! Lists the models a provider serves.

use std::collections::BTreeMap;
use std::time::Duration;

use modelprobe_core::types::{endpoint_url, ApiKey};
use modelprobe_core::{Classification, ConfigError, ErrorClassifier, ProviderConfig};
use serde::Deserialize;

use crate::http::{HttpClient, HttpError, HttpRequestParts, MAX_RESPONSE_BYTES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredModel {
    pub id: String,
    /// Reported owner; used as the report category.
    pub owned_by: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("model listing failed with HTTP {status} ({}): {}", .classification.category, .classification.remedy)]
    Http {
        status: u16,
        classification: Classification,
        body: String,
    },
    #[error("model listing failed ({}): {source}", .classification.category)]
    Transport {
        classification: Classification,
        #[source]
        source: HttpError,
    },
    #[error("unexpected model listing format: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    owned_by: Option<String>,
}

/// Fetches the provider's model list, sorted by id without duplicates.
pub async fn discover_models(
    http: &dyn HttpClient,
    classifier: &dyn ErrorClassifier,
    provider: &ProviderConfig,
    timeout: Duration,
) -> Result<Vec<DiscoveredModel>, DiscoveryError> {
    let url = endpoint_url(&provider.base_url, provider.api_type.models_path())?;
    let raw_key = provider
        .primary_key()
        .ok_or_else(|| ConfigError::MissingApiKey(provider.name.clone()))?;
    let key = ApiKey::resolve(raw_key)?;

    let mut headers = BTreeMap::new();
    headers.insert("Authorization".to_string(), format!("Bearer {}", key.expose()));
    for (k, v) in &provider.custom_headers {
        headers.retain(|existing: &String, _| !existing.eq_ignore_ascii_case(k));
        headers.insert(k.clone(), v.clone());
    }

    tracing::debug!(provider = %provider.name, %url, "fetching model list");
    let req = HttpRequestParts {
        method: "GET".to_string(),
        url,
        headers,
        body: Vec::new(),
    };
    let resp = match http.send(req, timeout, MAX_RESPONSE_BYTES).await {
        Ok(resp) => resp,
        Err(source) => {
            let classification = classifier.classify_transport(source.kind(), &source.to_string());
            return Err(DiscoveryError::Transport {
                classification,
                source,
            });
        }
    };

    let body = resp.body_text();
    if !(200..300).contains(&resp.status) {
        return Err(DiscoveryError::Http {
            status: resp.status,
            classification: classifier.classify_http(resp.status, &body),
            body,
        });
    }

    let list: ModelList =
        serde_json::from_str(&body).map_err(|e| DiscoveryError::Decode(e.to_string()))?;
    let mut models: Vec<DiscoveredModel> = list
        .data
        .into_iter()
        .map(|m| DiscoveredModel {
            id: m.id,
            owned_by: m.owned_by.filter(|o| !o.is_empty()),
        })
        .collect();
    models.sort_by(|a, b| a.id.cmp(&b.id));
    models.dedup_by(|a, b| a.id == b.id);
    Ok(models)
}
