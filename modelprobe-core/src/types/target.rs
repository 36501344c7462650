use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use url::Url;

use crate::error::ConfigError;
use crate::types::provider::{with_scheme, ProviderConfig};
use crate::types::run_config::RunConfig;

const ENV_PREFIX: &str = "env:";

/// API key held out of `Debug` output. Values of the form `env:NAME` are
/// resolved from the environment when the key is built.
#[derive(Clone)]
pub struct ApiKey(Arc<SecretString>);

impl ApiKey {
    pub fn resolve(raw: &str) -> Result<Self, ConfigError> {
        let value = match raw.strip_prefix(ENV_PREFIX) {
            Some(var) => std::env::var(var.trim())
                .map_err(|_| ConfigError::MissingEnvKey(var.trim().to_string()))?,
            None => raw.to_string(),
        };
        Ok(Self(Arc::new(SecretString::from(value))))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Masks a raw key for display. `env:` references are shown as-is.
pub fn mask_key(raw: &str) -> String {
    if raw.starts_with(ENV_PREFIX) {
        return raw.to_string();
    }
    let head: String = raw.chars().take(4).collect();
    format!("{head}…({} chars)", raw.chars().count())
}

/// Everything needed to probe one target. Read-only to the executor.
#[derive(Debug, Clone)]
pub struct TargetSpec {
    pub target_id: String,
    pub provider_name: String,
    pub category: Option<String>,
    pub endpoint: Url,
    pub api_key: Option<ApiKey>,
    pub headers: BTreeMap<String, String>,
    pub request_timeout: Duration,
    pub body: JsonValue,
}

impl TargetSpec {
    /// Builds the probe for `model_id` served by `provider`.
    pub fn for_model(
        provider: &ProviderConfig,
        model_id: &str,
        category: Option<String>,
        config: &RunConfig,
    ) -> Result<Self, ConfigError> {
        let raw_key = provider
            .primary_key()
            .ok_or_else(|| ConfigError::MissingApiKey(provider.name.clone()))?;
        let api_key = ApiKey::resolve(raw_key)?;
        let endpoint = endpoint_url(
            &provider.base_url,
            &provider.api_type.completion_path(model_id),
        )?;
        Ok(Self {
            target_id: model_id.to_string(),
            provider_name: provider.name.clone(),
            category,
            endpoint,
            api_key: Some(api_key),
            headers: provider.custom_headers.clone(),
            request_timeout: config.request_timeout,
            body: config.request_template.render(model_id),
        })
    }

    /// Full header set sent with each attempt. Custom headers win.
    pub fn request_headers(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        if let Some(key) = &self.api_key {
            out.insert(
                "Authorization".to_string(),
                format!("Bearer {}", key.expose()),
            );
        }
        out.insert("Content-Type".to_string(), "application/json".to_string());
        for (k, v) in &self.headers {
            out.retain(|existing: &String, _| !existing.eq_ignore_ascii_case(k));
            out.insert(k.clone(), v.clone());
        }
        out
    }
}

/// Joins a provider base URL and an endpoint path, keeping any base path.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url, ConfigError> {
    if base_url.trim().is_empty() {
        return Err(ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: "base URL is empty".to_string(),
        });
    }
    let base = with_scheme(base_url.trim());
    let joined = format!("{}{}", base.trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::provider::ApiType;

    fn provider() -> ProviderConfig {
        let mut p = ProviderConfig::new("acme", ApiType::OpenAi, "api.acme.test/openai/");
        p.api_keys.push("sk-test-123456".to_string());
        p.custom_headers
            .insert("content-type".to_string(), "application/json; charset=utf-8".to_string());
        p
    }

    #[test]
    fn builds_endpoint_and_body() {
        let spec = TargetSpec::for_model(&provider(), "gpt-4o", None, &RunConfig::default()).unwrap();
        assert_eq!(
            spec.endpoint.as_str(),
            "https://api.acme.test/openai/v1/chat/completions"
        );
        assert_eq!(spec.body["model"], "gpt-4o");
        assert_eq!(spec.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn custom_headers_override_defaults_case_insensitively() {
        let spec = TargetSpec::for_model(&provider(), "m", None, &RunConfig::default()).unwrap();
        let headers = spec.request_headers();
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer sk-test-123456");
        assert!(!headers.contains_key("Content-Type"));
        assert_eq!(
            headers.get("content-type").unwrap(),
            "application/json; charset=utf-8"
        );
    }

    #[test]
    fn missing_key_is_an_error() {
        let mut p = provider();
        p.api_keys.clear();
        let err = TargetSpec::for_model(&p, "m", None, &RunConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(_)));
    }

    #[test]
    fn debug_output_never_contains_key() {
        let spec = TargetSpec::for_model(&provider(), "m", None, &RunConfig::default()).unwrap();
        let dbg = format!("{spec:?}");
        assert!(!dbg.contains("sk-test-123456"));
    }

    #[test]
    fn masked_key_keeps_prefix() {
        assert_eq!(mask_key("sk-abcdef"), "sk-a…(9 chars)");
        assert_eq!(mask_key("env:OPENAI_KEY"), "env:OPENAI_KEY");
    }
}
