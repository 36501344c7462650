use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, Violation};

/// Wire dialect spoken by a provider; selects the endpoint paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiType {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "google-vertex-ai")]
    GoogleVertexAi,
    #[serde(rename = "azure-openai")]
    AzureOpenAi,
    #[serde(rename = "groq")]
    Groq,
    #[serde(rename = "deepseek")]
    Deepseek,
    #[serde(rename = "custom", other)]
    Custom,
}

impl ApiType {
    pub const ALL: [ApiType; 7] = [
        ApiType::OpenAi,
        ApiType::Anthropic,
        ApiType::GoogleVertexAi,
        ApiType::AzureOpenAi,
        ApiType::Groq,
        ApiType::Deepseek,
        ApiType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiType::OpenAi => "openai",
            ApiType::Anthropic => "anthropic",
            ApiType::GoogleVertexAi => "google-vertex-ai",
            ApiType::AzureOpenAi => "azure-openai",
            ApiType::Groq => "groq",
            ApiType::Deepseek => "deepseek",
            ApiType::Custom => "custom",
        }
    }

    /// Path (relative to the base URL) of the completion endpoint for `model`.
    pub fn completion_path(&self, model: &str) -> String {
        match self {
            ApiType::Anthropic => "/v1/messages".to_string(),
            ApiType::GoogleVertexAi => {
                format!("/v1/models/{}:predict", urlencoding::encode(model))
            }
            _ => "/v1/chat/completions".to_string(),
        }
    }

    /// Path and query of the model listing endpoint.
    pub fn models_path(&self) -> &'static str {
        match self {
            ApiType::AzureOpenAi => "/openai/deployments?api-version=2023-05-15",
            _ => "/v1/models",
        }
    }
}

impl std::fmt::Display for ApiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for ApiType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApiType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = ApiType::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown api type {s:?} (expected one of: {})", known.join(", "))
            })
    }
}

/// One named provider definition as persisted by the configuration store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    pub api_type: ApiType,
    #[serde(default)]
    pub base_url: String,
    pub api_keys: Vec<String>,
    #[serde(default)]
    pub supported_models: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub model_mappings: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_headers: BTreeMap<String, String>,
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, api_type: ApiType, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_type,
            base_url: base_url.into(),
            api_keys: Vec::new(),
            supported_models: Vec::new(),
            model_mappings: BTreeMap::new(),
            custom_headers: BTreeMap::new(),
        }
    }

    /// The key used for test requests (the first configured one).
    pub fn primary_key(&self) -> Option<&str> {
        self.api_keys.first().map(String::as_str)
    }

    /// Maps a friendly name to the provider's model id; ids pass through.
    pub fn resolve_model<'a>(&'a self, name: &'a str) -> &'a str {
        self.model_mappings
            .get(name)
            .map(String::as_str)
            .unwrap_or(name)
    }

    /// Friendly name whose mapping points at `model_id`, if any.
    pub fn friendly_name_for(&self, model_id: &str) -> Option<&str> {
        self.model_mappings
            .iter()
            .find(|(_, id)| id.as_str() == model_id)
            .map(|(name, _)| name.as_str())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        if self.name.trim().is_empty() {
            violations.push(Violation::new("name", "must not be empty"));
        }
        if self.api_keys.is_empty() {
            violations.push(Violation::new("api_keys", "at least one API key is required"));
        }
        if self.api_keys.iter().any(|k| k.trim().is_empty()) {
            violations.push(Violation::new("api_keys", "API keys must not be blank"));
        }
        if !self.base_url.is_empty()
            && url::Url::parse(&with_scheme(&self.base_url)).is_err()
        {
            violations.push(Violation::new("base_url", "not a valid URL"));
        }
        for (friendly, actual) in &self.model_mappings {
            if actual.trim().is_empty() {
                violations.push(Violation::new(
                    format!("model_mappings.{friendly}"),
                    "actual model id must not be empty",
                ));
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

/// Base URLs without a scheme are treated as https.
pub(crate) fn with_scheme(base_url: &str) -> String {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        base_url.to_string()
    } else {
        format!("https://{base_url}")
    }
}
