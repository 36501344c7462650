use async_trait::async_trait;
use modelprobe_core::ProviderConfig;

use crate::store::types::{ModelLocation, StoreError};

#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// Provider names in insertion order.
    async fn list_names(&self) -> Result<Vec<String>, StoreError>;

    async fn get(&self, name: &str) -> Result<Option<ProviderConfig>, StoreError>;

    async fn all(&self) -> Result<Vec<ProviderConfig>, StoreError>;

    /// Fails with `Duplicate` if the name is taken.
    async fn add(&self, provider: ProviderConfig) -> Result<(), StoreError>;

    /// Replaces the definition stored under `name`. A rename must not collide
    /// with another provider.
    async fn update(&self, name: &str, provider: ProviderConfig) -> Result<(), StoreError>;

    async fn delete(&self, name: &str) -> Result<(), StoreError>;

    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.get(name).await?.is_some())
    }

    /// Providers serving `model`, matched against supported model ids and
    /// mapping names.
    async fn find_model(&self, model: &str) -> Result<Vec<ModelLocation>, StoreError> {
        let mut out = Vec::new();
        for p in self.all().await? {
            let api_key = p.primary_key().unwrap_or_default().to_string();
            if p.supported_models.iter().any(|m| m == model) {
                out.push(ModelLocation {
                    provider_name: p.name.clone(),
                    base_url: p.base_url.clone(),
                    api_key: api_key.clone(),
                    actual_model_name: model.to_string(),
                    custom_headers: p.custom_headers.clone(),
                });
            }
            if let Some(actual) = p.model_mappings.get(model) {
                out.push(ModelLocation {
                    provider_name: p.name.clone(),
                    base_url: p.base_url.clone(),
                    api_key,
                    actual_model_name: actual.clone(),
                    custom_headers: p.custom_headers.clone(),
                });
            }
        }
        Ok(out)
    }
}
