use std::path::{Path, PathBuf};

use async_trait::async_trait;
use modelprobe_core::ProviderConfig;
use tokio::sync::RwLock;

use crate::json::write_atomic;
use crate::store::{ProviderStore, StoreError};

/// Provider definitions persisted as one JSON array. The file is read once
/// on open and rewritten after every mutation.
pub struct JsonFileStore {
    path: PathBuf,
    providers: RwLock<Vec<ProviderConfig>>,
}

impl JsonFileStore {
    /// Opens the store; a missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let providers = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        tracing::debug!(path = %path.display(), count = providers.len(), "loaded providers");
        Ok(Self {
            path,
            providers: RwLock::new(providers),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, providers: &[ProviderConfig]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(providers)?;
        write_atomic(&self.path, &json).await
    }
}

#[async_trait]
impl ProviderStore for JsonFileStore {
    async fn list_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .providers
            .read()
            .await
            .iter()
            .map(|p| p.name.clone())
            .collect())
    }

    async fn get(&self, name: &str) -> Result<Option<ProviderConfig>, StoreError> {
        Ok(self
            .providers
            .read()
            .await
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<ProviderConfig>, StoreError> {
        Ok(self.providers.read().await.clone())
    }

    async fn add(&self, provider: ProviderConfig) -> Result<(), StoreError> {
        provider.validate()?;
        let mut providers = self.providers.write().await;
        if providers.iter().any(|p| p.name == provider.name) {
            return Err(StoreError::Duplicate(provider.name));
        }
        let mut next = providers.clone();
        next.push(provider);
        self.persist(&next).await?;
        *providers = next;
        Ok(())
    }

    async fn update(&self, name: &str, provider: ProviderConfig) -> Result<(), StoreError> {
        provider.validate()?;
        let mut providers = self.providers.write().await;
        let idx = providers
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        if provider.name != name && providers.iter().any(|p| p.name == provider.name) {
            return Err(StoreError::Duplicate(provider.name));
        }
        let mut next = providers.clone();
        next[idx] = provider;
        self.persist(&next).await?;
        *providers = next;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut providers = self.providers.write().await;
        if !providers.iter().any(|p| p.name == name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let next: Vec<ProviderConfig> = providers
            .iter()
            .filter(|p| p.name != name)
            .cloned()
            .collect();
        self.persist(&next).await?;
        *providers = next;
        Ok(())
    }
}
