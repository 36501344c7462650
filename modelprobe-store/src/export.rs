//! Export views over the stored provider definitions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use modelprobe_core::ProviderConfig;
use serde::Serialize;

use crate::json::write_atomic;
use crate::store::{ProviderStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    ModelMappings,
    SupportedModels,
    MappedModels,
    KeysAndUrls,
    AllConfigs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeysAndUrl {
    pub name: String,
    pub base_url: String,
    pub api_keys: Vec<String>,
}

async fn require(store: &dyn ProviderStore, name: &str) -> Result<ProviderConfig, StoreError> {
    store
        .get(name)
        .await?
        .ok_or_else(|| StoreError::NotFound(name.to_string()))
}

pub async fn export_model_mappings(
    store: &dyn ProviderStore,
    name: &str,
) -> Result<BTreeMap<String, String>, StoreError> {
    Ok(require(store, name).await?.model_mappings)
}

/// Supported model ids, or the mapping names when `use_mappings` is set.
pub async fn export_models(
    store: &dyn ProviderStore,
    name: &str,
    use_mappings: bool,
) -> Result<Vec<String>, StoreError> {
    let p = require(store, name).await?;
    Ok(if use_mappings {
        p.model_mappings.into_keys().collect()
    } else {
        p.supported_models
    })
}

pub async fn export_keys_and_urls(store: &dyn ProviderStore) -> Result<Vec<KeysAndUrl>, StoreError> {
    Ok(store
        .all()
        .await?
        .into_iter()
        .map(|p| KeysAndUrl {
            name: p.name,
            base_url: p.base_url,
            api_keys: p.api_keys,
        })
        .collect())
}

pub async fn export_all_configs(store: &dyn ProviderStore) -> Result<Vec<ProviderConfig>, StoreError> {
    store.all().await
}

/// File name used when an export is written to disk.
pub fn export_file_name(kind: ExportKind, provider: Option<&str>, now: DateTime<Local>) -> String {
    let provider = provider.unwrap_or("all");
    match kind {
        ExportKind::ModelMappings => format!("{provider}_model_mappings.json"),
        ExportKind::SupportedModels => format!("{provider}_supported_models.txt"),
        ExportKind::MappedModels => format!("{provider}_mapped_models.txt"),
        ExportKind::KeysAndUrls => "api_keys_and_urls.json".to_string(),
        ExportKind::AllConfigs => {
            format!("all_provider_configs_{}.json", now.format("%Y%m%d_%H%M%S"))
        }
    }
}

pub async fn write_export(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, StoreError> {
    let path = dir.join(file_name);
    write_atomic(&path, contents.as_bytes()).await?;
    Ok(path)
}
