use std::collections::BTreeMap;
use std::path::PathBuf;

use modelprobe_core::ValidationError;
use serde::Serialize;

/// A provider that serves a looked-up model, with the id to send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelLocation {
    pub provider_name: String,
    pub base_url: String,
    pub api_key: String,
    pub actual_model_name: String,
    pub custom_headers: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("provider file {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize providers: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("provider {0:?} does not exist")]
    NotFound(String),
    #[error("provider {0:?} already exists")]
    Duplicate(String),
    #[error("invalid provider definition: {0}")]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
