#![forbid(unsafe_code)]

pub mod export;
pub mod json;
pub mod store;

pub use crate::export::{
    export_all_configs, export_file_name, export_keys_and_urls, export_model_mappings,
    export_models, write_export, ExportKind, KeysAndUrl,
};
pub use crate::json::JsonFileStore;
pub use crate::store::{ModelLocation, ProviderStore, StoreError};
