use chrono::{Local, TimeZone};
use modelprobe_core::{ApiType, ProviderConfig};
use modelprobe_store::{
    export_file_name, export_keys_and_urls, export_model_mappings, export_models, write_export,
    ExportKind, JsonFileStore, ProviderStore, StoreError,
};
use tempfile::TempDir;

async fn seeded(dir: &TempDir) -> JsonFileStore {
    let store = JsonFileStore::open(dir.path().join("p.json")).await.unwrap();
    let mut p = ProviderConfig::new("volc", ApiType::Custom, "https://ark.example.com/api/v3");
    p.api_keys = vec!["k1".to_string(), "k2".to_string()];
    p.supported_models = vec!["ep-1".to_string(), "ep-2".to_string()];
    p.model_mappings
        .insert("Doubao-pro-32k".to_string(), "ep-1".to_string());
    store.add(p).await.unwrap();
    store
}

#[tokio::test]
async fn exports_models_and_mappings() {
    let dir = TempDir::new().unwrap();
    let store = seeded(&dir).await;

    let models = export_models(&store, "volc", false).await.unwrap();
    assert_eq!(models.join(","), "ep-1,ep-2");
    let mapped = export_models(&store, "volc", true).await.unwrap();
    assert_eq!(mapped, vec!["Doubao-pro-32k"]);

    let mappings = export_model_mappings(&store, "volc").await.unwrap();
    assert_eq!(mappings.get("Doubao-pro-32k").unwrap(), "ep-1");

    assert!(matches!(
        export_models(&store, "missing", false).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn exports_keys_of_every_provider() {
    let dir = TempDir::new().unwrap();
    let store = seeded(&dir).await;
    let keys = export_keys_and_urls(&store).await.unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].api_keys, vec!["k1", "k2"]);
    assert_eq!(keys[0].base_url, "https://ark.example.com/api/v3");
    assert_eq!(store.all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn export_files_are_written_under_dir() {
    let dir = TempDir::new().unwrap();
    let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    let name = export_file_name(ExportKind::AllConfigs, None, now);
    assert_eq!(name, "all_provider_configs_20240309_140507.json");
    assert_eq!(
        export_file_name(ExportKind::MappedModels, Some("volc"), now),
        "volc_mapped_models.txt"
    );

    let path = write_export(&dir.path().join("exports"), &name, "[]").await.unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
}
