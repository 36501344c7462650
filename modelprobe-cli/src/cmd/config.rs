use std::collections::BTreeMap;
use std::path::Path;

use modelprobe_core::{parse_settings_str, ProviderConfig, RunConfig, RunSettings, SettingsFormat};
use modelprobe_store::{JsonFileStore, ProviderStore, StoreError};

use crate::exit_codes;
use crate::output::{print_error, print_violations};
use crate::{ConfigArgs, OutputArgs, RunArgs};

pub async fn open_store(config: &ConfigArgs, output: &OutputArgs) -> Result<JsonFileStore, i32> {
    JsonFileStore::open(&config.config).await.map_err(|e| {
        print_error(output.format, output.quiet, &e.to_string());
        store_exit_code(&e)
    })
}

pub async fn load_provider(
    store: &JsonFileStore,
    name: &str,
    output: &OutputArgs,
) -> Result<ProviderConfig, i32> {
    match store.get(name).await {
        Ok(Some(p)) => Ok(p),
        Ok(None) => {
            let err = StoreError::NotFound(name.to_string());
            print_error(output.format, output.quiet, &err.to_string());
            Err(exit_codes::VALIDATION_FAILED)
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            Err(store_exit_code(&e))
        }
    }
}

/// Reports a store failure and maps it to an exit code.
pub fn report_store_error(e: &StoreError, output: &OutputArgs) -> i32 {
    match e {
        StoreError::Invalid(v) => print_violations(output.format, output.quiet, v),
        other => print_error(output.format, output.quiet, &other.to_string()),
    }
    store_exit_code(e)
}

fn store_exit_code(e: &StoreError) -> i32 {
    match e {
        StoreError::NotFound(_)
        | StoreError::Duplicate(_)
        | StoreError::Invalid(_)
        | StoreError::Parse { .. } => exit_codes::VALIDATION_FAILED,
        StoreError::Io { .. } | StoreError::Serialize(_) => exit_codes::RUNTIME_ERROR,
    }
}

/// Defaults, overlaid by the settings file, overlaid by flags.
pub fn build_run_config(run: &RunArgs, output: &OutputArgs) -> Result<RunConfig, i32> {
    let file = match &run.settings {
        Some(path) => load_settings(path, output)?,
        None => RunSettings::default(),
    };
    let flags = RunSettings {
        max_workers: run.max_workers,
        request_timeout_secs: run.request_timeout,
        max_retries: run.max_retries,
        global_timeout_secs: run.global_timeout,
        status_refresh_secs: run.refresh_interval,
        request_template: None,
        placeholder_field: None,
    };
    file.apply(RunConfig::default())
        .and_then(|cfg| flags.apply(cfg))
        .map_err(|e| {
            print_violations(output.format, output.quiet, &e);
            exit_codes::VALIDATION_FAILED
        })
}

fn load_settings(path: &Path, output: &OutputArgs) -> Result<RunSettings, i32> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        print_error(
            output.format,
            output.quiet,
            &format!("failed to read {}: {e}", path.display()),
        );
        exit_codes::RUNTIME_ERROR
    })?;
    parse_settings_str(&content, SettingsFormat::Auto).map_err(|e| {
        print_error(
            output.format,
            output.quiet,
            &format!("invalid settings file {}: {e}", path.display()),
        );
        exit_codes::VALIDATION_FAILED
    })
}

/// Parses repeated `KEY=VALUE` flags.
pub fn parse_pairs(items: &[String], flag: &str) -> Result<BTreeMap<String, String>, String> {
    let mut out = BTreeMap::new();
    for item in items {
        let (k, v) = item
            .split_once('=')
            .ok_or_else(|| format!("--{flag} expects KEY=VALUE, got {item:?}"))?;
        let k = k.trim();
        if k.is_empty() {
            return Err(format!("--{flag} has an empty key in {item:?}"));
        }
        out.insert(k.to_string(), v.trim().to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_split_on_first_equals() {
        let pairs = parse_pairs(&["X-Env=a=b".to_string()], "header").unwrap();
        assert_eq!(pairs.get("X-Env").unwrap(), "a=b");
        assert!(parse_pairs(&["novalue".to_string()], "header").is_err());
        assert!(parse_pairs(&["=v".to_string()], "map").is_err());
    }
}
