use std::collections::BTreeMap;

use modelprobe_core::types::mask_key;
use modelprobe_core::{ApiType, ProviderConfig};
use modelprobe_store::ProviderStore;
use serde::Serialize;

use super::config::{load_provider, open_store, parse_pairs, report_store_error};
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{ConfigArgs, OutputArgs, ProviderFieldArgs};

#[derive(Serialize)]
struct ProviderSummary {
    name: String,
    api_type: ApiType,
    base_url: String,
    models: usize,
    mappings: usize,
}

#[derive(Serialize)]
struct Changed<'a> {
    provider: &'a str,
    action: &'static str,
}

pub async fn list_cmd(output: OutputArgs, config: ConfigArgs) -> i32 {
    let store = match open_store(&config, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    let providers = match store.all().await {
        Ok(p) => p,
        Err(e) => return report_store_error(&e, &output),
    };
    let summaries: Vec<ProviderSummary> = providers
        .into_iter()
        .map(|p| ProviderSummary {
            models: p.supported_models.len(),
            mappings: p.model_mappings.len(),
            name: p.name,
            api_type: p.api_type,
            base_url: p.base_url,
        })
        .collect();

    match output.format {
        OutputFormat::Text if !output.quiet => {
            if summaries.is_empty() {
                println!("No providers configured in {}.", config.config.display());
            }
            for s in &summaries {
                println!(
                    "{:<24} {:<18} {}  ({} models, {} mappings)",
                    s.name, s.api_type, s.base_url, s.models, s.mappings
                );
            }
        }
        _ => print_result(output.format, output.quiet, &summaries),
    }
    exit_codes::SUCCESS
}

pub async fn show_cmd(name: &str, reveal_keys: bool, output: OutputArgs, config: ConfigArgs) -> i32 {
    let store = match open_store(&config, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    let mut provider = match load_provider(&store, name, &output).await {
        Ok(p) => p,
        Err(code) => return code,
    };
    if !reveal_keys {
        provider.api_keys = provider.api_keys.iter().map(|k| mask_key(k)).collect();
    }
    print_result(output.format, output.quiet, &provider);
    exit_codes::SUCCESS
}

pub async fn add_cmd(
    name: &str,
    api_type: ApiType,
    fields: ProviderFieldArgs,
    output: OutputArgs,
    config: ConfigArgs,
) -> i32 {
    let store = match open_store(&config, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    let mut provider = ProviderConfig::new(name, api_type, fields.base_url.clone().unwrap_or_default());
    if let Err(code) = apply_fields(&mut provider, &fields, &output) {
        return code;
    }
    if let Err(e) = store.add(provider).await {
        return report_store_error(&e, &output);
    }
    announce(name, "added", &output);
    exit_codes::SUCCESS
}

pub async fn update_cmd(
    name: &str,
    rename: Option<String>,
    api_type: Option<ApiType>,
    fields: ProviderFieldArgs,
    output: OutputArgs,
    config: ConfigArgs,
) -> i32 {
    let store = match open_store(&config, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    let mut provider = match load_provider(&store, name, &output).await {
        Ok(p) => p,
        Err(code) => return code,
    };
    if let Some(new_name) = rename {
        provider.name = new_name;
    }
    if let Some(t) = api_type {
        provider.api_type = t;
    }
    if let Some(url) = &fields.base_url {
        provider.base_url = url.clone();
    }
    if let Err(code) = apply_fields(&mut provider, &fields, &output) {
        return code;
    }
    let new_name = provider.name.clone();
    if let Err(e) = store.update(name, provider).await {
        return report_store_error(&e, &output);
    }
    announce(&new_name, "updated", &output);
    exit_codes::SUCCESS
}

pub async fn remove_cmd(name: &str, output: OutputArgs, config: ConfigArgs) -> i32 {
    let store = match open_store(&config, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    if let Err(e) = store.delete(name).await {
        return report_store_error(&e, &output);
    }
    announce(name, "removed", &output);
    exit_codes::SUCCESS
}

/// Non-empty list flags replace the stored values.
fn apply_fields(
    provider: &mut ProviderConfig,
    fields: &ProviderFieldArgs,
    output: &OutputArgs,
) -> Result<(), i32> {
    let parse = |items: &[String], flag: &str| -> Result<BTreeMap<String, String>, i32> {
        parse_pairs(items, flag).map_err(|msg| {
            print_error(output.format, output.quiet, &msg);
            exit_codes::VALIDATION_FAILED
        })
    };
    if !fields.api_keys.is_empty() {
        provider.api_keys = fields.api_keys.clone();
    }
    if !fields.models.is_empty() {
        provider.supported_models = fields.models.clone();
    }
    if !fields.mappings.is_empty() {
        provider.model_mappings = parse(&fields.mappings, "map")?;
    }
    if !fields.headers.is_empty() {
        provider.custom_headers = parse(&fields.headers, "header")?;
    }
    Ok(())
}

fn announce(provider: &str, action: &'static str, output: &OutputArgs) {
    match output.format {
        OutputFormat::Text if !output.quiet => println!("Provider {provider} {action}."),
        _ => print_result(output.format, output.quiet, &Changed { provider, action }),
    }
}
