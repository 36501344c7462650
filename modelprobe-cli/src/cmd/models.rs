use std::time::Duration;

use modelprobe_core::Handbook;
use modelprobe_exec::{discover_models, DiscoveryError, ReqwestHttpClient};
use modelprobe_store::ProviderStore;
use serde::Serialize;

use super::config::{load_provider, open_store, report_store_error};
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{ConfigArgs, OutputArgs};

#[derive(Serialize)]
struct ModelEntry {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mapped_name: Option<String>,
}

pub async fn models_cmd(
    provider_name: &str,
    fetch: bool,
    save: bool,
    timeout_secs: f64,
    output: OutputArgs,
    config: ConfigArgs,
) -> i32 {
    let store = match open_store(&config, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    let mut provider = match load_provider(&store, provider_name, &output).await {
        Ok(p) => p,
        Err(code) => return code,
    };

    let entries: Vec<ModelEntry> = if fetch {
        let timeout = match Duration::try_from_secs_f64(timeout_secs) {
            Ok(d) if !d.is_zero() => d,
            _ => {
                print_error(
                    output.format,
                    output.quiet,
                    "--timeout must be a positive number of seconds",
                );
                return exit_codes::VALIDATION_FAILED;
            }
        };
        let http = match ReqwestHttpClient::new() {
            Ok(c) => c,
            Err(e) => {
                print_error(output.format, output.quiet, &e.to_string());
                return exit_codes::RUNTIME_ERROR;
            }
        };
        let found = match discover_models(&http, &Handbook, &provider, timeout).await {
            Ok(m) => m,
            Err(e) => {
                print_error(output.format, output.quiet, &e.to_string());
                return match e {
                    DiscoveryError::Config(_) => exit_codes::VALIDATION_FAILED,
                    _ => exit_codes::RUNTIME_ERROR,
                };
            }
        };
        if save {
            provider.supported_models = found.iter().map(|m| m.id.clone()).collect();
            if let Err(e) = store.update(provider_name, provider.clone()).await {
                return report_store_error(&e, &output);
            }
        }
        found
            .into_iter()
            .map(|m| ModelEntry {
                mapped_name: provider.friendly_name_for(&m.id).map(String::from),
                id: m.id,
                category: m.owned_by,
            })
            .collect()
    } else {
        provider
            .supported_models
            .iter()
            .map(|id| ModelEntry {
                id: id.clone(),
                category: None,
                mapped_name: provider.friendly_name_for(id).map(String::from),
            })
            .collect()
    };

    match output.format {
        OutputFormat::Text if !output.quiet => {
            if entries.is_empty() {
                println!("No models configured for {provider_name}; try --fetch.");
            }
            for e in &entries {
                let mut line = e.id.clone();
                if let Some(name) = &e.mapped_name {
                    line.push_str(&format!("  (as {name})"));
                }
                if let Some(category) = &e.category {
                    line.push_str(&format!("  [{category}]"));
                }
                println!("{line}");
            }
            if save {
                println!("Saved {} models to {provider_name}.", entries.len());
            }
        }
        _ => print_result(output.format, output.quiet, &entries),
    }
    exit_codes::SUCCESS
}
