use std::path::PathBuf;

use chrono::Local;
use modelprobe_store::{
    export_all_configs, export_file_name, export_keys_and_urls, export_model_mappings,
    export_models, write_export, ExportKind, StoreError,
};
use serde::Serialize;

use super::config::{open_store, report_store_error};
use crate::commands::ExportCommand;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{ExportArgs, OutputArgs};

#[derive(Serialize)]
struct Written {
    path: PathBuf,
}

pub async fn export_cmd(what: ExportCommand) -> i32 {
    match what {
        ExportCommand::Mappings {
            provider,
            export,
            output,
            config,
        } => {
            let store = match open_store(&config, &output).await {
                Ok(s) => s,
                Err(code) => return code,
            };
            let contents = export_model_mappings(&store, &provider)
                .await
                .and_then(|m| to_json(&m));
            finish(ExportKind::ModelMappings, Some(&provider), contents, &export, &output).await
        }
        ExportCommand::Models {
            provider,
            mapped,
            export,
            output,
            config,
        } => {
            let store = match open_store(&config, &output).await {
                Ok(s) => s,
                Err(code) => return code,
            };
            let kind = if mapped {
                ExportKind::MappedModels
            } else {
                ExportKind::SupportedModels
            };
            let contents = export_models(&store, &provider, mapped)
                .await
                .map(|models| models.join(","));
            finish(kind, Some(&provider), contents, &export, &output).await
        }
        ExportCommand::Keys {
            export,
            output,
            config,
        } => {
            let store = match open_store(&config, &output).await {
                Ok(s) => s,
                Err(code) => return code,
            };
            let contents = export_keys_and_urls(&store).await.and_then(|k| to_json(&k));
            finish(ExportKind::KeysAndUrls, None, contents, &export, &output).await
        }
        ExportCommand::All {
            export,
            output,
            config,
        } => {
            let store = match open_store(&config, &output).await {
                Ok(s) => s,
                Err(code) => return code,
            };
            let contents = export_all_configs(&store).await.and_then(|c| to_json(&c));
            finish(ExportKind::AllConfigs, None, contents, &export, &output).await
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Prints the export, or writes it under `--dir` and prints the path.
async fn finish(
    kind: ExportKind,
    provider: Option<&str>,
    contents: Result<String, StoreError>,
    export: &ExportArgs,
    output: &OutputArgs,
) -> i32 {
    let contents = match contents {
        Ok(c) => c,
        Err(e) => return report_store_error(&e, output),
    };
    let Some(dir) = &export.dir else {
        println!("{contents}");
        return exit_codes::SUCCESS;
    };
    let file_name = export_file_name(kind, provider, Local::now());
    match write_export(dir, &file_name, &contents).await {
        Ok(path) => {
            match output.format {
                OutputFormat::Text if !output.quiet => println!("Exported to {}", path.display()),
                _ => print_result(output.format, output.quiet, &Written { path }),
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_codes::RUNTIME_ERROR
        }
    }
}
