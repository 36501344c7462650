use modelprobe_core::types::mask_key;
use modelprobe_store::{ModelLocation, ProviderStore};

use super::config::{open_store, report_store_error};
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{ConfigArgs, OutputArgs};

pub async fn find_model_cmd(name: &str, output: OutputArgs, config: ConfigArgs) -> i32 {
    let store = match open_store(&config, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    let found: Vec<ModelLocation> = match store.find_model(name).await {
        Ok(f) => f
            .into_iter()
            .map(|mut loc| {
                loc.api_key = mask_key(&loc.api_key);
                loc
            })
            .collect(),
        Err(e) => return report_store_error(&e, &output),
    };

    if found.is_empty() {
        print_error(
            output.format,
            output.quiet,
            &format!("no provider serves model {name:?}"),
        );
        return exit_codes::VALIDATION_FAILED;
    }

    match output.format {
        OutputFormat::Text if !output.quiet => {
            for loc in &found {
                println!(
                    "{}  {}  model={}  key={}",
                    loc.provider_name, loc.base_url, loc.actual_model_name, loc.api_key
                );
                for (k, v) in &loc.custom_headers {
                    println!("    {k}: {v}");
                }
            }
        }
        _ => print_result(output.format, output.quiet, &found),
    }
    exit_codes::SUCCESS
}
