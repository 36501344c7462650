use modelprobe_core::ValidationError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_result<T: Serialize>(format: OutputFormat, quiet: bool, result: &T) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{json}");
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(result) {
                println!("{json}");
            }
        }
    }
}

pub fn print_error(format: OutputFormat, quiet: bool, message: &str) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => eprintln!("error: {message}"),
        OutputFormat::Json => {
            let err = serde_json::json!({"error": message});
            eprintln!("{}", serde_json::to_string(&err).unwrap_or_default());
        }
    }
}

pub fn print_violations(format: OutputFormat, quiet: bool, err: &ValidationError) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => {
            eprintln!("error: {err}");
            for v in &err.violations {
                eprintln!("  - {v}");
            }
        }
        OutputFormat::Json => {
            let violations: Vec<_> = err
                .violations
                .iter()
                .map(|v| serde_json::json!({"path": v.path, "message": v.message}))
                .collect();
            let body = serde_json::json!({"error": err.to_string(), "violations": violations});
            eprintln!("{}", serde_json::to_string(&body).unwrap_or_default());
        }
    }
}
