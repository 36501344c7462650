use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    /// Provider definitions file.
    #[arg(
        long = "config",
        env = "MODELPROBE_CONFIG",
        default_value = "data/llm_providers.json",
        global = true
    )]
    pub config: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Run settings file (JSON or YAML).
    #[arg(long, env = "MODELPROBE_SETTINGS")]
    pub settings: Option<PathBuf>,
    #[arg(long)]
    pub max_workers: Option<usize>,
    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub request_timeout: Option<f64>,
    #[arg(long)]
    pub max_retries: Option<u32>,
    /// Wall-clock limit for the whole run in seconds.
    #[arg(long, value_name = "SECS")]
    pub global_timeout: Option<f64>,
    /// Status refresh interval in seconds.
    #[arg(long, value_name = "SECS")]
    pub refresh_interval: Option<f64>,
    #[arg(long)]
    pub retry_jitter: bool,
    /// Do not draw the live status view.
    #[arg(long)]
    pub no_monitor: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[arg(long, default_value = "data")]
    pub report_dir: PathBuf,
    #[arg(long)]
    pub no_report: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Write the export into this directory instead of stdout.
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

/// Provider fields shared by `providers add` and `providers update`.
#[derive(Debug, Args, Clone)]
pub struct ProviderFieldArgs {
    #[arg(long)]
    pub base_url: Option<String>,
    /// API key, or `env:NAME` to read it from the environment. Repeatable.
    #[arg(long = "api-key")]
    pub api_keys: Vec<String>,
    #[arg(long = "model")]
    pub models: Vec<String>,
    #[arg(long = "map", value_name = "NAME=ID")]
    pub mappings: Vec<String>,
    #[arg(long = "header", value_name = "NAME=VALUE")]
    pub headers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EventsMode {
    None,
    Stdout,
    Log,
}
