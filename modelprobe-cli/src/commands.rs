use clap::Subcommand;
use modelprobe_core::ApiType;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Probe the models of a provider and write a CSV report.
    Test {
        provider: String,
        /// Model id or mapped name; repeatable. Defaults to every known model.
        #[arg(long = "model", short = 'm')]
        models: Vec<String>,
        /// Discover models from the provider even if some are configured.
        #[arg(long)]
        fetch: bool,
        /// Where run events go; repeat or comma-separate to use several.
        #[arg(long, value_enum, value_delimiter = ',')]
        events: Vec<EventsMode>,
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        report: ReportArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// List the models of a provider.
    Models {
        provider: String,
        /// Ask the provider's model listing endpoint.
        #[arg(long)]
        fetch: bool,
        /// Store fetched models as the provider's supported models.
        #[arg(long, requires = "fetch")]
        save: bool,
        #[arg(long, default_value_t = 30.0, value_name = "SECS")]
        timeout: f64,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Manage provider definitions.
    Providers {
        #[command(subcommand)]
        action: ProvidersCommand,
    },
    /// Find the providers serving a model.
    FindModel {
        name: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Export provider data.
    Export {
        #[command(subcommand)]
        what: ExportCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProvidersCommand {
    List {
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    Show {
        name: String,
        /// Print API keys in full.
        #[arg(long)]
        reveal_keys: bool,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    Add {
        name: String,
        #[arg(long)]
        api_type: ApiType,
        #[command(flatten)]
        fields: ProviderFieldArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Replace the given fields of a provider.
    Update {
        name: String,
        #[arg(long)]
        rename: Option<String>,
        #[arg(long)]
        api_type: Option<ApiType>,
        #[command(flatten)]
        fields: ProviderFieldArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    Remove {
        name: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Friendly name to model id mappings of a provider (JSON).
    Mappings {
        provider: String,
        #[command(flatten)]
        export: ExportArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Comma separated model names of a provider.
    Models {
        provider: String,
        /// Export mapped names instead of supported model ids.
        #[arg(long)]
        mapped: bool,
        #[command(flatten)]
        export: ExportArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// API keys and base URLs of every provider (JSON).
    Keys {
        #[command(flatten)]
        export: ExportArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Every provider definition (JSON).
    All {
        #[command(flatten)]
        export: ExportArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
}
