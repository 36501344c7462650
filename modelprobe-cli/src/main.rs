use clap::Parser;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod logging;
mod output;

pub use args::*;
use commands::{Command, ProvidersCommand};

#[derive(Debug, Parser)]
#[command(name = "modelprobe", version, about = "Probe LLM provider models for availability")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Test {
            provider,
            models,
            fetch,
            events,
            run,
            report,
            output,
            config,
        } => cmd::test::test_cmd(&provider, &models, fetch, &events, run, report, output, config).await,
        Command::Models {
            provider,
            fetch,
            save,
            timeout,
            output,
            config,
        } => cmd::models::models_cmd(&provider, fetch, save, timeout, output, config).await,
        Command::Providers { action } => match action {
            ProvidersCommand::List { output, config } => {
                cmd::providers::list_cmd(output, config).await
            }
            ProvidersCommand::Show {
                name,
                reveal_keys,
                output,
                config,
            } => cmd::providers::show_cmd(&name, reveal_keys, output, config).await,
            ProvidersCommand::Add {
                name,
                api_type,
                fields,
                output,
                config,
            } => cmd::providers::add_cmd(&name, api_type, fields, output, config).await,
            ProvidersCommand::Update {
                name,
                rename,
                api_type,
                fields,
                output,
                config,
            } => {
                cmd::providers::update_cmd(&name, rename, api_type, fields, output, config).await
            }
            ProvidersCommand::Remove {
                name,
                output,
                config,
            } => cmd::providers::remove_cmd(&name, output, config).await,
        },
        Command::FindModel {
            name,
            output,
            config,
        } => cmd::find::find_model_cmd(&name, output, config).await,
        Command::Export { what } => cmd::export::export_cmd(what).await,
    }
}
