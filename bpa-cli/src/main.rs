use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;
mod utils;

pub use args::*;
use bpa_core::VariablePatch;
use commands::{Command, ScenarioCommand, VariableCommand};

#[derive(Debug, Parser)]
#[command(name = "bpa", version, about = "Business process automation scenario runner")]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

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

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Logs go to stderr so JSON output on stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Validate { path, output } => cmd::validate::validate_cmd(&path, output).await,
        Command::Scenario { command } => match command {
            ScenarioCommand::Create { path, owner, output, store } => {
                cmd::scenario::create_cmd(&path, &owner, output, store).await
            }
            ScenarioCommand::Import { document, owner, output, store } => {
                cmd::scenario::import_cmd(&document, &owner, output, store).await
            }
            ScenarioCommand::List { output, store } => cmd::scenario::list_cmd(output, store).await,
            ScenarioCommand::Show { id, output, store } => {
                cmd::scenario::show_cmd(&id, output, store).await
            }
            ScenarioCommand::Update { id, patch, output, store } => {
                cmd::scenario::update_cmd(&id, &patch, output, store).await
            }
            ScenarioCommand::Delete { id, output, store } => {
                cmd::scenario::delete_cmd(&id, output, store).await
            }
        },
        Command::Variable { command } => match command {
            VariableCommand::Create { name, value, description, output, store } => {
                cmd::variable::create_cmd(&name, &value, description, output, store).await
            }
            VariableCommand::List { output, store } => cmd::variable::list_cmd(output, store).await,
            VariableCommand::Show { name, output, store } => {
                cmd::variable::show_cmd(&name, output, store).await
            }
            VariableCommand::Update { name, value, description, output, store } => {
                let patch = VariablePatch { value, description };
                cmd::variable::update_cmd(&name, patch, output, store).await
            }
            VariableCommand::Delete { name, output, store } => {
                cmd::variable::delete_cmd(&name, output, store).await
            }
        },
        Command::Run {
            scenario_id,
            file,
            events,
            output,
            store,
            engine,
        } => {
            cmd::run::run_cmd(scenario_id.as_deref(), file.as_deref(), events, output, store, engine)
                .await
        }
        Command::Result { execution_id, output, store } => {
            cmd::result::result_cmd(&execution_id, output, store).await
        }
        Command::History { scenario_id, output, store } => {
            cmd::history::history_cmd(&scenario_id, output, store).await
        }
        Command::Migrate {
            store,
            max_connections,
            output,
        } => cmd::migrate::migrate_cmd(store, max_connections, output).await,
        Command::Doctor { store, engine, output } => {
            cmd::doctor::doctor_cmd(store, engine, output).await
        }
    }
}
