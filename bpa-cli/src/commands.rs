use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse and validate a scenario document (JSON, YAML, or `.txt` layout)
    Validate {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Manage stored scenarios
    Scenario {
        #[command(subcommand)]
        command: ScenarioCommand,
    },
    /// Manage named values shared by every template step
    Variable {
        #[command(subcommand)]
        command: VariableCommand,
    },
    /// Run a scenario and wait for its result; Ctrl-C cancels the run
    Run {
        #[arg(required_unless_present = "file")]
        scenario_id: Option<String>,
        /// Run a scenario document directly instead of a stored scenario
        #[arg(long, conflicts_with = "scenario_id")]
        file: Option<PathBuf>,
        /// Also print engine events as JSON lines on stdout
        #[arg(long)]
        events: bool,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Show a finished execution
    Result {
        execution_id: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// List executions of a scenario, most recent first
    History {
        scenario_id: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    Migrate {
        #[command(flatten)]
        store: StoreArgs,
        #[arg(long, default_value_t = 5)]
        max_connections: u32,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check the configured store, template and document directories, browser and AI backend
    Doctor {
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        engine: EngineArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum ScenarioCommand {
    Create {
        path: PathBuf,
        #[arg(long, default_value = "cli")]
        owner: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Create a scenario from a text document (`Scenario name:` / `Steps:` layout)
    Import {
        document: PathBuf,
        #[arg(long, default_value = "cli")]
        owner: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    List {
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    Show {
        id: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Apply a partial update (JSON or YAML) to a scenario
    Update {
        id: String,
        patch: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    Delete {
        id: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum VariableCommand {
    Create {
        name: String,
        value: String,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// List variables, newest first
    List {
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    Show {
        name: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    Update {
        name: String,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    Delete {
        name: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
}
