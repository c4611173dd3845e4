use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pcr",
    about = "Patient care records: run chaincode transactions against a local world state",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Chaincode configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Invoke a chaincode function and commit on success
    Invoke(InvokeArgs),
    /// Dump the world state
    State(StateArgs),
    /// List the chaincode functions and their arguments
    Ops,
    /// Show the effective configuration
    Config,
}

#[derive(Args)]
pub struct InvokeArgs {
    /// Function name, e.g. createRecord
    pub function: String,
    /// Positional arguments
    pub args: Vec<String>,
    /// World state file; created on first successful write
    #[arg(short, long, default_value = "world-state.json")]
    pub state: PathBuf,
    /// Creator credential presented to the role gate
    #[arg(long)]
    pub creator: Option<String>,
}

#[derive(Args)]
pub struct StateArgs {
    #[arg(short, long, default_value = "world-state.json")]
    pub state: PathBuf,
    /// Only show keys starting with this prefix
    #[arg(long)]
    pub prefix: Option<String>,
}
