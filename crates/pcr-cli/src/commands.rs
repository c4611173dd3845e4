use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use pcr_chaincode::{ChaincodeConfig, MockLedger, Operation, PatientCare, Response};
use pcr_state::{InMemoryWorldState, SnapshotValue, StateSnapshot};
use tracing::info;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Invoke(args) => cmd_invoke(config, args, &cli.format),
        Command::State(args) => cmd_state(args, &cli.format),
        Command::Ops => cmd_ops(),
        Command::Config => cmd_config(&config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ChaincodeConfig> {
    match path {
        Some(path) => Ok(ChaincodeConfig::load(path)?),
        None => Ok(ChaincodeConfig::default()),
    }
}

/// Run one transaction against the state file, persisting it on success.
pub fn invoke_at(
    config: ChaincodeConfig,
    state: &Path,
    function: &str,
    args: &[String],
    creator: Option<&str>,
) -> anyhow::Result<Response> {
    let snapshot = StateSnapshot::load(state)
        .with_context(|| format!("reading world state {}", state.display()))?;
    let world = InMemoryWorldState::import(snapshot)?;
    let mut ledger = MockLedger::with_world(PatientCare::new(config), world);
    if let Some(creator) = creator {
        ledger.set_creator(creator);
    }

    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let response = ledger.mock_invoke(function, &args);
    if response.is_ok() {
        ledger
            .into_world()
            .export()?
            .save(state)
            .with_context(|| format!("writing world state {}", state.display()))?;
        info!(function, state = %state.display(), "world state saved");
    }
    Ok(response)
}

fn cmd_invoke(
    config: ChaincodeConfig,
    args: InvokeArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let response = invoke_at(
        config,
        &args.state,
        &args.function,
        &args.args,
        args.creator.as_deref(),
    )?;

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "status": response.status,
                "message": response.message,
                "payload": response.payload_str(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text if response.is_ok() => {
            println!("{} {}", "✓".green().bold(), args.function.bold());
            if !response.payload.is_empty() {
                println!("{}", pretty_payload(&response.payload));
            }
        }
        OutputFormat::Text => {
            println!("{} {}", "✗".red().bold(), response.message.red());
        }
    }

    if !response.is_ok() {
        anyhow::bail!("{} failed with status {}", args.function, response.status);
    }
    Ok(())
}

fn cmd_state(args: StateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut snapshot = StateSnapshot::load(&args.state)?;
    if let Some(prefix) = &args.prefix {
        snapshot.entries.retain(|e| e.key.starts_with(prefix.as_str()));
    }

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }
    if snapshot.entries.is_empty() {
        println!("World state is empty.");
        return Ok(());
    }
    for entry in &snapshot.entries {
        let value = match &entry.value {
            SnapshotValue::Text(text) => text.clone(),
            SnapshotValue::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        };
        println!("{}  {}", entry.key.yellow(), value.dimmed());
    }
    println!("{} keys", snapshot.entries.len().to_string().bold());
    Ok(())
}

fn cmd_ops() -> anyhow::Result<()> {
    for op in Operation::ALL {
        let mut flags = Vec::new();
        if op.is_mutating() {
            flags.push("writes");
        }
        if op.is_role_gated() {
            flags.push("role-gated");
        }
        println!(
            "{} {:<28} {}",
            format!("{:<16}", op.name()).bold(),
            op.params().join(" "),
            flags.join(", ").cyan()
        );
    }
    Ok(())
}

fn cmd_config(config: &ChaincodeConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn pretty_payload(payload: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(payload) {
        Ok(value) => serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| String::from_utf8_lossy(payload).into_owned()),
        Err(_) => String::from_utf8_lossy(payload).into_owned(),
    }
}
