#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;
mod telemetry;

use std::io::{self, Write};
use std::process;

use anyhow::Context;
use flowframe_client::reqwest::ReqwestClient;
use flowframe_runtime::engine::Engine;
use flowframe_runtime::registry::RegistryCell;
use serde::Serialize;

use crate::command::Status;
use crate::config::{Cli, Command};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "flowframe_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "flowframe_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "flowframe_cli::command";

#[tokio::main]
async fn main() {
    let error = match run().await {
        Ok(status) => process::exit(status.exit_code()),
        Err(error) => error,
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %format!("{error:#}"),
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(Status::Failure.exit_code());
}

/// Main application entry point.
async fn run() -> anyhow::Result<Status> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.log_format)?;
    cli.log();

    let engine =
        Engine::new(cli.engine.to_config()?).context("failed to create workflow engine")?;
    let client = ReqwestClient::new(cli.client.clone())
        .context("failed to create cluster client")?
        .into_service();

    // One registry for the lifetime of the process.
    let registry_cell = RegistryCell::new();
    let registry = registry_cell
        .create(client.clone())
        .context("failed to create step registry")?;

    match &cli.command {
        Command::Validate(args) => {
            let workflow = command::load_workflow(&args.workflow).await?;
            let report = command::validate(&workflow, &engine, registry)?;
            print_json(&report)?;
            Ok(Status::Success)
        }
        Command::Provision(args) => {
            let workflow = command::load_workflow(&args.workflow).await?;
            let (result, status) = command::provision(&workflow, &engine, registry).await?;
            print_json(&result)?;
            Ok(status)
        }
        Command::Steps => {
            print_json(&registry.step_types())?;
            Ok(Status::Success)
        }
        Command::Health => {
            let health = client
                .health_check()
                .await
                .context("cluster health check failed")?;
            print_json(&health)?;
            Ok(if health.is_operational() {
                Status::Success
            } else {
                Status::Failure
            })
        }
    }
}

/// Writes a value to stdout as pretty-printed JSON.
fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to serialize output")?;
    writeln!(stdout).context("failed to write output")?;
    Ok(())
}
