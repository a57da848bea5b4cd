//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── client: ReqwestConfig   # Cluster URL, timeout, basic auth
//! ├── engine: EngineArgs      # Step concurrency, node limit
//! ├── log_format: LogFormat   # text | json
//! └── command: Command        # validate | provision | steps | health
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

mod engine;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
pub use engine::EngineArgs;
use flowframe_client::reqwest::ReqwestConfig;

use crate::TRACING_TARGET_CONFIG;
use crate::telemetry::LogFormat;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "flowframe")]
#[command(about = "Provision search cluster resources from workflow templates")]
#[command(version)]
pub struct Cli {
    /// Cluster connection configuration.
    #[clap(flatten)]
    pub client: ReqwestConfig,

    /// Workflow engine limits.
    #[clap(flatten)]
    pub engine: EngineArgs,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Checks a workflow template without running any step.
    Validate(WorkflowArgs),
    /// Creates the resources described by a workflow template.
    Provision(WorkflowArgs),
    /// Lists the registered step types.
    Steps,
    /// Checks that the cluster is reachable.
    Health,
}

/// Arguments of the commands that take a workflow template.
#[derive(Debug, Clone, Args)]
pub struct WorkflowArgs {
    /// Path of the workflow template (JSON).
    #[arg(short, long, env = "FLOWFRAME_WORKFLOW")]
    pub workflow: PathBuf,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so values from it
    /// act as environment defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            cluster_url = %self.client.url,
            http_timeout_secs = self.client.http_timeout,
            basic_auth = self.client.username.is_some(),
            max_concurrent_steps = self.engine.max_concurrent_steps,
            max_nodes = self.engine.max_nodes,
            "Configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
