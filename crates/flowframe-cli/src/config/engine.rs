//! Workflow engine configuration.

use anyhow::Context;
use clap::Args;
use flowframe_runtime::engine::EngineConfig;

/// Command-line limits for the workflow engine.
#[derive(Debug, Clone, Args)]
pub struct EngineArgs {
    /// Maximum number of steps executing at once
    #[arg(long, env = "MAX_CONCURRENT_STEPS", default_value_t = 16)]
    pub max_concurrent_steps: usize,

    /// Maximum number of nodes accepted in one workflow
    #[arg(long, env = "MAX_WORKFLOW_NODES", default_value_t = 50)]
    pub max_nodes: usize,
}

impl EngineArgs {
    /// Builds and validates the engine configuration.
    pub fn to_config(&self) -> anyhow::Result<EngineConfig> {
        EngineConfig::builder()
            .max_concurrent_steps(self.max_concurrent_steps)
            .max_nodes(self.max_nodes)
            .build()
            .context("invalid engine configuration")
    }
}
