//! Workflow execution engine.
//!
//! This module provides the runtime for executing workflows:
//! - [`Engine`]: validates a graph and runs its nodes in dependency order
//! - [`EngineConfig`]: concurrency and size limits
//! - [`ExecutionResult`]: terminal outcome of one run

mod config;
mod executor;
mod result;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use executor::Engine;
pub use result::{CompletedRun, ExecutionResult, FailedRun, NodeFailure, NodeOutputs};
