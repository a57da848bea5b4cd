//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types for ergonomic imports:
//!
//! ```rust
//! use flowframe_runtime::prelude::*;
//! ```

pub use crate::engine::{Engine, EngineConfig, ExecutionResult, NodeFailure};
pub use crate::error::{WorkflowError, WorkflowResult};
pub use crate::graph::{Edge, Node, NodeId, WorkflowDefinition, WorkflowGraph};
pub use crate::registry::{RegistryCell, StepRegistry};
pub use crate::step::{StepError, StepParams, StepResult, WorkflowData, WorkflowStep};
