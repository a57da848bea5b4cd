//! Step contract, payload types and built-in steps.
//!
//! A step is the atomic unit of provisioning work. The registry holds one
//! shared instance per type name, and the engine calls
//! [`WorkflowStep::execute`] once per node, passing the node's own
//! [`StepParams`] and the outputs of its predecessors in declared order.

use std::sync::Arc;

pub mod builtin;
mod data;
mod error;
mod params;
mod retry;

pub use data::{CreatedResource, DataMetadata, ResourceKind, WorkflowData};
pub use error::{StepError, StepResult};
pub use params::StepParams;
pub use retry::RetryPolicy;

/// Tracing target for step execution.
pub(crate) const TRACING_TARGET: &str = "flowframe_runtime::step";

/// A unit of provisioning work.
///
/// Implementations are shared across concurrent runs and must not keep
/// per-invocation state. Retrying transient failures and bounding latency are
/// the step's job; the engine neither retries nor times out.
#[async_trait::async_trait]
pub trait WorkflowStep: Send + Sync {
    /// Stable type name used for registry lookup and diagnostics.
    fn name(&self) -> &str;

    /// Runs the step.
    ///
    /// `inputs` holds the outputs of the node's predecessors in the order
    /// they were declared. A terminal failure must be returned as an error,
    /// never swallowed.
    async fn execute(
        &self,
        params: &StepParams,
        inputs: &[Arc<WorkflowData>],
    ) -> StepResult<WorkflowData>;
}
