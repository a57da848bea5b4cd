//! Execution results.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use jiff::Timestamp;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::error::{WorkflowError, WorkflowResult};
use crate::graph::NodeId;
use crate::step::{StepError, WorkflowData};

/// Outputs of the nodes that finished, keyed by node ID.
pub type NodeOutputs = BTreeMap<NodeId, Arc<WorkflowData>>;

/// A node that started and failed.
#[derive(Debug, Serialize)]
pub struct NodeFailure {
    /// ID of the failed node.
    pub node_id: NodeId,
    /// Type of the failed step.
    pub step_type: String,
    /// Reported cause.
    #[serde(serialize_with = "serialize_display")]
    pub error: StepError,
}

impl NodeFailure {
    /// Converts the failure into a [`WorkflowError::StepFailed`].
    pub fn into_error(self) -> WorkflowError {
        WorkflowError::StepFailed {
            node_id: self.node_id,
            step_type: self.step_type,
            source: self.error,
        }
    }
}

fn serialize_display<S: Serializer>(error: &StepError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// A run in which every node produced output.
#[derive(Debug, Serialize)]
pub struct CompletedRun {
    /// Unique run ID.
    pub run_id: Uuid,
    /// When execution started.
    pub started_at: Timestamp,
    /// When the last node finished.
    pub finished_at: Timestamp,
    /// Output of every node.
    pub outputs: NodeOutputs,
}

/// A run that stopped after a node failed.
///
/// Nodes running when the failure was observed were allowed to finish; their
/// outputs and failures are reported here. Nothing is rolled back.
#[derive(Debug, Serialize)]
pub struct FailedRun {
    /// Unique run ID.
    pub run_id: Uuid,
    /// When execution started.
    pub started_at: Timestamp,
    /// When the last in-flight node finished.
    pub finished_at: Timestamp,
    /// The first failure observed.
    pub failure: NodeFailure,
    /// Failures of nodes that were already running at that point.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_failures: Vec<NodeFailure>,
    /// Outputs of the nodes that finished.
    pub outputs: NodeOutputs,
    /// Nodes that never started.
    pub not_attempted: BTreeSet<NodeId>,
}

/// Terminal outcome of a workflow run.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// Every node produced output.
    Completed(CompletedRun),
    /// A node failed.
    Failed(FailedRun),
}

impl ExecutionResult {
    /// Returns whether every node produced output.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Returns `"completed"` or `"failed"`.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
        }
    }

    /// Returns the run ID.
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::Completed(run) => run.run_id,
            Self::Failed(run) => run.run_id,
        }
    }

    /// Returns the outputs of the nodes that finished.
    pub fn outputs(&self) -> &NodeOutputs {
        match self {
            Self::Completed(run) => &run.outputs,
            Self::Failed(run) => &run.outputs,
        }
    }

    /// Returns the output of one node.
    pub fn output(&self, node_id: &NodeId) -> Option<&Arc<WorkflowData>> {
        self.outputs().get(node_id)
    }

    /// Returns the first failure, if the run failed.
    pub fn failure(&self) -> Option<&NodeFailure> {
        match self {
            Self::Completed(_) => None,
            Self::Failed(run) => Some(&run.failure),
        }
    }

    /// Returns the outputs of a completed run, or the first failure as
    /// [`WorkflowError::StepFailed`].
    pub fn into_result(self) -> WorkflowResult<NodeOutputs> {
        match self {
            Self::Completed(run) => Ok(run.outputs),
            Self::Failed(run) => Err(run.failure.into_error()),
        }
    }
}
