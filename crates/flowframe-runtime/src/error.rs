//! Workflow error types.

use thiserror::Error;

use crate::graph::NodeId;
use crate::step::StepError;

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The registry was already created in this holder.
    #[error("step registry was already created")]
    AlreadyInitialized,

    /// The registry was requested before it was created.
    #[error("step registry has not been created yet")]
    NotInitialized,

    /// A step type is not bound in the registry.
    #[error(
        "unknown step type '{step_type}'{}",
        .node_id.as_ref().map(|id| format!(" on node {id}")).unwrap_or_default()
    )]
    UnknownStepType {
        /// Node declaring the type, when known.
        node_id: Option<NodeId>,
        /// The unresolved type name.
        step_type: String,
    },

    /// Two nodes share an id.
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    /// A node lists a predecessor that is not part of the graph.
    #[error("node {node_id} depends on missing node {missing}")]
    DanglingReference {
        /// Node holding the reference.
        node_id: NodeId,
        /// The referenced id that does not exist.
        missing: NodeId,
    },

    /// The predecessor relation contains a cycle.
    #[error("cyclic dependency involving node {node_id}")]
    CyclicDependency {
        /// One member of the cycle.
        node_id: NodeId,
    },

    /// The graph exceeds the engine's node limit.
    #[error("workflow has {count} nodes, the limit is {max}")]
    TooManyNodes {
        /// Number of nodes in the graph.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The engine configuration is unusable.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// A step started and failed.
    #[error("node {node_id} ({step_type}) failed: {source}")]
    StepFailed {
        /// ID of the failed node.
        node_id: NodeId,
        /// Type of the failed step.
        step_type: String,
        /// The step's reported cause.
        #[source]
        source: StepError,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WorkflowError {
    /// Returns whether the error was raised before any step ran.
    ///
    /// Only errors for which this returns `false` may have left external side
    /// effects behind.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownStepType { .. }
                | Self::DuplicateNode(_)
                | Self::DanglingReference { .. }
                | Self::CyclicDependency { .. }
                | Self::TooManyNodes { .. }
                | Self::InvalidConfig(_)
                | Self::Serialization(_)
        )
    }

    /// Returns the node the error is attributed to, if any.
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::UnknownStepType { node_id, .. } => node_id.as_ref(),
            Self::DuplicateNode(node_id)
            | Self::DanglingReference { node_id, .. }
            | Self::CyclicDependency { node_id }
            | Self::StepFailed { node_id, .. } => Some(node_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_step_type_mentions_node_when_known() {
        let err = WorkflowError::UnknownStepType {
            node_id: None,
            step_type: "create_model".into(),
        };
        assert_eq!(err.to_string(), "unknown step type 'create_model'");

        let err = WorkflowError::UnknownStepType {
            node_id: Some("deploy".into()),
            step_type: "create_model".into(),
        };
        assert_eq!(
            err.to_string(),
            "unknown step type 'create_model' on node deploy"
        );
        assert_eq!(err.node_id(), Some(&NodeId::from("deploy")));
    }

    #[test]
    fn validation_errors_are_distinguished_from_step_failures() {
        assert!(
            WorkflowError::CyclicDependency {
                node_id: "a".into()
            }
            .is_validation()
        );

        let failed = WorkflowError::StepFailed {
            node_id: "a".into(),
            step_type: "create_index".into(),
            source: StepError::Failed("boom".into()),
        };
        assert!(!failed.is_validation());
        assert_eq!(failed.to_string(), "node a (create_index) failed: boom");
    }
}
