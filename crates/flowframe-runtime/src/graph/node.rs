//! Workflow node.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::NodeId;
use crate::step::StepParams;

/// One instantiation of a step within a workflow.
///
/// The order of `previous` is the order in which predecessor outputs are
/// passed to the step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node ID.
    pub id: NodeId,
    /// Registry type name of the step.
    #[serde(rename = "type")]
    pub step_type: String,
    /// Step parameters.
    #[serde(default, skip_serializing_if = "StepParams::is_empty")]
    pub params: StepParams,
    /// Predecessor node IDs, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub previous: Vec<NodeId>,
}

impl Node {
    /// Creates a node without parameters or predecessors.
    pub fn new(id: impl Into<NodeId>, step_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            step_type: step_type.into(),
            params: StepParams::default(),
            previous: Vec::new(),
        }
    }

    /// Adds a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Replaces the parameters.
    pub fn with_params(mut self, params: StepParams) -> Self {
        self.params = params;
        self
    }

    /// Appends a predecessor.
    pub fn after(mut self, previous: impl Into<NodeId>) -> Self {
        self.previous.push(previous.into());
        self
    }
}
