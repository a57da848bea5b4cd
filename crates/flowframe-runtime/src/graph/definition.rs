//! Serializable workflow template.

use serde::{Deserialize, Serialize};

use super::{Edge, Node};
use crate::error::WorkflowResult;

/// Descriptive metadata about a workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    /// Workflow name.
    #[serde(default)]
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WorkflowMetadata {
    /// Creates metadata with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A workflow template as stored or submitted by users.
///
/// Dependencies can be given on the nodes (`previous`), as separate `edges`,
/// or both. Converting to a [`WorkflowGraph`](super::WorkflowGraph) appends
/// each edge's `source` to its `dest` predecessors, in edge order, after any
/// explicit `previous` entries.
///
/// ```json
/// {
///   "name": "semantic-search",
///   "nodes": [
///     { "id": "index", "type": "create_index", "params": { "index_name": "docs" } },
///     { "id": "pipeline", "type": "create_ingest_pipeline",
///       "params": { "pipeline_id": "embed", "model_id": "m-1" } }
///   ],
///   "edges": [{ "source": "index", "dest": "pipeline" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Workflow metadata.
    #[serde(flatten)]
    pub metadata: WorkflowMetadata,
    /// Nodes in the workflow.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Additional dependencies between nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<Edge>,
}

impl WorkflowDefinition {
    /// Creates an empty definition.
    pub fn new(metadata: WorkflowMetadata) -> Self {
        Self {
            metadata,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node.
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds an edge.
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Parses a definition from JSON.
    pub fn from_json(json: &str) -> WorkflowResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the definition to pretty-printed JSON.
    pub fn to_json(&self) -> WorkflowResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
