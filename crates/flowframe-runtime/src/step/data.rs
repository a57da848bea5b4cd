//! Payload passed between steps.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

use crate::graph::NodeId;

/// Kind of a backend resource created by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    /// A search index.
    Index,
    /// An ingest pipeline.
    IngestPipeline,
    /// A machine learning model.
    Model,
    /// A connector to an external service.
    Connector,
}

/// Identifier of a resource created by a step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatedResource {
    /// Kind of the resource.
    pub kind: ResourceKind,
    /// Backend identifier of the resource.
    pub id: String,
}

impl CreatedResource {
    /// Creates a new resource identifier.
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Creates an index resource identifier.
    pub fn index(name: impl Into<String>) -> Self {
        Self::new(ResourceKind::Index, name)
    }

    /// Creates an ingest pipeline resource identifier.
    pub fn ingest_pipeline(id: impl Into<String>) -> Self {
        Self::new(ResourceKind::IngestPipeline, id)
    }
}

impl fmt::Display for CreatedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Metadata attached to a step output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataMetadata {
    /// Node that produced the output. Set by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    /// Resources the step created.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<CreatedResource>,
}

/// Output of one step execution.
///
/// The payload is built with the `with_*` methods before it is returned from
/// [`WorkflowStep::execute`](super::WorkflowStep::execute). Once the engine
/// stores it, it is shared as `Arc<WorkflowData>` and never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowData {
    #[serde(default)]
    content: Map<String, Value>,
    #[serde(default)]
    metadata: DataMetadata,
}

impl WorkflowData {
    /// Returns the empty payload: no fields and no resources.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a payload from a set of fields.
    pub fn new(content: Map<String, Value>) -> Self {
        Self {
            content,
            metadata: DataMetadata::default(),
        }
    }

    /// Returns whether the payload carries no fields and no resources.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.metadata.resources.is_empty()
    }

    /// Adds or replaces a field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.insert(key.into(), value.into());
        self
    }

    /// Records a created resource.
    pub fn with_resource(mut self, resource: CreatedResource) -> Self {
        self.metadata.resources.push(resource);
        self
    }

    /// Stamps the id of the node that produced this payload.
    pub fn with_origin(mut self, node_id: NodeId) -> Self {
        self.metadata.node_id = Some(node_id);
        self
    }

    /// Returns all fields.
    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    /// Returns the payload metadata.
    pub fn metadata(&self) -> &DataMetadata {
        &self.metadata
    }

    /// Returns the node that produced this payload, if stamped.
    pub fn origin(&self) -> Option<&NodeId> {
        self.metadata.node_id.as_ref()
    }

    /// Returns the resources created by the producing step.
    pub fn resources(&self) -> &[CreatedResource] {
        &self.metadata.resources
    }

    /// Returns a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.content.get(key)
    }

    /// Returns a field if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.content.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for WorkflowData {
    fn from(content: Map<String, Value>) -> Self {
        Self::new(content)
    }
}
