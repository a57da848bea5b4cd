//! Request types for search provider operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request to create an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIndexRequest {
    /// Name of the index to create.
    pub index: String,
    /// Index settings (shards, replicas, default pipeline, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    /// Field mappings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings: Option<Map<String, Value>>,
}

impl CreateIndexRequest {
    /// Creates a request for an index with default settings and mappings.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            settings: None,
            mappings: None,
        }
    }

    /// Sets the index settings.
    pub fn with_settings(mut self, settings: Map<String, Value>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Sets the index mappings.
    pub fn with_mappings(mut self, mappings: Map<String, Value>) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Returns the request body sent to the cluster.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        if let Some(settings) = &self.settings {
            body.insert("settings".into(), Value::Object(settings.clone()));
        }
        if let Some(mappings) = &self.mappings {
            body.insert("mappings".into(), Value::Object(mappings.clone()));
        }
        Value::Object(body)
    }
}

/// Request to create or replace an ingest pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutPipelineRequest {
    /// Pipeline identifier.
    pub id: String,
    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Processor definitions, in execution order.
    pub processors: Vec<Value>,
}

impl PutPipelineRequest {
    /// Creates a pipeline request without processors.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            processors: Vec::new(),
        }
    }

    /// Sets the pipeline description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a processor definition.
    pub fn with_processor(mut self, processor: Value) -> Self {
        self.processors.push(processor);
        self
    }

    /// Returns the request body sent to the cluster.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        if let Some(description) = &self.description {
            body.insert("description".into(), Value::String(description.clone()));
        }
        body.insert("processors".into(), Value::Array(self.processors.clone()));
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn index_body_omits_missing_sections() {
        let request = CreateIndexRequest::new("logs");
        assert_eq!(request.body(), json!({}));

        let mut mappings = Map::new();
        mappings.insert("properties".into(), json!({ "text": { "type": "text" } }));
        let request = request.with_mappings(mappings);
        assert_eq!(
            request.body(),
            json!({ "mappings": { "properties": { "text": { "type": "text" } } } })
        );
    }

    #[test]
    fn pipeline_body_keeps_processor_order() {
        let request = PutPipelineRequest::new("embed")
            .with_description("embedding pipeline")
            .with_processor(json!({ "first": {} }))
            .with_processor(json!({ "second": {} }));

        assert_eq!(
            request.body(),
            json!({
                "description": "embedding pipeline",
                "processors": [{ "first": {} }, { "second": {} }]
            })
        );
    }
}
