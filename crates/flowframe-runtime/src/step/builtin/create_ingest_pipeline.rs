use std::sync::Arc;

use flowframe_client::{PutPipelineRequest, SearchService};
use serde_json::{Value, json};

use super::{DEFAULT_STEP_TIMEOUT, TIMEOUT_PARAM};
use crate::step::{
    CreatedResource, RetryPolicy, StepError, StepParams, StepResult, TRACING_TARGET, WorkflowData,
    WorkflowStep,
};

const DEFAULT_INPUT_FIELD: &str = "text";
const DEFAULT_OUTPUT_FIELD: &str = "embedding";

/// Creates or replaces an ingest pipeline.
///
/// `pipeline_id`, `description`, `model_id`, `input_field` and
/// `output_field` are resolved from the node parameters first and then from
/// the predecessor outputs. When a `model_id` is available a `text_embedding`
/// processor mapping `input_field` (default `text`) to `output_field`
/// (default `embedding`) is appended to any raw `processors` given.
///
/// Outputs `pipeline_id`, forwards an upstream `index_name` if one exists,
/// and records an `ingest_pipeline` resource.
#[derive(Debug, Clone)]
pub struct CreateIngestPipelineStep {
    client: SearchService,
    retry: RetryPolicy,
}

impl CreateIngestPipelineStep {
    /// Registry type name.
    pub const NAME: &'static str = "create_ingest_pipeline";

    /// Creates the step around a shared client.
    pub fn new(client: SearchService, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    fn build_request(
        params: &StepParams,
        inputs: &[Arc<WorkflowData>],
    ) -> StepResult<PutPipelineRequest> {
        let pipeline_id = params.require_resolved_str("pipeline_id", inputs)?;
        let mut request = PutPipelineRequest::new(pipeline_id);

        if let Some(description) = params.resolve_str("description", inputs)? {
            request = request.with_description(description);
        }

        for processor in params.array("processors")?.into_iter().flatten() {
            if !processor.is_object() {
                return Err(StepError::invalid_parameter(
                    "processors",
                    "every processor must be an object",
                ));
            }
            request = request.with_processor(processor.clone());
        }

        if let Some(model_id) = params.resolve_str("model_id", inputs)? {
            let input_field = params
                .resolve_str("input_field", inputs)?
                .unwrap_or(DEFAULT_INPUT_FIELD);
            let output_field = params
                .resolve_str("output_field", inputs)?
                .unwrap_or(DEFAULT_OUTPUT_FIELD);
            request = request.with_processor(text_embedding(model_id, input_field, output_field));
        }

        if request.processors.is_empty() {
            return Err(StepError::invalid_parameter(
                "processors",
                "either model_id or a non-empty processors array is required",
            ));
        }

        Ok(request)
    }
}

fn text_embedding(model_id: &str, input_field: &str, output_field: &str) -> Value {
    json!({
        "text_embedding": {
            "model_id": model_id,
            "field_map": { input_field: output_field },
        }
    })
}

#[async_trait::async_trait]
impl WorkflowStep for CreateIngestPipelineStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn execute(
        &self,
        params: &StepParams,
        inputs: &[Arc<WorkflowData>],
    ) -> StepResult<WorkflowData> {
        let request = Self::build_request(params, inputs)?;
        let timeout = params.millis(TIMEOUT_PARAM)?.unwrap_or(DEFAULT_STEP_TIMEOUT);

        let client = &self.client;
        let sent = &request;
        let response = self
            .retry
            .run(timeout, move || client.put_ingest_pipeline(sent))
            .await?;

        if !response.acknowledged {
            tracing::warn!(
                target: TRACING_TARGET,
                pipeline_id = %request.id,
                "Ingest pipeline was not acknowledged"
            );
        }

        let mut output = WorkflowData::empty().with_field("pipeline_id", request.id.as_str());
        if let Some(index_name) = inputs.iter().find_map(|input| input.get("index_name")) {
            output = output.with_field("index_name", index_name.clone());
        }

        Ok(output.with_resource(CreatedResource::ingest_pipeline(request.id)))
    }
}

#[cfg(test)]
mod tests {
    use flowframe_client::ErrorKind;
    use flowframe_client::mock::MockProvider;

    use super::*;

    fn step(mock: &MockProvider) -> CreateIngestPipelineStep {
        CreateIngestPipelineStep::new(mock.clone().into_service(), RetryPolicy::none())
    }

    #[tokio::test]
    async fn builds_embedding_processor_from_upstream_fields() {
        let mock = MockProvider::new();
        let inputs = vec![
            Arc::new(WorkflowData::empty().with_field("index_name", "docs")),
            Arc::new(WorkflowData::empty().with_field("model_id", "m-1")),
        ];
        let params = StepParams::new()
            .with("pipeline_id", "embed")
            .with("input_field", "body");

        let output = step(&mock).execute(&params, &inputs).await.unwrap();

        assert_eq!(output.get_str("pipeline_id"), Some("embed"));
        assert_eq!(output.get_str("index_name"), Some("docs"));
        assert_eq!(output.resources(), &[CreatedResource::ingest_pipeline("embed")]);

        let stored = mock.pipeline("embed").unwrap();
        assert_eq!(
            stored.processors,
            vec![json!({
                "text_embedding": {
                    "model_id": "m-1",
                    "field_map": { "body": "embedding" }
                }
            })]
        );
    }

    #[tokio::test]
    async fn raw_processors_come_before_embedding() {
        let mock = MockProvider::new();
        let params = StepParams::new()
            .with("pipeline_id", "p")
            .with("description", "lowercase then embed")
            .with("model_id", "m-2")
            .with("processors", json!([{ "lowercase": { "field": "text" } }]));

        step(&mock).execute(&params, &[]).await.unwrap();

        let stored = mock.pipeline("p").unwrap();
        assert_eq!(stored.description.as_deref(), Some("lowercase then embed"));
        assert_eq!(stored.processors.len(), 2);
        assert!(stored.processors[0].get("lowercase").is_some());
        assert!(stored.processors[1].get("text_embedding").is_some());
    }

    #[tokio::test]
    async fn rejects_pipeline_without_processors() {
        let mock = MockProvider::new();
        let params = StepParams::new().with("pipeline_id", "p");

        let err = step(&mock).execute(&params, &[]).await.unwrap_err();
        assert!(matches!(err, StepError::InvalidParameter { name, .. } if name == "processors"));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn terminal_client_error_is_reported() {
        let mock = MockProvider::new();
        mock.fail_always("p", ErrorKind::InvalidInput);
        let params = StepParams::new()
            .with("pipeline_id", "p")
            .with("model_id", "m");

        let err = step(&mock).execute(&params, &[]).await.unwrap_err();
        assert!(matches!(err, StepError::Client(e) if e.kind() == ErrorKind::InvalidInput));
        assert!(mock.pipelines().is_empty());
    }
}
