use std::sync::Arc;

use flowframe_client::{CreateIndexRequest, ErrorKind, SearchService};

use super::{DEFAULT_STEP_TIMEOUT, TIMEOUT_PARAM};
use crate::step::{
    CreatedResource, RetryPolicy, StepError, StepParams, StepResult, TRACING_TARGET, WorkflowData,
    WorkflowStep,
};

/// Creates a search index.
///
/// Parameters:
/// - `index_name` (required): name of the index.
/// - `settings`, `mappings`: optional objects sent with the request.
/// - `ignore_existing`: succeed without recording a resource when the index
///   already exists. Defaults to `false`.
/// - `timeout_ms`: overall time bound including retries.
///
/// Outputs the `index_name` field and records an `index` resource.
#[derive(Debug, Clone)]
pub struct CreateIndexStep {
    client: SearchService,
    retry: RetryPolicy,
}

impl CreateIndexStep {
    /// Registry type name.
    pub const NAME: &'static str = "create_index";

    /// Creates the step around a shared client.
    pub fn new(client: SearchService, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }
}

#[async_trait::async_trait]
impl WorkflowStep for CreateIndexStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn execute(
        &self,
        params: &StepParams,
        _inputs: &[Arc<WorkflowData>],
    ) -> StepResult<WorkflowData> {
        let index_name = params.required_str("index_name")?;
        let timeout = params.millis(TIMEOUT_PARAM)?.unwrap_or(DEFAULT_STEP_TIMEOUT);
        let ignore_existing = params.bool("ignore_existing")?.unwrap_or(false);

        let mut request = CreateIndexRequest::new(index_name);
        if let Some(settings) = params.object("settings")? {
            request = request.with_settings(settings.clone());
        }
        if let Some(mappings) = params.object("mappings")? {
            request = request.with_mappings(mappings.clone());
        }

        let client = &self.client;
        let request = &request;
        let output = WorkflowData::empty().with_field("index_name", index_name);

        match self
            .retry
            .run(timeout, move || client.create_index(request))
            .await
        {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    index = %response.index,
                    shards_acknowledged = response.shards_acknowledged,
                    "Index created"
                );
                Ok(output.with_resource(CreatedResource::index(index_name)))
            }
            Err(StepError::Client(error))
                if ignore_existing && error.kind() == ErrorKind::AlreadyExists =>
            {
                tracing::info!(
                    target: TRACING_TARGET,
                    index = %index_name,
                    "Index already exists, reusing it"
                );
                Ok(output)
            }
            Err(error) => Err(error),
        }
    }
}
