//! Search service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    AcknowledgedResponse, CreateIndexRequest, CreateIndexResponse, PutPipelineRequest, Result,
    ClusterHealth, SearchProvider, TRACING_TARGET,
};

/// Search service wrapper with observability.
///
/// This wrapper adds structured logging to any [`SearchProvider`]
/// implementation. The inner provider is wrapped in `Arc` for cheap cloning,
/// so every step holding a clone talks to the same provider instance.
#[derive(Clone)]
pub struct SearchService {
    inner: Arc<dyn SearchProvider>,
}

impl fmt::Debug for SearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchService").finish_non_exhaustive()
    }
}

impl SearchService {
    /// Create a new search service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: SearchProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Create a search service from an already shared provider.
    pub fn from_arc(provider: Arc<dyn SearchProvider>) -> Self {
        Self { inner: provider }
    }

    /// Returns whether both handles share the same provider instance.
    pub fn same_provider(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Creates an index.
    pub async fn create_index(&self, request: &CreateIndexRequest) -> Result<CreateIndexResponse> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            index = %request.index,
            has_settings = request.settings.is_some(),
            has_mappings = request.mappings.is_some(),
            "Creating index"
        );

        let result = self.inner.create_index(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(response) => tracing::debug!(
                target: TRACING_TARGET,
                index = %response.index,
                acknowledged = response.acknowledged,
                elapsed_ms = elapsed.as_millis(),
                "Index created"
            ),
            Err(error) => tracing::warn!(
                target: TRACING_TARGET,
                index = %request.index,
                error = %error,
                retryable = error.is_retryable(),
                elapsed_ms = elapsed.as_millis(),
                "Index creation failed"
            ),
        }

        result
    }

    /// Creates or replaces an ingest pipeline.
    pub async fn put_ingest_pipeline(
        &self,
        request: &PutPipelineRequest,
    ) -> Result<AcknowledgedResponse> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %request.id,
            processors = request.processors.len(),
            "Putting ingest pipeline"
        );

        let result = self.inner.put_ingest_pipeline(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(response) => tracing::debug!(
                target: TRACING_TARGET,
                pipeline_id = %request.id,
                acknowledged = response.acknowledged,
                elapsed_ms = elapsed.as_millis(),
                "Ingest pipeline stored"
            ),
            Err(error) => tracing::warn!(
                target: TRACING_TARGET,
                pipeline_id = %request.id,
                error = %error,
                retryable = error.is_retryable(),
                elapsed_ms = elapsed.as_millis(),
                "Ingest pipeline request failed"
            ),
        }

        result
    }

    /// Performs a health check against the backing cluster.
    pub async fn health_check(&self) -> Result<ClusterHealth> {
        let started_at = Instant::now();
        let result = self.inner.health_check().await;

        tracing::debug!(
            target: TRACING_TARGET,
            ok = result.is_ok(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "Health check completed"
        );

        result
    }
}
