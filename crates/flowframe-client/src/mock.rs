//! In-memory mock provider for testing.
//!
//! [`MockProvider`] behaves like a tiny cluster: it remembers created
//! indices and pipelines, rejects duplicate index names, and can be told to
//! fail specific resources a number of times.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! flowframe-client = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::{
    AcknowledgedResponse, ClusterHealth, ClusterStatus, CreateIndexRequest, CreateIndexResponse,
    Error, ErrorKind, PutPipelineRequest, Result, SearchProvider, SearchService,
};

#[derive(Debug, Default)]
struct MockState {
    indices: BTreeMap<String, CreateIndexRequest>,
    pipelines: BTreeMap<String, PutPipelineRequest>,
    failures: HashMap<String, Failure>,
    calls: usize,
}

#[derive(Debug, Clone, Copy)]
struct Failure {
    kind: ErrorKind,
    // None fails forever.
    remaining: Option<usize>,
}

/// In-memory [`SearchProvider`] that records every call.
///
/// Clones share state, so a test can keep one clone for assertions while the
/// other is wrapped in a [`SearchService`].
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
    latency: Option<Duration>,
}

impl MockProvider {
    /// Creates an empty mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds artificial latency to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes every call touching `resource` fail with `kind`.
    pub fn fail_always(&self, resource: impl Into<String>, kind: ErrorKind) {
        self.state().failures.insert(
            resource.into(),
            Failure {
                kind,
                remaining: None,
            },
        );
    }

    /// Makes the next `times` calls touching `resource` fail with `kind`.
    pub fn fail_times(&self, resource: impl Into<String>, kind: ErrorKind, times: usize) {
        self.state().failures.insert(
            resource.into(),
            Failure {
                kind,
                remaining: Some(times),
            },
        );
    }

    /// Returns the names of created indices, sorted.
    pub fn indices(&self) -> Vec<String> {
        self.state().indices.keys().cloned().collect()
    }

    /// Returns the stored request for an index.
    pub fn index(&self, name: &str) -> Option<CreateIndexRequest> {
        self.state().indices.get(name).cloned()
    }

    /// Returns the ids of stored pipelines, sorted.
    pub fn pipelines(&self) -> Vec<String> {
        self.state().pipelines.keys().cloned().collect()
    }

    /// Returns the stored request for a pipeline.
    pub fn pipeline(&self, id: &str) -> Option<PutPipelineRequest> {
        self.state().pipelines.get(id).cloned()
    }

    /// Returns the number of create/put calls received, including failed ones.
    pub fn calls(&self) -> usize {
        self.state().calls
    }

    /// Wraps a clone of this provider in a [`SearchService`].
    pub fn into_service(self) -> SearchService {
        SearchService::new(self)
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded calls from others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn injected_failure(state: &mut MockState, resource: &str) -> Option<Error> {
        let failure = state.failures.get_mut(resource)?;
        let kind = failure.kind;
        match &mut failure.remaining {
            Some(0) => return None,
            Some(remaining) => *remaining -= 1,
            None => {}
        }
        Some(Error::new(kind).with_message(format!("injected failure for [{resource}]")))
    }
}

#[async_trait::async_trait]
impl SearchProvider for MockProvider {
    async fn create_index(&self, request: &CreateIndexRequest) -> Result<CreateIndexResponse> {
        self.simulate_latency().await;

        let mut state = self.state();
        state.calls += 1;

        if let Some(error) = Self::injected_failure(&mut state, &request.index) {
            return Err(error);
        }

        if state.indices.contains_key(&request.index) {
            return Err(Error::already_exists()
                .with_message(format!("index [{}] already exists", request.index)));
        }

        state.indices.insert(request.index.clone(), request.clone());
        Ok(CreateIndexResponse::acknowledged(&request.index))
    }

    async fn put_ingest_pipeline(
        &self,
        request: &PutPipelineRequest,
    ) -> Result<AcknowledgedResponse> {
        self.simulate_latency().await;

        let mut state = self.state();
        state.calls += 1;

        if let Some(error) = Self::injected_failure(&mut state, &request.id) {
            return Err(error);
        }

        state.pipelines.insert(request.id.clone(), request.clone());
        Ok(AcknowledgedResponse::acknowledged())
    }

    async fn health_check(&self) -> Result<ClusterHealth> {
        let state = self.state();
        let mut health = ClusterHealth::new("mock", ClusterStatus::Green);
        health.number_of_nodes = 1;
        health.number_of_data_nodes = 1;
        health.active_primary_shards = u32::try_from(state.indices.len()).unwrap_or(u32::MAX);
        health.active_shards = health.active_primary_shards;
        Ok(health)
    }
}
