//! Step registry.
//!
//! [`StepRegistry`] maps step type names to shared step instances. It is
//! built once, frozen, and then shared by every workflow run. Every remote
//! step in a registry talks to the same [`SearchService`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use flowframe_client::SearchService;

use crate::error::{WorkflowError, WorkflowResult};
use crate::step::builtin::{CreateIndexStep, CreateIngestPipelineStep, DelayStep};
use crate::step::{RetryPolicy, WorkflowStep};

mod cell;

pub use cell::RegistryCell;

/// Tracing target for registry operations.
const TRACING_TARGET: &str = "flowframe_runtime::registry";

/// Immutable catalog of step implementations.
#[derive(Clone)]
pub struct StepRegistry {
    steps: HashMap<String, Arc<dyn WorkflowStep>>,
    client: SearchService,
}

impl StepRegistry {
    /// Creates a registry holding the built-in steps.
    pub fn new(client: SearchService) -> Self {
        Self::builder(client).build()
    }

    /// Starts a registry that can hold custom steps besides the built-ins.
    pub fn builder(client: SearchService) -> StepRegistryBuilder {
        StepRegistryBuilder {
            client,
            retry: RetryPolicy::default(),
            custom: Vec::new(),
        }
    }

    /// Returns the step bound to `step_type`.
    pub fn create_step(&self, step_type: &str) -> WorkflowResult<Arc<dyn WorkflowStep>> {
        self.steps
            .get(step_type)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownStepType {
                node_id: None,
                step_type: step_type.to_owned(),
            })
    }

    /// Returns whether `step_type` is bound.
    pub fn contains(&self, step_type: &str) -> bool {
        self.steps.contains_key(step_type)
    }

    /// Returns the bound type names, sorted.
    pub fn step_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.steps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of bound step types.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns whether no step types are bound.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the client shared by the remote steps.
    pub fn client(&self) -> &SearchService {
        &self.client
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry")
            .field("step_types", &self.step_types())
            .finish_non_exhaustive()
    }
}

/// Builder for [`StepRegistry`].
pub struct StepRegistryBuilder {
    client: SearchService,
    retry: RetryPolicy,
    custom: Vec<Arc<dyn WorkflowStep>>,
}

impl StepRegistryBuilder {
    /// Sets the retry policy used by the built-in remote steps.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Adds a custom step. A step whose name is already bound replaces the
    /// earlier binding.
    pub fn register(self, step: impl WorkflowStep + 'static) -> Self {
        self.register_arc(Arc::new(step))
    }

    /// Adds an already shared custom step.
    pub fn register_arc(mut self, step: Arc<dyn WorkflowStep>) -> Self {
        self.custom.push(step);
        self
    }

    /// Freezes the catalog.
    pub fn build(self) -> StepRegistry {
        let builtin: [Arc<dyn WorkflowStep>; 3] = [
            Arc::new(CreateIndexStep::new(self.client.clone(), self.retry)),
            Arc::new(CreateIngestPipelineStep::new(self.client.clone(), self.retry)),
            Arc::new(DelayStep),
        ];

        let mut steps = HashMap::with_capacity(builtin.len() + self.custom.len());
        for step in builtin.into_iter().chain(self.custom) {
            let name = step.name().to_owned();
            if steps.insert(name.clone(), step).is_some() {
                tracing::warn!(
                    target: TRACING_TARGET,
                    step_type = %name,
                    "Step type registered twice, keeping the later binding"
                );
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            step_count = steps.len(),
            "Step registry built"
        );

        StepRegistry {
            steps,
            client: self.client,
        }
    }
}
