//! Command implementations.

use std::path::Path;

use anyhow::Context;
use flowframe_runtime::engine::{Engine, ExecutionResult};
use flowframe_runtime::graph::{NodeId, WorkflowDefinition, WorkflowGraph};
use flowframe_runtime::registry::StepRegistry;
use serde::Serialize;

use crate::TRACING_TARGET_COMMAND;

/// Outcome of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The command succeeded.
    Success,
    /// The command ran but reported a problem, e.g. an unhealthy cluster.
    Failure,
    /// Provisioning started and a step failed.
    ProvisioningFailed,
}

impl Status {
    /// Process exit code for this status.
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::ProvisioningFailed => 2,
        }
    }
}

/// Report printed by the `validate` command.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// Workflow name.
    pub name: String,
    /// Number of nodes.
    pub node_count: usize,
    /// One valid execution order.
    pub order: Vec<NodeId>,
}

/// Reads and parses a workflow template.
pub async fn load_workflow(path: &Path) -> anyhow::Result<WorkflowGraph> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read workflow template {}", path.display()))?;

    let definition = WorkflowDefinition::from_json(&json)
        .with_context(|| format!("invalid workflow template {}", path.display()))?;

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        path = %path.display(),
        name = %definition.metadata.name,
        nodes = definition.nodes.len(),
        edges = definition.edges.len(),
        "Workflow template loaded"
    );

    WorkflowGraph::from_definition(definition).context("invalid workflow graph")
}

/// Validates a workflow without running any step.
pub fn validate(
    workflow: &WorkflowGraph,
    engine: &Engine,
    registry: &StepRegistry,
) -> anyhow::Result<ValidationReport> {
    engine
        .validate(workflow, registry)
        .context("workflow validation failed")?;

    Ok(ValidationReport {
        name: workflow.metadata.name.clone(),
        node_count: workflow.node_count(),
        order: workflow.topological_order()?,
    })
}

/// Runs a workflow.
///
/// Returns `Err` only when the workflow was rejected before any step ran.
pub async fn provision(
    workflow: &WorkflowGraph,
    engine: &Engine,
    registry: &StepRegistry,
) -> anyhow::Result<(ExecutionResult, Status)> {
    let result = engine
        .execute(workflow, registry)
        .await
        .context("workflow could not be started")?;

    let status = if result.is_completed() {
        Status::Success
    } else {
        Status::ProvisioningFailed
    };

    Ok((result, status))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use flowframe_client::ErrorKind;
    use flowframe_client::mock::MockProvider;
    use flowframe_runtime::WorkflowError;

    use super::*;

    const TEMPLATE: &str = r#"{
        "name": "semantic-search",
        "nodes": [
            { "id": "index", "type": "create_index", "params": { "index_name": "docs" } },
            { "id": "pipeline", "type": "create_ingest_pipeline",
              "params": { "pipeline_id": "embed", "model_id": "m-1" }, "previous": ["index"] }
        ]
    }"#;

    async fn write_template(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "flowframe-cli-{}-{name}.json",
            std::process::id()
        ));
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    #[tokio::test]
    async fn missing_template_is_reported() {
        let err = load_workflow(Path::new("/definitely/not/here.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read workflow template"));
    }

    #[tokio::test]
    async fn validate_reports_execution_order() {
        let path = write_template("validate", TEMPLATE).await;
        let workflow = load_workflow(&path).await.unwrap();
        let registry = StepRegistry::new(MockProvider::new().into_service());

        let report = validate(&workflow, &Engine::with_defaults(), &registry).unwrap();

        assert_eq!(report.name, "semantic-search");
        assert_eq!(report.node_count, 2);
        let order: Vec<_> = report.order.iter().map(NodeId::as_str).collect();
        assert_eq!(order, ["index", "pipeline"]);
    }

    #[tokio::test]
    async fn validate_keeps_the_workflow_error() {
        let path = write_template(
            "cycle",
            r#"{ "nodes": [
                { "id": "a", "type": "delay", "previous": ["b"] },
                { "id": "b", "type": "delay", "previous": ["a"] }
            ] }"#,
        )
        .await;
        let workflow = load_workflow(&path).await.unwrap();
        let registry = StepRegistry::new(MockProvider::new().into_service());

        let err = validate(&workflow, &Engine::with_defaults(), &registry).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WorkflowError>(),
            Some(WorkflowError::CyclicDependency { .. })
        ));
    }

    #[tokio::test]
    async fn provision_maps_step_failure_to_exit_code_two() {
        let path = write_template("provision", TEMPLATE).await;
        let workflow = load_workflow(&path).await.unwrap();

        let mock = MockProvider::new();
        let registry = StepRegistry::new(mock.clone().into_service());
        let (result, status) = provision(&workflow, &Engine::with_defaults(), &registry)
            .await
            .unwrap();
        assert_eq!(status, Status::Success);
        assert!(result.is_completed());

        let failing = MockProvider::new();
        failing.fail_always("embed", ErrorKind::InvalidInput);
        let registry = StepRegistry::new(failing.clone().into_service());
        let (result, status) = provision(&workflow, &Engine::with_defaults(), &registry)
            .await
            .unwrap();
        assert_eq!(status.exit_code(), 2);
        assert_eq!(result.failure().unwrap().node_id.as_str(), "pipeline");
        assert_eq!(failing.indices(), vec!["docs".to_owned()]);
    }
}
