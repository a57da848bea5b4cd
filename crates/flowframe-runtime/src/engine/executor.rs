//! Workflow execution engine.

use std::any::Any;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use jiff::Timestamp;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{self, JoinError, JoinSet};
use tracing::Instrument;
use uuid::Uuid;

use super::EngineConfig;
use super::result::{CompletedRun, ExecutionResult, FailedRun, NodeFailure, NodeOutputs};
use crate::error::{WorkflowError, WorkflowResult};
use crate::graph::{Node, WorkflowGraph};
use crate::registry::StepRegistry;
use crate::step::{StepError, StepResult, WorkflowData, WorkflowStep};

/// Tracing target for engine operations.
const TRACING_TARGET: &str = "flowframe_runtime::engine";

/// The workflow execution engine.
///
/// Runs each node once its predecessors have finished, executing independent
/// nodes concurrently. A semaphore shared by all runs of this engine bounds
/// the number of steps executing at once.
///
/// After the first step failure no further node is started. Steps already
/// running are allowed to finish and are reported with the failure.
pub struct Engine {
    config: EngineConfig,
    semaphore: Arc<Semaphore>,
}

impl Engine {
    /// Creates a new engine with the given configuration.
    ///
    /// Fails with [`WorkflowError::InvalidConfig`] when a limit is zero.
    pub fn new(config: EngineConfig) -> WorkflowResult<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    /// Creates a new engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::with_valid_config(EngineConfig::default())
    }

    fn with_valid_config(config: EngineConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_steps));

        tracing::info!(
            target: TRACING_TARGET,
            max_concurrent_steps = config.max_concurrent_steps,
            max_nodes = config.max_nodes,
            "Workflow engine initialized"
        );

        Self { config, semaphore }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the number of step slots currently free.
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Validates a workflow graph against a step registry without running it.
    ///
    /// Enforces the node limit, then the graph rules of
    /// [`WorkflowGraph::validate`].
    pub fn validate(&self, workflow: &WorkflowGraph, registry: &StepRegistry) -> WorkflowResult<()> {
        let count = workflow.node_count();
        if count > self.config.max_nodes {
            return Err(WorkflowError::TooManyNodes {
                count,
                max: self.config.max_nodes,
            });
        }
        workflow.validate(registry)
    }

    /// Executes a workflow graph.
    ///
    /// Structural problems are returned as `Err` before any step runs. Once
    /// execution starts, the outcome, including step failures, is reported
    /// as an [`ExecutionResult`].
    pub async fn execute(
        &self,
        workflow: &WorkflowGraph,
        registry: &StepRegistry,
    ) -> WorkflowResult<ExecutionResult> {
        self.validate(workflow, registry)?;

        let run = Run::new(workflow, registry, self.semaphore.clone())?;

        tracing::info!(
            target: TRACING_TARGET,
            run_id = %run.run_id,
            workflow = %workflow.metadata.name,
            node_count = workflow.node_count(),
            "Starting workflow execution"
        );

        let result = run.drive().await?;

        match &result {
            ExecutionResult::Completed(run) => tracing::info!(
                target: TRACING_TARGET,
                run_id = %run.run_id,
                node_count = run.outputs.len(),
                "Workflow execution completed"
            ),
            ExecutionResult::Failed(run) => tracing::warn!(
                target: TRACING_TARGET,
                run_id = %run.run_id,
                node_id = %run.failure.node_id,
                error = %run.failure.error,
                finished = run.outputs.len(),
                not_attempted = run.not_attempted.len(),
                "Workflow execution failed"
            ),
        }

        Ok(result)
    }
}

/// Progress state of one run. Owned by the coordinator only; workers receive
/// their inputs when spawned and report back through the join set.
struct Run<'a> {
    run_id: Uuid,
    nodes: Vec<&'a Node>,
    steps: Vec<Arc<dyn WorkflowStep>>,
    /// Predecessor positions per node, in input order.
    predecessors: Vec<Vec<usize>>,
    /// Unfinished predecessor listings per node.
    remaining: Vec<usize>,
    /// Dependents per node, once per listing.
    dependents: Vec<Vec<usize>>,
    ready: VecDeque<usize>,
    started: Vec<bool>,
    outputs: Vec<Option<Arc<WorkflowData>>>,
    failure: Option<NodeFailure>,
    other_failures: Vec<NodeFailure>,
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<(usize, StepResult<WorkflowData>)>,
    task_nodes: HashMap<task::Id, usize>,
}

impl<'a> Run<'a> {
    fn new(
        workflow: &'a WorkflowGraph,
        registry: &StepRegistry,
        semaphore: Arc<Semaphore>,
    ) -> WorkflowResult<Self> {
        let nodes: Vec<&Node> = workflow.nodes().collect();
        let positions: HashMap<_, _> = workflow
            .nodes()
            .enumerate()
            .map(|(position, node)| (&node.id, position))
            .collect();

        let mut steps = Vec::with_capacity(nodes.len());
        let mut predecessors = vec![Vec::new(); nodes.len()];
        let mut remaining = vec![0; nodes.len()];
        let mut dependents = vec![Vec::new(); nodes.len()];

        for (position, node) in nodes.iter().enumerate() {
            let step = registry.create_step(&node.step_type).map_err(|_| {
                WorkflowError::UnknownStepType {
                    node_id: Some(node.id.clone()),
                    step_type: node.step_type.clone(),
                }
            })?;
            steps.push(step);

            for previous in &node.previous {
                let &source = positions.get(previous).ok_or_else(|| {
                    WorkflowError::DanglingReference {
                        node_id: node.id.clone(),
                        missing: previous.clone(),
                    }
                })?;
                predecessors[position].push(source);
                remaining[position] += 1;
                dependents[source].push(position);
            }
        }

        let ready = (0..nodes.len())
            .filter(|&position| remaining[position] == 0)
            .collect();

        Ok(Self {
            run_id: Uuid::now_v7(),
            started: vec![false; nodes.len()],
            outputs: vec![None; nodes.len()],
            nodes,
            steps,
            predecessors,
            remaining,
            dependents,
            ready,
            failure: None,
            other_failures: Vec::new(),
            semaphore,
            tasks: JoinSet::new(),
            task_nodes: HashMap::new(),
        })
    }

    /// Coordinator loop: takes a step slot for each ready node and consumes
    /// completions until nothing is running.
    ///
    /// Completions are always handled before a waiting slot is granted, so a
    /// node is never started once a failure has been recorded.
    async fn drive(mut self) -> WorkflowResult<ExecutionResult> {
        let started_at = Timestamp::now();

        loop {
            let dispatching = self.failure.is_none() && !self.ready.is_empty();
            if !dispatching && self.tasks.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                Some(joined) = self.tasks.join_next_with_id() => {
                    self.on_joined(joined)?;
                }
                permit = self.semaphore.clone().acquire_owned(), if dispatching => {
                    let permit = permit.map_err(|_| {
                        WorkflowError::Internal("step slots were closed".into())
                    })?;
                    if let Some(position) = self.ready.pop_front() {
                        self.dispatch(position, permit);
                    }
                }
            }
        }

        self.finish(started_at)
    }

    fn on_joined(
        &mut self,
        joined: Result<(task::Id, (usize, StepResult<WorkflowData>)), JoinError>,
    ) -> WorkflowResult<()> {
        let (position, result) = match joined {
            Ok((id, (position, result))) => {
                self.task_nodes.remove(&id);
                (position, result)
            }
            Err(error) => {
                let Some(position) = self.task_nodes.remove(&error.id()) else {
                    return Err(WorkflowError::Internal(format!(
                        "worker task {} is not tracked",
                        error.id()
                    )));
                };
                (position, Err(panic_error(error)))
            }
        };

        match result {
            Ok(data) => self.complete(position, data),
            Err(error) => self.fail(position, error),
        }
        Ok(())
    }

    fn dispatch(&mut self, position: usize, permit: OwnedSemaphorePermit) {
        let node = self.nodes[position];
        let step = self.steps[position].clone();
        let params = node.params.clone();
        let inputs: Vec<Arc<WorkflowData>> = self.predecessors[position]
            .iter()
            .filter_map(|&source| self.outputs[source].clone())
            .collect();

        let span = tracing::debug_span!(
            target: TRACING_TARGET,
            "step",
            run_id = %self.run_id,
            node_id = %node.id,
            step_type = %node.step_type,
        );

        let handle = self.tasks.spawn(
            async move {
                let _permit = permit;
                let started = Instant::now();
                let result = step.execute(&params, &inputs).await;
                tracing::debug!(
                    target: TRACING_TARGET,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    succeeded = result.is_ok(),
                    "Step finished"
                );
                (position, result)
            }
            .instrument(span),
        );

        self.task_nodes.insert(handle.id(), position);
        self.started[position] = true;
    }

    fn complete(&mut self, position: usize, data: WorkflowData) {
        let node = self.nodes[position];
        self.outputs[position] = Some(Arc::new(data.with_origin(node.id.clone())));

        for dependent in std::mem::take(&mut self.dependents[position]) {
            self.remaining[dependent] -= 1;
            if self.remaining[dependent] == 0 {
                self.ready.push_back(dependent);
            }
        }
    }

    fn fail(&mut self, position: usize, error: StepError) {
        let node = self.nodes[position];
        tracing::warn!(
            target: TRACING_TARGET,
            run_id = %self.run_id,
            node_id = %node.id,
            step_type = %node.step_type,
            error = %error,
            "Step failed"
        );

        let failure = NodeFailure {
            node_id: node.id.clone(),
            step_type: node.step_type.clone(),
            error,
        };

        if self.failure.is_none() {
            self.failure = Some(failure);
        } else {
            self.other_failures.push(failure);
        }
    }

    fn finish(self, started_at: Timestamp) -> WorkflowResult<ExecutionResult> {
        let finished_at = Timestamp::now();

        let mut outputs = NodeOutputs::new();
        let mut not_attempted = BTreeSet::new();
        for (position, output) in self.outputs.into_iter().enumerate() {
            let id = self.nodes[position].id.clone();
            match output {
                Some(data) => {
                    outputs.insert(id, data);
                }
                None if self.started[position] => {}
                None => {
                    not_attempted.insert(id);
                }
            }
        }

        match self.failure {
            None if not_attempted.is_empty() && outputs.len() == self.nodes.len() => {
                Ok(ExecutionResult::Completed(CompletedRun {
                    run_id: self.run_id,
                    started_at,
                    finished_at,
                    outputs,
                }))
            }
            None => Err(WorkflowError::Internal(format!(
                "run {} stopped with {} of {} nodes finished",
                self.run_id,
                outputs.len(),
                self.nodes.len()
            ))),
            Some(failure) => Ok(ExecutionResult::Failed(FailedRun {
                run_id: self.run_id,
                started_at,
                finished_at,
                failure,
                other_failures: self.other_failures,
                outputs,
                not_attempted,
            })),
        }
    }
}

fn panic_error(error: JoinError) -> StepError {
    if error.is_cancelled() {
        return StepError::Panicked("worker was cancelled".into());
    }
    StepError::Panicked(panic_message(error.into_panic()))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_owned(),
            Err(_) => "non-string panic payload".to_owned(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use flowframe_client::mock::MockProvider;

    use super::*;
    use crate::graph::{NodeId, WorkflowDefinition};
    use crate::step::StepParams;

    #[derive(Debug, Clone)]
    struct Invocation {
        label: String,
        inputs: Vec<String>,
    }

    /// Records every invocation. Behaviour is driven by node parameters.
    #[derive(Clone, Default)]
    struct Recorder {
        log: Arc<Mutex<Vec<Invocation>>>,
        finished: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn invocations(&self) -> Vec<Invocation> {
            self.log.lock().unwrap().clone()
        }

        fn labels(&self) -> Vec<String> {
            self.invocations().into_iter().map(|i| i.label).collect()
        }

        /// Labels of successful invocations, in completion order.
        fn finished(&self) -> Vec<String> {
            self.finished.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl WorkflowStep for Recorder {
        fn name(&self) -> &str {
            "record"
        }

        async fn execute(
            &self,
            params: &StepParams,
            inputs: &[Arc<WorkflowData>],
        ) -> StepResult<WorkflowData> {
            let label = params.required_str("label")?.to_owned();
            let input_labels = inputs
                .iter()
                .filter_map(|input| input.get_str("label").map(str::to_owned))
                .collect();
            self.log.lock().unwrap().push(Invocation {
                label: label.clone(),
                inputs: input_labels,
            });

            if let Some(delay) = params.millis("delay_ms")? {
                tokio::time::sleep(delay).await;
            }
            if params.bool("panic")?.unwrap_or(false) {
                panic!("{label} exploded");
            }
            if params.bool("fail")?.unwrap_or(false) {
                return Err(StepError::failed(format!("{label} refused")));
            }

            self.finished.lock().unwrap().push(label.clone());
            Ok(WorkflowData::empty().with_field("label", label))
        }
    }

    #[derive(Default)]
    struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    /// Tracks how many of its invocations overlap.
    #[derive(Clone, Default)]
    struct GaugeStep(Arc<Gauge>);

    #[async_trait::async_trait]
    impl WorkflowStep for GaugeStep {
        fn name(&self) -> &str {
            "gauge"
        }

        async fn execute(
            &self,
            _params: &StepParams,
            _inputs: &[Arc<WorkflowData>],
        ) -> StepResult<WorkflowData> {
            let now = self.0.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.0.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.0.current.fetch_sub(1, Ordering::SeqCst);
            Ok(WorkflowData::empty())
        }
    }

    fn node(id: &str) -> Node {
        Node::new(id, "record").with_param("label", id)
    }

    fn graph(nodes: Vec<Node>) -> WorkflowGraph {
        WorkflowGraph::from_nodes(nodes).unwrap()
    }

    fn setup() -> (MockProvider, Recorder, StepRegistry) {
        let mock = MockProvider::new();
        let recorder = Recorder::default();
        let registry = StepRegistry::builder(mock.clone().into_service())
            .register(recorder.clone())
            .build();
        (mock, recorder, registry)
    }

    fn diamond() -> Vec<Node> {
        vec![
            node("a"),
            node("b").after("a"),
            node("c").after("a"),
            node("d").after("b").after("c"),
        ]
    }

    fn position(labels: &[String], label: &str) -> usize {
        labels.iter().position(|l| l == label).unwrap()
    }

    #[tokio::test]
    async fn provisions_index_then_pipeline() {
        let (mock, _, registry) = setup();
        let definition = WorkflowDefinition::from_json(
            r#"{
                "name": "semantic-search",
                "nodes": [
                    { "id": "create_index", "type": "create_index",
                      "params": { "index_name": "docs" } },
                    { "id": "create_pipeline", "type": "create_ingest_pipeline",
                      "params": { "pipeline_id": "embed", "model_id": "m-1" } }
                ],
                "edges": [{ "source": "create_index", "dest": "create_pipeline" }]
            }"#,
        )
        .unwrap();
        let workflow = WorkflowGraph::from_definition(definition).unwrap();

        let result = Engine::with_defaults()
            .execute(&workflow, &registry)
            .await
            .unwrap();

        assert!(result.is_completed());
        assert_eq!(mock.indices(), vec!["docs".to_owned()]);
        assert_eq!(mock.pipelines(), vec!["embed".to_owned()]);

        let pipeline = result.output(&"create_pipeline".into()).unwrap();
        assert_eq!(pipeline.get_str("pipeline_id"), Some("embed"));
        assert_eq!(pipeline.get_str("index_name"), Some("docs"));
        assert_eq!(pipeline.origin(), Some(&NodeId::from("create_pipeline")));
    }

    #[tokio::test]
    async fn every_node_runs_once_after_its_predecessors() {
        let (_, recorder, registry) = setup();

        let result = Engine::with_defaults()
            .execute(&graph(diamond()), &registry)
            .await
            .unwrap();

        assert!(result.is_completed());
        assert_eq!(result.outputs().len(), 4);

        let labels = recorder.labels();
        assert_eq!(labels.len(), 4);
        assert!(position(&labels, "a") < position(&labels, "b"));
        assert!(position(&labels, "a") < position(&labels, "c"));
        assert!(position(&labels, "b") < position(&labels, "d"));
        assert!(position(&labels, "c") < position(&labels, "d"));
    }

    #[tokio::test]
    async fn inputs_follow_declared_predecessor_order() {
        let (_, recorder, registry) = setup();
        let workflow = graph(vec![
            node("a"),
            node("b"),
            node("c").after("b").after("a"),
        ]);

        Engine::with_defaults()
            .execute(&workflow, &registry)
            .await
            .unwrap();

        let c = recorder
            .invocations()
            .into_iter()
            .find(|i| i.label == "c")
            .unwrap();
        assert_eq!(c.inputs, ["b", "a"]);
    }

    #[tokio::test]
    async fn cycle_is_rejected_before_any_step_runs() {
        let (_, recorder, registry) = setup();
        let workflow = graph(vec![node("a").after("b"), node("b").after("a"), node("c")]);

        let err = Engine::with_defaults()
            .execute(&workflow, &registry)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::CyclicDependency { .. }));
        assert!(recorder.invocations().is_empty());
    }

    #[tokio::test]
    async fn dangling_reference_is_rejected_before_any_step_runs() {
        let (_, recorder, registry) = setup();
        let workflow = graph(vec![node("a"), node("b").after("missing")]);

        let err = Engine::with_defaults()
            .execute(&workflow, &registry)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::DanglingReference { ref node_id, ref missing }
                if node_id.as_str() == "b" && missing.as_str() == "missing"
        ));
        assert!(recorder.invocations().is_empty());
    }

    #[tokio::test]
    async fn unknown_step_type_is_rejected_before_any_call() {
        let (mock, recorder, registry) = setup();
        let workflow = graph(vec![
            Node::new("index", "create_index").with_param("index_name", "docs"),
            node("a"),
            Node::new("model", "create_model").after("index"),
        ]);

        let err = Engine::with_defaults()
            .execute(&workflow, &registry)
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.node_id(), Some(&NodeId::from("model")));
        assert_eq!(mock.calls(), 0);
        assert!(recorder.invocations().is_empty());
    }

    #[tokio::test]
    async fn node_limit_is_enforced() {
        let (_, _, registry) = setup();
        let config = EngineConfig::builder().max_nodes(2usize).build().unwrap();
        let engine = Engine::new(config).unwrap();

        let err = engine
            .execute(&graph(vec![node("a"), node("b"), node("c")]), &registry)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::TooManyNodes { count: 3, max: 2 }));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_drains_running_nodes_and_skips_the_rest() {
        let (_, recorder, registry) = setup();
        let workflow = graph(vec![
            node("a"),
            node("b").after("a").with_param("fail", true),
            node("c").after("a").with_param("delay_ms", 50),
            node("d").after("b").after("c"),
        ]);

        let result = Engine::with_defaults()
            .execute(&workflow, &registry)
            .await
            .unwrap();

        let ExecutionResult::Failed(run) = result else {
            panic!("expected a failed run");
        };
        assert_eq!(run.failure.node_id.as_str(), "b");
        assert_eq!(run.failure.error.to_string(), "b refused");
        assert!(run.other_failures.is_empty());

        let finished: Vec<_> = run.outputs.keys().map(NodeId::as_str).collect();
        assert_eq!(finished, ["a", "c"]);
        assert_eq!(run.not_attempted, BTreeSet::from([NodeId::from("d")]));
        assert!(!recorder.labels().contains(&"d".to_owned()));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_failures_are_all_reported() {
        let (_, _, registry) = setup();
        let workflow = graph(vec![
            node("a").with_param("fail", true),
            node("b").with_param("fail", true).with_param("delay_ms", 10),
            node("c").after("a"),
        ]);

        let result = Engine::with_defaults()
            .execute(&workflow, &registry)
            .await
            .unwrap();

        let ExecutionResult::Failed(run) = result else {
            panic!("expected a failed run");
        };
        assert_eq!(run.failure.node_id.as_str(), "a");
        assert_eq!(run.other_failures.len(), 1);
        assert_eq!(run.other_failures[0].node_id.as_str(), "b");
        assert_eq!(run.not_attempted, BTreeSet::from([NodeId::from("c")]));
    }

    #[tokio::test]
    async fn panicking_step_is_reported_as_failure() {
        let (_, _, registry) = setup();
        let workflow = graph(vec![node("a").with_param("panic", true), node("b").after("a")]);

        let result = Engine::with_defaults()
            .execute(&workflow, &registry)
            .await
            .unwrap();

        let failure = result.failure().unwrap();
        assert_eq!(failure.node_id.as_str(), "a");
        assert!(matches!(&failure.error, StepError::Panicked(message) if message == "a exploded"));

        let err = result.into_result().unwrap_err();
        assert!(matches!(err, WorkflowError::StepFailed { .. }));
    }

    #[tokio::test]
    async fn results_do_not_depend_on_node_order() {
        let (_, _, registry) = setup();
        let engine = Engine::with_defaults();

        let forward = engine
            .execute(&graph(diamond()), &registry)
            .await
            .unwrap();
        let mut reversed_nodes = diamond();
        reversed_nodes.reverse();
        let reversed = engine
            .execute(&graph(reversed_nodes), &registry)
            .await
            .unwrap();

        assert_eq!(forward.outputs(), reversed.outputs());
    }

    #[tokio::test(start_paused = true)]
    async fn results_do_not_depend_on_completion_order() {
        let (_, recorder, registry) = setup();
        let engine = Engine::with_defaults();
        let diamond_with_delays = |b_delay: u64, c_delay: u64| {
            graph(vec![
                node("a"),
                node("b").after("a").with_param("delay_ms", b_delay),
                node("c").after("a").with_param("delay_ms", c_delay),
                node("d").after("b").after("c"),
            ])
        };

        let b_first = engine
            .execute(&diamond_with_delays(10, 30), &registry)
            .await
            .unwrap();
        let c_first = engine
            .execute(&diamond_with_delays(30, 10), &registry)
            .await
            .unwrap();

        assert_eq!(
            recorder.finished(),
            ["a", "b", "c", "d", "a", "c", "b", "d"]
        );
        assert!(b_first.is_completed());
        assert!(c_first.is_completed());
        assert_eq!(b_first.outputs(), c_first.outputs());

        let d_inputs: Vec<_> = recorder
            .invocations()
            .into_iter()
            .filter(|i| i.label == "d")
            .map(|i| i.inputs)
            .collect();
        assert_eq!(d_inputs, [["b", "c"], ["b", "c"]]);
    }

    #[tokio::test]
    async fn zero_step_slots_are_rejected_up_front() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "max_concurrent_steps": 0, "max_nodes": 50 }"#).unwrap();

        assert!(matches!(
            Engine::new(config),
            Err(WorkflowError::InvalidConfig(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrency_is_bounded_by_the_engine() {
        let gauge = GaugeStep::default();
        let registry = StepRegistry::builder(MockProvider::new().into_service())
            .register(gauge.clone())
            .build();
        let workflow = graph(
            (0..8)
                .map(|i| Node::new(format!("g{i}"), "gauge"))
                .collect(),
        );
        let engine = Engine::new(
            EngineConfig::builder()
                .max_concurrent_steps(2usize)
                .build()
                .unwrap(),
        )
        .unwrap();

        let result = engine.execute(&workflow, &registry).await.unwrap();

        assert!(result.is_completed());
        assert!(gauge.0.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(engine.available_slots(), 2);
    }

    #[tokio::test]
    async fn empty_graph_completes_with_no_outputs() {
        let (_, _, registry) = setup();

        let result = Engine::with_defaults()
            .execute(&WorkflowGraph::new(), &registry)
            .await
            .unwrap();

        assert!(result.is_completed());
        assert!(result.outputs().is_empty());
    }
}
