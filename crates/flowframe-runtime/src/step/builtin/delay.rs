use std::sync::Arc;
use std::time::Duration;

use crate::step::{StepParams, StepResult, TRACING_TARGET, WorkflowData, WorkflowStep};

/// Sleeps for `delay_ms` milliseconds (default 0), then outputs the fields of
/// all inputs merged in order together with `delayed_ms`.
///
/// Makes no remote calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelayStep;

impl DelayStep {
    /// Registry type name.
    pub const NAME: &'static str = "delay";
}

#[async_trait::async_trait]
impl WorkflowStep for DelayStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn execute(
        &self,
        params: &StepParams,
        inputs: &[Arc<WorkflowData>],
    ) -> StepResult<WorkflowData> {
        let delay_ms = params.u64("delay_ms")?.unwrap_or(0);

        tracing::trace!(target: TRACING_TARGET, delay_ms, "Delaying");
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        let mut content = serde_json::Map::new();
        for input in inputs {
            content.extend(
                input
                    .content()
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone())),
            );
        }
        content.insert("delayed_ms".into(), delay_ms.into());

        Ok(WorkflowData::new(content))
    }
}
