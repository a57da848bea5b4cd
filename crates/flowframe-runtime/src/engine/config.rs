//! Engine configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{WorkflowError, WorkflowResult};

/// Configuration for the workflow execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct EngineConfig {
    /// Maximum number of steps executing at once, across all runs sharing
    /// the engine.
    #[builder(default = "16")]
    pub max_concurrent_steps: usize,

    /// Maximum number of nodes accepted in one workflow.
    #[builder(default = "50")]
    pub max_nodes: usize,
}

impl EngineConfig {
    /// Returns a builder.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Checks that both limits are at least 1.
    ///
    /// Configurations built with [`EngineConfigBuilder`] are always valid;
    /// ones assembled by hand or deserialized are checked by
    /// [`Engine::new`](super::Engine::new).
    pub fn validate(&self) -> WorkflowResult<()> {
        check_limits(Some(self.max_concurrent_steps), Some(self.max_nodes))
            .map_err(|message| WorkflowError::InvalidConfig(message.to_owned()))
    }
}

impl EngineConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        check_limits(self.max_concurrent_steps, self.max_nodes).map_err(str::to_owned)
    }
}

fn check_limits(
    max_concurrent_steps: Option<usize>,
    max_nodes: Option<usize>,
) -> Result<(), &'static str> {
    if max_concurrent_steps == Some(0) {
        return Err("max_concurrent_steps must be at least 1");
    }
    if max_nodes == Some(0) {
        return Err("max_nodes must be at least 1");
    }
    Ok(())
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_steps: 16,
            max_nodes: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let config = EngineConfig::builder().build().unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn builder_rejects_zero_limits() {
        let err = EngineConfig::builder()
            .max_concurrent_steps(0usize)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("max_concurrent_steps"));

        assert!(EngineConfig::builder().max_nodes(0usize).build().is_err());
    }

    #[test]
    fn deserialized_zero_limit_fails_validation() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "max_concurrent_steps": 0, "max_nodes": 50 }"#).unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidConfig(ref message)
            if message.contains("max_concurrent_steps")));
        assert!(EngineConfig::default().validate().is_ok());
    }
}
