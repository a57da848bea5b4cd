//! Node parameters.

use std::sync::Arc;
use std::time::Duration;

use derive_more::{Deref, From};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{StepError, StepResult, WorkflowData};

/// Configuration attached to a node.
///
/// Typed getters return `Ok(None)` when a key is absent and
/// [`StepError::InvalidParameter`] when it is present with the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Deref, From)]
#[serde(transparent)]
pub struct StepParams(Map<String, Value>);

impl StepParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying map.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Returns a string parameter.
    pub fn str(&self, key: &str) -> StepResult<Option<&str>> {
        self.0.get(key).map(|v| expect_str(key, v)).transpose()
    }

    /// Returns a string parameter, failing when it is absent.
    pub fn required_str(&self, key: &str) -> StepResult<&str> {
        self.str(key)?
            .ok_or_else(|| StepError::MissingParameter(key.to_owned()))
    }

    /// Returns an object parameter.
    pub fn object(&self, key: &str) -> StepResult<Option<&Map<String, Value>>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(StepError::invalid_parameter(key, "expected an object")),
        }
    }

    /// Returns an array parameter.
    pub fn array(&self, key: &str) -> StepResult<Option<&Vec<Value>>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => Err(StepError::invalid_parameter(key, "expected an array")),
        }
    }

    /// Returns a non-negative integer parameter.
    pub fn u64(&self, key: &str) -> StepResult<Option<u64>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .map(Some)
                .ok_or_else(|| StepError::invalid_parameter(key, "expected a non-negative integer")),
        }
    }

    /// Returns a boolean parameter.
    pub fn bool(&self, key: &str) -> StepResult<Option<bool>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| StepError::invalid_parameter(key, "expected a boolean")),
        }
    }

    /// Returns a duration given in milliseconds.
    pub fn millis(&self, key: &str) -> StepResult<Option<Duration>> {
        Ok(self.u64(key)?.map(Duration::from_millis))
    }

    /// Looks a field up in the parameters first, then in each input in order.
    ///
    /// This is how a dependent node picks up values produced upstream, such
    /// as the `index_name` output of an index creation step.
    pub fn resolve<'a>(&'a self, key: &str, inputs: &'a [Arc<WorkflowData>]) -> Option<&'a Value> {
        self.0
            .get(key)
            .or_else(|| inputs.iter().find_map(|input| input.get(key)))
    }

    /// Resolves a string field from the parameters or the inputs.
    pub fn resolve_str<'a>(
        &'a self,
        key: &str,
        inputs: &'a [Arc<WorkflowData>],
    ) -> StepResult<Option<&'a str>> {
        self.resolve(key, inputs)
            .map(|v| expect_str(key, v))
            .transpose()
    }

    /// Resolves a string field, failing when neither the parameters nor any
    /// input provide it.
    pub fn require_resolved_str<'a>(
        &'a self,
        key: &str,
        inputs: &'a [Arc<WorkflowData>],
    ) -> StepResult<&'a str> {
        self.resolve_str(key, inputs)?
            .ok_or_else(|| StepError::MissingParameter(key.to_owned()))
    }
}

fn expect_str<'a>(key: &str, value: &'a Value) -> StepResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| StepError::invalid_parameter(key, "expected a string"))
}
