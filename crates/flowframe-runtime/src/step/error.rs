use std::time::Duration;

use thiserror::Error;

/// Result type for step execution.
pub type StepResult<T> = Result<T, StepError>;

/// Errors reported by a single step execution.
#[derive(Debug, Error)]
pub enum StepError {
    /// A required parameter was not supplied.
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    /// A parameter was supplied with the wrong shape or value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// What was wrong with it.
        message: String,
    },

    /// The remote call failed after retries were exhausted.
    #[error("remote call failed: {0}")]
    Client(#[from] flowframe_client::Error),

    /// The step did not finish within its time bound.
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The worker running the step panicked.
    #[error("step panicked: {0}")]
    Panicked(String),

    /// Free-form failure for custom steps.
    #[error("{0}")]
    Failed(String),
}

impl StepError {
    /// Creates an [`InvalidParameter`](Self::InvalidParameter) error.
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a free-form [`Failed`](Self::Failed) error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[cfg(test)]
mod tests {
    use flowframe_client::ErrorKind;

    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            StepError::MissingParameter("index_name".into()).to_string(),
            "missing required parameter 'index_name'"
        );
        assert_eq!(
            StepError::Timeout(Duration::from_millis(1500)).to_string(),
            "timed out after 1500ms"
        );

        let client = flowframe_client::Error::new(ErrorKind::NotFound).with_message("no such model");
        assert_eq!(
            StepError::from(client).to_string(),
            "remote call failed: not_found: no such model"
        );
    }
}
