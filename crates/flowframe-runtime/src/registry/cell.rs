use std::sync::OnceLock;

use flowframe_client::SearchService;

use super::StepRegistry;
use crate::error::{WorkflowError, WorkflowResult};

/// Create-once holder for the registry of a hosting process.
///
/// The host owns one cell, creates the registry at startup with its single
/// client, and hands out `&StepRegistry` afterwards.
#[derive(Debug, Default)]
pub struct RegistryCell {
    inner: OnceLock<StepRegistry>,
}

impl RegistryCell {
    /// Creates an empty cell.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Builds the built-in registry around `client`.
    ///
    /// Fails with [`WorkflowError::AlreadyInitialized`] if the cell was
    /// already filled, including by a concurrent caller.
    pub fn create(&self, client: SearchService) -> WorkflowResult<&StepRegistry> {
        if self.inner.get().is_some() {
            return Err(WorkflowError::AlreadyInitialized);
        }
        self.install(StepRegistry::new(client))
    }

    /// Stores a registry built elsewhere, e.g. one with custom steps.
    pub fn install(&self, registry: StepRegistry) -> WorkflowResult<&StepRegistry> {
        self.inner
            .set(registry)
            .map_err(|_| WorkflowError::AlreadyInitialized)?;
        self.get()
    }

    /// Returns the registry.
    ///
    /// Fails with [`WorkflowError::NotInitialized`] before
    /// [`create`](Self::create) or [`install`](Self::install).
    pub fn get(&self) -> WorkflowResult<&StepRegistry> {
        self.inner.get().ok_or(WorkflowError::NotInitialized)
    }

    /// Returns whether the registry was created.
    pub fn is_initialized(&self) -> bool {
        self.inner.get().is_some()
    }
}
