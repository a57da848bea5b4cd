//! Built-in step implementations.
//!
//! - [`CreateIndexStep`] (`create_index`): creates a search index.
//! - [`CreateIngestPipelineStep`] (`create_ingest_pipeline`): creates an
//!   ingest pipeline, optionally with a text embedding processor.
//! - [`DelayStep`] (`delay`): waits, then forwards its inputs. Useful for
//!   demonstrations and tests.

use std::time::Duration;

mod create_index;
mod create_ingest_pipeline;
mod delay;

pub use create_index::CreateIndexStep;
pub use create_ingest_pipeline::CreateIngestPipelineStep;
pub use delay::DelayStep;

/// Time bound applied to remote steps that do not set `timeout_ms`.
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);

/// Parameter overriding [`DEFAULT_STEP_TIMEOUT`].
const TIMEOUT_PARAM: &str = "timeout_ms";
