#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod health;
mod service;

pub mod request;
pub mod response;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use health::{ClusterHealth, ClusterStatus};
pub use request::{CreateIndexRequest, PutPipelineRequest};
pub use response::{AcknowledgedResponse, CreateIndexResponse};
pub use service::SearchService;

/// Tracing target for client operations.
pub const TRACING_TARGET: &str = "flowframe_client";

/// Core trait for the remote calls made by provisioning steps.
///
/// Implementations must be safe for concurrent use: a single provider is
/// shared by every step of every running workflow.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Creates an index with optional settings and mappings.
    async fn create_index(&self, request: &CreateIndexRequest) -> Result<CreateIndexResponse>;

    /// Creates or replaces an ingest pipeline.
    async fn put_ingest_pipeline(&self, request: &PutPipelineRequest)
    -> Result<AcknowledgedResponse>;

    /// Reports the health of the backing cluster.
    async fn health_check(&self) -> Result<ClusterHealth>;
}
