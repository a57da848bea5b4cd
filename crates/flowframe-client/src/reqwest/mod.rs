//! Reqwest-based HTTP client for OpenSearch-compatible clusters.
//!
//! This module provides a reqwest-based implementation of the [`SearchProvider`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use flowframe_client::reqwest::{ReqwestClient, ReqwestConfig};
//! use flowframe_client::SearchService;
//!
//! let config = ReqwestConfig::new("http://localhost:9200".parse()?);
//! let client = ReqwestClient::new(config)?;
//!
//! // Convert to a service for dependency injection
//! let service: SearchService = client.into_service();
//! ```
//!
//! [`SearchProvider`]: crate::SearchProvider

mod client;
mod config;
mod error;

pub use client::ReqwestClient;
pub use config::ReqwestConfig;
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "flowframe_client::reqwest";
