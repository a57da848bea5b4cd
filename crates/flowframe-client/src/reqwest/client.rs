//! Reqwest-based HTTP client for cluster management calls.

use std::sync::Arc;
use std::time::Instant;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::{Error, ReqwestConfig, TRACING_TARGET};
use crate::{
    AcknowledgedResponse, CreateIndexRequest, CreateIndexResponse, PutPipelineRequest,
    ClusterHealth, SearchProvider, SearchService,
};

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
}

/// Reqwest-based HTTP client for OpenSearch-compatible clusters.
///
/// This client implements the [`SearchProvider`] trait. It is cheap to clone
/// and safe to share between concurrently running steps.
///
/// # Examples
///
/// ```rust,ignore
/// use flowframe_client::reqwest::{ReqwestClient, ReqwestConfig};
/// use flowframe_client::CreateIndexRequest;
///
/// let client = ReqwestClient::new(ReqwestConfig::localhost()?)?;
/// let response = client.create_index(&CreateIndexRequest::new("logs")).await?;
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("url", &self.inner.config.url.as_str())
            .field("timeout", &self.inner.config.effective_timeout())
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: ReqwestConfig) -> crate::Result<Self> {
        config.validate()?;

        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            url = %config.url,
            timeout_ms = timeout.as_millis(),
            basic_auth = config.username.is_some(),
            "Creating reqwest client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(Error::from)?;

        let inner = ReqwestClientInner { http, config };
        let client = Self {
            inner: Arc::new(inner),
        };

        tracing::info!(
            target: TRACING_TARGET,
            url = %client.inner.config.url,
            "Reqwest client created successfully"
        );

        Ok(client)
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Converts this client into a [`SearchService`] for use with dependency injection.
    pub fn into_service(self) -> SearchService {
        SearchService::new(self)
    }

    /// Resolves an API path against the configured base URL.
    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.inner.config.url.join(path)?)
    }

    /// Applies authentication to an outgoing request.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.inner.config.username {
            Some(username) => request.basic_auth(username, self.inner.config.password.as_ref()),
            None => request,
        }
    }

    /// Sends a request and decodes a successful JSON body.
    async fn send<T>(&self, request: RequestBuilder) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = self.authorize(request).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Turns a non-success response into [`Error::Status`].
    async fn check_status(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let reason = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .pointer("/error/type")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| body.chars().take(512).collect());

        Err(Error::Status { status, reason })
    }
}

#[async_trait::async_trait]
impl SearchProvider for ReqwestClient {
    async fn create_index(&self, request: &CreateIndexRequest) -> crate::Result<CreateIndexResponse> {
        let url = self.endpoint(&request.index)?;

        tracing::debug!(
            target: TRACING_TARGET,
            url = %url,
            "Sending create index request"
        );

        let http_request = self.inner.http.put(url).json(&request.body());
        let response = self.send::<CreateIndexResponse>(http_request).await?;
        Ok(response)
    }

    async fn put_ingest_pipeline(
        &self,
        request: &PutPipelineRequest,
    ) -> crate::Result<AcknowledgedResponse> {
        let url = self.endpoint(&format!("_ingest/pipeline/{}", request.id))?;

        tracing::debug!(
            target: TRACING_TARGET,
            url = %url,
            "Sending put pipeline request"
        );

        let http_request = self.inner.http.put(url).json(&request.body());
        let response = self.send::<AcknowledgedResponse>(http_request).await?;
        Ok(response)
    }

    async fn health_check(&self) -> crate::Result<ClusterHealth> {
        let started_at = Instant::now();
        let url = self.endpoint("_cluster/health")?;

        let health = self.send::<ClusterHealth>(self.inner.http.get(url)).await?;
        Ok(health.with_response_time(started_at.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ReqwestClient::new(ReqwestConfig::localhost().unwrap()).unwrap();
        assert!(client.config().user_agent.is_none());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ReqwestConfig::new(Url::parse("ftp://cluster:21").unwrap());
        assert!(ReqwestClient::new(config).is_err());
    }

    #[test]
    fn test_endpoint_resolution() {
        let client = ReqwestClient::new(ReqwestConfig::localhost().unwrap()).unwrap();
        assert_eq!(
            client.endpoint("_ingest/pipeline/embed").unwrap().as_str(),
            "http://localhost:9200/_ingest/pipeline/embed"
        );
        assert_eq!(
            client.endpoint("logs").unwrap().as_str(),
            "http://localhost:9200/logs"
        );
    }
}
