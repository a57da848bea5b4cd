//! Reqwest client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cluster address.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Configuration for the reqwest HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Base URL of the cluster
    #[cfg_attr(
        feature = "config",
        arg(long = "cluster-url", env = "CLUSTER_URL", default_value = DEFAULT_URL)
    )]
    pub url: Url,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Username for HTTP basic authentication
    #[cfg_attr(
        feature = "config",
        arg(long = "cluster-username", env = "CLUSTER_USERNAME")
    )]
    #[serde(default)]
    pub username: Option<String>,

    /// Password for HTTP basic authentication
    #[cfg_attr(
        feature = "config",
        arg(long = "cluster-password", env = "CLUSTER_PASSWORD", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ReqwestConfig {
    /// Create a new configuration for the given cluster.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            http_timeout: default_timeout_secs(),
            user_agent: None,
            username: None,
            password: None,
        }
    }

    /// Parses `url` and creates a configuration for that cluster.
    pub fn parse(url: &str) -> crate::Result<Self> {
        let url = Url::parse(url).map_err(super::Error::from)?;
        Ok(Self::new(url))
    }

    /// Creates a configuration for a cluster on [`DEFAULT_URL`].
    pub fn localhost() -> crate::Result<Self> {
        Self::parse(DEFAULT_URL)
    }

    /// Returns the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("flowframe/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if !matches!(self.url.scheme(), "http" | "https") {
            return Err(crate::Error::invalid_input().with_message(format!(
                "cluster URL '{}' must use http or https",
                self.url
            )));
        }

        if self.password.is_some() && self.username.is_none() {
            return Err(crate::Error::invalid_input()
                .with_message("a cluster password requires a username"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_config() {
        let config = ReqwestConfig::localhost().unwrap();
        assert_eq!(config.url.as_str(), "http://localhost:9200/");
        assert_eq!(config.http_timeout, 30);
        assert!(config.user_agent.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ReqwestConfig::localhost()
            .unwrap()
            .with_timeout(120)
            .with_user_agent("custom-agent/1.0")
            .with_basic_auth("admin", "secret");

        assert_eq!(config.http_timeout, 120);
        assert_eq!(config.user_agent, Some("custom-agent/1.0".to_string()));
        assert_eq!(config.username.as_deref(), Some("admin"));
    }

    #[test]
    fn test_effective_timeout_uses_default_when_zero() {
        let config = ReqwestConfig::localhost().unwrap().with_timeout(0);
        assert_eq!(
            config.effective_timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_effective_user_agent_uses_default_when_none() {
        let config = ReqwestConfig::localhost().unwrap();
        assert!(config.effective_user_agent().contains("flowframe"));
    }

    #[test]
    fn test_validation_rejects_bad_inputs() {
        let config = ReqwestConfig::new(Url::parse("ftp://cluster:21").unwrap());
        assert!(config.validate().is_err());

        let mut config = ReqwestConfig::localhost().unwrap();
        config.password = Some("secret".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparsable_url_is_invalid_input() {
        let err = ReqwestConfig::parse("not a url").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_password_is_not_serialized() {
        let config = ReqwestConfig::localhost()
            .unwrap()
            .with_basic_auth("admin", "secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
