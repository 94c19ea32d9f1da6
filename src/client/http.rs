//! HTTP implementation of the job client
//!
//! Talks to the backend's view/search-job REST resources with JSON bodies.
//! Non-success responses are surfaced as [`SearchJobsError::Api`] with the
//! response body as the message; everything else propagates as
//! [`SearchJobsError::Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::{Result, SearchJobsError};
use crate::execution::SearchExecutionState;
use crate::job::{JobHandle, SearchJob, StartJobResponse};
use crate::view::SearchDefinition;

use super::JobClient;

/// Default API base URL
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9000/api";

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// CSRF header the backend requires on every request
const REQUESTED_BY_HEADER: &str = "X-Requested-By";
const REQUESTED_BY_VALUE: &str = "searchjobs";

/// Configuration for [`HttpJobClient`]
#[derive(Debug, Clone)]
pub struct HttpJobClientConfig {
    /// Base URL of the backend API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout. Polls are short; the timeout guards against a
    /// stuck connection, not against job runtime.
    pub timeout: Duration,
    /// Optional API token sent as basic-auth username.
    pub api_token: Option<String>,
}

impl Default for HttpJobClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_token: None,
        }
    }
}

impl HttpJobClientConfig {
    /// Create a config pointing at a specific API base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }
}

/// [`JobClient`] over the backend REST API.
#[derive(Debug, Clone)]
pub struct HttpJobClient {
    client: Client,
    config: HttpJobClientConfig,
}

impl HttpJobClient {
    pub fn new(config: HttpJobClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(REQUESTED_BY_HEADER, REQUESTED_BY_VALUE);
        match &self.config.api_token {
            Some(token) => builder.basic_auth(token, Some("token")),
            None => builder,
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchJobsError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    async fn expect_success(response: Response) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchJobsError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl JobClient for HttpJobClient {
    async fn start(
        &self,
        search: &SearchDefinition,
        execution_state: &SearchExecutionState,
    ) -> Result<StartJobResponse> {
        let url = self.url(&format!("/views/search/{}/execute", search.id));
        let response = self
            .prepare(self.client.post(url))
            .json(execution_state)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn status(&self, job_id: &str) -> Result<SearchJob> {
        let url = self.url(&format!("/views/searchjobs/{job_id}/status"));
        let response = self.prepare(self.client.get(url)).send().await?;
        Self::parse(response).await
    }

    async fn poll(&self, handle: &JobHandle) -> Result<SearchJob> {
        let url = self.url(&format!(
            "/views/searchjobs/{}/{}/status",
            handle.executing_node, handle.job_id
        ));
        let response = self.prepare(self.client.get(url)).send().await?;
        Self::parse(response).await
    }

    async fn cancel(&self, handle: &JobHandle) -> Result<()> {
        let url = self.url(&format!(
            "/views/searchjobs/{}/{}/cancel",
            handle.executing_node, handle.job_id
        ));
        let response = self.prepare(self.client.post(url)).send().await?;
        Self::expect_success(response).await
    }

    async fn run(
        &self,
        search: &SearchDefinition,
        execution_state: &SearchExecutionState,
    ) -> Result<SearchJob> {
        let url = self.url(&format!("/views/search/{}/sync", search.id));
        let response = self
            .prepare(self.client.post(url))
            .json(execution_state)
            .send()
            .await?;
        Self::parse(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpJobClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_config_builders() {
        let config = HttpJobClientConfig::with_base_url("https://logs.example.com/api/")
            .with_timeout(Duration::from_secs(5))
            .with_api_token("secret");

        assert_eq!(config.base_url, "https://logs.example.com/api/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = HttpJobClient::new(HttpJobClientConfig::with_base_url(
            "https://logs.example.com/api/",
        ))
        .unwrap();

        assert_eq!(
            client.url("/views/searchjobs/job-1/status"),
            "https://logs.example.com/api/views/searchjobs/job-1/status"
        );
    }
}
