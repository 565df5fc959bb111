//! HTTP client trait and implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::FetchError;

/// Trait for HTTP clients, enabling mockability in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch a response body as text. Non-success statuses are errors.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for ReqwestClient.
#[derive(Clone)]
pub struct ReqwestClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for ReqwestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestClientBuilder {
    /// Create a new builder with a 30 second timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: "Mozilla/5.0 (compatible; Cookify/1.0)".to_string(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ReqwestClient, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;
        Ok(ReqwestClient { inner })
    }
}

/// Production HTTP client backed by reqwest.
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn builder() -> ReqwestClientBuilder {
        ReqwestClientBuilder::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        tracing::debug!(url, "network: fetching");
        let response = self.inner.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = %status, "network: request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Mock response for testing.
#[derive(Clone, Debug)]
pub enum MockResponse {
    Body(String),
    Status(u16),
    Error(String),
}

/// Mock HTTP client for testing.
///
/// Each URL maps to a sequence of responses. The n-th request to a URL gets the
/// n-th response; once the sequence runs out the last response repeats.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, Vec<MockResponse>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a response to the sequence for a URL.
    pub fn with_response(mut self, url: &str, response: MockResponse) -> Self {
        self.responses
            .entry(url.to_string())
            .or_default()
            .push(response);
        self
    }

    pub fn with_body(self, url: &str, body: &str) -> Self {
        self.with_response(url, MockResponse::Body(body.to_string()))
    }

    pub fn with_json(self, url: &str, value: &serde_json::Value) -> Self {
        self.with_response(url, MockResponse::Body(value.to_string()))
    }

    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.with_response(url, MockResponse::Status(status))
    }

    pub fn with_error(self, url: &str, error: &str) -> Self {
        self.with_response(url, MockResponse::Error(error.to_string()))
    }

    /// Number of requests made to a URL so far.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(url).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total number of requests made to any URL.
    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.values().sum())
            .unwrap_or(0)
    }

    fn next_call(&self, url: &str) -> usize {
        match self.calls.lock() {
            Ok(mut calls) => {
                let n = calls.entry(url.to_string()).or_insert(0);
                *n += 1;
                *n - 1
            }
            Err(_) => 0,
        }
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let call = self.next_call(url);
        let response = self
            .responses
            .get(url)
            .and_then(|seq| seq.get(call).or_else(|| seq.last()));

        match response {
            Some(MockResponse::Body(body)) => Ok(body.clone()),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
            Some(MockResponse::Error(e)) => Err(FetchError::Transport(e.clone())),
            None => Err(FetchError::InvalidUrl(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }
}
