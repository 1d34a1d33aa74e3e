//! Request dispatch
//!
//! A [`Dispatcher`] sends one parameter set to an endpoint and hands back the
//! raw response body. [`HttpDispatcher`] talks to the live service;
//! [`MockDispatcher`] replays fixture files and records what was sent.

use super::constants;
use super::error::DispatchError;
use super::params::RequestParameters;
use async_trait::async_trait;
use log::{debug, trace};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Send a request and return the response body
    async fn send(&self, endpoint: &str, params: &RequestParameters) -> Result<String, DispatchError>;
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    async fn send(&self, endpoint: &str, params: &RequestParameters) -> Result<String, DispatchError> {
        (**self).send(endpoint, params).await
    }
}

/// Live dispatcher with connection pooling
#[derive(Clone)]
pub struct HttpDispatcher {
    http_client: reqwest::Client,
}

impl HttpDispatcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, DispatchError> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(|e| DispatchError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn send(&self, endpoint: &str, params: &RequestParameters) -> Result<String, DispatchError> {
        debug!("POST {} (Action={})", endpoint, params.get(constants::params::ACTION).unwrap_or("?"));

        let response = self
            .http_client
            .post(endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded; charset=utf-8")
            .body(params.to_form_body())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        trace!("Response {}: {} bytes", status, body.len());

        if status.is_success() {
            Ok(body)
        } else {
            Err(DispatchError::Status {
                code: status.as_u16(),
                body,
            })
        }
    }
}

/// A call recorded by [`MockDispatcher`]
#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    pub endpoint: String,
    pub params: RequestParameters,
}

/// Fixture-backed dispatcher.
///
/// Responses are served in the order they were queued; every call is
/// recorded, including calls that found the queue empty.
#[derive(Debug, Clone, Default)]
pub struct MockDispatcher {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    responses: VecDeque<Result<String, DispatchError>>,
    sent: Vec<SentRequest>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue response bodies
    pub fn with_responses<I, S>(bodies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        for body in bodies {
            mock.push_response(body);
        }
        mock
    }

    /// Queue fixture files from a directory, in the given order
    pub fn from_files<P: AsRef<Path>>(dir: P, files: &[&str]) -> Result<Self, DispatchError> {
        let mock = Self::new();
        for file in files {
            mock.push_file(dir.as_ref().join(file))?;
        }
        Ok(mock)
    }

    pub fn push_response(&self, body: impl Into<String>) {
        self.inner.lock().responses.push_back(Ok(body.into()));
    }

    /// Queue a transport failure
    pub fn push_failure(&self, error: DispatchError) {
        self.inner.lock().responses.push_back(Err(error));
    }

    pub fn push_file(&self, path: PathBuf) -> Result<(), DispatchError> {
        let body = std::fs::read_to_string(&path)
            .map_err(|e| DispatchError::Fixture(format!("Failed to read {}: {}", path.display(), e)))?;
        debug!("Queued mock file: {}", path.display());
        self.push_response(body);
        Ok(())
    }

    /// Every request sent so far
    pub fn sent(&self) -> Vec<SentRequest> {
        self.inner.lock().sent.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().sent.len()
    }

    pub fn remaining(&self) -> usize {
        self.inner.lock().responses.len()
    }
}

#[async_trait]
impl Dispatcher for MockDispatcher {
    async fn send(&self, endpoint: &str, params: &RequestParameters) -> Result<String, DispatchError> {
        let mut state = self.inner.lock();
        state.sent.push(SentRequest {
            endpoint: endpoint.to_string(),
            params: params.clone(),
        });

        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(DispatchError::Fixture("No mock responses left".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_in_order_and_records() {
        let mock = MockDispatcher::with_responses(["<a/>", "<b/>"]);
        let params = RequestParameters::new().with("Action", "GetReportList");

        assert_eq!(mock.send("https://x", &params).await.unwrap(), "<a/>");
        assert_eq!(mock.send("https://x", &params).await.unwrap(), "<b/>");
        assert!(matches!(mock.send("https://x", &params).await, Err(DispatchError::Fixture(_))));

        let sent = mock.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].params.get("Action"), Some("GetReportList"));
    }

    #[tokio::test]
    async fn test_mock_failure_and_shared_clone() {
        let mock = MockDispatcher::new();
        mock.push_failure(DispatchError::Status { code: 503, body: String::new() });
        let shared: Arc<dyn Dispatcher> = Arc::new(mock.clone());

        let err = shared.send("https://x", &RequestParameters::new()).await.unwrap_err();
        assert!(err.is_server_throttled());
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_from_files_missing() {
        let err = MockDispatcher::from_files("/nonexistent", &["nope.xml"]).unwrap_err();
        assert!(matches!(err, DispatchError::Fixture(_)));
    }
}
