use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use kaiviz_common::{ClusterSummary, JobView, NodeView, QueueView};

use crate::error_banner::ErrorBroadcaster;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api/v1/visualizer";

/// Classified failure of a visualizer request.
///
/// The `Display` text is what the error banner shows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No HTTP status at all: connection refused, DNS failure, timeout.
    #[error("API server is unreachable. Check if KAI Scheduler is running.")]
    Unreachable,
    #[error("Server error: {status} {reason}")]
    Server { status: u16, reason: String },
    #[error("Request error: {status} {reason}")]
    Request { status: u16, reason: String },
    #[error("Unexpected error: {detail}")]
    Unexpected { detail: String },
}

impl ApiError {
    /// `None` for statuses below 400.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        let reason = status.canonical_reason().unwrap_or("").to_string();
        if status.is_server_error() {
            Some(ApiError::Server {
                status: status.as_u16(),
                reason,
            })
        } else if status.is_client_error() {
            Some(ApiError::Request {
                status: status.as_u16(),
                reason,
            })
        } else {
            None
        }
    }

    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            return ApiError::Unreachable;
        }
        if let Some(err) = err.status().and_then(Self::from_status) {
            return err;
        }
        ApiError::Unexpected {
            detail: err.to_string(),
        }
    }
}

/// Read-only view of the scheduler's visualizer endpoints.
#[async_trait]
pub trait VisualizerApi: Send + Sync {
    async fn cluster_summary(&self) -> Result<ClusterSummary, ApiError>;
    /// An empty `namespace` lists jobs in every namespace.
    async fn jobs(&self, namespace: &str) -> Result<Vec<JobView>, ApiError>;
    async fn nodes(&self) -> Result<Vec<NodeView>, ApiError>;
    async fn queues(&self) -> Result<Vec<QueueView>, ApiError>;
}

/// HTTP implementation of [`VisualizerApi`].
///
/// Every failed request is classified, published on the error banner and
/// then returned to the caller.
#[derive(Debug, Clone)]
pub struct HttpVisualizerApi {
    http: reqwest::Client,
    base_url: String,
    errors: ErrorBroadcaster,
}

impl HttpVisualizerApi {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, errors: ErrorBroadcaster) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            errors,
        }
    }

    pub fn build_client(connect_timeout: Duration, timeout: Duration) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let result = self.fetch(path, query).await;
        if let Err(e) = &result {
            tracing::warn!(path, error = %e, "visualizer request failed");
            self.errors.set_error(e.to_string());
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "GET");
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;
        if let Some(err) = ApiError::from_status(resp.status()) {
            return Err(err);
        }
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::from_transport(&e))
    }
}

#[async_trait]
impl VisualizerApi for HttpVisualizerApi {
    async fn cluster_summary(&self) -> Result<ClusterSummary, ApiError> {
        self.get_json("/summary", &[]).await
    }

    async fn jobs(&self, namespace: &str) -> Result<Vec<JobView>, ApiError> {
        if namespace.is_empty() {
            self.get_json("/jobs", &[]).await
        } else {
            self.get_json("/jobs", &[("namespace", namespace)]).await
        }
    }

    async fn nodes(&self) -> Result<Vec<NodeView>, ApiError> {
        self.get_json("/nodes", &[]).await
    }

    async fn queues(&self) -> Result<Vec<QueueView>, ApiError> {
        self.get_json("/queues", &[]).await
    }
}
