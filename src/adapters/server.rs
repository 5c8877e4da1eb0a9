//! REST client for the pipeline-run service.
//!
//! Fetches a run's graph payload from `GET /api/v1/runs/{id}/graph`,
//! authenticating with a bearer token when one is configured.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::domain::DagPayload;

use super::DagSource;

/// HTTP client for the pipeline server
pub struct ServerClient {
    base_url: String,
    api_token: Option<String>,
    http: reqwest::Client,
}

impl ServerClient {
    /// Create a client for the given server base URL
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token,
            http: reqwest::Client::new(),
        }
    }

    fn graph_url(&self, run_id: &str) -> String {
        format!(
            "{}/api/v1/runs/{}/graph",
            self.base_url.trim_end_matches('/'),
            run_id
        )
    }
}

#[async_trait]
impl DagSource for ServerClient {
    fn name(&self) -> &str {
        "server"
    }

    async fn fetch_dag(&self, run_id: &str) -> Result<DagPayload> {
        let url = self.graph_url(run_id);
        debug!(%url, "Fetching DAG payload");

        let mut request = self.http.get(&url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach pipeline server at {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Pipeline server returned {} for run {}",
                response.status(),
                run_id
            );
        }

        response
            .json::<DagPayload>()
            .await
            .with_context(|| format!("Invalid DAG payload for run {}", run_id))
    }
}
