// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP client for communicating with the swarm backend

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::stream::{EventStream, StreamChannel};
use super::types::{
    Diagnostics, Directive, ErrorBody, HealthReport, LaunchRequest, TaskRequest, TaskResponse,
    TaskResult,
};
use super::BackendError;
use crate::config::ConsoleConfig;

pub const LICENSE_HEADER: &str = "x-license-key";
pub const TUNNEL_BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

/// Result of a health probe. Unreachable and rejected probes are both offline.
#[derive(Debug)]
pub enum HealthStatus {
    Online(HealthReport),
    Offline(BackendError),
}

/// Client bound to one backend, with identification headers fixed at construction
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    license_key: Option<String>,
}

impl BackendClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = &config.license_key {
            let value = HeaderValue::from_str(key).context("License key is not a valid header value")?;
            headers.insert(HeaderName::from_static(LICENSE_HEADER), value);
        }
        if config.skip_tunnel_warning {
            headers.insert(
                HeaderName::from_static(TUNNEL_BYPASS_HEADER),
                HeaderValue::from_static("true"),
            );
        }

        let client = Client::builder()
            // No global timeout: a hung backend hangs the handler
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            license_key: config.license_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Probe `GET /health`, folding every failure into [`HealthStatus::Offline`]
    pub async fn check_health(&self) -> HealthStatus {
        match self.fetch_health().await {
            Ok(report) => HealthStatus::Online(report),
            Err(e) => {
                debug!("Health check failed: {}", e);
                HealthStatus::Offline(e)
            }
        }
    }

    pub async fn fetch_health(&self) -> Result<HealthReport, BackendError> {
        let url = self.url("/health");
        let response = self.send(self.client.get(&url), &url).await?;
        decode(response).await
    }

    /// Best effort: any failure yields empty diagnostics
    pub async fn fetch_diagnostics(&self) -> Diagnostics {
        let url = self.url("/api/diagnostics");
        let result = match self.send(self.client.get(&url), &url).await {
            Ok(response) => decode::<Diagnostics>(response).await,
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            warn!("Diagnostics unavailable: {}", e);
            Diagnostics::default()
        })
    }

    pub async fn submit_task(&self, directive: &Directive) -> Result<TaskResult, BackendError> {
        let url = self.url("/api/tasks");
        let request = self.client.post(&url).json(&TaskRequest {
            description: directive.as_str(),
        });
        let response = self.send(request, &url).await?;
        let body: TaskResponse = decode(response).await?;
        Ok(body.into())
    }

    pub async fn launch(&self, signature: &str) -> Result<serde_json::Value, BackendError> {
        let url = self.url("/api/sovereign/launch");
        let request = self.client.post(&url).json(&LaunchRequest { signature });
        let response = self.send(request, &url).await?;
        decode(response).await
    }

    /// Open the push stream for `channel`, carrying the same license header
    pub async fn open_stream(&self, channel: StreamChannel) -> Result<EventStream, BackendError> {
        EventStream::connect(&self.base_url, channel, self.license_key.as_deref()).await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<Response, BackendError> {
        debug!("-> {}", url);
        let response = request.send().await.map_err(|e| BackendError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        debug!("<- {} {}", status.as_u16(), url);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                detail: extract_detail(&text),
            });
        }

        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Pull the server-provided detail out of an error body
pub(super) fn extract_detail(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        match parsed.detail {
            Some(serde_json::Value::String(s)) => return Some(s),
            Some(serde_json::Value::Null) | None => {}
            Some(other) => return Some(other.to_string()),
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(200).collect())
    }
}
