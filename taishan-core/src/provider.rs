use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

use crate::{Config, endpoint::Endpoint};

pub mod basic;
pub mod overview;

/// A resolved GET request against one upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRequest {
    pub endpoint: Endpoint,
    pub url: String,
}

impl EndpointRequest {
    pub fn new(endpoint: Endpoint, url: impl Into<String>) -> Self {
        Self { endpoint, url: url.into() }
    }

    /// Resolve `endpoint` against the configured URL overrides.
    pub fn from_config(endpoint: Endpoint, config: &Config) -> Self {
        Self::new(endpoint, config.endpoint_url(endpoint))
    }

    /// Endpoint headers, minus `Host` when the URL points somewhere other than the default.
    pub fn headers(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        let overridden = self.url != self.endpoint.default_url();
        self.endpoint
            .headers()
            .iter()
            .copied()
            .filter(move |(name, _)| !(overridden && name.eq_ignore_ascii_case("host")))
    }
}

/// Transport used by the service to read upstream bodies.
#[async_trait]
pub trait Fetch: Send + Sync + Debug {
    async fn get_text(&self, request: &EndpointRequest) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.request_timeout())
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_text(&self, request: &EndpointRequest) -> Result<String> {
        tracing::debug!(endpoint = %request.endpoint, url = %request.url, "GET upstream");

        let mut builder = self.http.get(&request.url);
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let res = builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", request.endpoint))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read {} response body", request.endpoint))?;

        if !status.is_success() {
            return Err(anyhow!(
                "{} request failed with status {}: {}",
                request.endpoint,
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }
}

/// Shortens `body` for log and error messages, respecting char boundaries.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
