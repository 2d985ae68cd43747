use anyhow::{Context, Result};
use dd_core::config::ApiConfig;
use dd_core::ports::ApiError;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::errors::{map_reqwest_error, map_status};

/// Shared HTTP client bound to the API base URL.
///
/// Cheap to clone; every adapter holds one.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Self::with_client(http, &config.base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid API base URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry a path: {base_url}");
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `base_url` plus `segments`, each percent-encoded. An empty last
    /// segment yields a trailing slash.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send and fail on any non-2xx status.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "API response");

        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, &body))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
