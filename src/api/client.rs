use crate::api::{ApiPayload, Endpoint};
use crate::config::{ClusterConfig, ExporterConfig};
use crate::error::{MonitorError, Result};
use tracing::{debug, instrument, warn};

/// Blocking-style client for the offset API: one request at a time, no retries.
pub struct OffsetApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl OffsetApiClient {
    pub fn new(config: &ExporterConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request URL for `endpoint`. The connection string is appended as-is; the API
    /// expects its commas, colons and slashes unescaped.
    pub fn endpoint_url(&self, endpoint: Endpoint, zookeeper: &str) -> String {
        format!("{}{}?zookeeper={}", self.base_url, endpoint.path(), zookeeper)
    }

    /// Fetch and classify one endpoint for a cluster. Non-2xx statuses are reported
    /// as malformed payloads; transport failures are returned as errors.
    #[instrument(skip(self, cluster), fields(cluster = %cluster.name))]
    pub async fn fetch(&self, endpoint: Endpoint, cluster: &ClusterConfig) -> Result<ApiPayload> {
        let url = self.endpoint_url(endpoint, &cluster.zookeeper);
        debug!(url = %url, "Requesting offsets");

        let request_error = |source: reqwest::Error| MonitorError::Request {
            cluster: cluster.name.clone(),
            endpoint,
            source,
        };

        let response = self.http.get(&url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Offset API returned an error status");
            return Ok(ApiPayload::Malformed(format!("HTTP status {status}")));
        }

        let body = response.bytes().await.map_err(request_error)?;
        debug!(bytes = body.len(), "Received response");

        Ok(ApiPayload::from_body(&body))
    }
}
