use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use super::{PredictionForecast, PredictionProvider, PredictionRequest};

/// Shortest timeout the service is ever given.
pub const MIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest timeout before we stop waiting and fall back.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the prediction service.
///
/// Does exactly one request per call: no retries here, the caller decides
/// what failure means (usually: fall back to the heuristic estimator).
pub struct MlServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl MlServiceClient {
    /// `timeout` is clamped to the 5-30 s band the service is operated with.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let timeout = timeout.clamp(MIN_TIMEOUT, MAX_TIMEOUT);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building prediction service client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PredictionProvider for MlServiceClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionForecast> {
        let url = format!("{}/predict", self.base_url);
        tracing::debug!(%url, hours_ahead = request.hours_ahead, "requesting prediction");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .context("prediction service unreachable")?
            .error_for_status()
            .context("prediction service returned an error status")?;

        let forecast: PredictionForecast = response
            .json()
            .await
            .context("prediction service returned an unexpected payload")?;
        Ok(forecast)
    }
}
