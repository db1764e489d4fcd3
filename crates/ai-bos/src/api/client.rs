use std::future::Future;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{BatchCalculation, CalculationRequest, CalculationResult, ThresholdConfig};
use crate::config::ApiConfig;

const JSON: &str = "application/json";

/// Calculation service seam so handlers can run against fakes.
pub trait PenaltyApi {
    /// Single request/response exchange; no retry.
    fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> impl Future<Output = Result<CalculationResult, ApiError>>;

    /// Optional display enrichment; every failure collapses to `None`.
    fn thresholds(&self) -> impl Future<Output = Option<ThresholdConfig>>;
}

/// Failure of a call to the calculation service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service responded with HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|status| status.as_u16()),
            ApiError::Decode(_) => None,
        }
    }
}

/// JSON-over-HTTP client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct HttpPenaltyClient {
    http: reqwest::Client,
    root: String,
}

impl HttpPenaltyClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            root: config.endpoint_root(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.root, path.trim_start_matches('/'))
    }

    /// Fan-out calculation for several delays in one call.
    pub async fn calculate_batch(&self, delays: &[u32]) -> Result<BatchCalculation, ApiError> {
        let joined = delays
            .iter()
            .map(|delay| delay.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}?delays={joined}", self.endpoint("calculate/batch"));
        debug!(%url, count = delays.len(), "requesting batch calculation");

        let response = self.http.get(url).header(ACCEPT, JSON).send().await?;
        decode(response).await
    }

    async fn fetch_thresholds(&self) -> Result<ThresholdConfig, ApiError> {
        let url = self.endpoint("thresholds");
        let response = self.http.get(url).header(ACCEPT, JSON).send().await?;
        decode(response).await
    }
}

impl PenaltyApi for HttpPenaltyClient {
    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, ApiError> {
        let url = self.endpoint("calculate");
        debug!(%url, delay_minutes = request.delay_minutes, "requesting calculation");

        let response = self
            .http
            .post(url)
            .header(ACCEPT, JSON)
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    async fn thresholds(&self) -> Option<ThresholdConfig> {
        match self.fetch_thresholds().await {
            Ok(config) => Some(config),
            Err(err) => {
                warn!(error = %err, "threshold configuration unavailable");
                None
            }
        }
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            detail: error_detail(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Pulls the `error` or `detail` message out of an error body, if any.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|field| field.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hang_off_versioned_root() {
        let config = ApiConfig::new("http://localhost:8000/").expect("valid url");
        let client = HttpPenaltyClient::new(&config).expect("client builds");
        assert_eq!(
            client.endpoint("calculate"),
            "http://localhost:8000/api/v1/calculate"
        );
        assert_eq!(
            client.endpoint("/thresholds"),
            "http://localhost:8000/api/v1/thresholds"
        );
    }

    #[test]
    fn error_detail_prefers_error_field() {
        assert_eq!(
            error_detail(r#"{"error": "Calculation failed: boom", "path": "/x"}"#),
            Some("Calculation failed: boom".to_string())
        );
        assert_eq!(
            error_detail(r#"{"detail": "Invalid delay values."}"#),
            Some("Invalid delay values.".to_string())
        );
        assert_eq!(error_detail("<html>bad gateway</html>"), None);
    }

    #[test]
    fn status_error_message_includes_detail() {
        let err = ApiError::Status {
            status: 500,
            detail: Some("Calculation failed".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "service responded with HTTP 500: Calculation failed"
        );
        assert_eq!(err.status(), Some(500));
    }
}
